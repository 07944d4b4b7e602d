//! In-memory drawable sink.
//!
//! [`RecordingSink`] keeps every live adornment in a table instead of
//! rendering it. Headless hosts, the demo and the tests use it to observe
//! what the drawer produced. Clones share the same table, so one clone can
//! be handed to a [`Visualizer`](crate::Visualizer) while another inspects.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use visualize_core::math::{Pose, Vec3, pose_position};

use crate::config::Color3;
use crate::error::DrawError;
use crate::sink::{AdornmentHandle, AdornmentKind, AdornmentSize, AdornmentStyle, DrawableSink};

/// Snapshot of one live adornment.
#[derive(Debug, Clone, PartialEq)]
pub struct AdornmentRecord {
    pub kind: AdornmentKind,
    pub style: AdornmentStyle,
    pub pose: Pose,
    pub color: Color3,
    pub size: Option<AdornmentSize>,
    pub visible: bool,
}

impl AdornmentRecord {
    /// Position of the adornment.
    pub fn position(&self) -> Vec3 {
        pose_position(&self.pose)
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    next_id: u64,
    live: HashMap<AdornmentHandle, AdornmentRecord>,
    created: u64,
    destroyed: u64,
    capacity: Option<usize>,
}

impl RecordingState {
    fn record_mut(&mut self, handle: AdornmentHandle) -> Result<&mut AdornmentRecord, DrawError> {
        self.live
            .get_mut(&handle)
            .ok_or(DrawError::InvalidHandle(handle))
    }
}

/// Drawable sink that records adornments in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingSink {
    /// Create an empty sink with no capacity limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that fails with [`DrawError::OutOfResources`] once
    /// `capacity` adornments are alive.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        let sink = Self::new();
        sink.state.lock().capacity = Some(capacity);
        sink
    }

    /// Number of adornments currently alive.
    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Number of live adornments of one kind.
    pub fn live_count_of(&self, kind: AdornmentKind) -> usize {
        self.state
            .lock()
            .live
            .values()
            .filter(|record| record.kind == kind)
            .count()
    }

    /// Total adornments ever created.
    pub fn created_count(&self) -> u64 {
        self.state.lock().created
    }

    /// Total adornments ever destroyed.
    pub fn destroyed_count(&self) -> u64 {
        self.state.lock().destroyed
    }

    /// Snapshot of one adornment, if alive.
    pub fn get(&self, handle: AdornmentHandle) -> Option<AdornmentRecord> {
        self.state.lock().live.get(&handle).cloned()
    }

    /// Handles of all live adornments, in creation order.
    pub fn handles(&self) -> Vec<AdornmentHandle> {
        let mut handles: Vec<_> = self.state.lock().live.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Snapshots of all live adornments, in creation order.
    pub fn records(&self) -> Vec<(AdornmentHandle, AdornmentRecord)> {
        let state = self.state.lock();
        let mut records: Vec<_> = state
            .live
            .iter()
            .map(|(handle, record)| (*handle, record.clone()))
            .collect();
        records.sort_unstable_by_key(|(handle, _)| *handle);
        records
    }
}

impl DrawableSink for RecordingSink {
    fn create(
        &mut self,
        kind: AdornmentKind,
        style: &AdornmentStyle,
    ) -> Result<AdornmentHandle, DrawError> {
        let mut state = self.state.lock();
        if state.capacity.is_some_and(|cap| state.live.len() >= cap) {
            return Err(DrawError::OutOfResources);
        }

        state.next_id += 1;
        let handle = AdornmentHandle::from_raw(state.next_id);
        state.live.insert(
            handle,
            AdornmentRecord {
                kind,
                style: *style,
                pose: Pose::identity(),
                color: style.color,
                size: None,
                visible: style.visible,
            },
        );
        state.created += 1;
        log::trace!("RecordingSink: created {} {}", kind.name(), handle);
        Ok(handle)
    }

    fn destroy(&mut self, handle: AdornmentHandle) {
        let mut state = self.state.lock();
        if state.live.remove(&handle).is_some() {
            state.destroyed += 1;
            log::trace!("RecordingSink: destroyed {}", handle);
        } else {
            log::warn!("RecordingSink: destroy of unknown handle {}", handle);
        }
    }

    fn set_pose(&mut self, handle: AdornmentHandle, pose: &Pose) -> Result<(), DrawError> {
        self.state.lock().record_mut(handle)?.pose = *pose;
        Ok(())
    }

    fn set_color(&mut self, handle: AdornmentHandle, color: Color3) -> Result<(), DrawError> {
        self.state.lock().record_mut(handle)?.color = color;
        Ok(())
    }

    fn set_size(
        &mut self,
        handle: AdornmentHandle,
        size: &AdornmentSize,
    ) -> Result<(), DrawError> {
        self.state.lock().record_mut(handle)?.size = Some(*size);
        Ok(())
    }

    fn set_visible(&mut self, handle: AdornmentHandle, visible: bool) -> Result<(), DrawError> {
        self.state.lock().record_mut(handle)?.visible = visible;
        Ok(())
    }
}
