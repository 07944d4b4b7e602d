use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use visualize_core::math::{Pose, Vec3};
use visualize_core::pool::Swappable;

use crate::clock::Recycle;
use crate::config::{Color3, ConfigOverride, Configuration, DefaultSettings};
use crate::error::DrawError;
use crate::geometry::{self, Placement};
use crate::sink::{AdornmentHandle, AdornmentKind, AdornmentStyle, DrawableSink};

/// Primitive families, each backed by its own pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Vector,
    Point,
    Line,
}

/// An adornment owned by a pool, tagged with the shape it was created as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Adornment {
    handle: AdornmentHandle,
    kind: AdornmentKind,
}

/// Occupancy of one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Adornments drawn this tick.
    pub used: usize,
    /// Adornments reusable this tick, destroyed at the next boundary otherwise.
    pub unused: usize,
}

impl PoolStats {
    fn of<T>(pool: &Swappable<T>) -> Self {
        Self {
            used: pool.used_len(),
            unused: pool.unused_len(),
        }
    }

    /// Adornments owned by the pool.
    pub fn total(&self) -> usize {
        self.used + self.unused
    }
}

/// Occupancy of every pool of a [`Visualizer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisualizerStats {
    pub vectors: PoolStats,
    pub points: PoolStats,
    pub lines: PoolStats,
}

impl VisualizerStats {
    /// Stats for one primitive family.
    pub fn get(&self, primitive: Primitive) -> PoolStats {
        match primitive {
            Primitive::Vector => self.vectors,
            Primitive::Point => self.points,
            Primitive::Line => self.lines,
        }
    }

    /// Adornments owned across all pools.
    pub fn total(&self) -> usize {
        self.vectors.total() + self.points.total() + self.lines.total()
    }
}

/// Sink plus the pools whose handles it created.
struct DrawState {
    sink: Box<dyn DrawableSink>,
    vectors: Swappable<Adornment>,
    points: Swappable<Adornment>,
    lines: Swappable<Adornment>,
}

impl DrawState {
    fn draw(
        &mut self,
        primitive: Primitive,
        kind: AdornmentKind,
        placement: &Placement,
        color: Color3,
        config: &Configuration,
    ) -> Result<(), DrawError> {
        let Self {
            sink,
            vectors,
            points,
            lines,
        } = self;
        let pool = match primitive {
            Primitive::Vector => vectors,
            Primitive::Point => points,
            Primitive::Line => lines,
        };

        let reused = match pool.acquire(config.cache_adornments) {
            Some(adornment) if adornment.kind == kind => Some(adornment),
            Some(stale) => {
                // Vector style changed since this one was created.
                log::trace!(
                    "Replacing {} {} with a {}",
                    stale.kind.name(),
                    stale.handle,
                    kind.name()
                );
                sink.destroy(stale.handle);
                None
            }
            None => None,
        };

        let adornment = match reused {
            Some(adornment) => {
                if let Err(err) = sink.set_visible(adornment.handle, true) {
                    sink.destroy(adornment.handle);
                    return Err(err);
                }
                adornment
            }
            None => {
                let style = AdornmentStyle::from_config(config, color);
                let handle = sink.create(kind, &style)?;
                Adornment { handle, kind }
            }
        };

        if let Err(err) = Self::apply(&mut **sink, adornment.handle, placement, color) {
            sink.destroy(adornment.handle);
            return Err(err);
        }

        pool.mark_used(adornment);
        Ok(())
    }

    /// Pose, size and color are re-applied on every draw, reused or not.
    fn apply(
        sink: &mut dyn DrawableSink,
        handle: AdornmentHandle,
        placement: &Placement,
        color: Color3,
    ) -> Result<(), DrawError> {
        sink.set_size(handle, &placement.size())?;
        sink.set_pose(handle, &placement.pose)?;
        sink.set_color(handle, color)
    }

    fn recycle(&mut self) -> usize {
        let Self {
            sink,
            vectors,
            points,
            lines,
        } = self;
        let mut destroyed = 0;
        for pool in [vectors, points, lines] {
            destroyed += pool.recycle(|adornment| sink.destroy(adornment.handle));
        }
        destroyed
    }

    fn clear(&mut self) -> usize {
        let Self {
            sink,
            vectors,
            points,
            lines,
        } = self;
        let mut destroyed = 0;
        for pool in [vectors, points, lines] {
            destroyed += pool.drain(|adornment| sink.destroy(adornment.handle));
        }
        destroyed
    }

    fn stats(&self) -> VisualizerStats {
        VisualizerStats {
            vectors: PoolStats::of(&self.vectors),
            points: PoolStats::of(&self.points),
            lines: PoolStats::of(&self.lines),
        }
    }
}

/// Debug draw instance with its own configuration overlay and pools.
///
/// Every instance is gated by the [`DefaultSettings`] it is bound to: if the
/// defaults disable drawing, no instance draws regardless of its overlay.
///
/// Adornments drawn in one tick stay visible until the next
/// [`recycle`](Self::recycle). With `cache_adornments` on they are reused by
/// draw calls in the following tick; otherwise each call creates a fresh one
/// and the old ones are destroyed one tick later.
///
/// # Example
///
/// ```
/// use visualize::{Color3, ConfigOverride, RecordingSink, Vec3, Visualizer};
///
/// let sink = RecordingSink::new();
/// let visualizer = Visualizer::new(sink.clone());
/// visualizer.configure(&ConfigOverride::new().with_color(Color3::RED));
///
/// visualizer.vector(Vec3::zeros(), Vec3::new(0.0, 0.0, 5.0), None)?;
/// visualizer.line(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0), Some(Color3::GREEN))?;
/// assert_eq!(sink.live_count(), 2);
///
/// visualizer.recycle(); // tick boundary
/// visualizer.recycle(); // nothing redrawn, everything destroyed
/// assert_eq!(sink.live_count(), 0);
/// # Ok::<(), visualize::DrawError>(())
/// ```
pub struct Visualizer {
    defaults: Arc<DefaultSettings>,
    overlay: RwLock<ConfigOverride>,
    state: Mutex<DrawState>,
}

impl Visualizer {
    /// Create an instance bound to the process-wide defaults.
    pub fn new(sink: impl DrawableSink + 'static) -> Self {
        Self::with_defaults(sink, DefaultSettings::global())
    }

    /// Create an instance bound to a specific set of defaults.
    pub fn with_defaults(
        sink: impl DrawableSink + 'static,
        defaults: Arc<DefaultSettings>,
    ) -> Self {
        Self {
            defaults,
            overlay: RwLock::new(ConfigOverride::new()),
            state: Mutex::new(DrawState {
                sink: Box::new(sink),
                vectors: Swappable::new(),
                points: Swappable::new(),
                lines: Swappable::new(),
            }),
        }
    }

    /// Merge settings into this instance's overlay.
    pub fn configure(&self, overlay: &ConfigOverride) {
        self.overlay.write().merge(overlay);
    }

    /// This instance's overlay.
    pub fn overlay(&self) -> ConfigOverride {
        *self.overlay.read()
    }

    /// The defaults this instance is layered on.
    pub fn defaults(&self) -> &Arc<DefaultSettings> {
        &self.defaults
    }

    /// Effective settings, or `None` when drawing is disabled at either scope.
    pub fn config(&self) -> Option<Configuration> {
        self.defaults.resolve(&self.overlay.read())
    }

    /// Check if draw calls on this instance currently draw anything.
    pub fn is_enabled(&self) -> bool {
        self.config().is_some()
    }

    /// Draw a vector from `origin` along `direction`.
    pub fn vector(
        &self,
        origin: Vec3,
        direction: Vec3,
        color: Option<Color3>,
    ) -> Result<(), DrawError> {
        let Some(config) = self.config() else {
            return Ok(());
        };
        let placement = geometry::resolve_vector(origin, direction, &config);
        let kind = geometry::vector_kind(&config);
        self.submit(Primitive::Vector, kind, &placement, color, &config)
    }

    /// Draw a point at `origin`.
    pub fn point(&self, origin: Vec3, color: Option<Color3>) -> Result<(), DrawError> {
        let Some(config) = self.config() else {
            return Ok(());
        };
        let placement = geometry::resolve_point(origin, &config);
        self.submit(
            Primitive::Point,
            AdornmentKind::Sphere,
            &placement,
            color,
            &config,
        )
    }

    /// Draw a line segment between `start` and `finish`.
    pub fn line(&self, start: Vec3, finish: Vec3, color: Option<Color3>) -> Result<(), DrawError> {
        let Some(config) = self.config() else {
            return Ok(());
        };
        let placement = geometry::resolve_line(start, finish, &config);
        self.submit(
            Primitive::Line,
            AdornmentKind::Cylinder,
            &placement,
            color,
            &config,
        )
    }

    /// Draw a pose as its forward vector, `frame_length` long.
    pub fn frame(&self, frame: &Pose, color: Option<Color3>) -> Result<(), DrawError> {
        let Some(config) = self.config() else {
            return Ok(());
        };
        let placement = geometry::resolve_frame(frame, &config);
        let kind = geometry::vector_kind(&config);
        self.submit(Primitive::Vector, kind, &placement, color, &config)
    }

    fn submit(
        &self,
        primitive: Primitive,
        kind: AdornmentKind,
        placement: &Placement,
        color: Option<Color3>,
        config: &Configuration,
    ) -> Result<(), DrawError> {
        let color = color.unwrap_or(config.color);
        self.state
            .lock()
            .draw(primitive, kind, placement, color, config)
    }

    /// Advance every pool by one tick. Returns the number of destroyed adornments.
    ///
    /// Normally driven by a [`FrameClockAdapter`](crate::FrameClockAdapter);
    /// must not run while draw calls for the same tick are still in flight.
    pub fn recycle(&self) -> usize {
        let destroyed = self.state.lock().recycle();
        if destroyed > 0 {
            log::debug!("Visualizer recycled, destroyed {} adornments", destroyed);
        }
        destroyed
    }

    /// Destroy every adornment this instance owns.
    pub fn clear(&self) -> usize {
        self.state.lock().clear()
    }

    /// Current pool occupancy.
    pub fn stats(&self) -> VisualizerStats {
        self.state.lock().stats()
    }
}

impl Recycle for Visualizer {
    fn recycle(&self) -> usize {
        Visualizer::recycle(self)
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        let destroyed = self.state.get_mut().clear();
        if destroyed > 0 {
            log::debug!("Visualizer dropped, destroyed {} adornments", destroyed);
        }
    }
}
