//! Shared default instance and free-function draw API.
//!
//! [`init`] creates the process-wide [`Visualizer`] once, registers it with
//! the global [`FrameClockAdapter`] and subscribes that adapter to the host
//! clock. After that the free functions draw through it from anywhere.
//! Independent instances from [`instance`] share the same defaults and the
//! same clock subscription but have their own overlay and pools.

use std::sync::{Arc, OnceLock};

use visualize_core::math::{Pose, Vec3};

use crate::clock::{FrameClock, FrameClockAdapter};
use crate::config::{Color3, ConfigOverride, DefaultSettings};
use crate::drawer::Visualizer;
use crate::error::DrawError;
use crate::sink::DrawableSink;

static DEFAULT_INSTANCE: OnceLock<Arc<Visualizer>> = OnceLock::new();

/// Create the shared default instance and start recycling on `clock`.
///
/// Fails with [`DrawError::AlreadyInitialized`] on a second call. If the
/// global adapter is already subscribed (because an earlier host attached
/// it), the existing subscription is kept.
pub fn init(
    sink: impl DrawableSink + 'static,
    clock: &mut dyn FrameClock,
) -> Result<Arc<Visualizer>, DrawError> {
    let mut created = false;
    let visualizer = DEFAULT_INSTANCE.get_or_init(|| {
        created = true;
        Arc::new(Visualizer::new(sink))
    });
    if !created {
        return Err(DrawError::AlreadyInitialized);
    }

    let adapter = FrameClockAdapter::global();
    adapter.register(visualizer);
    if !adapter.is_attached() {
        adapter.attach(clock)?;
    }

    log::info!("Visualize v{} initialized", crate::VERSION);
    Ok(Arc::clone(visualizer))
}

/// The shared default instance, if [`init`] has run.
pub fn default_instance() -> Option<Arc<Visualizer>> {
    DEFAULT_INSTANCE.get().cloned()
}

/// Create an independent instance bound to the process-wide defaults.
///
/// The instance is recycled by the global adapter for as long as the
/// returned `Arc` is alive. The adapter only ticks once [`init`] has attached
/// it to a clock; before that, call [`Visualizer::recycle`] directly.
pub fn instance(sink: impl DrawableSink + 'static) -> Arc<Visualizer> {
    let visualizer = Arc::new(Visualizer::new(sink));
    FrameClockAdapter::global().register(&visualizer);
    visualizer
}

/// Merge settings into the process-wide defaults.
///
/// Affects every instance that does not override the same fields. Setting
/// `enabled: false` here silences all instances.
pub fn configure(overlay: &ConfigOverride) {
    DefaultSettings::global().configure(overlay);
}

fn with_default(draw: impl FnOnce(&Visualizer) -> Result<(), DrawError>) -> Result<(), DrawError> {
    let visualizer = DEFAULT_INSTANCE.get().ok_or(DrawError::NotInitialized)?;
    draw(visualizer)
}

/// Draw a vector on the default instance.
pub fn vector(origin: Vec3, direction: Vec3, color: Option<Color3>) -> Result<(), DrawError> {
    with_default(|v| v.vector(origin, direction, color))
}

/// Draw a point on the default instance.
pub fn point(origin: Vec3, color: Option<Color3>) -> Result<(), DrawError> {
    with_default(|v| v.point(origin, color))
}

/// Draw a line on the default instance.
pub fn line(start: Vec3, finish: Vec3, color: Option<Color3>) -> Result<(), DrawError> {
    with_default(|v| v.line(start, finish, color))
}

/// Draw a frame on the default instance.
pub fn frame(frame: &Pose, color: Option<Color3>) -> Result<(), DrawError> {
    with_default(|v| v.frame(frame, color))
}
