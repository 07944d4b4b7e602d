//! Pooled debug adornments for simulation and render loops.
//!
//! Callers submit transient primitives every tick (a vector, a point, a line
//! segment, a pose) and the drawer renders them through a small set of
//! recycled host drawables instead of allocating one per call.
//!
//! # Architecture
//!
//! - [`Configuration`] / [`ConfigOverride`]: visual settings, layered as
//!   process-wide [`DefaultSettings`] plus a per-instance overlay
//! - [`geometry`]: pure pose and size derivation per primitive
//! - [`Visualizer`]: draw dispatcher owning one recycling pool per primitive
//! - [`DrawableSink`]: host interface that creates, mutates and destroys drawables
//! - [`FrameClockAdapter`]: recycles every registered instance once per tick
//!
//! # Usage
//!
//! ```ignore
//! // Setup (once)
//! let mut clock = FixedStepClock::new(60);
//! visualize::init(MySceneSink::new(scene), &mut clock)?;
//!
//! // Any time during a tick:
//! visualize::vector(origin, velocity, Some(Color3::RED))?;
//! visualize::line(a, b, None)?;
//! visualize::frame(&body_pose, None)?;
//!
//! // Host loop:
//! clock.advance(dt); // recycles once per elapsed step
//! ```

mod clock;
mod config;
mod drawer;
mod error;
pub mod geometry;
mod global;
mod recording;
mod sink;

pub use clock::{
    FixedStepClock, FrameClock, FrameClockAdapter, ManualClock, Recycle, TickCallback,
};
pub use config::{Color3, ConfigOverride, Configuration, DefaultSettings};
pub use drawer::{PoolStats, Primitive, Visualizer, VisualizerStats};
pub use error::DrawError;
pub use global::{configure, default_instance, frame, init, instance, line, point, vector};
pub use recording::{AdornmentRecord, RecordingSink};
pub use sink::{
    ADORNMENT_Z_INDEX, AdornmentHandle, AdornmentKind, AdornmentSize, AdornmentStyle,
    DrawableSink,
};
pub use visualize_core::math::{Pose, Vec3};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
