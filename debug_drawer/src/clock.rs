//! Per-tick recycling signal.
//!
//! A [`FrameClock`] is whatever the host uses to mark tick boundaries: a
//! fixed simulation step on servers, a render frame on clients. The
//! [`FrameClockAdapter`] subscribes to it once and recycles every registered
//! [`Recycle`] target on each tick.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use visualize::{FrameClockAdapter, ManualClock, RecordingSink, Vec3, Visualizer};
//!
//! let mut clock = ManualClock::new();
//! let adapter = Arc::new(FrameClockAdapter::new());
//! adapter.attach(&mut clock)?;
//!
//! let sink = RecordingSink::new();
//! let visualizer = Arc::new(Visualizer::new(sink.clone()));
//! adapter.register(&visualizer);
//!
//! visualizer.point(Vec3::zeros(), None)?;
//! clock.tick(); // point becomes reusable
//! clock.tick(); // point was not redrawn, destroyed
//! assert_eq!(sink.live_count(), 0);
//! # Ok::<(), visualize::DrawError>(())
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::DrawError;

/// Callback invoked once per tick.
pub type TickCallback = Box<dyn FnMut() + Send>;

/// Source of tick boundaries.
pub trait FrameClock {
    /// Register a callback fired at every tick boundary.
    fn subscribe(&mut self, callback: TickCallback);
}

/// Something that owns pools and can advance them by one tick.
pub trait Recycle: Send + Sync {
    /// Advance by one tick. Returns the number of destroyed resources.
    fn recycle(&self) -> usize;
}

/// Clock that ticks when the host says so, e.g. once per rendered frame.
#[derive(Default)]
pub struct ManualClock {
    subscribers: Vec<TickCallback>,
    ticks: u64,
}

impl ManualClock {
    /// Create a clock with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire one tick.
    pub fn tick(&mut self) {
        self.ticks += 1;
        for callback in &mut self.subscribers {
            callback();
        }
    }

    /// Number of ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

impl FrameClock for ManualClock {
    fn subscribe(&mut self, callback: TickCallback) {
        self.subscribers.push(callback);
    }
}

/// Fixed-timestep clock for simulation loops.
///
/// Elapsed time is accumulated by [`advance`](Self::advance); one tick fires
/// per whole step. At most `max_steps` ticks fire per call so a long stall
/// does not trigger a burst of recycling.
pub struct FixedStepClock {
    step: Duration,
    accumulator: Duration,
    max_steps: u32,
    inner: ManualClock,
}

impl FixedStepClock {
    /// Default cap on ticks fired per [`advance`](Self::advance).
    pub const DEFAULT_MAX_STEPS: u32 = 8;

    /// Create a clock ticking `rate_hz` times per simulated second.
    pub fn new(rate_hz: u32) -> Self {
        Self::with_step(Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1))))
    }

    /// Create a clock with an explicit step duration.
    ///
    /// A zero step never fires.
    pub fn with_step(step: Duration) -> Self {
        if step.is_zero() {
            log::warn!("FixedStepClock: zero step, the clock will never tick");
        }
        Self {
            step,
            accumulator: Duration::ZERO,
            max_steps: Self::DEFAULT_MAX_STEPS,
            inner: ManualClock::new(),
        }
    }

    /// Set the cap on ticks fired per [`advance`](Self::advance).
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Duration of one step.
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add elapsed time and fire the ticks that became due.
    ///
    /// Returns the number of ticks fired. Time beyond the step cap is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }

        self.accumulator += elapsed;
        let mut fired = 0;
        while self.accumulator >= self.step && fired < self.max_steps {
            self.accumulator -= self.step;
            self.inner.tick();
            fired += 1;
        }
        if self.accumulator >= self.step {
            log::debug!(
                "FixedStepClock: dropping {:?} after {} steps",
                self.accumulator,
                fired
            );
            self.accumulator = Duration::ZERO;
        }
        fired
    }

    /// Number of ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.inner.tick_count()
    }
}

impl FrameClock for FixedStepClock {
    fn subscribe(&mut self, callback: TickCallback) {
        self.inner.subscribe(callback);
    }
}

static GLOBAL_ADAPTER: LazyLock<Arc<FrameClockAdapter>> =
    LazyLock::new(|| Arc::new(FrameClockAdapter::new()));

/// Registry of recycle targets driven by a single clock subscription.
///
/// Targets are held weakly; dropped ones are pruned on the next tick. Order
/// among targets is unspecified.
pub struct FrameClockAdapter {
    targets: Mutex<Vec<Weak<dyn Recycle>>>,
    attached: AtomicBool,
    ticks: AtomicU64,
}

impl FrameClockAdapter {
    /// Create an adapter with no targets and no clock.
    pub fn new() -> Self {
        Self {
            targets: Mutex::new(Vec::new()),
            attached: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
        }
    }

    /// The adapter shared by the whole process.
    pub fn global() -> Arc<FrameClockAdapter> {
        Arc::clone(&GLOBAL_ADAPTER)
    }

    /// Add a target to recycle on every tick.
    ///
    /// Targets that were dropped since the last call are pruned here as well
    /// as on every tick.
    pub fn register<R: Recycle + 'static>(&self, target: &Arc<R>) {
        let target: Weak<R> = Arc::downgrade(target);
        let target: Weak<dyn Recycle> = target;
        let mut targets = self.targets.lock();
        targets.retain(|target| target.strong_count() > 0);
        targets.push(target);
    }

    /// Subscribe to `clock`. Only one subscription is allowed per adapter.
    pub fn attach(self: &Arc<Self>, clock: &mut dyn FrameClock) -> Result<(), DrawError> {
        if self
            .attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("FrameClockAdapter: already attached to a clock, ignoring");
            return Err(DrawError::ClockAlreadyAttached);
        }

        let adapter = Arc::downgrade(self);
        clock.subscribe(Box::new(move || {
            if let Some(adapter) = adapter.upgrade() {
                adapter.tick();
            }
        }));
        Ok(())
    }

    /// Check if the adapter is subscribed to a clock.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Recycle every live target. Returns the number of destroyed resources.
    pub fn tick(&self) -> usize {
        let live: Vec<Arc<dyn Recycle>> = {
            let mut targets = self.targets.lock();
            targets.retain(|target| target.strong_count() > 0);
            targets.iter().filter_map(Weak::upgrade).collect()
        };

        // Recycle outside the registry lock so targets can be registered
        // from within a recycle.
        let destroyed: usize = live.iter().map(|target| target.recycle()).sum();
        let tick = self.ticks.fetch_add(1, Ordering::AcqRel) + 1;
        log::trace!(
            "FrameClockAdapter: tick {} recycled {} targets, destroyed {}",
            tick,
            live.len(),
            destroyed
        );
        destroyed
    }

    /// Number of ticks processed.
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Number of registered targets that are still alive.
    pub fn target_count(&self) -> usize {
        self.targets
            .lock()
            .iter()
            .filter(|target| target.strong_count() > 0)
            .count()
    }
}

impl Default for FrameClockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Counter {
        recycles: AtomicUsize,
    }

    impl Recycle for Counter {
        fn recycle(&self) -> usize {
            self.recycles.fetch_add(1, Ordering::Relaxed);
            1
        }
    }

    impl Counter {
        fn count(&self) -> usize {
            self.recycles.load(Ordering::Relaxed)
        }
    }

    #[test]
    fn test_manual_clock_fires_subscribers() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut clock = ManualClock::new();
        let counter = Arc::clone(&hits);
        clock.subscribe(Box::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));

        clock.tick();
        clock.tick();
        assert_eq!(hits.load(Ordering::Relaxed), 2);
        assert_eq!(clock.tick_count(), 2);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut clock = FixedStepClock::with_step(Duration::from_millis(10));
        assert_eq!(clock.advance(Duration::from_millis(4)), 0);
        assert_eq!(clock.advance(Duration::from_millis(7)), 1);
        assert_eq!(clock.advance(Duration::from_millis(29)), 3);
        assert_eq!(clock.tick_count(), 4);
    }

    #[test]
    fn test_fixed_step_caps_bursts() {
        let mut clock = FixedStepClock::with_step(Duration::from_millis(10))
            .with_max_steps(2);
        assert_eq!(clock.advance(Duration::from_secs(1)), 2);
        // The backlog was dropped rather than replayed.
        assert_eq!(clock.advance(Duration::from_millis(5)), 0);
    }

    #[test]
    fn test_fixed_step_rate() {
        let clock = FixedStepClock::new(60);
        assert!(clock.step().as_nanos().abs_diff(16_666_667) <= 1);
    }

    #[test]
    fn test_fixed_step_does_not_drift() {
        let mut clock = FixedStepClock::new(60);
        let fired: u32 = (0..60)
            .map(|_| clock.advance(Duration::from_secs_f64(1.0 / 60.0)))
            .sum();
        assert_eq!(fired, 60);
    }

    #[test]
    fn test_fixed_step_high_rate_still_ticks() {
        let mut clock = FixedStepClock::new(2_000_000).with_max_steps(u32::MAX);
        assert!(clock.step().as_nanos().abs_diff(500) <= 1);
        assert!(clock.advance(Duration::from_micros(1)) >= 1);
    }

    #[test]
    fn test_adapter_ticks_registered_targets() {
        let adapter = FrameClockAdapter::new();
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        adapter.register(&a);
        adapter.register(&b);

        assert_eq!(adapter.tick(), 2);
        assert_eq!(adapter.tick(), 2);
        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 2);
        assert_eq!(adapter.tick_count(), 2);
    }

    #[test]
    fn test_adapter_prunes_dropped_targets() {
        let adapter = FrameClockAdapter::new();
        let kept = Arc::new(Counter::default());
        let dropped = Arc::new(Counter::default());
        adapter.register(&kept);
        adapter.register(&dropped);
        assert_eq!(adapter.target_count(), 2);

        drop(dropped);
        assert_eq!(adapter.tick(), 1);
        assert_eq!(adapter.target_count(), 1);
        assert_eq!(kept.count(), 1);
    }

    #[test]
    fn test_register_prunes_dropped_targets_without_ticking() {
        let adapter = FrameClockAdapter::new();
        for _ in 0..100 {
            let target = Arc::new(Counter::default());
            adapter.register(&target);
        }
        let kept = Arc::new(Counter::default());
        adapter.register(&kept);

        assert_eq!(adapter.targets.lock().len(), 1);
        assert_eq!(adapter.target_count(), 1);
        assert_eq!(adapter.tick_count(), 0);
    }

    #[test]
    fn test_attach_once() {
        let adapter = Arc::new(FrameClockAdapter::new());
        let target = Arc::new(Counter::default());
        adapter.register(&target);

        let mut clock = ManualClock::new();
        adapter.attach(&mut clock).unwrap();
        assert!(adapter.is_attached());

        let mut other = ManualClock::new();
        assert_eq!(adapter.attach(&mut other), Err(DrawError::ClockAlreadyAttached));

        clock.tick();
        other.tick();
        assert_eq!(target.count(), 1);
    }

    #[test]
    fn test_clock_outliving_adapter() {
        let mut clock = ManualClock::new();
        let adapter = Arc::new(FrameClockAdapter::new());
        adapter.attach(&mut clock).unwrap();
        drop(adapter);
        clock.tick();
    }
}
