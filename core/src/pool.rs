//! Double-buffered recycling pools.
//!
//! This module provides [`Swappable<T>`], a pair of `used`/`unused` sets that
//! lets per-tick resources (debug adornments, transient scene objects) be
//! reused across ticks instead of recreated for every draw call.
//!
//! # Lifecycle
//!
//! - A value drawn in tick *N* sits in `used`.
//! - At the tick boundary [`Swappable::recycle`] moves it to `unused`, where
//!   it can be picked up again by [`Swappable::acquire`] during tick *N+1*.
//! - If it is still in `unused` at the next boundary it is handed to the
//!   destroy callback.
//!
//! Values are moved in and out by ownership, so a value can never be in both
//! sets at once.
//!
//! # Example
//!
//! ```
//! use visualize_core::pool::Swappable;
//!
//! let mut pool = Swappable::new();
//! pool.mark_used("arrow");
//!
//! // Tick boundary: the arrow becomes reusable.
//! pool.recycle(|_| {});
//! assert_eq!(pool.acquire(true), Some("arrow"));
//!
//! // Not re-marked, so the next boundary has nothing to destroy.
//! let mut destroyed = Vec::new();
//! assert_eq!(pool.recycle(|v| destroyed.push(v)), 0);
//! ```

/// Two disjoint sets of pooled values: acquired this tick and reusable.
///
/// Both sets keep their `Vec` allocations across ticks; [`recycle`](Self::recycle)
/// swaps the buffers rather than reallocating.
#[derive(Debug)]
pub struct Swappable<T> {
    used: Vec<T>,
    unused: Vec<T>,
}

impl<T> Swappable<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            used: Vec::new(),
            unused: Vec::new(),
        }
    }

    /// Take a reusable value out of the pool.
    ///
    /// Returns `None` when the pool has nothing left over from the previous
    /// tick, or always when `caching` is false. Callers are expected to
    /// create a fresh value in that case; it is not an error.
    pub fn acquire(&mut self, caching: bool) -> Option<T> {
        if caching { self.unused.pop() } else { None }
    }

    /// Record a value as drawn during the current tick.
    pub fn mark_used(&mut self, value: T) {
        self.used.push(value);
    }

    /// Advance the pool by one tick.
    ///
    /// Every value still in `unused` survived a full idle tick and is passed
    /// to `destroy`. Afterwards `unused` holds what was drawn this tick and
    /// `used` is empty. Returns the number of destroyed values.
    pub fn recycle(&mut self, mut destroy: impl FnMut(T)) -> usize {
        let destroyed = self.unused.len();
        for value in self.unused.drain(..) {
            destroy(value);
        }
        std::mem::swap(&mut self.used, &mut self.unused);
        destroyed
    }

    /// Destroy every value in both sets, leaving the pool empty.
    pub fn drain(&mut self, mut destroy: impl FnMut(T)) -> usize {
        let count = self.len();
        for value in self.used.drain(..).chain(self.unused.drain(..)) {
            destroy(value);
        }
        count
    }

    /// Number of values drawn this tick.
    pub fn used_len(&self) -> usize {
        self.used.len()
    }

    /// Number of values available for reuse (or pending destruction).
    pub fn unused_len(&self) -> usize {
        self.unused.len()
    }

    /// Total number of values owned by the pool.
    pub fn len(&self) -> usize {
        self.used.len() + self.unused.len()
    }

    /// Check if the pool owns no values.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty() && self.unused.is_empty()
    }

    /// Iterate over values drawn this tick.
    pub fn iter_used(&self) -> impl Iterator<Item = &T> {
        self.used.iter()
    }

    /// Iterate over values available for reuse.
    pub fn iter_unused(&self) -> impl Iterator<Item = &T> {
        self.unused.iter()
    }
}

impl<T> Default for Swappable<T> {
    fn default() -> Self {
        Self::new()
    }
}
