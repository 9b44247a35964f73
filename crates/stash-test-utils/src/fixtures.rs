//! Drop tallies, recorders and counters.
//!
//! All fixtures are `Send + Sync` where they share state, so the same
//! fixture works for thread-local containers and for worker-pool tasks.

use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared count of how many [`Tracked`] values have been dropped.
#[derive(Clone, Debug, Default)]
pub struct DropTally {
    drops: Arc<AtomicUsize>,
}

impl DropTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `value` so that dropping it bumps this tally.
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            tally: self.clone(),
        }
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

/// A value that reports its own drop to a [`DropTally`].
#[derive(Debug)]
pub struct Tracked<T> {
    pub value: T,
    tally: DropTally,
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.tally.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// A move-only resource whose recorded value is observable from outside.
///
/// Not `Clone`: a closure capturing a `Recorder` is itself move-only.
#[derive(Debug)]
pub struct Recorder {
    slot: Arc<AtomicI64>,
}

impl Recorder {
    /// Create a recorder holding `initial`, plus a view onto its value.
    pub fn new(initial: i64) -> (Self, RecorderView) {
        let slot = Arc::new(AtomicI64::new(initial));
        (
            Self {
                slot: Arc::clone(&slot),
            },
            RecorderView { slot },
        )
    }

    pub fn record(&mut self, value: i64) {
        self.slot.store(value, Ordering::SeqCst);
    }
}

/// Read-only view onto a [`Recorder`].
#[derive(Clone, Debug)]
pub struct RecorderView {
    slot: Arc<AtomicI64>,
}

impl RecorderView {
    pub fn get(&self) -> i64 {
        self.slot.load(Ordering::SeqCst)
    }
}

/// Hit counter with both `&self` and `&mut self` methods.
#[derive(Debug, Default)]
pub struct Counter {
    hits: AtomicU32,
}

impl Counter {
    pub fn new(start: u32) -> Self {
        Self {
            hits: AtomicU32::new(start),
        }
    }

    /// Add one and return the new count.
    pub fn increment(&self) -> u32 {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Add `n` through exclusive access and return the new count.
    pub fn add(&mut self, n: u32) -> u32 {
        let hits = self.hits.get_mut();
        *hits += n;
        *hits
    }

    /// Current count multiplied by `factor`.
    pub fn scaled(&self, factor: u32) -> u32 {
        self.get() * factor
    }

    pub fn get(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Error returned by deliberately failing in-place constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitFailed;

impl fmt::Display for InitFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("construction failed")
    }
}

impl std::error::Error for InitFailed {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_each_drop_once() {
        let tally = DropTally::new();
        let a = tally.track(1);
        let b = tally.track(2);
        drop(a);
        assert_eq!(tally.drops(), 1);
        drop(b);
        assert_eq!(tally.drops(), 2);
    }

    #[test]
    fn recorder_view_sees_updates() {
        let (mut recorder, view) = Recorder::new(0);
        recorder.record(5);
        assert_eq!(view.get(), 5);
    }

    #[test]
    fn counter_methods() {
        let mut counter = Counter::new(1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.add(3), 5);
        assert_eq!(counter.scaled(2), 10);
    }
}
