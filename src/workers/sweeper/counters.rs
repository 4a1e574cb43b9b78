// Package sweeper provides counters for expiry sweeping.

use std::sync::atomic::{AtomicI64, Ordering};

/// Counters for sweep operations.
pub struct Counters {
    /// Completed sweep cycles.
    pub cycles: AtomicI64,
    /// Keys seen in snapshots.
    pub scanned: AtomicI64,
    /// Records removed as stale.
    pub evicted: AtomicI64,
}

impl Counters {
    /// Creates new counters.
    pub fn new() -> Self {
        Self {
            cycles: AtomicI64::new(0),
            scanned: AtomicI64::new(0),
            evicted: AtomicI64::new(0),
        }
    }

    /// Resets all counters and returns their previous values.
    pub fn reset(&self) -> (i64, i64, i64) {
        let cycles = self.cycles.swap(0, Ordering::Relaxed);
        let scanned = self.scanned.swap(0, Ordering::Relaxed);
        let evicted = self.evicted.swap(0, Ordering::Relaxed);
        (cycles, scanned, evicted)
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}
