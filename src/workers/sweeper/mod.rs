//! Expiry sweeper worker.

pub mod counters;
pub mod sweeper;
pub mod telemetry;

#[cfg(test)]
mod sweeper_test;

// Re-export main types
pub use sweeper::{Sweeper, SweeperState};
