//! Metrics emitted through the `metrics` facade.
//!
//! No exporter is installed here; whatever recorder the host process sets up
//! receives these values.

pub mod meter;

// Re-export commonly used items
pub use meter::*;
