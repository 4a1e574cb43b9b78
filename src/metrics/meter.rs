// Metric name constants
pub const SWEEP_CYCLES: &str = "sessions_sweep_cycles";
pub const SWEEP_SCANNED: &str = "sessions_sweep_scanned";
pub const SWEEP_EVICTED: &str = "sessions_sweep_evicted";
pub const SESSIONS_LENGTH: &str = "sessions_length";

/// Adds sweeper counters collected since the previous call.
pub fn add_sweep_stat_counters(cycles: i64, scanned: i64, evicted: i64) {
    ::metrics::counter!(SWEEP_CYCLES).increment(cycles.max(0) as u64);
    ::metrics::counter!(SWEEP_SCANNED).increment(scanned.max(0) as u64);
    ::metrics::counter!(SWEEP_EVICTED).increment(evicted.max(0) as u64);
}

/// Sets the current number of live sessions.
pub fn set_sessions_length(len: usize) {
    ::metrics::gauge!(SESSIONS_LENGTH).set(len as f64);
}
