// Package sweeper provides telemetry for expiry sweeping.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::metrics;
use crate::workers::ExpiryBackend;

use super::counters::Counters;

/// Periodically drains the sweep counters into logs and metrics.
pub async fn logger(
    shutdown_token: CancellationToken,
    name: String,
    counters: Arc<Counters>,
    backend: Arc<dyn ExpiryBackend>,
    each: Duration,
) {
    let mut ticker = interval(each);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // first tick fires immediately, nothing to report yet
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                tracing::debug!(svc = "sweeper", name = %name, "logger stopped");
                return;
            }
            _ = ticker.tick() => {
                let (cycles, scanned, evicted) = counters.reset();
                let length = backend.len();

                metrics::add_sweep_stat_counters(cycles, scanned, evicted);
                metrics::set_sessions_length(length);

                if evicted > 0 {
                    tracing::info!(
                        name = %name,
                        component = "sweeper",
                        cycles,
                        scanned,
                        evicted,
                        length,
                        "sweeper stats"
                    );
                } else {
                    tracing::debug!(
                        name = %name,
                        component = "sweeper",
                        cycles,
                        scanned,
                        length,
                        "sweeper stats"
                    );
                }
            }
        }
    }
}
