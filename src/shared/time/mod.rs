//! Monotonic time helpers shared by the store and the sweeper.
//!
//! Everything goes through `tokio::time::Instant`, so a paused test runtime
//! drives record ages and sweep ticks from the same virtual clock.

use std::time::Duration;
use tokio::time::Instant;

/// Returns the current monotonic instant.
pub fn now() -> Instant {
    Instant::now()
}

/// Returns the duration elapsed since the given instant (zero if it lies in the future).
pub fn since(t: Instant) -> Duration {
    now().saturating_duration_since(t)
}

/// Reports whether more than `ttl` has passed since `last_update`.
pub fn is_stale(last_update: Instant, ttl: Duration) -> bool {
    since(last_update) > ttl
}
