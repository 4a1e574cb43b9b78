// Package workers exposes backend interfaces used by worker groups.

use std::time::Duration;

/// ExpiryBackend is what the sweeper needs from a store.
pub trait ExpiryBackend: Send + Sync {
    /// Gets the number of records.
    fn len(&self) -> usize;

    /// Checks if there are no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current key set.
    fn keys(&self) -> Vec<String>;

    /// Re-checks staleness of `key` under the store lock and deletes it in the
    /// same critical section. Returns whether the key was removed.
    fn expire_if_stale(&self, key: &str, ttl: Duration) -> bool;
}
