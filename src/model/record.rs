//! Session record stored under a single key.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::time;

/// Opaque payload carried by a record. Never interpreted by the store.
pub type Data = HashMap<String, serde_json::Value>;

/// Record is the value side of the store map.
/// Only the store holds records; callers receive copies of the fields they asked for.
#[derive(Debug, Clone)]
pub struct Record {
    data: Data,
    last_update: Instant,
}

impl Record {
    /// Creates an empty record stamped with the current instant.
    pub fn new() -> Self {
        Self {
            data: Data::new(),
            last_update: time::now(),
        }
    }

    /// Gets the payload.
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Gets the instant of the last successful create or update.
    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    /// Replaces the payload wholesale and refreshes the timestamp.
    pub fn replace(&mut self, data: Data) {
        self.data = data;
        // keeps last_update non-decreasing even if the clock source misbehaves
        self.last_update = self.last_update.max(time::now());
    }

    /// Reports whether the record outlived `ttl` since its last update.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        time::is_stale(self.last_update, ttl)
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}
