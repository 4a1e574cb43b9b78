//! Mutex-guarded record map.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::model::{Data, Record};
use crate::sid::KeyGenerator;
use crate::workers::ExpiryBackend;

use super::error::StoreError;

/// Store owns every record behind one exclusive lock.
///
/// Each method takes the lock for its whole body and copies out whatever it
/// returns, so no reference into the map survives a critical section.
pub struct Store {
    generator: Arc<dyn KeyGenerator>,
    records: Mutex<HashMap<String, Record>>,
}

impl Store {
    /// Creates an empty store that draws keys from `generator`.
    pub fn new(generator: Arc<dyn KeyGenerator>) -> Self {
        Self {
            generator,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Inserts an empty record under a freshly generated key.
    pub fn create(&self) -> Result<String, StoreError> {
        let key = self.generator.generate()?;
        self.records.lock().insert(key.clone(), Record::new());
        trace!(component = "store", event = "created", key = %key, "record created");
        Ok(key)
    }

    /// Returns a copy of the record's payload.
    pub fn read(&self, key: &str) -> Result<Data, StoreError> {
        self.records
            .lock()
            .get(key)
            .map(|record| record.data().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Replaces the payload wholesale and refreshes the record's timestamp.
    pub fn update(&self, key: &str, data: Data) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        match records.get_mut(key) {
            Some(record) => {
                record.replace(data);
                trace!(component = "store", event = "updated", key = %key, "record updated");
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    /// Removes the key if present. Returns whether anything was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.records.lock().remove(key).is_some()
    }

    /// Returns the instant of the record's last create or update.
    pub fn last_update(&self, key: &str) -> Result<Instant, StoreError> {
        self.records
            .lock()
            .get(key)
            .map(Record::last_update)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Copies the current key set.
    pub fn keys(&self) -> Vec<String> {
        self.records.lock().keys().cloned().collect()
    }

    /// Deletes the record if its current timestamp is older than `ttl`.
    ///
    /// Staleness is decided and acted upon under one lock acquisition, so an
    /// update that got the lock first always wins.
    pub fn expire_if_stale(&self, key: &str, ttl: Duration) -> bool {
        let mut records = self.records.lock();
        let stale = match records.get(key) {
            Some(record) => record.is_stale(ttl),
            None => return false,
        };
        if stale {
            records.remove(key);
            drop(records);
            debug!(component = "store", event = "expired", key = %key, "session is clean available, removed");
        }
        stale
    }

    /// Gets the number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Checks if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl ExpiryBackend for Store {
    fn len(&self) -> usize {
        Store::len(self)
    }

    fn keys(&self) -> Vec<String> {
        Store::keys(self)
    }

    fn expire_if_stale(&self, key: &str, ttl: Duration) -> bool {
        Store::expire_if_stale(self, key, ttl)
    }
}
