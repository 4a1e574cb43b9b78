// Common test utilities for scenario tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::config::{self, Config};
use crate::db::DB;
use crate::model::Data;

pub const TTL: Duration = Duration::from_secs(5);
pub const PERIOD: Duration = Duration::from_secs(1);

/// Builds a test config with the given timing.
pub fn new_config(ttl: Duration, period: Duration) -> Config {
    let mut cfg = config::new_test_config();
    if let Some(storage) = cfg.sessions.storage.as_mut() {
        storage.ttl = Some(ttl);
    }
    if let Some(sweeper) = cfg.sessions.sweeper.as_mut() {
        sweeper.period = Some(period);
        // keep counters untouched by the stats logger
        sweeper.log_interval = Some(Duration::from_secs(3600));
    }
    cfg
}

/// Starts a session db with a running sweeper. Needs a tokio runtime.
pub fn new_db(ttl: Duration, period: Duration) -> (Arc<DB>, CancellationToken) {
    let token = CancellationToken::new();
    let db = DB::new(token.clone(), new_config(ttl, period)).expect("failed to start db");
    (db, token)
}

/// Payload with a single "website" field.
pub fn website(v: &str) -> Data {
    let mut data = Data::new();
    data.insert("website".to_string(), json!(v));
    data
}

/// Lets every ready task run on a paused runtime without moving time much.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
