// Demo application: walks a session through create, update, read and expiry.

use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Config, ConfigTrait};
use crate::db::{StoreError, DB};
use crate::model::Data;

/// Extra wait on top of ttl + period before checking that the session is gone.
const EXPIRY_SLACK: Duration = Duration::from_millis(500);

/// Outcome of one demo run.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub session_id: String,
    pub data: Data,
    pub waited: Duration,
    /// None if the run was interrupted before the expiry check.
    pub expired: Option<bool>,
}

/// Encapsulates the demo application state.
#[derive(Clone)]
pub struct App {
    cfg: Config,
    shutdown_token: CancellationToken,
    db: Arc<DB>,
}

impl App {
    /// Creates the session db and starts its sweeper.
    pub fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let db = DB::new(shutdown_token.clone(), cfg.clone()).context("failed to start session db")?;
        Ok(Self {
            cfg,
            shutdown_token,
            db,
        })
    }

    /// Gets the session db.
    pub fn db(&self) -> Arc<DB> {
        self.db.clone()
    }

    /// Creates a session, stores a website in it, reads it back, then waits
    /// long enough for the sweeper to remove it.
    pub async fn run_demo(&self) -> Result<DemoReport> {
        let session_id = self.db.create_session().context("create session")?;
        info!(component = "app", event = "session_created", session_id = %session_id, "created new session");

        let mut data = Data::new();
        data.insert("website".to_string(), json!("example.com"));
        self.db
            .update_session_data(&session_id, data)
            .context("update session data")?;
        info!(component = "app", event = "session_updated", session_id = %session_id, "set website to example.com");

        let data = self
            .db
            .get_session_data(&session_id)
            .context("get session data")?;
        info!(component = "app", event = "session_read", session_id = %session_id, data = ?data, "got session data");

        let waited = self.cfg.ttl() + self.cfg.sweep_period() + EXPIRY_SLACK;
        info!(
            component = "app",
            event = "waiting",
            wait = %humantime::format_duration(waited),
            "waiting for the sweeper"
        );

        let mut report = DemoReport {
            session_id,
            data,
            waited,
            expired: None,
        };

        tokio::select! {
            _ = self.shutdown_token.cancelled() => {
                warn!(component = "app", event = "interrupted", "demo interrupted before expiry check");
                return Ok(report);
            }
            _ = tokio::time::sleep(waited) => {}
        }

        let expired = match self.db.get_session_data(&report.session_id) {
            Err(StoreError::NotFound(_)) => true,
            Ok(_) => false,
            Err(e) => return Err(e).context("get session data after expiry"),
        };
        if expired {
            info!(component = "app", event = "session_expired", session_id = %report.session_id, remaining = self.db.len(), "session was swept");
        } else {
            warn!(component = "app", event = "session_alive", session_id = %report.session_id, "session outlived ttl + period");
        }
        report.expired = Some(expired);

        Ok(report)
    }

    /// Stops background work.
    pub fn close(&self) {
        self.db.close();
    }
}
