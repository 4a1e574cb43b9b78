// Session database: record store plus the sweeper that keeps it bounded.

use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Config, ConfigTrait};
use crate::model::Data;
use crate::sid::{KeyGenerator, RandomKeyGenerator};
use crate::workers::{Sweeper, SweeperConfig};

use super::store::{Store, StoreError};

// Constants
const COMP_DB: &str = "db";
pub const SVC_SWEEPER: &str = "session-sweeper";

/// DB owns the session store and supervises its expiry sweeper.
///
/// Client calls go straight to the store; the sweeper runs on its own and
/// only meets client calls at the store lock.
pub struct DB {
    store: Arc<Store>,
    sweeper: Option<Arc<Sweeper>>,
    sweeper_token: CancellationToken,
}

impl DB {
    /// Builds the store with random session ids and starts the sweeper.
    /// Must be called from within a tokio runtime.
    pub fn new(ctx: CancellationToken, cfg: Config) -> Result<Arc<Self>> {
        Self::with_generator(ctx, cfg, Arc::new(RandomKeyGenerator))
    }

    /// Same as [`DB::new`] with a custom key generator.
    pub fn with_generator(
        ctx: CancellationToken,
        cfg: Config,
        generator: Arc<dyn KeyGenerator>,
    ) -> Result<Arc<Self>> {
        cfg.validate()?;
        if cfg.has_loose_sweep_period() {
            warn!(
                component = COMP_DB,
                event = "loose_sweep_period",
                ttl = ?cfg.ttl(),
                period = ?cfg.sweep_period(),
                "sweep period exceeds a third of the ttl, eviction lag may be large"
            );
        }

        let store = Arc::new(Store::new(generator));
        let sweeper_cfg = SweeperConfig::from_cfg(&cfg);
        let sweeper_token = ctx.child_token();

        let sweeper = if sweeper_cfg.is_enabled() {
            let sweeper = Sweeper::new(
                sweeper_token.clone(),
                SVC_SWEEPER.to_string(),
                sweeper_cfg.clone(),
                store.clone(),
            );
            sweeper.serve();
            Some(sweeper)
        } else {
            warn!(
                component = COMP_DB,
                event = "sweeper_disabled",
                "sweeper is disabled, sessions will never expire"
            );
            None
        };

        info!(
            component = COMP_DB,
            event = "started",
            ttl = ?sweeper_cfg.ttl(),
            period = ?sweeper_cfg.period(),
            max_eviction_lag = ?sweeper_cfg.max_eviction_lag(),
            "session db started"
        );

        Ok(Arc::new(Self {
            store,
            sweeper,
            sweeper_token,
        }))
    }

    /// Creates a new session and returns its id.
    pub fn create_session(&self) -> Result<String, StoreError> {
        self.store.create()
    }

    /// Returns the session's data.
    pub fn get_session_data(&self, session_id: &str) -> Result<Data, StoreError> {
        self.store.read(session_id)
    }

    /// Overwrites the session's data and renews its expiry.
    pub fn update_session_data(&self, session_id: &str, data: Data) -> Result<(), StoreError> {
        self.store.update(session_id, data)
    }

    /// Drops the session if it exists.
    pub fn delete_session(&self, session_id: &str) -> bool {
        self.store.delete(session_id)
    }

    /// Gets the number of live sessions.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Checks if there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Gets the underlying store.
    pub fn store(&self) -> Arc<Store> {
        self.store.clone()
    }

    /// Gets the sweeper, if enabled.
    pub fn sweeper(&self) -> Option<Arc<Sweeper>> {
        self.sweeper.clone()
    }

    /// Stops the sweeper. Sessions stay readable but no longer expire.
    pub fn close(&self) {
        if !self.sweeper_token.is_cancelled() {
            self.sweeper_token.cancel();
            info!(component = COMP_DB, event = "closed", "session db closed");
        }
    }
}

impl Drop for DB {
    fn drop(&mut self) {
        self.sweeper_token.cancel();
    }
}
