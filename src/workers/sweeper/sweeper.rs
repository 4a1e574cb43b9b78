//! Expiry sweeper: periodically removes records that outlived their TTL.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::workers::{ExpiryBackend, SweeperConfig};

use super::counters::Counters;
use super::telemetry;

/// Observable phase of the sweep loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SweeperState {
    /// Waiting for the next tick.
    Idle = 0,
    /// Snapshot taken, per-key checks being dispatched.
    Sweeping = 1,
}

impl From<u8> for SweeperState {
    fn from(v: u8) -> Self {
        match v {
            1 => SweeperState::Sweeping,
            _ => SweeperState::Idle,
        }
    }
}

/// Sweeper wakes every period, snapshots the keys and spawns one
/// check-and-delete task per key.
///
/// The snapshot is only a list of candidates. Every task re-reads the record
/// under the store lock, so an update that lands after the snapshot keeps the
/// record alive. Dispatched tasks are never awaited: tasks of one cycle may
/// still be running when the next cycle starts.
pub struct Sweeper {
    shutdown_token: CancellationToken,
    cfg: SweeperConfig,
    name: String,
    backend: Arc<dyn ExpiryBackend>,
    in_flight: Option<Arc<Semaphore>>,
    state: AtomicU8,
    inited: AtomicBool,
    counters: Arc<Counters>,
}

impl Sweeper {
    /// Creates a new sweeper. Nothing runs until [`Sweeper::serve`] is called.
    pub fn new(
        shutdown_token: CancellationToken,
        name: String,
        cfg: SweeperConfig,
        backend: Arc<dyn ExpiryBackend>,
    ) -> Arc<Self> {
        let in_flight = match cfg.max_in_flight() {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        Arc::new(Self {
            shutdown_token,
            cfg,
            name,
            backend,
            in_flight,
            state: AtomicU8::new(SweeperState::Idle as u8),
            inited: AtomicBool::new(false),
            counters: Arc::new(Counters::new()),
        })
    }

    /// Gets the sweeper name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the configuration.
    pub fn cfg(&self) -> &SweeperConfig {
        &self.cfg
    }

    /// Gets the current loop phase.
    pub fn state(&self) -> SweeperState {
        SweeperState::from(self.state.load(Ordering::Acquire))
    }

    /// Gets the sweep counters.
    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }

    /// Reports whether the sweep loop was started.
    pub fn is_serving(&self) -> bool {
        self.inited.load(Ordering::Acquire)
    }

    /// Starts the sweep loop and its stats logger.
    /// Returns false if the sweeper was already started.
    pub fn serve(self: &Arc<Self>) -> bool {
        if self
            .inited
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(name = %self.name, "sweeper already serving, nothing to change");
            return false;
        }

        let shutdown_token = self.shutdown_token.clone();
        let name = self.name.clone();
        let counters = self.counters.clone();
        let backend = self.backend.clone();
        let each = self.cfg.log_interval();
        tokio::task::spawn(async move {
            telemetry::logger(shutdown_token, name, counters, backend, each).await;
        });

        let sweeper = self.clone();
        tokio::task::spawn(async move {
            sweeper.run().await;
        });

        true
    }

    async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.cfg.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first immediate tick
        ticker.tick().await;

        info!(
            name = %self.name,
            ttl = ?self.cfg.ttl(),
            period = ?self.cfg.period(),
            max_in_flight = self.cfg.max_in_flight(),
            "sweeper started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    info!(name = %self.name, "sweeper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.sweep();
                }
            }
        }
    }

    /// Runs one sweep cycle: snapshot the keys, dispatch a check per key and
    /// return without waiting for the checks. Returns the number of dispatched checks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn sweep(&self) -> usize {
        self.state.store(SweeperState::Sweeping as u8, Ordering::Release);

        let keys = self.backend.keys();
        let dispatched = keys.len();
        for key in keys {
            self.dispatch(key);
        }

        self.counters.cycles.fetch_add(1, Ordering::Relaxed);
        self.counters
            .scanned
            .fetch_add(dispatched as i64, Ordering::Relaxed);
        self.state.store(SweeperState::Idle as u8, Ordering::Release);

        if dispatched > 0 {
            debug!(name = %self.name, dispatched, "sweep cycle dispatched");
        }
        dispatched
    }

    fn dispatch(&self, key: String) {
        let backend = self.backend.clone();
        let counters = self.counters.clone();
        let in_flight = self.in_flight.clone();
        let ttl = self.cfg.ttl();

        tokio::task::spawn(async move {
            let _permit = match in_flight {
                Some(sem) => match sem.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    // semaphore is never closed while the sweeper lives
                    Err(_) => return,
                },
                None => None,
            };

            if backend.expire_if_stale(&key, ttl) {
                counters.evicted.fetch_add(1, Ordering::Relaxed);
            }
        });
    }
}
