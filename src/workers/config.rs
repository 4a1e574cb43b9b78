// Package workers provides worker configuration.

use std::time::Duration;

use crate::config::{Config, ConfigTrait};

/// SweeperConfig holds the tunables of the expiry sweeper.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    enabled: bool,
    ttl: Duration,
    period: Duration,
    max_in_flight: usize,
    log_interval: Duration,
}

impl SweeperConfig {
    /// Creates a new SweeperConfig. `max_in_flight == 0` means unbounded fan-out.
    pub fn new(
        enabled: bool,
        ttl: Duration,
        period: Duration,
        max_in_flight: usize,
        log_interval: Duration,
    ) -> Self {
        Self {
            enabled,
            ttl,
            period,
            max_in_flight,
            log_interval,
        }
    }

    /// Builds the sweeper section out of the application config.
    pub fn from_cfg(cfg: &Config) -> Self {
        Self::new(
            cfg.is_sweeper_enabled(),
            cfg.ttl(),
            cfg.sweep_period(),
            cfg.sweep_max_in_flight(),
            cfg.sweep_log_interval(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn log_interval(&self) -> Duration {
        self.log_interval
    }

    /// Worst-case lag between a record going stale and its removal.
    pub fn max_eviction_lag(&self) -> Duration {
        self.ttl + self.period
    }
}
