// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
pub const DEV: &str = "dev";
#[allow(dead_code)]
pub const DEBUG: &str = "debug";
#[allow(dead_code)]
pub const TEST: &str = "test";

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Sessions {
    #[serde(rename = "sessions")]
    pub sessions: SessionsBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionsBox {
    pub env: String,
    pub logs: Option<Logs>,
    #[serde(alias = "store")]
    pub storage: Option<Storage>,
    pub sweeper: Option<Sweep>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Storage {
    #[serde(default, with = "humantime_serde")]
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Sweep {
    pub enabled: bool,
    #[serde(default, with = "humantime_serde")]
    pub period: Option<Duration>,
    #[serde(rename = "max_in_flight", default)]
    pub max_in_flight: Option<usize>,
    #[serde(rename = "log_interval", default, with = "humantime_serde")]
    pub log_interval: Option<Duration>,
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    #[allow(dead_code)]
    fn is_debug(&self) -> bool;
    #[allow(dead_code)]
    fn is_dev(&self) -> bool;
    #[allow(dead_code)]
    fn is_test(&self) -> bool;
    fn storage(&self) -> Option<&Storage>;
    fn sweeper(&self) -> Option<&Sweep>;
    fn ttl(&self) -> Duration;
    fn is_sweeper_enabled(&self) -> bool;
    fn sweep_period(&self) -> Duration;
    fn sweep_max_in_flight(&self) -> usize;
    fn sweep_log_interval(&self) -> Duration;
}

// Config type alias for convenience
pub type Config = Sessions;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.sessions.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.sessions.env == PROD
    }

    fn is_debug(&self) -> bool {
        self.sessions.env == DEBUG
    }

    fn is_dev(&self) -> bool {
        self.sessions.env == DEV
    }

    fn is_test(&self) -> bool {
        self.sessions.env == TEST
    }

    fn storage(&self) -> Option<&Storage> {
        self.sessions.storage.as_ref()
    }

    fn sweeper(&self) -> Option<&Sweep> {
        self.sessions.sweeper.as_ref()
    }

    fn ttl(&self) -> Duration {
        self.storage().and_then(|s| s.ttl).unwrap_or(DEFAULT_TTL)
    }

    fn is_sweeper_enabled(&self) -> bool {
        // no section means the defaults, which sweep
        self.sweeper().map(|s| s.enabled).unwrap_or(true)
    }

    fn sweep_period(&self) -> Duration {
        self.sweeper()
            .and_then(|s| s.period)
            .unwrap_or(DEFAULT_SWEEP_PERIOD)
    }

    fn sweep_max_in_flight(&self) -> usize {
        self.sweeper().and_then(|s| s.max_in_flight).unwrap_or(0)
    }

    fn sweep_log_interval(&self) -> Duration {
        self.sweeper()
            .and_then(|s| s.log_interval)
            .unwrap_or(DEFAULT_LOG_INTERVAL)
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Resolve absolute path
        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        // Read file
        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::from_yaml(&data).with_context(|| format!("load config from {:?}", abs_path))
    }

    /// Parses and validates configuration from a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Sessions = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the timing parameters: both must be non-zero and the period
    /// must be shorter than the TTL.
    pub fn validate(&self) -> Result<()> {
        let ttl = self.ttl();
        let period = self.sweep_period();

        if ttl.is_zero() {
            anyhow::bail!("storage.ttl must be > 0");
        }
        if period.is_zero() {
            anyhow::bail!("sweeper.period must be > 0");
        }
        if period >= ttl {
            anyhow::bail!(
                "sweeper.period ({:?}) must be shorter than storage.ttl ({:?})",
                period,
                ttl
            );
        }
        if self.sweep_log_interval().is_zero() {
            anyhow::bail!("sweeper.log_interval must be > 0");
        }
        Ok(())
    }

    /// Reports a valid but loose period: above a third of the TTL the
    /// eviction lag grows past the usual bound.
    pub fn has_loose_sweep_period(&self) -> bool {
        self.sweep_period() > self.ttl() / 3
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sessions: SessionsBox {
                env: DEV.to_string(),
                logs: None,
                storage: None,
                sweeper: None,
            },
        }
    }
}


// Test config is always available for integration tests
mod test_config;
#[allow(dead_code)]
pub use test_config::new_test_config;
