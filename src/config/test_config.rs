use super::{Config, Logs, SessionsBox, Storage, Sweep};
use std::time::Duration;

/// Creates a new test configuration: 5s TTL swept every second.
pub fn new_test_config() -> Config {
    Config {
        sessions: SessionsBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            storage: Some(Storage {
                ttl: Some(Duration::from_secs(5)),
            }),
            sweeper: Some(Sweep {
                enabled: true,
                period: Some(Duration::from_secs(1)),
                max_in_flight: Some(0),
                log_interval: Some(Duration::from_secs(5)),
            }),
        },
    }
}
