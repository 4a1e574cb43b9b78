// Main entrypoint for the sessionkeeper demo.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use sessionkeeper::app::App;
use sessionkeeper::config::{Config, ConfigTrait};
use sessionkeeper::shutdown::GracefulShutdown;

const CONFIG_PATH: &str = "cfg/sessionkeeper.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/sessionkeeper.cfg.local.yaml";

/// sessionkeeper - in-memory session store with TTL expiry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
fn load_cfg(path: Option<PathBuf>) -> Result<Config> {
    if let Some(custom_path) = path {
        return Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path));
    }

    match Config::load(PathBuf::from(CONFIG_PATH_LOCAL)) {
        Ok(cfg) => Ok(cfg),
        Err(_) => Config::load(PathBuf::from(CONFIG_PATH))
            .with_context(|| format!("failed to load config from {}", CONFIG_PATH)),
    }
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_deref())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?
        .block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    let shutdown_token = CancellationToken::new();

    // Load configuration
    let cfg = load_cfg(args.cfg)?;

    // Configure logger (must be done after config is loaded)
    configure_logger(&cfg);
    info!(component = "config", event = "load_success", ttl = ?cfg.ttl(), period = ?cfg.sweep_period(), "config loaded");

    let graceful_shutdown = GracefulShutdown::new(shutdown_token.clone());
    graceful_shutdown
        .set_graceful_timeout(Duration::from_secs(10))
        .await;

    let app = App::new(shutdown_token.clone(), cfg)?;
    graceful_shutdown.add(1);

    let app_clone = app.clone();
    let graceful_done = graceful_shutdown.clone();
    let token = shutdown_token.clone();
    tokio::task::spawn(async move {
        match app_clone.run_demo().await {
            Ok(report) => info!(
                component = "main",
                event = "demo_finished",
                session_id = %report.session_id,
                expired = ?report.expired,
                "demo finished"
            ),
            Err(e) => error!(
                component = "main",
                event = "demo_failed",
                error = %e,
                "demo failed"
            ),
        }
        app_clone.close();
        graceful_done.done();
        // demo is the whole program, stop once it is over
        token.cancel();
    });

    if let Err(e) = graceful_shutdown.await_shutdown().await {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}
