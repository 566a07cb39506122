//! Gatewatch server binary.
//!
//! This is the main entry point that wires together the reading store, the
//! liveness engine, the background sweep, and the HTTP API. It loads
//! configuration, initializes all subsystems, and serves requests until
//! the process is terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `gatewatch-config.yaml`
//! 3. Validate the timezone and create the shared wall clock
//! 4. Create the reading store
//! 5. Create the liveness engine
//! 6. Spawn the background sweep task
//! 7. Serve the HTTP API (foreground, for the process lifetime)

mod error;

use std::path::Path;
use std::sync::Arc;

use gatewatch_api::state::AppState;
use gatewatch_core::clock::{SystemClock, TimeSource};
use gatewatch_core::{spawn_sweeper, ConfigError, GatewatchConfig, LivenessEngine};
use gatewatch_store::MemoryReadingStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServiceError;

/// Application entry point for the Gatewatch server.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the HTTP server
/// stops with a fatal error.
#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("gatewatch-server starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        host = config.server.host,
        port = config.server.port,
        offline_timeout_seconds = config.liveness.offline_timeout_seconds,
        sweep_interval_seconds = config.liveness.sweep_interval_seconds,
        timezone = config.time.timezone,
        "Configuration loaded"
    );

    // 3. Validate the timezone and create the shared wall clock. Ingestion
    //    timestamping and sweep comparison both go through this one clock.
    let zone = config.time.zone()?;
    let clock = Arc::new(SystemClock::new(zone));
    info!(zone = %zone, "Wall clock initialized");

    // 4. Create the reading store.
    let store = Arc::new(MemoryReadingStore::new());

    // 5. Create the liveness engine.
    let engine = Arc::new(LivenessEngine::new(
        store,
        clock as Arc<dyn TimeSource>,
        config.liveness.offline_timeout(),
    ));
    info!("Liveness engine initialized");

    // 6. Spawn the background sweep task. It runs for the process lifetime
    //    and is abandoned at shutdown.
    let _sweep_handle = spawn_sweeper(Arc::clone(&engine), config.liveness.sweep_interval());

    // 7. Serve the HTTP API.
    let state = Arc::new(AppState::new(engine));
    gatewatch_api::start_server(&config.server, state).await?;

    info!("gatewatch-server shutdown complete");
    Ok(())
}

/// Load the service configuration from `gatewatch-config.yaml`.
///
/// Looks for the config file relative to the current working directory and
/// falls back to defaults (with environment overrides applied) if it does
/// not exist.
fn load_config() -> Result<GatewatchConfig, ConfigError> {
    let config_path = Path::new("gatewatch-config.yaml");
    if config_path.exists() {
        GatewatchConfig::from_file(config_path)
    } else {
        info!("Config file not found, using defaults");
        let mut config = GatewatchConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
