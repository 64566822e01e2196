//! Caffeine tracker server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `caffeine-config.yaml` (or `$CAFFEINE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the tracker on the system clock
//! 4. Serve the API until `Ctrl-C`

use std::path::PathBuf;
use std::sync::Arc;

use caffeine_core::{AppConfig, CaffeineTracker, ConfigError};
use caffeine_server::{start_server, telemetry, AppState, ServerConfig, ServerError};
use tracing::info;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "caffeine-config.yaml";

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = load_config()?;
    telemetry::init(&config.logging);

    info!(
        default_dose_mg = config.tracker.default_dose_mg,
        half_life_hours = config.tracker.decay.half_life_hours,
        dose_policy = ?config.tracker.dose_policy,
        intake_match = ?config.tracker.intake_match,
        static_dir = config.server.static_dir,
        "Configuration loaded"
    );

    let tracker = Arc::new(CaffeineTracker::with_system_clock(&config.tracker)?);
    let state = Arc::new(AppState::new(tracker, &config.server.static_dir));

    start_server(&ServerConfig::from(&config.server), state).await?;
    Ok(())
}

/// Load the YAML configuration, falling back to defaults when the file is
/// absent. Environment overrides apply either way.
fn load_config() -> Result<AppConfig, ConfigError> {
    let path = std::env::var_os("CAFFEINE_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        AppConfig::from_file(&path)
    } else {
        AppConfig::parse("")
    }
}
