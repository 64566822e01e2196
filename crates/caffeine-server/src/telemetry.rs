//! Tracing subscriber setup for the server binary.

use caffeine_core::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `logging.level` from the
/// configuration is used. `logging.json` switches to JSON lines.
pub fn init(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
