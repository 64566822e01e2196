//! Shared application state for the API server.

use std::path::PathBuf;
use std::sync::Arc;

use caffeine_core::CaffeineTracker;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// tracker is constructed by the caller and handed in, so tests can run
/// several independent servers side by side.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The intake tracker every handler reads from or writes to.
    pub tracker: Arc<CaffeineTracker>,
    /// Directory of static dashboard files served for unmatched paths.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create application state around an existing tracker.
    pub fn new(tracker: Arc<CaffeineTracker>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            tracker,
            static_dir: static_dir.into(),
        }
    }
}
