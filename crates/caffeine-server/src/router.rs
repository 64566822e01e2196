//! Axum router construction for the API server.
//!
//! Assembles all REST routes plus the static dashboard into a single
//! [`Router`] with CORS and request tracing enabled.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `POST /api/add-coffee` -- log an intake
/// - `GET /api/caffeine-level` -- current level
/// - `GET /api/level?at=` -- level at an instant
/// - `GET /api/forecast` -- 24 hour forecast
/// - `GET /api/events` -- intake history
/// - `GET /health` -- liveness probe
/// - anything else -- static files from [`AppState::static_dir`]
///
/// Wrong methods on API routes are answered with `405 Method Not Allowed`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let dashboard = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/api/add-coffee", post(handlers::add_coffee))
        .route("/api/caffeine-level", get(handlers::caffeine_level))
        .route("/api/level", get(handlers::level_at))
        .route("/api/forecast", get(handlers::forecast))
        .route("/api/events", get(handlers::list_events))
        .route("/health", get(handlers::health))
        .fallback_service(dashboard)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
