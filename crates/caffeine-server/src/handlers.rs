//! REST API endpoint handlers.
//!
//! Every handler is a thin adapter over one [`CaffeineTracker`] call; the
//! tracker does its own locking, so handlers never hold anything across
//! an `.await`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/add-coffee` | Log an intake (optional `{"amount": mg}`) |
//! | `GET` | `/api/caffeine-level` | Current residual level |
//! | `GET` | `/api/level?at=` | Level at an RFC 3339 instant |
//! | `GET` | `/api/forecast` | 24 hour forecast |
//! | `GET` | `/api/events` | Intake history |
//! | `GET` | `/health` | Liveness and event count |
//!
//! [`CaffeineTracker`]: caffeine_core::CaffeineTracker

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request structs
// ---------------------------------------------------------------------------

/// Optional body of `POST /api/add-coffee`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct AddCoffeeRequest {
    /// Dose in milligrams; the configured default when absent.
    pub amount: Option<f64>,
}

/// Query parameters for `GET /api/level`.
#[derive(Debug, serde::Deserialize)]
pub struct LevelQuery {
    /// Instant to evaluate, in RFC 3339 form.
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// POST /api/add-coffee -- log an intake
// ---------------------------------------------------------------------------

/// Log one intake at the tracker's current instant.
///
/// An empty body logs the default dose. A body must otherwise be a JSON
/// object, optionally carrying `amount`.
pub async fn add_coffee(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_add_coffee(&body)?;
    let event = state.tracker.log_intake(request.amount)?;

    info!(
        dose_mg = event.dose_mg,
        at = %event.occurred_at,
        "Intake logged via API"
    );

    Ok(Json(serde_json::json!({
        "status": "success",
        "event": event,
    })))
}

/// Parse the add-coffee body, treating whitespace-only as empty.
fn parse_add_coffee(body: &[u8]) -> Result<AddCoffeeRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AddCoffeeRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid body: {e}")))
}

// ---------------------------------------------------------------------------
// GET /api/caffeine-level -- current level
// ---------------------------------------------------------------------------

/// Return the residual caffeine level right now.
pub async fn caffeine_level(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "level": state.tracker.current_level() }))
}

// ---------------------------------------------------------------------------
// GET /api/level -- level at an instant
// ---------------------------------------------------------------------------

/// Return the residual caffeine level at the requested instant.
///
/// A missing or unparseable `at` is reported through [`ApiError`] so the
/// body carries the usual JSON error shape.
pub async fn level_at(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LevelQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    Ok(Json(serde_json::json!({
        "time": params.at,
        "level": state.tracker.level_at(params.at),
    })))
}

// ---------------------------------------------------------------------------
// GET /api/forecast -- sampled projection
// ---------------------------------------------------------------------------

/// Return the forecast from now across the configured window.
pub async fn forecast(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.tracker.forecast())
}

// ---------------------------------------------------------------------------
// GET /api/events -- history
// ---------------------------------------------------------------------------

/// Return every logged intake in insertion order.
pub async fn list_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.tracker.history())
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "events": state.tracker.event_count(),
    }))
}
