//! HTTP API server for the caffeine tracker.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for logging intake and querying the current
//!   level, a level at any instant, the 24 hour forecast, and history
//! - **Static dashboard** files served for every other path
//!
//! # Architecture
//!
//! All state lives in one [`CaffeineTracker`] owned by [`AppState`] and
//! shared across handler tasks. The tracker's methods are synchronous and
//! finish in microseconds, so handlers call them directly.
//!
//! [`CaffeineTracker`]: caffeine_core::CaffeineTracker

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod telemetry;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
