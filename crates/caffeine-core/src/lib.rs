//! Intake event store and caffeine decay model for the caffeine tracker.
//!
//! This crate owns the only stateful part of the tracker: an append-only
//! log of caffeine intakes, plus the pure computations that turn a
//! snapshot of that log into a residual caffeine level or a 24-hour
//! forecast.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] capability with [`SystemClock`] and
//!   [`ManualClock`] implementations.
//! - [`config`] -- YAML configuration loading into strongly-typed structs.
//! - [`decay`] -- [`DecayModel`]: exponential half-life decay and
//!   forecast generation.
//! - [`error`] -- [`TrackerError`] for rejected operations.
//! - [`event`] -- [`IntakeEvent`] and [`ForecastPoint`] records.
//! - [`store`] -- [`EventStore`]: the mutex-guarded append-only log.
//! - [`tracker`] -- [`CaffeineTracker`]: the facade the request layer calls.
//!
//! # Architecture
//!
//! The store's mutex covers exactly the append and the snapshot copy.
//! Every computation in [`decay`] runs over an owned snapshot, so a
//! forecast never holds the lock while it sums 48 sample points.

pub mod clock;
pub mod config;
pub mod decay;
pub mod error;
pub mod event;
pub mod store;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError, DecayConfig, DosePolicy, IntakeMatch, TrackerConfig};
pub use decay::DecayModel;
pub use error::TrackerError;
pub use event::{ForecastPoint, IntakeEvent};
pub use store::EventStore;
pub use tracker::CaffeineTracker;
