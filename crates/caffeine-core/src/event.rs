//! Intake and forecast records.
//!
//! Field names on the wire follow the tracker's original JSON format
//! (`time`/`amount`), which the static dashboard already consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single logged caffeine intake.
///
/// Created once when the intake is logged and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeEvent {
    /// When the intake was logged (taken from the tracker's clock).
    #[serde(rename = "time")]
    pub occurred_at: DateTime<Utc>,
    /// Caffeine amount in milligrams.
    #[serde(rename = "amount")]
    pub dose_mg: f64,
}

impl IntakeEvent {
    /// Create an intake record.
    pub const fn new(occurred_at: DateTime<Utc>, dose_mg: f64) -> Self {
        Self {
            occurred_at,
            dose_mg,
        }
    }
}

/// One sample of a caffeine forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Sample instant.
    pub time: DateTime<Utc>,
    /// Estimated residual caffeine at `time`, in milligrams.
    #[serde(rename = "level")]
    pub level_mg: f64,
    /// Whether a logged intake lines up with this sample.
    pub has_intake: bool,
    /// Dose of the first intake that lines up with this sample.
    #[serde(
        rename = "intake_amount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub intake_mg: Option<f64>,
}

impl ForecastPoint {
    /// Create a sample, deriving `has_intake` from `intake_mg`.
    pub const fn new(time: DateTime<Utc>, level_mg: f64, intake_mg: Option<f64>) -> Self {
        Self {
            time,
            level_mg,
            has_intake: intake_mg.is_some(),
            intake_mg,
        }
    }
}
