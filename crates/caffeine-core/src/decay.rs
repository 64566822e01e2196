//! Exponential caffeine decay and forecast generation.
//!
//! Each intake contributes `dose * 0.5 ^ (elapsed_hours / half_life)` at a
//! query instant; intakes after the query instant contribute nothing. The
//! level is the sum over all intakes, so overlapping doses simply stack.
//!
//! Everything here is a pure function over a borrowed snapshot. No locks,
//! no clock reads.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{DecayConfig, IntakeMatch, TrackerConfig};
use crate::event::{ForecastPoint, IntakeEvent};

/// Seconds in one hour.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Seconds in one minute, for minute-resolution intake matching.
const SECONDS_PER_MINUTE: i64 = 60;

/// Half-life decay model with a fixed forecast window.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayModel {
    half_life_hours: f64,
    step_minutes: u32,
    sample_count: u32,
    intake_match: IntakeMatch,
}

impl Default for DecayModel {
    fn default() -> Self {
        Self::new(&DecayConfig::default(), IntakeMatch::default())
    }
}

impl DecayModel {
    /// Build a model from decay parameters and an intake matching rule.
    ///
    /// The parameters are expected to have passed
    /// [`DecayConfig::validate`]; a zero step yields empty forecasts.
    pub fn new(decay: &DecayConfig, intake_match: IntakeMatch) -> Self {
        Self {
            half_life_hours: decay.half_life_hours,
            step_minutes: decay.step_minutes,
            sample_count: decay.sample_count(),
            intake_match,
        }
    }

    /// Build a model from the tracker section of the configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(&config.decay, config.intake_match)
    }

    /// Hours for a dose to halve.
    pub const fn half_life_hours(&self) -> f64 {
        self.half_life_hours
    }

    /// Number of points in every forecast.
    pub const fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Residual amount of a single intake at `at`.
    ///
    /// Returns 0 when the intake lies after `at` (not yet absorbed).
    pub fn contribution(&self, event: &IntakeEvent, at: DateTime<Utc>) -> f64 {
        // to_std fails exactly when the intake is in the future.
        let Ok(elapsed) = at.signed_duration_since(event.occurred_at).to_std() else {
            return 0.0;
        };
        let elapsed_hours = elapsed.as_secs_f64() / SECONDS_PER_HOUR;
        event.dose_mg * 0.5_f64.powf(elapsed_hours / self.half_life_hours)
    }

    /// Total residual caffeine at `at` across all intakes, in milligrams.
    ///
    /// An empty snapshot reads as positive zero.
    pub fn level_at(&self, events: &[IntakeEvent], at: DateTime<Utc>) -> f64 {
        // Float `sum()` starts from -0.0, which would serialize as `-0.0`.
        events
            .iter()
            .map(|event| self.contribution(event, at))
            .fold(0.0, |total, contribution| total + contribution)
    }

    /// Sample the level from `now` across the forecast window.
    ///
    /// Point `i` sits at `now + i * step`, for `i` in `0..sample_count`.
    /// A point is flagged with the dose of the first intake that matches
    /// its instant under the model's [`IntakeMatch`] rule. Sampling stops
    /// early only if an instant falls outside chrono's representable range.
    pub fn forecast(&self, events: &[IntakeEvent], now: DateTime<Utc>) -> Vec<ForecastPoint> {
        (0..self.sample_count)
            .map_while(|i| {
                let offset = i64::from(self.step_minutes).checked_mul(i64::from(i))?;
                now.checked_add_signed(TimeDelta::try_minutes(offset)?)
            })
            .map(|at| {
                let intake = events
                    .iter()
                    .find(|event| self.matches(event.occurred_at, at))
                    .map(|event| event.dose_mg);
                ForecastPoint::new(at, self.level_at(events, at), intake)
            })
            .collect()
    }

    /// Whether an intake at `occurred_at` counts as happening at `sample`.
    fn matches(&self, occurred_at: DateTime<Utc>, sample: DateTime<Utc>) -> bool {
        match self.intake_match {
            IntakeMatch::Exact => occurred_at == sample,
            IntakeMatch::Minute => {
                occurred_at.timestamp().div_euclid(SECONDS_PER_MINUTE)
                    == sample.timestamp().div_euclid(SECONDS_PER_MINUTE)
            }
        }
    }
}
