//! The synchronous API the request layer calls into.
//!
//! [`CaffeineTracker`] wires an [`EventStore`], a [`DecayModel`], the dose
//! policy, and an injected [`Clock`] together. Each call takes at most one
//! snapshot under the store lock and does all computation afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, DosePolicy, TrackerConfig};
use crate::decay::DecayModel;
use crate::error::TrackerError;
use crate::event::{ForecastPoint, IntakeEvent};
use crate::store::EventStore;

/// Caffeine intake tracker: one event log plus the model that reads it.
///
/// Construct one per process (or per test) and share it as
/// `Arc<CaffeineTracker>`; all methods take `&self`.
pub struct CaffeineTracker {
    store: EventStore,
    model: DecayModel,
    dose_policy: DosePolicy,
    default_dose_mg: f64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CaffeineTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaffeineTracker")
            .field("store", &self.store)
            .field("model", &self.model)
            .field("dose_policy", &self.dose_policy)
            .field("default_dose_mg", &self.default_dose_mg)
            .finish_non_exhaustive()
    }
}

impl CaffeineTracker {
    /// Create a tracker with an empty log, reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// [`TrackerConfig::validate`] (for example a zero half-life).
    pub fn new(config: &TrackerConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: EventStore::new(),
            model: DecayModel::from_config(config),
            dose_policy: config.dose_policy,
            default_dose_mg: config.default_dose_mg,
            clock,
        })
    }

    /// Create a tracker on the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration is unusable.
    pub fn with_system_clock(config: &TrackerConfig) -> Result<Self, ConfigError> {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Log an intake at the current instant.
    ///
    /// `None` logs the configured default dose (one cup of coffee).
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidDose`] if the dose policy rejects the
    /// amount. Nothing is logged in that case.
    pub fn log_intake(&self, dose_mg: Option<f64>) -> Result<IntakeEvent, TrackerError> {
        let dose_mg = dose_mg.unwrap_or(self.default_dose_mg);
        if !self.dose_policy.accepts(dose_mg) {
            warn!(dose_mg, policy = ?self.dose_policy, "Rejected intake");
            return Err(TrackerError::InvalidDose { dose_mg });
        }
        Ok(self.store.append(dose_mg, self.clock.now()))
    }

    /// Residual caffeine right now, in milligrams.
    pub fn current_level(&self) -> f64 {
        self.level_at(self.clock.now())
    }

    /// Residual caffeine at an arbitrary instant, in milligrams.
    ///
    /// Intakes logged after `at` are ignored.
    pub fn level_at(&self, at: DateTime<Utc>) -> f64 {
        self.model.level_at(&self.store.snapshot(), at)
    }

    /// Forecast of the level from now across the configured window.
    pub fn forecast(&self) -> Vec<ForecastPoint> {
        let now = self.clock.now();
        self.model.forecast(&self.store.snapshot(), now)
    }

    /// Every intake logged so far, in insertion order.
    pub fn history(&self) -> Vec<IntakeEvent> {
        self.store.snapshot()
    }

    /// Number of intakes logged so far.
    pub fn event_count(&self) -> usize {
        self.store.len()
    }

    /// The model used for level and forecast computations.
    pub const fn model(&self) -> &DecayModel {
        &self.model
    }

    /// The current instant according to the tracker's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

#[cfg(test)]
#[allow(
    clippy::arithmetic_side_effects,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing
)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::clock::ManualClock;

    const EPSILON: f64 = 1e-9;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 7, 15, 0).unwrap()
    }

    fn tracker_with(config: &TrackerConfig) -> (CaffeineTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let tracker = CaffeineTracker::new(config, Arc::clone(&clock) as Arc<dyn Clock>).unwrap();
        (tracker, clock)
    }

    fn tracker() -> (CaffeineTracker, Arc<ManualClock>) {
        tracker_with(&TrackerConfig::default())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = TrackerConfig::default();
        config.decay.half_life_hours = 0.0;
        let clock = Arc::new(ManualClock::new(start()));
        let result = CaffeineTracker::new(&config, clock);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn debug_output_omits_clock() {
        let (tracker, _clock) = tracker();
        let rendered = format!("{tracker:?}");
        assert!(rendered.starts_with("CaffeineTracker"));
        assert!(rendered.ends_with(".. }"));
        assert!(!rendered.contains("now"));
    }

    #[test]
    fn empty_tracker_reads_zero() {
        let (tracker, _clock) = tracker();
        assert_eq!(tracker.current_level(), 0.0);
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn log_intake_uses_clock_and_default_dose() {
        let (tracker, clock) = tracker();
        clock.advance(TimeDelta::minutes(20));
        let event = tracker.log_intake(None).unwrap();

        assert_eq!(event.occurred_at, start() + TimeDelta::minutes(20));
        assert_eq!(event.dose_mg, 95.0);
        assert_eq!(tracker.history(), vec![event]);
    }

    #[test]
    fn current_level_decays_with_clock() {
        let (tracker, clock) = tracker();
        tracker.log_intake(None).unwrap();
        assert!((tracker.current_level() - 95.0).abs() < EPSILON);

        clock.advance(TimeDelta::hours(5));
        assert!((tracker.current_level() - 47.5).abs() < EPSILON);

        clock.advance(TimeDelta::hours(5));
        assert!((tracker.current_level() - 23.75).abs() < EPSILON);
    }

    #[test]
    fn level_at_before_first_intake_is_zero() {
        let (tracker, _clock) = tracker();
        tracker.log_intake(Some(200.0)).unwrap();
        assert_eq!(tracker.level_at(start() - TimeDelta::minutes(1)), 0.0);
    }

    #[test]
    fn forecast_starts_at_clock_now() {
        let (tracker, clock) = tracker();
        tracker.log_intake(None).unwrap();
        clock.advance(TimeDelta::minutes(90));

        let points = tracker.forecast();
        assert_eq!(points.len(), 48);
        assert_eq!(points[0].time, start() + TimeDelta::minutes(90));
        assert!(points.iter().all(|p| !p.has_intake));
    }

    #[test]
    fn forecast_flags_intake_logged_now() {
        let (tracker, _clock) = tracker();
        tracker.log_intake(Some(60.0)).unwrap();
        let points = tracker.forecast();
        assert!(points[0].has_intake);
        assert_eq!(points[0].intake_mg, Some(60.0));
    }

    #[test]
    fn accept_any_policy_logs_negative_dose() {
        let (tracker, _clock) = tracker();
        let event = tracker.log_intake(Some(-5.0)).unwrap();
        assert_eq!(event.dose_mg, -5.0);
        assert_eq!(tracker.event_count(), 1);
    }

    #[test]
    fn require_positive_policy_rejects_bad_doses() {
        let config = TrackerConfig {
            dose_policy: DosePolicy::RequirePositive,
            ..TrackerConfig::default()
        };
        let (tracker, _clock) = tracker_with(&config);

        assert_eq!(
            tracker.log_intake(Some(0.0)),
            Err(TrackerError::InvalidDose { dose_mg: 0.0 })
        );
        assert!(tracker.log_intake(Some(-3.0)).is_err());
        assert!(tracker.log_intake(Some(f64::NAN)).is_err());
        assert_eq!(tracker.event_count(), 0);

        assert!(tracker.log_intake(Some(40.0)).is_ok());
        assert_eq!(tracker.event_count(), 1);
    }
}
