//! Configuration loading and typed config structures for the caffeine tracker.
//!
//! The canonical configuration lives in `caffeine-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file)
//! produces the stock model: 95 mg per cup, a 5 hour half-life, and a
//! 24 hour forecast sampled every 30 minutes.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an unusable model.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Decay model and intake settings.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the listen address:
    /// - `CAFFEINE_HOST` overrides `server.host`
    /// - `CAFFEINE_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects an empty document; treat it as "all defaults".
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the tracker section for values the model cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.validate()
    }
}

/// What to do with zero, negative, or non-finite dose amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DosePolicy {
    /// Log any amount the caller sends.
    #[default]
    AcceptAny,
    /// Reject amounts that are not strictly positive and finite.
    RequirePositive,
}

impl DosePolicy {
    /// Whether `dose_mg` may be logged under this policy.
    pub fn accepts(self, dose_mg: f64) -> bool {
        match self {
            Self::AcceptAny => true,
            Self::RequirePositive => dose_mg.is_finite() && dose_mg > 0.0,
        }
    }
}

/// How a forecast sample decides that an intake "happened at" its instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeMatch {
    /// Both instants fall in the same wall-clock minute.
    #[default]
    Minute,
    /// Both instants are identical.
    Exact,
}

/// Intake and decay model settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackerConfig {
    /// Dose logged when the caller does not send an amount (one cup of coffee).
    #[serde(default = "default_dose_mg")]
    pub default_dose_mg: f64,

    /// Acceptance rule for caller-supplied doses.
    #[serde(default)]
    pub dose_policy: DosePolicy,

    /// Intake-to-sample matching used when flagging forecast points.
    #[serde(default)]
    pub intake_match: IntakeMatch,

    /// Decay and forecast window parameters.
    #[serde(default)]
    pub decay: DecayConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_dose_mg: default_dose_mg(),
            dose_policy: DosePolicy::default(),
            intake_match: IntakeMatch::default(),
            decay: DecayConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Validate the default dose against the policy, then the decay window.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_dose_mg.is_finite() || !self.dose_policy.accepts(self.default_dose_mg) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "default_dose_mg {} is not accepted by dose policy {:?}",
                    self.default_dose_mg, self.dose_policy
                ),
            });
        }
        self.decay.validate()
    }
}

/// Decay model and forecast window parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecayConfig {
    /// Hours for a dose's residual contribution to halve.
    #[serde(default = "default_half_life_hours")]
    pub half_life_hours: f64,

    /// Length of the forecast window in hours.
    #[serde(default = "default_horizon_hours")]
    pub horizon_hours: u32,

    /// Minutes between consecutive forecast samples.
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            half_life_hours: default_half_life_hours(),
            horizon_hours: default_horizon_hours(),
            step_minutes: default_step_minutes(),
        }
    }
}

impl DecayConfig {
    /// Number of samples in one forecast (`horizon / step`).
    ///
    /// Returns 0 if `step_minutes` is 0; [`validate`](Self::validate)
    /// rejects that configuration.
    pub fn sample_count(&self) -> u32 {
        self.horizon_hours
            .saturating_mul(60)
            .checked_div(self.step_minutes)
            .unwrap_or(0)
    }

    /// Check that the half-life is usable and the horizon divides evenly
    /// into steps.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.half_life_hours.is_finite() || self.half_life_hours <= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "half_life_hours must be positive and finite, got {}",
                    self.half_life_hours
                ),
            });
        }
        if self.step_minutes == 0 {
            return Err(ConfigError::Invalid {
                reason: "step_minutes must be at least 1".to_owned(),
            });
        }
        let horizon_minutes = self.horizon_hours.saturating_mul(60);
        if horizon_minutes == 0 || horizon_minutes.checked_rem(self.step_minutes) != Some(0) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "horizon of {} hours is not a positive multiple of {} minute steps",
                    self.horizon_hours, self.step_minutes
                ),
            });
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static dashboard files served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerSettings {
    /// Apply `CAFFEINE_HOST` / `CAFFEINE_PORT` overrides when set.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("CAFFEINE_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("CAFFEINE_PORT") {
            self.port = port.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("CAFFEINE_PORT={port} is not a valid port: {e}"),
            })?;
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_dose_mg() -> f64 {
    95.0
}

const fn default_half_life_hours() -> f64 {
    5.0
}

const fn default_horizon_hours() -> u32 {
    24
}

const fn default_step_minutes() -> u32 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracker.default_dose_mg, 95.0);
        assert_eq!(config.tracker.decay.half_life_hours, 5.0);
        assert_eq!(config.tracker.decay.sample_count(), 48);
        assert_eq!(config.tracker.dose_policy, DosePolicy::AcceptAny);
        assert_eq!(config.tracker.intake_match, IntakeMatch::Minute);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
tracker:
  default_dose_mg: 80
  dose_policy: require_positive
  intake_match: exact
  decay:
    half_life_hours: 6.5
    horizon_hours: 12
    step_minutes: 15

server:
  host: "127.0.0.1"
  port: 9090
  static_dir: "public"

logging:
  level: "debug"
  json: true
"#;

        let config = AppConfig::parse(yaml).unwrap();
        assert_eq!(config.tracker.default_dose_mg, 80.0);
        assert_eq!(config.tracker.dose_policy, DosePolicy::RequirePositive);
        assert_eq!(config.tracker.intake_match, IntakeMatch::Exact);
        assert_eq!(config.tracker.decay.half_life_hours, 6.5);
        assert_eq!(config.tracker.decay.sample_count(), 48);
        assert_eq!(config.server.static_dir, "public");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = AppConfig::parse("tracker:\n  default_dose_mg: 60\n").unwrap();
        assert_eq!(config.tracker.default_dose_mg, 60.0);
        assert_eq!(config.tracker.decay.horizon_hours, 24);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_empty_yaml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.tracker, TrackerConfig::default());
    }

    #[test]
    fn unknown_policy_is_a_yaml_error() {
        let result = AppConfig::parse("tracker:\n  dose_policy: maybe\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn rejects_non_positive_half_life() {
        let result = AppConfig::parse("tracker:\n  decay:\n    half_life_hours: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_uneven_horizon() {
        let yaml = "tracker:\n  decay:\n    horizon_hours: 1\n    step_minutes: 25\n";
        let result = AppConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_zero_step() {
        let decay = DecayConfig {
            step_minutes: 0,
            ..DecayConfig::default()
        };
        assert_eq!(decay.sample_count(), 0);
        assert!(decay.validate().is_err());
    }

    #[test]
    fn default_dose_must_satisfy_policy() {
        let yaml = "tracker:\n  default_dose_mg: 0\n  dose_policy: require_positive\n";
        assert!(matches!(AppConfig::parse(yaml), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn dose_policy_accepts() {
        assert!(DosePolicy::AcceptAny.accepts(-5.0));
        assert!(DosePolicy::RequirePositive.accepts(0.5));
        assert!(!DosePolicy::RequirePositive.accepts(0.0));
        assert!(!DosePolicy::RequirePositive.accepts(-1.0));
        assert!(!DosePolicy::RequirePositive.accepts(f64::NAN));
        assert!(!DosePolicy::RequirePositive.accepts(f64::INFINITY));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("caffeine-config.yaml");
        if path.exists() {
            let config = AppConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
