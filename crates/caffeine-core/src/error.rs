//! Error types for tracker operations.

/// Errors returned by [`CaffeineTracker`](crate::CaffeineTracker).
///
/// The decay computations themselves cannot fail; the only rejected
/// operation is logging a dose the configured
/// [`DosePolicy`](crate::DosePolicy) does not accept.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TrackerError {
    /// The dose amount was rejected by the dose policy.
    #[error("invalid dose: {dose_mg} mg (dose must be a positive, finite amount)")]
    InvalidDose {
        /// The rejected amount in milligrams.
        dose_mg: f64,
    },
}
