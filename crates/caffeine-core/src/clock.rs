//! Time source for the tracker.
//!
//! Nothing in this crate reads the wall clock directly. The tracker asks
//! its [`Clock`] for "now", so tests and simulations can substitute a
//! [`ManualClock`] and step time forward by hours without sleeping.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

/// A source of the current instant.
pub trait Clock: Send + Sync {
    /// Return the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Jump to an absolute instant (forwards or backwards).
    pub fn set(&self, at: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    /// Move the clock by `delta`. Saturates instead of overflowing the
    /// representable range.
    pub fn advance(&self, delta: TimeDelta) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current = current
            .checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn manual_clock_is_frozen_until_moved() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 7, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        clock.advance(TimeDelta::hours(5));
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn manual_clock_advance_saturates() {
        let clock = ManualClock::new(DateTime::<Utc>::MAX_UTC);
        clock.advance(TimeDelta::days(1));
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
