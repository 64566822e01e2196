//! Append-only, thread-safe log of intake events.
//!
//! The mutex guards exactly two operations: pushing one fully-built
//! [`IntakeEvent`] and cloning the whole sequence. Readers therefore see
//! either all of an append or none of it, and decay computations never run
//! while the lock is held.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::event::IntakeEvent;

/// Mutex-guarded, append-only sequence of [`IntakeEvent`]s.
///
/// The sequence only ever grows. Insertion order is the logical order;
/// under racing appends it follows lock acquisition, not the timestamps
/// the callers read.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Mutex<Vec<IntakeEvent>>,
}

impl EventStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Append an intake logged at `occurred_at`.
    ///
    /// The amount is stored as given; dose validation is the caller's
    /// concern. Returns the stored event.
    pub fn append(&self, dose_mg: f64, occurred_at: DateTime<Utc>) -> IntakeEvent {
        let event = IntakeEvent::new(occurred_at, dose_mg);
        let count = {
            let mut events = self.lock();
            events.push(event);
            events.len()
        };
        debug!(
            at = %event.occurred_at.format("%H:%M:%S"),
            dose_mg = event.dose_mg,
            count,
            "Logged intake"
        );
        event
    }

    /// Copy of the full sequence, consistent at a single instant.
    pub fn snapshot(&self) -> Vec<IntakeEvent> {
        self.lock().clone()
    }

    /// Number of events logged so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Acquire the sequence lock.
    ///
    /// A panic elsewhere cannot leave the `Vec` half-pushed, so a poisoned
    /// lock still guards a consistent sequence and is recovered.
    fn lock(&self) -> MutexGuard<'_, Vec<IntakeEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let store = EventStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn append_returns_stored_event() {
        let store = EventStore::new();
        let event = store.append(95.0, t0());
        assert_eq!(event.occurred_at, t0());
        assert_eq!(event.dose_mg, 95.0);
        assert_eq!(store.snapshot(), vec![event]);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let store = EventStore::new();
        let later = t0() + TimeDelta::hours(2);
        store.append(95.0, later);
        store.append(40.0, t0());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].occurred_at, later);
        assert_eq!(snapshot[1].dose_mg, 40.0);
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let store = EventStore::new();
        store.append(95.0, t0());
        let before = store.snapshot();
        store.append(95.0, t0());
        assert_eq!(before.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn negative_dose_is_stored_as_given() {
        let store = EventStore::new();
        store.append(-10.0, t0());
        assert_eq!(store.snapshot()[0].dose_mg, -10.0);
    }
}
