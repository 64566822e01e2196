//! Concurrency tests for the tracker's event log.
//!
//! These tests verify that many threads can safely:
//! - Log intakes simultaneously without losing any
//! - Take snapshots while appends are in flight
//! - Compute levels and forecasts alongside writers

#![allow(clippy::arithmetic_side_effects, clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Barrier};
use std::thread;

use caffeine_core::{CaffeineTracker, Clock, EventStore, ManualClock, TrackerConfig};
use chrono::{TimeZone, Utc};

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn shared_tracker() -> Arc<CaffeineTracker> {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap()));
    Arc::new(CaffeineTracker::new(&TrackerConfig::default(), clock as Arc<dyn Clock>).unwrap())
}

#[test]
fn concurrent_log_intake_loses_nothing() {
    let tracker = shared_tracker();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_THREAD {
                    tracker.log_intake(None).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tracker.history().len(), THREADS * PER_THREAD);
    assert_eq!(tracker.event_count(), THREADS * PER_THREAD);
}

#[test]
fn snapshots_only_contain_complete_events() {
    let store = Arc::new(EventStore::new());
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let writers: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_THREAD {
                    store.append(95.0, now);
                }
            })
        })
        .collect();

    let reader = {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let mut last_len = 0;
            for _ in 0..200 {
                let snapshot = store.snapshot();
                // The log only grows, and every element is fully formed.
                assert!(snapshot.len() >= last_len);
                assert!(
                    snapshot
                        .iter()
                        .all(|e| e.occurred_at == now && (e.dose_mg - 95.0).abs() < f64::EPSILON)
                );
                last_len = snapshot.len();
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(store.len(), THREADS * PER_THREAD);
}

#[test]
fn readers_compute_while_writers_append() {
    let tracker = shared_tracker();
    let barrier = Arc::new(Barrier::new(4));

    let writers: Vec<_> = (0..2)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    tracker.log_intake(Some(10.0)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    let level = tracker.current_level();
                    assert!(level >= 0.0);
                    assert_eq!(tracker.forecast().len(), 48);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    // All 200 doses were logged at the same frozen instant.
    assert!((tracker.current_level() - 2000.0).abs() < 1e-6);
}
