//! Hot-Row Tracker Tests.

use thermdram_core::remap::HotRowTracker;

#[test]
fn test_counts_within_capacity() {
    let mut tracker = HotRowTracker::new(4);
    for row in [5, 7, 5, 5, 7, 9] {
        tracker.record(row);
    }
    assert_eq!(tracker.len(), 3);
    assert_eq!(tracker.count(5), 3);
    assert_eq!(tracker.count(7), 2);
    assert_eq!(tracker.count(1), 0);
    assert_eq!(tracker.hottest(2), vec![5, 7]);
    assert_eq!(tracker.hottest(10), vec![5, 7, 9]);
}

#[test]
fn test_ties_break_by_row() {
    let mut tracker = HotRowTracker::new(4);
    for row in [8, 3, 6] {
        tracker.record(row);
    }
    assert_eq!(tracker.hottest(3), vec![3, 6, 8]);
}

#[test]
fn test_full_tracker_decrements() {
    let mut tracker = HotRowTracker::new(2);
    tracker.record(1);
    tracker.record(1);
    tracker.record(2);
    tracker.record(3);
    assert_eq!(tracker.count(1), 1);
    assert_eq!(tracker.count(2), 0);
    assert_eq!(tracker.count(3), 0);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_frequent_row_survives_noise() {
    let mut tracker = HotRowTracker::new(3);
    for noise in 0..30 {
        tracker.record(4);
        tracker.record(100 + noise);
    }
    // Row 4 holds half of all accesses, well above 1 / (k + 1).
    assert_eq!(tracker.hottest(1), vec![4]);
    assert!(tracker.len() <= tracker.capacity());
}

#[test]
fn test_zero_capacity_tracks_nothing() {
    let mut tracker = HotRowTracker::new(0);
    tracker.record(1);
    assert!(tracker.is_empty());
    assert!(tracker.hottest(1).is_empty());
}

#[test]
fn test_clear() {
    let mut tracker = HotRowTracker::new(2);
    tracker.record(1);
    tracker.clear();
    assert!(tracker.is_empty());
    assert_eq!(tracker.capacity(), 2);
}
