//! Footprint History Table Tests.

use thermdram_core::cache::FootprintHistoryTable;

#[test]
fn test_new_table_predicts_nothing() {
    let mut fht = FootprintHistoryTable::new(64, 16);
    assert_eq!(fht.len(), 64);
    assert!(!fht.is_empty());
    assert_eq!(fht.predict(5), 0);
    assert_eq!(fht.lookups(), 1);
}

#[test]
fn test_record_then_predict() {
    let mut fht = FootprintHistoryTable::new(64, 16);
    fht.record(3, 0b1011);
    assert_eq!(fht.predict(3), 0b1011);
    assert_eq!(fht.peek(3), 0b1011);
    assert_eq!(fht.updates(), 1);
    assert_eq!(fht.lookups(), 1);
}

#[test]
fn test_record_masks_to_page_width() {
    let mut fht = FootprintHistoryTable::new(8, 16);
    fht.record(1, 0x1_0003);
    assert_eq!(fht.peek(1), 0x3);

    let mut wide = FootprintHistoryTable::new(8, 64);
    wide.record(1, u64::MAX);
    assert_eq!(wide.peek(1), u64::MAX);
}

#[test]
fn test_keys_wrap_around_table() {
    let mut fht = FootprintHistoryTable::new(4, 16);
    assert_eq!(fht.key(6), 2);
    fht.record(fht.key(6), 0b110);
    assert_eq!(fht.peek(2), 0b110);
    assert_eq!(fht.peek(10), 0b110);
}

#[test]
fn test_zero_entries_still_holds_one() {
    let mut fht = FootprintHistoryTable::new(0, 16);
    assert_eq!(fht.len(), 1);
    fht.record(7, 0b1);
    assert_eq!(fht.predict(0), 0b1);
}

#[test]
fn test_reset_stats_keeps_predictions() {
    let mut fht = FootprintHistoryTable::new(16, 16);
    fht.record(2, 0b11);
    let _ = fht.predict(2);
    fht.reset_stats();
    assert_eq!((fht.lookups(), fht.updates()), (0, 0));
    assert_eq!(fht.peek(2), 0b11);
}
