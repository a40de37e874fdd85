//! Unison Cache Tests.
//!
//! Small-stack Unison: 256 four-way sets of 1 KiB pages (16 blocks of 64 B).
//! Addresses 256 KiB apart fall into the same set.

use pretty_assertions::assert_eq;
use thermdram_core::cache::AccessOutcome;
use thermdram_core::common::data::AccessType;
use thermdram_core::config::CacheModel;
use thermdram_core::controller::{CacheController, Mode};
use thermdram_core::SimTime;

use crate::common::ConfigBuilder;

const SET_STRIDE: u64 = 256 * 1024;

fn unison() -> CacheController {
    CacheController::new(&ConfigBuilder::new().model(CacheModel::Unison).build())
}

fn ns(value: u64) -> SimTime {
    SimTime::from_ns(value)
}

fn read(controller: &mut CacheController, at: u64, addr: u64) -> SimTime {
    controller
        .process_request(ns(at), 64, addr, AccessType::Read)
        .unwrap()
}

fn fht_peek(controller: &CacheController, key: u64) -> u64 {
    match controller.mode() {
        Mode::Unison { fht } => fht.peek(key),
        other => panic!("unexpected mode {other:?}"),
    }
}

#[test]
fn test_page_miss_block_miss_hit() {
    let mut controller = unison();

    // Tag 32 + off-chip 54 + fill 16; no separate data access on a miss.
    assert_eq!(read(&mut controller, 0, 0), ns(102));

    // Tag 18 + off-chip 54 + fill 16.
    assert_eq!(read(&mut controller, 200, 0x40), ns(88));
    assert_eq!(controller.stats().block_misses, 1);

    // Tag 18 + data 18.
    assert_eq!(read(&mut controller, 400, 0), ns(36));

    let stats = controller.stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.page_misses, 1);
    assert_eq!(stats.loaded_blocks, 2);
}

#[test]
fn test_page_tracks_touched_blocks() {
    let mut controller = unison();
    let _ = controller.process_request(SimTime::ZERO, 64, 0x80, AccessType::Write);
    let line = controller.sets()[0].lines()[0];
    assert_eq!(line.tag(), 0);
    assert_eq!(line.valid_bits(), 0b100);
    assert_eq!(line.dirty_bits(), 0b100);

    let mut set = controller.sets()[0].clone();
    assert_eq!(set.access_attempt(AccessType::Read, 0, 2), AccessOutcome::Hit);
}

#[test]
fn test_footprint_history_trains_on_eviction() {
    let mut controller = unison();
    let mut at = 0;
    let mut next = || {
        at += 500;
        at
    };

    for block in 0..3 {
        let _ = read(&mut controller, next(), block * 64);
    }
    for tag in 1..=4 {
        let _ = read(&mut controller, next(), tag * SET_STRIDE);
    }
    // Tag 4 evicted tag 0, whose fill was triggered by block 0.
    assert_eq!(fht_peek(&controller, 0), 0b111);

    let loaded = controller.stats().loaded_blocks;
    let _ = read(&mut controller, next(), 5 * SET_STRIDE);
    assert_eq!(controller.stats().loaded_blocks - loaded, 3);

    let set = &controller.sets()[0];
    let way = set.find(5).unwrap();
    assert_eq!(set.lines()[way].valid_bits(), 0b111);
}

#[test]
fn test_prediction_is_never_needed_for_demand_block() {
    let mut controller = unison();
    // Trigger block 3 with an empty history: only the demanded block loads.
    let _ = read(&mut controller, 0, 3 * 64);
    assert_eq!(controller.stats().loaded_blocks, 1);
    assert_eq!(controller.sets()[0].lines()[0].valid_bits(), 0b1000);
}
