//! Bank State Machine Tests.
//!
//! Verifies command latencies, row-hit accounting, the error taxonomy and
//! that a rejected command leaves the bank untouched.

use proptest::prelude::*;
use thermdram_core::SimTime;
use thermdram_core::common::error::TimingError;
use thermdram_core::dram::{BankTimingModel, Command, RowState};

use crate::common::table;

fn bank() -> BankTimingModel {
    BankTimingModel::new(256 * 1024, 8 * 1024, table())
}

fn issue(bank: &mut BankTimingModel, cmd: Command, row: u32) -> SimTime {
    let at = bank.clock() + bank.busy_time();
    bank.process_command(cmd, row, at).unwrap()
}

#[test]
fn test_new_bank_is_closed() {
    let bank = bank();
    assert_eq!(bank.row_count(), 32);
    assert_eq!(bank.open_row(), None);
    assert_eq!(bank.last_command(), Command::Pre);
    assert_eq!(bank.row_state(0), Some(RowState::Closed));
    assert_eq!(bank.row_state(32), None);
}

#[test]
fn test_row_hit_sequence() {
    let mut bank = bank();
    assert_eq!(issue(&mut bank, Command::Act, 3), SimTime::from_ns(14));
    assert_eq!(issue(&mut bank, Command::Rd, 3), SimTime::from_ns(14));
    assert_eq!(issue(&mut bank, Command::Rd, 3), SimTime::from_ns(14));
    assert_eq!(issue(&mut bank, Command::Pre, 3), SimTime::from_ns(14));
    assert_eq!(issue(&mut bank, Command::Act, 5), SimTime::from_ns(14));

    let stats = bank.stats();
    assert_eq!(stats.row_hits, 1);
    assert_eq!(stats.reads, 2);
    assert_eq!(stats.t_act, SimTime::from_ns(28));
    assert_eq!(stats.t_rd, SimTime::from_ns(28));
    assert_eq!(stats.t_pre, SimTime::from_ns(14));
    assert_eq!(bank.open_row(), Some(5));
    assert_eq!(bank.row_state(3), Some(RowState::Closed));
    assert_eq!(bank.row_state(5), Some(RowState::Open));
    assert_eq!(bank.busy_time(), SimTime::from_ns(70));
}

#[test]
fn test_write_recovery_before_precharge() {
    let mut bank = bank();
    let _ = issue(&mut bank, Command::Act, 0);
    assert_eq!(issue(&mut bank, Command::Wr, 0), SimTime::from_ns(12));
    assert_eq!(issue(&mut bank, Command::Pre, 0), SimTime::from_ns(28));
    assert_eq!(bank.stats().writes, 1);
}

#[test]
fn test_activate_over_open_row_switches_rows() {
    let mut bank = bank();
    let _ = issue(&mut bank, Command::Act, 3);
    assert_eq!(issue(&mut bank, Command::Act, 7), SimTime::from_ns(48));
    assert_eq!(bank.open_row(), Some(7));
    assert_eq!(bank.row_state(3), Some(RowState::Closed));
}

#[test]
fn test_auto_precharge_closes_row() {
    let mut bank = bank();
    let _ = issue(&mut bank, Command::Act, 3);
    let _ = issue(&mut bank, Command::Rda, 3);
    assert_eq!(bank.open_row(), None);
    assert_eq!(issue(&mut bank, Command::Act, 4), SimTime::from_ns(28));
}

#[test]
fn test_illegal_transition_leaves_bank_unchanged() {
    let mut bank = bank();
    let err = bank.process_command(Command::Pre, 0, SimTime::ZERO).unwrap_err();
    assert_eq!(
        err,
        TimingError::IllegalTransition {
            from: Command::Pre,
            to: Command::Pre,
        }
    );
    assert_eq!(bank.last_command(), Command::Pre);
    assert_eq!(bank.busy_time(), SimTime::ZERO);
    assert_eq!(*bank.stats(), Default::default());
}

#[test]
fn test_column_command_needs_open_row() {
    let mut bank = bank();
    assert_eq!(
        bank.process_command(Command::Rd, 3, SimTime::ZERO),
        Err(TimingError::RowNotOpen {
            cmd: Command::Rd,
            row: 3,
            open: None,
        })
    );

    let _ = issue(&mut bank, Command::Act, 3);
    assert_eq!(
        bank.process_command(Command::Wr, 4, SimTime::ZERO),
        Err(TimingError::RowNotOpen {
            cmd: Command::Wr,
            row: 4,
            open: Some(3),
        })
    );
    assert_eq!(bank.open_row(), Some(3));
    assert_eq!(bank.last_command(), Command::Act);
}

#[test]
fn test_row_out_of_range() {
    let mut bank = bank();
    assert_eq!(
        bank.process_command(Command::Act, 32, SimTime::ZERO),
        Err(TimingError::RowOutOfRange { row: 32, rows: 32 })
    );
}

#[test]
fn test_clock_never_moves_backwards() {
    let mut bank = bank();
    let _ = bank.process_command(Command::Act, 1, SimTime::from_ns(100)).unwrap();
    let _ = bank.process_command(Command::Rd, 1, SimTime::from_ns(50)).unwrap();
    assert_eq!(bank.clock(), SimTime::from_ns(100));
}

// ══════════════════════════════════════════════════════════
// Refresh
// ══════════════════════════════════════════════════════════

#[test]
fn test_refresh_is_off_by_default() {
    let bank = bank();
    assert!(!bank.refresh_due(SimTime::from_ns(1_000_000)));
}

#[test]
fn test_refresh_closes_open_row() {
    let mut bank = bank();
    bank.set_refresh_interval(SimTime::from_ns(1000));
    assert!(!bank.refresh_due(SimTime::from_ns(999)));
    assert!(bank.refresh_due(SimTime::from_ns(1000)));

    let _ = issue(&mut bank, Command::Act, 3);
    // ACT -> PRE (34 ns) then PRE -> REFSB (14 ns).
    let latency = bank.refresh(SimTime::from_ns(1000)).unwrap();
    assert_eq!(latency, SimTime::from_ns(48));
    assert_eq!(bank.open_row(), None);
    assert_eq!(bank.last_command(), Command::Refsb);
    assert_eq!(bank.stats().refreshes, 1);
    assert!(!bank.refresh_due(SimTime::from_ns(1048)));
    assert!(bank.refresh_due(SimTime::from_ns(2048)));
}

#[test]
fn test_hot_bank_refreshes_twice_as_often() {
    let mut bank = bank();
    bank.set_refresh_interval(SimTime::from_ns(1000));
    bank.set_hot(true);
    assert!(bank.is_hot());
    assert_eq!(bank.effective_refresh_interval(), SimTime::from_ns(500));
    assert!(bank.refresh_due(SimTime::from_ns(500)));

    bank.set_hot(false);
    assert!(!bank.refresh_due(SimTime::from_ns(500)));
}

#[test]
fn test_refresh_after_auto_precharge_is_illegal() {
    let mut bank = bank();
    let _ = issue(&mut bank, Command::Act, 0);
    let _ = issue(&mut bank, Command::Wra, 0);
    assert!(matches!(
        bank.refresh(SimTime::from_ns(10)),
        Err(TimingError::IllegalTransition {
            from: Command::Wra,
            to: Command::Refsb,
        })
    ));
}

#[test]
fn test_reset_stats_keeps_row_state() {
    let mut bank = bank();
    let _ = issue(&mut bank, Command::Act, 2);
    let _ = issue(&mut bank, Command::Rd, 2);
    bank.reset_stats();
    assert_eq!(bank.stats().reads, 0);
    assert_eq!(bank.open_row(), Some(2));
}

proptest! {
    /// Reads to a single open row: every read after the first is a row hit.
    #[test]
    fn prop_repeated_reads_hit(row in 0u32..32, reads in 1usize..40) {
        let mut bank = bank();
        let _ = issue(&mut bank, Command::Act, row);
        for _ in 0..reads {
            prop_assert_eq!(issue(&mut bank, Command::Rd, row), SimTime::from_ns(14));
        }
        prop_assert_eq!(bank.stats().row_hits, reads as u64 - 1);
        prop_assert_eq!(bank.stats().reads, reads as u64);
    }

    /// Rejected commands never change the bank.
    #[test]
    fn prop_errors_are_side_effect_free(cmds in proptest::collection::vec((0usize..13, 0u32..40), 1..30)) {
        let mut bank = bank();
        for (index, row) in cmds {
            let cmd = Command::ALL[index];
            let before = (bank.open_row(), bank.last_command(), bank.busy_time(), bank.stats().clone());
            if bank.process_command(cmd, row, SimTime::ZERO).is_err() {
                let after = (bank.open_row(), bank.last_command(), bank.busy_time(), bank.stats().clone());
                prop_assert_eq!(before, after);
            }
        }
    }
}
