//! Hybrid Policy Tests.
//!
//! Instead of moving a whole bank, the hybrid policy redirects the bank's
//! hottest rows to a cool bank and leaves everything else in place.

use pretty_assertions::assert_eq;
use thermdram_core::config::RemapPolicy;
use thermdram_core::dram::Location;
use thermdram_core::remap::{BankAddr, RemappingManager, RowMigration};

use crate::common::{ConfigBuilder, manager};

const fn at(vault: u32, bank: u32, row: u32) -> Location {
    Location { vault, bank, row }
}

fn hybrid() -> RemappingManager {
    manager(&ConfigBuilder::new().policy(RemapPolicy::Hybrid).build())
}

/// Bank (0, 1) has hot rows 5 and 7 and is at 92 C; (0, 3) is the coolest sibling.
fn migrated() -> RemappingManager {
    let mut manager = hybrid();
    for row in [5, 5, 5, 7, 7] {
        manager.access_row(at(0, 1, row), 1).unwrap();
    }
    manager.update_temperature(0, 1, 92.0).unwrap();
    manager.update_temperature(0, 3, 50.0).unwrap();
    let report = manager.run_mechanism();
    assert_eq!(
        report.row_migrations,
        vec![RowMigration {
            from: BankAddr::new(0, 1),
            to: BankAddr::new(0, 3),
            rows: vec![5, 7],
        }]
    );
    manager
}

#[test]
fn test_hot_rows_are_redirected() {
    let manager = migrated();
    assert_eq!(manager.physical_location(at(0, 1, 5)).unwrap(), at(0, 3, 5));
    assert_eq!(manager.physical_location(at(0, 1, 7)).unwrap(), at(0, 3, 7));
    assert_eq!(manager.physical_location(at(0, 1, 6)).unwrap(), at(0, 1, 6));
    assert_eq!(manager.physical_location(at(0, 3, 5)).unwrap(), at(0, 1, 5));

    // The bank as a whole stays home and its content stays valid.
    assert_eq!(manager.physical_index(0, 1).unwrap().bank, 1);
    assert!(manager.is_content_valid(0, 1));
    assert!(manager.is_row_migrated(0, 1, 5));
    assert!(manager.is_row_migrated(0, 3, 7));
    assert!(!manager.is_row_migrated(0, 1, 6));
    assert!(manager.pending_effects());
    assert_eq!(
        manager.migrated_rows().collect::<Vec<_>>(),
        vec![
            (BankAddr::new(0, 1), 5),
            (BankAddr::new(0, 1), 7),
            (BankAddr::new(0, 3), 5),
            (BankAddr::new(0, 3), 7),
        ]
    );
    assert_eq!(manager.stats().counters.row_migrations, 2);
    assert!(manager.is_consistent());
}

#[test]
fn test_rows_return_once_both_banks_cool() {
    let mut manager = migrated();
    manager.finish_remapping();

    let frozen = manager.run_mechanism();
    assert!(!frozen.changed());
    assert_eq!(manager.physical_location(at(0, 1, 5)).unwrap(), at(0, 3, 5));

    manager.update_temperature(0, 1, 60.0).unwrap();
    let report = manager.run_mechanism();
    assert_eq!(report.recovered_banks, vec![BankAddr::new(0, 1)]);
    assert_eq!(manager.physical_location(at(0, 1, 5)).unwrap(), at(0, 1, 5));
    assert_eq!(manager.physical_location(at(0, 3, 7)).unwrap(), at(0, 3, 7));
    assert!(manager.is_row_migrated(0, 1, 5));
    assert_eq!(manager.stats().counters.row_migrations, 4);
    assert_eq!(manager.stats().counters.recovery_times, 1);
}

#[test]
fn test_rows_stay_while_target_is_warm() {
    let mut manager = migrated();
    let _ = manager.run_mechanism();
    manager.update_temperature(0, 1, 60.0).unwrap();
    manager.update_temperature(0, 3, 85.0).unwrap();
    let report = manager.run_mechanism();
    assert!(report.recovered_banks.is_empty());
    assert_eq!(manager.physical_location(at(0, 1, 5)).unwrap(), at(0, 3, 5));
}

#[test]
fn test_untouched_dangerous_bank_is_disabled() {
    let mut manager = hybrid();
    manager.update_temperature(0, 1, 96.0).unwrap();
    let report = manager.run_mechanism();
    assert!(report.row_migrations.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(report.disabled_banks, vec![BankAddr::new(0, 1)]);
}

/// Row 5 forms a three-bank cycle: home 1 -> 3, home 3 -> 2, home 2 -> 1.
fn row_cycle() -> RemappingManager {
    let mut manager = hybrid();
    for _ in 0..3 {
        manager.access_row(at(0, 1, 5), 1).unwrap();
        manager.access_row(at(0, 3, 5), 1).unwrap();
    }
    manager.update_temperature(0, 1, 92.0).unwrap();
    manager.update_temperature(0, 3, 50.0).unwrap();
    let first = manager.run_mechanism();
    assert_eq!(first.row_migrations.len(), 1);

    manager.update_temperature(0, 1, 85.0).unwrap();
    manager.update_temperature(0, 2, 40.0).unwrap();
    manager.update_temperature(0, 3, 92.0).unwrap();
    assert!(manager.run_mechanism().row_migrations.is_empty());
    let second = manager.run_mechanism();
    assert_eq!(
        second.row_migrations,
        vec![RowMigration {
            from: BankAddr::new(0, 3),
            to: BankAddr::new(0, 2),
            rows: vec![5],
        }]
    );
    assert_eq!(manager.physical_location(at(0, 1, 5)).unwrap(), at(0, 3, 5));
    assert_eq!(manager.physical_location(at(0, 3, 5)).unwrap(), at(0, 2, 5));
    assert_eq!(manager.physical_location(at(0, 2, 5)).unwrap(), at(0, 1, 5));
    manager
}

#[test]
fn test_cycle_recovery_checks_the_bank_receiving_the_displaced_row() {
    let mut manager = row_cycle();
    manager.update_temperature(0, 1, 60.0).unwrap();
    manager.update_temperature(0, 2, 60.0).unwrap();
    manager.update_temperature(0, 3, 85.0).unwrap();

    assert!(manager.run_mechanism().recovered_banks.is_empty());
    let report = manager.run_mechanism();

    // Sending row 5 home to bank 1 would push bank 2's copy onto warm bank 3.
    assert_eq!(report.recovered_banks, vec![BankAddr::new(0, 2)]);
    assert_eq!(manager.physical_location(at(0, 2, 5)).unwrap(), at(0, 2, 5));
    assert_eq!(manager.physical_location(at(0, 1, 5)).unwrap(), at(0, 3, 5));
    assert_eq!(manager.physical_location(at(0, 3, 5)).unwrap(), at(0, 1, 5));
    assert!(manager.is_consistent());
}
