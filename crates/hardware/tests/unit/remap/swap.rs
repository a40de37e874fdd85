//! Swap Policy Tests.
//!
//! Bank swapping within a vault, inter-vault bank targets, whole-vault swaps,
//! the cooldown window, recovery and double-disabling of displaced banks.

use pretty_assertions::assert_eq;
use thermdram_core::common::error::RemapError;
use thermdram_core::config::RemapPolicy;
use thermdram_core::remap::{BankAddr, PhysicalLocation, RemappingManager};

use crate::common::{ConfigBuilder, manager};

fn heat(manager: &mut RemappingManager, readings: &[(u32, u32, f64)]) {
    for &(vault, bank, temperature) in readings {
        manager.update_temperature(vault, bank, temperature).unwrap();
    }
}

fn swap_manager(inter_vault: bool) -> RemappingManager {
    manager(
        &ConfigBuilder::new()
            .policy(RemapPolicy::Swap)
            .inter_vault(inter_vault)
            .build(),
    )
}

/// Hot bank (0, 1) next to three cooler siblings; (0, 2) is the coolest.
fn scenario() -> RemappingManager {
    let mut manager = swap_manager(false);
    heat(
        &mut manager,
        &[(0, 1, 95.0), (0, 0, 70.0), (0, 2, 50.0), (0, 3, 65.0)],
    );
    manager
}

// ══════════════════════════════════════════════════════════
// Intra-vault swaps
// ══════════════════════════════════════════════════════════

#[test]
fn test_hot_bank_swaps_with_coolest_sibling() {
    let mut manager = scenario();
    let report = manager.run_mechanism();

    assert_eq!(report.epoch, 1);
    assert_eq!(report.bank_swaps, vec![(BankAddr::new(0, 1), BankAddr::new(0, 2))]);
    assert!(report.disabled_banks.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(
        manager.physical_index(0, 1).unwrap(),
        PhysicalLocation { vault: 0, bank: 2, valid: true }
    );
    assert_eq!(manager.logical_index(0, 2).unwrap(), (0, 1));
    assert!(!manager.is_content_valid(0, 1));
    assert!(!manager.is_content_valid(0, 2));
    assert!(manager.is_content_valid(0, 0));
    assert_eq!(manager.bank_entry(0, 1).unwrap().remapped_at(), Some(1));
    assert!(manager.is_consistent());
    assert_eq!(manager.stats().counters.remap_times, 1);
    assert_eq!(manager.stats().displaced_banks, 2);
}

#[test]
fn test_cooldown_freezes_next_epoch() {
    let mut manager = scenario();
    let _ = manager.run_mechanism();
    let report = manager.run_mechanism();
    assert_eq!(report.epoch, 2);
    assert!(!report.changed());
    assert!(report.failures.is_empty());
}

#[test]
fn test_displaced_bank_on_hot_silicon_is_double_disabled() {
    let mut manager = scenario();
    let _ = manager.run_mechanism();
    let _ = manager.run_mechanism();

    // Logical (0, 2) now sits on the 95 C bank and cannot move again.
    let report = manager.run_mechanism();
    assert_eq!(report.disabled_banks, vec![BankAddr::new(0, 2)]);
    assert!(report.bank_swaps.is_empty());
    assert!(manager.is_disabled(0, 2));
    assert!(manager.bank_entry(0, 2).unwrap().is_double_disabled());
    assert_eq!(
        manager.physical_index(0, 2).unwrap(),
        PhysicalLocation { vault: 0, bank: 1, valid: false }
    );
    let counters = manager.stats().counters;
    assert_eq!(counters.disable_times, 1);
    assert_eq!(counters.double_disable_times, 1);
}

#[test]
fn test_cooled_bank_returns_home() {
    let mut manager = scenario();
    let _ = manager.run_mechanism();
    let _ = manager.run_mechanism();

    heat(&mut manager, &[(0, 1, 60.0)]);
    let report = manager.run_mechanism();
    assert_eq!(report.recovered_banks, vec![BankAddr::new(0, 1)]);
    assert!(report.disabled_banks.is_empty());
    assert_eq!(manager.physical_index(0, 1).unwrap().bank, 1);
    assert_eq!(manager.physical_index(0, 2).unwrap().bank, 2);
    assert_eq!(manager.bank_entry(0, 1).unwrap().remapped_at(), Some(3));
    assert_eq!(manager.stats().counters.recovery_times, 1);
    assert_eq!(manager.stats().displaced_banks, 0);
}

#[test]
fn test_no_target_fails_then_disables() {
    let mut manager = swap_manager(false);
    heat(
        &mut manager,
        &[(0, 0, 96.0), (0, 1, 85.0), (0, 2, 85.0), (0, 3, 85.0)],
    );
    let report = manager.run_mechanism();
    assert_eq!(
        report.failures,
        vec![RemapError::TargetNotFound {
            vault: 0,
            bank: 0,
            temperature: 96.0
        }]
    );
    assert_eq!(report.disabled_banks, vec![BankAddr::new(0, 0)]);
    assert!(!manager.bank_entry(0, 0).unwrap().is_double_disabled());
    assert_eq!(manager.stats().counters.failures, 1);

    // A disabled bank comes back once it cools below the remap threshold.
    heat(&mut manager, &[(0, 0, 70.0)]);
    let report = manager.run_mechanism();
    assert_eq!(report.recovered_banks, vec![BankAddr::new(0, 0)]);
    assert!(!manager.is_disabled(0, 0));
}

#[test]
fn test_hot_but_not_dangerous_bank_stays_enabled() {
    let mut manager = swap_manager(false);
    heat(
        &mut manager,
        &[(0, 0, 92.0), (0, 1, 85.0), (0, 2, 85.0), (0, 3, 85.0)],
    );
    let report = manager.run_mechanism();
    assert_eq!(report.failures.len(), 1);
    assert!(report.disabled_banks.is_empty());
    assert!(!manager.is_disabled(0, 0));
}

// ══════════════════════════════════════════════════════════
// Inter-vault
// ══════════════════════════════════════════════════════════

#[test]
fn test_inter_vault_bank_target() {
    let mut manager = swap_manager(true);
    heat(
        &mut manager,
        &[(0, 0, 85.0), (0, 1, 92.0), (0, 2, 85.0), (0, 3, 85.0), (1, 3, 40.0)],
    );
    let report = manager.run_mechanism();
    assert!(report.vault_swaps.is_empty());
    assert_eq!(report.bank_swaps, vec![(BankAddr::new(0, 1), BankAddr::new(1, 3))]);
    assert_eq!(manager.physical_index(0, 1).unwrap().vault, 1);
    assert_eq!(manager.physical_index(0, 1).unwrap().bank, 3);
    assert_eq!(manager.logical_index(0, 1).unwrap(), (1, 3));
    assert!(manager.is_consistent());
}

fn hot_vault_zero() -> RemappingManager {
    let mut manager = swap_manager(true);
    for bank in 0..4 {
        heat(&mut manager, &[(0, bank, 95.0), (2, bank, 40.0)]);
    }
    manager
}

#[test]
fn test_hot_vault_swaps_whole() {
    let mut manager = hot_vault_zero();
    let report = manager.run_mechanism();

    assert_eq!(report.vault_swaps, vec![(0, 2)]);
    assert!(report.bank_swaps.is_empty());
    assert!(report.disabled_banks.is_empty());
    for bank in 0..4 {
        let physical = manager.physical_index(0, bank).unwrap();
        assert_eq!((physical.vault, physical.bank), (2, bank));
        assert_eq!(manager.logical_index(0, bank).unwrap(), (2, bank));
        assert!(!manager.is_content_valid(0, bank));
        assert!(!manager.is_content_valid(2, bank));
        assert!(manager.is_content_valid(1, bank));
    }
    assert_eq!(manager.vault_entry(0).unwrap().remapped_at(), Some(1));
    assert_eq!(manager.stats().counters.vault_remap_times, 1);
    assert!(manager.is_consistent());
}

#[test]
fn test_cooled_vault_returns_home() {
    let mut manager = hot_vault_zero();
    let _ = manager.run_mechanism();
    let frozen = manager.run_mechanism();
    assert!(!frozen.changed());

    for bank in 0..4 {
        heat(&mut manager, &[(0, bank, 60.0)]);
    }
    let report = manager.run_mechanism();
    assert_eq!(report.recovered_vaults, vec![0]);
    assert_eq!(manager.physical_index(0, 3).unwrap().vault, 0);
    assert_eq!(manager.physical_index(2, 3).unwrap().vault, 2);
    assert_eq!(manager.stats().displaced_banks, 0);
}

#[test]
fn test_no_cool_vault_reports_failure() {
    let mut manager = swap_manager(true);
    for vault in 0..4 {
        for bank in 0..4 {
            let temperature = if vault == 0 { 95.0 } else { 85.0 };
            heat(&mut manager, &[(vault, bank, temperature)]);
        }
    }
    let report = manager.run_mechanism();
    assert_eq!(
        report.failures[0],
        RemapError::VaultTargetNotFound {
            vault: 0,
            temperature: 95.0
        }
    );
    assert!(report.vault_swaps.is_empty());
    // Every bank of the vault then fails individually and is disabled.
    assert_eq!(report.disabled_banks.len(), 4);
    assert_eq!(report.failures.len(), 5);
}
