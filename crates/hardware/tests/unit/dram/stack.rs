//! Stack Placement and Transfer Tests.

use thermdram_core::SimTime;
use thermdram_core::common::data::AccessType;
use thermdram_core::common::error::TimingError;
use thermdram_core::dram::{DramAccess, Location, StackGeometry, StackedDram};

use crate::common::ConfigBuilder;

fn stack() -> StackedDram {
    StackedDram::new(&ConfigBuilder::new().build().dram)
}

const fn at(vault: u32, bank: u32, row: u32) -> Location {
    Location { vault, bank, row }
}

#[test]
fn test_geometry() {
    let geometry = StackGeometry::new(&ConfigBuilder::new().build().dram);
    assert_eq!((geometry.vaults, geometry.banks, geometry.rows), (4, 4, 32));
    assert_eq!(geometry.total_banks(), 16);
    assert_eq!(geometry.bank_id(2, 3), 11);
    assert_eq!(geometry.split_bank_id(11), (2, 3));
}

#[test]
fn test_set_placement_fills_rows_then_vaults_then_banks() {
    let geometry = *stack().geometry();
    assert_eq!(geometry.locate_set(5), at(0, 0, 5));
    assert_eq!(geometry.locate_set(32), at(1, 0, 0));
    assert_eq!(geometry.locate_set(127), at(3, 0, 31));
    assert_eq!(geometry.locate_set(128), at(0, 1, 0));
    // Wraps past the stack's capacity.
    assert_eq!(geometry.locate_set(512), at(0, 0, 0));
}

#[test]
fn test_address_interleaves_requests_across_vaults() {
    let stack = stack();
    assert_eq!(stack.locate_address(0), at(0, 0, 0));
    assert_eq!(stack.locate_address(63), at(0, 0, 0));
    assert_eq!(stack.locate_address(64), at(1, 0, 0));
    assert_eq!(stack.locate_address(256), at(0, 1, 0));
    assert_eq!(stack.locate_address(1024), at(0, 0, 1));
}

#[test]
fn test_transfer_is_split_into_requests() {
    let mut stack = stack();
    // Two 64 B requests (28 + 14 ns) plus 128 B at 16 B/ns.
    let result = stack
        .access(SimTime::ZERO, 128, at(0, 0, 0), AccessType::Read)
        .unwrap();
    assert_eq!(
        result,
        DramAccess {
            latency: SimTime::from_ns(50),
            requests: 2,
        }
    );
    assert_eq!(stack.vault(0).unwrap().stats().requests, 2);
}

#[test]
fn test_empty_transfer_costs_one_request() {
    let mut stack = stack();
    let result = stack
        .access(SimTime::ZERO, 0, at(1, 2, 3), AccessType::Write)
        .unwrap();
    assert_eq!(result.requests, 1);
    assert_eq!(result.latency, SimTime::from_ns(26));
}

#[test]
fn test_vault_out_of_range() {
    let mut stack = stack();
    assert_eq!(
        stack.access(SimTime::ZERO, 64, at(4, 0, 0), AccessType::Read),
        Err(TimingError::VaultOutOfRange { vault: 4, vaults: 4 })
    );
}

#[test]
fn test_bank_refresh_hint() {
    let mut stack = stack();
    stack.set_bank_ref(1, 2, true).unwrap();
    assert!(stack.vault(1).unwrap().bank(2).unwrap().is_hot());
    assert_eq!(
        stack.set_bank_ref(1, 4, true),
        Err(TimingError::BankOutOfRange { bank: 4, banks: 4 })
    );
    assert_eq!(
        stack.set_bank_ref(9, 0, true),
        Err(TimingError::VaultOutOfRange { vault: 9, vaults: 4 })
    );
}

#[test]
fn test_refresh_config_installs_interval() {
    let mut stack = StackedDram::new(&ConfigBuilder::new().refresh(true).build().dram);
    let bank = stack.vault(0).unwrap().bank(0).unwrap();
    assert_eq!(bank.effective_refresh_interval(), SimTime::from_ns(3900));

    let _ = stack
        .access(SimTime::from_ns(3900), 64, at(0, 0, 0), AccessType::Read)
        .unwrap();
    assert_eq!(stack.stats()[0].banks[0].refreshes, 1);
}

#[test]
fn test_stats_cover_every_vault() {
    let mut stack = stack();
    let _ = stack
        .access(SimTime::ZERO, 64, at(3, 1, 0), AccessType::Read)
        .unwrap();
    let stats = stack.stats();
    assert_eq!(stats.len(), 4);
    assert_eq!(stats[3].total.reads, 1);
    stack.reset_stats();
    assert!(stack.stats().iter().all(|v| v.total.reads == 0));
}
