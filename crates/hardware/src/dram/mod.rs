//! Stacked DRAM timing.
//!
//! This module provides:
//! 1. **Timing:** Command vocabulary, speed parameters and the legal transition table.
//! 2. **Banks:** The per-bank open-row state machine.
//! 3. **Vaults:** Request-to-command sequencing over a vault's banks.
//! 4. **Stack:** [`StackedDram`], the vault array with set placement, address
//!    interleaving and request chunking.
//!
//! Locations handed to [`StackedDram::access`] are *physical*; translating a
//! logical location through the remapping layer is the controller's job.

/// Per-bank command state machine.
pub mod bank;

/// Command set, speed table and transition table.
pub mod timing;

/// Request sequencing within a vault.
pub mod vault;

use std::sync::Arc;

use crate::common::addr::{log2, low_mask};
use crate::common::data::AccessType;
use crate::common::error::TimingError;
use crate::common::time::{Bandwidth, SimTime};
use crate::config::DramConfig;

pub use bank::{BankStats, BankTimingModel, RowState};
pub use timing::{Command, SpeedTable, TimingTable};
pub use vault::{VaultStats, VaultTimingModel};

/// A (vault, bank, row) coordinate in the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Vault index.
    pub vault: u32,
    /// Bank within the vault.
    pub bank: u32,
    /// Row within the bank.
    pub row: u32,
}

/// Result of one stacked-DRAM transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DramAccess {
    /// Command latency of every chunk plus the transfer time.
    pub latency: SimTime,
    /// Number of DRAM requests the transfer was split into.
    pub requests: u64,
}

/// Bit widths of the stack's vault/bank/row fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackGeometry {
    /// Vault count.
    pub vaults: u32,
    /// Banks per vault.
    pub banks: u32,
    /// Rows per bank.
    pub rows: u32,
    vault_bits: u32,
    bank_bits: u32,
    row_bits: u32,
}

impl StackGeometry {
    /// Derives the geometry from a validated DRAM configuration.
    pub const fn new(config: &DramConfig) -> Self {
        let banks = config.banks_per_vault();
        let rows = config.rows_per_bank();
        Self {
            vaults: config.vaults,
            banks,
            rows,
            vault_bits: log2(config.vaults as u64),
            bank_bits: log2(banks as u64),
            row_bits: log2(rows as u64),
        }
    }

    /// Banks across all vaults.
    pub const fn total_banks(&self) -> u32 {
        self.vaults * self.banks
    }

    /// Global bank id of `(vault, bank)`.
    pub const fn bank_id(&self, vault: u32, bank: u32) -> u32 {
        vault * self.banks + bank
    }

    /// Inverse of [`StackGeometry::bank_id`].
    pub const fn split_bank_id(&self, id: u32) -> (u32, u32) {
        (id / self.banks, id % self.banks)
    }

    /// Places a cache set (or any row-granular index) in the stack.
    ///
    /// The low bits select the row, the next bits the vault, and the bits above
    /// those the bank; indices beyond the stack's capacity wrap onto the bank field.
    pub const fn locate_set(&self, set: u64) -> Location {
        let row = set & low_mask(self.row_bits);
        let vault = (set >> self.row_bits) & low_mask(self.vault_bits);
        let bank = (set >> (self.row_bits + self.vault_bits)) & low_mask(self.bank_bits);
        Location {
            vault: vault as u32,
            bank: bank as u32,
            row: row as u32,
        }
    }

    /// Places a byte address, interleaving `chunk`-byte units across vaults, then banks.
    pub const fn locate_address(&self, addr: u64, chunk: u64) -> Location {
        let mut unit = addr >> log2(chunk);
        let vault = unit & low_mask(self.vault_bits);
        unit >>= self.vault_bits;
        let bank = unit & low_mask(self.bank_bits);
        unit >>= self.bank_bits;
        let row = unit & low_mask(self.row_bits);
        Location {
            vault: vault as u32,
            bank: bank as u32,
            row: row as u32,
        }
    }
}

/// The vault array of a DRAM stack.
#[derive(Clone, Debug)]
pub struct StackedDram {
    geometry: StackGeometry,
    vaults: Vec<VaultTimingModel>,
    bandwidth: Bandwidth,
    request_bytes: u64,
    row_size: u64,
}

impl StackedDram {
    /// Builds the stack described by a validated configuration.
    pub fn new(config: &DramConfig) -> Self {
        let table = Arc::new(TimingTable::new(&config.speed));
        let mut vaults: Vec<VaultTimingModel> = (0..config.vaults)
            .map(|id| {
                VaultTimingModel::new(
                    id,
                    config.vault_size,
                    config.bank_size,
                    config.row_size,
                    config.auto_precharge,
                    &table,
                )
            })
            .collect();
        if config.refresh {
            let interval = config.speed.refresh_interval();
            for vault in &mut vaults {
                vault.set_refresh_interval(interval);
            }
        }
        Self {
            geometry: StackGeometry::new(config),
            vaults,
            bandwidth: config.bandwidth,
            request_bytes: config.request_bytes,
            row_size: config.row_size,
        }
    }

    /// Stack geometry.
    pub const fn geometry(&self) -> &StackGeometry {
        &self.geometry
    }

    /// Stack transfer rate.
    pub const fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    /// Row size in bytes.
    pub const fn row_size(&self) -> u64 {
        self.row_size
    }

    /// Places a byte address at request granularity.
    pub const fn locate_address(&self, addr: u64) -> Location {
        self.geometry.locate_address(addr, self.request_bytes)
    }

    /// Transfers `bytes` to or from a physical location.
    ///
    /// The transfer is split into `request_bytes` requests served back to back
    /// by the target vault, followed by the stack's transfer time for `bytes`.
    ///
    /// # Arguments
    ///
    /// * `time` - Arrival time of the first request.
    /// * `bytes` - Transfer size; zero still costs one request.
    /// * `location` - Physical vault, bank and row.
    /// * `access` - Read or write.
    ///
    /// # Errors
    ///
    /// [`TimingError::VaultOutOfRange`] for a vault the stack does not have, or
    /// any error raised by the vault.
    pub fn access(
        &mut self,
        time: SimTime,
        bytes: u64,
        location: Location,
        access: AccessType,
    ) -> Result<DramAccess, TimingError> {
        let vaults = self.geometry.vaults;
        let vault = self
            .vaults
            .get_mut(location.vault as usize)
            .ok_or(TimingError::VaultOutOfRange {
                vault: location.vault,
                vaults,
            })?;

        let requests = bytes.div_ceil(self.request_bytes).max(1);
        let mut latency = SimTime::ZERO;
        for _ in 0..requests {
            latency += vault.process_request(time + latency, access, location.bank, location.row)?;
        }
        latency += self.bandwidth.transfer_time(bytes);
        Ok(DramAccess { latency, requests })
    }

    /// Sets or clears the hot-refresh hint of a physical bank.
    ///
    /// # Errors
    ///
    /// [`TimingError::VaultOutOfRange`] or [`TimingError::BankOutOfRange`].
    pub fn set_bank_ref(&mut self, vault: u32, bank: u32, hot: bool) -> Result<(), TimingError> {
        let vaults = self.geometry.vaults;
        let banks = self.geometry.banks;
        let target = self
            .vaults
            .get_mut(vault as usize)
            .ok_or(TimingError::VaultOutOfRange { vault, vaults })?
            .bank_mut(bank)
            .ok_or(TimingError::BankOutOfRange { bank, banks })?;
        target.set_hot(hot);
        Ok(())
    }

    /// Returns the vault at `vault`.
    pub fn vault(&self, vault: u32) -> Option<&VaultTimingModel> {
        self.vaults.get(vault as usize)
    }

    /// Iterates over the vaults in index order.
    pub fn vaults(&self) -> impl Iterator<Item = &VaultTimingModel> {
        self.vaults.iter()
    }

    /// Snapshot of every vault's counters.
    pub fn stats(&self) -> Vec<VaultStats> {
        self.vaults.iter().map(VaultTimingModel::stats).collect()
    }

    /// Zeroes every counter.
    pub fn reset_stats(&mut self) {
        for vault in &mut self.vaults {
            vault.reset_stats();
        }
    }
}
