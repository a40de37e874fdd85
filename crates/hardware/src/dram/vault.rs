//! Vault timing model.
//!
//! A vault owns `vault_size / bank_size` banks and turns a (bank, row, access)
//! request into the command sequence the bank's state requires:
//! 1. **Row closed:** ACT, then the column command.
//! 2. **Row open:** the column command alone (row-buffer hit).
//! 3. **Other row open:** PRE, ACT, then the column command.
//!
//! With `auto_precharge` the vault closes the row after every access, so the
//! open-page and close-page policies share this single path.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::common::data::AccessType;
use crate::common::error::TimingError;
use crate::common::time::SimTime;
use crate::dram::bank::{BankStats, BankTimingModel};
use crate::dram::timing::{Command, TimingTable};

/// Per-vault counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VaultStats {
    /// Vault index.
    pub vault: u32,
    /// Requests served.
    pub requests: u64,
    /// Sum over the vault's banks.
    pub total: BankStats,
    /// Per-bank counters, indexed by bank.
    pub banks: Vec<BankStats>,
}

/// Timing model of one vault.
#[derive(Clone, Debug)]
pub struct VaultTimingModel {
    id: u32,
    banks: Vec<BankTimingModel>,
    auto_precharge: bool,
    requests: u64,
}

impl VaultTimingModel {
    /// Creates a vault with every bank closed.
    ///
    /// # Arguments
    ///
    /// * `id` - Vault index, used in statistics and logs.
    /// * `vault_size` - Vault capacity in bytes.
    /// * `bank_size` - Bank capacity in bytes.
    /// * `row_size` - Row size in bytes.
    /// * `auto_precharge` - Close the row after every access.
    /// * `table` - Shared command timing table.
    pub fn new(
        id: u32,
        vault_size: u64,
        bank_size: u64,
        row_size: u64,
        auto_precharge: bool,
        table: &Arc<TimingTable>,
    ) -> Self {
        let count = if bank_size == 0 { 0 } else { vault_size / bank_size };
        let banks = (0..count)
            .map(|_| BankTimingModel::new(bank_size, row_size, Arc::clone(table)))
            .collect();
        Self {
            id,
            banks,
            auto_precharge,
            requests: 0,
        }
    }

    /// Serves one DRAM request.
    ///
    /// # Arguments
    ///
    /// * `time` - Request arrival time.
    /// * `access` - Read or write.
    /// * `bank` - Bank within this vault.
    /// * `row` - Row within the bank.
    ///
    /// # Returns
    ///
    /// The summed latency of every command issued for the request, including
    /// any refresh that fell due.
    ///
    /// # Errors
    ///
    /// [`TimingError::BankOutOfRange`] for a bank the vault does not have, or any
    /// error raised by the bank's command state machine.
    pub fn process_request(
        &mut self,
        time: SimTime,
        access: AccessType,
        bank: u32,
        row: u32,
    ) -> Result<SimTime, TimingError> {
        let banks = self.bank_count();
        let target = self
            .banks
            .get_mut(bank as usize)
            .ok_or(TimingError::BankOutOfRange { bank, banks })?;

        let mut latency = SimTime::ZERO;
        if target.refresh_due(time) {
            latency += target.refresh(time)?;
        }

        match target.open_row() {
            Some(open) if open == row => {}
            Some(open) => {
                latency += target.process_command(Command::Pre, open, time + latency)?;
                latency += target.process_command(Command::Act, row, time + latency)?;
            }
            None => {
                latency += target.process_command(Command::Act, row, time + latency)?;
            }
        }

        let column = if access.is_write() {
            Command::Wr
        } else {
            Command::Rd
        };
        latency += target.process_command(column, row, time + latency)?;

        if self.auto_precharge {
            latency += target.process_command(Command::Pre, row, time + latency)?;
        }

        self.requests += 1;
        debug!(vault = self.id, bank, row, %access, %latency, "vault request");
        Ok(latency)
    }

    /// Vault index.
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Number of banks.
    pub const fn bank_count(&self) -> u32 {
        self.banks.len() as u32
    }

    /// Returns the bank at `bank`.
    pub fn bank(&self, bank: u32) -> Option<&BankTimingModel> {
        self.banks.get(bank as usize)
    }

    /// Mutable access to the bank at `bank`.
    pub fn bank_mut(&mut self, bank: u32) -> Option<&mut BankTimingModel> {
        self.banks.get_mut(bank as usize)
    }

    /// Iterates over the banks in index order.
    pub fn banks(&self) -> impl Iterator<Item = &BankTimingModel> {
        self.banks.iter()
    }

    /// Installs the refresh interval on every bank.
    pub fn set_refresh_interval(&mut self, interval: SimTime) {
        for bank in &mut self.banks {
            bank.set_refresh_interval(interval);
        }
    }

    /// Snapshot of the vault's counters.
    pub fn stats(&self) -> VaultStats {
        let banks: Vec<BankStats> = self.banks.iter().map(|b| b.stats().clone()).collect();
        let mut total = BankStats::default();
        for bank in &banks {
            total.merge(bank);
        }
        VaultStats {
            vault: self.id,
            requests: self.requests,
            total,
            banks,
        }
    }

    /// Zeroes every counter; row state is kept.
    pub fn reset_stats(&mut self) {
        self.requests = 0;
        for bank in &mut self.banks {
            bank.reset_stats();
        }
    }
}
