//! Thermal and access statistics of the physical stack.
//!
//! Temperatures arrive from the thermal collaborator per physical bank. Access
//! counters classify each DRAM request by the state of the bank that served it:
//! hot (at or above the high threshold), cool, and remapped (served on behalf of
//! a displaced logical bank).

use serde::Serialize;

/// Per-physical-bank temperature and access counters.
#[derive(Clone, Debug)]
pub struct StatStore {
    banks_per_vault: u32,
    temperatures: Vec<f64>,
    hot_accesses: Vec<u64>,
    cool_accesses: Vec<u64>,
    remap_accesses: Vec<u64>,
}

impl StatStore {
    /// Creates a store with every bank at `initial` degrees.
    pub fn new(vaults: u32, banks_per_vault: u32, initial: f64) -> Self {
        let total = (vaults * banks_per_vault) as usize;
        Self {
            banks_per_vault,
            temperatures: vec![initial; total],
            hot_accesses: vec![0; total],
            cool_accesses: vec![0; total],
            remap_accesses: vec![0; total],
        }
    }

    /// Temperature of physical bank `id`.
    pub fn temperature(&self, id: u32) -> f64 {
        self.temperatures.get(id as usize).copied().unwrap_or(f64::NAN)
    }

    /// Stores a reading for physical bank `id`; out-of-range ids are ignored.
    pub fn set_temperature(&mut self, id: u32, temperature: f64) {
        if let Some(slot) = self.temperatures.get_mut(id as usize) {
            *slot = temperature;
        }
    }

    /// Mean temperature of physical vault `vault`.
    pub fn vault_temperature(&self, vault: u32) -> f64 {
        let start = (vault * self.banks_per_vault) as usize;
        let end = start + self.banks_per_vault as usize;
        match self.temperatures.get(start..end) {
            Some(banks) if !banks.is_empty() => banks.iter().sum::<f64>() / banks.len() as f64,
            _ => f64::NAN,
        }
    }

    /// Classifies `requests` DRAM requests served by physical bank `id`.
    pub fn record_access(&mut self, id: u32, requests: u64, hot: bool, remapped: bool) {
        let index = id as usize;
        let counters = if hot {
            &mut self.hot_accesses
        } else {
            &mut self.cool_accesses
        };
        if let Some(count) = counters.get_mut(index) {
            *count += requests;
        }
        if let Some(count) = self.remap_accesses.get_mut(index).filter(|_| remapped) {
            *count += requests;
        }
    }

    /// Zeroes the access counters; temperatures are kept.
    pub fn reset_accesses(&mut self) {
        self.hot_accesses.fill(0);
        self.cool_accesses.fill(0);
        self.remap_accesses.fill(0);
    }

    /// Per-bank temperatures, indexed by physical bank id.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Requests served while hot, per physical bank.
    pub fn hot_accesses(&self) -> &[u64] {
        &self.hot_accesses
    }

    /// Requests served while cool, per physical bank.
    pub fn cool_accesses(&self) -> &[u64] {
        &self.cool_accesses
    }

    /// Requests served for displaced logical banks, per physical bank.
    pub fn remap_accesses(&self) -> &[u64] {
        &self.remap_accesses
    }
}

/// Counters of remapping decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemapCounters {
    /// Thermal epochs processed.
    pub epochs: u64,
    /// Entities disabled.
    pub disable_times: u64,
    /// Disables of entities that were already displaced.
    pub double_disable_times: u64,
    /// Bank swaps.
    pub remap_times: u64,
    /// Vault swaps.
    pub vault_remap_times: u64,
    /// Rows migrated by the hybrid policy.
    pub row_migrations: u64,
    /// Entities returned home or re-enabled.
    pub recovery_times: u64,
    /// Hot entities left unrelieved for lack of a target.
    pub failures: u64,
}

/// Snapshot of the remapping layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RemapStats {
    /// Decision counters.
    #[serde(flatten)]
    pub counters: RemapCounters,
    /// Logical banks currently displaced.
    pub displaced_banks: u32,
    /// Logical banks currently disabled.
    pub disabled_banks: u32,
    /// Per-physical-bank temperature.
    pub temperatures: Vec<f64>,
    /// Per-physical-bank hot accesses.
    pub hot_accesses: Vec<u64>,
    /// Per-physical-bank cool accesses.
    pub cool_accesses: Vec<u64>,
    /// Per-physical-bank accesses on behalf of displaced banks.
    pub remap_accesses: Vec<u64>,
}
