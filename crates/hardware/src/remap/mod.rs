//! Thermal remapping.
//!
//! This module provides:
//! 1. **Index Spaces:** Invariant-checked bijections for vaults, banks and per-row bank redirection.
//! 2. **Entries:** Per-logical-bank and per-logical-vault state (disabled, remapped, content validity).
//! 3. **Statistics:** Per-physical-bank temperature and access classification.
//! 4. **Manager:** [`RemappingManager`], which translates logical locations to physical ones and,
//!    once per thermal epoch, relieves hot entities according to the configured policy.
//!
//! Index conventions: a *logical* bank id is `vault * banks + bank` before any
//! remapping. The vault space maps the logical vault first; the bank space then maps
//! the resulting id to a *physical* bank id; a row space, if row `r` has been
//! migrated, finally redirects row `r` of that physical bank. Temperatures are
//! always indexed by physical bank id.

/// Remapping table entries.
pub mod entry;

/// Remappable index space.
pub mod space;

/// Temperature and access statistics.
pub mod stats;

/// Hot-row tracker.
pub mod tracker;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::common::error::RemapError;
use crate::config::{RemapConfig, RemapPolicy};
use crate::dram::{Location, StackGeometry};

pub use entry::RemapEntry;
pub use space::RemapSpace;
pub use stats::{RemapCounters, RemapStats, StatStore};
pub use tracker::HotRowTracker;

/// A (vault, bank) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BankAddr {
    /// Vault index.
    pub vault: u32,
    /// Bank within the vault.
    pub bank: u32,
}

impl BankAddr {
    /// Creates a pair.
    pub const fn new(vault: u32, bank: u32) -> Self {
        Self { vault, bank }
    }
}

/// Physical placement of a logical bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalLocation {
    /// Physical vault.
    pub vault: u32,
    /// Physical bank within the vault.
    pub bank: u32,
    /// `false` when the logical bank (or its vault) is disabled.
    pub valid: bool,
}

/// Row migration performed by the hybrid policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMigration {
    /// Logical bank that was hot.
    pub from: BankAddr,
    /// Logical bank whose physical bank received the rows.
    pub to: BankAddr,
    /// Migrated rows.
    pub rows: Vec<u32>,
}

/// Decisions taken in one thermal epoch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemapReport {
    /// Epoch number (1-based).
    pub epoch: u64,
    /// Logical bank swaps (hot bank, partner).
    pub bank_swaps: Vec<(BankAddr, BankAddr)>,
    /// Logical vault swaps (hot vault, partner).
    pub vault_swaps: Vec<(u32, u32)>,
    /// Hybrid row migrations.
    pub row_migrations: Vec<RowMigration>,
    /// Logical banks disabled.
    pub disabled_banks: Vec<BankAddr>,
    /// Logical vaults disabled.
    pub disabled_vaults: Vec<u32>,
    /// Logical banks returned home or re-enabled.
    pub recovered_banks: Vec<BankAddr>,
    /// Logical vaults returned home or re-enabled.
    pub recovered_vaults: Vec<u32>,
    /// Hot entities left unrelieved.
    pub failures: Vec<RemapError>,
}

impl RemapReport {
    /// Returns `true` if the epoch changed any mapping or entity state.
    pub fn changed(&self) -> bool {
        !(self.bank_swaps.is_empty()
            && self.vault_swaps.is_empty()
            && self.row_migrations.is_empty()
            && self.disabled_banks.is_empty()
            && self.disabled_vaults.is_empty()
            && self.recovered_banks.is_empty()
            && self.recovered_vaults.is_empty())
    }
}

/// Owner of the logical/physical mapping and the thermal policy.
#[derive(Clone, Debug)]
pub struct RemappingManager {
    config: RemapConfig,
    geometry: StackGeometry,
    vault_space: RemapSpace,
    bank_space: RemapSpace,
    row_spaces: BTreeMap<u32, RemapSpace>,
    banks: Vec<RemapEntry>,
    vaults: Vec<RemapEntry>,
    store: StatStore,
    counters: RemapCounters,
    epoch: u64,
}

impl RemappingManager {
    /// Creates an identity mapping with every bank at the initial temperature.
    ///
    /// # Arguments
    ///
    /// * `config` - Thresholds and policy.
    /// * `geometry` - Stack geometry.
    pub fn new(config: &RemapConfig, geometry: StackGeometry) -> Self {
        let total = geometry.total_banks();
        Self {
            config: config.clone(),
            geometry,
            vault_space: RemapSpace::new(geometry.vaults),
            bank_space: RemapSpace::new(total),
            row_spaces: BTreeMap::new(),
            banks: (0..total)
                .map(|id| RemapEntry::new(id, config.hot_rows))
                .collect(),
            vaults: (0..geometry.vaults)
                .map(|id| RemapEntry::new(id, config.hot_rows))
                .collect(),
            store: StatStore::new(geometry.vaults, geometry.banks, config.initial_temperature),
            counters: RemapCounters::default(),
            epoch: 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Index translation
    // ═══════════════════════════════════════════════════════════════════

    fn check(&self, vault: u32, bank: u32) -> Result<u32, RemapError> {
        if vault < self.geometry.vaults && bank < self.geometry.banks {
            Ok(self.geometry.bank_id(vault, bank))
        } else {
            Err(RemapError::OutOfRange { vault, bank })
        }
    }

    /// Bank-space index of logical bank `id` (after vault mapping).
    fn staged(&self, id: u32) -> u32 {
        let (vault, bank) = self.geometry.split_bank_id(id);
        let vault = self.vault_space.physical(vault).unwrap_or(vault);
        self.geometry.bank_id(vault, bank)
    }

    /// Physical bank id of logical bank `id`.
    fn physical_of(&self, id: u32) -> u32 {
        let staged = self.staged(id);
        self.bank_space.physical(staged).unwrap_or(staged)
    }

    /// Logical bank id currently placed on physical bank `id`.
    fn logical_of(&self, id: u32) -> u32 {
        let staged = self.bank_space.logical(id).unwrap_or(id);
        let (vault, bank) = self.geometry.split_bank_id(staged);
        let vault = self.vault_space.logical(vault).unwrap_or(vault);
        self.geometry.bank_id(vault, bank)
    }

    fn is_displaced(&self, id: u32) -> bool {
        let staged = self.staged(id);
        !self.bank_space.is_home(staged) || !self.vault_space.is_home(id / self.geometry.banks)
    }

    fn addr(&self, id: u32) -> BankAddr {
        let (vault, bank) = self.geometry.split_bank_id(id);
        BankAddr::new(vault, bank)
    }

    /// Global bank id of `(vault, bank)`.
    pub const fn bank_id(&self, vault: u32, bank: u32) -> u32 {
        self.geometry.bank_id(vault, bank)
    }

    /// Physical placement of logical `(vault, bank)`.
    ///
    /// # Errors
    ///
    /// [`RemapError::OutOfRange`] for indices outside the stack.
    pub fn physical_index(&self, vault: u32, bank: u32) -> Result<PhysicalLocation, RemapError> {
        let id = self.check(vault, bank)?;
        let (vault, bank) = self.geometry.split_bank_id(self.physical_of(id));
        Ok(PhysicalLocation {
            vault,
            bank,
            valid: !self.is_disabled_id(id),
        })
    }

    /// Logical `(vault, bank)` currently placed on physical `(vault, bank)`.
    ///
    /// # Errors
    ///
    /// [`RemapError::OutOfRange`] for indices outside the stack.
    pub fn logical_index(&self, vault: u32, bank: u32) -> Result<(u32, u32), RemapError> {
        let id = self.check(vault, bank)?;
        Ok(self.geometry.split_bank_id(self.logical_of(id)))
    }

    /// Physical location of a logical row, including hot-row redirection.
    ///
    /// # Errors
    ///
    /// [`RemapError::OutOfRange`] for indices outside the stack.
    pub fn physical_location(&self, location: Location) -> Result<Location, RemapError> {
        let id = self.check(location.vault, location.bank)?;
        let mut physical = self.physical_of(id);
        if let Some(space) = self.row_spaces.get(&location.row) {
            physical = space.physical(physical).unwrap_or(physical);
        }
        let (vault, bank) = self.geometry.split_bank_id(physical);
        Ok(Location {
            vault,
            bank,
            row: location.row,
        })
    }

    /// Returns `true` if every index space is a bijection and logical/physical
    /// translation round-trips for every bank.
    pub fn is_consistent(&self) -> bool {
        self.vault_space.is_bijection()
            && self.bank_space.is_bijection()
            && self.row_spaces.values().all(RemapSpace::is_bijection)
            && (0..self.geometry.total_banks())
                .all(|id| self.logical_of(self.physical_of(id)) == id && self.physical_of(self.logical_of(id)) == id)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Per-request hooks
    // ═══════════════════════════════════════════════════════════════════

    fn is_disabled_id(&self, id: u32) -> bool {
        let vault = id / self.geometry.banks;
        self.banks.get(id as usize).is_some_and(RemapEntry::is_disabled)
            || self.vaults.get(vault as usize).is_some_and(RemapEntry::is_disabled)
    }

    /// Returns `true` if logical `(vault, bank)` is excluded from use.
    pub fn is_disabled(&self, vault: u32, bank: u32) -> bool {
        self.check(vault, bank)
            .is_ok_and(|id| self.is_disabled_id(id))
    }

    /// Records `requests` DRAM requests to a logical row.
    ///
    /// # Errors
    ///
    /// [`RemapError::OutOfRange`] for indices outside the stack.
    pub fn access_row(&mut self, location: Location, requests: u64) -> Result<(), RemapError> {
        let id = self.check(location.vault, location.bank)?;
        let physical = self.physical_location(location)?;
        let physical_id = self.geometry.bank_id(physical.vault, physical.bank);
        let hot = self.store.temperature(physical_id) >= self.config.high_threshold;
        let remapped = physical_id != id;
        self.store.record_access(physical_id, requests, hot, remapped);
        if let Some(entry) = self.banks.get_mut(id as usize) {
            entry.record_access(location.row, requests);
        }
        if let Some(entry) = self.vaults.get_mut(location.vault as usize) {
            entry.record_access(location.bank, requests);
        }
        Ok(())
    }

    /// Stores a temperature reading for a physical bank.
    ///
    /// # Errors
    ///
    /// [`RemapError::OutOfRange`] for indices outside the stack.
    pub fn update_temperature(&mut self, vault: u32, bank: u32, temperature: f64) -> Result<(), RemapError> {
        let id = self.check(vault, bank)?;
        self.store.set_temperature(id, temperature);
        Ok(())
    }

    /// Latest reading of a physical bank.
    pub fn temperature(&self, vault: u32, bank: u32) -> Option<f64> {
        self.check(vault, bank)
            .ok()
            .map(|id| self.store.temperature(id))
    }

    /// Entry of logical `(vault, bank)`.
    pub fn bank_entry(&self, vault: u32, bank: u32) -> Option<&RemapEntry> {
        self.check(vault, bank)
            .ok()
            .and_then(|id| self.banks.get(id as usize))
    }

    /// Entry of logical vault `vault`.
    pub fn vault_entry(&self, vault: u32) -> Option<&RemapEntry> {
        self.vaults.get(vault as usize)
    }

    /// Returns `true` if logical `(vault, bank)` still holds valid cached content.
    pub fn is_content_valid(&self, vault: u32, bank: u32) -> bool {
        self.bank_entry(vault, bank)
            .is_none_or(RemapEntry::content_valid)
    }

    /// Returns `true` if row `row` of logical `(vault, bank)` moved in the last epoch.
    pub fn is_row_migrated(&self, vault: u32, bank: u32, row: u32) -> bool {
        self.bank_entry(vault, bank)
            .is_some_and(|e| e.migrated_rows().contains(&row))
    }

    /// Logical banks whose cached content was dropped in the last epoch.
    pub fn invalidated_banks(&self) -> impl Iterator<Item = BankAddr> + '_ {
        self.banks
            .iter()
            .filter(|e| !e.content_valid())
            .map(|e| self.addr(e.id()))
    }

    /// Logical `(bank, row)` pairs whose data moved in the last epoch.
    pub fn migrated_rows(&self) -> impl Iterator<Item = (BankAddr, u32)> + '_ {
        self.banks.iter().flat_map(move |e| {
            let addr = self.addr(e.id());
            e.migrated_rows().iter().map(move |&row| (addr, row))
        })
    }

    /// Returns `true` while the controller has invalidations or migrations to apply.
    pub fn pending_effects(&self) -> bool {
        self.banks.iter().any(RemapEntry::has_pending_effects)
    }

    /// Marks the last epoch's effects as applied.
    pub fn finish_remapping(&mut self) {
        for entry in self.banks.iter_mut().chain(self.vaults.iter_mut()) {
            entry.finish();
        }
    }

    /// Thermal epochs processed.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Remapping configuration.
    pub const fn config(&self) -> &RemapConfig {
        &self.config
    }

    /// Stack geometry.
    pub const fn geometry(&self) -> &StackGeometry {
        &self.geometry
    }

    /// Temperature and access statistics.
    pub const fn store(&self) -> &StatStore {
        &self.store
    }

    // ═══════════════════════════════════════════════════════════════════
    // Thermal mechanism
    // ═══════════════════════════════════════════════════════════════════

    /// Runs one thermal epoch against the current temperature snapshot.
    ///
    /// # Returns
    ///
    /// Every decision taken, including hot entities left unrelieved.
    pub fn run_mechanism(&mut self) -> RemapReport {
        self.epoch += 1;
        self.counters.epochs += 1;
        let mut report = RemapReport {
            epoch: self.epoch,
            ..RemapReport::default()
        };
        if !self.config.enabled {
            return report;
        }

        match self.config.policy {
            RemapPolicy::Disable => self.run_bank_disable(&mut report),
            RemapPolicy::VaultDisable => self.run_vault_disable(&mut report),
            RemapPolicy::Swap => {
                self.recover_banks(&mut report);
                if self.config.inter_vault {
                    self.recover_vaults(&mut report);
                    self.swap_vaults(&mut report);
                }
                self.relieve_banks(&mut report, false);
            }
            RemapPolicy::Hybrid => {
                self.recover_banks(&mut report);
                self.recover_rows(&mut report);
                self.relieve_banks(&mut report, true);
            }
        }

        self.counters.failures += report.failures.len() as u64;
        for failure in &report.failures {
            warn!(epoch = self.epoch, %failure, "remap target not found");
        }
        debug_assert!(self.is_consistent());
        report
    }

    fn frozen(&self, entry: &RemapEntry) -> bool {
        entry.in_cooldown(self.epoch, self.config.cooldown_epochs)
    }

    fn run_bank_disable(&mut self, report: &mut RemapReport) {
        for id in 0..self.geometry.total_banks() {
            let temperature = self.store.temperature(self.physical_of(id));
            let addr = self.addr(id);
            let entry = &mut self.banks[id as usize];
            if entry.is_disabled() {
                if temperature < self.config.remap_threshold {
                    entry.enable();
                    self.counters.recovery_times += 1;
                    report.recovered_banks.push(addr);
                    info!(vault = addr.vault, bank = addr.bank, temperature, "bank re-enabled");
                }
            } else if temperature >= self.config.high_threshold {
                entry.disable(false);
                self.counters.disable_times += 1;
                report.disabled_banks.push(addr);
                info!(vault = addr.vault, bank = addr.bank, temperature, "bank disabled");
            }
        }
    }

    fn run_vault_disable(&mut self, report: &mut RemapReport) {
        let banks = self.geometry.banks;
        for vault in 0..self.geometry.vaults {
            let physical = self.vault_space.physical(vault).unwrap_or(vault);
            let temperature = self.store.vault_temperature(physical);
            let entry = &mut self.vaults[vault as usize];
            if entry.is_disabled() {
                if temperature < self.config.remap_threshold {
                    entry.enable();
                    self.counters.recovery_times += 1;
                    report.recovered_vaults.push(vault);
                    info!(vault, temperature, "vault re-enabled");
                }
            } else if temperature >= self.config.high_threshold {
                entry.disable(false);
                self.counters.disable_times += 1;
                report.disabled_vaults.push(vault);
                for bank in 0..banks {
                    self.banks[self.geometry.bank_id(vault, bank) as usize].invalidate();
                }
                info!(vault, temperature, "vault disabled");
            }
        }
    }

    /// Re-enables cooled disabled banks and sends cooled displaced banks home.
    fn recover_banks(&mut self, report: &mut RemapReport) {
        for id in 0..self.geometry.total_banks() {
            let physical = self.physical_of(id);
            let temperature = self.store.temperature(physical);
            if temperature >= self.config.remap_threshold {
                continue;
            }
            let addr = self.addr(id);
            if self.banks[id as usize].is_disabled() {
                self.banks[id as usize].enable();
                self.counters.recovery_times += 1;
                report.recovered_banks.push(addr);
                info!(vault = addr.vault, bank = addr.bank, temperature, "bank re-enabled");
                continue;
            }

            let staged = self.staged(id);
            if self.bank_space.is_home(staged) || self.frozen(&self.banks[id as usize]) {
                continue;
            }
            if self.store.temperature(staged) >= self.config.remap_threshold {
                continue;
            }
            let Some(occupant) = self.bank_space.logical(staged) else {
                continue;
            };
            let other = self.logical_of_staged(occupant);
            if self.frozen(&self.banks[other as usize]) {
                continue;
            }
            if self.bank_space.reset(staged).is_some() {
                for moved in [id, other] {
                    let entry = &mut self.banks[moved as usize];
                    entry.invalidate();
                    entry.mark_remapped(self.epoch);
                }
                self.counters.recovery_times += 1;
                report.recovered_banks.push(addr);
                info!(vault = addr.vault, bank = addr.bank, temperature, "bank returned home");
            }
        }
    }

    /// Logical bank id of a bank-space index.
    fn logical_of_staged(&self, staged: u32) -> u32 {
        let (vault, bank) = self.geometry.split_bank_id(staged);
        let vault = self.vault_space.logical(vault).unwrap_or(vault);
        self.geometry.bank_id(vault, bank)
    }

    fn recover_vaults(&mut self, report: &mut RemapReport) {
        for vault in 0..self.geometry.vaults {
            if self.vault_space.is_home(vault) || self.frozen(&self.vaults[vault as usize]) {
                continue;
            }
            let current = self.vault_space.physical(vault).unwrap_or(vault);
            if self.store.vault_temperature(current) >= self.config.remap_threshold
                || self.store.vault_temperature(vault) >= self.config.remap_threshold
            {
                continue;
            }
            let Some(occupant) = self.vault_space.logical(vault) else {
                continue;
            };
            if self.frozen(&self.vaults[occupant as usize]) {
                continue;
            }
            if self.vault_space.reset(vault).is_some() {
                self.invalidate_vaults(&[vault, occupant]);
                self.counters.recovery_times += 1;
                report.recovered_vaults.push(vault);
                info!(vault, "vault returned home");
            }
        }
    }

    fn invalidate_vaults(&mut self, vaults: &[u32]) {
        for &vault in vaults {
            self.vaults[vault as usize].mark_remapped(self.epoch);
            for bank in 0..self.geometry.banks {
                self.banks[self.geometry.bank_id(vault, bank) as usize].invalidate();
            }
        }
    }

    fn swap_vaults(&mut self, report: &mut RemapReport) {
        for vault in 0..self.geometry.vaults {
            let entry = &self.vaults[vault as usize];
            if entry.is_disabled() || self.frozen(entry) || !self.vault_space.is_home(vault) {
                continue;
            }
            let temperature = self.store.vault_temperature(vault);
            if temperature < self.config.high_threshold {
                continue;
            }

            let target = (0..self.geometry.vaults)
                .filter(|&candidate| candidate != vault)
                .filter(|&candidate| {
                    self.store.vault_temperature(candidate) < self.config.remap_threshold
                })
                .filter(|&candidate| {
                    self.vault_space.logical(candidate).is_some_and(|owner| {
                        let owner_entry = &self.vaults[owner as usize];
                        self.vault_space.is_home(owner)
                            && !owner_entry.is_disabled()
                            && !self.frozen(owner_entry)
                    })
                })
                .min_by(|&a, &b| {
                    self.store
                        .vault_temperature(a)
                        .total_cmp(&self.store.vault_temperature(b))
                });

            let Some(target) = target else {
                report.failures.push(RemapError::VaultTargetNotFound { vault, temperature });
                continue;
            };
            let partner = self.vault_space.logical(target).unwrap_or(target);
            if self.vault_space.swap(vault, partner) {
                self.invalidate_vaults(&[vault, partner]);
                self.counters.vault_remap_times += 1;
                report.vault_swaps.push((vault, partner));
                info!(vault, partner, temperature, "vault swapped");
            }
        }
    }

    /// Coolest physical bank eligible to receive data from physical bank `hot`.
    fn find_bank_target(&self, hot: u32, require_home: bool) -> Option<u32> {
        let banks = self.geometry.banks;
        let range = if self.config.inter_vault {
            0..self.geometry.total_banks()
        } else {
            let start = (hot / banks) * banks;
            start..start + banks
        };
        range
            .filter(|&candidate| candidate != hot)
            .filter(|&candidate| self.store.temperature(candidate) < self.config.remap_threshold)
            .filter(|&candidate| {
                let owner = self.logical_of(candidate);
                let entry = &self.banks[owner as usize];
                !self.is_disabled_id(owner)
                    && !self.frozen(entry)
                    && (!require_home || !self.is_displaced(owner))
            })
            .min_by(|&a, &b| {
                self.store
                    .temperature(a)
                    .total_cmp(&self.store.temperature(b))
            })
    }

    /// Relieves hot banks by swapping them (or, with `migrate`, their hot rows)
    /// with the coolest eligible bank.
    fn relieve_banks(&mut self, report: &mut RemapReport, migrate: bool) {
        for id in 0..self.geometry.total_banks() {
            let entry = &self.banks[id as usize];
            let vault = &self.vaults[(id / self.geometry.banks) as usize];
            if self.is_disabled_id(id) || self.frozen(entry) || self.frozen(vault) {
                continue;
            }
            let physical = self.physical_of(id);
            let temperature = self.store.temperature(physical);
            if temperature < self.config.high_threshold {
                continue;
            }
            let addr = self.addr(id);
            let displaced = self.is_displaced(id);

            let relieved = if displaced && !migrate {
                false
            } else if let Some(target) = self.find_bank_target(physical, !migrate) {
                let partner = self.logical_of(target);
                if migrate {
                    self.migrate_rows(report, id, physical, partner, target)
                } else {
                    self.swap_banks(report, id, partner, temperature);
                    true
                }
            } else {
                report.failures.push(RemapError::TargetNotFound {
                    vault: addr.vault,
                    bank: addr.bank,
                    temperature,
                });
                false
            };

            if !relieved && temperature >= self.config.dangerous_threshold {
                self.banks[id as usize].disable(displaced);
                self.counters.disable_times += 1;
                if displaced {
                    self.counters.double_disable_times += 1;
                }
                report.disabled_banks.push(addr);
                info!(vault = addr.vault, bank = addr.bank, temperature, "bank disabled");
            }
        }
    }

    fn swap_banks(&mut self, report: &mut RemapReport, id: u32, partner: u32, temperature: f64) {
        let staged = self.staged(id);
        let partner_staged = self.staged(partner);
        if !self.bank_space.swap(staged, partner_staged) {
            return;
        }
        for moved in [id, partner] {
            let entry = &mut self.banks[moved as usize];
            entry.invalidate();
            entry.mark_remapped(self.epoch);
        }
        self.counters.remap_times += 1;
        let (from, to) = (self.addr(id), self.addr(partner));
        report.bank_swaps.push((from, to));
        info!(
            vault = from.vault,
            bank = from.bank,
            to_vault = to.vault,
            to_bank = to.bank,
            temperature,
            "bank swapped"
        );
    }

    fn migrate_rows(
        &mut self,
        report: &mut RemapReport,
        id: u32,
        physical: u32,
        partner: u32,
        target: u32,
    ) -> bool {
        let rows = self.banks[id as usize]
            .hot_rows()
            .hottest(self.config.hot_rows);
        if rows.is_empty() {
            return false;
        }
        let total = self.geometry.total_banks();
        for &row in &rows {
            let space = self
                .row_spaces
                .entry(row)
                .or_insert_with(|| RemapSpace::new(total));
            if space.swap(physical, target) {
                self.banks[id as usize].migrate_row(row);
                self.banks[partner as usize].migrate_row(row);
                self.counters.row_migrations += 1;
            }
        }
        for moved in [id, partner] {
            self.banks[moved as usize].mark_remapped(self.epoch);
        }
        let (from, to) = (self.addr(id), self.addr(partner));
        info!(vault = from.vault, bank = from.bank, rows = rows.len(), "hot rows migrated");
        report.row_migrations.push(RowMigration { from, to, rows });
        true
    }

    /// Swaps migrated rows back once their home bank has cooled.
    fn recover_rows(&mut self, report: &mut RemapReport) {
        let mut recovered = BTreeSet::new();
        let rows: Vec<u32> = self.row_spaces.keys().copied().collect();
        for row in rows {
            let Some(space) = self.row_spaces.get(&row) else {
                continue;
            };
            let displaced: Vec<u32> = space.displaced().collect();
            for physical in displaced {
                let Some((occupant, slot)) = self
                    .row_spaces
                    .get(&row)
                    .and_then(|s| s.logical(physical).zip(s.physical(physical)))
                else {
                    continue;
                };
                if occupant == physical {
                    continue;
                }
                // The row returns to `physical` and the occupant's row moves to `slot`.
                let owner = self.logical_of(physical);
                let other = self.logical_of(occupant);
                let holder = self.logical_of(slot);
                let cooled = [physical, slot]
                    .iter()
                    .all(|&id| self.store.temperature(id) < self.config.remap_threshold);
                if !cooled
                    || [owner, other, holder]
                        .iter()
                        .any(|&id| self.frozen(&self.banks[id as usize]))
                {
                    continue;
                }
                let Some(space) = self.row_spaces.get_mut(&row) else {
                    continue;
                };
                if space.reset(physical).is_some() {
                    for moved in [owner, other] {
                        self.banks[moved as usize].migrate_row(row);
                    }
                    self.counters.row_migrations += 1;
                    if recovered.insert(owner) {
                        self.counters.recovery_times += 1;
                    }
                }
            }
        }
        self.row_spaces.retain(|_, space| !space.is_identity());
        for owner in recovered {
            report.recovered_banks.push(self.addr(owner));
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statistics
    // ═══════════════════════════════════════════════════════════════════

    /// Snapshot of counters and per-bank statistics.
    pub fn stats(&self) -> RemapStats {
        let total = self.geometry.total_banks();
        RemapStats {
            counters: self.counters.clone(),
            displaced_banks: (0..total).filter(|&id| self.is_displaced(id)).count() as u32,
            disabled_banks: (0..total).filter(|&id| self.is_disabled_id(id)).count() as u32,
            temperatures: self.store.temperatures().to_vec(),
            hot_accesses: self.store.hot_accesses().to_vec(),
            cool_accesses: self.store.cool_accesses().to_vec(),
            remap_accesses: self.store.remap_accesses().to_vec(),
        }
    }

    /// Zeroes counters; mappings and temperatures are kept.
    pub fn reset_stats(&mut self) {
        self.counters = RemapCounters::default();
        self.store.reset_accesses();
        for entry in self.banks.iter_mut().chain(self.vaults.iter_mut()) {
            entry.reset_stats();
        }
    }
}
