//! Remapping table entries.
//!
//! One [`RemapEntry`] exists per logical bank and per logical vault. The entry
//! carries the thermal state of the entity (disabled, recently remapped) and
//! the data-validity consequences of the last epoch (content invalidated,
//! rows migrated) until the cache controller has applied them.

use std::collections::BTreeSet;

use crate::remap::tracker::HotRowTracker;

/// State of one logical bank or vault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemapEntry {
    id: u32,
    content_valid: bool,
    disabled: bool,
    double_disabled: bool,
    remapped_at: Option<u64>,
    accesses: u64,
    hot_rows: HotRowTracker,
    migrated_rows: BTreeSet<u32>,
}

impl RemapEntry {
    /// Creates an entry for logical `id` with valid content.
    pub const fn new(id: u32, hot_rows: usize) -> Self {
        Self {
            id,
            content_valid: true,
            disabled: false,
            double_disabled: false,
            remapped_at: None,
            accesses: 0,
            hot_rows: HotRowTracker::new(hot_rows),
            migrated_rows: BTreeSet::new(),
        }
    }

    /// Logical id.
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// `false` once the entity's cached content must be dropped.
    pub const fn content_valid(&self) -> bool {
        self.content_valid
    }

    /// Excluded from use.
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disabled after already being displaced.
    pub const fn is_double_disabled(&self) -> bool {
        self.double_disabled
    }

    /// Epoch of the last remap involving this entity.
    pub const fn remapped_at(&self) -> Option<u64> {
        self.remapped_at
    }

    /// Returns `true` while the entity is frozen after a remap.
    ///
    /// An entity remapped in epoch `e` is frozen through epoch `e + cooldown`.
    pub fn in_cooldown(&self, epoch: u64, cooldown: u64) -> bool {
        self.remapped_at
            .is_some_and(|at| epoch.saturating_sub(at) <= cooldown)
    }

    /// DRAM requests routed to the entity.
    pub const fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Frequently accessed rows.
    pub const fn hot_rows(&self) -> &HotRowTracker {
        &self.hot_rows
    }

    /// Rows whose data moved in the last epoch.
    pub const fn migrated_rows(&self) -> &BTreeSet<u32> {
        &self.migrated_rows
    }

    /// Returns `true` if the controller has work to do for this entity.
    pub fn has_pending_effects(&self) -> bool {
        !self.content_valid || !self.migrated_rows.is_empty()
    }

    pub(crate) fn record_access(&mut self, row: u32, requests: u64) {
        self.accesses += requests;
        self.hot_rows.record(row);
    }

    pub(crate) fn mark_remapped(&mut self, epoch: u64) {
        self.remapped_at = Some(epoch);
    }

    pub(crate) fn invalidate(&mut self) {
        self.content_valid = false;
        self.migrated_rows.clear();
    }

    pub(crate) fn migrate_row(&mut self, row: u32) {
        if self.content_valid {
            let _ = self.migrated_rows.insert(row);
        }
    }

    pub(crate) fn disable(&mut self, double: bool) {
        self.disabled = true;
        self.double_disabled = double;
        self.invalidate();
    }

    pub(crate) fn enable(&mut self) {
        self.disabled = false;
        self.double_disabled = false;
    }

    pub(crate) fn finish(&mut self) {
        self.content_valid = true;
        self.migrated_rows.clear();
    }

    pub(crate) fn reset_stats(&mut self) {
        self.accesses = 0;
        self.hot_rows.clear();
    }
}
