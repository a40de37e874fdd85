//! Error definitions.
//!
//! This module defines the error taxonomy of the model. It provides:
//! 1. **Configuration Errors:** Rejected geometry or thresholds; fatal at construction.
//! 2. **Timing Errors:** A bank command with no timing-table entry, or an out-of-range bank/row.
//! 3. **Cache Errors:** Tag-update lookups that find nothing, bad way indices, duplicate tags.
//! 4. **Remap Errors:** No cooler target for a hot entity, or out-of-range thermal input.
//!
//! Everything below the [`PerfModel`](crate::perf::PerfModel) boundary returns these
//! through `Result`; the facade logs per-request errors and degrades to zero extra latency.

use thiserror::Error;

use crate::dram::timing::Command;

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size or count that must be non-zero was zero.
    #[error("`{field}` must be non-zero")]
    Zero {
        /// Configuration field name.
        field: &'static str,
    },

    /// A size or count that is used as a bit mask was not a power of two.
    #[error("`{field}` must be a power of two (got {value})")]
    NotPowerOfTwo {
        /// Configuration field name.
        field: &'static str,
        /// Rejected value.
        value: u64,
    },

    /// Fields that are individually valid but contradict each other.
    #[error("inconsistent configuration: {reason}")]
    Inconsistent {
        /// Human-readable description.
        reason: String,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// DRAM timing-model faults.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TimingError {
    /// The timing table has no entry for the requested command transition.
    #[error("illegal DRAM command transition {from} -> {to}")]
    IllegalTransition {
        /// Last command issued to the bank.
        from: Command,
        /// Rejected command.
        to: Command,
    },

    /// A request named a bank the vault does not have.
    #[error("bank {bank} out of range (vault has {banks} banks)")]
    BankOutOfRange {
        /// Requested bank.
        bank: u32,
        /// Banks per vault.
        banks: u32,
    },

    /// A command named a row the bank does not have.
    #[error("row {row} out of range (bank has {rows} rows)")]
    RowOutOfRange {
        /// Requested row.
        row: u32,
        /// Rows per bank.
        rows: u32,
    },

    /// A column command named a row that is not the open row.
    #[error("{cmd} to row {row} but open row is {open:?}")]
    RowNotOpen {
        /// Rejected command.
        cmd: Command,
        /// Requested row.
        row: u32,
        /// Row currently open, if any.
        open: Option<u32>,
    },

    /// A request named a vault the stack does not have.
    #[error("vault {vault} out of range (stack has {vaults} vaults)")]
    VaultOutOfRange {
        /// Requested vault.
        vault: u32,
        /// Vault count.
        vaults: u32,
    },
}

/// Cache-set metadata faults.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A usage update named a tag that no valid way holds.
    #[error("tag {tag:#x} not present in set")]
    LookupMiss {
        /// Tag that was looked up.
        tag: u64,
    },

    /// A replacement index outside the set.
    #[error("way {index} out of range (set has {ways} ways)")]
    IndexOutOfRange {
        /// Requested way.
        index: usize,
        /// Associativity.
        ways: usize,
    },

    /// A sub-block index beyond what a line tracks.
    #[error("block {block} out of range (line tracks {blocks} blocks)")]
    BlockOutOfRange {
        /// Requested sub-block.
        block: u32,
        /// Sub-blocks per line.
        blocks: u32,
    },

    /// Installing the tag would leave two valid ways with the same tag.
    #[error("tag {tag:#x} already resident in another way")]
    DuplicateTag {
        /// Offending tag.
        tag: u64,
    },
}

/// Remapping-layer faults.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RemapError {
    /// No enabled, cool, unmapped bank was available for a hot bank.
    #[error("no remap target for hot bank {bank} in vault {vault} ({temperature:.1} C)")]
    TargetNotFound {
        /// Logical vault of the hot bank.
        vault: u32,
        /// Logical bank within the vault.
        bank: u32,
        /// Temperature that triggered the remap.
        temperature: f64,
    },

    /// No cool, unmapped vault was available for a hot vault.
    #[error("no remap target for hot vault {vault} ({temperature:.1} C)")]
    VaultTargetNotFound {
        /// Logical vault.
        vault: u32,
        /// Mean vault temperature that triggered the remap.
        temperature: f64,
    },

    /// A vault/bank pair outside the stack geometry.
    #[error("vault {vault} bank {bank} out of range")]
    OutOfRange {
        /// Requested vault.
        vault: u32,
        /// Requested bank.
        bank: u32,
    },
}

/// Any error raised by the model.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// DRAM timing fault.
    #[error(transparent)]
    Timing(#[from] TimingError),
    /// Cache metadata fault.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// Remapping fault.
    #[error(transparent)]
    Remap(#[from] RemapError),
}
