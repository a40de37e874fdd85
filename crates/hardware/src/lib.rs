//! Stacked-DRAM cache timing model with thermal remapping.
//!
//! This crate models a die-stacked DRAM cache in front of main memory with the following:
//! 1. **DRAM:** Per-bank command state machines with transition-latency tables, grouped into vaults.
//! 2. **Cache:** Line metadata, replacement policies, sets and the footprint history table.
//! 3. **Controller:** Alloy, Unison and Constant cache models behind one request path.
//! 4. **Remapping:** Thermally-driven bank/vault disabling, swapping and hot-row migration
//!    over invariant-checked logical-to-physical index spaces.
//! 5. **Facade:** [`PerfModel`], the never-failing latency oracle a host simulator calls.

/// Common types (addresses, access types, errors, time).
pub mod common;
/// Model configuration (defaults, enums, validation).
pub mod config;
/// Stacked-DRAM cache controller and its models.
pub mod controller;
/// Cache metadata (lines, sets, replacement, footprint history).
pub mod cache;
/// DRAM timing (commands, banks, vaults, stack placement).
pub mod dram;
/// Host-facing performance model.
pub mod perf;
/// Thermal remapping layer.
pub mod remap;
/// Statistics snapshots.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Error returned by fallible model operations.
pub use crate::common::error::SimError;
/// Simulated time in picoseconds.
pub use crate::common::time::SimTime;
/// Read/write classification of a request.
pub use crate::common::data::AccessType;
/// The model; construct with `PerfModel::new`.
pub use crate::perf::{PerfModel, ThermalReading, ThermalSource};
/// Decisions of one thermal epoch.
pub use crate::remap::RemapReport;
/// Snapshot returned by `PerfModel::stats`.
pub use crate::stats::PerfStats;
