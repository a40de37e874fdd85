//! Model statistics.
//!
//! This module gathers the counters of every layer into one serializable snapshot:
//! 1. **Requests:** Accesses served, summed latency and anomalies absorbed by the facade.
//! 2. **Cache:** Hits, misses, block traffic and remap side effects ([`CacheStats`]).
//! 3. **DRAM:** Per-vault and per-bank command latency, counts and row hits ([`VaultStats`]).
//! 4. **Remapping:** Thermal decisions and per-bank access classification ([`RemapStats`]).
//!
//! The core never writes files; hosts serialize [`PerfStats`] or print its
//! [`std::fmt::Display`] report.

use std::fmt;

use serde::Serialize;

use crate::common::time::SimTime;
use crate::dram::BankStats;

pub use crate::controller::CacheStats;
pub use crate::dram::VaultStats;
pub use crate::remap::{RemapCounters, RemapStats};

/// Snapshot of the whole model.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PerfStats {
    /// Requests answered.
    pub accesses: u64,
    /// Sum of returned latencies.
    pub total_latency: SimTime,
    /// Requests that failed part-way or arrived out of order.
    pub anomalies: u64,
    /// Controller counters.
    pub cache: CacheStats,
    /// Per-vault DRAM counters.
    pub dram: Vec<VaultStats>,
    /// Remapping counters.
    pub remap: RemapStats,
}

impl PerfStats {
    /// Mean latency per request.
    pub fn average_latency(&self) -> SimTime {
        if self.accesses == 0 {
            SimTime::ZERO
        } else {
            SimTime::from_ps(self.total_latency.as_ps() / self.accesses)
        }
    }

    /// DRAM counters summed over every bank of every vault.
    pub fn dram_total(&self) -> BankStats {
        let mut total = BankStats::default();
        for vault in &self.dram {
            total.merge(&vault.total);
        }
        total
    }

    /// Fraction of requests that hit in the cache.
    pub fn hit_rate(&self) -> f64 {
        if self.cache.accesses == 0 {
            0.0
        } else {
            1.0 - self.cache.misses as f64 / self.cache.accesses as f64
        }
    }
}

impl fmt::Display for PerfStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "----------------------------------------------------------";
        writeln!(f, "==========================================================")?;
        writeln!(f, "STACKED DRAM CACHE STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "requests                 {}", self.accesses)?;
        writeln!(f, "latency.total            {}", self.total_latency)?;
        writeln!(f, "latency.average          {}", self.average_latency())?;
        writeln!(f, "anomalies                {}", self.anomalies)?;
        writeln!(f, "{rule}")?;

        let cache = &self.cache;
        writeln!(f, "CACHE")?;
        writeln!(f, "  reads                  {}", cache.reads)?;
        writeln!(f, "  writes                 {}", cache.writes)?;
        writeln!(f, "  misses                 {} ({:.2}% hit)", cache.misses, self.hit_rate() * 100.0)?;
        writeln!(f, "  misses.page            {}", cache.page_misses)?;
        writeln!(f, "  misses.block           {}", cache.block_misses)?;
        writeln!(f, "  bypass.disabled        {}", cache.disabled_accesses)?;
        writeln!(f, "  blocks.loaded          {}", cache.loaded_blocks)?;
        writeln!(f, "  blocks.writeback       {}", cache.writeback_blocks)?;
        writeln!(f, "  remap.invalidated      {} sets / {} blocks", cache.invalidations, cache.invalidated_blocks)?;
        writeln!(f, "  remap.migrated         {} sets / {} blocks", cache.migrations, cache.migrated_blocks)?;
        if cache.segment_hits + cache.segment_swaps > 0 {
            writeln!(f, "  segment.hits           {}", cache.segment_hits)?;
            writeln!(f, "  segment.swaps          {}", cache.segment_swaps)?;
        }
        writeln!(f, "{rule}")?;

        let dram = self.dram_total();
        writeln!(f, "DRAM")?;
        writeln!(f, "  reads                  {}", dram.reads)?;
        writeln!(f, "  writes                 {}", dram.writes)?;
        writeln!(f, "  row_hits               {} ({:.2}%)", dram.row_hits, dram.row_hit_rate() * 100.0)?;
        writeln!(f, "  refreshes              {}", dram.refreshes)?;
        writeln!(f, "  t.act                  {}", dram.t_act)?;
        writeln!(f, "  t.pre                  {}", dram.t_pre)?;
        writeln!(f, "  t.rd                   {}", dram.t_rd)?;
        writeln!(f, "  t.wr                   {}", dram.t_wr)?;
        writeln!(f, "{rule}")?;

        let remap = &self.remap.counters;
        writeln!(f, "REMAPPING")?;
        writeln!(f, "  epochs                 {}", remap.epochs)?;
        writeln!(f, "  swaps.bank             {}", remap.remap_times)?;
        writeln!(f, "  swaps.vault            {}", remap.vault_remap_times)?;
        writeln!(f, "  rows.migrated          {}", remap.row_migrations)?;
        writeln!(f, "  disables               {} ({} double)", remap.disable_times, remap.double_disable_times)?;
        writeln!(f, "  recoveries             {}", remap.recovery_times)?;
        writeln!(f, "  failures               {}", remap.failures)?;
        writeln!(f, "  banks.displaced        {}", self.remap.displaced_banks)?;
        writeln!(f, "  banks.disabled         {}", self.remap.disabled_banks)?;
        write!(f, "{rule}")
    }
}
