//! Stacked-DRAM cache controller.
//!
//! This module provides:
//! 1. **Shared Request Path:** Time ordering, lazy application of remap effects,
//!    lookup cost, address splitting and the disabled-bank bypass.
//! 2. **Models:** Alloy (direct-mapped blocks), Unison (footprint-predicted pages)
//!    and Constant (segment swapping), selected by [`Mode`].
//! 3. **Page Translation:** Optional first-touch compaction of sparse traces.
//!
//! Every DRAM transfer goes through one helper that translates the logical
//! location through the remapping layer, issues the chunked access and feeds
//! the access counters back. Transfers of one request are serialized: each
//! starts at the arrival time plus the latency accumulated so far.

/// Direct-mapped block cache.
pub mod alloy;

/// Segment-swapping fast-memory model.
pub mod constant;

/// Footprint-predicting page cache.
pub mod unison;

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheSet, FootprintHistoryTable, SetKind};
use crate::common::addr::{AddressSplitter, SplitAddress};
use crate::common::data::AccessType;
use crate::common::error::{CacheError, SimError};
use crate::common::time::SimTime;
use crate::config::{CacheModel, Config, MemoryConfig};
use crate::dram::{Location, StackedDram};
use crate::remap::RemappingManager;

pub use constant::{SegmentEntry, SegmentOutcome};

/// Bytes read to fetch a set's tags.
pub const TAG_BYTES: u64 = 64;

/// Page granularity of [`PageTranslator`].
pub const TRANSLATION_PAGE: u64 = 4096;

/// Model-specific controller state.
#[derive(Clone, Debug)]
pub enum Mode {
    /// Direct-mapped block cache with tags and data in the same row.
    Alloy,
    /// Associative page cache with footprint prediction.
    Unison {
        /// Footprint history.
        fht: FootprintHistoryTable,
    },
    /// Segment swapping between slow and fast memory.
    Constant {
        /// One entry per fast-memory segment.
        segments: Vec<SegmentEntry>,
    },
}

impl Mode {
    /// Model this state belongs to.
    pub const fn model(&self) -> CacheModel {
        match self {
            Self::Alloy => CacheModel::Alloy,
            Self::Unison { .. } => CacheModel::Unison,
            Self::Constant { .. } => CacheModel::Constant,
        }
    }
}

/// Controller counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests served.
    pub accesses: u64,
    /// Read requests.
    pub reads: u64,
    /// Write requests.
    pub writes: u64,
    /// Requests that did not hit.
    pub misses: u64,
    /// Tag misses.
    pub page_misses: u64,
    /// Resident pages missing the requested block.
    pub block_misses: u64,
    /// Requests bypassed to off-chip memory because their bank was disabled.
    pub disabled_accesses: u64,
    /// Dirty blocks written back off-chip.
    pub writeback_blocks: u64,
    /// Blocks loaded from off-chip memory.
    pub loaded_blocks: u64,
    /// Sets dropped by remapping.
    pub invalidations: u64,
    /// Blocks dropped by remapping.
    pub invalidated_blocks: u64,
    /// Sets moved by row migration.
    pub migrations: u64,
    /// Blocks moved by row migration.
    pub migrated_blocks: u64,
    /// Constant-model requests served from the resident slot.
    pub segment_hits: u64,
    /// Constant-model segment swaps.
    pub segment_swaps: u64,
    /// Requests that arrived earlier than their predecessor.
    pub out_of_order: u64,
    /// Metadata reads summed over sets.
    pub set_reads: u64,
    /// Metadata writes summed over sets.
    pub set_writes: u64,
}

/// A request that failed part-way.
#[derive(Debug, Error)]
#[error("{source} (after {latency})")]
pub struct RequestError {
    /// What failed.
    #[source]
    pub source: SimError,
    /// Latency accumulated before the failure.
    pub latency: SimTime,
}

/// First-touch virtual-to-physical page compaction.
///
/// Pages are numbered in the order they are first seen, so a sparse address
/// trace folds onto a dense prefix of the address space.
#[derive(Clone, Debug, Default)]
pub struct PageTranslator {
    frames: HashMap<u64, u64>,
}

impl PageTranslator {
    /// Creates an empty translator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates `addr`, allocating the next frame for an unseen page.
    pub fn translate(&mut self, addr: u64) -> u64 {
        let page = addr / TRANSLATION_PAGE;
        let next = self.frames.len() as u64;
        let frame = *self.frames.entry(page).or_insert(next);
        frame * TRANSLATION_PAGE + addr % TRANSLATION_PAGE
    }

    /// Pages seen so far.
    pub fn pages(&self) -> usize {
        self.frames.len()
    }
}

/// The stacked-DRAM cache controller.
#[derive(Debug)]
pub struct CacheController {
    mode: Mode,
    sets: Vec<CacheSet>,
    splitter: AddressSplitter,
    block_size: u64,
    segment_size: u64,
    slots: u32,
    memory: MemoryConfig,
    dram: StackedDram,
    remap: RemappingManager,
    translator: Option<PageTranslator>,
    last_time: SimTime,
    stats: CacheStats,
}

impl CacheController {
    /// Builds the controller described by a validated configuration.
    pub fn new(config: &Config) -> Self {
        let dram = StackedDram::new(&config.dram);
        let geometry = *dram.geometry();
        let cache = &config.cache;
        let ways = cache.associativity as usize;

        let (mode, line, sets) = match cache.model {
            CacheModel::Alloy => {
                let sets = (0..cache.sets)
                    .map(|set| {
                        let placement = geometry.locate_set(set / cache.tags_per_row);
                        CacheSet::new(SetKind::DirectMappedBlock, 1, cache.replacement, placement)
                    })
                    .collect();
                (Mode::Alloy, cache.block_size, sets)
            }
            CacheModel::Unison => {
                let sets = (0..cache.sets)
                    .map(|set| {
                        CacheSet::new(
                            SetKind::AssociativePage,
                            ways,
                            cache.replacement,
                            geometry.locate_set(set),
                        )
                    })
                    .collect();
                let fht = FootprintHistoryTable::new(cache.footprint_entries, cache.blocks_per_page());
                (Mode::Unison { fht }, cache.page_size, sets)
            }
            CacheModel::Constant => {
                let segment = &config.segment;
                let segments = (0..segment.entries())
                    .map(|_| SegmentEntry::new(segment.slots, segment.swap_count))
                    .collect();
                (Mode::Constant { segments }, cache.block_size, Vec::new())
            }
        };

        Self {
            mode,
            sets,
            splitter: AddressSplitter::new(line, cache.sets),
            block_size: cache.block_size,
            segment_size: config.segment.segment_size,
            slots: config.segment.slots,
            memory: config.memory.clone(),
            remap: RemappingManager::new(&config.remap, geometry),
            dram,
            translator: cache.translate_pages.then(PageTranslator::new),
            last_time: SimTime::ZERO,
            stats: CacheStats::default(),
        }
    }

    /// Serves one request.
    ///
    /// # Arguments
    ///
    /// * `time` - Arrival time.
    /// * `size` - Request size in bytes.
    /// * `addr` - Host physical address.
    /// * `access` - Read or write.
    ///
    /// # Returns
    ///
    /// The request latency.
    ///
    /// # Errors
    ///
    /// A [`RequestError`] carrying the failing step and the latency accumulated
    /// before it.
    pub fn process_request(
        &mut self,
        time: SimTime,
        size: u64,
        addr: u64,
        access: AccessType,
    ) -> Result<SimTime, RequestError> {
        let time = self.order(time);
        self.stats.accesses += 1;
        match access {
            AccessType::Read => self.stats.reads += 1,
            AccessType::Write => self.stats.writes += 1,
        }

        let mut latency = SimTime::ZERO;
        match self.serve(time, size, addr, access, &mut latency) {
            Ok(()) => {
                latency += self.memory.queue_latency();
                if !self.memory.on_top {
                    latency += SimTime::from_ns(self.memory.bus_delay_ns);
                }
                Ok(latency)
            }
            Err(source) => Err(RequestError { source, latency }),
        }
    }

    fn order(&mut self, time: SimTime) -> SimTime {
        if time < self.last_time {
            warn!(%time, last = %self.last_time, "request arrived out of order");
            self.stats.out_of_order += 1;
            self.last_time
        } else {
            self.last_time = time;
            time
        }
    }

    fn serve(
        &mut self,
        time: SimTime,
        size: u64,
        addr: u64,
        access: AccessType,
        latency: &mut SimTime,
    ) -> Result<(), SimError> {
        *latency += self.apply_remap_effects();
        *latency += self.remap.config().lookup_latency();

        let addr = match &mut self.translator {
            Some(translator) => translator.translate(addr),
            None => addr,
        };

        if let Mode::Constant { .. } = self.mode {
            let placement = self.dram.locate_address(addr);
            if self.bypass(placement, size, latency) {
                return Ok(());
            }
            return self.constant_access(time, size, addr, access, latency);
        }

        let split = self.splitter.split(addr);
        let placement = self.set(split)?.placement();
        if self.bypass(placement, size, latency) {
            if let Mode::Unison { .. } = self.mode {
                self.stats.block_misses += 1;
            }
            return Ok(());
        }
        match self.mode {
            Mode::Alloy => self.alloy_access(time, size, split, access, latency),
            Mode::Unison { .. } => self.unison_access(time, split, access, latency),
            Mode::Constant { .. } => Ok(()),
        }
    }

    /// Sends a request whose bank is disabled straight to off-chip memory.
    fn bypass(&mut self, placement: Location, size: u64, latency: &mut SimTime) -> bool {
        if !self.remap.is_disabled(placement.vault, placement.bank) {
            return false;
        }
        debug!(vault = placement.vault, bank = placement.bank, "disabled bank bypass");
        self.stats.disabled_accesses += 1;
        self.stats.misses += 1;
        *latency += self.off_chip(size);
        true
    }

    /// Applies invalidations and row migrations left by the last thermal epoch.
    ///
    /// Vaults drain their work in parallel, so the cost is the slowest vault's.
    fn apply_remap_effects(&mut self) -> SimTime {
        if !self.remap.pending_effects() {
            return SimTime::ZERO;
        }
        let mut per_vault = vec![SimTime::ZERO; self.dram.geometry().vaults as usize];
        let block = self.block_size;
        for set in &mut self.sets {
            let at = set.placement();
            let cost = if !self.remap.is_content_valid(at.vault, at.bank) {
                let valid = set.valid_blocks();
                let dirty = set.invalidate_content();
                if valid > 0 {
                    self.stats.invalidations += 1;
                    self.stats.invalidated_blocks += u64::from(valid);
                }
                self.stats.writeback_blocks += u64::from(dirty);
                self.memory.bandwidth.transfer_time(u64::from(dirty) * block)
            } else if self.remap.is_row_migrated(at.vault, at.bank, at.row) {
                let valid = set.valid_blocks();
                if valid == 0 {
                    continue;
                }
                self.stats.migrations += 1;
                self.stats.migrated_blocks += u64::from(valid);
                self.dram.bandwidth().transfer_time(u64::from(valid) * block * 2)
            } else {
                continue;
            };
            if let Some(slot) = per_vault.get_mut(at.vault as usize) {
                *slot += cost;
            }
        }
        self.remap.finish_remapping();
        let delay = per_vault.into_iter().max().unwrap_or(SimTime::ZERO);
        debug!(%delay, "remap effects applied");
        delay
    }

    fn set(&self, split: SplitAddress) -> Result<&CacheSet, SimError> {
        let ways = self.sets.len();
        self.sets
            .get(split.set as usize)
            .ok_or_else(|| SimError::from(CacheError::IndexOutOfRange {
                index: split.set as usize,
                ways,
            }))
    }

    fn set_mut(&mut self, split: SplitAddress) -> Result<&mut CacheSet, SimError> {
        let ways = self.sets.len();
        self.sets
            .get_mut(split.set as usize)
            .ok_or_else(|| SimError::from(CacheError::IndexOutOfRange {
                index: split.set as usize,
                ways,
            }))
    }

    /// Transfers `bytes` at a logical location through the remapping layer.
    fn dram_access(
        &mut self,
        time: SimTime,
        bytes: u64,
        logical: Location,
        access: AccessType,
    ) -> Result<SimTime, SimError> {
        let physical = self.remap.physical_location(logical)?;
        let result = self.dram.access(time, bytes, physical, access)?;
        self.remap.access_row(logical, result.requests)?;
        debug!(
            vault = physical.vault,
            bank = physical.bank,
            row = physical.row,
            bytes,
            latency = %result.latency,
            "dram access"
        );
        Ok(result.latency)
    }

    /// Off-chip access: fixed latency plus transfer time.
    fn off_chip(&self, bytes: u64) -> SimTime {
        self.memory.latency() + self.memory.bandwidth.transfer_time(bytes)
    }

    /// Model state.
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Cache sets, in index order (empty for the Constant model).
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Address splitter.
    pub const fn splitter(&self) -> &AddressSplitter {
        &self.splitter
    }

    /// The stacked DRAM.
    pub const fn dram(&self) -> &StackedDram {
        &self.dram
    }

    /// Mutable access to the stacked DRAM.
    pub fn dram_mut(&mut self) -> &mut StackedDram {
        &mut self.dram
    }

    /// The remapping layer.
    pub const fn remapping(&self) -> &RemappingManager {
        &self.remap
    }

    /// Mutable access to the remapping layer.
    pub fn remapping_mut(&mut self) -> &mut RemappingManager {
        &mut self.remap
    }

    /// Page translator, if enabled.
    pub const fn translator(&self) -> Option<&PageTranslator> {
        self.translator.as_ref()
    }

    /// Counter snapshot, with set counters summed.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            set_reads: self.sets.iter().map(CacheSet::reads).sum(),
            set_writes: self.sets.iter().map(CacheSet::writes).sum(),
            ..self.stats.clone()
        }
    }

    /// Zeroes every counter; cache content is kept.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
        for set in &mut self.sets {
            set.reset_stats();
        }
        if let Mode::Unison { fht } = &mut self.mode {
            fht.reset_stats();
        }
        self.dram.reset_stats();
        self.remap.reset_stats();
    }
}
