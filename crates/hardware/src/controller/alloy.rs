//! Alloy cache: direct-mapped blocks with the tag stored beside the data.
//!
//! `tags_per_row` tag-and-data units share a DRAM row, so consecutive sets map
//! to the same row. Every access streams the tag first; a miss additionally
//! reloads the block from off-chip memory and writes it into the row.

use tracing::debug;

use crate::cache::AccessOutcome;
use crate::common::addr::SplitAddress;
use crate::common::data::AccessType;
use crate::common::error::SimError;
use crate::common::time::SimTime;
use crate::controller::{CacheController, TAG_BYTES};

impl CacheController {
    pub(super) fn alloy_access(
        &mut self,
        time: SimTime,
        size: u64,
        split: SplitAddress,
        access: AccessType,
        latency: &mut SimTime,
    ) -> Result<(), SimError> {
        let placement = self.set(split)?.placement();
        *latency += self.dram_access(time + *latency, TAG_BYTES, placement, AccessType::Read)?;

        let set = self.set_mut(split)?;
        let outcome = set.access_attempt(access, split.tag, 0);
        debug!(set = split.set, tag = split.tag, ?outcome, "alloy lookup");

        if outcome == AccessOutcome::Miss {
            let way = set.replacement_index();
            let eviction = set.update_replacement_index_tag(way, split.tag, 0, 0)?;
            set.mark_block(way, access, 0)?;

            self.stats.misses += 1;
            self.stats.page_misses += 1;
            self.stats.loaded_blocks += 1;
            self.stats.writeback_blocks += u64::from(eviction.dirty_blocks);

            let block = self.block_size;
            *latency += self.dram_access(time + *latency, block, placement, AccessType::Write)?;
            *latency += self.off_chip(block);
            *latency += self
                .memory
                .bandwidth
                .transfer_time(u64::from(eviction.dirty_blocks) * block);
        }

        *latency += self.dram_access(time + *latency, size, placement, access)?;
        Ok(())
    }
}
