//! Unison cache: associative pages loaded by predicted footprint.
//!
//! A page miss fetches only the blocks the footprint history predicts, plus
//! the demanded one. The evicted page's observed footprint trains the table
//! under the key that triggered its own fill. A resident page missing the
//! demanded block reloads that block alone.

use tracing::debug;

use crate::cache::AccessOutcome;
use crate::common::addr::SplitAddress;
use crate::common::data::AccessType;
use crate::common::error::SimError;
use crate::common::time::SimTime;
use crate::controller::{CacheController, Mode, TAG_BYTES};

impl CacheController {
    pub(super) fn unison_access(
        &mut self,
        time: SimTime,
        split: SplitAddress,
        access: AccessType,
        latency: &mut SimTime,
    ) -> Result<(), SimError> {
        let block_size = self.block_size;
        let block = (split.offset / block_size) as u32;
        let placement = self.set(split)?.placement();
        *latency += self.dram_access(time + *latency, TAG_BYTES, placement, AccessType::Read)?;

        let outcome = self.set_mut(split)?.access_attempt(access, split.tag, block);
        debug!(set = split.set, tag = split.tag, block, ?outcome, "unison lookup");

        match outcome {
            AccessOutcome::Hit => {
                *latency += self.dram_access(time + *latency, block_size, placement, access)?;
            }
            AccessOutcome::HitLineMissBlock => {
                self.stats.misses += 1;
                self.stats.block_misses += 1;
                self.stats.loaded_blocks += 1;
                *latency += self.off_chip(block_size);
                *latency +=
                    self.dram_access(time + *latency, block_size, placement, AccessType::Write)?;
            }
            AccessOutcome::Miss => {
                let (key, prediction) = match &mut self.mode {
                    Mode::Unison { fht } => {
                        let key = fht.key(block);
                        (key, fht.predict(key))
                    }
                    _ => (0, 0),
                };

                let set = self.set_mut(split)?;
                let way = set.replacement_index();
                let eviction = set.update_replacement_index_tag(way, split.tag, prediction, key)?;
                set.mark_block(way, access, block)?;

                if let (Some(_), Mode::Unison { fht }) = (eviction.tag, &mut self.mode) {
                    fht.record(eviction.trigger, eviction.footprint);
                }

                let demand = 1u64 << (block % u64::BITS);
                let blocks = u64::from((prediction | demand).count_ones());
                let dirty = u64::from(eviction.dirty_blocks);
                self.stats.misses += 1;
                self.stats.page_misses += 1;
                self.stats.loaded_blocks += blocks;
                self.stats.writeback_blocks += dirty;

                *latency += self.off_chip(blocks * block_size);
                *latency += self.memory.bandwidth.transfer_time(dirty * block_size);
                *latency += self.dram_access(
                    time + *latency,
                    blocks * block_size,
                    placement,
                    AccessType::Write,
                )?;
            }
        }
        Ok(())
    }
}
