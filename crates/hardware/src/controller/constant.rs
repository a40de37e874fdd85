//! Constant model: segment swapping between slow and fast memory.
//!
//! Fast memory is divided into `entries` segments. Every slow-memory segment
//! competes for one fast entry with `slots - 1` others that share its entry
//! index. Each entry counts accesses per slot and, every `swap_count`
//! accesses, makes the most frequently used slot resident.

use tracing::{debug, info};

use crate::common::addr::log2;
use crate::common::data::AccessType;
use crate::common::error::SimError;
use crate::common::time::SimTime;
use crate::controller::{CacheController, Mode};

/// Result of one access to a [`SegmentEntry`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentOutcome {
    /// The accessed slot was resident when the access arrived.
    pub hit: bool,
    /// The access closed a window and a different slot became resident.
    pub swapped: bool,
}

/// Per-fast-segment slot tracker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentEntry {
    resident: u32,
    count: u32,
    swap_count: u32,
    slots: Vec<u32>,
}

impl SegmentEntry {
    /// Creates an entry with slot 0 resident.
    pub fn new(slots: u32, swap_count: u32) -> Self {
        Self {
            resident: 0,
            count: 0,
            swap_count: swap_count.max(1),
            slots: vec![0; slots.max(1) as usize],
        }
    }

    /// Records an access to `slot`.
    ///
    /// When the window of `swap_count` accesses closes, the slot with the most
    /// accesses (lowest index on ties) becomes resident and every counter
    /// restarts.
    pub fn access(&mut self, slot: u32) -> SegmentOutcome {
        let slot = slot % self.slots.len() as u32;
        self.count += 1;
        self.slots[slot as usize] += 1;
        let hit = slot == self.resident;

        let mut swapped = false;
        if self.count >= self.swap_count {
            self.count = 0;
            let mut best = 0;
            for (index, &accesses) in self.slots.iter().enumerate() {
                if accesses > self.slots[best] {
                    best = index;
                }
            }
            self.slots.fill(0);
            if best as u32 != self.resident {
                self.resident = best as u32;
                swapped = true;
            }
        }
        SegmentOutcome { hit, swapped }
    }

    /// Resident slot.
    pub const fn resident(&self) -> u32 {
        self.resident
    }

    /// Accesses in the current window.
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Per-slot accesses in the current window.
    pub fn slot_accesses(&self) -> &[u32] {
        &self.slots
    }
}

impl CacheController {
    pub(super) fn constant_access(
        &mut self,
        time: SimTime,
        size: u64,
        addr: u64,
        access: AccessType,
        latency: &mut SimTime,
    ) -> Result<(), SimError> {
        let segment_size = self.segment_size;
        let seg_tag = addr >> log2(segment_size);
        let Mode::Constant { segments } = &mut self.mode else {
            return Ok(());
        };
        let entries = segments.len().max(1) as u64;
        let index = seg_tag % entries;
        let slot = ((seg_tag / entries) % u64::from(self.slots)) as u32;
        let outcome = match segments.get_mut(index as usize) {
            Some(entry) => entry.access(slot),
            None => SegmentOutcome::default(),
        };
        debug!(segment = index, slot, ?outcome, "constant lookup");

        if outcome.swapped {
            self.stats.segment_swaps += 1;
            info!(segment = index, slot, "segment swapped");
            let row_size = self.dram.row_size();
            let base = index * segment_size;
            for row in 0..(segment_size / row_size).max(1) {
                let location = self.dram.locate_address(base + row * row_size);
                *latency += self.dram_access(time + *latency, row_size, location, AccessType::Read)?;
                *latency +=
                    self.dram_access(time + *latency, row_size, location, AccessType::Write)?;
            }
            *latency += self.memory.bandwidth.transfer_time(segment_size);
        }

        if outcome.hit {
            self.stats.segment_hits += 1;
        } else {
            self.stats.misses += 1;
            *latency += self.memory.bandwidth.transfer_time(size);
        }

        let location = self.dram.locate_address(addr);
        *latency += self.dram_access(time + *latency, size, location, access)?;
        Ok(())
    }
}
