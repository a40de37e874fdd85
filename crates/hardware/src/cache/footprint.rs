//! Footprint history table.
//!
//! Maps a page-pattern key (the sub-block that triggered a page's fill) to the
//! footprint the last page filled under that key actually used. A miss loads
//! the predicted footprint plus the demanded block instead of the whole page.

/// Bounded footprint history table.
#[derive(Clone, Debug)]
pub struct FootprintHistoryTable {
    entries: Vec<u64>,
    page_mask: u64,
    lookups: u64,
    updates: u64,
}

impl FootprintHistoryTable {
    /// Creates a table with every prediction empty.
    ///
    /// # Arguments
    ///
    /// * `entries` - Table size (at least one).
    /// * `blocks_per_page` - Sub-blocks per page; predictions are masked to this width.
    pub fn new(entries: usize, blocks_per_page: u64) -> Self {
        let page_mask = if blocks_per_page >= u64::from(u64::BITS) {
            u64::MAX
        } else {
            (1u64 << blocks_per_page) - 1
        };
        Self {
            entries: vec![0; entries.max(1)],
            page_mask,
            lookups: 0,
            updates: 0,
        }
    }

    /// Key for a fill triggered by an access to `block`.
    pub fn key(&self, block: u32) -> u64 {
        u64::from(block) % self.entries.len() as u64
    }

    /// Predicted footprint for `key`.
    pub fn predict(&mut self, key: u64) -> u64 {
        self.lookups += 1;
        self.entries[self.slot(key)]
    }

    /// Records the footprint an evicted page used.
    pub fn record(&mut self, key: u64, footprint: u64) {
        self.updates += 1;
        let slot = self.slot(key);
        self.entries[slot] = footprint & self.page_mask;
    }

    /// Prediction stored at `key` without counting a lookup.
    pub fn peek(&self, key: u64) -> u64 {
        self.entries[self.slot(key)]
    }

    fn slot(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; the table holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zeroes the lookup and update counters; predictions are kept.
    pub fn reset_stats(&mut self) {
        self.lookups = 0;
        self.updates = 0;
    }

    /// Predictions served.
    pub const fn lookups(&self) -> u64 {
        self.lookups
    }

    /// Footprints recorded.
    pub const fn updates(&self) -> u64 {
        self.updates
    }
}
