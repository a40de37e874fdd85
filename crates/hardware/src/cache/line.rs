//! Per-line (or per-page) cache metadata.
//!
//! A line carries its tag, a coherence-style state, and three sub-block
//! bitmaps: `valid` (blocks present), `dirty` (blocks modified) and `footprint`
//! (blocks touched since the line was filled). Block-granular lines (the
//! direct-mapped cache) use bit 0 only.
//!
//! Invariants:
//! 1. A line with a non-zero valid bitmap has a non-sentinel tag.
//! 2. The footprint only grows between a fill and the next fill or invalidation.

use crate::common::data::AccessType;

/// Tag value of an empty line.
pub const INVALID_TAG: u64 = u64::MAX;

/// Sub-blocks one line can track.
pub const MAX_BLOCKS: u32 = u64::BITS;

/// Line state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheState {
    /// No data held.
    #[default]
    Invalid,
    /// Clean data.
    Shared,
    /// At least one dirty block.
    Modified,
}

/// Metadata of one cache line or page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineMetadata {
    tag: u64,
    state: CacheState,
    valid_bits: u64,
    dirty_bits: u64,
    footprint: u64,
    usage: u8,
    trigger: u64,
}

impl Default for LineMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl LineMetadata {
    /// Creates an empty line.
    pub const fn new() -> Self {
        Self {
            tag: INVALID_TAG,
            state: CacheState::Invalid,
            valid_bits: 0,
            dirty_bits: 0,
            footprint: 0,
            usage: 0,
            trigger: 0,
        }
    }

    /// Installs `tag`, replacing whatever the line held.
    ///
    /// # Arguments
    ///
    /// * `tag` - New tag; must not be [`INVALID_TAG`].
    /// * `predicted` - Blocks loaded with the fill.
    /// * `trigger` - Footprint-history key of the access that caused the fill.
    pub fn fill(&mut self, tag: u64, predicted: u64, trigger: u64) {
        debug_assert_ne!(tag, INVALID_TAG);
        self.tag = tag;
        self.state = CacheState::Shared;
        self.valid_bits = predicted;
        self.dirty_bits = 0;
        self.footprint = 0;
        self.trigger = trigger;
    }

    /// Records an access to `block`.
    ///
    /// # Returns
    ///
    /// `true` if the block was already present.
    pub fn access_block(&mut self, access: AccessType, block: u32) -> bool {
        let bit = 1u64 << (block % u64::BITS);
        let present = self.valid_bits & bit != 0;
        self.valid_bits |= bit;
        self.footprint |= bit;
        if access.is_write() {
            self.dirty_bits |= bit;
            self.state = CacheState::Modified;
        }
        present
    }

    /// Returns `true` if `block` is present.
    pub const fn has_block(&self, block: u32) -> bool {
        self.is_valid() && self.valid_bits & (1u64 << (block % u64::BITS)) != 0
    }

    /// Drops the line's content.
    ///
    /// Invalidating an empty line does nothing; the usage counter is never touched.
    ///
    /// # Returns
    ///
    /// Number of dirty blocks that must be written back.
    pub fn invalidate(&mut self) -> u32 {
        if !self.is_valid() {
            return 0;
        }
        let dirty = self.dirty_blocks();
        self.tag = INVALID_TAG;
        self.state = CacheState::Invalid;
        self.valid_bits = 0;
        self.dirty_bits = 0;
        self.footprint = 0;
        dirty
    }

    /// Returns `true` when the line holds a tag.
    pub const fn is_valid(&self) -> bool {
        self.tag != INVALID_TAG
    }

    /// Stored tag ([`INVALID_TAG`] when empty).
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// Line state.
    pub const fn state(&self) -> CacheState {
        self.state
    }

    /// Present-block bitmap.
    pub const fn valid_bits(&self) -> u64 {
        self.valid_bits
    }

    /// Dirty-block bitmap.
    pub const fn dirty_bits(&self) -> u64 {
        self.dirty_bits
    }

    /// Blocks touched since the fill.
    pub const fn footprint(&self) -> u64 {
        self.footprint
    }

    /// Footprint-history key recorded at fill time.
    pub const fn trigger(&self) -> u64 {
        self.trigger
    }

    /// Number of present blocks.
    pub const fn valid_blocks(&self) -> u32 {
        self.valid_bits.count_ones()
    }

    /// Number of dirty blocks.
    pub const fn dirty_blocks(&self) -> u32 {
        self.dirty_bits.count_ones()
    }

    /// Replacement age / recency rank.
    pub const fn usage(&self) -> u8 {
        self.usage
    }

    /// Sets the replacement age / recency rank.
    pub fn set_usage(&mut self, usage: u8) {
        self.usage = usage;
    }
}
