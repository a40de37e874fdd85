//! Cache set.
//!
//! A set owns `ways` lines and a replacement policy. Three variants exist:
//! 1. **Direct-mapped block set:** one way, tags match whole blocks.
//! 2. **Associative page set:** tags match pages; a tag hit still misses if the
//!    requested sub-block is absent (`HitLineMissBlock`).
//! 3. **Page LRU set:** an associative page set ranked by strict recency.
//!
//! Invariant: no two valid ways of a set hold the same tag.

use tracing::debug;

use crate::cache::line::{INVALID_TAG, LineMetadata, MAX_BLOCKS};
use crate::cache::policies::{self, ReplacementPolicy};
use crate::common::data::AccessType;
use crate::common::error::CacheError;
use crate::config::Replacement;
use crate::dram::Location;

/// Set organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetKind {
    /// Single way holding one block.
    DirectMappedBlock,
    /// Associative page set with the configured aging policy.
    AssociativePage,
    /// Associative page set with strict LRU ranks.
    PageLru,
}

impl SetKind {
    /// Returns `true` for sets that track sub-blocks within a line.
    pub const fn tracks_blocks(self) -> bool {
        !matches!(self, Self::DirectMappedBlock)
    }
}

/// Result of a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    /// No way holds the tag.
    Miss,
    /// The page is resident but the requested sub-block is not.
    HitLineMissBlock,
    /// The tag (and sub-block) is resident.
    Hit,
}

/// What a fill displaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eviction {
    /// Tag of the evicted line, or `None` if the way was empty.
    pub tag: Option<u64>,
    /// Footprint accumulated by the evicted line.
    pub footprint: u64,
    /// Footprint-history key recorded when the evicted line was filled.
    pub trigger: u64,
    /// Dirty blocks needing write-back.
    pub dirty_blocks: u32,
    /// Blocks the evicted line held.
    pub valid_blocks: u32,
}

/// One cache set.
#[derive(Clone, Debug)]
pub struct CacheSet {
    kind: SetKind,
    lines: Vec<LineMetadata>,
    policy: &'static dyn ReplacementPolicy,
    placement: Location,
    reads: u64,
    writes: u64,
}

impl CacheSet {
    /// Creates an empty set.
    ///
    /// # Arguments
    ///
    /// * `kind` - Set organization.
    /// * `ways` - Associativity; forced to one for direct-mapped sets.
    /// * `replacement` - Aging policy for associative page sets.
    /// * `placement` - Logical DRAM location holding the set.
    pub fn new(kind: SetKind, ways: usize, replacement: Replacement, placement: Location) -> Self {
        let (ways, policy) = match kind {
            SetKind::DirectMappedBlock => (1, policies::direct_mapped()),
            SetKind::AssociativePage => (ways.max(1), policies::for_replacement(replacement)),
            SetKind::PageLru => (ways.max(1), policies::for_replacement(Replacement::Lru)),
        };
        Self {
            kind,
            lines: vec![LineMetadata::new(); ways],
            policy,
            placement,
            reads: 0,
            writes: 0,
        }
    }

    /// Looks up `tag` and records the access.
    ///
    /// A tag hit touches the line for replacement and marks `block` in its
    /// footprint (and dirty bitmap for writes). A block miss counts a set write
    /// for the reload of the missing block.
    ///
    /// # Arguments
    ///
    /// * `access` - Read or write.
    /// * `tag` - Tag to find.
    /// * `block` - Sub-block index within the page; ignored by block sets.
    pub fn access_attempt(&mut self, access: AccessType, tag: u64, block: u32) -> AccessOutcome {
        self.reads += 1;
        let Some(way) = self.find(tag) else {
            return AccessOutcome::Miss;
        };
        self.policy.touch(&mut self.lines, way);
        let block = if self.kind.tracks_blocks() { block } else { 0 };
        if self.lines[way].access_block(access, block) {
            AccessOutcome::Hit
        } else {
            self.writes += 1;
            AccessOutcome::HitLineMissBlock
        }
    }

    /// Chooses the way to evict.
    pub fn replacement_index(&mut self) -> usize {
        self.reads += 1;
        let way = self.policy.victim(&self.lines);
        debug_assert!(way < self.lines.len());
        way.min(self.lines.len() - 1)
    }

    /// Fills `index` with `tag`.
    ///
    /// # Arguments
    ///
    /// * `index` - Way to fill, normally from [`CacheSet::replacement_index`].
    /// * `tag` - New tag.
    /// * `footprint` - Blocks loaded with the fill.
    /// * `trigger` - Footprint-history key of the triggering access.
    ///
    /// # Returns
    ///
    /// What the way held before.
    ///
    /// # Errors
    ///
    /// * [`CacheError::IndexOutOfRange`] if `index` is not a way of this set.
    /// * [`CacheError::DuplicateTag`] if another valid way already holds `tag`.
    pub fn update_replacement_index_tag(
        &mut self,
        index: usize,
        tag: u64,
        footprint: u64,
        trigger: u64,
    ) -> Result<Eviction, CacheError> {
        let ways = self.lines.len();
        if index >= ways {
            return Err(CacheError::IndexOutOfRange { index, ways });
        }
        if tag == INVALID_TAG {
            return Err(CacheError::LookupMiss { tag });
        }
        if self
            .lines
            .iter()
            .enumerate()
            .any(|(way, line)| way != index && line.is_valid() && line.tag() == tag)
        {
            return Err(CacheError::DuplicateTag { tag });
        }

        let old = self.lines[index];
        let eviction = Eviction {
            tag: old.is_valid().then_some(old.tag()),
            footprint: old.footprint(),
            trigger: old.trigger(),
            dirty_blocks: old.dirty_blocks(),
            valid_blocks: old.valid_blocks(),
        };
        let footprint = if self.kind.tracks_blocks() { footprint } else { 0 };
        self.lines[index].fill(tag, footprint, trigger);
        self.writes += 1;
        self.update_used_info(tag)?;
        Ok(eviction)
    }

    /// Marks `block` of a freshly filled way as accessed.
    ///
    /// # Errors
    ///
    /// * [`CacheError::IndexOutOfRange`] if `index` is not a way of this set.
    /// * [`CacheError::BlockOutOfRange`] if `block` is beyond the line's bitmap.
    pub fn mark_block(&mut self, index: usize, access: AccessType, block: u32) -> Result<(), CacheError> {
        let ways = self.lines.len();
        let block = if self.kind.tracks_blocks() { block } else { 0 };
        if block >= MAX_BLOCKS {
            return Err(CacheError::BlockOutOfRange {
                block,
                blocks: MAX_BLOCKS,
            });
        }
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CacheError::IndexOutOfRange { index, ways })?;
        if line.access_block(access, block) {
            debug!(way = index, block, "demanded block already in predicted footprint");
        }
        Ok(())
    }

    /// Touches the way holding `tag` for replacement purposes.
    ///
    /// # Errors
    ///
    /// [`CacheError::LookupMiss`] if no valid way holds `tag`; the set is unchanged.
    pub fn update_used_info(&mut self, tag: u64) -> Result<(), CacheError> {
        let way = self.find(tag).ok_or(CacheError::LookupMiss { tag })?;
        self.policy.touch(&mut self.lines, way);
        Ok(())
    }

    /// Way holding `tag`, if any.
    pub fn find(&self, tag: u64) -> Option<usize> {
        if tag == INVALID_TAG {
            return None;
        }
        self.lines
            .iter()
            .position(|line| line.is_valid() && line.tag() == tag)
    }

    /// Invalidates one way.
    ///
    /// # Returns
    ///
    /// Dirty blocks to write back (zero for an already-empty way).
    ///
    /// # Errors
    ///
    /// [`CacheError::IndexOutOfRange`] if `index` is not a way of this set.
    pub fn invalidate_way(&mut self, index: usize) -> Result<u32, CacheError> {
        let ways = self.lines.len();
        self.lines
            .get_mut(index)
            .map(LineMetadata::invalidate)
            .ok_or(CacheError::IndexOutOfRange { index, ways })
    }

    /// Invalidates every way.
    ///
    /// # Returns
    ///
    /// Total dirty blocks to write back.
    pub fn invalidate_content(&mut self) -> u32 {
        self.lines.iter_mut().map(LineMetadata::invalidate).sum()
    }

    /// Dirty blocks across the set.
    pub fn dirty_blocks(&self) -> u32 {
        self.lines.iter().map(LineMetadata::dirty_blocks).sum()
    }

    /// Present blocks across the set.
    pub fn valid_blocks(&self) -> u32 {
        self.lines
            .iter()
            .filter(|l| l.is_valid())
            .map(LineMetadata::valid_blocks)
            .sum()
    }

    /// The set's lines, in way order.
    pub fn lines(&self) -> &[LineMetadata] {
        &self.lines
    }

    /// Set organization.
    pub const fn kind(&self) -> SetKind {
        self.kind
    }

    /// Associativity.
    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    /// Logical DRAM location holding the set.
    pub const fn placement(&self) -> Location {
        self.placement
    }

    /// Metadata reads (lookups and victim selections).
    pub const fn reads(&self) -> u64 {
        self.reads
    }

    /// Metadata writes (fills and block reloads).
    pub const fn writes(&self) -> u64 {
        self.writes
    }

    /// Zeroes the read/write counters.
    pub fn reset_stats(&mut self) {
        self.reads = 0;
        self.writes = 0;
    }
}
