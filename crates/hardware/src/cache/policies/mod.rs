//! Replacement Policies.
//!
//! Victim selection for cache sets. Policies are stateless: the per-line
//! `usage` counter in [`LineMetadata`] holds all replacement state, so one
//! policy instance serves every set.
//!
//! # Policies
//!
//! - `DirectMapped`: single way; the victim is always way 0.
//! - `MaxAge`: aging counters; the oldest line is evicted.
//! - `Lru`: strict recency ranks.
//!
//! `MaxAge` and `Lru` both prefer an empty way before evicting a valid one.

/// Direct-mapped (single way) policy.
pub mod direct;

/// Strict least-recently-used ranks.
pub mod lru;

/// Aging-counter (max-age) policy.
pub mod max_age;

use std::fmt::Debug;

use crate::cache::line::LineMetadata;
use crate::config::Replacement;

pub use direct::DirectMappedPolicy;
pub use lru::LruPolicy;
pub use max_age::MaxAgePolicy;

/// Trait for cache replacement policies.
pub trait ReplacementPolicy: Send + Sync + Debug {
    /// Updates usage state when `way` is accessed.
    ///
    /// # Arguments
    ///
    /// * `lines` - The set's lines.
    /// * `way` - Index of the accessed line within `lines`.
    fn touch(&self, lines: &mut [LineMetadata], way: usize);

    /// Selects the way to evict.
    ///
    /// # Arguments
    ///
    /// * `lines` - The set's lines; never empty.
    ///
    /// # Returns
    ///
    /// An index in `0..lines.len()`.
    fn victim(&self, lines: &[LineMetadata]) -> usize;
}

static DIRECT_MAPPED: DirectMappedPolicy = DirectMappedPolicy;
static MAX_AGE: MaxAgePolicy = MaxAgePolicy;
static LRU: LruPolicy = LruPolicy;

/// The direct-mapped policy.
pub fn direct_mapped() -> &'static dyn ReplacementPolicy {
    &DIRECT_MAPPED
}

/// Returns the shared instance of a configured page-set policy.
pub fn for_replacement(replacement: Replacement) -> &'static dyn ReplacementPolicy {
    match replacement {
        Replacement::MaxAge => &MAX_AGE,
        Replacement::Lru => &LRU,
    }
}

/// First empty way, otherwise the first way with the largest usage counter.
fn empty_or_oldest(lines: &[LineMetadata]) -> usize {
    if let Some(empty) = lines.iter().position(|l| !l.is_valid()) {
        return empty;
    }
    let mut victim = 0;
    for (way, line) in lines.iter().enumerate().skip(1) {
        if line.usage() > lines[victim].usage() {
            victim = way;
        }
    }
    victim
}
