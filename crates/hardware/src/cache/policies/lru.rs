//! Least Recently Used (LRU) Replacement Policy.
//!
//! The usage byte of each line holds its recency rank: 0 is the most recently
//! used line, `ways - 1` the least. Touching a line moves it to rank 0 and
//! shifts every line that was more recent down by one, so ranks stay distinct
//! once every way has been touched.
//!
//! # Performance
//!
//! - `touch()`: O(W)
//! - `victim()`: O(W)
//! - Hardware cost: one log2(W)-bit rank per line.

use super::{ReplacementPolicy, empty_or_oldest};
use crate::cache::line::LineMetadata;

/// Strict LRU policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    fn touch(&self, lines: &mut [LineMetadata], way: usize) {
        let Some(rank) = lines.get(way).map(LineMetadata::usage) else {
            return;
        };
        for (index, line) in lines.iter_mut().enumerate() {
            if index == way {
                line.set_usage(0);
            } else if line.usage() <= rank {
                line.set_usage(line.usage().saturating_add(1));
            }
        }
    }

    fn victim(&self, lines: &[LineMetadata]) -> usize {
        empty_or_oldest(lines)
    }
}
