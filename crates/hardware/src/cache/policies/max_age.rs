//! Max-Age Replacement Policy.
//!
//! Each line carries an age. Touching a line resets its age to zero and ages
//! every sibling by one (saturating). The victim is the oldest line, the first
//! index winning ties. This approximates LRU but is not a strict recency
//! order: siblings that saturate become indistinguishable.
//!
//! # Performance
//!
//! - `touch()`: O(W)
//! - `victim()`: O(W)
//! - No storage beyond the per-line usage byte.

use super::{ReplacementPolicy, empty_or_oldest};
use crate::cache::line::LineMetadata;

/// Aging-counter policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxAgePolicy;

impl ReplacementPolicy for MaxAgePolicy {
    fn touch(&self, lines: &mut [LineMetadata], way: usize) {
        for (index, line) in lines.iter_mut().enumerate() {
            if index == way {
                line.set_usage(0);
            } else {
                line.set_usage(line.usage().saturating_add(1));
            }
        }
    }

    fn victim(&self, lines: &[LineMetadata]) -> usize {
        empty_or_oldest(lines)
    }
}
