//! Direct-Mapped Policy.
//!
//! A direct-mapped set has exactly one way, so the only possible victim is the
//! line already there and no usage state is kept.

use super::ReplacementPolicy;
use crate::cache::line::LineMetadata;

/// Direct-mapped policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectMappedPolicy;

impl ReplacementPolicy for DirectMappedPolicy {
    fn touch(&self, _lines: &mut [LineMetadata], _way: usize) {}

    fn victim(&self, _lines: &[LineMetadata]) -> usize {
        0
    }
}
