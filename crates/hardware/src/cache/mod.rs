//! Cache metadata.
//!
//! This module provides:
//! 1. **Lines:** Tag, state, and valid/dirty/footprint bitmaps per line or page.
//! 2. **Policies:** Stateless victim selection over per-line usage counters.
//! 3. **Sets:** Tag lookup, sub-block hit detection and replacement.
//! 4. **Footprint History:** Prediction of which sub-blocks a new page will use.
//!
//! Nothing here models time; controllers turn outcomes into DRAM and off-chip traffic.

/// Footprint history table.
pub mod footprint;

/// Line metadata.
pub mod line;

/// Replacement policies.
pub mod policies;

/// Cache sets.
pub mod set;

pub use footprint::FootprintHistoryTable;
pub use line::{CacheState, INVALID_TAG, LineMetadata};
pub use set::{AccessOutcome, CacheSet, Eviction, SetKind};
