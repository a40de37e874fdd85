//! Bounded hot-row tracker.
//!
//! A Misra-Gries frequent-items summary over row indices. With capacity `k`
//! it keeps at most `k` counters; any row accessed more than `n / (k + 1)`
//! times out of `n` is guaranteed to be present.

use std::collections::BTreeMap;

/// Most-frequently-accessed row tracker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HotRowTracker {
    capacity: usize,
    counts: BTreeMap<u32, u64>,
}

impl HotRowTracker {
    /// Creates an empty tracker holding at most `capacity` rows.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            counts: BTreeMap::new(),
        }
    }

    /// Records one access to `row`.
    pub fn record(&mut self, row: u32) {
        if let Some(count) = self.counts.get_mut(&row) {
            *count += 1;
        } else if self.counts.len() < self.capacity {
            let _ = self.counts.insert(row, 1);
        } else {
            for count in self.counts.values_mut() {
                *count -= 1;
            }
            self.counts.retain(|_, count| *count > 0);
        }
    }

    /// Up to `k` tracked rows, most frequent first; equal counts in row order.
    pub fn hottest(&self, k: usize) -> Vec<u32> {
        let mut rows: Vec<(u32, u64)> = self.counts.iter().map(|(&r, &c)| (r, c)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows.into_iter().take(k).map(|(row, _)| row).collect()
    }

    /// Estimated count of `row` (a lower bound on its true count).
    pub fn count(&self, row: u32) -> u64 {
        self.counts.get(&row).copied().unwrap_or(0)
    }

    /// Number of tracked rows.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no row is tracked.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Maximum tracked rows.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forgets every row.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
