//! Address decomposition.
//!
//! This module provides:
//! 1. **Bit Helpers:** `log2` of power-of-two geometry values and low-bit masks.
//! 2. **Address Splitting:** Deterministic (set, tag, offset) decomposition by
//!    fixed-width masking, shared by every cache controller.
//!
//! All geometry reaching these helpers has already been validated as a power of
//! two by [`Config::validate`](crate::config::Config::validate).

/// Returns `log2(value)` for a power of two (the index of its single set bit).
#[inline]
pub const fn log2(value: u64) -> u32 {
    value.trailing_zeros()
}

/// Returns a mask with the low `bits` bits set.
#[inline]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

/// An address decomposed into its cache coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitAddress {
    /// Set index in `[0, sets)`.
    pub set: u64,
    /// Tag stored in the line metadata.
    pub tag: u64,
    /// Byte offset within the line (block or page).
    pub offset: u64,
}

/// Splits addresses for a cache of `sets` sets of `line`-byte lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressSplitter {
    line_bits: u32,
    set_bits: u32,
}

impl AddressSplitter {
    /// Creates a splitter.
    ///
    /// # Arguments
    ///
    /// * `line_size` - Line (block or page) size in bytes; a power of two.
    /// * `sets` - Set count; a power of two.
    pub const fn new(line_size: u64, sets: u64) -> Self {
        Self {
            line_bits: log2(line_size),
            set_bits: log2(sets),
        }
    }

    /// Line size in bytes.
    pub const fn line_size(&self) -> u64 {
        1 << self.line_bits
    }

    /// Number of sets.
    pub const fn sets(&self) -> u64 {
        1 << self.set_bits
    }

    /// Decomposes `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address.
    ///
    /// # Returns
    ///
    /// The set index, tag, and intra-line offset.
    #[inline]
    pub const fn split(&self, addr: u64) -> SplitAddress {
        let line = addr >> self.line_bits;
        SplitAddress {
            set: line & low_mask(self.set_bits),
            tag: if self.set_bits >= u64::BITS {
                0
            } else {
                line >> self.set_bits
            },
            offset: addr & low_mask(self.line_bits),
        }
    }

    /// Rebuilds the line base address from a set and tag.
    #[inline]
    pub const fn join(&self, set: u64, tag: u64) -> u64 {
        ((tag << self.set_bits) | set) << self.line_bits
    }
}
