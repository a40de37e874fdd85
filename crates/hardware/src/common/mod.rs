//! Common types shared by every layer of the model.
//!
//! This module provides:
//! 1. **Addresses:** Bit-field helpers and the set/tag/offset address splitter.
//! 2. **Access Types:** The read/write classification carried by every request.
//! 3. **Error Handling:** The error taxonomy for configuration, timing, cache and remap faults.
//! 4. **Time:** The picosecond `SimTime` newtype and the `Bandwidth` cost model.

/// Bit-field helpers and address decomposition.
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types for every layer of the model.
pub mod error;

/// Simulated time and bandwidth.
pub mod time;

pub use addr::{AddressSplitter, SplitAddress};
pub use data::AccessType;
pub use error::{CacheError, ConfigError, RemapError, SimError, TimingError};
pub use time::{Bandwidth, SimTime};
