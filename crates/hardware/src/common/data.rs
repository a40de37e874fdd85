//! Memory Access Types.
//!
//! Every request entering the model is classified as a read or a write. The
//! classification selects the DRAM column command (RD/WR), decides whether a
//! cached sub-block becomes dirty, and splits the read/write counters.

use serde::{Deserialize, Serialize};

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Data read access.
    #[serde(alias = "R", alias = "READ")]
    Read,

    /// Data write access.
    #[serde(alias = "W", alias = "WRITE")]
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.write_str("READ"),
            Self::Write => f.write_str("WRITE"),
        }
    }
}
