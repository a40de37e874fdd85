//! Simulated time and bandwidth.
//!
//! All latencies in the model are carried as [`SimTime`], a picosecond count.
//! Timestamps handed in by the host simulator and durations returned to it use
//! the same type, so a request's completion time is simply `arrival + latency`.
//!
//! [`Bandwidth`] converts a transfer size into the time the transfer occupies a
//! link, rounded up to whole nanoseconds.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// Picoseconds per nanosecond.
const PS_PER_NS: u64 = 1000;

/// A point in, or span of, simulated time with picosecond resolution.
///
/// Arithmetic saturates at `u64::MAX` rather than wrapping.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    /// Zero duration / simulation start.
    pub const ZERO: Self = Self(0);

    /// Creates a time from picoseconds.
    #[inline]
    pub const fn from_ps(ps: u64) -> Self {
        Self(ps)
    }

    /// Creates a time from nanoseconds.
    #[inline]
    pub const fn from_ns(ns: u64) -> Self {
        Self(ns.saturating_mul(PS_PER_NS))
    }

    /// Returns the value in picoseconds.
    #[inline]
    pub const fn as_ps(self) -> u64 {
        self.0
    }

    /// Returns the value in whole nanoseconds, truncating.
    #[inline]
    pub const fn as_ns(self) -> u64 {
        self.0 / PS_PER_NS
    }

    /// Returns `self - earlier`, or zero if `earlier` is later than `self`.
    #[inline]
    pub const fn saturating_sub(self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }

    /// Returns `true` for a zero span.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for SimTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Mul<u64> for SimTime {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: u64) -> Self {
        Self(self.0.saturating_mul(rhs))
    }
}

impl Sum for SimTime {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, t| acc + t)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03} ns", self.0 / PS_PER_NS, self.0 % PS_PER_NS)
    }
}

/// A link transfer rate in bytes per nanosecond (numerically equal to GB/s).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bandwidth(f64);

impl Bandwidth {
    /// Creates a bandwidth of `bytes_per_ns`.
    ///
    /// Validity (finite, positive) is checked by configuration validation;
    /// a non-positive rate makes every transfer free.
    pub const fn new(bytes_per_ns: f64) -> Self {
        Self(bytes_per_ns)
    }

    /// Returns the rate in bytes per nanosecond.
    pub const fn bytes_per_ns(self) -> f64 {
        self.0
    }

    /// Returns `true` if the rate can be used to compute transfer times.
    pub fn is_usable(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Time a transfer of `bytes` occupies the link, rounded up to whole nanoseconds.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Transfer size.
    ///
    /// # Returns
    ///
    /// The transfer time; zero for an empty transfer or an unusable rate.
    pub fn transfer_time(self, bytes: u64) -> SimTime {
        if bytes == 0 || !self.is_usable() {
            return SimTime::ZERO;
        }
        let ns = (bytes as f64 / self.0).ceil();
        SimTime::from_ns(ns as u64)
    }
}

impl Default for Bandwidth {
    fn default() -> Self {
        Self(1.0)
    }
}
