//! DRAM command set and timing tables.
//!
//! This module provides:
//! 1. **Commands:** The bank-level command vocabulary (activate, precharge, column
//!    accesses, refresh and power-down).
//! 2. **Speed Table:** Timing parameters in command-clock cycles, configurable via serde.
//! 3. **Timing Table:** The legal `(previous command -> next command)` transitions and
//!    the latency each one costs. A transition without an entry is illegal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::time::SimTime;

/// Bank-level DRAM commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    /// Activate (open) a row.
    Act,
    /// Precharge (close) the open row.
    Pre,
    /// Precharge all banks.
    Prea,
    /// Column read.
    Rd,
    /// Column write.
    Wr,
    /// Column read with auto-precharge.
    Rda,
    /// Column write with auto-precharge.
    Wra,
    /// All-bank refresh.
    Ref,
    /// Single-bank refresh.
    Refsb,
    /// Power-down entry.
    Pde,
    /// Power-down exit.
    Pdx,
    /// Self-refresh entry.
    Sre,
    /// Self-refresh exit.
    Srx,
}

impl Command {
    /// Number of distinct commands.
    pub const COUNT: usize = 13;

    /// Every command, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Act,
        Self::Pre,
        Self::Prea,
        Self::Rd,
        Self::Wr,
        Self::Rda,
        Self::Wra,
        Self::Ref,
        Self::Refsb,
        Self::Pde,
        Self::Pdx,
        Self::Sre,
        Self::Srx,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Column read or write, with or without auto-precharge.
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Rd | Self::Wr | Self::Rda | Self::Wra)
    }

    /// Column write, with or without auto-precharge.
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Wr | Self::Wra)
    }

    /// Column access that closes the row afterwards.
    pub const fn auto_precharges(self) -> bool {
        matches!(self, Self::Rda | Self::Wra)
    }

    /// Command that closes the open row.
    pub const fn closes_row(self) -> bool {
        matches!(self, Self::Pre | Self::Prea)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Act => "ACT",
            Self::Pre => "PRE",
            Self::Prea => "PREA",
            Self::Rd => "RD",
            Self::Wr => "WR",
            Self::Rda => "RDA",
            Self::Wra => "WRA",
            Self::Ref => "REF",
            Self::Refsb => "REFSB",
            Self::Pde => "PDE",
            Self::Pdx => "PDX",
            Self::Sre => "SRE",
            Self::Srx => "SRX",
        };
        f.write_str(name)
    }
}

/// DRAM timing parameters.
///
/// All `n_*` fields are in command-clock cycles; `tck_ps` is the clock period.
/// The defaults describe a 500 MHz stacked-DRAM command clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    /// Command clock period in picoseconds.
    pub tck_ps: u64,
    /// Burst length (clock cycles).
    pub n_bl: u32,
    /// Column-to-column, different bank group.
    pub n_ccds: u32,
    /// Column-to-column, same bank group.
    pub n_ccdl: u32,
    /// CAS latency.
    pub n_cl: u32,
    /// Activate to read.
    pub n_rcdr: u32,
    /// Activate to write.
    pub n_rcdw: u32,
    /// Precharge period.
    pub n_rp: u32,
    /// CAS write latency.
    pub n_cwl: u32,
    /// Activate to precharge.
    pub n_ras: u32,
    /// Activate to activate, same bank.
    pub n_rc: u32,
    /// Read to precharge.
    pub n_rtp: u32,
    /// Write to read, different bank group.
    pub n_wtrs: u32,
    /// Write to read, same bank group.
    pub n_wtrl: u32,
    /// Write recovery.
    pub n_wr: u32,
    /// Activate to activate, different bank group.
    pub n_rrds: u32,
    /// Activate to activate, same bank group.
    pub n_rrdl: u32,
    /// Four-activate window.
    pub n_faw: u32,
    /// Refresh cycle time.
    pub n_rfc: u32,
    /// Refresh interval.
    pub n_refi: u32,
    /// Power-down minimum.
    pub n_pd: u32,
    /// Power-down exit.
    pub n_xp: u32,
    /// Self-refresh minimum.
    pub n_ckesr: u32,
    /// Self-refresh exit.
    pub n_xs: u32,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            tck_ps: 2000,
            n_bl: 2,
            n_ccds: 2,
            n_ccdl: 3,
            n_cl: 7,
            n_rcdr: 7,
            n_rcdw: 6,
            n_rp: 7,
            n_cwl: 4,
            n_ras: 17,
            n_rc: 24,
            n_rtp: 7,
            n_wtrs: 2,
            n_wtrl: 4,
            n_wr: 8,
            n_rrds: 4,
            n_rrdl: 5,
            n_faw: 20,
            n_rfc: 0,
            n_refi: 1950,
            n_pd: 5,
            n_xp: 5,
            n_ckesr: 5,
            n_xs: 0,
        }
    }
}

impl SpeedTable {
    /// Duration of `cycles` command-clock cycles.
    pub const fn cycles(&self, cycles: u64) -> SimTime {
        SimTime::from_ps(cycles.saturating_mul(self.tck_ps))
    }

    /// Refresh interval.
    pub const fn refresh_interval(&self) -> SimTime {
        self.cycles(self.n_refi as u64)
    }
}

/// Legal command transitions and their latency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingTable {
    latency: [[Option<SimTime>; Command::COUNT]; Command::COUNT],
}

impl TimingTable {
    /// Builds the transition table from a speed table.
    ///
    /// # Arguments
    ///
    /// * `speed` - Timing parameters.
    ///
    /// # Returns
    ///
    /// A table containing exactly the transitions a bank may perform.
    pub fn new(speed: &SpeedTable) -> Self {
        let mut table = Self {
            latency: [[None; Command::COUNT]; Command::COUNT],
        };
        let write_recovery = speed.n_cwl + speed.n_bl + speed.n_wr;

        table.set(speed, Command::Act, Command::Rd, speed.n_rcdr);
        table.set(speed, Command::Act, Command::Rda, speed.n_rcdr);
        table.set(speed, Command::Act, Command::Wr, speed.n_rcdw);
        table.set(speed, Command::Act, Command::Wra, speed.n_rcdw);
        table.set(speed, Command::Rd, Command::Pre, speed.n_rtp);
        table.set(speed, Command::Wr, Command::Pre, write_recovery);
        table.set(speed, Command::Rda, Command::Act, speed.n_rtp + speed.n_rp);
        table.set(speed, Command::Wra, Command::Act, write_recovery + speed.n_rp);
        table.set(speed, Command::Act, Command::Act, speed.n_rc);
        table.set(speed, Command::Act, Command::Pre, speed.n_ras);
        table.set(speed, Command::Pre, Command::Act, speed.n_rp);
        table.set(speed, Command::Pre, Command::Refsb, speed.n_rp);
        table.set(speed, Command::Refsb, Command::Refsb, speed.n_rfc);
        table.set(speed, Command::Refsb, Command::Act, speed.n_rfc);
        table
    }

    fn set(&mut self, speed: &SpeedTable, from: Command, to: Command, cycles: u32) {
        self.latency[from.index()][to.index()] = Some(speed.cycles(u64::from(cycles)));
    }

    /// Latency of issuing `to` after `from`, or `None` if the transition is illegal.
    #[inline]
    pub const fn get(&self, from: Command, to: Command) -> Option<SimTime> {
        self.latency[from.index()][to.index()]
    }

    /// Number of legal transitions.
    pub fn len(&self) -> usize {
        self.latency.iter().flatten().filter(|l| l.is_some()).count()
    }

    /// Returns `true` if no transition is legal.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
