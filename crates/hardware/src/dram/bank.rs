//! Per-bank command state machine.
//!
//! A bank has at most one open row. Every command is checked against the
//! [`TimingTable`]: the latency of a command is a pure function of the
//! `(previous command, command)` pair. Column commands to the open row are
//! row-buffer accesses and cost the activate-to-column latency; they count as
//! row hits unless they directly follow the activate that opened the row.
//!
//! The bank also owns its refresh schedule. Refresh is off unless the vault
//! installs an interval; a "hot" hint halves the interval.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::common::error::TimingError;
use crate::common::time::SimTime;
use crate::dram::timing::{Command, TimingTable};

/// Per-row buffer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowState {
    /// Row held in the row buffer.
    Open,
    /// Row not activated.
    Closed,
}

/// Per-bank counters; the persisted metric contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BankStats {
    /// Cumulative activate latency.
    pub t_act: SimTime,
    /// Cumulative precharge latency.
    pub t_pre: SimTime,
    /// Cumulative read latency.
    pub t_rd: SimTime,
    /// Cumulative write latency.
    pub t_wr: SimTime,
    /// Cumulative refresh latency.
    pub t_ref: SimTime,
    /// Column reads issued.
    pub reads: u64,
    /// Column writes issued.
    pub writes: u64,
    /// Column accesses that found their row already open.
    pub row_hits: u64,
    /// Refresh commands issued.
    pub refreshes: u64,
}

impl BankStats {
    /// Adds `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.t_act += other.t_act;
        self.t_pre += other.t_pre;
        self.t_rd += other.t_rd;
        self.t_wr += other.t_wr;
        self.t_ref += other.t_ref;
        self.reads += other.reads;
        self.writes += other.writes;
        self.row_hits += other.row_hits;
        self.refreshes += other.refreshes;
    }

    /// Row hits over column accesses, or zero with no accesses.
    pub fn row_hit_rate(&self) -> f64 {
        let accesses = self.reads + self.writes;
        if accesses == 0 {
            0.0
        } else {
            self.row_hits as f64 / accesses as f64
        }
    }
}

/// Timing model of a single DRAM bank.
#[derive(Clone, Debug)]
pub struct BankTimingModel {
    size: u64,
    row_size: u64,
    rows: Vec<RowState>,
    open_row: Option<u32>,
    last_cmd: Command,
    clock: SimTime,
    busy: SimTime,
    table: Arc<TimingTable>,
    refresh_interval: SimTime,
    next_refresh: SimTime,
    hot: bool,
    stats: BankStats,
}

impl BankTimingModel {
    /// Creates a closed bank.
    ///
    /// # Arguments
    ///
    /// * `size` - Bank capacity in bytes.
    /// * `row_size` - Row size in bytes.
    /// * `table` - Shared command timing table.
    pub fn new(size: u64, row_size: u64, table: Arc<TimingTable>) -> Self {
        let rows = if row_size == 0 { 0 } else { size / row_size };
        Self {
            size,
            row_size,
            rows: vec![RowState::Closed; rows as usize],
            open_row: None,
            last_cmd: Command::Pre,
            clock: SimTime::ZERO,
            busy: SimTime::ZERO,
            table,
            refresh_interval: SimTime::ZERO,
            next_refresh: SimTime::ZERO,
            hot: false,
            stats: BankStats::default(),
        }
    }

    /// Issues `cmd` for `row` at `time`.
    ///
    /// # Arguments
    ///
    /// * `cmd` - Command to issue.
    /// * `row` - Target row (ignored by precharge and refresh beyond range checking).
    /// * `time` - Issue time; the bank clock never moves backwards.
    ///
    /// # Returns
    ///
    /// The command latency.
    ///
    /// # Errors
    ///
    /// * [`TimingError::RowOutOfRange`] for a row the bank does not have.
    /// * [`TimingError::RowNotOpen`] for a column command to a row other than the open one.
    /// * [`TimingError::IllegalTransition`] when the timing table has no entry for
    ///   `(last command, cmd)`.
    ///
    /// The bank state is unchanged on error.
    pub fn process_command(
        &mut self,
        cmd: Command,
        row: u32,
        time: SimTime,
    ) -> Result<SimTime, TimingError> {
        let rows = self.row_count();
        if row >= rows {
            return Err(TimingError::RowOutOfRange { row, rows });
        }

        let row_buffer_access = cmd.is_column() && self.open_row == Some(row);
        if cmd.is_column() && !row_buffer_access {
            return Err(TimingError::RowNotOpen {
                cmd,
                row,
                open: self.open_row,
            });
        }

        let from = if row_buffer_access {
            Command::Act
        } else {
            self.last_cmd
        };
        let latency = self
            .table
            .get(from, cmd)
            .ok_or(TimingError::IllegalTransition {
                from: self.last_cmd,
                to: cmd,
            })?;

        if row_buffer_access && self.last_cmd != Command::Act {
            self.stats.row_hits += 1;
        }

        match cmd {
            Command::Act => {
                self.close_row();
                self.rows[row as usize] = RowState::Open;
                self.open_row = Some(row);
                self.stats.t_act += latency;
            }
            Command::Pre | Command::Prea => {
                self.close_row();
                self.stats.t_pre += latency;
            }
            Command::Rd | Command::Rda => {
                self.stats.t_rd += latency;
                self.stats.reads += 1;
            }
            Command::Wr | Command::Wra => {
                self.stats.t_wr += latency;
                self.stats.writes += 1;
            }
            Command::Ref | Command::Refsb => {
                self.stats.t_ref += latency;
                self.stats.refreshes += 1;
            }
            Command::Pde | Command::Pdx | Command::Sre | Command::Srx => {}
        }
        if cmd.auto_precharges() {
            self.close_row();
        }

        trace!(%cmd, row, %time, %latency, "bank command");
        self.last_cmd = cmd;
        if time > self.clock {
            self.clock = time;
        }
        self.busy += latency;
        Ok(latency)
    }

    fn close_row(&mut self) {
        if let Some(open) = self.open_row.take() {
            self.rows[open as usize] = RowState::Closed;
        }
    }

    /// Row currently held in the row buffer.
    pub const fn open_row(&self) -> Option<u32> {
        self.open_row
    }

    /// State of `row`, or `None` if out of range.
    pub fn row_state(&self, row: u32) -> Option<RowState> {
        self.rows.get(row as usize).copied()
    }

    /// Last command accepted by the bank.
    pub const fn last_command(&self) -> Command {
        self.last_cmd
    }

    /// Bank capacity in bytes.
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Row size in bytes.
    pub const fn row_size(&self) -> u64 {
        self.row_size
    }

    /// Number of rows.
    pub const fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Latest issue time seen by the bank.
    pub const fn clock(&self) -> SimTime {
        self.clock
    }

    /// Sum of every accepted command's latency.
    pub const fn busy_time(&self) -> SimTime {
        self.busy
    }

    /// Bank counters.
    pub const fn stats(&self) -> &BankStats {
        &self.stats
    }

    /// Zeroes the counters; row state is kept.
    pub fn reset_stats(&mut self) {
        self.stats = BankStats::default();
    }

    /// Installs the base refresh interval; zero disables refresh.
    pub fn set_refresh_interval(&mut self, interval: SimTime) {
        self.refresh_interval = interval;
        self.next_refresh = self.clock + self.effective_refresh_interval();
    }

    /// Marks the bank hot (halved refresh interval) or restores it.
    pub fn set_hot(&mut self, hot: bool) {
        if self.hot != hot {
            self.hot = hot;
            self.next_refresh = self.clock + self.effective_refresh_interval();
        }
    }

    /// Returns `true` while the hot hint is set.
    pub const fn is_hot(&self) -> bool {
        self.hot
    }

    /// Refresh interval currently in force, zero when refresh is off.
    pub fn effective_refresh_interval(&self) -> SimTime {
        if self.hot {
            SimTime::from_ps(self.refresh_interval.as_ps() / 2)
        } else {
            self.refresh_interval
        }
    }

    /// Returns `true` when refresh is on and `time` has reached the deadline.
    pub fn refresh_due(&self, time: SimTime) -> bool {
        !self.refresh_interval.is_zero() && time >= self.next_refresh
    }

    /// Closes any open row and refreshes the bank.
    ///
    /// A bank whose last command auto-precharged (RDA/WRA) has no legal path
    /// to REFSB and reports an illegal transition.
    ///
    /// # Returns
    ///
    /// The combined precharge and refresh latency.
    ///
    /// # Errors
    ///
    /// Propagates any [`TimingError`] from the command sequence.
    pub fn refresh(&mut self, time: SimTime) -> Result<SimTime, TimingError> {
        let mut latency = SimTime::ZERO;
        if let Some(open) = self.open_row {
            latency += self.process_command(Command::Pre, open, time)?;
        }
        latency += self.process_command(Command::Refsb, 0, time + latency)?;
        self.next_refresh = time + latency + self.effective_refresh_interval();
        Ok(latency)
    }
}
