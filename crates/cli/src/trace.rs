//! Request and thermal trace parsing.
//!
//! Both formats are whitespace-separated text, one record per line. Blank
//! lines and lines starting with `#` are skipped.
//!
//! 1. **Requests:** `<time_ns> <R|W> <address> [size]`, where the address is
//!    decimal or `0x`-prefixed hex and the size defaults to 64 bytes.
//! 2. **Thermal:** `<epoch> <vault> <bank> <temperature>`, epochs counted from 1.

use std::collections::BTreeMap;

use thiserror::Error;

use thermdram_core::{AccessType, ThermalReading};

/// Request size used when a trace line omits it.
pub const DEFAULT_REQUEST_BYTES: u64 = 64;

/// A malformed trace line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    /// A required field is absent.
    #[error("line {line}: missing {field}")]
    Missing {
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
    },
    /// A field did not parse.
    #[error("line {line}: invalid {field} `{value}`")]
    Invalid {
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
        /// Offending text.
        value: String,
    },
}

/// One host request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Arrival time in nanoseconds.
    pub time_ns: u64,
    /// Read or write.
    pub access: AccessType,
    /// Physical address.
    pub addr: u64,
    /// Size in bytes.
    pub size: u64,
}

fn content(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty() && !text.starts_with('#')).then_some(text)
}

fn field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line: usize,
    name: &'static str,
) -> Result<&'a str, TraceError> {
    fields.next().ok_or(TraceError::Missing { line, field: name })
}

fn invalid(line: usize, field: &'static str, value: &str) -> TraceError {
    TraceError::Invalid {
        line,
        field,
        value: value.to_owned(),
    }
}

fn parse_u64(text: &str, line: usize, name: &'static str) -> Result<u64, TraceError> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| invalid(line, name, text))
}

fn parse_access(text: &str, line: usize) -> Result<AccessType, TraceError> {
    match text.to_ascii_uppercase().as_str() {
        "R" | "READ" => Ok(AccessType::Read),
        "W" | "WRITE" => Ok(AccessType::Write),
        _ => Err(invalid(line, "access type", text)),
    }
}

/// Parses one request line.
///
/// # Returns
///
/// `None` for blank and comment lines.
pub fn parse_request(text: &str, line: usize) -> Result<Option<Request>, TraceError> {
    let Some(text) = content(text) else {
        return Ok(None);
    };
    let mut fields = text.split_whitespace();
    let time_ns = parse_u64(field(&mut fields, line, "time")?, line, "time")?;
    let access = parse_access(field(&mut fields, line, "access type")?, line)?;
    let addr = parse_u64(field(&mut fields, line, "address")?, line, "address")?;
    let size = match fields.next() {
        Some(size) => parse_u64(size, line, "size")?,
        None => DEFAULT_REQUEST_BYTES,
    };
    Ok(Some(Request {
        time_ns,
        access,
        addr,
        size,
    }))
}

/// Parses one thermal line into its epoch and reading.
pub fn parse_reading(text: &str, line: usize) -> Result<Option<(u64, ThermalReading)>, TraceError> {
    let Some(text) = content(text) else {
        return Ok(None);
    };
    let mut fields = text.split_whitespace();
    let epoch = parse_u64(field(&mut fields, line, "epoch")?, line, "epoch")?;
    let vault = field(&mut fields, line, "vault")?;
    let vault = vault.parse().map_err(|_| invalid(line, "vault", vault))?;
    let bank = field(&mut fields, line, "bank")?;
    let bank = bank.parse().map_err(|_| invalid(line, "bank", bank))?;
    let temperature = field(&mut fields, line, "temperature")?;
    let temperature: f64 = temperature
        .parse()
        .ok()
        .filter(|t: &f64| t.is_finite())
        .ok_or_else(|| invalid(line, "temperature", temperature))?;
    Ok(Some((
        epoch,
        ThermalReading {
            vault,
            bank,
            temperature,
        },
    )))
}

/// Thermal readings loaded from a trace, served epoch by epoch.
#[derive(Debug, Default)]
pub struct ThermalTrace {
    epochs: BTreeMap<u64, Vec<ThermalReading>>,
}

impl ThermalTrace {
    /// Parses a whole thermal trace.
    ///
    /// # Errors
    ///
    /// The first malformed line.
    pub fn parse(text: &str) -> Result<Self, TraceError> {
        let mut epochs: BTreeMap<u64, Vec<ThermalReading>> = BTreeMap::new();
        for (index, line) in text.lines().enumerate() {
            if let Some((epoch, reading)) = parse_reading(line, index + 1)? {
                epochs.entry(epoch).or_default().push(reading);
            }
        }
        Ok(Self { epochs })
    }

    /// Epochs with at least one reading left.
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// Returns `true` once every epoch has been served.
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Removes the readings of every epoch up to and including `epoch`, oldest first.
    pub fn take_through(&mut self, epoch: u64) -> Vec<ThermalReading> {
        let later = self.epochs.split_off(&epoch.saturating_add(1));
        let due = std::mem::replace(&mut self.epochs, later);
        due.into_values().flatten().collect()
    }
}
