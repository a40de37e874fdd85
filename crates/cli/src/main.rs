//! Trace-driven driver for the stacked-DRAM cache model.
//!
//! This binary replays a request trace against [`PerfModel`]. It performs:
//! 1. **Setup:** Load and validate a JSON configuration (or use the defaults).
//! 2. **Replay:** Feed every request in time order, running one thermal epoch
//!    per `--epoch-ns` of trace time with readings from an optional thermal trace.
//! 3. **Report:** Print the final statistics as JSON or as a text summary.
//!
//! Logs go to stderr; stdout carries only the report.

mod trace;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thermdram_core::{Config, PerfModel, PerfStats, SimTime};

use crate::trace::{ThermalTrace, parse_request};

#[derive(Parser, Debug)]
#[command(
    name = "thermdram",
    author,
    version,
    about = "Stacked-DRAM cache model with thermal remapping",
    long_about = "Replay a memory request trace through the stacked-DRAM cache model and report latency, DRAM and remapping statistics.\n\nTrace lines:   <time_ns> <R|W> <address> [size]\nThermal lines: <epoch> <vault> <bank> <temperature>\n\nExamples:\n  thermdram --trace requests.txt\n  thermdram --config hbm.json --trace requests.txt --thermal thermal.txt --epoch-ns 1000000\n  thermdram --print-config > default.json"
)]
struct Cli {
    /// JSON configuration; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request trace.
    #[arg(short, long, required_unless_present = "print_config")]
    trace: Option<PathBuf>,

    /// Thermal trace feeding one epoch of readings at a time.
    #[arg(long)]
    thermal: Option<PathBuf>,

    /// Trace time between thermal epochs, in nanoseconds.
    #[arg(long, default_value_t = 1_000_000, value_parser = clap::value_parser!(u64).range(1..))]
    epoch_ns: u64,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log filter (e.g. `info`, `thermdram_core=debug`); overrides `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

/// Mechanism passes run for one gap in the trace; older epochs of a longer
/// gap only contribute their readings.
const CATCH_UP_EPOCHS: u64 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty-printed JSON.
    Json,
    /// Human-readable summary.
    Text,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    if let Err(message) = run(&cli) {
        eprintln!("error: {message}");
        process::exit(1);
    }
}

/// Installs a stderr `fmt` subscriber; `--log` wins over `RUST_LOG`, which wins over `warn`.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Config::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = load_config(cli.config.as_deref())?;
    if cli.print_config {
        let json = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
        return emit(cli.output.as_deref(), &json);
    }

    let mut thermal = match &cli.thermal {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let trace =
                ThermalTrace::parse(&text).map_err(|e| format!("{}: {e}", path.display()))?;
            info!(epochs = trace.len(), "thermal trace loaded");
            Some(trace)
        }
        None => None,
    };

    let mut model = PerfModel::new(config).map_err(|e| e.to_string())?;
    let Some(trace_path) = cli.trace.as_deref() else {
        return Err("--trace is required".to_owned());
    };
    let file = File::open(trace_path)
        .map_err(|e| format!("cannot open {}: {e}", trace_path.display()))?;

    let mut clock = EpochClock::new(cli.epoch_ns);
    let mut requests = 0u64;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| format!("{}: {e}", trace_path.display()))?;
        let Some(request) = parse_request(&line, index + 1)
            .map_err(|e| format!("{}: {e}", trace_path.display()))?
        else {
            continue;
        };

        if let (Some(due), Some(trace)) = (clock.advance(request.time_ns), thermal.as_mut()) {
            close_epochs(&mut model, trace, due);
        }

        let _ = model.get_access_latency(
            SimTime::from_ns(request.time_ns),
            request.size,
            request.addr,
            request.access,
        );
        requests += 1;
    }
    info!(requests, "trace replayed");

    emit(cli.output.as_deref(), &render(&model.stats(), cli.format)?)
}

/// Trace-time epoch boundaries: epoch `k` ends at `k * epoch_ns`.
#[derive(Debug)]
struct EpochClock {
    epoch_ns: u64,
    closed: u64,
}

impl EpochClock {
    const fn new(epoch_ns: u64) -> Self {
        Self {
            epoch_ns,
            closed: 0,
        }
    }

    /// Closes every epoch ending at or before `time_ns` and returns those that
    /// run the mechanism, at most [`CATCH_UP_EPOCHS`] of the most recent ones.
    fn advance(&mut self, time_ns: u64) -> Option<RangeInclusive<u64>> {
        let due = time_ns / self.epoch_ns;
        if due <= self.closed {
            return None;
        }
        let first = due
            .saturating_sub(CATCH_UP_EPOCHS - 1)
            .max(self.closed + 1);
        self.closed = due;
        Some(first..=due)
    }
}

/// Feeds each epoch's readings (and any skipped before it) and runs the mechanism.
fn close_epochs(model: &mut PerfModel, thermal: &mut ThermalTrace, epochs: RangeInclusive<u64>) {
    for epoch in epochs {
        for reading in thermal.take_through(epoch) {
            model.update_temperature(reading.vault, reading.bank, reading.temperature);
        }
        let report = model.run_mechanism();
        for failure in &report.failures {
            warn!(epoch, %failure, "unrelieved hot entity");
        }
    }
}

fn render(stats: &PerfStats, format: Format) -> Result<String, String> {
    match format {
        Format::Json => serde_json::to_string_pretty(stats).map_err(|e| e.to_string()),
        Format::Text => Ok(stats.to_string()),
    }
}

fn emit(path: Option<&Path>, report: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, format!("{report}\n"))
            .map_err(|e| format!("cannot write {}: {e}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{report}").map_err(|e| e.to_string())
        }
    }
}
