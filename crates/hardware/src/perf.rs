//! Host-facing performance model.
//!
//! [`PerfModel`] is the single object a host simulator talks to. It answers
//! access-latency queries, accepts thermal readings and runs the remapping
//! mechanism once per thermal epoch. Latency queries never fail: a request
//! that hits a modeling fault is logged, counted as an anomaly and answered
//! with the latency accumulated before the fault.

use tracing::{info, warn};

use crate::common::data::AccessType;
use crate::common::error::SimError;
use crate::common::time::SimTime;
use crate::config::Config;
use crate::controller::CacheController;
use crate::remap::{RemapReport, RemappingManager};
use crate::stats::PerfStats;

/// One temperature sample of a physical bank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalReading {
    /// Physical vault.
    pub vault: u32,
    /// Physical bank within the vault.
    pub bank: u32,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
}

/// Supplier of per-epoch temperature readings (a thermal solver, a trace file).
pub trait ThermalSource {
    /// Readings for `epoch`; banks without a reading keep their last value.
    fn readings(&mut self, epoch: u64) -> Vec<ThermalReading>;
}

/// The stacked-DRAM cache model.
#[derive(Debug)]
pub struct PerfModel {
    config: Config,
    controller: CacheController,
    accesses: u64,
    total_latency: SimTime,
    anomalies: u64,
}

impl PerfModel {
    /// Validates `config` and builds the model.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if the configuration is rejected.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;
        info!(
            model = ?config.cache.model,
            vaults = config.dram.vaults,
            banks = config.dram.banks_per_vault(),
            sets = config.cache.sets,
            policy = ?config.remap.policy,
            "stacked dram cache model initialized"
        );
        Ok(Self {
            controller: CacheController::new(&config),
            config,
            accesses: 0,
            total_latency: SimTime::ZERO,
            anomalies: 0,
        })
    }

    /// Latency of one request. Never fails.
    ///
    /// # Arguments
    ///
    /// * `time` - Packet arrival time.
    /// * `size` - Packet size in bytes.
    /// * `addr` - Physical address.
    /// * `access` - Read or write.
    pub fn get_access_latency(&mut self, time: SimTime, size: u64, addr: u64, access: AccessType) -> SimTime {
        if !self.config.enabled {
            return SimTime::ZERO;
        }
        let latency = match self.controller.process_request(time, size, addr, access) {
            Ok(latency) => latency,
            Err(error) => {
                warn!(%time, addr, %access, error = %error.source, "request degraded");
                self.anomalies += 1;
                error.latency
            }
        };
        self.accesses += 1;
        self.total_latency += latency;
        latency
    }

    /// Latency of a request issued by `requester`.
    ///
    /// Requesters at or above `application_cores` are served for free.
    pub fn get_access_latency_for(
        &mut self,
        requester: u32,
        time: SimTime,
        size: u64,
        addr: u64,
        access: AccessType,
    ) -> SimTime {
        if requester >= self.config.application_cores {
            return SimTime::ZERO;
        }
        self.get_access_latency(time, size, addr, access)
    }

    /// Latency of one request, surfacing any modeling fault.
    ///
    /// # Errors
    ///
    /// The first timing, cache or remap error the request ran into.
    pub fn try_access_latency(
        &mut self,
        time: SimTime,
        size: u64,
        addr: u64,
        access: AccessType,
    ) -> Result<SimTime, SimError> {
        if !self.config.enabled {
            return Ok(SimTime::ZERO);
        }
        let latency = self
            .controller
            .process_request(time, size, addr, access)
            .map_err(|error| error.source)?;
        self.accesses += 1;
        self.total_latency += latency;
        Ok(latency)
    }

    /// Stores a reading for a physical bank; out-of-range banks are logged and dropped.
    pub fn update_temperature(&mut self, vault: u32, bank: u32, temperature: f64) {
        if let Err(error) = self
            .controller
            .remapping_mut()
            .update_temperature(vault, bank, temperature)
        {
            warn!(%error, temperature, "temperature reading dropped");
        }
    }

    /// Runs one thermal epoch against the stored temperatures.
    pub fn run_mechanism(&mut self) -> RemapReport {
        let report = self.controller.remapping_mut().run_mechanism();
        if report.changed() {
            info!(
                epoch = report.epoch,
                bank_swaps = report.bank_swaps.len(),
                vault_swaps = report.vault_swaps.len(),
                migrations = report.row_migrations.len(),
                disabled = report.disabled_banks.len() + report.disabled_vaults.len(),
                recovered = report.recovered_banks.len() + report.recovered_vaults.len(),
                "remap epoch"
            );
        }
        report
    }

    /// Pulls the next epoch's readings from `source` and runs the mechanism.
    pub fn thermal_epoch(&mut self, source: &mut dyn ThermalSource) -> RemapReport {
        let epoch = self.controller.remapping().epoch() + 1;
        for reading in source.readings(epoch) {
            self.update_temperature(reading.vault, reading.bank, reading.temperature);
        }
        self.run_mechanism()
    }

    /// Halves (or restores) the refresh interval of a physical bank.
    ///
    /// # Errors
    ///
    /// [`SimError::Timing`] for a bank outside the stack.
    pub fn set_bank_ref(&mut self, vault: u32, bank: u32, hot: bool) -> Result<(), SimError> {
        self.controller.dram_mut().set_bank_ref(vault, bank, hot)?;
        Ok(())
    }

    /// Snapshot of every counter.
    pub fn stats(&self) -> PerfStats {
        let cache = self.controller.stats();
        PerfStats {
            accesses: self.accesses,
            total_latency: self.total_latency,
            anomalies: self.anomalies + cache.out_of_order,
            cache,
            dram: self.controller.dram().stats(),
            remap: self.controller.remapping().stats(),
        }
    }

    /// Zeroes every counter; cache content, mappings and temperatures are kept.
    pub fn reset_stats(&mut self) {
        self.accesses = 0;
        self.total_latency = SimTime::ZERO;
        self.anomalies = 0;
        self.controller.reset_stats();
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The cache controller.
    pub const fn controller(&self) -> &CacheController {
        &self.controller
    }

    /// The remapping layer.
    pub const fn remapping(&self) -> &RemappingManager {
        self.controller.remapping()
    }
}
