//! Configuration system for the stacked-DRAM cache model.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the model. It provides:
//! 1. **Defaults:** Baseline stack geometry, cache organization, off-chip memory and thermal thresholds.
//! 2. **Structures:** Hierarchical config for the DRAM stack, cache, segment model, memory and remapping.
//! 3. **Enums:** Cache controller model, page-set replacement policy and remap policy.
//! 4. **Validation:** Rejection of geometry the address arithmetic cannot handle.
//!
//! Configuration is supplied as JSON by the host simulator or the CLI; every field is
//! optional and falls back to the `defaults` module.

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;
use crate::common::time::{Bandwidth, SimTime};
use crate::dram::timing::SpeedTable;

/// Default configuration constants.
mod defaults {
    /// Vaults in the stack.
    pub const VAULTS: u32 = 32;

    /// Bytes per vault (128 MiB).
    pub const VAULT_SIZE: u64 = 128 * 1024 * 1024;

    /// Bytes per bank (16 MiB), giving 8 banks per vault.
    pub const BANK_SIZE: u64 = 16 * 1024 * 1024;

    /// Bytes per DRAM row (8 KiB).
    pub const ROW_SIZE: u64 = 8 * 1024;

    /// Stacked DRAM bytes per nanosecond.
    pub const DRAM_BANDWIDTH: f64 = 16.0;

    /// Bytes moved by one DRAM request; larger transfers are split.
    pub const REQUEST_BYTES: u64 = 64;

    /// Cache sets.
    pub const SETS: u64 = 65536;

    /// Ways per page set.
    pub const ASSOCIATIVITY: u32 = 4;

    /// Sub-block size in bytes.
    pub const BLOCK_SIZE: u64 = 64;

    /// Page size in bytes (16 blocks).
    pub const PAGE_SIZE: u64 = 1024;

    /// Footprint history table entries.
    pub const FOOTPRINT_ENTRIES: usize = 64;

    /// Alloy tag-and-data units per DRAM row.
    pub const TAGS_PER_ROW: u64 = 28;

    /// Constant-model fast memory (4 GiB).
    pub const FAST_MEMORY: u64 = 4 * 1024 * 1024 * 1024;

    /// Constant-model segment size (1 MiB).
    pub const SEGMENT_SIZE: u64 = 1024 * 1024;

    /// Candidate slots per segment entry.
    pub const SLOTS: u32 = 6;

    /// Accesses between swap decisions.
    pub const SWAP_COUNT: u32 = 20;

    /// Off-chip access latency in nanoseconds.
    pub const MEMORY_LATENCY_NS: u64 = 45;

    /// Off-chip bytes per nanosecond.
    pub const MEMORY_BANDWIDTH: f64 = 7.6;

    /// Temperature at which a bank is relieved.
    pub const HIGH_THRESHOLD: f64 = 85.0;

    /// Temperature at which a bank is disabled if it cannot be relieved.
    pub const DANGEROUS_THRESHOLD: f64 = 95.0;

    /// Temperature below which a bank can receive data or recover.
    pub const REMAP_THRESHOLD: f64 = 80.0;

    /// Temperature of every bank before the first thermal epoch.
    pub const INITIAL_TEMPERATURE: f64 = 60.0;

    /// Hot-row tracker capacity.
    pub const HOT_ROWS: usize = 8;

    /// Epochs an entity stays frozen after a remap.
    pub const COOLDOWN_EPOCHS: u64 = 1;

    /// Remap table lookup cost per request.
    pub const LOOKUP_LATENCY_PS: u64 = 10;

    /// Remap table lookup cost when the table spans all vaults.
    pub const GLOBAL_LOOKUP_LATENCY_PS: u64 = 200;
}

/// Cache controller model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheModel {
    /// Direct-mapped block cache with tags stored alongside data.
    #[serde(alias = "Alloy")]
    Alloy,

    /// Associative page cache with footprint-predicted partial loads.
    #[default]
    #[serde(alias = "Unison")]
    Unison,

    /// Segment-swap model: fast memory holds one of several slots per segment.
    #[serde(alias = "Constant")]
    Constant,
}

/// Victim selection for page sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    /// Aging counters: evict the line with the largest age.
    #[default]
    #[serde(alias = "MaxAge", alias = "aging")]
    MaxAge,

    /// Strict recency ranks.
    #[serde(alias = "LRU", alias = "Lru")]
    Lru,
}

/// Thermal remapping policy, configured by numeric id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RemapPolicy {
    /// 0: disable hot banks; no relocation.
    Disable,
    /// 1: swap hot banks (and hot vaults when inter-vault remapping is on).
    #[default]
    Swap,
    /// 2: disable hot vaults.
    VaultDisable,
    /// 3: migrate a bank's hot rows to a cool bank.
    Hybrid,
}

impl TryFrom<u8> for RemapPolicy {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Disable),
            1 => Ok(Self::Swap),
            2 => Ok(Self::VaultDisable),
            3 => Ok(Self::Hybrid),
            other => Err(format!("unknown remap policy id {other} (expected 0-3)")),
        }
    }
}

impl From<RemapPolicy> for u8 {
    fn from(policy: RemapPolicy) -> Self {
        match policy {
            RemapPolicy::Disable => 0,
            RemapPolicy::Swap => 1,
            RemapPolicy::VaultDisable => 2,
            RemapPolicy::Hybrid => 3,
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use thermdram_core::config::{CacheModel, Config, RemapPolicy};
///
/// let json = r#"{
///     "dram": { "vaults": 4, "vault_size": 1048576, "bank_size": 262144, "row_size": 8192 },
///     "cache": { "model": "alloy", "sets": 1024 },
///     "remap": { "policy": 0, "high_threshold": 90.0 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.model, CacheModel::Alloy);
/// assert_eq!(config.remap.policy, RemapPolicy::Disable);
/// assert_eq!(config.dram.banks_per_vault(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// When false, every request is served with zero latency.
    #[serde(default = "Config::default_enabled")]
    pub enabled: bool,

    /// Requesters with an id at or above this value bypass the model.
    #[serde(default = "Config::default_application_cores")]
    pub application_cores: u32,

    /// Stack geometry and DRAM timing.
    #[serde(default)]
    pub dram: DramConfig,

    /// Cache organization.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Segment-swap model parameters.
    #[serde(default)]
    pub segment: SegmentConfig,

    /// Off-chip main memory.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Thermal remapping.
    #[serde(default)]
    pub remap: RemapConfig,
}

impl Config {
    fn default_enabled() -> bool {
        true
    }

    fn default_application_cores() -> u32 {
        u32::MAX
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or an unknown policy id, or any
    /// error returned by [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for geometry the model cannot represent.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: a zero size or count, a non-power-of-two
    /// value used as a bit mask, or a cross-field inconsistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dram.validate()?;
        self.cache.validate()?;
        if self.cache.model == CacheModel::Constant {
            self.segment.validate()?;
        }
        self.memory.validate()?;
        self.remap.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            application_cores: u32::MAX,
            dram: DramConfig::default(),
            cache: CacheConfig::default(),
            segment: SegmentConfig::default(),
            memory: MemoryConfig::default(),
            remap: RemapConfig::default(),
        }
    }
}

fn non_zero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Zero { field })
    } else {
        Ok(())
    }
}

fn power_of_two(field: &'static str, value: u64) -> Result<(), ConfigError> {
    non_zero(field, value)?;
    if value.is_power_of_two() {
        Ok(())
    } else {
        Err(ConfigError::NotPowerOfTwo { field, value })
    }
}

fn usable_bandwidth(field: &'static str, bandwidth: Bandwidth) -> Result<(), ConfigError> {
    if bandwidth.is_usable() {
        Ok(())
    } else {
        Err(ConfigError::Inconsistent {
            reason: format!("`{field}` must be finite and positive"),
        })
    }
}

/// Stacked DRAM geometry and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DramConfig {
    /// Vault count (power of two).
    #[serde(default = "DramConfig::default_vaults")]
    pub vaults: u32,

    /// Bytes per vault.
    #[serde(default = "DramConfig::default_vault_size")]
    pub vault_size: u64,

    /// Bytes per bank.
    #[serde(default = "DramConfig::default_bank_size")]
    pub bank_size: u64,

    /// Bytes per row.
    #[serde(default = "DramConfig::default_row_size")]
    pub row_size: u64,

    /// Close the row after every access instead of leaving it open.
    #[serde(default)]
    pub auto_precharge: bool,

    /// Model per-bank refresh.
    #[serde(default)]
    pub refresh: bool,

    /// Stacked DRAM transfer rate.
    #[serde(default = "DramConfig::default_bandwidth")]
    pub bandwidth: Bandwidth,

    /// Bytes moved per DRAM request.
    #[serde(default = "DramConfig::default_request_bytes")]
    pub request_bytes: u64,

    /// Command timing parameters.
    #[serde(default)]
    pub speed: SpeedTable,
}

impl DramConfig {
    fn default_vaults() -> u32 {
        defaults::VAULTS
    }

    fn default_vault_size() -> u64 {
        defaults::VAULT_SIZE
    }

    fn default_bank_size() -> u64 {
        defaults::BANK_SIZE
    }

    fn default_row_size() -> u64 {
        defaults::ROW_SIZE
    }

    fn default_bandwidth() -> Bandwidth {
        Bandwidth::new(defaults::DRAM_BANDWIDTH)
    }

    fn default_request_bytes() -> u64 {
        defaults::REQUEST_BYTES
    }

    /// Banks in each vault.
    pub const fn banks_per_vault(&self) -> u32 {
        if self.bank_size == 0 {
            0
        } else {
            (self.vault_size / self.bank_size) as u32
        }
    }

    /// Rows in each bank.
    pub const fn rows_per_bank(&self) -> u32 {
        if self.row_size == 0 {
            0
        } else {
            (self.bank_size / self.row_size) as u32
        }
    }

    /// Banks in the whole stack.
    pub const fn total_banks(&self) -> u32 {
        self.vaults * self.banks_per_vault()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        power_of_two("dram.vaults", u64::from(self.vaults))?;
        power_of_two("dram.vault_size", self.vault_size)?;
        power_of_two("dram.bank_size", self.bank_size)?;
        power_of_two("dram.row_size", self.row_size)?;
        power_of_two("dram.request_bytes", self.request_bytes)?;
        if self.bank_size > self.vault_size {
            return Err(ConfigError::Inconsistent {
                reason: "dram.bank_size exceeds dram.vault_size".to_owned(),
            });
        }
        if self.row_size > self.bank_size {
            return Err(ConfigError::Inconsistent {
                reason: "dram.row_size exceeds dram.bank_size".to_owned(),
            });
        }
        if u64::from(self.vaults) * u64::from(self.banks_per_vault()) > u64::from(u32::MAX) {
            return Err(ConfigError::Inconsistent {
                reason: "too many banks in the stack".to_owned(),
            });
        }
        non_zero("dram.speed.tck_ps", self.speed.tck_ps)?;
        usable_bandwidth("dram.bandwidth", self.bandwidth)
    }
}

impl Default for DramConfig {
    fn default() -> Self {
        Self {
            vaults: defaults::VAULTS,
            vault_size: defaults::VAULT_SIZE,
            bank_size: defaults::BANK_SIZE,
            row_size: defaults::ROW_SIZE,
            auto_precharge: false,
            refresh: false,
            bandwidth: Bandwidth::new(defaults::DRAM_BANDWIDTH),
            request_bytes: defaults::REQUEST_BYTES,
            speed: SpeedTable::default(),
        }
    }
}

/// Cache organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Controller model.
    #[serde(default)]
    pub model: CacheModel,

    /// Set count (power of two).
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: u64,

    /// Ways per set. Alloy always uses one.
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: u32,

    /// Sub-block size in bytes.
    #[serde(default = "CacheConfig::default_block_size")]
    pub block_size: u64,

    /// Page size in bytes.
    #[serde(default = "CacheConfig::default_page_size")]
    pub page_size: u64,

    /// Victim selection for page sets.
    #[serde(default)]
    pub replacement: Replacement,

    /// Footprint history table entries.
    #[serde(default = "CacheConfig::default_footprint_entries")]
    pub footprint_entries: usize,

    /// Alloy tag-and-data units per DRAM row.
    #[serde(default = "CacheConfig::default_tags_per_row")]
    pub tags_per_row: u64,

    /// Compact virtual pages onto frames in first-touch order.
    #[serde(default)]
    pub translate_pages: bool,
}

impl CacheConfig {
    fn default_sets() -> u64 {
        defaults::SETS
    }

    fn default_associativity() -> u32 {
        defaults::ASSOCIATIVITY
    }

    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    fn default_page_size() -> u64 {
        defaults::PAGE_SIZE
    }

    fn default_footprint_entries() -> usize {
        defaults::FOOTPRINT_ENTRIES
    }

    fn default_tags_per_row() -> u64 {
        defaults::TAGS_PER_ROW
    }

    /// Sub-blocks per page.
    pub const fn blocks_per_page(&self) -> u64 {
        if self.block_size == 0 {
            0
        } else {
            self.page_size / self.block_size
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        power_of_two("cache.sets", self.sets)?;
        non_zero("cache.associativity", u64::from(self.associativity))?;
        power_of_two("cache.block_size", self.block_size)?;
        power_of_two("cache.page_size", self.page_size)?;
        non_zero("cache.footprint_entries", self.footprint_entries as u64)?;
        non_zero("cache.tags_per_row", self.tags_per_row)?;
        if self.page_size < self.block_size {
            return Err(ConfigError::Inconsistent {
                reason: "cache.page_size is smaller than cache.block_size".to_owned(),
            });
        }
        if self.blocks_per_page() > u64::from(u64::BITS) {
            return Err(ConfigError::Inconsistent {
                reason: format!(
                    "a page holds {} blocks; at most {} are tracked",
                    self.blocks_per_page(),
                    u64::BITS
                ),
            });
        }
        if self.associativity > u32::from(u8::MAX) {
            return Err(ConfigError::Inconsistent {
                reason: "cache.associativity exceeds the usage counter range".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            model: CacheModel::default(),
            sets: defaults::SETS,
            associativity: defaults::ASSOCIATIVITY,
            block_size: defaults::BLOCK_SIZE,
            page_size: defaults::PAGE_SIZE,
            replacement: Replacement::default(),
            footprint_entries: defaults::FOOTPRINT_ENTRIES,
            tags_per_row: defaults::TAGS_PER_ROW,
            translate_pages: false,
        }
    }
}

/// Segment-swap model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Bytes of fast memory partitioned into segments.
    #[serde(default = "SegmentConfig::default_fast_memory")]
    pub fast_memory: u64,

    /// Segment size in bytes.
    #[serde(default = "SegmentConfig::default_segment_size")]
    pub segment_size: u64,

    /// Candidate slots competing for each segment.
    #[serde(default = "SegmentConfig::default_slots")]
    pub slots: u32,

    /// Accesses between swap decisions.
    #[serde(default = "SegmentConfig::default_swap_count")]
    pub swap_count: u32,
}

impl SegmentConfig {
    fn default_fast_memory() -> u64 {
        defaults::FAST_MEMORY
    }

    fn default_segment_size() -> u64 {
        defaults::SEGMENT_SIZE
    }

    fn default_slots() -> u32 {
        defaults::SLOTS
    }

    fn default_swap_count() -> u32 {
        defaults::SWAP_COUNT
    }

    /// Number of segment entries.
    pub const fn entries(&self) -> u64 {
        if self.segment_size == 0 {
            0
        } else {
            self.fast_memory / self.segment_size
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        power_of_two("segment.segment_size", self.segment_size)?;
        non_zero("segment.fast_memory", self.fast_memory)?;
        non_zero("segment.slots", u64::from(self.slots))?;
        non_zero("segment.swap_count", u64::from(self.swap_count))?;
        if self.fast_memory % self.segment_size != 0 {
            return Err(ConfigError::Inconsistent {
                reason: "segment.fast_memory is not a multiple of segment.segment_size".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            fast_memory: defaults::FAST_MEMORY,
            segment_size: defaults::SEGMENT_SIZE,
            slots: defaults::SLOTS,
            swap_count: defaults::SWAP_COUNT,
        }
    }
}

/// Off-chip main memory behind the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Access latency in nanoseconds.
    #[serde(default = "MemoryConfig::default_latency_ns")]
    pub latency_ns: u64,

    /// Off-chip transfer rate.
    #[serde(default = "MemoryConfig::default_bandwidth")]
    pub bandwidth: Bandwidth,

    /// Stacked DRAM sits on the processor die; when false `bus_delay_ns` is added.
    #[serde(default = "MemoryConfig::default_on_top")]
    pub on_top: bool,

    /// Off-package bus delay in nanoseconds.
    #[serde(default)]
    pub bus_delay_ns: u64,

    /// Fixed queuing latency per request in nanoseconds.
    #[serde(default)]
    pub queue_latency_ns: u64,
}

impl MemoryConfig {
    fn default_latency_ns() -> u64 {
        defaults::MEMORY_LATENCY_NS
    }

    fn default_bandwidth() -> Bandwidth {
        Bandwidth::new(defaults::MEMORY_BANDWIDTH)
    }

    fn default_on_top() -> bool {
        true
    }

    /// Off-chip access latency.
    pub const fn latency(&self) -> SimTime {
        SimTime::from_ns(self.latency_ns)
    }

    /// Fixed queuing latency added to every request.
    pub const fn queue_latency(&self) -> SimTime {
        SimTime::from_ns(self.queue_latency_ns)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        usable_bandwidth("memory.bandwidth", self.bandwidth)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            latency_ns: defaults::MEMORY_LATENCY_NS,
            bandwidth: Bandwidth::new(defaults::MEMORY_BANDWIDTH),
            on_top: true,
            bus_delay_ns: 0,
            queue_latency_ns: 0,
        }
    }
}

/// Thermal remapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemapConfig {
    /// Remapping layer active.
    #[serde(default = "RemapConfig::default_enabled")]
    pub enabled: bool,

    /// Policy id (0-3).
    #[serde(default)]
    pub policy: RemapPolicy,

    /// Allow targets (and vault swaps) across vaults.
    #[serde(default)]
    pub inter_vault: bool,

    /// Temperature at which an entity is relieved.
    #[serde(default = "RemapConfig::default_high_threshold")]
    pub high_threshold: f64,

    /// Temperature at which an entity without relief is disabled.
    #[serde(default = "RemapConfig::default_dangerous_threshold")]
    pub dangerous_threshold: f64,

    /// Temperature below which an entity may receive data or recover.
    #[serde(default = "RemapConfig::default_remap_threshold")]
    pub remap_threshold: f64,

    /// Temperature of every bank before the first reading.
    #[serde(default = "RemapConfig::default_initial_temperature")]
    pub initial_temperature: f64,

    /// Hot-row tracker capacity, and rows migrated per hybrid remap.
    #[serde(default = "RemapConfig::default_hot_rows")]
    pub hot_rows: usize,

    /// Epochs an entity stays frozen after a remap.
    #[serde(default = "RemapConfig::default_cooldown_epochs")]
    pub cooldown_epochs: u64,

    /// Remap table lookup cost per request in picoseconds.
    #[serde(default = "RemapConfig::default_lookup_latency_ps")]
    pub lookup_latency_ps: u64,

    /// Lookup cost with inter-vault remapping, in picoseconds.
    #[serde(default = "RemapConfig::default_global_lookup_latency_ps")]
    pub global_lookup_latency_ps: u64,
}

impl RemapConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_high_threshold() -> f64 {
        defaults::HIGH_THRESHOLD
    }

    fn default_dangerous_threshold() -> f64 {
        defaults::DANGEROUS_THRESHOLD
    }

    fn default_remap_threshold() -> f64 {
        defaults::REMAP_THRESHOLD
    }

    fn default_initial_temperature() -> f64 {
        defaults::INITIAL_TEMPERATURE
    }

    fn default_hot_rows() -> usize {
        defaults::HOT_ROWS
    }

    fn default_cooldown_epochs() -> u64 {
        defaults::COOLDOWN_EPOCHS
    }

    fn default_lookup_latency_ps() -> u64 {
        defaults::LOOKUP_LATENCY_PS
    }

    fn default_global_lookup_latency_ps() -> u64 {
        defaults::GLOBAL_LOOKUP_LATENCY_PS
    }

    /// Per-request lookup cost for the configured scope.
    pub const fn lookup_latency(&self) -> SimTime {
        if !self.enabled {
            SimTime::ZERO
        } else if self.inter_vault {
            SimTime::from_ps(self.global_lookup_latency_ps)
        } else {
            SimTime::from_ps(self.lookup_latency_ps)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            self.high_threshold,
            self.dangerous_threshold,
            self.remap_threshold,
            self.initial_temperature,
        ];
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(ConfigError::Inconsistent {
                reason: "remap temperatures must be finite".to_owned(),
            });
        }
        if self.remap_threshold > self.high_threshold
            || self.high_threshold > self.dangerous_threshold
        {
            return Err(ConfigError::Inconsistent {
                reason: format!(
                    "thresholds must satisfy remap <= high <= dangerous (got {} / {} / {})",
                    self.remap_threshold, self.high_threshold, self.dangerous_threshold
                ),
            });
        }
        non_zero("remap.hot_rows", self.hot_rows as u64)
    }
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: RemapPolicy::default(),
            inter_vault: false,
            high_threshold: defaults::HIGH_THRESHOLD,
            dangerous_threshold: defaults::DANGEROUS_THRESHOLD,
            remap_threshold: defaults::REMAP_THRESHOLD,
            initial_temperature: defaults::INITIAL_TEMPERATURE,
            hot_rows: defaults::HOT_ROWS,
            cooldown_epochs: defaults::COOLDOWN_EPOCHS,
            lookup_latency_ps: defaults::LOOKUP_LATENCY_PS,
            global_lookup_latency_ps: defaults::GLOBAL_LOOKUP_LATENCY_PS,
        }
    }
}
