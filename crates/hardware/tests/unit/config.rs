//! Configuration Tests.
//!
//! Verifies defaults, JSON parsing (including policy ids and aliases) and the
//! validation rules that reject geometry the address arithmetic cannot handle.

use rstest::rstest;
use thermdram_core::SimTime;
use thermdram_core::common::error::ConfigError;
use thermdram_core::config::*;

use crate::common::ConfigBuilder;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.enabled);
    assert_eq!(config.application_cores, u32::MAX);
    assert_eq!(config.dram.vaults, 32);
    assert_eq!(config.dram.banks_per_vault(), 8);
    assert_eq!(config.dram.rows_per_bank(), 2048);
    assert_eq!(config.dram.total_banks(), 256);
    assert_eq!(config.cache.model, CacheModel::Unison);
    assert_eq!(config.cache.blocks_per_page(), 16);
    assert_eq!(config.segment.entries(), 4096);
    assert_eq!(config.remap.policy, RemapPolicy::Swap);
    assert!(!config.dram.refresh);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_document_yields_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.dram.vaults, Config::default().dram.vaults);
    assert_eq!(config.cache.sets, Config::default().cache.sets);
    assert_eq!(config.remap.high_threshold, 85.0);
}

#[test]
fn test_partial_document_keeps_other_defaults() {
    let json = r#"{
        "cache": { "model": "Alloy", "replacement": "lru" },
        "remap": { "policy": 3, "inter_vault": true },
        "memory": { "on_top": false, "bus_delay_ns": 5 }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.cache.model, CacheModel::Alloy);
    assert_eq!(config.cache.replacement, Replacement::Lru);
    assert_eq!(config.cache.sets, 65536);
    assert_eq!(config.remap.policy, RemapPolicy::Hybrid);
    assert!(config.remap.inter_vault);
    assert!(!config.memory.on_top);
    assert_eq!(config.memory.bus_delay_ns, 5);
    assert_eq!(config.memory.latency_ns, 45);
}

#[rstest]
#[case(0, RemapPolicy::Disable)]
#[case(1, RemapPolicy::Swap)]
#[case(2, RemapPolicy::VaultDisable)]
#[case(3, RemapPolicy::Hybrid)]
fn test_policy_ids(#[case] id: u8, #[case] policy: RemapPolicy) {
    let json = format!(r#"{{ "remap": {{ "policy": {id} }} }}"#);
    assert_eq!(Config::from_json(&json).unwrap().remap.policy, policy);
    assert_eq!(serde_json::to_string(&policy).unwrap(), id.to_string());
}

#[test]
fn test_unknown_policy_id_is_a_parse_error() {
    let err = Config::from_json(r#"{ "remap": { "policy": 4 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("unknown remap policy id 4"));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    assert!(matches!(
        Config::from_json("{ \"dram\": "),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_serialized_config_parses_back() {
    let original = ConfigBuilder::new()
        .model(CacheModel::Constant)
        .policy(RemapPolicy::Hybrid)
        .build();
    let json = serde_json::to_string(&original).unwrap();
    let parsed = Config::from_json(&json).unwrap();
    assert_eq!(parsed.cache.model, CacheModel::Constant);
    assert_eq!(parsed.remap.policy, RemapPolicy::Hybrid);
    assert_eq!(parsed.dram.vault_size, original.dram.vault_size);
    assert_eq!(parsed.dram.speed, original.dram.speed);
}

#[test]
fn test_lookup_latency_follows_scope() {
    let mut remap = RemapConfig::default();
    assert_eq!(remap.lookup_latency(), SimTime::from_ps(10));
    remap.inter_vault = true;
    assert_eq!(remap.lookup_latency(), SimTime::from_ps(200));
    remap.enabled = false;
    assert_eq!(remap.lookup_latency(), SimTime::ZERO);
}

#[test]
fn test_memory_fixed_costs() {
    let memory = MemoryConfig {
        queue_latency_ns: 3,
        ..MemoryConfig::default()
    };
    assert_eq!(memory.latency(), SimTime::from_ns(45));
    assert_eq!(memory.queue_latency(), SimTime::from_ns(3));
}

// ══════════════════════════════════════════════════════════
// Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::vaults_not_power_of_two(|c: &mut Config| c.dram.vaults = 3, "dram.vaults")]
#[case::zero_row_size(|c: &mut Config| c.dram.row_size = 0, "dram.row_size")]
#[case::bank_larger_than_vault(|c: &mut Config| c.dram.bank_size = 4 * 1024 * 1024, "exceeds dram.vault_size")]
#[case::row_larger_than_bank(|c: &mut Config| c.dram.row_size = 512 * 1024, "exceeds dram.bank_size")]
#[case::zero_dram_bandwidth(|c: &mut Config| c.dram.bandwidth = thermdram_core::common::Bandwidth::new(0.0), "dram.bandwidth")]
#[case::zero_sets(|c: &mut Config| c.cache.sets = 0, "cache.sets")]
#[case::sets_not_power_of_two(|c: &mut Config| c.cache.sets = 300, "cache.sets")]
#[case::zero_ways(|c: &mut Config| c.cache.associativity = 0, "cache.associativity")]
#[case::too_many_ways(|c: &mut Config| c.cache.associativity = 256, "usage counter")]
#[case::page_smaller_than_block(|c: &mut Config| c.cache.block_size = 2048, "smaller than")]
#[case::too_many_blocks_per_page(|c: &mut Config| c.cache.block_size = 8, "at most 64")]
#[case::nan_memory_bandwidth(|c: &mut Config| c.memory.bandwidth = thermdram_core::common::Bandwidth::new(f64::NAN), "memory.bandwidth")]
#[case::high_below_remap(|c: &mut Config| c.remap.high_threshold = 70.0, "remap <= high <= dangerous")]
#[case::dangerous_below_high(|c: &mut Config| c.remap.dangerous_threshold = 89.0, "remap <= high <= dangerous")]
#[case::infinite_threshold(|c: &mut Config| c.remap.dangerous_threshold = f64::INFINITY, "finite")]
#[case::zero_hot_rows(|c: &mut Config| c.remap.hot_rows = 0, "remap.hot_rows")]
fn test_validation_rejects(#[case] mutate: fn(&mut Config), #[case] expected: &str) {
    let mut config = ConfigBuilder::new().build();
    mutate(&mut config);
    let err = config.validate().unwrap_err();
    assert!(
        err.to_string().contains(expected),
        "`{err}` does not mention `{expected}`"
    );
}

#[test]
fn test_segment_rules_apply_only_to_constant_model() {
    let mut config = ConfigBuilder::new().model(CacheModel::Unison).build();
    config.segment.segment_size = 3;
    assert!(config.validate().is_ok());

    config.cache.model = CacheModel::Constant;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotPowerOfTwo {
            field: "segment.segment_size",
            value: 3
        })
    ));

    config.segment.segment_size = 64 * 1024;
    config.segment.fast_memory = 100 * 1024;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Inconsistent { .. })
    ));
}

#[test]
fn test_equal_thresholds_are_accepted() {
    let config = ConfigBuilder::new().thresholds(90.0, 90.0, 90.0).build();
    assert!(config.validate().is_ok());
}
