//! Statistics Snapshot Tests.

use thermdram_core::stats::PerfStats;
use thermdram_core::{AccessType, SimTime};

use crate::common::ConfigBuilder;

#[test]
fn test_empty_snapshot() {
    let stats = PerfStats::default();
    assert_eq!(stats.average_latency(), SimTime::ZERO);
    assert_eq!(stats.hit_rate(), 0.0);
    assert_eq!(stats.dram_total().reads, 0);
}

#[test]
fn test_derived_rates() {
    let mut model = ConfigBuilder::new().perf();
    for (at, addr) in [(0, 0), (100, 0), (200, 0), (300, 0x40)] {
        let _ = model.get_access_latency(SimTime::from_ns(at), 64, addr, AccessType::Read);
    }
    let stats = model.stats();
    // One page miss, one block miss, two hits.
    assert_eq!(stats.cache.misses, 2);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);

    let dram = stats.dram_total();
    assert_eq!(dram.reads, 6);
    assert_eq!(dram.writes, 2);
    assert_eq!(stats.dram.len(), 4);
    assert_eq!(stats.remap.temperatures.len(), 16);
}

#[test]
fn test_report_lists_every_section() {
    let mut model = ConfigBuilder::new().perf();
    let _ = model.get_access_latency(SimTime::ZERO, 64, 0, AccessType::Read);
    let report = model.stats().to_string();
    for section in ["STACKED DRAM CACHE STATISTICS", "CACHE", "DRAM", "REMAPPING"] {
        assert!(report.contains(section), "missing {section}");
    }
    assert!(report.contains("requests                 1"));
    assert!(report.contains("latency.total            102.000 ns"));
    assert!(!report.contains("segment.swaps"));
}

#[test]
fn test_serializes_to_json() {
    let model = ConfigBuilder::new().perf();
    let json = serde_json::to_value(model.stats()).unwrap();
    assert_eq!(json["accesses"], 0);
    assert_eq!(json["remap"]["epochs"], 0);
    assert!(json["cache"]["misses"].is_u64());
    assert_eq!(json["dram"].as_array().unwrap().len(), 4);
}
