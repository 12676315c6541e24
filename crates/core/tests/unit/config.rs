//! # Configuration Tests
//!
//! Geometry validation, layered configuration, and JSON deserialization.

use cachesim_core::common::ConfigError;
use cachesim_core::common::addr::{Address, decode};
use cachesim_core::config::{CacheConfig, MAX_LINES, SimConfig};
use cachesim_core::CacheGeometry;
use rstest::rstest;

fn full(s: u32, e: usize, b: u32) -> CacheConfig {
    CacheConfig {
        set_bits: Some(s),
        block_bits: Some(b),
        ways: Some(e),
    }
}

#[test]
fn test_geometry_derived_sizes() {
    let g = CacheGeometry::new(5, 6, 4).unwrap();
    assert_eq!(g.num_sets(), 32);
    assert_eq!(g.block_bytes(), 64);
    assert_eq!(g.num_lines(), 128);
    assert_eq!(g.ways(), 4);
}

#[test]
fn test_geometry_accepts_zero_bit_fields() {
    let g = CacheGeometry::new(0, 0, 1).unwrap();
    assert_eq!(g.num_sets(), 1);
    assert_eq!(g.block_bytes(), 1);
}

#[test]
fn test_geometry_rejects_zero_ways() {
    assert!(matches!(
        CacheGeometry::new(1, 1, 0),
        Err(ConfigError::NonPositive { name: "E", .. })
    ));
}

#[test]
fn test_geometry_rejects_overwide_address() {
    assert!(matches!(
        CacheGeometry::new(20, 45, 1),
        Err(ConfigError::TooWide { set_bits: 20, block_bits: 45 })
    ));
}

#[rstest]
#[case(33, 1)]
#[case(28, 2)]
#[case(0, MAX_LINES + 1)]
fn test_geometry_rejects_oversized_store(#[case] s: u32, #[case] e: usize) {
    assert!(matches!(
        CacheGeometry::new(s, 4, e),
        Err(ConfigError::TooLarge { .. })
    ));
}

#[test]
fn test_geometry_decode_matches_free_function() {
    let g = CacheGeometry::new(3, 5, 2).unwrap();
    let addr = 0xdead_beef_u64;
    let fields = g.decode(Address::new(addr));
    assert_eq!(decode(addr, 3, 5), (fields.tag, fields.set_index));
    assert_eq!(fields.set_index, ((addr >> 5) & 0b111) as usize);
    assert_eq!(fields.tag, addr >> 8);
}

#[rstest]
#[case(CacheConfig { set_bits: None, ..full(1, 1, 1) }, "s")]
#[case(CacheConfig { ways: None, ..full(1, 1, 1) }, "E")]
#[case(CacheConfig { block_bits: None, ..full(1, 1, 1) }, "b")]
fn test_validate_reports_missing(#[case] config: CacheConfig, #[case] expected: &str) {
    match config.validate() {
        Err(ConfigError::Missing(name)) => assert_eq!(name, expected),
        other => panic!("expected Missing({expected}), got {other:?}"),
    }
}

#[rstest]
#[case(full(0, 1, 1), "s")]
#[case(full(1, 0, 1), "E")]
#[case(full(1, 1, 0), "b")]
fn test_validate_reports_non_positive(#[case] config: CacheConfig, #[case] expected: &str) {
    match config.validate() {
        Err(ConfigError::NonPositive { name, value: 0 }) => assert_eq!(name, expected),
        other => panic!("expected NonPositive({expected}), got {other:?}"),
    }
}

#[test]
fn test_merge_prefers_overrides() {
    let base = full(4, 1, 4);
    let flags = CacheConfig {
        ways: Some(8),
        ..CacheConfig::default()
    };
    assert_eq!(base.merge(&flags), full(4, 8, 4));
    assert_eq!(CacheConfig::default().merge(&base), base);
}

#[test]
fn test_sim_config_defaults() {
    let config = SimConfig::default();
    assert_eq!(config.cache, CacheConfig::default());
    assert!(config.trace.is_none());
    assert!(!config.verbose);
    assert_eq!(config.results_path.to_str(), Some(".cachesim_results"));
}

#[test]
fn test_json_long_field_names() {
    let config = SimConfig::from_json(
        r#"{ "cache": { "set_bits": 2, "ways": 4, "block_bits": 3 }, "results_path": "out.txt" }"#,
    )
    .unwrap();
    assert_eq!(config.cache, full(2, 4, 3));
    assert_eq!(config.results_path.to_str(), Some("out.txt"));
}

#[test]
fn test_json_rejects_unknown_fields() {
    let err = SimConfig::from_json(r#"{ "cache": { "s": 1, "assoc": 2 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    std::fs::write(&path, r#"{ "cache": { "s": 4, "E": 1, "b": 4 }, "verbose": true }"#).unwrap();

    let config = SimConfig::from_file(&path).unwrap();
    assert!(config.verbose);
    assert_eq!(config.cache.validate().unwrap().num_sets(), 16);
}

#[test]
fn test_config_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = SimConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}
