//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization, and validation.

use pipesim_core::common::error::ConfigError;
use pipesim_core::config::*;
use pretty_assertions::assert_eq;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace_cycles);
    assert_eq!(config.general.max_cycles, 10_000);
    assert_eq!(config.registers.count, 8);
    assert!(config.registers.zero_register);
    assert!(config.registers.initial.is_empty());
    assert_eq!(config.memory.size, 256);
    assert_eq!(config.memory.window_start, 0);
    assert_eq!(config.memory.window_len, 16);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_is_default() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn test_partial_json_keeps_other_defaults() {
    let config = Config::from_json(
        r#"{
            "registers": { "zero_register": false, "initial": { "2": 10, "3": -4 } },
            "memory": { "size": 64, "initial": { "8": 255 } }
        }"#,
    )
    .unwrap();

    assert_eq!(config.registers.count, 8);
    assert!(!config.registers.zero_register);
    assert_eq!(config.registers.initial.get(&2), Some(&10));
    assert_eq!(config.registers.initial.get(&3), Some(&-4));
    assert_eq!(config.memory.size, 64);
    assert_eq!(config.memory.window_len, 16);
    assert_eq!(config.memory.initial.get(&8), Some(&255));
    assert_eq!(config.general, GeneralConfig::default());
}

#[test]
fn test_defaults_round_trip_through_json() {
    let text = serde_json::to_string(&Config::default()).unwrap();
    assert_eq!(Config::from_json(&text).unwrap(), Config::default());
}

#[test]
fn test_malformed_json_is_rejected() {
    assert!(matches!(
        Config::from_json("{ registers: 8 }"),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{ "registers": { "count": "eight" } }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_register_count_bounds() {
    let mut config = Config::default();
    config.registers.count = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::RegisterCount { count: 0, max: 256 })
    ));

    config.registers.count = 257;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::RegisterCount { count: 257, .. })
    ));

    config.registers.count = MAX_REGISTERS;
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_memory_is_rejected() {
    let mut config = Config::default();
    config.memory.size = 0;
    assert!(matches!(config.validate(), Err(ConfigError::EmptyMemory)));
}

#[test]
fn test_initial_entries_must_be_in_range() {
    let mut config = Config::default();
    let _ = config.registers.initial.insert(8, 1);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InitialRegister { index: 8, count: 8 })
    ));

    let mut config = Config::default();
    let _ = config.memory.initial.insert(256, 1);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InitialAddress {
            address: 256,
            size: 256
        })
    ));
}
