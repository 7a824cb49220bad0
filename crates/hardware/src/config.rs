//! Configuration system for the pipeline simulator.
//!
//! This module defines the structures used to parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline machine constants (register count, memory size, cycle budget).
//! 2. **Structures:** Hierarchical config for general, register-file, and memory settings.
//! 3. **Validation:** Range checks applied before an engine is built.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or built with `Config::default()`.
//! Every field is optional in JSON; missing fields take the values in the private `defaults` module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Number of general-purpose registers (`R0`..`R7`).
    pub const REGISTER_COUNT: usize = 8;

    /// Largest register file the decoder can address.
    pub const MAX_REGISTERS: usize = 256;

    /// Data memory size in bytes.
    pub const MEMORY_SIZE: usize = 256;

    /// Number of memory cells included in each snapshot.
    pub const WINDOW_LEN: usize = 16;

    /// Cycle budget used by `run` when the caller gives none.
    pub const MAX_CYCLES: u64 = 10_000;
}

/// Largest supported register count.
pub const MAX_REGISTERS: usize = defaults::MAX_REGISTERS;

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use pipesim_core::config::Config;
///
/// let config = Config::from_json(r#"{ "registers": { "count": 16 } }"#).unwrap();
/// assert_eq!(config.registers.count, 16);
/// assert!(config.registers.zero_register);
/// assert_eq!(config.memory.size, 256);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Register file configuration
    pub registers: RegisterConfig,
    /// Data memory configuration
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed JSON, or any validation error from
    /// [`Config::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every setting describes a machine the engine can build.
    ///
    /// # Errors
    ///
    /// Returns the first offending setting as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.registers.count;
        if count == 0 || count > defaults::MAX_REGISTERS {
            return Err(ConfigError::RegisterCount {
                count,
                max: defaults::MAX_REGISTERS,
            });
        }
        if self.memory.size == 0 {
            return Err(ConfigError::EmptyMemory);
        }
        if let Some(&index) = self.registers.initial.keys().find(|&&i| i >= count) {
            return Err(ConfigError::InitialRegister { index, count });
        }
        let size = self.memory.size;
        if let Some(&address) = self
            .memory
            .initial
            .keys()
            .find(|&&a| a >= size as u64)
        {
            return Err(ConfigError::InitialAddress { address, size });
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log every snapshot through `tracing` at debug level.
    #[serde(default)]
    pub trace_cycles: bool,

    /// Cycle budget for `run` before giving up on a program that does not drain.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_cycles: false,
            max_cycles: Self::default_max_cycles(),
        }
    }
}

/// Register file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Number of registers; names run from `R0` to `R{count-1}`.
    #[serde(default = "RegisterConfig::default_count")]
    pub count: usize,

    /// Hardwire `R0` to zero (reads 0, writes discarded, never a hazard).
    #[serde(default = "RegisterConfig::default_zero_register")]
    pub zero_register: bool,

    /// Initial register values keyed by index. Unlisted registers start at 0.
    #[serde(default)]
    pub initial: BTreeMap<usize, i64>,
}

impl RegisterConfig {
    fn default_count() -> usize {
        defaults::REGISTER_COUNT
    }

    fn default_zero_register() -> bool {
        true
    }
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
            zero_register: Self::default_zero_register(),
            initial: BTreeMap::new(),
        }
    }
}

/// Data memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Memory size in bytes. Valid addresses are `0..size`.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,

    /// First address shown in each snapshot's memory window.
    #[serde(default)]
    pub window_start: u64,

    /// Number of cells in each snapshot's memory window.
    #[serde(default = "MemoryConfig::default_window_len")]
    pub window_len: usize,

    /// Initial memory bytes keyed by address. Unlisted bytes start at 0.
    #[serde(default)]
    pub initial: BTreeMap<u64, u8>,
}

impl MemoryConfig {
    fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }

    fn default_window_len() -> usize {
        defaults::WINDOW_LEN
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            window_start: 0,
            window_len: Self::default_window_len(),
            initial: BTreeMap::new(),
        }
    }
}
