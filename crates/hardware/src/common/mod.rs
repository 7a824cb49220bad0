//! Common types shared throughout the simulator.
//!
//! This module provides the fundamental building blocks used by every other
//! component. It includes:
//! 1. **Register Identifiers:** A strong type for register indices.
//! 2. **Error Handling:** Decode, simulation, load and configuration errors.

/// Error types for decoding, simulation, program loading and configuration.
pub mod error;

/// Register identifier type.
pub mod reg;

pub use error::{ConfigError, DecodeError, LoadError, SimError};
pub use reg::RegId;
