//! Execution units.
//!
//! This module contains the functional units used by the Execute stage.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;
