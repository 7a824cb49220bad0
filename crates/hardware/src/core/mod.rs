//! Core processor implementation.
//!
//! This module contains the pipelined core: the architectural state it
//! updates, the pipeline engine and its stages, and the execution units the
//! stages drive.

/// Architectural state (register file, data memory).
pub mod arch;

/// Instruction pipeline implementation (engine, stages, latches, hazards, signals).
pub mod pipeline;

/// Execution units (ALU).
pub mod units;

pub use self::pipeline::{EngineState, PipelineEngine};
