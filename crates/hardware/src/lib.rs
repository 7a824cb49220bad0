//! Five-stage pipeline simulator library.
//!
//! This crate implements a cycle-accurate, in-order, single-issue pipeline
//! (Fetch, Decode, Execute, Memory Access, Write-back) with the following:
//! 1. **Core:** Pipeline engine, stage slots, hazard detection with forwarding and load-use stalls.
//! 2. **Architecture:** Register file with scheduled writes and a byte-addressable data memory.
//! 3. **ISA:** Text decoding for a small teaching instruction set (ALU, immediate, load, store, nop).
//! 4. **Simulation:** Program loading, per-cycle snapshots, and pluggable trace sinks.
//! 5. **Support:** Configuration and statistics collection.
//!
//! # Examples
//!
//! ```
//! use pipesim_core::{Config, EngineState, Simulator};
//!
//! let mut sim = Simulator::new(&Config::default()).unwrap();
//! sim.insert("ADD R1, R2, R3").unwrap();
//! sim.insert("SUB R4, R1, R5").unwrap();
//! assert_eq!(sim.run(100), EngineState::Drained);
//! assert_eq!(sim.cycle(), 6);
//! ```

/// Common types (errors, register identifiers).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Pipelined core (engine, stages, hazards, architectural state, ALU).
pub mod core;
/// Instruction set (opcodes, decoded form, text decoder).
pub mod isa;
/// Simulator facade, program loader, and trace sinks.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Engine lifecycle state returned by every cycle.
pub use crate::core::EngineState;
/// Top-level simulator; decodes text and drives the pipeline.
pub use crate::sim::Simulator;
