//! Instruction pipeline implementation.
//!
//! This module contains the implementation of the five-stage instruction pipeline.
//! It includes the following components:
//! 1. **Engine:** Owns the machine state and advances it one cycle at a time.
//! 2. **Hazards:** Detection and resolution of read-after-write data hazards.
//! 3. **Latches:** Stage slots and the per-instruction state they carry.
//! 4. **Signals:** Control signals generated during instruction decoding.
//! 5. **Stages:** Implementation of Fetch, Decode, Execute, Memory, and Writeback stages.

/// Cycle-stepped pipeline engine.
pub mod engine;

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Stage slots and in-flight instruction state.
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

pub use engine::{EngineState, FaultRecord, PipelineEngine};
pub use hazards::{HazardRecord, HazardReport, HazardUnit, Resolution};
pub use latches::{InFlight, STAGE_COUNT, Stage, StageSlot};
