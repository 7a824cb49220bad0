//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline. It
//! takes the oldest instruction from the fetch queue, in insertion order.
//! While Decode is stalled the current occupant is held and nothing new is
//! fetched.

use tracing::debug;

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::{InFlight, Stage, StageSlot};

/// Executes the instruction fetch stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline engine
/// * `stall` - `true` when the hazard unit holds Decode this cycle
pub fn fetch_stage(engine: &mut PipelineEngine, stall: bool) {
    if stall {
        engine.slots[Stage::Fetch.index()].stall();
        return;
    }

    engine.slots[Stage::Fetch.index()] = match engine.queue.pop_front() {
        Some(inst) => {
            debug!(seq = inst.seq, inst = %inst.decoded, "IF");
            StageSlot::Occupied(InFlight::fetched(inst))
        }
        None => StageSlot::Empty,
    };
}
