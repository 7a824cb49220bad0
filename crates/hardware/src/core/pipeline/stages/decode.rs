//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage of the instruction pipeline. The
//! text was already validated when the instruction was inserted, so decoding
//! here only derives the control signals that steer the later stages.

use tracing::debug;

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::{Stage, StageSlot};
use crate::core::pipeline::signals::ControlSignals;

/// Executes the instruction decode stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline engine
/// * `stall` - `true` when the hazard unit holds the current occupant
pub fn decode_stage(engine: &mut PipelineEngine, stall: bool) {
    if stall {
        engine.slots[Stage::Decode.index()].stall();
        return;
    }

    let incoming = engine.slots[Stage::Fetch.index()].take();
    engine.slots[Stage::Decode.index()] = match incoming {
        StageSlot::Occupied(mut id) => {
            id.ctrl = ControlSignals::for_opcode(id.inst.opcode());
            debug!(seq = id.inst.seq, inst = %id.inst.decoded, "ID");
            StageSlot::Occupied(id)
        }
        other => other,
    };
}
