//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage of the instruction pipeline.
//! It performs the single byte load or store of the instruction arriving
//! from Execute. Loads observe memory as it was at the start of the stage;
//! stores are scheduled and land when the engine commits at the end of the
//! cycle. Out-of-range addresses fault the instruction, not the engine.

use tracing::debug;

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::{InFlight, Stage, StageSlot};

/// Executes the memory stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline engine
///
/// # Behavior
///
/// - Loads read one byte and zero-extend it into the result
/// - Stores schedule the low byte of the data operand
/// - Address faults mark the instruction faulted and are reported for this cycle
pub fn mem_stage(engine: &mut PipelineEngine) {
    let incoming = engine.slots[Stage::Execute.index()].take();

    engine.slots[Stage::MemoryAccess.index()] = match incoming {
        StageSlot::Occupied(mut mem) => {
            access(engine, &mut mem);
            StageSlot::Occupied(mem)
        }
        other => other,
    };
}

/// Performs the memory operation of one instruction, if it has any.
fn access(engine: &mut PipelineEngine, mem: &mut InFlight) {
    let Some(address) = mem.address else {
        return;
    };

    let outcome = if mem.ctrl.mem_read {
        engine.memory.read(address).map(|byte| {
            debug!(seq = mem.inst.seq, address, byte, "MEM load");
            mem.result = Some(i64::from(byte));
        })
    } else if mem.ctrl.mem_write {
        let byte = (mem.rv2 & 0xFF) as u8;
        debug!(seq = mem.inst.seq, address, byte, "MEM store");
        engine.memory.schedule_write(address, byte)
    } else {
        Ok(())
    };

    if let Err(error) = outcome {
        mem.faulted = true;
        engine.raise(Stage::MemoryAccess, &mem.inst, error);
    }
}
