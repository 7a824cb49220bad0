//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline. It
//! receives the Memory Access occupant, schedules its register write for the
//! end-of-cycle commit, and retires it. An instruction squashed by an address
//! fault leaves no architectural trace and turns into a bubble here.

use tracing::debug;

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::{Stage, StageSlot};

/// Executes the writeback stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline engine
///
/// # Behavior
///
/// - Faulted instructions become a bubble with no register write
/// - Register-writing instructions schedule `rd <- result`
/// - A second write to the same register this cycle is a fatal `WriteConflict`
/// - Successfully written instructions are counted as retired this cycle
pub fn wb_stage(engine: &mut PipelineEngine) {
    let incoming = engine.slots[Stage::MemoryAccess.index()].take();

    engine.slots[Stage::WriteBack.index()] = match incoming {
        StageSlot::Occupied(wb) if wb.faulted => {
            debug!(seq = wb.inst.seq, "WB squashed faulted instruction");
            StageSlot::Bubble
        }
        StageSlot::Occupied(wb) => {
            let write = match (wb.ctrl.reg_write, wb.inst.dest(), wb.result) {
                (true, Some(rd), Some(value)) => {
                    debug!(seq = wb.inst.seq, %rd, value, "WB");
                    engine.regs.schedule_write(rd, value)
                }
                _ => {
                    debug!(seq = wb.inst.seq, "WB");
                    Ok(())
                }
            };

            match write {
                Ok(()) => {
                    engine.retired = Some(wb.inst.seq);
                    engine.stats.record_retire(wb.inst.opcode());
                }
                Err(error) => engine.raise(Stage::WriteBack, &wb.inst, error),
            }
            StageSlot::Occupied(wb)
        }
        other => other,
    };
}
