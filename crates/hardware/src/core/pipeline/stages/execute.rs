//! Instruction Execute (EX) Stage.
//!
//! This module implements the third stage of the instruction pipeline. It
//! resolves the Decode occupant's operands through the register file, with
//! any forwarded values installed first, and drives the ALU. Arithmetic
//! instructions produce their result here; loads and stores produce their
//! effective address. Under a load-use stall a bubble enters instead.

use tracing::debug;

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::hazards::HazardReport;
use crate::core::pipeline::latches::{InFlight, Stage, StageSlot};
use crate::core::pipeline::signals::OpBSrc;
use crate::core::units::alu::Alu;

/// Executes the execute stage of the pipeline.
///
/// # Arguments
///
/// * `engine` - Mutable reference to the pipeline engine
/// * `report` - Hazard decisions made on this cycle's starting occupancy
///
/// # Behavior
///
/// - Under a stall, inserts a bubble and leaves the Decode occupant in place
/// - Otherwise installs forwarded values, reads `rs1`/`rs2`, and computes
///   the ALU result or the effective address
pub fn execute_stage(engine: &mut PipelineEngine, report: &HazardReport) {
    if report.stall() {
        debug!("EX bubble (load-use stall)");
        engine.stats.stalls_data += 1;
        engine.stats.bubbles += 1;
        engine.slots[Stage::Execute.index()] = StageSlot::Bubble;
        return;
    }

    let incoming = engine.slots[Stage::Decode.index()].take();

    engine.slots[Stage::Execute.index()] = match incoming {
        StageSlot::Occupied(mut ex) => {
            for (reg, value) in report.forwards() {
                engine.regs.forward(reg, value);
                engine.stats.forwards += 1;
            }
            ex.rv1 = ex.inst.decoded.rs1.map_or(0, |r| engine.regs.read(r));
            ex.rv2 = ex.inst.decoded.rs2.map_or(0, |r| engine.regs.read(r));
            engine.regs.clear_forwarding();

            compute(&mut ex);
            debug!(
                seq = ex.inst.seq,
                rv1 = ex.rv1,
                rv2 = ex.rv2,
                result = ?ex.result,
                address = ?ex.address,
                "EX"
            );
            StageSlot::Occupied(ex)
        }
        other => other,
    };
}

/// Runs the ALU for one instruction and stores the value where it belongs.
fn compute(ex: &mut InFlight) {
    let b = match ex.ctrl.b_src {
        OpBSrc::Reg2 => ex.rv2,
        OpBSrc::Imm => ex.inst.decoded.imm.unwrap_or(0),
    };
    let value = Alu::execute(ex.ctrl.alu, ex.rv1, b);

    if ex.ctrl.mem_read || ex.ctrl.mem_write {
        ex.address = Some(value);
    } else if ex.ctrl.reg_write {
        ex.result = Some(value);
    }
}
