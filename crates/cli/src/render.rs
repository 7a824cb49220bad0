//! Text panels for the terminal driver.
//!
//! Renders a snapshot as a cycle header, the five stage boxes, the hazard and
//! fault lines, the register file, and the memory window.

use std::fmt::Write;

use pipesim_core::core::pipeline::hazards::{HazardRecord, Resolution};
use pipesim_core::sim::Snapshot;

const RULE: &str = "────────────────────────────────────────────────────────";

/// Renders one snapshot as a multi-line panel.
pub fn snapshot(snap: &Snapshot) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_snapshot(&mut out, snap);
    out
}

fn write_snapshot(out: &mut String, snap: &Snapshot) -> std::fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "cycle {:<6} state {:?}   queued {}",
        snap.cycle, snap.state, snap.queued
    )?;
    writeln!(out, "{RULE}")?;

    for view in &snap.stages {
        writeln!(out, "  {:<14} {}", view.stage.name(), view.occupant)?;
    }

    for hazard in &snap.hazards {
        writeln!(out, "  hazard   {}", hazard_line(hazard))?;
    }
    if let Some(fault) = &snap.fault {
        writeln!(
            out,
            "  fault    #{} {} in {}: {}",
            fault.seq, fault.instruction, fault.stage, fault.error
        )?;
    }
    if let Some(seq) = snap.retired {
        writeln!(out, "  retired  #{seq}")?;
    }

    write!(out, "  regs    ")?;
    for (i, value) in snap.registers.iter().enumerate() {
        if i > 0 && i % 8 == 0 {
            write!(out, "\n          ")?;
        }
        write!(out, " R{i}={value}")?;
    }
    writeln!(out)?;

    if let (Some(first), Some(last)) = (snap.memory.first(), snap.memory.last()) {
        write!(out, "  mem[{}..={}]", first.address, last.address)?;
        for cell in &snap.memory {
            write!(out, " {:02x}", cell.value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One hazard as `#2 <- #1 R1 (Execute): forward 30`.
fn hazard_line(h: &HazardRecord) -> String {
    let action = match h.resolution {
        Resolution::Forward { value } => format!("forward {value}"),
        Resolution::Stall => "stall".to_string(),
    };
    format!(
        "#{} <- #{} {} ({}): {action}",
        h.consumer_seq, h.producer_seq, h.reg, h.producer
    )
}
