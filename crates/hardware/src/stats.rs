//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the pipeline simulator. It provides:
//! 1. **Cycle and CPI:** Total cycles, retired instructions, and derived metrics (CPI, IPC).
//! 2. **Instruction mix:** Retired counts by category (ALU, load, store, nop).
//! 3. **Hazards:** Data-hazard stall cycles, bubbles inserted, and operands forwarded.
//! 4. **Faults:** Instructions squashed by address faults.

use std::fmt;

use serde::Serialize;

use crate::isa::instruction::Opcode;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions that completed write-back.
    pub instructions_retired: u64,

    /// Count of register-register and immediate ALU instructions retired.
    pub inst_alu: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of no-ops retired.
    pub inst_nop: u64,

    /// Stall cycles due to data hazards (load-use).
    pub stalls_data: u64,
    /// Bubbles inserted into Execute.
    pub bubbles: u64,
    /// Operands delivered through the bypass network.
    pub forwards: u64,
    /// Instructions squashed by an out-of-range address.
    pub address_faults: u64,
}

impl SimStats {
    /// Records one retired instruction under its category.
    pub fn record_retire(&mut self, opcode: Opcode) {
        self.instructions_retired += 1;
        match opcode {
            Opcode::Nop => self.inst_nop += 1,
            Opcode::Load => self.inst_load += 1,
            Opcode::Store => self.inst_store += 1,
            Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Addi => {
                self.inst_alu += 1;
            }
        }
    }

    /// Cycles per retired instruction, or `None` before anything retires.
    pub fn cpi(&self) -> Option<f64> {
        (self.instructions_retired > 0)
            .then(|| self.cycles as f64 / self.instructions_retired as f64)
    }

    /// Retired instructions per cycle, or `None` before the first cycle.
    pub fn ipc(&self) -> Option<f64> {
        (self.cycles > 0).then(|| self.instructions_retired as f64 / self.cycles as f64)
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"));
        let pct = |n: u64| {
            if self.instructions_retired == 0 {
                0.0
            } else {
                (n as f64 / self.instructions_retired as f64) * 100.0
            }
        };

        writeln!(f, "==========================================================")?;
        writeln!(f, "PIPELINE SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_insts                {}", self.instructions_retired)?;
        writeln!(f, "sim_cpi                  {}", ratio(self.cpi()))?;
        writeln!(f, "sim_ipc                  {}", ratio(self.ipc()))?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "INSTRUCTION MIX")?;
        writeln!(f, "  op.alu                 {:<10} ({:.2}%)", self.inst_alu, pct(self.inst_alu))?;
        writeln!(f, "  op.load                {:<10} ({:.2}%)", self.inst_load, pct(self.inst_load))?;
        writeln!(f, "  op.store               {:<10} ({:.2}%)", self.inst_store, pct(self.inst_store))?;
        writeln!(f, "  op.nop                 {:<10} ({:.2}%)", self.inst_nop, pct(self.inst_nop))?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "HAZARDS")?;
        writeln!(f, "  stall.data             {}", self.stalls_data)?;
        writeln!(f, "  bubbles                {}", self.bubbles)?;
        writeln!(f, "  forwards               {}", self.forwards)?;
        write!(f, "  faults.address         {}", self.address_faults)
    }
}
