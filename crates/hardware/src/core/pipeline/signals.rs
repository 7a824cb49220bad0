//! Pipeline control signals.
//!
//! This module defines the signals generated in Decode that steer an
//! instruction through the later stages. It performs:
//! 1. **Operation Classification:** Selects the ALU operation.
//! 2. **Operand Selection:** Chooses between the second register and the immediate.
//! 3. **Memory Control:** Flags loads and stores for the Memory Access stage.
//! 4. **Writeback Control:** Flags instructions that write a register.

use serde::Serialize;

use crate::isa::instruction::Opcode;

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AluOp {
    /// Integer addition (also used for address generation).
    #[default]
    Add,

    /// Integer subtraction.
    Sub,

    /// Bitwise AND.
    And,

    /// Bitwise OR.
    Or,

    /// Bitwise XOR.
    Xor,
}

/// Source for the ALU's second operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum OpBSrc {
    /// Immediate operand (or zero when the instruction has none).
    #[default]
    Imm,
    /// Second source register.
    Reg2,
}

/// Control signals for one in-flight instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ControlSignals {
    /// Writes `rd` in WriteBack.
    pub reg_write: bool,
    /// Reads data memory in Memory Access.
    pub mem_read: bool,
    /// Writes data memory in Memory Access.
    pub mem_write: bool,
    /// Operation performed by the ALU in Execute.
    pub alu: AluOp,
    /// Second ALU operand source.
    pub b_src: OpBSrc,
}

impl ControlSignals {
    /// Generates the control signals for an opcode.
    pub const fn for_opcode(opcode: Opcode) -> Self {
        match opcode {
            Opcode::Nop => Self {
                reg_write: false,
                mem_read: false,
                mem_write: false,
                alu: AluOp::Add,
                b_src: OpBSrc::Imm,
            },
            Opcode::Add => Self::register_op(AluOp::Add),
            Opcode::Sub => Self::register_op(AluOp::Sub),
            Opcode::And => Self::register_op(AluOp::And),
            Opcode::Or => Self::register_op(AluOp::Or),
            Opcode::Xor => Self::register_op(AluOp::Xor),
            Opcode::Addi => Self {
                reg_write: true,
                mem_read: false,
                mem_write: false,
                alu: AluOp::Add,
                b_src: OpBSrc::Imm,
            },
            Opcode::Load => Self {
                reg_write: true,
                mem_read: true,
                mem_write: false,
                alu: AluOp::Add,
                b_src: OpBSrc::Imm,
            },
            Opcode::Store => Self {
                reg_write: false,
                mem_read: false,
                mem_write: true,
                alu: AluOp::Add,
                b_src: OpBSrc::Imm,
            },
        }
    }

    /// Register-register ALU operation writing `rd`.
    const fn register_op(alu: AluOp) -> Self {
        Self {
            reg_write: true,
            mem_read: false,
            mem_write: false,
            alu,
            b_src: OpBSrc::Reg2,
        }
    }
}
