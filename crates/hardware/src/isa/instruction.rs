//! Instruction records.
//!
//! This module defines the typed form of an instruction. It provides:
//! 1. **Opcodes:** The supported arithmetic, load/store and no-op operations.
//! 2. **Decoded Instructions:** Operands extracted and validated by the decoder.
//! 3. **Issued Instructions:** Decoded instructions stamped with their program-order sequence number.

use std::fmt;

use serde::Serialize;

use crate::common::reg::RegId;

/// Supported operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opcode {
    /// No operation; flows through every stage without side effects.
    Nop,
    /// `Rd = Rs1 + Rs2`
    Add,
    /// `Rd = Rs1 - Rs2`
    Sub,
    /// `Rd = Rs1 & Rs2`
    And,
    /// `Rd = Rs1 | Rs2`
    Or,
    /// `Rd = Rs1 ^ Rs2`
    Xor,
    /// `Rd = Rs1 + imm`
    Addi,
    /// `Rd = mem[Rb + imm]` (zero-extended byte)
    Load,
    /// `mem[Rb + imm] = Rs & 0xff`
    Store,
}

impl Opcode {
    /// Every opcode, in mnemonic-table order.
    pub const ALL: [Self; 9] = [
        Self::Nop,
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Addi,
        Self::Load,
        Self::Store,
    ];

    /// Returns the canonical upper-case mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Addi => "ADDI",
            Self::Load => "LOAD",
            Self::Store => "STORE",
        }
    }

    /// Looks up an opcode by mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(token))
    }

    /// Number of operand tokens the opcode takes in instruction text.
    pub const fn operand_count(self) -> usize {
        match self {
            Self::Nop => 0,
            Self::Load | Self::Store => 2,
            Self::Add | Self::Sub | Self::And | Self::Or | Self::Xor | Self::Addi => 3,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A validated instruction as produced by the decoder.
///
/// Operand roles follow the usual three-address convention: `rd` is written,
/// `rs1` is the first (or base) source, `rs2` the second (or store data) source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Decoded {
    /// Operation to perform.
    pub opcode: Opcode,
    /// Destination register, if the instruction writes one.
    pub rd: Option<RegId>,
    /// First source register, or the base register of an address.
    pub rs1: Option<RegId>,
    /// Second source register, or the data register of a store.
    pub rs2: Option<RegId>,
    /// Immediate operand or address offset.
    pub imm: Option<i64>,
}

impl Decoded {
    /// The canonical no-op.
    pub const NOP: Self = Self {
        opcode: Opcode::Nop,
        rd: None,
        rs1: None,
        rs2: None,
        imm: None,
    };

    /// Iterates over the source registers the instruction reads.
    pub fn sources(&self) -> impl Iterator<Item = RegId> {
        self.rs1.into_iter().chain(self.rs2)
    }

    /// Writes the `imm(Rb)` address form used by loads and stores.
    fn fmt_address(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = self.imm.unwrap_or(0);
        match self.rs1 {
            Some(base) if offset == 0 => write!(f, "({base})"),
            Some(base) => write!(f, "{offset}({base})"),
            None => write!(f, "{offset}"),
        }
    }
}

impl fmt::Display for Decoded {
    /// Renders the instruction in canonical text form, e.g. `ADD R1, R2, R3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = |r: Option<RegId>| r.unwrap_or(RegId::ZERO);
        match self.opcode {
            Opcode::Nop => f.write_str("NOP"),
            Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Or | Opcode::Xor => write!(
                f,
                "{} {}, {}, {}",
                self.opcode,
                reg(self.rd),
                reg(self.rs1),
                reg(self.rs2)
            ),
            Opcode::Addi => write!(
                f,
                "ADDI {}, {}, {}",
                reg(self.rd),
                reg(self.rs1),
                self.imm.unwrap_or(0)
            ),
            Opcode::Load => {
                write!(f, "LOAD {}, ", reg(self.rd))?;
                self.fmt_address(f)
            }
            Opcode::Store => {
                write!(f, "STORE {}, ", reg(self.rs2))?;
                self.fmt_address(f)
            }
        }
    }
}

/// A decoded instruction that has been accepted into the fetch queue.
///
/// The sequence number is assigned at insertion and increases monotonically,
/// so it doubles as the program-order key. Instructions are immutable once
/// issued; per-stage state lives in the pipeline latches instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Program-order sequence number.
    pub seq: u64,
    /// Decoded operation and operands.
    pub decoded: Decoded,
}

impl Instruction {
    /// Stamps a decoded instruction with its sequence number.
    pub const fn new(seq: u64, decoded: Decoded) -> Self {
        Self { seq, decoded }
    }

    /// Operation performed by this instruction.
    #[inline]
    pub const fn opcode(&self) -> Opcode {
        self.decoded.opcode
    }

    /// Destination register, if any.
    #[inline]
    pub const fn dest(&self) -> Option<RegId> {
        self.decoded.rd
    }

    /// Source registers read by this instruction.
    pub fn sources(&self) -> impl Iterator<Item = RegId> {
        self.decoded.sources()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seq, self.decoded)
    }
}
