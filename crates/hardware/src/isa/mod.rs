//! Instruction set definitions.
//!
//! The simulated ISA is a small arithmetic/load/store subset. This module
//! contains:
//! 1. **Instruction:** Opcodes, decoded records and issued (sequenced) instructions.
//! 2. **Decode:** The textual instruction decoder.

/// Text-to-instruction decoder.
pub mod decode;

/// Opcodes and instruction records.
pub mod instruction;

pub use decode::decode;
pub use instruction::{Decoded, Instruction, Opcode};
