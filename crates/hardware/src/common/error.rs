//! Error definitions.
//!
//! This module defines every error the simulator core can report. It provides:
//! 1. **Decode Errors:** Rejections of malformed instruction text at insertion time.
//! 2. **Simulation Errors:** Per-instruction faults and fatal invariant violations.
//! 3. **Load Errors:** Program-file decode failures annotated with their line.
//!
//! All types integrate with `std::error::Error` through `thiserror` so a driver can
//! propagate them with `?` into whatever error type it uses at its boundary.

use serde::Serialize;
use thiserror::Error;

use super::reg::RegId;
use crate::isa::instruction::Opcode;

/// Reasons an instruction text is rejected by the decoder.
///
/// Decode errors are never fatal: the instruction is not enqueued and the
/// fetch queue is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum DecodeError {
    /// The text contained no tokens.
    #[error("empty instruction")]
    Empty,

    /// The first token is not a known mnemonic.
    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),

    /// The opcode was followed by the wrong number of operands.
    #[error("{opcode} expects {expected} operand(s), found {found}")]
    OperandCount {
        /// Opcode that was recognized.
        opcode: Opcode,
        /// Operand count the opcode requires.
        expected: usize,
        /// Operand count actually supplied.
        found: usize,
    },

    /// A register operand is not `R<n>` with `n` inside the register file.
    #[error("malformed register name `{0}`")]
    BadRegister(String),

    /// An immediate or address operand could not be parsed.
    #[error("malformed immediate `{0}`")]
    BadImmediate(String),
}

/// Errors raised while a cycle is being simulated.
///
/// `AddressFault` is fatal only to the instruction that caused it. The
/// conflict variants indicate a broken single-issue invariant and move the
/// engine into the `Faulted` state.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum SimError {
    /// Two writes were scheduled to the same register in one cycle.
    #[error("write conflict: {reg} already has a pending write this cycle")]
    WriteConflict {
        /// Register that received the second write.
        reg: RegId,
    },

    /// Two writes were scheduled to the same memory address in one cycle.
    #[error("memory write conflict at address {address}")]
    MemoryWriteConflict {
        /// Address that received the second write.
        address: u64,
    },

    /// A load or store addressed memory outside the configured image.
    #[error("address fault: {address} is outside memory of {size} bytes")]
    AddressFault {
        /// Effective address computed by the instruction.
        address: i64,
        /// Configured memory size in bytes.
        size: usize,
    },
}

impl SimError {
    /// Returns `true` when the error must stop the whole engine rather than
    /// just the offending instruction.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::AddressFault { .. })
    }
}

/// A program line that failed to decode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}: {source} (`{text}`)")]
pub struct LoadError {
    /// 1-based line number within the program source.
    pub line: usize,
    /// The offending line with comments stripped.
    pub text: String,
    /// Underlying decoder rejection.
    pub source: DecodeError,
}

/// Invalid simulator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed into a configuration.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The register file must hold between 1 and 256 registers.
    #[error("register count must be between 1 and {max}, got {count}")]
    RegisterCount {
        /// Requested register count.
        count: usize,
        /// Largest supported register count.
        max: usize,
    },

    /// Memory must hold at least one byte.
    #[error("memory size must be non-zero")]
    EmptyMemory,

    /// An initial register value names a register outside the file.
    #[error("initial value given for R{index}, but only {count} registers exist")]
    InitialRegister {
        /// Register index from the configuration.
        index: usize,
        /// Configured register count.
        count: usize,
    },

    /// An initial memory byte lies outside the memory image.
    #[error("initial byte at address {address} is outside memory of {size} bytes")]
    InitialAddress {
        /// Address from the configuration.
        address: u64,
        /// Configured memory size.
        size: usize,
    },
}
