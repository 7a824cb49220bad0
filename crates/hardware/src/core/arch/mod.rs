//! Architectural state.
//!
//! This module contains the state that survives every cycle:
//! 1. **GPRs:** The general-purpose register file with scheduled writes and bypass.
//! 2. **Memory:** The sparse data memory image with scheduled writes.

/// General-Purpose Register file implementation.
pub mod gpr;

/// Byte-addressable data memory.
pub mod memory;

pub use gpr::RegisterFile;
pub use memory::{Memory, MemoryCell};
