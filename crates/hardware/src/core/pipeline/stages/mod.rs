//! Pipeline stage implementations.
//!
//! This module contains the individual implementations for the five stages of the
//! instruction pipeline. The engine runs them in reverse order each cycle so every
//! stage reads its predecessor's occupant before that occupant is replaced:
//! 1. **Writeback:** Schedules the register write and retires the instruction.
//! 2. **Memory:** Handles data load and store operations.
//! 3. **Execute:** Resolves operands and performs the ALU operation or address computation.
//! 4. **Decode:** Generates control signals, or holds the instruction under a stall.
//! 5. **Fetch:** Pulls the next instruction from the queue, or holds under a stall.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;
