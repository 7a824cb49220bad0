//! ALU logical operations.
//!
//! Implements bitwise AND, OR and XOR over the full 64 bits.

use crate::core::pipeline::signals::AluOp;

/// Executes a bitwise operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be a logic variant).
/// * `a`  - First operand.
/// * `b`  - Second operand.
///
/// # Returns
///
/// The bitwise result. Returns `0` for non-logic opcodes.
pub const fn execute(op: AluOp, a: i64, b: i64) -> i64 {
    match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        _ => 0,
    }
}
