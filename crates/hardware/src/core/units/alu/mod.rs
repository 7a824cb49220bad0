//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used in the Execute stage.
//! All arithmetic wraps on overflow, matching two's-complement hardware.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub
//! - [`logic`]:      And, Or, Xor

/// Integer arithmetic operations (add, subtract).
pub mod arithmetic;

/// Bitwise logical operations (and, or, xor).
pub mod logic;

use crate::core::pipeline::signals::AluOp;

/// Arithmetic Logic Unit for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform
    /// * `a`  - First operand
    /// * `b`  - Second operand (register value or immediate)
    ///
    /// # Returns
    ///
    /// The 64-bit result of the operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipesim_core::core::units::alu::Alu;
    /// use pipesim_core::core::pipeline::signals::AluOp;
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 42, 8), 50);
    /// assert_eq!(Alu::execute(AluOp::Sub, 3, 5), -2);
    /// assert_eq!(Alu::execute(AluOp::Xor, 0b1100, 0b1010), 0b0110);
    /// ```
    pub const fn execute(op: AluOp, a: i64, b: i64) -> i64 {
        match op {
            AluOp::Add | AluOp::Sub => arithmetic::execute(op, a, b),
            AluOp::And | AluOp::Or | AluOp::Xor => logic::execute(op, a, b),
        }
    }
}
