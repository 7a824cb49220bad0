//! Instruction text decoder.
//!
//! Converts raw instruction text such as `ADD R1, R2, R3` or `LOAD R4 8(R2)`
//! into a [`Decoded`] record. Decoding is a pure function: it never touches
//! simulator state and reports every rejection as a [`DecodeError`].
//!
//! Tokens are separated by whitespace and/or commas. Mnemonics and register
//! names are case-insensitive. Immediates are decimal (optionally negative) or
//! `0x`-prefixed hexadecimal.

use crate::common::error::DecodeError;
use crate::common::reg::RegId;
use crate::isa::instruction::{Decoded, Opcode};

/// Decodes one instruction.
///
/// # Arguments
///
/// * `text` - Raw instruction text.
/// * `register_count` - Number of registers in the register file; register
///   names at or above this index are rejected.
///
/// # Returns
///
/// The validated instruction, or the first problem found.
pub fn decode(text: &str, register_count: usize) -> Result<Decoded, DecodeError> {
    let mut tokens = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());

    let mnemonic = tokens.next().ok_or(DecodeError::Empty)?;
    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| DecodeError::UnknownOpcode(mnemonic.to_string()))?;

    let operands: Vec<&str> = tokens.collect();
    if operands.len() != opcode.operand_count() {
        return Err(DecodeError::OperandCount {
            opcode,
            expected: opcode.operand_count(),
            found: operands.len(),
        });
    }

    let reg = |token: &str| {
        RegId::parse(token, register_count)
            .ok_or_else(|| DecodeError::BadRegister(token.to_string()))
    };

    let decoded = match opcode {
        Opcode::Nop => Decoded::NOP,
        Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Or | Opcode::Xor => Decoded {
            opcode,
            rd: Some(reg(operands[0])?),
            rs1: Some(reg(operands[1])?),
            rs2: Some(reg(operands[2])?),
            imm: None,
        },
        Opcode::Addi => Decoded {
            opcode,
            rd: Some(reg(operands[0])?),
            rs1: Some(reg(operands[1])?),
            rs2: None,
            imm: Some(parse_immediate(operands[2])?),
        },
        Opcode::Load => {
            let (base, offset) = parse_address(operands[1], register_count)?;
            Decoded {
                opcode,
                rd: Some(reg(operands[0])?),
                rs1: base,
                rs2: None,
                imm: Some(offset),
            }
        }
        Opcode::Store => {
            let (base, offset) = parse_address(operands[1], register_count)?;
            Decoded {
                opcode,
                rd: None,
                rs1: base,
                rs2: Some(reg(operands[0])?),
                imm: Some(offset),
            }
        }
    };

    Ok(decoded)
}

/// Parses a signed decimal or `0x` hexadecimal immediate.
fn parse_immediate(token: &str) -> Result<i64, DecodeError> {
    let bad = || DecodeError::BadImmediate(token.to_string());

    let (negative, magnitude) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    let (digits, radix) = match magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (magnitude, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(bad());
    }

    // The magnitude of i64::MIN does not fit in an i64.
    let value = u64::from_str_radix(digits, radix).map_err(|_| bad())?;
    if negative {
        0_i64.checked_sub_unsigned(value).ok_or_else(bad)
    } else {
        i64::try_from(value).map_err(|_| bad())
    }
}

/// Parses a memory operand: `imm`, `imm(Rb)` or `(Rb)`.
///
/// # Returns
///
/// The optional base register and the offset (zero when omitted).
fn parse_address(
    token: &str,
    register_count: usize,
) -> Result<(Option<RegId>, i64), DecodeError> {
    let Some(open) = token.find('(') else {
        return Ok((None, parse_immediate(token)?));
    };

    let inner = token[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| DecodeError::BadImmediate(token.to_string()))?;
    let base = RegId::parse(inner, register_count)
        .ok_or_else(|| DecodeError::BadRegister(inner.to_string()))?;

    let offset = match &token[..open] {
        "" => 0,
        text => parse_immediate(text)?,
    };

    Ok((Some(base), offset))
}
