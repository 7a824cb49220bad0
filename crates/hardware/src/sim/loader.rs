//! Program Loader.
//!
//! This module turns program text into decoded instructions. It performs:
//! 1. **Comment stripping:** Everything after `#` or `;` on a line is ignored.
//! 2. **Line decoding:** Each non-blank line is decoded as one instruction.
//! 3. **Error annotation:** A failure names the 1-based line it came from.
//!
//! Loading is all-or-nothing: the caller receives either every instruction or
//! the first error, never a partial program.

use tracing::info;

use crate::common::error::LoadError;
use crate::isa::decode::decode;
use crate::isa::instruction::Decoded;

/// Returns the instruction text of one program line, with comments removed.
fn strip_comment(line: &str) -> &str {
    line.split(['#', ';']).next().unwrap_or_default().trim()
}

/// Decodes a multi-line program.
///
/// # Arguments
///
/// * `source` - Program text, one instruction per line.
/// * `register_count` - Size of the register file the program targets.
///
/// # Returns
///
/// The decoded instructions in program order.
///
/// # Errors
///
/// A [`LoadError`] for the first line that fails to decode.
pub fn parse_program(source: &str, register_count: usize) -> Result<Vec<Decoded>, LoadError> {
    let program = source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, strip_comment(line)))
        .filter(|(_, text)| !text.is_empty())
        .map(|(line, text)| {
            decode(text, register_count).map_err(|source| LoadError {
                line,
                text: text.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(instructions = program.len(), "program parsed");
    Ok(program)
}
