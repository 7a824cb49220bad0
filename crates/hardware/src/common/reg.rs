//! Register identifiers.
//!
//! Registers are named `R0`..`R{n-1}` in instruction text and snapshots. The
//! identifier is a strong type so register indices cannot be confused with
//! addresses or immediates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of an architectural register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegId(pub u8);

impl RegId {
    /// Register `R0`, hardwired to zero unless the configuration disables it.
    pub const ZERO: Self = Self(0);

    /// Returns the register index as a `usize` for slice indexing.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Parses a register name of the form `R<n>` (case-insensitive).
    ///
    /// # Arguments
    ///
    /// * `name` - The token to parse.
    /// * `count` - Number of registers in the register file.
    ///
    /// # Returns
    ///
    /// `Some(RegId)` when the name is well formed and `n < count`, otherwise `None`.
    pub fn parse(name: &str, count: usize) -> Option<Self> {
        let digits = name.strip_prefix(['R', 'r'])?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index: usize = digits.parse().ok()?;
        if index >= count {
            return None;
        }
        u8::try_from(index).ok().map(Self)
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}
