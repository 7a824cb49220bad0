//! Pipeline stage slots.
//!
//! This module defines the state carried between the five pipeline stages:
//! Fetch → Decode → Execute → Memory Access → Write-back.
//!
//! 1. **Stage Naming:** A fixed, ordered enum used to index the slot array.
//! 2. **In-Flight State:** Per-instruction values produced as it moves through the stages.
//! 3. **Slot States:** Empty, occupied, bubble and stalled slots.

use std::fmt;

use serde::Serialize;

use crate::core::pipeline::signals::ControlSignals;
use crate::isa::instruction::Instruction;

/// Number of pipeline stages.
pub const STAGE_COUNT: usize = 5;

/// The five pipeline stages, in program-flow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    /// Instruction fetch from the pending queue.
    Fetch,
    /// Control-signal generation and hazard check.
    Decode,
    /// ALU operation or effective-address computation.
    Execute,
    /// Data memory read or write.
    MemoryAccess,
    /// Register write and retirement.
    WriteBack,
}

impl Stage {
    /// All stages in pipeline order; `Stage::ALL[s.index()] == s`.
    pub const ALL: [Self; STAGE_COUNT] = [
        Self::Fetch,
        Self::Decode,
        Self::Execute,
        Self::MemoryAccess,
        Self::WriteBack,
    ];

    /// Position of the stage in the slot array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display name, as shown on the stage boxes.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "Fetch",
            Self::Decode => "Decode",
            Self::Execute => "Execute",
            Self::MemoryAccess => "Memory Access",
            Self::WriteBack => "Write-back",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An instruction travelling through the pipeline, together with the values
/// the stages have produced for it so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFlight {
    /// The issued instruction.
    pub inst: Instruction,
    /// Control signals, generated in Decode.
    pub ctrl: ControlSignals,
    /// Value read (or forwarded) for `rs1` at the Decode/Execute boundary.
    pub rv1: i64,
    /// Value read (or forwarded) for `rs2` at the Decode/Execute boundary.
    pub rv2: i64,
    /// ALU result, loaded value, or `None` before the value exists.
    pub result: Option<i64>,
    /// Effective address of a load or store, computed in Execute.
    pub address: Option<i64>,
    /// Set when the Memory Access stage rejected the address.
    pub faulted: bool,
}

impl InFlight {
    /// Wraps a freshly fetched instruction.
    pub fn fetched(inst: Instruction) -> Self {
        Self {
            inst,
            ctrl: ControlSignals::default(),
            rv1: 0,
            rv2: 0,
            result: None,
            address: None,
            faulted: false,
        }
    }
}

/// State of one stage slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StageSlot {
    /// Nothing in the stage.
    #[default]
    Empty,
    /// An instruction doing this stage's work this cycle.
    Occupied(InFlight),
    /// A hazard bubble; carries no instruction and has no side effects.
    Bubble,
    /// An instruction held in place by a stall.
    Stalled(InFlight),
}

impl StageSlot {
    /// The instruction held by the slot, whether advancing or stalled.
    pub const fn instruction(&self) -> Option<&InFlight> {
        match self {
            Self::Occupied(f) | Self::Stalled(f) => Some(f),
            Self::Empty | Self::Bubble => None,
        }
    }

    /// Returns `true` if the slot holds an instruction.
    pub const fn is_occupied(&self) -> bool {
        self.instruction().is_some()
    }

    /// Moves the slot's contents out, leaving it empty. A stalled instruction
    /// comes out as occupied, ready to advance.
    pub fn take(&mut self) -> Self {
        match std::mem::take(self) {
            Self::Stalled(f) => Self::Occupied(f),
            other => other,
        }
    }

    /// Marks a held instruction as stalled in place. Empty slots and bubbles
    /// are left as they are.
    pub fn stall(&mut self) {
        *self = match std::mem::take(self) {
            Self::Occupied(f) | Self::Stalled(f) => Self::Stalled(f),
            other => other,
        };
    }
}
