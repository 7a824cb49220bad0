//! Cycle snapshots and trace sinks.
//!
//! After every cycle that actually ran, the simulator captures a read-only
//! [`Snapshot`] of the machine and hands it to each attached [`TraceSink`].
//! This module provides:
//! 1. **Snapshots:** Serializable per-cycle views of stages, registers, memory and hazards.
//! 2. **Sink Trait:** The observer seam; sinks only ever see `&Snapshot`.
//! 3. **Built-in Sinks:** `tracing` logging, in-memory recording, and JSON-lines output.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::arch::MemoryCell;
use crate::core::pipeline::engine::{EngineState, FaultRecord, PipelineEngine};
use crate::core::pipeline::hazards::HazardRecord;
use crate::core::pipeline::latches::{Stage, StageSlot};

/// What a stage box shows for one cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Occupant {
    /// Nothing in the stage.
    Empty,
    /// A hazard bubble.
    Bubble,
    /// An instruction doing this stage's work.
    Instruction {
        /// Sequence number.
        seq: u64,
        /// Canonical instruction text.
        text: String,
    },
    /// An instruction held in place by a stall.
    Stalled {
        /// Sequence number.
        seq: u64,
        /// Canonical instruction text.
        text: String,
    },
}

impl Occupant {
    /// Sequence number of the instruction shown, if any.
    pub const fn seq(&self) -> Option<u64> {
        match self {
            Self::Instruction { seq, .. } | Self::Stalled { seq, .. } => Some(*seq),
            Self::Empty | Self::Bubble => None,
        }
    }
}

impl From<&StageSlot> for Occupant {
    fn from(slot: &StageSlot) -> Self {
        match slot {
            StageSlot::Empty => Self::Empty,
            StageSlot::Bubble => Self::Bubble,
            StageSlot::Occupied(f) => Self::Instruction {
                seq: f.inst.seq,
                text: f.inst.decoded.to_string(),
            },
            StageSlot::Stalled(f) => Self::Stalled {
                seq: f.inst.seq,
                text: f.inst.decoded.to_string(),
            },
        }
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("-"),
            Self::Bubble => f.write_str("(bubble)"),
            Self::Instruction { seq, text } => write!(f, "#{seq} {text}"),
            Self::Stalled { seq, text } => write!(f, "#{seq} {text} [stalled]"),
        }
    }
}

/// One stage and its occupant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageView {
    /// The stage.
    pub stage: Stage,
    /// What the stage holds at the end of the cycle.
    pub occupant: Occupant,
}

/// Read-only view of the machine at the end of a cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Cycle number; 0 before the first cycle.
    pub cycle: u64,
    /// Engine state after the cycle.
    pub state: EngineState,
    /// Every stage in pipeline order.
    pub stages: Vec<StageView>,
    /// Committed register values in index order.
    pub registers: Vec<i64>,
    /// Configured memory window.
    pub memory: Vec<MemoryCell>,
    /// Fault raised during the cycle, if any.
    pub fault: Option<FaultRecord>,
    /// Sequence number retired during the cycle, if any.
    pub retired: Option<u64>,
    /// Hazards found during the cycle.
    pub hazards: Vec<HazardRecord>,
    /// Instructions still waiting in the fetch queue.
    pub queued: usize,
}

impl Snapshot {
    /// Captures the current state of an engine.
    pub fn capture(engine: &PipelineEngine) -> Self {
        let window = &engine.config().memory;
        Self {
            cycle: engine.cycle(),
            state: engine.state(),
            stages: Stage::ALL
                .iter()
                .map(|&stage| StageView {
                    stage,
                    occupant: Occupant::from(engine.slot(stage)),
                })
                .collect(),
            registers: engine.registers().values(),
            memory: engine
                .memory()
                .window(window.window_start, window.window_len),
            fault: engine.cycle_fault().cloned(),
            retired: engine.retired_this_cycle(),
            hazards: engine.hazards().to_vec(),
            queued: engine.queued().len(),
        }
    }

    /// The occupant of one stage.
    pub fn occupant(&self, stage: Stage) -> &Occupant {
        &self.stages[stage.index()].occupant
    }

    /// Returns `true` if an instruction was held in place this cycle.
    pub fn stalled(&self) -> bool {
        self.stages
            .iter()
            .any(|v| matches!(v.occupant, Occupant::Stalled { .. }))
    }
}

/// Observer notified after every executed cycle.
///
/// Sinks cannot reach the engine; they only see the snapshot they are given.
pub trait TraceSink {
    /// Called once per executed cycle with that cycle's snapshot.
    fn on_cycle(&mut self, snapshot: &Snapshot);
}

/// Logs each snapshot through `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn on_cycle(&mut self, snapshot: &Snapshot) {
        let stages = snapshot
            .stages
            .iter()
            .map(|v| format!("{}: {}", v.stage, v.occupant))
            .collect::<Vec<_>>()
            .join(" | ");
        debug!(
            cycle = snapshot.cycle,
            state = ?snapshot.state,
            retired = ?snapshot.retired,
            hazards = snapshot.hazards.len(),
            "{stages}"
        );
    }
}

/// Records snapshots in memory.
///
/// Clones share one log, so a test can attach a clone to the simulator and
/// keep the first handle to inspect what was recorded.
#[derive(Clone, Debug, Default)]
pub struct SnapshotLog {
    entries: Rc<RefCell<Vec<Snapshot>>>,
}

impl SnapshotLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out every snapshot recorded so far.
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.entries.borrow().clone()
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<Snapshot> {
        self.entries.borrow().last().cloned()
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Discards every recorded snapshot.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl TraceSink for SnapshotLog {
    fn on_cycle(&mut self, snapshot: &Snapshot) {
        self.entries.borrow_mut().push(snapshot.clone());
    }
}

/// Writes each snapshot as one JSON object per line.
///
/// Write failures are logged and otherwise ignored; tracing never affects
/// the simulation.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_cycle(&mut self, snapshot: &Snapshot) {
        let written = serde_json::to_writer(&mut self.writer, snapshot)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.writer))
            .and_then(|()| self.writer.flush());
        if let Err(e) = written {
            warn!(cycle = snapshot.cycle, error = %e, "failed to write trace line");
        }
    }
}
