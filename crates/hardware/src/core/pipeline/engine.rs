//! In-order pipeline engine.
//!
//! The engine owns every piece of machine state and advances it one clock
//! cycle at a time. Each cycle proceeds as follows:
//! 1. **Hazard inspection:** The hazard unit decides stall or forward for the
//!    Decode occupant, based on the occupancy left by the previous cycle.
//! 2. **Stage shift:** Stages run in reverse order (WB, MEM, EX, ID, IF) so each
//!    one consumes its predecessor's occupant before it is overwritten.
//! 3. **Commit:** Scheduled memory writes and then register writes land.
//! 4. **State update:** The engine becomes `Drained`, stays `Running`, or is
//!    left `Faulted` by a fatal error raised during the cycle.
//!
//! A cycle always completes once started; there is no partial rollback.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::common::error::{ConfigError, SimError};
use crate::common::reg::RegId;
use crate::config::Config;
use crate::core::arch::{Memory, RegisterFile};
use crate::core::pipeline::hazards::{HazardRecord, HazardUnit};
use crate::core::pipeline::latches::{STAGE_COUNT, Stage, StageSlot};
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage,
};
use crate::isa::instruction::{Decoded, Instruction};
use crate::stats::SimStats;

/// Lifecycle state of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum EngineState {
    /// Instructions are queued or in flight.
    Running,
    /// The queue is empty and every issued instruction has written back.
    #[default]
    Drained,
    /// An internal invariant was violated; the engine no longer advances.
    Faulted,
}

/// A fault raised while an instruction occupied a stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaultRecord {
    /// Cycle in which the fault was raised.
    pub cycle: u64,
    /// Stage that rejected the instruction.
    pub stage: Stage,
    /// Sequence number of the offending instruction.
    pub seq: u64,
    /// Canonical text of the offending instruction.
    pub instruction: String,
    /// The error itself.
    pub error: SimError,
}

impl FaultRecord {
    /// Returns `true` if this fault stopped the engine.
    pub const fn is_fatal(&self) -> bool {
        self.error.is_fatal()
    }
}

/// Five-stage in-order pipeline with forwarding and load-use stalls.
#[derive(Clone, Debug)]
pub struct PipelineEngine {
    pub(crate) slots: [StageSlot; STAGE_COUNT],
    pub(crate) queue: VecDeque<Instruction>,
    pub(crate) regs: RegisterFile,
    pub(crate) memory: Memory,
    pub(crate) stats: SimStats,
    pub(crate) retired: Option<u64>,
    hazard_unit: HazardUnit,
    state: EngineState,
    cycle: u64,
    next_seq: u64,
    fault: Option<FaultRecord>,
    fatal: Option<FaultRecord>,
    hazards: Vec<HazardRecord>,
    config: Config,
}

impl PipelineEngine {
    /// Builds an engine with the configured register file and memory image.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] reported by [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let (regs, memory) = Self::initial_state(config)?;

        Ok(Self {
            slots: Default::default(),
            queue: VecDeque::new(),
            regs,
            memory,
            stats: SimStats::default(),
            retired: None,
            hazard_unit: HazardUnit::new(config.registers.zero_register),
            state: EngineState::Drained,
            cycle: 0,
            next_seq: 1,
            fault: None,
            fatal: None,
            hazards: Vec::new(),
            config: config.clone(),
        })
    }

    /// Creates the register file and memory with their configured initial contents.
    fn initial_state(config: &Config) -> Result<(RegisterFile, Memory), ConfigError> {
        let mut regs = RegisterFile::new(config.registers.count, config.registers.zero_register);
        for (&index, &value) in &config.registers.initial {
            let id = u8::try_from(index)
                .map(RegId)
                .map_err(|_| ConfigError::InitialRegister {
                    index,
                    count: config.registers.count,
                })?;
            regs.preset(id, value);
        }

        let mut memory = Memory::new(config.memory.size);
        for (&address, &value) in &config.memory.initial {
            memory
                .preset(address, value)
                .map_err(|_| ConfigError::InitialAddress {
                    address,
                    size: config.memory.size,
                })?;
        }

        Ok((regs, memory))
    }

    /// Appends a decoded instruction to the fetch queue.
    ///
    /// A `Drained` engine becomes `Running`; a `Faulted` engine stays faulted.
    ///
    /// # Returns
    ///
    /// The sequence number assigned to the instruction.
    pub fn enqueue(&mut self, decoded: Decoded) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push_back(Instruction::new(seq, decoded));
        if self.state == EngineState::Drained {
            self.state = EngineState::Running;
        }
        debug!(seq, inst = %decoded, queued = self.queue.len(), "enqueued");
        seq
    }

    /// Advances the pipeline by exactly one clock cycle.
    ///
    /// A `Faulted` engine does not advance. A `Drained` engine idles without
    /// counting a cycle.
    ///
    /// # Returns
    ///
    /// The engine state after the cycle.
    pub fn advance_cycle(&mut self) -> EngineState {
        match self.state {
            EngineState::Faulted => return EngineState::Faulted,
            EngineState::Drained => return EngineState::Drained,
            _ => {}
        }

        self.cycle += 1;
        self.stats.cycles += 1;
        self.state = EngineState::Running;
        self.retired = None;
        self.fault = None;

        let report = self.hazard_unit.inspect(&self.slots);
        let stall = report.stall();

        wb_stage(self);
        mem_stage(self);
        execute_stage(self, &report);
        decode_stage(self, stall);
        fetch_stage(self, stall);

        self.memory.commit();
        self.regs.commit();
        self.hazards = report.records;

        if self.state != EngineState::Faulted {
            self.state = if self.is_drained() {
                EngineState::Drained
            } else {
                EngineState::Running
            };
        }

        debug!(
            cycle = self.cycle,
            state = ?self.state,
            stall,
            retired = ?self.retired,
            "cycle complete"
        );
        self.state
    }

    /// Records a fault raised by a stage during the current cycle.
    ///
    /// Address faults only squash the instruction. Any other error moves the
    /// engine to `Faulted`; the cycle still runs to completion.
    pub(crate) fn raise(&mut self, stage: Stage, inst: &Instruction, err: SimError) {
        let record = FaultRecord {
            cycle: self.cycle,
            stage,
            seq: inst.seq,
            instruction: inst.decoded.to_string(),
            error: err,
        };

        if record.is_fatal() {
            error!(cycle = self.cycle, seq = inst.seq, %stage, error = %record.error, "fatal fault");
            self.state = EngineState::Faulted;
            self.fatal = Some(record.clone());
        } else {
            warn!(cycle = self.cycle, seq = inst.seq, %stage, error = %record.error, "instruction faulted");
            self.stats.address_faults += 1;
        }

        if self.fault.as_ref().is_none_or(|f| !f.is_fatal()) {
            self.fault = Some(record);
        }
    }

    /// Returns `true` when nothing is queued and no slot holds an instruction
    /// that has yet to complete write-back.
    fn is_drained(&self) -> bool {
        self.queue.is_empty()
            && self.slots[..Stage::WriteBack.index()]
                .iter()
                .all(|slot| !slot.is_occupied())
    }

    /// Restores the configured initial state, discarding every queued and
    /// in-flight instruction and all counters.
    pub fn reset(&mut self) {
        // Config was validated in `new`, so rebuilding the initial state cannot fail.
        if let Ok((regs, memory)) = Self::initial_state(&self.config) {
            self.regs = regs;
            self.memory = memory;
        }
        self.slots = Default::default();
        self.queue.clear();
        self.stats = SimStats::default();
        self.retired = None;
        self.state = EngineState::Drained;
        self.cycle = 0;
        self.next_seq = 1;
        self.fault = None;
        self.fatal = None;
        self.hazards.clear();
        info!("engine reset");
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Number of cycles executed since construction or the last reset.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// All stage slots in pipeline order.
    pub const fn slots(&self) -> &[StageSlot; STAGE_COUNT] {
        &self.slots
    }

    /// The slot for one stage.
    pub const fn slot(&self, stage: Stage) -> &StageSlot {
        &self.slots[stage.index()]
    }

    /// Instructions waiting to be fetched, oldest first.
    pub fn queued(&self) -> impl ExactSizeIterator<Item = &Instruction> {
        self.queue.iter()
    }

    /// The architectural register file.
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// The data memory image.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Performance counters.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Hazards found during the last cycle.
    pub fn hazards(&self) -> &[HazardRecord] {
        &self.hazards
    }

    /// Fault raised during the last cycle, if any.
    pub const fn cycle_fault(&self) -> Option<&FaultRecord> {
        self.fault.as_ref()
    }

    /// The fault that stopped the engine, kept until reset.
    pub const fn fatal_fault(&self) -> Option<&FaultRecord> {
        self.fatal.as_ref()
    }

    /// Sequence number retired during the last cycle, if any.
    pub const fn retired_this_cycle(&self) -> Option<u64> {
        self.retired
    }

    /// Configuration the engine was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }
}
