//! Data Hazard Detection and Forwarding.
//!
//! This module implements the logic that keeps the pipeline consistent when
//! data dependencies exist between in-flight instructions. It provides:
//! 1. **Hazard Detection:** Finds read-after-write dependencies between the
//!    instruction in Decode and older instructions in Execute or Memory Access.
//! 2. **Operand Forwarding:** Resolves a dependency by bypassing the register
//!    file when the producer's value already exists.
//! 3. **Load-Use Stalls:** Holds the consumer for one cycle when the producer
//!    is a load whose memory access has not completed yet.
//!
//! The unit inspects the occupancy left by the previous cycle, before any
//! stage advances. Its report is transient and recomputed every cycle.

use serde::Serialize;
use tracing::trace;

use crate::common::reg::RegId;
use crate::core::pipeline::latches::{InFlight, STAGE_COUNT, Stage, StageSlot};

/// How a detected hazard is resolved this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The producer's value is bypassed to the consumer's Decode/Execute boundary.
    Forward {
        /// Value delivered to the consumer.
        value: i64,
    },
    /// The consumer waits in Decode and a bubble enters Execute.
    Stall,
}

/// One (consumer, producer, register) dependency found this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HazardRecord {
    /// Stage holding the consuming instruction (always Decode).
    pub consumer: Stage,
    /// Sequence number of the consuming instruction.
    pub consumer_seq: u64,
    /// Stage holding the producing instruction.
    pub producer: Stage,
    /// Sequence number of the producing instruction.
    pub producer_seq: u64,
    /// Register carrying the dependency.
    pub reg: RegId,
    /// Stall or forward decision.
    pub resolution: Resolution,
}

/// Result of one hazard inspection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HazardReport {
    /// Every dependency found, at most one per distinct source register.
    pub records: Vec<HazardRecord>,
}

impl HazardReport {
    /// Returns `true` if the Decode occupant must stall this cycle.
    pub fn stall(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.resolution == Resolution::Stall)
    }

    /// Iterates over the `(register, value)` pairs to bypass this cycle.
    pub fn forwards(&self) -> impl Iterator<Item = (RegId, i64)> + '_ {
        self.records.iter().filter_map(|r| match r.resolution {
            Resolution::Forward { value } => Some((r.reg, value)),
            Resolution::Stall => None,
        })
    }
}

/// The hazard unit. Holds only the register-file convention it needs to
/// know about; it never owns or mutates pipeline state.
#[derive(Clone, Copy, Debug)]
pub struct HazardUnit {
    zero_register: bool,
}

impl HazardUnit {
    /// Creates a hazard unit.
    ///
    /// # Arguments
    ///
    /// * `zero_register` - When `true`, dependencies through `R0` are ignored.
    pub const fn new(zero_register: bool) -> Self {
        Self { zero_register }
    }

    /// Inspects the stage slots and decides stall/forward for the Decode occupant.
    pub fn inspect(&self, slots: &[StageSlot; STAGE_COUNT]) -> HazardReport {
        detect(slots, self.zero_register)
    }
}

/// Detects the read-after-write hazards of the instruction in Decode.
///
/// For every distinct source register, the youngest older producer is
/// chosen: Execute is searched before Memory Access. Faulted producers have
/// no architectural effect and are skipped.
///
/// # Arguments
///
/// * `slots` - Stage occupancy left by the previous cycle.
/// * `zero_register` - When `true`, reads of `R0` never form a hazard.
///
/// # Returns
///
/// A report listing each dependency and its resolution.
pub fn detect(slots: &[StageSlot; STAGE_COUNT], zero_register: bool) -> HazardReport {
    let Some(consumer) = slots[Stage::Decode.index()].instruction() else {
        return HazardReport::default();
    };

    let mut records = Vec::with_capacity(2);
    let mut seen = Vec::with_capacity(2);
    for reg in consumer.inst.sources() {
        if (zero_register && reg == RegId::ZERO) || seen.contains(&reg) {
            continue;
        }
        seen.push(reg);

        if let Some(record) = youngest_producer(slots, consumer, reg) {
            trace!(
                consumer = record.consumer_seq,
                producer = record.producer_seq,
                stage = %record.producer,
                %reg,
                resolution = ?record.resolution,
                "RAW hazard"
            );
            records.push(record);
        }
    }

    HazardReport { records }
}

/// Checks if a load-use stall is needed this cycle.
///
/// A load-use hazard occurs when the instruction in Decode reads a register
/// that a load in Execute is about to fetch from memory.
///
/// ```ignore
/// // Execute: LOAD R1, 0(R2)      <- data not read yet
/// // Decode:  ADD  R3, R1, R4     <- needs R1 -> one-cycle stall
/// ```
pub fn need_stall_load_use(slots: &[StageSlot; STAGE_COUNT], zero_register: bool) -> bool {
    detect(slots, zero_register).stall()
}

/// Finds the youngest in-flight producer of `reg` and decides its resolution.
fn youngest_producer(
    slots: &[StageSlot; STAGE_COUNT],
    consumer: &InFlight,
    reg: RegId,
) -> Option<HazardRecord> {
    [Stage::Execute, Stage::MemoryAccess]
        .into_iter()
        .find_map(|stage| {
            let producer = slots[stage.index()].instruction()?;
            if producer.faulted || !producer.ctrl.reg_write || producer.inst.dest() != Some(reg) {
                return None;
            }

            let resolution = match (stage, producer.ctrl.mem_read, producer.result) {
                (Stage::Execute, true, _) | (_, _, None) => Resolution::Stall,
                (_, _, Some(value)) => Resolution::Forward { value },
            };

            Some(HazardRecord {
                consumer: Stage::Decode,
                consumer_seq: consumer.inst.seq,
                producer: stage,
                producer_seq: producer.inst.seq,
                reg,
                resolution,
            })
        })
}
