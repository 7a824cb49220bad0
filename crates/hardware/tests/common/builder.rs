use pipesim_core::core::pipeline::latches::{InFlight, STAGE_COUNT, Stage, StageSlot};
use pipesim_core::core::pipeline::signals::ControlSignals;
use pipesim_core::isa::decode::decode;
use pipesim_core::isa::instruction::Instruction;

/// Builds an in-flight instruction with control signals already generated,
/// as it looks after leaving Decode.
pub struct InFlightBuilder(InFlight);

impl InFlightBuilder {
    pub fn new(seq: u64, text: &str) -> Self {
        let decoded = decode(text, 8).expect("builder text must decode");
        let mut inflight = InFlight::fetched(Instruction::new(seq, decoded));
        inflight.ctrl = ControlSignals::for_opcode(decoded.opcode);
        Self(inflight)
    }

    pub fn result(mut self, value: i64) -> Self {
        self.0.result = Some(value);
        self
    }

    pub fn address(mut self, address: i64) -> Self {
        self.0.address = Some(address);
        self
    }

    pub fn faulted(mut self) -> Self {
        self.0.faulted = true;
        self
    }

    pub fn build(self) -> InFlight {
        self.0
    }

    pub fn occupied(self) -> StageSlot {
        StageSlot::Occupied(self.0)
    }

    pub fn stalled(self) -> StageSlot {
        StageSlot::Stalled(self.0)
    }
}

/// Builds the five-slot occupancy the hazard unit inspects.
#[derive(Default)]
pub struct SlotsBuilder([StageSlot; STAGE_COUNT]);

impl SlotsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stage: Stage, slot: StageSlot) -> Self {
        self.0[stage.index()] = slot;
        self
    }

    pub fn build(self) -> [StageSlot; STAGE_COUNT] {
        self.0
    }
}
