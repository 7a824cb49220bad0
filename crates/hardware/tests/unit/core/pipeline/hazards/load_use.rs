//! Load-Use Hazard Detection Tests.
//!
//! Verifies that `need_stall_load_use` detects when a stall is required
//! because the instruction in Decode depends on data being loaded by the
//! instruction in Execute.

use pipesim_core::core::pipeline::hazards::{HazardUnit, Resolution, need_stall_load_use};
use pipesim_core::core::pipeline::latches::Stage;

use crate::common::builder::{InFlightBuilder, SlotsBuilder};

// ══════════════════════════════════════════════════════════
// 1. Basic load-use detection
// ══════════════════════════════════════════════════════════

#[test]
fn stall_when_load_rd_matches_rs1() {
    let slots = SlotsBuilder::new()
        .with(Stage::Execute, InFlightBuilder::new(1, "LOAD R5, 0(R2)").address(0).occupied())
        .with(Stage::Decode, InFlightBuilder::new(2, "ADD R3, R5, R4").occupied())
        .build();
    assert!(need_stall_load_use(&slots, true), "Load R5, then use R5 as rs1 → stall");
}

#[test]
fn stall_when_load_rd_matches_rs2() {
    let slots = SlotsBuilder::new()
        .with(Stage::Execute, InFlightBuilder::new(1, "LOAD R7, 4").address(4).occupied())
        .with(Stage::Decode, InFlightBuilder::new(2, "SUB R3, R1, R7").occupied())
        .build();
    assert!(need_stall_load_use(&slots, true), "Load R7, then use R7 as rs2 → stall");
}

#[test]
fn stall_when_store_data_comes_from_load() {
    let slots = SlotsBuilder::new()
        .with(Stage::Execute, InFlightBuilder::new(1, "LOAD R1, 4").address(4).occupied())
        .with(Stage::Decode, InFlightBuilder::new(2, "STORE R1, 8").occupied())
        .build();
    assert!(need_stall_load_use(&slots, true));
}

#[test]
fn stalled_consumer_is_still_inspected() {
    let slots = SlotsBuilder::new()
        .with(Stage::Execute, InFlightBuilder::new(1, "LOAD R1, 4").address(4).occupied())
        .with(Stage::Decode, InFlightBuilder::new(2, "ADD R2, R1, R1").stalled())
        .build();
    assert!(need_stall_load_use(&slots, true));
}

// ══════════════════════════════════════════════════════════
// 2. No stall
// ══════════════════════════════════════════════════════════

#[test]
fn no_stall_when_registers_differ() {
    let slots = SlotsBuilder::new()
        .with(Stage::Execute, InFlightBuilder::new(1, "LOAD R5, 0").address(0).occupied())
        .with(Stage::Decode, InFlightBuilder::new(2, "ADD R3, R1, R2").occupied())
        .build();
    assert!(!need_stall_load_use(&slots, true));
}

#[test]
fn no_stall_when_load_targets_zero_register() {
    let slots = SlotsBuilder::new()
        .with(Stage::Execute, InFlightBuilder::new(1, "LOAD R0, 0").address(0).occupied())
        .with(Stage::Decode, InFlightBuilder::new(2, "ADD R3, R0, R0").occupied())
        .build();
    assert!(!need_stall_load_use(&slots, true));
    assert!(need_stall_load_use(&slots, false), "R0 is ordinary when not hardwired");
}

#[test]
fn no_stall_once_load_reached_memory_access() {
    let slots = SlotsBuilder::new()
        .with(
            Stage::MemoryAccess,
            InFlightBuilder::new(1, "LOAD R5, 0").address(0).result(17).occupied(),
        )
        .with(Stage::Decode, InFlightBuilder::new(2, "ADD R3, R5, R5").occupied())
        .build();
    let report = HazardUnit::new(true).inspect(&slots);
    assert!(!report.stall());
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].resolution, Resolution::Forward { value: 17 });
}

#[test]
fn no_stall_for_faulted_load() {
    let slots = SlotsBuilder::new()
        .with(Stage::MemoryAccess, InFlightBuilder::new(1, "LOAD R5, 999").faulted().occupied())
        .with(Stage::Decode, InFlightBuilder::new(2, "ADD R3, R5, R5").occupied())
        .build();
    assert!(HazardUnit::new(true).inspect(&slots).records.is_empty());
}

#[test]
fn no_stall_with_empty_decode() {
    let slots = SlotsBuilder::new()
        .with(Stage::Execute, InFlightBuilder::new(1, "LOAD R5, 0").address(0).occupied())
        .build();
    assert!(!need_stall_load_use(&slots, true));
}
