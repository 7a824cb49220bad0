//! Cycle-Exact Pipeline Scenarios.
//!
//! Drives short programs through the public simulator API and checks where
//! every instruction is in every cycle, what was forwarded, and when the
//! pipeline stalls.

use pipesim_core::EngineState;
use pipesim_core::common::reg::RegId;
use pipesim_core::core::pipeline::hazards::Resolution;
use pipesim_core::core::pipeline::latches::Stage;
use pipesim_core::sim::Occupant;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::harness::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Independent instructions
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[case(12)]
fn independent_instructions_take_n_plus_four_cycles(#[case] n: usize) {
    let lines = vec!["ADD R1, R2, R3"; n];
    let mut ctx = TestContext::new().program(&lines);
    assert_eq!(ctx.run(), EngineState::Drained);
    assert_eq!(ctx.sim.cycle(), 5 + n as u64 - 1);
    assert_eq!(ctx.stall_cycles(), 0);
    assert_eq!(ctx.sim.stats().instructions_retired, n as u64);
}

#[test]
fn stage_progression_is_one_stage_per_cycle() {
    let ctx = {
        let mut ctx = TestContext::new().program(&["NOP", "NOP"]);
        let _ = ctx.run();
        ctx
    };
    for (seq, offset) in [(1, 0), (2, 1)] {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(
                ctx.cycle_in(seq, *stage),
                Some(1 + offset + i as u64),
                "#{seq} in {stage}"
            );
        }
    }
}

// ══════════════════════════════════════════════════════════
// 2. Forwarding
// ══════════════════════════════════════════════════════════

#[test]
fn add_then_dependent_sub_forwards_without_stall() {
    let mut ctx = TestContext::with_registers(&[(2, 10), (3, 20), (5, 3)])
        .program(&["ADD R1, R2, R3", "SUB R4, R1, R5"]);
    assert_eq!(ctx.run(), EngineState::Drained);

    assert_eq!(ctx.sim.cycle(), 6);
    assert_eq!(ctx.stall_cycles(), 0);
    assert_eq!(ctx.reg(1), 30);
    assert_eq!(ctx.reg(4), 27);

    // SUB enters Execute the cycle right after ADD.
    assert_eq!(ctx.cycle_in(1, Stage::Execute), Some(3));
    assert_eq!(ctx.cycle_in(2, Stage::Execute), Some(4));

    let hazards = ctx.at(4).hazards;
    assert_eq!(hazards.len(), 1);
    assert_eq!(hazards[0].producer, Stage::Execute);
    assert_eq!(hazards[0].producer_seq, 1);
    assert_eq!(hazards[0].consumer_seq, 2);
    assert_eq!(hazards[0].reg, RegId(1));
    assert_eq!(hazards[0].resolution, Resolution::Forward { value: 30 });
    assert_eq!(ctx.sim.stats().forwards, 1);
}

#[test]
fn forward_from_memory_access_over_a_gap() {
    let mut ctx = TestContext::new().program(&["ADDI R1, R0, 7", "NOP", "ADD R2, R1, R1"]);
    let _ = ctx.run();
    assert_eq!(ctx.reg(2), 14);
    let hazards = ctx.at(5).hazards;
    assert_eq!(hazards.len(), 1);
    assert_eq!(hazards[0].producer, Stage::MemoryAccess);
}

#[test]
fn committed_value_needs_no_forwarding() {
    let mut ctx =
        TestContext::new().program(&["ADDI R1, R0, 7", "NOP", "NOP", "ADD R2, R1, R1"]);
    let _ = ctx.run();
    assert_eq!(ctx.reg(2), 14);
    assert!(ctx.snapshots().iter().all(|s| s.hazards.is_empty()));
    assert_eq!(ctx.sim.stats().forwards, 0);
}

#[test]
fn youngest_write_is_forwarded() {
    let mut ctx = TestContext::new().program(&[
        "ADDI R1, R0, 1",
        "ADDI R1, R0, 2",
        "ADD R2, R1, R0",
    ]);
    let _ = ctx.run();
    assert_eq!(ctx.reg(1), 2);
    assert_eq!(ctx.reg(2), 2);
}

#[test]
fn store_data_is_forwarded() {
    let mut ctx = TestContext::new().program(&["ADDI R2, R0, 0x1FF", "STORE R2, 9", "LOAD R3, 9"]);
    assert_eq!(ctx.run(), EngineState::Drained);
    assert_eq!(ctx.mem(9), 0xFF, "store keeps the low byte");
    assert_eq!(ctx.reg(3), 255, "load zero-extends");
}

// ══════════════════════════════════════════════════════════
// 3. Load-use stalls
// ══════════════════════════════════════════════════════════

#[test]
fn load_then_use_stalls_exactly_once() {
    let mut ctx = TestContext::with_memory(&[(8, 42)]).program(&["LOAD R1, 8", "ADD R2, R1, R1"]);
    assert_eq!(ctx.run(), EngineState::Drained);

    assert_eq!(ctx.sim.cycle(), 7);
    assert_eq!(ctx.stall_cycles(), 1);
    assert_eq!(ctx.reg(1), 42);
    assert_eq!(ctx.reg(2), 84);

    let stall = ctx.at(4);
    assert_eq!(stall.occupant(Stage::MemoryAccess).seq(), Some(1));
    assert_eq!(*stall.occupant(Stage::Execute), Occupant::Bubble);
    assert_eq!(
        *stall.occupant(Stage::Decode),
        Occupant::Stalled {
            seq: 2,
            text: "ADD R2, R1, R1".into()
        }
    );
    assert_eq!(stall.hazards[0].resolution, Resolution::Stall);

    let resolved = ctx.at(5);
    assert_eq!(resolved.occupant(Stage::Execute).seq(), Some(2));
    assert_eq!(resolved.hazards[0].producer, Stage::MemoryAccess);
    assert_eq!(resolved.hazards[0].resolution, Resolution::Forward { value: 42 });

    let stats = ctx.sim.stats();
    assert_eq!((stats.stalls_data, stats.bubbles), (1, 1));
}

#[test]
fn stall_holds_fetch_and_the_queue() {
    let mut ctx = TestContext::with_memory(&[(0, 1)]).program(&[
        "LOAD R1, 0",
        "ADD R2, R1, R0",
        "NOP",
        "NOP",
    ]);
    assert_eq!(ctx.run(), EngineState::Drained);

    let stall = ctx.at(4);
    assert_eq!(
        *stall.occupant(Stage::Fetch),
        Occupant::Stalled {
            seq: 3,
            text: "NOP".into()
        }
    );
    assert_eq!(stall.queued, 1);
    assert_eq!(ctx.sim.cycle(), 4 + 4 + 1);
}

#[test]
fn load_followed_by_independent_instruction_does_not_stall() {
    let mut ctx = TestContext::new().program(&["LOAD R1, 0", "ADD R2, R3, R4", "ADD R5, R1, R1"]);
    let _ = ctx.run();
    assert_eq!(ctx.stall_cycles(), 0);
    assert_eq!(ctx.sim.cycle(), 7);
}

// ══════════════════════════════════════════════════════════
// 4. Ordering properties
// ══════════════════════════════════════════════════════════

fn arbitrary_program() -> impl Strategy<Value = Vec<String>> {
    let reg = || (0u8..8).prop_map(|n| format!("R{n}"));
    let inst = prop_oneof![
        Just("NOP".to_string()),
        (reg(), reg(), reg()).prop_map(|(d, a, b)| format!("ADD {d}, {a}, {b}")),
        (reg(), reg(), reg()).prop_map(|(d, a, b)| format!("XOR {d}, {a}, {b}")),
        (reg(), reg(), -8i64..8).prop_map(|(d, a, i)| format!("ADDI {d}, {a}, {i}")),
        (reg(), 0i64..300).prop_map(|(d, a)| format!("LOAD {d}, {a}")),
        (reg(), 0i64..300).prop_map(|(s, a)| format!("STORE {s}, {a}")),
    ];
    prop::collection::vec(inst, 1..24)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_program_drains_in_order(program in arbitrary_program()) {
        let lines: Vec<&str> = program.iter().map(String::as_str).collect();
        let mut ctx = TestContext::new().program(&lines);
        prop_assert_eq!(ctx.run(), EngineState::Drained);

        let n = program.len() as u64;
        let order = ctx.retire_order();
        prop_assert!(order.windows(2).all(|w| w[0] < w[1]));

        let faults = ctx.sim.stats().address_faults;
        prop_assert_eq!(order.len() as u64 + faults, n);

        let stalls = ctx.stall_cycles() as u64;
        prop_assert_eq!(ctx.sim.cycle(), n + 4 + stalls);
        prop_assert_eq!(ctx.log.len() as u64, ctx.sim.cycle());
        prop_assert_eq!(ctx.reg(0), 0);
    }

    #[test]
    fn independent_programs_never_stall(n in 1usize..40) {
        let lines = vec!["XOR R1, R2, R3"; n];
        let mut ctx = TestContext::new().program(&lines);
        let _ = ctx.run();
        prop_assert_eq!(ctx.stall_cycles(), 0);
        prop_assert_eq!(ctx.sim.cycle(), n as u64 + 4);
    }
}
