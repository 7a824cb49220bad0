//! Trace sinks.

use mockall::Sequence;
use pipesim_core::EngineState;
use pipesim_core::sim::{JsonLinesSink, Snapshot, SnapshotLog, TraceSink, TracingSink};

use crate::common::harness::TestContext;
use crate::common::mocks::MockSink;

#[test]
fn sink_sees_one_snapshot_per_cycle_in_order() {
    let mut ctx = TestContext::new().program(&["NOP", "NOP"]);
    let mut sink = MockSink::new();
    let mut seq = Sequence::new();
    for cycle in 1..=6 {
        let _ = sink
            .expect_on_cycle()
            .withf(move |s: &Snapshot| s.cycle == cycle)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
    }
    ctx.sim.attach_sink(Box::new(sink));

    assert_eq!(ctx.run(), EngineState::Drained);
    // Idle advances must not reach the sink.
    let _ = ctx.sim.advance_cycle();
    let _ = ctx.sim.advance_cycle();
}

#[test]
fn final_snapshot_reports_drained() {
    let mut ctx = TestContext::new();
    let mut sink = MockSink::new();
    let _ = sink
        .expect_on_cycle()
        .withf(|s: &Snapshot| s.state == EngineState::Running)
        .times(4)
        .return_const(());
    let _ = sink
        .expect_on_cycle()
        .withf(|s: &Snapshot| s.state == EngineState::Drained && s.retired == Some(1))
        .times(1)
        .return_const(());
    ctx.sim.attach_sink(Box::new(sink));
    let _ = ctx.sim.insert("NOP").unwrap();
    let _ = ctx.run();
}

#[test]
fn snapshot_log_clones_share_entries() {
    let log = SnapshotLog::new();
    let mut ctx = TestContext::new().program(&["NOP"]);
    ctx.sim.attach_sink(Box::new(log.clone()));
    let _ = ctx.run();
    assert_eq!(log.len(), 5);
    assert_eq!(log.snapshots(), ctx.log.snapshots());
    let view = log.clone();
    log.clear();
    assert!(view.is_empty());
    assert_eq!(ctx.log.len(), 5);
}

#[test]
fn json_lines_sink_writes_one_object_per_cycle() {
    let ctx = {
        let mut ctx = TestContext::new().program(&["ADDI R1, R0, 1"]);
        let _ = ctx.run();
        ctx
    };

    let mut sink = JsonLinesSink::new(Vec::new());
    for snap in ctx.snapshots() {
        sink.on_cycle(&snap);
    }
    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["cycle"], i as u64 + 1);
    }
}

#[test]
fn json_lines_sink_survives_write_errors() {
    struct Broken;
    impl std::io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let mut ctx = TestContext::new().program(&["NOP"]);
    ctx.sim.attach_sink(Box::new(JsonLinesSink::new(Broken)));
    assert_eq!(ctx.run(), EngineState::Drained);
}

#[test]
fn tracing_sink_accepts_snapshots() {
    let mut ctx = TestContext::new().program(&["NOP"]);
    ctx.sim.attach_sink(Box::new(TracingSink));
    assert_eq!(ctx.run(), EngineState::Drained);
}
