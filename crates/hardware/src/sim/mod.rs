//! Simulation driver, program loading, and cycle tracing.
//!
//! Provides the [`Simulator`] facade that decodes instruction text, drives
//! the pipeline engine cycle by cycle, and publishes snapshots to trace sinks.

/// Multi-line program parsing.
pub mod loader;

/// Top-level simulator facade.
pub mod simulator;

/// Cycle snapshots and trace sinks.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{JsonLinesSink, Occupant, Snapshot, SnapshotLog, StageView, TraceSink, TracingSink};
