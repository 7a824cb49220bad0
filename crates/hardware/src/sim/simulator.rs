//! Simulator: owns the pipeline engine and the trace sinks side-by-side.
//!
//! The engine knows nothing about observers. The simulator drives it, captures
//! a snapshot after every cycle that actually ran, and hands that snapshot to
//! each attached sink. It is also the text-facing entry point: instructions
//! and whole programs go through the decoder here before reaching the queue.

use std::fmt;

use tracing::info;

use crate::common::error::{ConfigError, DecodeError, LoadError};
use crate::config::Config;
use crate::core::pipeline::engine::{EngineState, PipelineEngine};
use crate::isa::decode::decode;
use crate::sim::loader::parse_program;
use crate::sim::trace::{Snapshot, TraceSink, TracingSink};
use crate::stats::SimStats;

/// Top-level simulator: pipeline engine + trace sinks.
pub struct Simulator {
    engine: PipelineEngine,
    sinks: Vec<Box<dyn TraceSink>>,
}

impl Simulator {
    /// Creates a simulator for the given configuration.
    ///
    /// When `general.trace_cycles` is set, a [`TracingSink`] is attached.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] reported by [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let engine = PipelineEngine::new(config)?;
        let mut sinks: Vec<Box<dyn TraceSink>> = Vec::new();
        if config.general.trace_cycles {
            sinks.push(Box::new(TracingSink));
        }
        info!(
            registers = config.registers.count,
            memory = config.memory.size,
            "simulator ready"
        );
        Ok(Self { engine, sinks })
    }

    /// Decodes one instruction and appends it to the fetch queue.
    ///
    /// # Returns
    ///
    /// The sequence number assigned to the instruction.
    ///
    /// # Errors
    ///
    /// A [`DecodeError`] if the text is malformed; the queue is left unchanged.
    pub fn insert(&mut self, text: &str) -> Result<u64, DecodeError> {
        let decoded = decode(text, self.engine.registers().len())?;
        Ok(self.engine.enqueue(decoded))
    }

    /// Decodes a whole program and appends it to the fetch queue.
    ///
    /// # Returns
    ///
    /// The sequence numbers assigned, in program order.
    ///
    /// # Errors
    ///
    /// A [`LoadError`] for the first bad line; nothing is enqueued in that case.
    pub fn load_program(&mut self, source: &str) -> Result<Vec<u64>, LoadError> {
        let program = parse_program(source, self.engine.registers().len())?;
        let seqs: Vec<u64> = program.into_iter().map(|d| self.engine.enqueue(d)).collect();
        info!(count = seqs.len(), "program loaded");
        Ok(seqs)
    }

    /// Advances the simulator by one clock cycle and notifies the sinks.
    ///
    /// Sinks are only notified when a cycle actually ran; an idle drained
    /// engine or a faulted one produces no snapshot.
    pub fn advance_cycle(&mut self) -> EngineState {
        let before = self.engine.cycle();
        let state = self.engine.advance_cycle();
        if self.engine.cycle() != before {
            let snapshot = Snapshot::capture(&self.engine);
            for sink in &mut self.sinks {
                sink.on_cycle(&snapshot);
            }
        }
        state
    }

    /// Advances until the engine stops running or `max_cycles` cycles have run.
    ///
    /// # Returns
    ///
    /// The final engine state. `Running` means the budget ran out.
    pub fn run(&mut self, max_cycles: u64) -> EngineState {
        for _ in 0..max_cycles {
            let state = self.advance_cycle();
            if state != EngineState::Running {
                return state;
            }
        }
        self.engine.state()
    }

    /// Runs with the cycle budget from the configuration.
    pub fn run_to_completion(&mut self) -> EngineState {
        self.run(self.engine.config().general.max_cycles)
    }

    /// Captures the current machine state without advancing it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.engine)
    }

    /// Registers an observer for every subsequent cycle.
    pub fn attach_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sinks.push(sink);
    }

    /// Restores the configured initial state. Attached sinks are kept.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Current engine state.
    pub const fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Number of cycles executed.
    pub const fn cycle(&self) -> u64 {
        self.engine.cycle()
    }

    /// Performance counters.
    pub const fn stats(&self) -> &SimStats {
        self.engine.stats()
    }

    /// Read-only access to the engine.
    pub const fn engine(&self) -> &PipelineEngine {
        &self.engine
    }
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("engine", &self.engine)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
