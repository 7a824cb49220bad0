//! Five-stage pipeline simulator CLI.
//!
//! This binary provides the terminal driver for the simulator. It performs:
//! 1. **Program run:** Load a program file, clock it to completion, and print each cycle.
//! 2. **Interactive session:** Type instructions and step the clock by hand.
//!
//! Exit status for `run`: 0 when the program drains, 1 when the engine faults
//! or the cycle budget runs out, 2 when the program or configuration cannot be loaded.

mod render;
mod repl;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pipesim_core::config::Config;
use pipesim_core::sim::JsonLinesSink;
use pipesim_core::{EngineState, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    author,
    version,
    about = "Cycle-accurate five-stage pipeline simulator",
    long_about = "Run a program through a five-stage in-order pipeline with forwarding and \
                  load-use stalls, or drive the pipeline interactively.\n\nExamples:\n  \
                  pipesim run demos/forwarding.s\n  \
                  pipesim run demos/load_use.s --json > trace.jsonl\n  \
                  pipesim repl --config machine.json"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program file until the pipeline drains.
    Run {
        /// Program file, one instruction per line (`#` and `;` start comments).
        program: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cycle budget (defaults to `general.max_cycles` from the configuration).
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Delay between cycles, in milliseconds.
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,

        /// Emit one JSON snapshot per cycle on stdout instead of text panels.
        #[arg(long)]
        json: bool,

        /// Print only the final state and statistics.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive session: enter instructions and step the clock.
    Repl {
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            program,
            config,
            max_cycles,
            interval_ms,
            json,
            quiet,
        } => cmd_run(&RunOptions {
            program,
            config,
            max_cycles,
            interval: Duration::from_millis(interval_ms),
            json,
            quiet,
        }),
        Commands::Repl { config } => load_config(config.as_deref())
            .and_then(|config| repl::run(&config))
            .map(|()| ExitCode::SUCCESS),
    };

    result.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::from(2)
    })
}

/// Installs the `tracing` subscriber. Logs go to stderr so JSON traces on stdout stay clean.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Reads a configuration file, or returns the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config `{}`", path.display()))?;
    let config = Config::from_json(&text)
        .with_context(|| format!("invalid config `{}`", path.display()))?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

struct RunOptions {
    program: PathBuf,
    config: Option<PathBuf>,
    max_cycles: Option<u64>,
    interval: Duration,
    json: bool,
    quiet: bool,
}

fn cmd_run(opts: &RunOptions) -> Result<ExitCode> {
    let config = load_config(opts.config.as_deref())?;
    let source = std::fs::read_to_string(&opts.program)
        .with_context(|| format!("could not read program `{}`", opts.program.display()))?;

    let mut sim = Simulator::new(&config).context("could not build simulator")?;
    let _ = sim
        .load_program(&source)
        .with_context(|| format!("could not load `{}`", opts.program.display()))?;

    if opts.json {
        sim.attach_sink(Box::new(JsonLinesSink::new(io::stdout())));
    }
    let show_cycles = !opts.json && !opts.quiet;
    let budget = opts.max_cycles.unwrap_or(config.general.max_cycles);

    let mut state = sim.state();
    for _ in 0..budget {
        state = sim.advance_cycle();
        if show_cycles {
            println!("{}", render::snapshot(&sim.snapshot()));
        }
        if state != EngineState::Running {
            break;
        }
        if !opts.interval.is_zero() {
            thread::sleep(opts.interval);
        }
    }

    let report = |text: String| {
        if opts.json {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    };
    if opts.quiet && !opts.json {
        report(render::snapshot(&sim.snapshot()));
    }
    report(sim.stats().to_string());

    Ok(match state {
        EngineState::Drained => ExitCode::SUCCESS,
        EngineState::Faulted => {
            if let Some(fault) = sim.engine().fatal_fault() {
                error!(cycle = fault.cycle, seq = fault.seq, "{}", fault.error);
            }
            ExitCode::FAILURE
        }
        EngineState::Running => {
            warn!(budget, "cycle budget exhausted before the pipeline drained");
            ExitCode::FAILURE
        }
    })
}
