//! Interactive session.
//!
//! Each input line is either a command or instruction text. Instruction text
//! is decoded and appended to the fetch queue; the clock only moves when the
//! user asks for it, so insertion never lands in the middle of a cycle.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use pipesim_core::config::Config;
use pipesim_core::{EngineState, Simulator};

use crate::render;

const HELP: &str = "\
commands:
  step [n]   advance n cycles (default 1)
  run        advance until the pipeline drains or faults
  show       print the current snapshot
  stats      print statistics
  reset      restore the initial machine state
  help       show this text
  quit       leave the session
anything else is decoded as an instruction and queued, e.g. `ADD R1, R2, R3`";

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Step(u64),
    Run,
    Show,
    Stats,
    Reset,
    Help,
    Quit,
    Insert(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Result<Self, String> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Empty);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "step" | "s" => match words.next() {
                None => Self::Step(1),
                Some(n) => Self::Step(
                    n.parse()
                        .map_err(|_| format!("`{n}` is not a cycle count"))?,
                ),
            },
            "run" | "r" => Self::Run,
            "show" => Self::Show,
            "stats" => Self::Stats,
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Ok(Self::Insert(line)),
        };

        match words.next() {
            Some(extra) => Err(format!("unexpected argument `{extra}`")),
            None => Ok(command),
        }
    }
}

/// Runs the session until `quit` or end of input.
pub fn run(config: &Config) -> Result<()> {
    let mut sim = Simulator::new(config).context("could not build simulator")?;
    let mut stdout = io::stdout();
    let mut input = io::stdin().lock();

    println!("pipesim interactive session; type `help` for commands");
    loop {
        print!("pipesim> ");
        stdout.flush().context("could not write prompt")?;

        let mut line = String::new();
        if input.read_line(&mut line).context("could not read input")? == 0 {
            break;
        }

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(&mut sim, command),
            Err(message) => println!("error: {message}"),
        }
    }
    Ok(())
}

fn execute(sim: &mut Simulator, command: Command<'_>) {
    match command {
        Command::Step(n) => {
            for _ in 0..n {
                let before = sim.cycle();
                let state = sim.advance_cycle();
                if sim.cycle() == before {
                    println!("pipeline {state:?}; nothing to do");
                    break;
                }
                println!("{}", render::snapshot(&sim.snapshot()));
                if state == EngineState::Faulted {
                    break;
                }
            }
        }
        Command::Run => {
            let budget = sim.engine().config().general.max_cycles;
            let state = sim.run(budget);
            println!("{}", render::snapshot(&sim.snapshot()));
            println!("stopped: {state:?} after {} cycles", sim.cycle());
        }
        Command::Show => println!("{}", render::snapshot(&sim.snapshot())),
        Command::Stats => println!("{}", sim.stats()),
        Command::Reset => {
            sim.reset();
            println!("reset");
        }
        Command::Help => println!("{HELP}"),
        Command::Insert(text) => match sim.insert(text) {
            Ok(seq) => println!("queued #{seq}"),
            Err(e) => println!("error: {e}"),
        },
        Command::Empty | Command::Quit => {}
    }
}
