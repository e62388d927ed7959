use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cowlang::tape::DEFAULT_TAPE_LEN;
use cowlang::{BoundsPolicy, Machine, MachineConfig, Program};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cowlang", about = "Interpreter for the COW esoteric language")]
struct Cli {
    /// Source file to interpret.
    file: PathBuf,

    /// Number of cells on the data tape.
    #[arg(long, default_value_t = DEFAULT_TAPE_LEN, value_parser = parse_tape_len)]
    tape_len: usize,

    /// Wrap the data pointer around the tape ends instead of failing.
    #[arg(long)]
    wrap: bool,

    /// Abort after this many instructions.
    #[arg(long)]
    step_limit: Option<usize>,

    /// Text printed before every character or integer read (e.g. ">>>").
    #[arg(long)]
    prompt: Option<String>,

    /// Print the filtered command listing instead of running the program.
    #[arg(long)]
    disassemble: bool,
}

/// Parse a tape length, which must be at least one cell.
fn parse_tape_len(s: &str) -> Result<usize, String> {
    let n = s.parse::<usize>().map_err(|e| format!("Invalid tape length: {e}"))?;
    if n == 0 {
        return Err("Tape length must be positive".to_string());
    }
    Ok(n)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("cannot read source file '{}'", cli.file.display()))?;

    if cli.disassemble {
        print!("{}", Program::parse(&source).disassemble());
        return Ok(());
    }

    let config = MachineConfig {
        tape_len: cli.tape_len,
        bounds: if cli.wrap { BoundsPolicy::Wrap } else { BoundsPolicy::Fault },
        step_limit: cli.step_limit,
        prompt: cli.prompt,
    };

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut machine = Machine::new(config, stdin, stdout);
    let steps = machine
        .interpret(&source)
        .with_context(|| format!("execution of '{}' failed", cli.file.display()))?;
    info!(steps, "done");
    Ok(())
}
