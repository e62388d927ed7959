pub mod error;
pub mod loops;
pub mod machine;
pub mod opcode;
pub mod program;
pub mod tape;

use std::io::{BufRead, Write};

pub use error::{Error, Result};
pub use machine::{Machine, MachineConfig};
pub use opcode::Opcode;
pub use program::Program;
pub use tape::BoundsPolicy;

/// Run a COW program with the default configuration.
///
/// Returns the number of instructions dispatched.
pub fn interpret<R: BufRead, W: Write>(source: &str, input: R, output: W) -> Result<usize> {
    Machine::new(MachineConfig::default(), input, output).interpret(source)
}
