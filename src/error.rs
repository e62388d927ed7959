//! Interpreter errors

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

use crate::opcode::Opcode;

/// Interpreter result type
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal interpreter errors. `position` is always the command pointer of the
/// top-level instruction that was executing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("mOO at command {position} cannot execute cell value {value}")]
    InvalidInstruction { value: i64, position: usize },

    #[error("unmatched {opcode} ({}) at command {position}", .opcode.name())]
    UnmatchedLoop { opcode: Opcode, position: usize },

    #[error("mOO at command {position} executed {opcode} ({}) with no matching loop", .opcode.name())]
    ExecCellUnmatchedLoop { opcode: Opcode, position: usize },

    #[error("cannot parse {text:?} as an integer at command {position}")]
    InputParse {
        text: String,
        position: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("{opcode} at command {position} moved the data pointer to {attempted}, outside the tape")]
    TapeBounds {
        attempted: i64,
        opcode: Opcode,
        position: usize,
    },

    #[error("cell value {value} at command {position} is not a character")]
    InvalidCodePoint { value: i64, position: usize },

    #[error("step limit of {limit} exceeded at command {position}")]
    StepLimitExceeded { limit: usize, position: usize },

    #[error("i/o error at command {position}")]
    Io {
        position: usize,
        #[source]
        source: io::Error,
    },
}
