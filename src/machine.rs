use std::io::{self, BufRead, Write};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::loops;
use crate::opcode::Opcode;
use crate::program::Program;
use crate::tape::{BoundsPolicy, DEFAULT_TAPE_LEN, Register, Tape};

/// Configuration for a COW machine.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Number of cells on the data tape.
    pub tape_len: usize,
    /// Behaviour when the data pointer leaves the tape.
    pub bounds: BoundsPolicy,
    /// Maximum top-level instructions to dispatch (`None` for unbounded).
    pub step_limit: Option<usize>,
    /// Text written to the output before every character or integer read.
    pub prompt: Option<String>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tape_len: DEFAULT_TAPE_LEN,
            bounds: BoundsPolicy::Fault,
            step_limit: None,
            prompt: None,
        }
    }
}

/// Where the command pointer goes after an instruction.
enum Flow {
    Next,
    Jump(usize),
}

/// The COW execution engine.
///
/// Owns the tape, the register and the command stream for one run. All
/// state is reset at the start of [`Machine::interpret`], so one machine can
/// run several programs in sequence against the same I/O handles.
pub struct Machine<R, W> {
    config: MachineConfig,
    tape: Tape,
    register: Register,
    program: Program,
    cp: usize,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Machine<R, W> {
    pub fn new(config: MachineConfig, input: R, output: W) -> Self {
        let tape = Tape::new(config.tape_len, config.bounds);
        Self {
            config,
            tape,
            register: Register::default(),
            program: Program::default(),
            cp: 0,
            input,
            output,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn register(&self) -> Register {
        self.register
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Command pointer where execution stopped (the failing command after
    /// an error, `program().len()` after a clean halt).
    pub fn command_pointer(&self) -> usize {
        self.cp
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Tokenize `source` and run it to completion.
    ///
    /// Returns the number of instructions dispatched. Any error halts the
    /// run immediately; output written before the failure is not retracted.
    pub fn interpret(&mut self, source: &str) -> Result<usize> {
        self.program = Program::parse(source);
        self.tape = Tape::new(self.config.tape_len, self.config.bounds);
        self.register.clear();
        self.cp = 0;

        debug!(
            commands = self.program.len(),
            tape_len = self.tape.len(),
            bounds = ?self.tape.policy(),
            "program loaded"
        );

        let result = self.run();
        match &result {
            Ok(steps) => debug!(steps, "program halted"),
            Err(e) => debug!(position = self.cp, error = %e, "program failed"),
        }
        result
    }

    fn run(&mut self) -> Result<usize> {
        let mut steps: usize = 0;
        while self.cp < self.program.len() {
            if let Some(limit) = self.config.step_limit.filter(|&limit| steps >= limit) {
                return Err(Error::StepLimitExceeded { limit, position: self.cp });
            }
            steps += 1;

            let op = self.program.commands()[self.cp];
            trace!(cp = self.cp, %op, dp = self.tape.pointer(), cell = self.tape.current(), "dispatch");
            match self.dispatch(op)? {
                Flow::Next => self.cp += 1,
                Flow::Jump(target) => self.cp = target,
            }
        }
        Ok(steps)
    }

    fn dispatch(&mut self, op: Opcode) -> Result<Flow> {
        match op {
            Opcode::LoopEnd => {
                // Jump straight to the loop-start, which re-checks the guard.
                let start = loops::match_backward(self.program.commands(), self.cp)
                    .ok_or(Error::UnmatchedLoop { opcode: op, position: self.cp })?;
                return Ok(Flow::Jump(start));
            }
            Opcode::MovePrev => self.shift(op, -1)?,
            Opcode::MoveNext => self.shift(op, 1)?,
            Opcode::ExecCell => {
                let value = self.tape.current();
                let decoded = Opcode::from_value(value)
                    .filter(|&inner| inner != Opcode::ExecCell)
                    .ok_or(Error::InvalidInstruction { value, position: self.cp })?;
                trace!(cp = self.cp, op = %decoded, "exec-cell");
                match decoded {
                    // The guard is this same cell, holding 7, so it never skips.
                    Opcode::LoopStart => {}
                    Opcode::LoopEnd => {
                        let start = loops::match_backward(self.program.commands(), self.cp)
                            .ok_or(Error::ExecCellUnmatchedLoop { opcode: decoded, position: self.cp })?;
                        return Ok(Flow::Jump(start));
                    }
                    _ => return self.dispatch(decoded),
                }
            }
            Opcode::IoAuto => {
                if self.tape.current() == 0 {
                    self.read_char()?;
                } else {
                    self.write_char()?;
                }
            }
            Opcode::Decrement => self.tape.decrement(),
            Opcode::Increment => self.tape.increment(),
            Opcode::LoopStart => {
                // Resolve even when entering, so an unmatched loop-start
                // fails before its body runs.
                let end = loops::match_forward(self.program.commands(), self.cp)
                    .ok_or(Error::UnmatchedLoop { opcode: op, position: self.cp })?;
                if self.tape.current() == 0 {
                    return Ok(Flow::Jump(end + 1));
                }
            }
            Opcode::ZeroCell => self.tape.set(0),
            Opcode::RegSwap => self.register.swap(self.tape.current_mut()),
            Opcode::PrintInt => {
                let value = self.tape.current();
                self.emit(|out| write!(out, "{value}"))?;
            }
            Opcode::ReadInt => self.read_int()?,
        }
        Ok(Flow::Next)
    }

    fn shift(&mut self, op: Opcode, delta: i64) -> Result<()> {
        self.tape.shift(delta).map_err(|oob| Error::TapeBounds {
            attempted: oob.attempted,
            opcode: op,
            position: self.cp,
        })
    }

    fn write_char(&mut self) -> Result<()> {
        let value = self.tape.current();
        let ch = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(Error::InvalidCodePoint { value, position: self.cp })?;
        self.emit(|out| write!(out, "{ch}"))
    }

    /// Read one line and store its first character. The rest of the line
    /// is discarded, so every character read consumes a whole line. At end
    /// of input the cell keeps its value (always 0 here, since io-auto only
    /// reads then).
    fn read_char(&mut self) -> Result<()> {
        self.prompt()?;
        let position = self.cp;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|source| Error::Io { position, source })?;
        match line.chars().next() {
            Some(ch) => self.tape.set(ch as i64),
            None => debug!(position, "end of input on character read"),
        }
        Ok(())
    }

    fn read_int(&mut self) -> Result<()> {
        self.prompt()?;
        let position = self.cp;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|source| Error::Io { position, source })?;
        let text = line.trim();
        let value = text.parse::<i64>().map_err(|source| Error::InputParse {
            text: text.to_string(),
            position,
            source,
        })?;
        self.tape.set(value);
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        let Some(prompt) = self.config.prompt.take() else {
            return Ok(());
        };
        let result = self.emit(|out| out.write_all(prompt.as_bytes()));
        self.config.prompt = Some(prompt);
        result
    }

    /// Write to the output and flush, so partial output survives a later failure.
    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) -> Result<()> {
        f(&mut self.output)
            .and_then(|()| self.output.flush())
            .map_err(|source| Error::Io { position: self.cp, source })
    }
}
