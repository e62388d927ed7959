use crate::opcode::Opcode;

/// A tokenized COW program: the ordered opcodes that survived filtering.
///
/// Source is split on whitespace and every token that is not exactly one of
/// the twelve mnemonics is dropped, so anything else acts as a comment. The
/// command sequence is fixed once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    commands: Vec<Opcode>,
}

impl Program {
    /// Tokenize and filter `source`. Never fails; an empty result is valid.
    pub fn parse(source: &str) -> Self {
        let commands = source
            .split_whitespace()
            .filter_map(Opcode::from_mnemonic)
            .collect();
        Self { commands }
    }

    pub fn commands(&self) -> &[Opcode] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pretty-print the command sequence for human inspection, one command
    /// per line, indented by loop nesting.
    pub fn disassemble(&self) -> String {
        let width = self.commands.len().saturating_sub(1).to_string().len();
        let mut out = String::new();
        let mut depth: usize = 0;
        for (i, &op) in self.commands.iter().enumerate() {
            if op == Opcode::LoopEnd {
                depth = depth.saturating_sub(1);
            }
            out.push_str(&format!(
                "{i:>width$}  {:indent$}{op}  {}\n",
                "",
                op.name(),
                indent = depth * 2
            ));
            if op == Opcode::LoopStart {
                depth += 1;
            }
        }
        out
    }
}

impl From<Vec<Opcode>> for Program {
    fn from(commands: Vec<Opcode>) -> Self {
        Self { commands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Opcode::*;

    #[test]
    fn test_parse_maps_mnemonics_in_order() {
        let program = Program::parse("moo mOo moO mOO Moo MOo MoO MOO OOO MMM OOM oom");
        assert_eq!(program.commands(), &Opcode::ALL);
    }

    #[test]
    fn test_comments_are_dropped() {
        let program = Program::parse("hello moo world OOO");
        assert_eq!(program, Program::parse("moo OOO"));
        assert_eq!(program.commands(), &[LoopEnd, ZeroCell]);
    }

    #[test]
    fn test_any_whitespace_separates() {
        let program = Program::parse("MoO\tMoO\n\nOOM\r\n  ");
        assert_eq!(program.commands(), &[Increment, Increment, PrintInt]);
    }

    #[test]
    fn test_glued_tokens_are_not_split() {
        // "MoOMoO" is one token and not a mnemonic.
        let program = Program::parse("MoOMoO MoO, MoO");
        assert_eq!(program.commands(), &[Increment]);
    }

    #[test]
    fn test_empty_source() {
        assert!(Program::parse("").is_empty());
        assert!(Program::parse("   just some words\n").is_empty());
    }

    #[test]
    fn test_disassemble_indents_loops() {
        let program = Program::parse("MoO MOO OOM moo");
        let listing = program.disassemble();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "0  MoO  increment");
        assert_eq!(lines[1], "1  MOO  loop-start");
        assert_eq!(lines[2], "2    OOM  print-int");
        assert_eq!(lines[3], "3  moo  loop-end");
    }

    #[test]
    fn test_disassemble_unbalanced_end_does_not_underflow() {
        let listing = Program::parse("moo moo MoO").disassemble();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines, ["0  moo  loop-end", "1  moo  loop-end", "2  MoO  increment"]);
    }
}
