use std::fmt;

/// The twelve COW instructions.
///
/// The discriminant of each variant is its opcode number, which is also the
/// position of its mnemonic in [`Opcode::MNEMONICS`]. Cell values in `0..=11`
/// decode to the same opcodes when run through `mOO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    LoopEnd = 0,
    MovePrev = 1,
    MoveNext = 2,
    ExecCell = 3,
    IoAuto = 4,
    Decrement = 5,
    Increment = 6,
    LoopStart = 7,
    ZeroCell = 8,
    RegSwap = 9,
    PrintInt = 10,
    ReadInt = 11,
}

impl Opcode {
    /// Every opcode, in opcode order.
    pub const ALL: [Opcode; 12] = [
        Opcode::LoopEnd,
        Opcode::MovePrev,
        Opcode::MoveNext,
        Opcode::ExecCell,
        Opcode::IoAuto,
        Opcode::Decrement,
        Opcode::Increment,
        Opcode::LoopStart,
        Opcode::ZeroCell,
        Opcode::RegSwap,
        Opcode::PrintInt,
        Opcode::ReadInt,
    ];

    /// Source tokens, in opcode order. Matching is case-sensitive.
    pub const MNEMONICS: [&'static str; 12] = [
        "moo", "mOo", "moO", "mOO", "Moo", "MOo", "MoO", "MOO", "OOO", "MMM", "OOM", "oom",
    ];

    /// Look up the opcode for an exact source token.
    pub fn from_mnemonic(token: &str) -> Option<Opcode> {
        Self::MNEMONICS
            .iter()
            .position(|&m| m == token)
            .map(|i| Self::ALL[i])
    }

    /// Decode a cell value as an opcode number.
    pub fn from_value(value: i64) -> Option<Opcode> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    #[inline(always)]
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn mnemonic(self) -> &'static str {
        Self::MNEMONICS[self as usize]
    }

    /// Descriptive name used in listings and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::LoopEnd => "loop-end",
            Opcode::MovePrev => "move-prev",
            Opcode::MoveNext => "move-next",
            Opcode::ExecCell => "exec-cell",
            Opcode::IoAuto => "io-auto",
            Opcode::Decrement => "decrement",
            Opcode::Increment => "increment",
            Opcode::LoopStart => "loop-start",
            Opcode::ZeroCell => "zero-cell",
            Opcode::RegSwap => "reg-swap",
            Opcode::PrintInt => "print-int",
            Opcode::ReadInt => "read-int",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_follow_mnemonic_order() {
        for (i, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.value() as usize, i);
            assert_eq!(Opcode::from_mnemonic(Opcode::MNEMONICS[i]), Some(*op));
        }
    }

    #[test]
    fn test_mnemonics_are_case_sensitive() {
        assert_eq!(Opcode::from_mnemonic("MOO"), Some(Opcode::LoopStart));
        assert_eq!(Opcode::from_mnemonic("moo"), Some(Opcode::LoopEnd));
        assert_eq!(Opcode::from_mnemonic("mOO"), Some(Opcode::ExecCell));
        assert_eq!(Opcode::from_mnemonic("MoO "), None);
        assert_eq!(Opcode::from_mnemonic("OOm"), None);
        assert_eq!(Opcode::from_mnemonic(""), None);
    }

    #[test]
    fn test_from_value_range() {
        assert_eq!(Opcode::from_value(0), Some(Opcode::LoopEnd));
        assert_eq!(Opcode::from_value(11), Some(Opcode::ReadInt));
        assert_eq!(Opcode::from_value(12), None);
        assert_eq!(Opcode::from_value(-1), None);
        assert_eq!(Opcode::from_value(i64::MAX), None);
    }

    #[test]
    fn test_display_is_mnemonic() {
        assert_eq!(Opcode::RegSwap.to_string(), "MMM");
        assert_eq!(Opcode::RegSwap.name(), "reg-swap");
    }
}
