//! Loop delimiter matching.
//!
//! `MOO` (loop-start) and `moo` (loop-end) pair up by nesting depth, the same
//! way brackets do. Matching scans the command sequence from the given index
//! with a depth counter; a partner is found where the depth returns to zero.
//!
//! The scans do not require `commands[index]` to be a loop token. When `mOO`
//! executes a loop opcode from a cell, the index is the `mOO` itself and the
//! scan resolves against whatever loop encloses or follows it.

use crate::opcode::Opcode;

/// Find the loop-end matching a loop-start at `index`, scanning forward
/// from `index + 1`. Returns `None` if the sequence ends first.
pub fn match_forward(commands: &[Opcode], index: usize) -> Option<usize> {
    let mut depth: usize = 1;
    for (i, &op) in commands.iter().enumerate().skip(index.saturating_add(1)) {
        match op {
            Opcode::LoopStart => depth += 1,
            Opcode::LoopEnd => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the loop-start matching a loop-end at `index`, scanning backward
/// from `index - 1`. Returns `None` if the sequence start is reached first.
pub fn match_backward(commands: &[Opcode], index: usize) -> Option<usize> {
    let end = index.min(commands.len());
    let mut depth: usize = 1;
    for i in (0..end).rev() {
        match commands[i] {
            Opcode::LoopEnd => depth += 1,
            Opcode::LoopStart => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Partner of the loop token at `index`, or `None` if it is unmatched or
/// not a loop token at all.
pub fn find_partner(commands: &[Opcode], index: usize) -> Option<usize> {
    match commands.get(index)? {
        Opcode::LoopStart => match_forward(commands, index),
        Opcode::LoopEnd => match_backward(commands, index),
        _ => None,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Build a balanced sequence from a nesting plan: `Some(true)` opens a
    /// loop, `Some(false)` closes one if any is open, `None` is a body op.
    fn balanced(plan: Vec<Option<bool>>) -> Vec<Opcode> {
        let mut out = Vec::new();
        let mut open = 0usize;
        for step in plan {
            match step {
                Some(true) => {
                    out.push(Opcode::LoopStart);
                    open += 1;
                }
                Some(false) if open > 0 => {
                    out.push(Opcode::LoopEnd);
                    open -= 1;
                }
                _ => out.push(Opcode::Increment),
            }
        }
        out.extend(std::iter::repeat_n(Opcode::LoopEnd, open));
        out
    }

    proptest! {
        #[test]
        fn partner_round_trips(plan in prop::collection::vec(prop::option::of(any::<bool>()), 0..128)) {
            let commands = balanced(plan);
            for (i, &op) in commands.iter().enumerate() {
                if matches!(op, Opcode::LoopStart | Opcode::LoopEnd) {
                    let partner = find_partner(&commands, i);
                    prop_assert!(partner.is_some());
                    let partner = partner.unwrap();
                    prop_assert_ne!(commands[partner], op);
                    prop_assert_eq!(find_partner(&commands, partner), Some(i));
                }
            }
        }

        #[test]
        fn matching_never_panics(ops in prop::collection::vec(0i64..12, 0..64), index in 0usize..80) {
            let commands: Vec<Opcode> = ops.into_iter().filter_map(Opcode::from_value).collect();
            let _ = match_forward(&commands, index);
            let _ = match_backward(&commands, index);
            let _ = find_partner(&commands, index);
        }
    }
}
