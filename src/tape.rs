/// Default number of cells on the data tape.
pub const DEFAULT_TAPE_LEN: usize = 30_000;

/// What happens when the data pointer leaves `[0, len)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// The move fails and execution halts.
    #[default]
    Fault,
    /// The pointer wraps modulo the tape length.
    Wrap,
}

/// A move that would have left the tape under [`BoundsPolicy::Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub attempted: i64,
}

/// Fixed-length tape of signed cells with a single data pointer.
///
/// Cell arithmetic wraps at the `i64` range. The pointer always indexes a
/// valid cell: a faulting move leaves it where it was.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<i64>,
    pointer: usize,
    policy: BoundsPolicy,
}

impl Tape {
    /// A zeroed tape. A zero `len` is clamped to one cell.
    pub fn new(len: usize, policy: BoundsPolicy) -> Self {
        Self {
            cells: vec![0; len.max(1)],
            pointer: 0,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape has at least one cell. Provided alongside `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[i64] {
        &self.cells
    }

    #[inline(always)]
    pub fn current(&self) -> i64 {
        self.cells[self.pointer]
    }

    #[inline(always)]
    pub fn current_mut(&mut self) -> &mut i64 {
        &mut self.cells[self.pointer]
    }

    #[inline(always)]
    pub fn set(&mut self, value: i64) {
        self.cells[self.pointer] = value;
    }

    pub fn increment(&mut self) {
        let cell = self.current_mut();
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = self.current_mut();
        *cell = cell.wrapping_sub(1);
    }

    /// Move the data pointer by `delta` cells.
    pub fn shift(&mut self, delta: i64) -> Result<(), OutOfBounds> {
        let len = self.cells.len() as i64;
        let target = self.pointer as i64 + delta;
        match self.policy {
            BoundsPolicy::Wrap => {
                self.pointer = target.rem_euclid(len) as usize;
                Ok(())
            }
            BoundsPolicy::Fault if (0..len).contains(&target) => {
                self.pointer = target as usize;
                Ok(())
            }
            BoundsPolicy::Fault => Err(OutOfBounds { attempted: target }),
        }
    }
}

/// One-slot copy/paste register.
///
/// Holds at most one pending value. [`Register::swap`] copies the cell in
/// when empty and pastes it back (emptying the slot) when occupied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Register(Option<i64>);

impl Register {
    pub fn value(&self) -> Option<i64> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn swap(&mut self, cell: &mut i64) {
        match self.0.take() {
            None => self.0 = Some(*cell),
            Some(held) => *cell = held,
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}
