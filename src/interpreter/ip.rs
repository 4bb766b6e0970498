//! Instruction pointers
//!
//! An [`InstructionPointer`] is one execution cursor: where it is, where it is
//! heading, the origin used for `g`/`p`/`i`/`o`, its own stack-stack and its
//! own fingerprint dispatch tables. Nothing in here is shared with other IPs;
//! only funge-space is.
//!
//! # Motion
//!
//! [`advance`](InstructionPointer::advance) moves one step along the delta
//! using Lahey-space wrapping: when the step would leave the bounding rectangle
//! of funge-space the IP reappears at the far end of its line of travel, as if
//! it had flown through infinite empty space and come back from the other side.
//!
//! ```text
//!   bounds: x in 0..=4, IP at x=4 heading east
//!   next = 5 (outside)  →  back up along the line  →  x=0
//! ```

use super::dispatch::OpcodeManager;
use crate::memory::{Cell, FungeSpace, Rect, Stack, StackStack, Vector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPointer {
    /// Unique id, reported by sysinfo request 8
    pub id: Cell,
    pub position: Vector,
    pub delta: Vector,
    /// Origin for `g`, `p`, `i` and `o`
    pub storage_offset: Vector,
    pub string_mode: bool,
    stacks: StackStack,
    opcodes: OpcodeManager,
}

impl InstructionPointer {
    /// A fresh IP at the origin heading east
    pub fn new(id: Cell) -> Self {
        InstructionPointer {
            id,
            position: Vector::ZERO,
            delta: Vector::EAST,
            storage_offset: Vector::ZERO,
            string_mode: false,
            stacks: StackStack::new(),
            opcodes: OpcodeManager::new(),
        }
    }

    /// The active stack (TOSS)
    pub fn stack(&self) -> &Stack {
        self.stacks.toss()
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        self.stacks.toss_mut()
    }

    pub fn stacks(&self) -> &StackStack {
        &self.stacks
    }

    pub fn stacks_mut(&mut self) -> &mut StackStack {
        &mut self.stacks
    }

    pub fn opcodes(&self) -> &OpcodeManager {
        &self.opcodes
    }

    pub fn opcodes_mut(&mut self) -> &mut OpcodeManager {
        &mut self.opcodes
    }

    /// Reflect: the uniform failure signal
    pub fn reverse(&mut self) {
        self.delta = -self.delta;
    }

    /// Move one step along the delta, wrapping around the space's bounds
    pub fn advance(&mut self, space: &FungeSpace) {
        self.position = wrap_step(self.position, self.delta, space.bounds());
    }

    /// Move `n` cells along the delta, backwards for negative `n`
    ///
    /// Ends where `n` calls to [`advance`](Self::advance) would.
    pub fn jump(&mut self, n: Cell, space: &FungeSpace) {
        self.position = wrap_jump(self.position, self.delta, n, space.bounds());
    }

    /// Open a block with `{`
    ///
    /// The new storage offset is the cell right after the `{`.
    pub fn begin_block(&mut self, count: Cell) {
        let old = self.storage_offset;
        self.stacks.begin(count, old);
        self.storage_offset = self.position + self.delta;
    }

    /// Close a block with `}`, reflecting when there is no block to close
    pub fn end_block(&mut self, count: Cell) {
        match self.stacks.end(count) {
            Some(offset) => self.storage_offset = offset,
            None => self.reverse(),
        }
    }

    /// Child for `t`: a deep copy heading the other way, one step ahead
    pub fn fork(&self, id: Cell, space: &FungeSpace) -> InstructionPointer {
        let mut child = self.clone();
        child.id = id;
        child.reverse();
        child.advance(space);
        child
    }
}

/// Next position from `pos` along `delta` inside `bounds`
///
/// Along the line `pos + t * delta`, the in-bounds points form one contiguous
/// run `[t_min, t_max]`. If `t = 1` is in it the IP simply steps. Otherwise it
/// lands on `t_min`: the entry point when the run lies ahead, or the far end
/// reached by backing up when the IP is leaving.
pub(crate) fn wrap_step(pos: Vector, delta: Vector, bounds: Rect) -> Vector {
    let next = pos + delta;
    if bounds.contains(next) {
        return next;
    }
    let x = axis_range(pos.x, delta.x, bounds.least.x, bounds.greatest.x);
    let y = axis_range(pos.y, delta.y, bounds.least.y, bounds.greatest.y);
    let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (x, y) else {
        return next;
    };
    let lo = x_lo.max(y_lo);
    let hi = x_hi.min(y_hi);
    if lo > hi {
        return next;
    }
    let at = |p: Cell, d: Cell| (i128::from(p) + lo * i128::from(d)) as Cell;
    Vector::new(at(pos.x, delta.x), at(pos.y, delta.y))
}

/// Where `n` successive [`wrap_step`]s from `pos` end up
pub(crate) fn wrap_jump(pos: Vector, delta: Vector, n: Cell, bounds: Rect) -> Vector {
    let straight = pos + delta * n;
    if bounds.contains(straight) {
        return straight;
    }
    let x = axis_range(pos.x, delta.x, bounds.least.x, bounds.greatest.x);
    let y = axis_range(pos.y, delta.y, bounds.least.y, bounds.greatest.y);
    let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (x, y) else {
        return straight;
    };
    let lo = x_lo.max(y_lo);
    let hi = x_hi.min(y_hi);
    // The walk only cycles if it starts on the line's in-bounds run
    if lo > 0 || hi < 0 {
        return straight;
    }
    let t = lo + (i128::from(n) - lo).rem_euclid(hi - lo + 1);
    let at = |p: Cell, d: Cell| (i128::from(p) + t * i128::from(d)) as Cell;
    Vector::new(at(pos.x, delta.x), at(pos.y, delta.y))
}

/// Values of `t` for which `p + t * d` lies in `[lo, hi]`
fn axis_range(p: Cell, d: Cell, lo: Cell, hi: Cell) -> Option<(i128, i128)> {
    let (p, d, lo, hi) = (
        i128::from(p),
        i128::from(d),
        i128::from(lo),
        i128::from(hi),
    );
    if d == 0 {
        return (lo..=hi).contains(&p).then_some((i128::MIN, i128::MAX));
    }
    let (a, b) = if d > 0 {
        (div_ceil(lo - p, d), div_floor(hi - p, d))
    } else {
        (div_ceil(hi - p, d), div_floor(lo - p, d))
    };
    Some((a, b))
}

fn div_floor(a: i128, b: i128) -> i128 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn div_ceil(a: i128, b: i128) -> i128 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}
