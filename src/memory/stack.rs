//! Value stacks and the stack-stack
//!
//! This module provides the per-IP data model:
//! - [`Stack`]: a LIFO of cells where popping an empty stack yields zero
//! - [`StackStack`]: a non-empty stack of stacks with block scoping
//!
//! # Underflow
//!
//! An empty stack behaves as if it held an infinite supply of zeros. Every pop
//! and peek on an empty stack returns `0` and never fails; this is part of the
//! language semantics rather than an error path.
//!
//! # Strings
//!
//! Strings live on the stack as NUL-terminated sequences laid out so that
//! popping yields the characters front to back and then the terminator.
//!
//! ```text
//! push_string(b"ab")   stack (bottom → top): 0 'b' 'a'
//! pop_string()         → b"ab"
//! ```

use super::value::{Cell, Vector};

/// A growable stack of cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    entries: Vec<Cell>,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            entries: Vec::new(),
        }
    }

    /// Number of cells currently on the stack
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cells from bottom to top (for UI display)
    pub fn entries(&self) -> &[Cell] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, value: Cell) {
        self.entries.push(value);
    }

    /// Remove and return the top value, or 0 when empty
    pub fn pop(&mut self) -> Cell {
        self.entries.pop().unwrap_or(0)
    }

    pub fn pop_discard(&mut self) {
        self.entries.pop();
    }

    /// Drop up to `n` values, stopping at the bottom
    pub fn pop_n_discard(&mut self, n: usize) {
        let keep = self.entries.len().saturating_sub(n);
        self.entries.truncate(keep);
    }

    /// Top value without removing it, or 0 when empty
    pub fn peek(&self) -> Cell {
        self.entries.last().copied().unwrap_or(0)
    }

    /// Push `x` then `y`
    pub fn push_vector(&mut self, v: Vector) {
        self.push(v.x);
        self.push(v.y);
    }

    /// Pop `y` then `x`
    pub fn pop_vector(&mut self) -> Vector {
        let y = self.pop();
        let x = self.pop();
        Vector::new(x, y)
    }

    /// Push a NUL-terminated string so that it pops front to back
    pub fn push_string(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len() + 1);
        self.push(0);
        for &b in bytes.iter().rev() {
            self.push(Cell::from(b));
        }
    }

    /// Pop cells up to (and consuming) the next zero
    pub fn pop_string(&mut self) -> Vec<u8> {
        let mut bytes = Vec::new();
        loop {
            match self.pop() {
                0 => return bytes,
                c => bytes.push(c as u8),
            }
        }
    }

    /// Pop exactly `len` cells as bytes, zeros included
    pub fn pop_sized_string(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.pop() as u8).collect()
    }

    /// Duplicate the top value; an empty stack ends up holding two zeros
    pub fn dup_top(&mut self) {
        let top = self.peek();
        self.push(top);
        if self.entries.len() == 1 {
            self.push(0);
        }
    }

    pub fn swap_top(&mut self) {
        let a = self.pop();
        let b = self.pop();
        self.push(a);
        self.push(b);
    }

    /// Pop `count` values and return them in their original order (deepest first)
    fn pop_block(&mut self, count: usize) -> Vec<Cell> {
        let split = self.entries.len().saturating_sub(count);
        let missing = count - (self.entries.len() - split);
        let mut block = Vec::new();
        if block.try_reserve_exact(count).is_err() {
            allocation_failure(count);
        }
        // Cells below the bottom read as zeros and are the deepest of the block
        block.resize(missing, 0);
        block.extend(self.entries.drain(split..));
        block
    }

    fn push_block(&mut self, block: Vec<Cell>) {
        self.reserve(block.len());
        self.entries.extend(block);
    }

    fn push_zeros(&mut self, count: usize) {
        self.reserve(count);
        self.entries.resize(self.entries.len() + count, 0);
    }

    /// Reserve room for `additional` cells or abort the process
    fn reserve(&mut self, additional: usize) {
        if self.entries.try_reserve(additional).is_err() {
            allocation_failure(additional);
        }
    }
}

/// Growth failure leaves no consistent state to continue from.
fn allocation_failure(requested: usize) -> ! {
    log::error!("failed to allocate room for {} stack cells", requested);
    eprintln!("Emergency! Failed to allocate enough memory for new stack items");
    std::process::abort();
}

/// The stack of stacks owned by an instruction pointer
///
/// The last stack is the TOSS (top of stack-stack); the one below it is the
/// SOSS. There is always at least one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackStack {
    stacks: Vec<Stack>,
}

impl StackStack {
    /// A stack-stack holding exactly one empty stack
    pub fn new() -> Self {
        StackStack {
            stacks: vec![Stack::new()],
        }
    }

    /// Number of stacks (always at least 1)
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// All stacks from bottom (BOSS) to top (TOSS)
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn toss(&self) -> &Stack {
        &self.stacks[self.stacks.len() - 1]
    }

    pub fn toss_mut(&mut self) -> &mut Stack {
        let top = self.stacks.len() - 1;
        &mut self.stacks[top]
    }

    pub fn soss(&self) -> Option<&Stack> {
        self.stacks.len().checked_sub(2).map(|i| &self.stacks[i])
    }

    /// Mutable (TOSS, SOSS) pair, if a SOSS exists
    fn toss_and_soss(&mut self) -> Option<(&mut Stack, &mut Stack)> {
        if self.stacks.len() < 2 {
            return None;
        }
        let last = self.stacks.len() - 1;
        let (below, top) = self.stacks.split_at_mut(last);
        Some((&mut top[0], &mut below[last - 1]))
    }

    /// Open a new block
    ///
    /// A positive `count` moves the top `count` cells of the current stack onto
    /// the new one, keeping their order. A negative `count` pushes `|count|`
    /// zeros onto the new stack. `old_offset` is then pushed onto the previous
    /// stack, which becomes the SOSS.
    pub fn begin(&mut self, count: Cell, old_offset: Vector) {
        let mut toss = Stack::new();
        if count > 0 {
            let block = self.toss_mut().pop_block(count as usize);
            toss.push_block(block);
        } else if count < 0 {
            toss.push_zeros(count.unsigned_abs() as usize);
        }
        self.toss_mut().push_vector(old_offset);
        self.stacks.push(toss);
    }

    /// Close the current block
    ///
    /// Returns the storage offset saved by [`begin`](Self::begin), or `None`
    /// (and changes nothing) when only one stack remains. A positive `count`
    /// moves the top `count` cells of the TOSS onto the SOSS in order; a
    /// negative `count` discards `|count|` cells from the SOSS.
    pub fn end(&mut self, count: Cell) -> Option<Vector> {
        let (toss, soss) = self.toss_and_soss()?;
        let offset = soss.pop_vector();
        if count > 0 {
            let block = toss.pop_block(count as usize);
            soss.push_block(block);
        } else if count < 0 {
            soss.pop_n_discard(count.unsigned_abs() as usize);
        }
        self.stacks.pop();
        Some(offset)
    }

    /// Move cells one at a time between SOSS and TOSS
    ///
    /// Positive `count` pops from the SOSS and pushes onto the TOSS, negative
    /// goes the other way. Each cell is moved individually, so the moved run
    /// ends up reversed. Returns `false` when there is no SOSS.
    pub fn transfer(&mut self, count: Cell) -> bool {
        let Some((toss, soss)) = self.toss_and_soss() else {
            return false;
        };
        if count > 0 {
            for _ in 0..count {
                toss.push(soss.pop());
            }
        } else if count < 0 {
            for _ in 0..count.unsigned_abs() {
                soss.push(toss.pop());
            }
        }
        true
    }
}

impl Default for StackStack {
    fn default() -> Self {
        Self::new()
    }
}
