//! Memory model for the Funge interpreter
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Cell type and the [`value::Vector`] / [`value::Rect`] primitives
//! - [`stack`]: Per-IP value stacks and the stack-stack
//! - [`space`]: Sparse, shared funge-space holding program and data
//!
//! # Coordinates
//!
//! Funge-space uses screen coordinates: `x` grows to the east and `y` grows to
//! the south. The program text is loaded with its first character at `(0, 0)`.
//!
//! ```text
//!        north (0,-1)
//! west (-1,0)  ·  east (1,0)
//!        south (0,1)
//! ```

pub mod space;
pub mod stack;
pub mod value;

pub use space::{FungeSpace, SpaceSnapshot};
pub use stack::{Stack, StackStack};
pub use value::{Cell, Rect, Vector, SPACE};

/// Fold a string of characters into a single cell, first character most significant
///
/// Used for fingerprint identifiers (`"NULL"` → `0x4E554C4C`).
pub const fn fold_name(name: &[u8]) -> Cell {
    let mut id: Cell = 0;
    let mut i = 0;
    while i < name.len() {
        id = id.wrapping_mul(256).wrapping_add(name[i] as Cell);
        i += 1;
    }
    id
}
