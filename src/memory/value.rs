//! Cell and vector primitives
//!
//! This module defines the value types shared by every part of the interpreter:
//!
//! - [`Cell`]: the universal value type (numbers, characters, addresses)
//! - [`Vector`]: a 2D coordinate pair used for positions, deltas and sizes
//! - [`Rect`]: an inclusive rectangle given by its least and greatest points
//!
//! # Cell Width
//!
//! Cells are 32-bit by default. Building with the `cell64` feature switches
//! them to 64-bit. Arithmetic on cells always wraps (two's complement), so
//! overflow is never an error.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// The value type stored in funge-space and on stacks
#[cfg(not(feature = "cell64"))]
pub type Cell = i32;

/// The value type stored in funge-space and on stacks
#[cfg(feature = "cell64")]
pub type Cell = i64;

/// Value of every cell that was never written
pub const SPACE: Cell = b' ' as Cell;

/// A 2D integer vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vector {
    pub x: Cell,
    pub y: Cell,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0, 0);
    pub const EAST: Vector = Vector::new(1, 0);
    pub const WEST: Vector = Vector::new(-1, 0);
    pub const NORTH: Vector = Vector::new(0, -1);
    pub const SOUTH: Vector = Vector::new(0, 1);

    pub const fn new(x: Cell, y: Cell) -> Self {
        Vector { x, y }
    }

    /// Rotate 90 degrees counter-clockwise (y grows downwards)
    pub fn turn_left(self) -> Self {
        Vector::new(self.y, self.x.wrapping_neg())
    }

    /// Rotate 90 degrees clockwise (y grows downwards)
    pub fn turn_right(self) -> Self {
        Vector::new(self.y.wrapping_neg(), self.x)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(self.x.wrapping_neg(), self.y.wrapping_neg())
    }
}

impl Mul<Cell> for Vector {
    type Output = Vector;

    fn mul(self, rhs: Cell) -> Vector {
        Vector::new(self.x.wrapping_mul(rhs), self.y.wrapping_mul(rhs))
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle: every point `p` with `least <= p <= greatest` per component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub least: Vector,
    pub greatest: Vector,
}

impl Rect {
    /// A rectangle covering a single point
    pub fn point(p: Vector) -> Self {
        Rect {
            least: p,
            greatest: p,
        }
    }

    pub fn contains(&self, p: Vector) -> bool {
        p.x >= self.least.x && p.x <= self.greatest.x && p.y >= self.least.y && p.y <= self.greatest.y
    }

    /// Grow the rectangle so that it covers `p`
    pub fn include(&mut self, p: Vector) {
        self.least.x = self.least.x.min(p.x);
        self.least.y = self.least.y.min(p.y);
        self.greatest.x = self.greatest.x.max(p.x);
        self.greatest.y = self.greatest.y.max(p.y);
    }

    /// Greatest point relative to the least point
    pub fn extent(&self) -> Vector {
        self.greatest - self.least
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::point(Vector::ZERO)
    }
}
