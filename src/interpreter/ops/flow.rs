// Direction and control-flow instructions

use crate::interpreter::ip::InstructionPointer;
use crate::memory::{Cell, FungeSpace, Vector};
use rand::Rng;

const CARDINALS: [Vector; 4] = [Vector::EAST, Vector::SOUTH, Vector::WEST, Vector::NORTH];

/// `?`: head in a random cardinal direction
pub fn random_direction(ip: &mut InstructionPointer) {
    let index = rand::thread_rng().gen_range(0..CARDINALS.len());
    ip.delta = CARDINALS[index];
}

/// `_`: east if zero, west otherwise
pub fn horizontal_if(ip: &mut InstructionPointer) {
    ip.delta = if ip.stack_mut().pop() == 0 {
        Vector::EAST
    } else {
        Vector::WEST
    };
}

/// `|`: south if zero, north otherwise
pub fn vertical_if(ip: &mut InstructionPointer) {
    ip.delta = if ip.stack_mut().pop() == 0 {
        Vector::SOUTH
    } else {
        Vector::NORTH
    };
}

/// `w`: pop `b`, `a`; turn left if `a < b`, right if `a > b`
pub fn compare(ip: &mut InstructionPointer) {
    let b = ip.stack_mut().pop();
    let a = ip.stack_mut().pop();
    if a < b {
        ip.delta = ip.delta.turn_left();
    } else if a > b {
        ip.delta = ip.delta.turn_right();
    }
}

/// `x`: pop a vector and use it as the delta
pub fn absolute_delta(ip: &mut InstructionPointer) {
    ip.delta = ip.stack_mut().pop_vector();
}

/// `j`: move `n` cells along the delta
///
/// The engine's regular step follows, so the IP lands on the cell after the
/// `n` skipped ones.
pub fn jump(ip: &mut InstructionPointer, space: &FungeSpace) {
    let n: Cell = ip.stack_mut().pop();
    ip.jump(n, space);
}
