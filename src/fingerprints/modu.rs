// MODU: modulo variants

use super::Fingerprint;
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;
use crate::memory::Cell;

pub static FINGERPRINT: Fingerprint = Fingerprint {
    name: "MODU",
    opcodes: &[
        (b'M', signed_result),
        (b'R', remainder),
        (b'U', unsigned_result),
    ],
    safe: true,
};

/// Pop `y` then `x` and push `f(x, y)`, or 0 when `y` is 0
fn modulo(ip: &mut InstructionPointer, f: fn(Cell, Cell) -> Cell) {
    let stack = ip.stack_mut();
    let y = stack.pop();
    let x = stack.pop();
    stack.push(if y == 0 { 0 } else { f(x, y) });
}

/// `M`: remainder of floor division, taking the sign of the divisor
fn signed_result(ip: &mut InstructionPointer, _rt: &Runtime) {
    modulo(ip, |x, y| {
        let r = x.wrapping_rem(y);
        if r != 0 && (r < 0) != (y < 0) {
            r.wrapping_add(y)
        } else {
            r
        }
    });
}

/// `U`: absolute value of the remainder
fn unsigned_result(ip: &mut InstructionPointer, _rt: &Runtime) {
    modulo(ip, |x, y| x.wrapping_rem(y).wrapping_abs());
}

/// `R`: remainder with the sign of the dividend
fn remainder(ip: &mut InstructionPointer, _rt: &Runtime) {
    modulo(ip, Cell::wrapping_rem);
}
