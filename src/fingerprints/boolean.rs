// BOOL: bitwise logic

use super::Fingerprint;
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;
use crate::memory::Cell;

pub static FINGERPRINT: Fingerprint = Fingerprint {
    name: "BOOL",
    opcodes: &[(b'A', and), (b'N', not), (b'O', or), (b'X', xor)],
    safe: true,
};

fn binary(ip: &mut InstructionPointer, f: fn(Cell, Cell) -> Cell) {
    let stack = ip.stack_mut();
    let b = stack.pop();
    let a = stack.pop();
    stack.push(f(a, b));
}

fn and(ip: &mut InstructionPointer, _rt: &Runtime) {
    binary(ip, |a, b| a & b);
}

fn or(ip: &mut InstructionPointer, _rt: &Runtime) {
    binary(ip, |a, b| a | b);
}

fn xor(ip: &mut InstructionPointer, _rt: &Runtime) {
    binary(ip, |a, b| a ^ b);
}

fn not(ip: &mut InstructionPointer, _rt: &Runtime) {
    let stack = ip.stack_mut();
    let a = stack.pop();
    stack.push(!a);
}
