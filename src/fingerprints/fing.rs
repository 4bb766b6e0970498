// FING: move handlers between opcode slots

use super::Fingerprint;
use crate::interpreter::dispatch::Handler;
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;

pub static FINGERPRINT: Fingerprint = Fingerprint {
    name: "FING",
    opcodes: &[(b'X', swap_handlers), (b'Y', drop_handler), (b'Z', push_handler)],
    safe: true,
};

/// Pop an opcode given as 0-25 or 'A'-'Z'
fn pop_opcode(ip: &mut InstructionPointer) -> Option<u8> {
    match ip.stack_mut().pop() {
        n @ 0..=25 => Some(b'A' + n as u8),
        n @ 65..=90 => Some(n as u8),
        _ => None,
    }
}

/// `X`: swap the top handlers of two opcodes
fn swap_handlers(ip: &mut InstructionPointer, _rt: &Runtime) {
    let first = pop_opcode(ip);
    let second = pop_opcode(ip);
    let (Some(first), Some(second)) = (first, second) else {
        ip.reverse();
        return;
    };
    let opcodes = ip.opcodes_mut();
    let a = opcodes.pop(first).unwrap_or(Handler::Reflect);
    let b = opcodes.pop(second).unwrap_or(Handler::Reflect);
    let ok = opcodes.push(second, a) && opcodes.push(first, b);
    if !ok {
        ip.reverse();
    }
}

/// `Y`: pop the top handler of an opcode
fn drop_handler(ip: &mut InstructionPointer, _rt: &Runtime) {
    match pop_opcode(ip) {
        Some(opcode) => {
            ip.opcodes_mut().pop(opcode);
        }
        None => ip.reverse(),
    }
}

/// `Z`: copy the top handler of the source opcode onto the destination
fn push_handler(ip: &mut InstructionPointer, _rt: &Runtime) {
    let dst = pop_opcode(ip);
    let src = pop_opcode(ip);
    let (Some(dst), Some(src)) = (dst, src) else {
        ip.reverse();
        return;
    };
    let handler = ip.opcodes().lookup(src).unwrap_or(Handler::Reflect);
    if !ip.opcodes_mut().push(dst, handler) {
        ip.reverse();
    }
}
