// ROMA: roman numerals

use super::Fingerprint;
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;

pub static FINGERPRINT: Fingerprint = Fingerprint {
    name: "ROMA",
    opcodes: &[
        (b'C', hundred),
        (b'D', five_hundred),
        (b'I', one),
        (b'L', fifty),
        (b'M', thousand),
        (b'V', five),
        (b'X', ten),
    ],
    safe: true,
};

fn one(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.stack_mut().push(1);
}

fn five(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.stack_mut().push(5);
}

fn ten(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.stack_mut().push(10);
}

fn fifty(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.stack_mut().push(50);
}

fn hundred(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.stack_mut().push(100);
}

fn five_hundred(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.stack_mut().push(500);
}

fn thousand(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.stack_mut().push(1000);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerals() {
        let rt = Runtime::captured(Default::default(), b"");
        let mut ip = InstructionPointer::new(0);
        assert!(FINGERPRINT.load(&mut ip));
        for opcode in *b"MDCLXVI" {
            if let Some(handler) = ip.opcodes().lookup(opcode) {
                handler.execute(&mut ip, &rt);
            }
        }
        assert_eq!(ip.stack().entries(), &[1000, 500, 100, 50, 10, 5, 1]);
    }
}
