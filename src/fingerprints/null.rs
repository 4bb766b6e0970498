// NULL: every letter reflects

use super::Fingerprint;
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;

pub static FINGERPRINT: Fingerprint = Fingerprint {
    name: "NULL",
    opcodes: &[
        (b'A', reflect),
        (b'B', reflect),
        (b'C', reflect),
        (b'D', reflect),
        (b'E', reflect),
        (b'F', reflect),
        (b'G', reflect),
        (b'H', reflect),
        (b'I', reflect),
        (b'J', reflect),
        (b'K', reflect),
        (b'L', reflect),
        (b'M', reflect),
        (b'N', reflect),
        (b'O', reflect),
        (b'P', reflect),
        (b'Q', reflect),
        (b'R', reflect),
        (b'S', reflect),
        (b'T', reflect),
        (b'U', reflect),
        (b'V', reflect),
        (b'W', reflect),
        (b'X', reflect),
        (b'Y', reflect),
        (b'Z', reflect),
    ],
    safe: true,
};

fn reflect(ip: &mut InstructionPointer, _rt: &Runtime) {
    ip.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Vector;

    #[test]
    fn test_shadows_every_letter() {
        let mut ip = InstructionPointer::new(0);
        assert!(FINGERPRINT.load(&mut ip));
        for opcode in b'A'..=b'Z' {
            assert_eq!(ip.opcodes().depth(opcode), 1);
        }

        let rt = Runtime::captured(Default::default(), b"");
        if let Some(handler) = ip.opcodes().lookup(b'Q') {
            handler.execute(&mut ip, &rt);
        }
        assert_eq!(ip.delta, Vector::WEST);
    }
}
