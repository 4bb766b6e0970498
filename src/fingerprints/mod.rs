//! Loadable fingerprints
//!
//! A fingerprint is a named bundle of `A`-`Z` instructions. `(` loads one onto
//! the requesting IP by pushing a handler per opcode onto its
//! [`OpcodeManager`](crate::interpreter::dispatch::OpcodeManager); `)` pops
//! them again, uncovering whatever was there before.
//!
//! Fingerprints are named on the stack by their id, the base-256 fold of the
//! name:
//!
//! ```text
//! "LLUN"4(     pushes 'L' 'L' 'U' 'N' 4; `(` pops 4 cells, N first
//! id = 'N'·256³ + 'U'·256² + 'L'·256 + 'L' = fold("NULL")
//! ```
//!
//! # Available fingerprints
//!
//! - [`boolean`] (`BOOL`): bitwise logic
//! - [`file`] (`FILE`): host file handles, unavailable in sandbox mode
//! - [`fing`] (`FING`): moving handlers between opcodes
//! - [`modu`] (`MODU`): modulo variants
//! - [`null`] (`NULL`): every opcode reflects
//! - [`roma`] (`ROMA`): roman numerals
//! - [`term`] (`TERM`): cursor control on program output

pub mod boolean;
pub mod file;
pub mod fing;
pub mod modu;
pub mod null;
pub mod roma;
pub mod term;

use crate::interpreter::dispatch::{FingerprintOp, Handler};
use crate::interpreter::engine::Runtime;
use crate::interpreter::ip::InstructionPointer;
use crate::memory::{fold_name, Cell};

/// A fingerprint's definition
pub struct Fingerprint {
    pub name: &'static str,
    /// Instructions in the order they are installed
    pub opcodes: &'static [(u8, FingerprintOp)],
    /// Usable in sandbox mode
    pub safe: bool,
}

impl Fingerprint {
    /// Numeric id used by `(` and `)`
    pub fn id(&self) -> Cell {
        fold_name(self.name.as_bytes())
    }

    /// Install every instruction on `ip`
    ///
    /// Returns `false` if a handler could not be installed; the handlers pushed
    /// so far stay in place and still unload cleanly.
    pub fn load(&self, ip: &mut InstructionPointer) -> bool {
        self.opcodes.iter().all(|&(opcode, op)| {
            ip.opcodes_mut().push(
                opcode,
                Handler::Fingerprint {
                    fingerprint: self.name,
                    opcode,
                    op,
                },
            )
        })
    }

    /// Pop one handler for each instruction this fingerprint defines
    pub fn unload(&self, ip: &mut InstructionPointer) {
        for &(opcode, _) in self.opcodes {
            ip.opcodes_mut().pop(opcode);
        }
    }
}

/// Every fingerprint this interpreter provides
pub static REGISTRY: [&Fingerprint; 7] = [
    &boolean::FINGERPRINT,
    &file::FINGERPRINT,
    &fing::FINGERPRINT,
    &modu::FINGERPRINT,
    &null::FINGERPRINT,
    &roma::FINGERPRINT,
    &term::FINGERPRINT,
];

/// Find a fingerprint by id
pub fn find(id: Cell) -> Option<&'static Fingerprint> {
    REGISTRY.iter().copied().find(|fp| fp.id() == id)
}

/// Pop a fingerprint id: a count followed by that many cells
fn pop_id(ip: &mut InstructionPointer) -> Option<Cell> {
    let stack = ip.stack_mut();
    let count = stack.pop();
    if count < 0 {
        return None;
    }
    let mut id: Cell = 0;
    for _ in 0..count {
        id = id.wrapping_mul(256).wrapping_add(stack.pop());
    }
    Some(id)
}

/// Fingerprint `id` if this IP may use it
fn available(rt: &Runtime, id: Cell) -> Option<&'static Fingerprint> {
    if !rt.settings.fingerprints {
        return None;
    }
    let fp = find(id)?;
    if rt.settings.sandbox && !fp.safe {
        log::warn!("sandbox refused fingerprint {}", fp.name);
        return None;
    }
    Some(fp)
}

/// `(`: load a fingerprint, pushing its id and 1 on success
pub fn load_instruction(ip: &mut InstructionPointer, rt: &Runtime) {
    let Some(id) = pop_id(ip) else {
        ip.reverse();
        return;
    };
    let Some(fp) = available(rt, id) else {
        log::debug!("ip {} requested unavailable fingerprint {:#x}", ip.id, id);
        ip.reverse();
        return;
    };
    if fp.load(ip) {
        log::debug!("ip {} loaded fingerprint {}", ip.id, fp.name);
        let stack = ip.stack_mut();
        stack.push(id);
        stack.push(1);
    } else {
        log::debug!("ip {} failed to load fingerprint {}", ip.id, fp.name);
        ip.reverse();
    }
}

/// `)`: unload a fingerprint
pub fn unload_instruction(ip: &mut InstructionPointer, rt: &Runtime) {
    match pop_id(ip).and_then(|id| available(rt, id)) {
        Some(fp) => {
            fp.unload(ip);
            log::debug!("ip {} unloaded fingerprint {}", ip.id, fp.name);
        }
        None => ip.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::settings::Settings;
    use crate::memory::Vector;

    fn push_name(ip: &mut InstructionPointer, name: &str) {
        for &b in name.as_bytes().iter().rev() {
            ip.stack_mut().push(Cell::from(b));
        }
        ip.stack_mut().push(name.len() as Cell);
    }

    #[test]
    fn test_ids() {
        assert_eq!(modu::FINGERPRINT.id(), 0x4D4F_4455);
        assert_eq!(null::FINGERPRINT.id(), 0x4E55_4C4C);
        assert!(find(0x4E55_4C4C).is_some());
        assert!(find(0x1234).is_none());
    }

    #[test]
    fn test_load_pushes_id_and_one() {
        let rt = Runtime::captured(Settings::default(), b"");
        let mut ip = InstructionPointer::new(0);
        push_name(&mut ip, "NULL");
        load_instruction(&mut ip, &rt);
        assert_eq!(ip.stack().entries(), &[0x4E55_4C4C, 1]);
        assert_eq!(ip.opcodes().depth(b'A'), 1);
        assert_eq!(ip.opcodes().depth(b'Z'), 1);
    }

    #[test]
    fn test_unload_uncovers_previous() {
        let rt = Runtime::captured(Settings::default(), b"");
        let mut ip = InstructionPointer::new(0);
        push_name(&mut ip, "ROMA");
        load_instruction(&mut ip, &rt);
        push_name(&mut ip, "NULL");
        load_instruction(&mut ip, &rt);
        ip.stack_mut().clear();

        push_name(&mut ip, "NULL");
        unload_instruction(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::EAST);
        match ip.opcodes().lookup(b'I') {
            Some(Handler::Fingerprint { fingerprint, .. }) => assert_eq!(fingerprint, "ROMA"),
            other => panic!("unexpected handler {:?}", other),
        }
        // ROMA does not define A, so NULL's A is gone entirely
        assert_eq!(ip.opcodes().lookup(b'A'), None);
    }

    #[test]
    fn test_unknown_and_disabled_reflect() {
        let rt = Runtime::captured(Settings::default(), b"");
        let mut ip = InstructionPointer::new(0);
        push_name(&mut ip, "SOCK");
        load_instruction(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::WEST);
        assert!(ip.stack().is_empty());

        let rt = Runtime::captured(
            Settings {
                fingerprints: false,
                ..Settings::default()
            },
            b"",
        );
        push_name(&mut ip, "MODU");
        load_instruction(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::EAST);
    }

    #[test]
    fn test_sandbox_blocks_file() {
        let rt = Runtime::captured(
            Settings {
                sandbox: true,
                ..Settings::default()
            },
            b"",
        );
        let mut ip = InstructionPointer::new(0);
        push_name(&mut ip, "FILE");
        load_instruction(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::WEST);
        assert_eq!(ip.opcodes().lookup(b'O'), None);
    }

    #[test]
    fn test_negative_count_reflects() {
        let rt = Runtime::captured(Settings::default(), b"");
        let mut ip = InstructionPointer::new(0);
        ip.stack_mut().push(-1);
        load_instruction(&mut ip, &rt);
        assert_eq!(ip.delta, Vector::WEST);
    }
}
