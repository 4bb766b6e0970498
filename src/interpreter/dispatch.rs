//! Per-IP opcode dispatch
//!
//! Every instruction pointer carries an [`OpcodeManager`]: for each of the 26
//! fingerprint opcodes `A`-`Z` it keeps a stack of [`Handler`]s. The top handler
//! is the one that runs. Loading a fingerprint pushes handlers, unloading pops
//! them, and whatever was shadowed becomes visible again.
//!
//! The built-in meaning of `A`-`Z` (reflect) is never stored as an entry; an
//! empty slot means "use the built-in".
//!
//! ```text
//! 'M' slot:  [MODU:M]           lookup('M') → MODU:M
//! load X:    [MODU:M, X:M]      lookup('M') → X:M
//! pop('M'):  [MODU:M]           lookup('M') → MODU:M
//! ```

use super::engine::Runtime;
use super::ip::InstructionPointer;
use std::fmt;

/// Signature of a fingerprint instruction
pub type FingerprintOp = fn(&mut InstructionPointer, &Runtime);

/// One entry on an opcode slot
#[derive(Clone, Copy)]
pub enum Handler {
    /// Reverse the IP; synthesized for empty slots moved around by FING
    Reflect,
    /// An instruction provided by a fingerprint
    Fingerprint {
        fingerprint: &'static str,
        opcode: u8,
        op: FingerprintOp,
    },
}

impl Handler {
    /// Run the handler against `ip`
    pub fn execute(&self, ip: &mut InstructionPointer, rt: &Runtime) {
        match self {
            Handler::Reflect => ip.reverse(),
            Handler::Fingerprint { op, .. } => op(ip, rt),
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Reflect, Handler::Reflect) => true,
            (
                Handler::Fingerprint {
                    fingerprint: a,
                    opcode: x,
                    ..
                },
                Handler::Fingerprint {
                    fingerprint: b,
                    opcode: y,
                    ..
                },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Reflect => write!(f, "Reflect"),
            Handler::Fingerprint {
                fingerprint,
                opcode,
                ..
            } => write!(f, "{}:{}", fingerprint, *opcode as char),
        }
    }
}

/// Slot index for an opcode, `None` outside `A`-`Z`
fn slot(opcode: u8) -> Option<usize> {
    opcode
        .is_ascii_uppercase()
        .then(|| usize::from(opcode - b'A'))
}

/// Handler stacks for `A`-`Z`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpcodeManager {
    slots: [Vec<Handler>; 26],
}

impl OpcodeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` as the new top for `opcode`
    ///
    /// Fails for opcodes outside `A`-`Z` or when the slot cannot grow.
    pub fn push(&mut self, opcode: u8, handler: Handler) -> bool {
        let Some(index) = slot(opcode) else {
            return false;
        };
        let entries = &mut self.slots[index];
        if entries.try_reserve(1).is_err() {
            log::error!("failed to grow handler stack for '{}'", opcode as char);
            return false;
        }
        entries.push(handler);
        true
    }

    /// Remove and return the top handler for `opcode`
    pub fn pop(&mut self, opcode: u8) -> Option<Handler> {
        slot(opcode).and_then(|index| self.slots[index].pop())
    }

    /// The handler that should run for `opcode`, `None` for the built-in
    pub fn lookup(&self, opcode: u8) -> Option<Handler> {
        slot(opcode).and_then(|index| self.slots[index].last().copied())
    }

    /// Number of handlers stacked on `opcode`
    pub fn depth(&self, opcode: u8) -> usize {
        slot(opcode).map_or(0, |index| self.slots[index].len())
    }
}
