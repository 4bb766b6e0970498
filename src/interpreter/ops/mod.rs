//! Built-in instructions, grouped by concern
//!
//! Each function executes one instruction against an IP. The engine advances
//! the IP one step afterwards.
//!
//! - [`arith`]: arithmetic and comparison
//! - [`flow`]: direction changes, conditionals and jumps
//! - [`stack`]: stack-stack manipulation
//! - [`space`]: reading and writing funge-space
//! - [`io`]: program I/O, file regions and shell execution

pub mod arith;
pub mod flow;
pub mod io;
pub mod space;
pub mod stack;
