//! Funge-98 execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: shared [`Runtime`](engine::Runtime), the per-tick
//!   [`step`](engine::step) and the [`Interpreter`](engine::Interpreter)
//!   schedulers
//! - [`ip`]: instruction pointers and Lahey-space motion
//! - [`dispatch`]: per-IP fingerprint opcode stacks
//! - [`ops`]: built-in instructions
//! - [`sysinfo`]: the `y` catalog
//! - [`terminal`]: program input and output
//! - [`settings`], [`constants`], [`errors`]
//!
//! # Execution Model
//!
//! Every tick an IP skips spaces and `;`-regions for free, executes the cell
//! it lands on and moves one step along its delta. Failures never raise; they
//! reflect the IP. IPs either share one thread round-robin or each get an OS
//! thread, sharing only funge-space and host resources.

pub mod constants;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod ip;
pub mod ops;
pub mod settings;
pub mod sysinfo;
pub mod terminal;
