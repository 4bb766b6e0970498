//! Interpreter configuration
//!
//! [`Settings`] is plain data filled in by the command-line front end (or by
//! tests) and shared read-only by every instruction pointer.

use super::constants::DEFAULT_HISTORY_LIMIT;

/// How instruction pointers are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionModel {
    /// One instruction per IP per round on a single thread
    #[default]
    Cooperative,
    /// Each IP on its own OS thread sharing funge-space
    Threaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Refuse file I/O, shell execution and unsafe fingerprints
    pub sandbox: bool,
    pub execution: ExecutionModel,
    /// Log a warning for every unknown instruction
    pub warnings: bool,
    /// Allow `(` to load fingerprints
    pub fingerprints: bool,
    /// Program path followed by its arguments (sysinfo request 19)
    pub program_args: Vec<String>,
    /// Memory budget for debugger snapshots, in bytes
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sandbox: false,
            execution: ExecutionModel::Cooperative,
            warnings: false,
            fingerprints: true,
            program_args: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
