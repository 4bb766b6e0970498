//! # Introduction
//!
//! rufunge executes Befunge-98 programs: a two-dimensional, self-modifying
//! language whose instruction pointers wander an unbounded grid of cells,
//! reading their own program text as data and rewriting it as they go.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → FungeSpace → Interpreter (ticks over IPs) → Terminal
//!                                    ↘ Snapshots → TUI
//! ```
//!
//! 1. [`memory`]: cells, vectors, the per-IP stack-stack and the sparse
//!    [`memory::FungeSpace`] shared by every IP.
//! 2. [`interpreter`]: instruction pointers, the built-in instruction set,
//!    per-IP fingerprint dispatch, sysinfo and both schedulers (cooperative
//!    ticks or one thread per IP).
//! 3. [`fingerprints`]: loadable instruction sets for `A`-`Z`.
//! 4. [`snapshot`]: bounded tick history used by the debugger to step
//!    backwards.
//! 5. [`ui`]: ratatui-based debugger; not part of the stable library API.
//!
//! ## Running a program
//!
//! ```no_run
//! use rufunge::interpreter::engine::Interpreter;
//! use rufunge::interpreter::settings::Settings;
//! use rufunge::interpreter::terminal::Terminal;
//!
//! let mut interpreter = Interpreter::new(Settings::default(), Terminal::stdio());
//! interpreter.load_source(b"\"!olleH\">:#,_@");
//! let exit_code = interpreter.run().unwrap();
//! ```

pub mod fingerprints;
pub mod interpreter;
pub mod memory;
pub mod snapshot;
pub mod ui;
