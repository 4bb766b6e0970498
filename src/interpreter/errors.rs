//! Host-level error types for the Funge interpreter
//!
//! This module defines [`FungeError`], covering failures outside the program's
//! own semantics: loading the program file, I/O on the host terminal, and
//! debugger history navigation.
//!
//! Errors *inside* a running program never surface here. Invalid handles,
//! division by zero, failed file operations and the like reverse the offending
//! instruction pointer instead (see [`InstructionPointer::reverse`]).
//!
//! [`InstructionPointer::reverse`]: crate::interpreter::ip::InstructionPointer::reverse

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported to the host
#[derive(Debug, Error)]
pub enum FungeError {
    /// Program file does not exist
    #[error("program file '{}' not found", path.display())]
    ProgramNotFound { path: PathBuf },

    /// Program file exists but could not be read
    #[error("failed to read program file '{}': {source}", path.display())]
    ProgramRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Terminal or stream failure on the host side
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Debugger history navigation failed
    #[error("history operation failed: {message}")]
    HistoryOperationFailed { message: String },
}

pub type FungeResult<T> = Result<T, FungeError>;
