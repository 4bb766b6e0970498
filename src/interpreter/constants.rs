// Constants for the Funge interpreter

use crate::memory::{fold_name, Cell};

/// Handprint reported by sysinfo request 3 ("RFNG")
pub const HANDPRINT: Cell = fold_name(b"RFNG");

/// Interpreter version reported by sysinfo request 4 (0.1.0)
pub const VERSION: Cell = 10;

/// Highest sysinfo request in the catalog
pub const HIGHEST_REQUEST: Cell = 20;

/// Default memory budget for debugger snapshots (256 MB)
pub const DEFAULT_HISTORY_LIMIT: usize = 256 * 1024 * 1024;
