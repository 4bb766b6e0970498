//! TUI pane rendering modules
//!
//! Each pane module exports a `render_*` function that draws one area of the
//! screen from interpreter state, plus the pure helpers it is built on.
//!
//! # Pane Modules
//!
//! - [`space`]: window of funge-space around the selected IP
//! - [`stack`]: the selected IP's registers and stack-stack
//! - [`terminal`]: program output up to the current point of history
//! - [`status`]: status bar with keybindings and execution state

pub mod space;
pub mod stack;
pub mod status;
pub mod terminal;

pub use space::render_space_pane;
pub use stack::render_stack_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
