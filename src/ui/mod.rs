//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The debugger is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, IP selection, auto-play
//! - **[`panes`]**: stateless render functions for each visible pane (funge-space,
//!   stack-stack, program output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an [`Interpreter`]
//! whose terminal is captured and call [`App::run`] to start the event loop.
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
