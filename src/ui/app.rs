//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::FungeError;
use crate::ui::panes::{self, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Ticks executed by one press of Enter
const RUN_AHEAD_TICKS: usize = 1000;

/// Delay between ticks in auto-play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(250);

/// Which scrollable pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Stack,
    Terminal,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Stack => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Stack,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter instance
    pub interpreter: Interpreter,

    /// Index into the interpreter's live IPs
    pub selected_ip: usize,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub stack_scroll: usize,
    pub terminal_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Option<Instant>,
}

impl App {
    /// Create a new app around a loaded interpreter
    pub fn new(interpreter: Interpreter) -> Self {
        App {
            interpreter,
            selected_ip: 0,
            focused_pane: FocusedPane::Stack,
            stack_scroll: 0,
            terminal_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: None,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.interpreter.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.terminal_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        self.clamp_selection();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        // Left column: Space (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let ips = self.interpreter.ips();
        panes::render_space_pane(
            frame,
            left_rows[0],
            self.interpreter.space(),
            ips,
            self.selected_ip,
            false,
        );

        let output = self.interpreter.output();
        let shown = self.interpreter.output_len().min(output.len());
        panes::render_terminal_pane(
            frame,
            left_rows[1],
            &output[..shown],
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        panes::render_stack_pane(
            frame,
            columns[1],
            ips.get(self.selected_ip),
            ips.len(),
            self.selected_ip,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                ticks: self.interpreter.ticks(),
                history_position: self.interpreter.history_position(),
                total_snapshots: self.interpreter.total_snapshots(),
                history_memory: self.interpreter.history_memory(),
                exit_code: self.interpreter.exit_code(),
                is_playing: self.is_playing,
            },
        );
    }

    /// Keep the selected IP index valid as IPs come and go
    fn clamp_selection(&mut self) {
        let count = self.interpreter.ips().len();
        if self.selected_ip >= count {
            self.selected_ip = count.saturating_sub(1);
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Tab => {
                let count = self.interpreter.ips().len();
                if count > 0 {
                    self.selected_ip = (self.selected_ip + 1) % count;
                    self.stack_scroll = 0;
                    self.status_message = format!(
                        "Selected IP {}",
                        self.interpreter.ips()[self.selected_ip].id
                    );
                }
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Stack => self.stack_scroll = self.stack_scroll.saturating_sub(1),
                FocusedPane::Terminal => {
                    self.terminal_scroll = self.terminal_scroll.saturating_sub(1)
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Stack => self.stack_scroll = self.stack_scroll.saturating_add(1),
                FocusedPane::Terminal => {
                    self.terminal_scroll = self.terminal_scroll.saturating_add(1)
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                let debounced = self
                    .last_space_press
                    .is_some_and(|t| t.elapsed() < Duration::from_millis(200));
                if !debounced {
                    self.last_space_press = Some(Instant::now());
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(PLAY_INTERVAL)
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                let mut stepped = 0;
                while stepped < RUN_AHEAD_TICKS && self.interpreter.step_forward().is_ok() {
                    stepped += 1;
                }
                self.status_message = format!("Ran ahead {} tick(s)", stepped);
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                match self.interpreter.rewind_to_start() {
                    Ok(()) => self.status_message = "Rewound to start".to_string(),
                    Err(e) => self.status_message = format!("Cannot rewind: {}", e),
                }
                self.terminal_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.interpreter.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                // Auto-scroll terminal to bottom
                self.terminal_scroll = usize::MAX;
            }
            Err(FungeError::HistoryOperationFailed { message }) => {
                self.status_message = format!("Cannot step forward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.interpreter.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(FungeError::HistoryOperationFailed { message }) => {
                self.status_message = format!("Cannot step backward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::settings::Settings;
    use crate::interpreter::terminal::Terminal as ProgramTerminal;
    use crossterm::event::KeyModifiers;

    fn app(source: &[u8]) -> App {
        let mut interpreter = Interpreter::new(Settings::default(), ProgramTerminal::captured(b""));
        interpreter.load_source(source);
        App::new(interpreter)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_step_forward_and_back() {
        let mut app = app(b"12.@");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.interpreter.ticks(), 2);
        assert_eq!(app.interpreter.ips()[0].stack().entries(), &[1, 2]);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.interpreter.ticks(), 1);
        assert_eq!(app.interpreter.ips()[0].stack().entries(), &[1]);
        assert_eq!(app.status_message, "Stepped backward");
    }

    #[test]
    fn test_run_ahead_and_rewind() {
        let mut app = app(b"12..@");
        press(&mut app, KeyCode::Enter);
        assert!(app.interpreter.is_finished());
        assert_eq!(app.interpreter.output(), b"2 1 ");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.interpreter.ticks(), 0);
        assert_eq!(app.interpreter.output_len(), 0);
        assert!(!app.interpreter.is_finished());
    }

    #[test]
    fn test_tab_cycles_ips() {
        let mut app = app(b"t@");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.interpreter.ips().len(), 2);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_ip, 1);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_ip, 0);
    }

    #[test]
    fn test_history_memory_grows_with_steps() {
        let mut app = app(b"123@");
        let (before, limit) = app.interpreter.history_memory();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        let (after, _) = app.interpreter.history_memory();
        assert!(after > before);
        assert!(after <= limit);
    }

    #[test]
    fn test_quit() {
        let mut app = app(b"@");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
