//! Status bar rendering with keybindings and state indicators

use crate::memory::Cell;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar shows
#[derive(Debug, Clone, Copy)]
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub ticks: u64,
    pub history_position: usize,
    pub total_snapshots: usize,
    /// Snapshot bytes in use and the limit
    pub history_memory: (usize, usize),
    pub exit_code: Option<Cell>,
    pub is_playing: bool,
}

/// History memory as `used/limit MiB`
pub fn history_text(used: usize, limit: usize) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    format!("{:.1}/{:.0} MiB", used as f64 / MIB, limit as f64 / MIB)
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData<'_>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let tick_text = format!(
        " Tick {} | {}/{} | {} ",
        data.ticks,
        data.history_position + 1,
        data.total_snapshots.max(1),
        history_text(data.history_memory.0, data.history_memory.1)
    );

    let left_spans = vec![
        Span::styled(
            tick_text,
            Style::default()
                .bg(if data.exit_code.is_some() {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⎵ ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / ⌫ ", key_style),
        Span::styled(" run/rewind ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⇥ ", key_style),
        Span::styled(" next IP ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let badge = |text: String, bg: Color| {
        Span::styled(
            text,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };

    let is_at_end = data.history_position + 1 >= data.total_snapshots;
    if data.is_playing {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(badge(" ▶ PLAYING ".to_string(), DEFAULT_THEME.secondary));
    } else if let (Some(code), true) = (data.exit_code, is_at_end) {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(badge(format!(" EXIT {} ", code), DEFAULT_THEME.error));
    } else if data.history_position == 0 {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(badge(" START ".to_string(), DEFAULT_THEME.success));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_text() {
        assert_eq!(history_text(0, 64 * 1024 * 1024), "0.0/64 MiB");
        assert_eq!(history_text(3 * 1024 * 1024 / 2, 1024 * 1024 * 1024), "1.5/1024 MiB");
    }
}
