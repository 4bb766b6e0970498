//! Terminal output pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Split program output into display lines
///
/// A trailing newline does not start an empty line. Control characters other
/// than tab are dropped so escape sequences from TERM don't garble the pane.
pub fn output_lines(output: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(output);
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            line.chars()
                .filter(|c| *c == '\t' || !c.is_control())
                .collect()
        })
        .collect();
    if lines.last().is_some_and(|s| s.is_empty()) {
        lines.pop();
    }
    lines
}

/// Render the terminal output pane
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &[u8],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Program Output ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = output_lines(output);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
    } else {
        let block = block.padding(Padding::new(1, 0, 0, 0));
        let all_items: Vec<ListItem> = lines
            .into_iter()
            .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
            .collect();

        let total_items = all_items.len();
        let visible_height = area.height.saturating_sub(2).max(1) as usize;

        // usize::MAX from the app means "follow the end"
        if total_items > visible_height {
            let max_scroll = total_items - visible_height;
            *scroll_offset = (*scroll_offset).min(max_scroll);
        } else {
            *scroll_offset = 0;
        }

        let visible_items: Vec<ListItem> = all_items
            .into_iter()
            .skip(*scroll_offset)
            .take(visible_height)
            .collect();

        frame.render_widget(List::new(visible_items).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_lines() {
        assert_eq!(output_lines(b"1 2 \nhi\n"), vec!["1 2 ", "hi"]);
        assert_eq!(output_lines(b"a\n\nb"), vec!["a", "", "b"]);
        assert!(output_lines(b"").is_empty());
    }

    #[test]
    fn test_escape_sequences_are_stripped() {
        assert_eq!(output_lines(b"\x1b[2Jok\r\n"), vec!["[2Jok"]);
    }
}
