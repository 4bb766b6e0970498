//! Stack-stack pane rendering
//!
//! Lists the selected IP's registers followed by every stack of its
//! stack-stack, TOSS first and each stack top first.

use crate::interpreter::ip::InstructionPointer;
use crate::memory::Cell;
use crate::ui::panes::space::cell_glyph;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// One row of the stack pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackRow {
    /// Heading for stack `index` (0 is TOSS)
    Header { index: usize, len: usize },
    /// A value, with its depth from the top of its stack
    Value { depth: usize, value: Cell },
}

/// Flatten an IP's stack-stack into display rows
pub fn stack_rows(ip: &InstructionPointer) -> Vec<StackRow> {
    let mut rows = Vec::new();
    for (index, stack) in ip.stacks().stacks().iter().rev().enumerate() {
        rows.push(StackRow::Header {
            index,
            len: stack.len(),
        });
        rows.extend(
            stack
                .entries()
                .iter()
                .rev()
                .enumerate()
                .map(|(depth, &value)| StackRow::Value { depth, value }),
        );
    }
    rows
}

fn register_lines(ip: &InstructionPointer) -> Vec<Line<'static>> {
    let label = Style::default().fg(DEFAULT_THEME.comment);
    let value = Style::default().fg(DEFAULT_THEME.fg);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("pos ", label),
            Span::styled(ip.position.to_string(), value),
            Span::styled("  delta ", label),
            Span::styled(ip.delta.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("offset ", label),
            Span::styled(ip.storage_offset.to_string(), value),
        ]),
    ];
    if ip.string_mode {
        lines.push(Line::from(Span::styled(
            "string mode",
            Style::default()
                .fg(DEFAULT_THEME.string)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines
}

fn row_item(row: &StackRow) -> ListItem<'static> {
    match *row {
        StackRow::Header { index, len } => {
            let name = match index {
                0 => "TOSS".to_string(),
                1 => "SOSS".to_string(),
                n => format!("stack {}", n),
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} ({} values)", name, len),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            )))
        }
        StackRow::Value { depth, value } => {
            let glyph = cell_glyph(value);
            let mut spans = vec![
                Span::styled(
                    format!("{:>4} ", depth),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
            ];
            if glyph != '·' && glyph != ' ' {
                spans.push(Span::styled(
                    format!("  '{}'", glyph),
                    Style::default().fg(DEFAULT_THEME.string),
                ));
            }
            ListItem::new(Line::from(spans))
        }
    }
}

/// Render the stack pane for the selected IP
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    ip: Option<&InstructionPointer>,
    ip_count: usize,
    selected: usize,
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

    let Some(ip) = ip else {
        let block = Block::default()
            .title(" Stacks ")
            .borders(Borders::ALL)
            .border_style(border_style);
        let paragraph = Paragraph::new("(no live IPs)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let block = Block::default()
        .title(format!(" IP {} ({}/{}) ", ip.id, selected + 1, ip_count))
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let registers = register_lines(ip);
    let mut all_items: Vec<ListItem> = registers.into_iter().map(ListItem::new).collect();
    all_items.extend(stack_rows(ip).iter().map(row_item));

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
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
