//! Funge-space pane rendering
//!
//! Shows a window of funge-space centred on the selected IP. The cell under
//! the selected IP and the cells under every other IP are highlighted, and a
//! handful of instruction classes get their own colour so control flow stands
//! out from data.

use crate::interpreter::ip::InstructionPointer;
use crate::memory::{Cell, FungeSpace, Vector};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Character used to draw a cell
///
/// Printable ASCII is shown as itself; everything else as a middle dot.
pub fn cell_glyph(value: Cell) -> char {
    match u8::try_from(value) {
        Ok(b) if (0x20..0x7f).contains(&b) => b as char,
        _ => '·',
    }
}

/// Top-left corner of a `width` × `height` window centred on `center`
pub fn window_origin(center: Vector, width: u16, height: u16) -> Vector {
    Vector::new(
        center.x.wrapping_sub(Cell::from(width / 2)),
        center.y.wrapping_sub(Cell::from(height / 2)),
    )
}

fn instruction_style(glyph: char) -> Style {
    match glyph {
        '>' | '<' | '^' | 'v' | '?' | '#' | '_' | '|' | '[' | ']' | 'r' | 'x' | 'j' | 'k' => {
            Style::default().fg(DEFAULT_THEME.direction)
        }
        '0'..='9' | 'a'..='f' => Style::default().fg(DEFAULT_THEME.number),
        '"' | '\'' | ';' => Style::default().fg(DEFAULT_THEME.string),
        '@' | 'q' => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD),
        '·' => Style::default().fg(DEFAULT_THEME.comment),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the funge-space pane
pub fn render_space_pane(
    frame: &mut Frame,
    area: Rect,
    space: &FungeSpace,
    ips: &[InstructionPointer],
    selected: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let center = ips.get(selected).map_or(Vector::ZERO, |ip| ip.position);
    let bounds = space.bounds();
    let title = format!(
        " Funge-Space {} | bounds {}..{} ",
        center, bounds.least, bounds.greatest
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let width = area.width.saturating_sub(2);
    let height = area.height.saturating_sub(2);
    let origin = window_origin(center, width, height);

    let lines: Vec<Line> = (0..height)
        .map(|row| {
            let y = origin.y.wrapping_add(Cell::from(row));
            let spans: Vec<Span> = (0..width)
                .map(|col| {
                    let pos = Vector::new(origin.x.wrapping_add(Cell::from(col)), y);
                    let glyph = cell_glyph(space.get(pos));
                    let mut style = instruction_style(glyph);
                    if let Some(index) = ips.iter().position(|ip| ip.position == pos) {
                        let bg = if index == selected {
                            DEFAULT_THEME.selected_ip_bg
                        } else {
                            DEFAULT_THEME.other_ip_bg
                        };
                        style = style.bg(bg).fg(Color::Black).add_modifier(Modifier::BOLD);
                    }
                    Span::styled(glyph.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_glyph() {
        assert_eq!(cell_glyph(Cell::from(b'>')), '>');
        assert_eq!(cell_glyph(32), ' ');
        assert_eq!(cell_glyph(10), '·');
        assert_eq!(cell_glyph(-5), '·');
        assert_eq!(cell_glyph(1000), '·');
    }

    #[test]
    fn test_window_origin_centres_position() {
        assert_eq!(window_origin(Vector::new(10, 4), 20, 8), Vector::new(0, 0));
        assert_eq!(window_origin(Vector::ZERO, 5, 3), Vector::new(-2, -1));
    }
}
