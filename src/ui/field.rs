//! Field rendering utilities for forms

use dashboard_forms::{FieldValue, FormAttributes};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CURSOR: &str = "▌";

/// Highlight for the focused row
pub fn active_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn value_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn label_style(is_active: bool) -> Style {
    if is_active {
        active_style()
    } else {
        Style::default().fg(Color::White)
    }
}

fn display_or_placeholder(value: &FieldValue, is_active: bool) -> String {
    let display = value.display_value();
    if display.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display
    }
}

/// Frame for a form surface, titled with its `name` attribute
pub fn surface_block(attributes: &FormAttributes) -> Block<'static> {
    let color = if attributes.disabled {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    match &attributes.name {
        Some(name) => block.title(format!(" {name} ")),
        None => block,
    }
}

/// Draw a bordered single-line input
pub fn draw_field(frame: &mut Frame, area: Rect, label: &str, value: &FieldValue, is_active: bool) {
    let style = value_style(is_active);
    let cursor = if is_active { CURSOR } else { "" };
    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_or_placeholder(value, is_active), style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(style);

    frame.render_widget(content.block(block), area);
}

/// One `label: value` line, for forms too tall for bordered inputs
pub fn field_line(label: &str, value: &FieldValue, is_active: bool) -> Line<'static> {
    let marker = if is_active { "▸ " } else { "  " };
    let shown = display_or_placeholder(value, is_active);
    let mut spans = vec![
        Span::styled(format!("{marker}{label}: "), label_style(is_active)),
        Span::styled(shown, value_style(is_active)),
    ];
    if is_active {
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

/// Checkbox line
pub fn toggle_line(label: &str, checked: bool, is_active: bool) -> Line<'static> {
    let marker = if is_active { "▸ " } else { "  " };
    let check = if checked { "[x]" } else { "[ ]" };
    Line::from(Span::styled(format!("{marker}{check} {label}"), label_style(is_active)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn text(line: &Line) -> String {
        line.spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_inactive_empty_value_shows_placeholder() {
        let line = field_line("City", &FieldValue::Null, false);
        assert_eq!(text(&line), "  City: (empty)");
    }

    #[test]
    fn test_active_field_has_cursor() {
        let line = field_line("City", &FieldValue::from("Berlin"), true);
        assert_eq!(text(&line), "▸ City: Berlin▌");
    }

    #[test]
    fn test_toggle_line() {
        let checked = toggle_line("Same as shipping", true, false);
        assert_eq!(text(&checked), "  [x] Same as shipping");
        let focused = toggle_line("Same as shipping", false, true);
        assert_eq!(text(&focused), "▸ [ ] Same as shipping");
    }

    #[test]
    fn test_surface_block_titled_with_name_attribute() {
        let attributes = FormAttributes::default().with_name("Edit gift card tags");
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(surface_block(&attributes), frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Edit gift card tags"));
    }
}
