//! Gift card tag editor screen

use super::field::{draw_field, surface_block, toggle_line};
use crate::app::{TagFocus, TagScreen};
use dashboard_forms::dialogs::gift_card_tags::tags_of;
use dashboard_forms::FieldValue;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

struct TagLines {
    title: String,
    selected: Line<'static>,
    choices: Vec<Line<'static>>,
}

pub fn draw(frame: &mut Frame, area: Rect, screen: &TagScreen) {
    let input = &screen.input;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Selected tags
            Constraint::Length(3), // Query
            Constraint::Min(0),    // Choices
        ])
        .split(area);

    let surface = input.form().render(|state| {
        let selected = tags_of(state.data());
        let selected_text = if selected.is_empty() {
            Span::styled("no tags", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(selected.join(", "), Style::default().fg(Color::Green))
        };
        let mut title = format!(" Gift card {} ", input.gift_card_id());
        if state.is_submitting() {
            title.push_str("(saving…) ");
        }

        let mut choices = Vec::new();
        if input.choices().is_empty() {
            choices.push(Line::from(Span::styled(
                "No tags found",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        for (i, tag) in input.choices().iter().enumerate() {
            let checked = selected.contains(tag);
            choices.push(toggle_line(tag, checked, screen.focus == TagFocus::Choice(i)));
        }
        TagLines {
            title,
            selected: Line::from(selected_text),
            choices,
        }
    });
    let content = surface.content;

    let tags = Paragraph::new(content.selected).block(
        Block::default()
            .title(content.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(tags, chunks[0]);

    draw_field(
        frame,
        chunks[1],
        "Search tags",
        &FieldValue::from(input.query()),
        screen.focus == TagFocus::Query,
    );

    let choices = Paragraph::new(content.choices).block(surface_block(&surface.attributes));
    frame.render_widget(choices, chunks[2]);
}
