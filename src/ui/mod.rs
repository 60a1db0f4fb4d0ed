//! UI module for rendering the TUI

mod address;
mod dialog;
mod field;
mod tags;

use crate::app::{App, Screen, MENU_ITEMS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match app.screen {
        Screen::Menu => draw_menu(frame, chunks[0], app),
        Screen::Addresses => {
            if let Some(screen) = &app.addresses {
                address::draw(frame, chunks[0], screen);
            }
        }
        Screen::GiftCardTags => {
            if let Some(screen) = &app.tags {
                tags::draw(frame, chunks[0], screen);
            }
        }
    }

    draw_status_bar(frame, chunks[1], app);

    if app.confirm_leave {
        dialog::render_leave_dialog(frame);
    }
    if let Some(error) = app.errors.first() {
        dialog::render_error_dialog(frame, error);
    }
}

fn draw_menu(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let selected = i == app.menu_index;
        let prefix = if selected { "▸ " } else { "  " };
        let style = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(format!("{prefix}{}", item.label()), style)));
    }

    let block = Block::default()
        .title(" Dashboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn screen_hints(app: &App) -> &'static str {
    match app.screen {
        Screen::Menu => "↑↓ select  Enter open  q quit",
        Screen::Addresses => {
            let searching = app
                .addresses
                .as_ref()
                .is_some_and(|s| s.dialog.search_state().open);
            if searching {
                "↑↓ pick address  Enter confirm  Esc back"
            } else {
                "↑↓ move  Space toggle  ←→ saved address  Ctrl+S submit  Esc leave"
            }
        }
        Screen::GiftCardTags => {
            "type to search  Enter search/toggle  Ctrl+A add typed tag  Ctrl+S save  Esc leave"
        }
    }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {}", screen_hints(app)),
        Style::default().fg(Color::DarkGray),
    )];

    if app.has_pending() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("saving…", Style::default().fg(Color::Yellow)));
    }

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
