//! Order address edit screen

use super::field::{active_style, field_line, surface_block, toggle_line};
use crate::app::{address_rows, AddressRow, AddressScreen, ADDRESS_FIELDS};
use dashboard_forms::api::AddressType;
use dashboard_forms::dialogs::address_edit::{
    fields, form_address_field, input_option, selected_customer_address_id,
};
use dashboard_forms::dialogs::{AddressEditDialog, AddressEditVariant, AddressInputOption};
use dashboard_forms::{FieldValue, FormController, FormSnapshot};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// English text for the dialog's message keys
fn message(key: &str) -> &'static str {
    match key {
        "shippingChangeTitle" => "Change shipping address",
        "billingChangeTitle" => "Change billing address",
        "customerChangeTitle" => "Change customer details",
        "customerChangeDescription" => "Select the addresses you want to use for this order.",
        "addressChangeDescription" => {
            "Which address would you like to use? Pick one of the customer's saved addresses or enter a new one."
        }
        "noAddressDescription" => {
            "This customer has no saved addresses. Enter a new address for the order."
        }
        "customerChangeBillingDescription" => {
            "Select one of the customer's addresses or add a new one"
        }
        "noAddressBillingDescription" => "Add a new billing address",
        "continue" => "Continue",
        "save" => "Save",
        _ => "",
    }
}

fn same_address_label(variant: AddressEditVariant) -> &'static str {
    match variant {
        AddressEditVariant::ChangeShippingAddress => "Set the same for billing address",
        AddressEditVariant::ChangeBillingAddress => "Set the same for shipping address",
        AddressEditVariant::ChangeCustomer => "Billing address same as shipping",
    }
}

pub fn draw(frame: &mut Frame, area: Rect, screen: &AddressScreen) {
    let dialog = &screen.dialog;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Description
            Constraint::Min(0),    // Form body
        ])
        .split(area);

    let description = Paragraph::new(message(dialog.description_key()))
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", message(dialog.title_key())))
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(description, chunks[0]);

    let surface = dialog.form().render(|state| {
        if dialog.search_state().open {
            picker_lines(dialog, screen.picker)
        } else {
            form_lines(dialog, state, screen.focus)
        }
    });
    let body = Paragraph::new(surface.content).block(surface_block(&surface.attributes));
    frame.render_widget(body, chunks[1]);
}

fn picker_lines(dialog: &AddressEditDialog, picker: usize) -> Vec<Line<'static>> {
    let search = dialog.search_state();
    let address_type = search.address_type.unwrap_or(AddressType::Shipping);
    let mut lines = vec![Line::from(Span::styled(
        format!("Saved addresses ({})", address_type.label().to_lowercase()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (i, address) in dialog.customer_addresses().iter().enumerate() {
        let selected = i == picker;
        let prefix = if selected { "▸ " } else { "  " };
        let style = if selected {
            active_style()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(format!("{prefix}{}", address.summary()), style)));
    }
    lines
}

fn section_header(dialog: &AddressEditDialog, address_type: AddressType) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} address", address_type.label()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if address_type == AddressType::Billing
        && dialog.variant() == AddressEditVariant::ChangeCustomer
    {
        lines.push(Line::from(Span::styled(
            message(dialog.billing_description_key()),
            Style::default().fg(Color::Gray),
        )));
    }
    for error in dialog.errors_for(address_type) {
        let text = match (&error.field, &error.message) {
            (_, Some(message)) => message.clone(),
            (Some(field), None) => format!("{field}: {}", error.code),
            (None, None) => error.code.clone(),
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(Color::Red))));
    }
    lines
}

fn saved_address_value(
    dialog: &AddressEditDialog,
    data: &FormSnapshot,
    address_type: AddressType,
) -> FieldValue {
    selected_customer_address_id(data, address_type)
        .and_then(|id| dialog.customer_addresses().iter().find(|a| a.id == id))
        .map(|address| FieldValue::from(address.summary()))
        .unwrap_or_default()
}

fn row_line(
    dialog: &AddressEditDialog,
    state: &FormController,
    row: AddressRow,
    is_active: bool,
) -> Line<'static> {
    let data = state.data();
    match row {
        AddressRow::InputOption(address_type) => {
            let label = match input_option(data, address_type) {
                AddressInputOption::CustomerAddress => "Use a saved address",
                AddressInputOption::NewAddress => "Enter a new address",
            };
            field_line("Source", &FieldValue::from(label), is_active)
        }
        AddressRow::SavedAddress(address_type) => {
            let saved = saved_address_value(dialog, data, address_type);
            field_line("Saved address", &saved, is_active)
        }
        AddressRow::Field(address_type, index) => {
            let (key, label) = ADDRESS_FIELDS.get(index).copied().unwrap_or(("", ""));
            let value = data
                .record(form_address_field(address_type))
                .and_then(|record| record.get(key))
                .cloned()
                .unwrap_or_default();
            field_line(label, &value, is_active)
        }
        AddressRow::SameAddress => toggle_line(
            same_address_label(dialog.variant()),
            data.flag(fields::BILLING_SAME_AS_SHIPPING).unwrap_or(false),
            is_active,
        ),
        AddressRow::Submit => {
            let label = if state.is_submitting() {
                "Saving…"
            } else {
                message(dialog.submit_label_key())
            };
            let style = if is_active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let button = Span::styled(format!("[ {label} ]"), style);
            Line::from(vec![Span::raw("  "), button])
        }
    }
}

fn form_lines(
    dialog: &AddressEditDialog,
    state: &FormController,
    focus: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut section = None;
    for (i, row) in address_rows(dialog).into_iter().enumerate() {
        let row_section = match row {
            AddressRow::InputOption(t) | AddressRow::SavedAddress(t) | AddressRow::Field(t, _) => {
                Some(t)
            }
            _ => None,
        };
        if row_section.is_some() && row_section != section {
            if let Some(address_type) = row_section {
                lines.extend(section_header(dialog, address_type));
            }
            section = row_section;
        }
        if row == AddressRow::Submit {
            lines.push(Line::from(""));
        }
        lines.push(row_line(dialog, state, row, i == focus));
    }
    lines
}
