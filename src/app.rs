//! Application state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dashboard_forms::api::{
    AddressType, DashboardApi, SAMPLE_CUSTOMER_ID, SAMPLE_GIFT_CARD_ID, SAMPLE_ORDER_ID,
};
use dashboard_forms::dialogs::address_edit::{
    form_address_field, input_option, selected_customer_address_id,
};
use dashboard_forms::dialogs::{
    AddressEditDialog, AddressEditProps, AddressEditVariant, AddressInputOption,
    GiftCardTagInput,
};
use dashboard_forms::form::SubmitResult;
use dashboard_forms::{
    DashboardConfig, FormAttributes, FormConfig, FormRenderer, LeaveDecision, SubmitError,
    SubmitOutcome, TriggerEvent,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Editable fields of a typed address: (form key, label)
pub const ADDRESS_FIELDS: &[(&str, &str)] = &[
    ("firstName", "First name"),
    ("lastName", "Last name"),
    ("companyName", "Company"),
    ("streetAddress1", "Street"),
    ("city", "City"),
    ("postalCode", "Postal code"),
    ("country", "Country code"),
    ("phone", "Phone"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Addresses,
    GiftCardTags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Address(AddressEditVariant),
    GiftCardTags,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Address(AddressEditVariant::ChangeCustomer) => "Change customer",
            Self::Address(AddressEditVariant::ChangeShippingAddress) => "Change shipping address",
            Self::Address(AddressEditVariant::ChangeBillingAddress) => "Change billing address",
            Self::GiftCardTags => "Edit gift card tags",
        }
    }

    /// Id attribute of the form the entry opens
    pub fn form_id(&self) -> &'static str {
        match self {
            Self::Address(AddressEditVariant::ChangeCustomer) => "change-customer",
            Self::Address(AddressEditVariant::ChangeShippingAddress) => "change-shipping-address",
            Self::Address(AddressEditVariant::ChangeBillingAddress) => "change-billing-address",
            Self::GiftCardTags => "gift-card-tags",
        }
    }
}

pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem::Address(AddressEditVariant::ChangeCustomer),
    MenuItem::Address(AddressEditVariant::ChangeShippingAddress),
    MenuItem::Address(AddressEditVariant::ChangeBillingAddress),
    MenuItem::GiftCardTags,
];

/// A focusable row of the address screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRow {
    InputOption(AddressType),
    SavedAddress(AddressType),
    /// Index into [`ADDRESS_FIELDS`]
    Field(AddressType, usize),
    SameAddress,
    Submit,
}

/// Rows shown for the dialog's current state, top to bottom
pub fn address_rows(dialog: &AddressEditDialog) -> Vec<AddressRow> {
    let has_saved = !dialog.customer_addresses().is_empty();
    let mut rows = Vec::new();
    for (index, address_type) in dialog.sections().into_iter().enumerate() {
        if has_saved {
            rows.push(AddressRow::InputOption(address_type));
        }
        if has_saved
            && input_option(dialog.data(), address_type) == AddressInputOption::CustomerAddress
        {
            rows.push(AddressRow::SavedAddress(address_type));
        } else {
            rows.extend((0..ADDRESS_FIELDS.len()).map(|i| AddressRow::Field(address_type, i)));
        }
        if index == 0 {
            rows.push(AddressRow::SameAddress);
        }
    }
    rows.push(AddressRow::Submit);
    rows
}

pub struct AddressScreen {
    pub dialog: AddressEditDialog,
    pub focus: usize,
    /// Highlighted entry of the saved-address picker
    pub picker: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFocus {
    Query,
    Choice(usize),
}

pub struct TagScreen {
    pub input: GiftCardTagInput,
    pub focus: TagFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitTarget {
    Addresses,
    GiftCardTags,
}

impl SubmitTarget {
    fn screen(self) -> Screen {
        match self {
            Self::Addresses => Screen::Addresses,
            Self::GiftCardTags => Screen::GiftCardTags,
        }
    }
}

struct PendingTask {
    target: SubmitTarget,
    /// Controller that started the submission
    form_id: Uuid,
    handle: JoinHandle<SubmitResult>,
}

/// Main application struct
pub struct App {
    pub config: DashboardConfig,
    api: Arc<dyn DashboardApi>,
    pub screen: Screen,
    pub menu_index: usize,
    pub addresses: Option<AddressScreen>,
    pub tags: Option<TagScreen>,
    pending: Vec<PendingTask>,
    pub status_message: Option<String>,
    /// Errors waiting to be dismissed, oldest first
    pub errors: Vec<String>,
    /// Leave confirmation is showing
    pub confirm_leave: bool,
    quit: bool,
}

impl App {
    pub fn new(config: DashboardConfig, api: Arc<dyn DashboardApi>) -> Self {
        Self {
            config,
            api,
            screen: Screen::Menu,
            menu_index: 0,
            addresses: None,
            tags: None,
            pending: Vec::new(),
            status_message: None,
            errors: Vec::new(),
            confirm_leave: false,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn order_id(&self) -> String {
        self.config
            .order_id
            .clone()
            .unwrap_or_else(|| SAMPLE_ORDER_ID.to_string())
    }

    fn customer_id(&self) -> String {
        self.config
            .customer_id
            .clone()
            .unwrap_or_else(|| SAMPLE_CUSTOMER_ID.to_string())
    }

    fn gift_card_id(&self) -> String {
        self.config
            .gift_card_id
            .clone()
            .unwrap_or_else(|| SAMPLE_GIFT_CARD_ID.to_string())
    }

    /// Form options for a menu entry's dialog
    fn form_config(&self, item: MenuItem) -> FormConfig {
        FormConfig {
            attributes: FormAttributes::default()
                .with_id(item.form_id())
                .with_name(item.label()),
            ..self.config.form_config()
        }
    }

    fn screen_form(&self, screen: Screen) -> Option<&FormRenderer> {
        match screen {
            Screen::Addresses => self.addresses.as_ref().map(|s| s.dialog.form()),
            Screen::GiftCardTags => self.tags.as_ref().map(|s| s.input.form()),
            Screen::Menu => None,
        }
    }

    fn open_form_id(&self, screen: Screen) -> Option<Uuid> {
        self.screen_form(screen).map(|form| form.controller().id())
    }

    /// Collect submissions that settled since the last call
    pub async fn poll_submissions(&mut self) {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|task| task.handle.is_finished());
        self.pending = running;

        for task in finished {
            match task.handle.await {
                Ok(result) => self.finish_submission(task.target, task.form_id, result),
                Err(err) => self.push_error(format!("Submission task failed: {err}")),
            }
        }
    }

    fn finish_submission(&mut self, target: SubmitTarget, form_id: Uuid, result: SubmitResult) {
        let errors = match result {
            Ok(errors) => errors,
            Err(err) => {
                warn!(error = %err, "submission failed");
                self.push_error(err.to_string());
                return;
            }
        };

        // The dialog was left, and maybe reopened, while the request ran
        if self.open_form_id(target.screen()) != Some(form_id) {
            debug!(form = %form_id, ?target, "ignoring result for a closed form");
            return;
        }

        match target {
            SubmitTarget::Addresses if errors.is_empty() => {
                info!("order addresses saved");
                if let Some(mut screen) = self.addresses.take() {
                    screen.dialog.close();
                }
                if self.screen == Screen::Addresses {
                    self.screen = Screen::Menu;
                }
                self.status_message = Some("Order addresses updated".to_string());
            }
            SubmitTarget::Addresses => {
                let count = errors.len();
                if let Some(screen) = self.addresses.as_mut() {
                    screen.dialog.set_errors(errors);
                }
                self.status_message = Some(format!("{count} address error(s)"));
            }
            SubmitTarget::GiftCardTags if errors.is_empty() => {
                info!("gift card tags saved");
                self.tags = None;
                if self.screen == Screen::GiftCardTags {
                    self.screen = Screen::Menu;
                }
                self.status_message = Some("Gift card tags saved".to_string());
            }
            SubmitTarget::GiftCardTags => {
                let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
                self.push_error(format!("Could not save tags: {}", codes.join(", ")));
            }
        }
    }

    fn track(&mut self, target: SubmitTarget, form_id: Uuid, outcome: SubmitOutcome) {
        if let SubmitOutcome::Pending(pending) = outcome {
            self.pending.push(PendingTask {
                target,
                form_id,
                handle: tokio::spawn(pending),
            });
            self.status_message = Some("Saving...".to_string());
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if !self.errors.is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.errors.remove(0);
            }
            return Ok(());
        }

        if self.confirm_leave {
            self.handle_confirm_leave_key(key);
            return Ok(());
        }

        match self.screen {
            Screen::Menu => self.handle_menu_key(key).await,
            Screen::Addresses => {
                self.handle_address_key(key);
                Ok(())
            }
            Screen::GiftCardTags => self.handle_tags_key(key).await,
        }
    }

    async fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_index = self.menu_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_index = (self.menu_index + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Enter => match MENU_ITEMS.get(self.menu_index) {
                Some(MenuItem::Address(variant)) => self.open_addresses(*variant).await,
                Some(MenuItem::GiftCardTags) => self.open_tags().await,
                None => {}
            },
            _ => {}
        }
        Ok(())
    }

    async fn open_addresses(&mut self, variant: AddressEditVariant) {
        let customer_id = self.customer_id();
        let customer_addresses = match self.api.customer_addresses(&customer_id).await {
            Ok(addresses) => addresses,
            Err(err) => {
                warn!(customer = %customer_id, error = %err, "could not load customer addresses");
                self.push_error(format!("Could not load addresses: {err}"));
                return;
            }
        };
        let props = AddressEditProps {
            default_shipping_address: customer_addresses.first().cloned(),
            default_billing_address: customer_addresses.last().cloned(),
            customer_addresses,
        };

        match AddressEditDialog::new(
            variant,
            props,
            Arc::clone(&self.api),
            self.order_id(),
            self.form_config(MenuItem::Address(variant)),
        ) {
            Ok(dialog) => {
                self.addresses = Some(AddressScreen {
                    dialog,
                    focus: 0,
                    picker: 0,
                });
                self.screen = Screen::Addresses;
                self.status_message = None;
            }
            Err(err) => self.push_error(err.to_string()),
        }
    }

    async fn open_tags(&mut self) {
        let gift_card_id = self.gift_card_id();
        let current = match self.api.gift_card_tags(&gift_card_id).await {
            Ok(tags) => tags,
            Err(err) => {
                self.push_error(format!("Could not load gift card: {err}"));
                return;
            }
        };
        let mut input = GiftCardTagInput::new(
            gift_card_id,
            &current,
            Arc::clone(&self.api),
            self.form_config(MenuItem::GiftCardTags),
            self.config.search_page_size(),
        );
        let searched = input.search().await.map(|choices| choices.len());
        self.tags = Some(TagScreen {
            input,
            focus: TagFocus::Query,
        });
        self.screen = Screen::GiftCardTags;
        self.status_message = None;
        if let Err(err) = searched {
            self.push_error(err.to_string());
        }
    }

    fn request_leave(&mut self) {
        let form = self.screen_form(self.screen);
        let decision = form.map(FormRenderer::request_leave);
        if decision == Some(LeaveDecision::ConfirmRequired) {
            self.confirm_leave = true;
        } else {
            self.leave_screen();
        }
    }

    fn leave_screen(&mut self) {
        if let Some(mut screen) = self.addresses.take() {
            screen.dialog.close();
        }
        self.tags = None;
        self.screen = Screen::Menu;
    }

    fn handle_confirm_leave_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.confirm_leave = false;
                self.leave_screen();
            }
            KeyCode::Char('n') | KeyCode::Esc => self.confirm_leave = false,
            _ => {}
        }
    }

    fn handle_address_key(&mut self, key: KeyEvent) {
        let Some(screen) = self.addresses.as_mut() else {
            self.screen = Screen::Menu;
            return;
        };

        if screen.dialog.search_state().open {
            self.handle_picker_key(key);
            return;
        }

        if key.code == KeyCode::Esc {
            self.request_leave();
            return;
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.submit_addresses();
            return;
        }

        let rows = address_rows(&screen.dialog);
        let row = rows.get(screen.focus).copied();
        match (key.code, row) {
            (KeyCode::Up | KeyCode::BackTab, _) => {
                screen.focus = screen.focus.saturating_sub(1);
            }
            (KeyCode::Down | KeyCode::Tab, _) => {
                screen.focus = (screen.focus + 1).min(rows.len().saturating_sub(1));
            }
            (KeyCode::Enter | KeyCode::Char(' '), Some(AddressRow::InputOption(address_type))) => {
                screen.dialog.toggle_input_option(address_type);
            }
            (KeyCode::Enter | KeyCode::Char(' '), Some(AddressRow::SameAddress)) => {
                screen.dialog.toggle_billing_same_as_shipping();
            }
            (KeyCode::Left | KeyCode::Right, Some(AddressRow::SavedAddress(address_type))) => {
                let forward = key.code == KeyCode::Right;
                cycle_saved_address(&mut screen.dialog, address_type, forward);
            }
            (KeyCode::Enter, Some(AddressRow::Submit)) => {
                self.submit_addresses();
                return;
            }
            (KeyCode::Char(c), Some(AddressRow::Field(address_type, index))) => {
                edit_address_field(&mut screen.dialog, address_type, index, |value| {
                    value.push(c);
                });
            }
            (KeyCode::Backspace, Some(AddressRow::Field(address_type, index))) => {
                edit_address_field(&mut screen.dialog, address_type, index, |value| {
                    value.pop();
                });
            }
            _ => {}
        }

        let row_count = address_rows(&screen.dialog).len();
        screen.focus = screen.focus.min(row_count.saturating_sub(1));
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(screen) = self.addresses.as_mut() else {
            return;
        };
        let count = screen.dialog.customer_addresses().len();
        match key.code {
            KeyCode::Esc => screen.dialog.exit_search(),
            KeyCode::Up | KeyCode::Char('k') => screen.picker = screen.picker.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                screen.picker = (screen.picker + 1).min(count.saturating_sub(1));
            }
            KeyCode::Enter => {
                let search = screen.dialog.search_state();
                let picked = screen
                    .dialog
                    .customer_addresses()
                    .get(screen.picker)
                    .map(|address| address.id.clone());
                if let (Some(address_type), Some(id)) = (search.address_type, picked) {
                    screen.dialog.select_customer_address(address_type, &id);
                    self.submit_addresses();
                }
            }
            _ => {}
        }
    }

    fn submit_addresses(&mut self) {
        let Some(screen) = self.addresses.as_mut() else {
            return;
        };
        if screen.dialog.form().controller().is_submitting() {
            self.status_message = Some("Already saving".to_string());
            return;
        }

        let form_id = screen.dialog.form().controller().id();
        let mut trigger = TriggerEvent::new();
        let result = screen.dialog.submit(Some(&mut trigger));
        let search_open = screen.dialog.search_state().open;
        if search_open {
            screen.picker = 0;
        }

        match result {
            Ok(SubmitOutcome::Void) if search_open => {
                self.status_message = Some("Pick a saved address".to_string());
            }
            Ok(outcome) => self.track(SubmitTarget::Addresses, form_id, outcome),
            Err(err) => self.report_submit_error(err),
        }
    }

    async fn handle_tags_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(screen) = self.tags.as_mut() else {
            self.screen = Screen::Menu;
            return Ok(());
        };

        if key.code == KeyCode::Esc {
            self.request_leave();
            return Ok(());
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.submit_tags(),
                KeyCode::Char('a') => screen.input.toggle_query_tag(),
                _ => {}
            }
            return Ok(());
        }

        let choice_count = screen.input.choices().len();
        match (screen.focus, key.code) {
            (TagFocus::Query, KeyCode::Char(c)) => {
                let mut query = screen.input.query().to_string();
                query.push(c);
                screen.input.set_query(query);
            }
            (TagFocus::Query, KeyCode::Backspace) => {
                let mut query = screen.input.query().to_string();
                query.pop();
                screen.input.set_query(query);
            }
            (TagFocus::Query, KeyCode::Enter) => {
                let searched = screen.input.search().await.map(|choices| choices.len());
                match searched {
                    Ok(0) => self.status_message = Some("No matching tags".to_string()),
                    Ok(_) => self.status_message = None,
                    Err(err) => self.push_error(err.to_string()),
                }
            }
            (TagFocus::Query, KeyCode::Down | KeyCode::Tab) if choice_count > 0 => {
                screen.focus = TagFocus::Choice(0);
            }
            (TagFocus::Choice(0), KeyCode::Up | KeyCode::BackTab) => {
                screen.focus = TagFocus::Query;
            }
            (TagFocus::Choice(i), KeyCode::Up | KeyCode::BackTab) => {
                screen.focus = TagFocus::Choice(i - 1);
            }
            (TagFocus::Choice(i), KeyCode::Down | KeyCode::Tab) => {
                screen.focus = TagFocus::Choice((i + 1).min(choice_count.saturating_sub(1)));
            }
            (TagFocus::Choice(i), KeyCode::Enter | KeyCode::Char(' ')) => {
                if let Some(tag) = screen.input.choices().get(i).cloned() {
                    screen.input.toggle_tag(&tag);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_tags(&mut self) {
        let Some(screen) = self.tags.as_mut() else {
            return;
        };
        if screen.input.form().controller().is_submitting() {
            self.status_message = Some("Already saving".to_string());
            return;
        }
        let form_id = screen.input.form().controller().id();
        let result = screen.input.submit(Some(&mut TriggerEvent::new()));
        match result {
            Ok(outcome) => self.track(SubmitTarget::GiftCardTags, form_id, outcome),
            Err(err) => self.report_submit_error(err),
        }
    }

    fn report_submit_error(&mut self, err: SubmitError) {
        warn!(error = %err, "submit rejected");
        self.push_error(err.to_string());
    }
}

fn cycle_saved_address(dialog: &mut AddressEditDialog, address_type: AddressType, forward: bool) {
    let addresses = dialog.customer_addresses();
    if addresses.is_empty() {
        return;
    }
    let current = selected_customer_address_id(dialog.data(), address_type)
        .and_then(|id| addresses.iter().position(|a| a.id == id));
    let next = match (current, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % addresses.len(),
        (Some(i), false) => (i + addresses.len() - 1) % addresses.len(),
    };
    let id = addresses[next].id.clone();
    dialog.select_customer_address(address_type, &id);
}

fn edit_address_field(
    dialog: &mut AddressEditDialog,
    address_type: AddressType,
    index: usize,
    edit: impl FnOnce(&mut String),
) {
    let Some((key, _)) = ADDRESS_FIELDS.get(index) else {
        return;
    };
    let mut value = dialog
        .data()
        .record(form_address_field(address_type))
        .and_then(|record| record.text(key))
        .unwrap_or_default()
        .to_string();
    edit(&mut value);
    dialog.change_form_address(address_type, key, &value);
}
