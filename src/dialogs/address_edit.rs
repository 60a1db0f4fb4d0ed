//! Order customer addresses edit dialog
//!
//! Lets staff change an order's customer, or just its shipping or billing
//! address, either by picking one of the customer's saved addresses or by
//! typing a new one. The form state lives in a [`FormRenderer`]; this module
//! adds the dialog's variant rules and maps the submitted snapshot to an
//! [`OrderAddressesInput`] for the API.

use crate::api::{AddressInput, AddressType, CustomerAddress, DashboardApi, OrderAddressesInput};
use crate::error::{FieldError, SubmitError};
use crate::form::{
    submit_fn, FieldValue, FormChangeEvent, FormConfig, FormRenderer, FormSnapshot,
    SubmitOutcome, Submission, TriggerEvent,
};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Field names of the address edit form
pub mod fields {
    pub const SHIPPING_INPUT_OPTION: &str = "shippingAddressInputOption";
    pub const BILLING_INPUT_OPTION: &str = "billingAddressInputOption";
    pub const CUSTOMER_SHIPPING_ADDRESS: &str = "customerShippingAddress";
    pub const CUSTOMER_BILLING_ADDRESS: &str = "customerBillingAddress";
    pub const SHIPPING_ADDRESS: &str = "shippingAddress";
    pub const BILLING_ADDRESS: &str = "billingAddress";
    pub const BILLING_SAME_AS_SHIPPING: &str = "billingSameAsShipping";
}

/// What the dialog was opened to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressEditVariant {
    ChangeCustomer,
    ChangeShippingAddress,
    ChangeBillingAddress,
}

impl AddressEditVariant {
    /// The address edited on its own, `None` when the customer changes
    pub fn address_type(&self) -> Option<AddressType> {
        match self {
            Self::ChangeCustomer => None,
            Self::ChangeShippingAddress => Some(AddressType::Shipping),
            Self::ChangeBillingAddress => Some(AddressType::Billing),
        }
    }
}

/// Where an address comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressInputOption {
    CustomerAddress,
    NewAddress,
}

impl AddressInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerAddress => "customerAddress",
            Self::NewAddress => "newAddress",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customerAddress" => Some(Self::CustomerAddress),
            "newAddress" => Some(Self::NewAddress),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::CustomerAddress => Self::NewAddress,
            Self::NewAddress => Self::CustomerAddress,
        }
    }
}

/// Saved-address picker state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressSearchState {
    pub open: bool,
    pub address_type: Option<AddressType>,
}

impl AddressSearchState {
    pub fn opened(address_type: AddressType) -> Self {
        Self {
            open: true,
            address_type: Some(address_type),
        }
    }
}

/// Data the dialog is opened with
#[derive(Debug, Clone, Default)]
pub struct AddressEditProps {
    pub customer_addresses: Vec<CustomerAddress>,
    pub default_shipping_address: Option<CustomerAddress>,
    pub default_billing_address: Option<CustomerAddress>,
}

fn option_field(address_type: AddressType) -> &'static str {
    match address_type {
        AddressType::Shipping => fields::SHIPPING_INPUT_OPTION,
        AddressType::Billing => fields::BILLING_INPUT_OPTION,
    }
}

fn customer_address_field(address_type: AddressType) -> &'static str {
    match address_type {
        AddressType::Shipping => fields::CUSTOMER_SHIPPING_ADDRESS,
        AddressType::Billing => fields::CUSTOMER_BILLING_ADDRESS,
    }
}

/// Form field holding the typed address of `address_type`
pub fn form_address_field(address_type: AddressType) -> &'static str {
    match address_type {
        AddressType::Shipping => fields::SHIPPING_ADDRESS,
        AddressType::Billing => fields::BILLING_ADDRESS,
    }
}

/// The default address if the customer still has it, else their first address
fn validate_default_address<'a>(
    default: Option<&'a CustomerAddress>,
    customer_addresses: &'a [CustomerAddress],
) -> Option<&'a CustomerAddress> {
    default
        .and_then(|d| customer_addresses.iter().find(|a| a.id == d.id))
        .or_else(|| customer_addresses.first())
}

fn customer_address_value(address: Option<&CustomerAddress>) -> FieldValue {
    match address {
        Some(address) => FormSnapshot::new()
            .with("id", FieldValue::id(&address.id))
            .into(),
        None => FieldValue::Null,
    }
}

/// Initial form data for a dialog
pub fn initial_data(
    variant: AddressEditVariant,
    props: &AddressEditProps,
) -> Result<FormSnapshot, SubmitError> {
    let addresses = &props.customer_addresses;
    let option = if addresses.is_empty() {
        AddressInputOption::NewAddress
    } else {
        AddressInputOption::CustomerAddress
    };
    let shipping = validate_default_address(props.default_shipping_address.as_ref(), addresses);
    let billing = validate_default_address(props.default_billing_address.as_ref(), addresses);
    let empty_address = FormSnapshot::from_record(&AddressInput::default())?;
    let shipping = customer_address_value(shipping);
    let billing = customer_address_value(billing);

    Ok(FormSnapshot::new()
        .with(fields::SHIPPING_INPUT_OPTION, option.as_str())
        .with(fields::BILLING_INPUT_OPTION, option.as_str())
        .with(fields::CUSTOMER_SHIPPING_ADDRESS, shipping)
        .with(fields::CUSTOMER_BILLING_ADDRESS, billing)
        .with(fields::SHIPPING_ADDRESS, empty_address.clone())
        .with(fields::BILLING_ADDRESS, empty_address)
        .with(
            fields::BILLING_SAME_AS_SHIPPING,
            variant == AddressEditVariant::ChangeCustomer,
        ))
}

/// Input option currently chosen for `address_type`
pub fn input_option(data: &FormSnapshot, address_type: AddressType) -> AddressInputOption {
    data.text(option_field(address_type))
        .and_then(AddressInputOption::parse)
        .unwrap_or(AddressInputOption::NewAddress)
}

/// Id of the saved address picked for `address_type`
pub fn selected_customer_address_id(
    data: &FormSnapshot,
    address_type: AddressType,
) -> Option<&str> {
    data.record(customer_address_field(address_type)).and_then(|record| record.text("id"))
}

/// Whether submitting should open the saved-address picker instead of confirming
pub fn continues_to_search(
    variant: AddressEditVariant,
    search: &AddressSearchState,
    data: &FormSnapshot,
) -> bool {
    match variant.address_type() {
        Some(address_type) => {
            !search.open && input_option(data, address_type) == AddressInputOption::CustomerAddress
        }
        None => false,
    }
}

fn resolve_address(
    data: &FormSnapshot,
    customer_addresses: &[CustomerAddress],
    address_type: AddressType,
) -> Result<AddressInput, SubmitError> {
    let use_saved = !customer_addresses.is_empty()
        && input_option(data, address_type) == AddressInputOption::CustomerAddress;

    if !use_saved {
        return match data.record(form_address_field(address_type)) {
            Some(record) => Ok(record.into_record()?),
            None => Ok(AddressInput::default()),
        };
    }

    let id = selected_customer_address_id(data, address_type).ok_or_else(|| {
        SubmitError::Handler(format!(
            "no saved {} address selected",
            address_type.label().to_lowercase()
        ))
    })?;
    customer_addresses
        .iter()
        .find(|address| address.id == id)
        .map(CustomerAddress::to_address_input)
        .ok_or_else(|| SubmitError::Handler(format!("unknown customer address {id}")))
}

/// Map submitted form data to the order mutation input.
///
/// Only the addresses the variant needs are resolved.
pub fn map_addresses(
    variant: AddressEditVariant,
    customer_addresses: &[CustomerAddress],
    data: &FormSnapshot,
) -> Result<OrderAddressesInput, SubmitError> {
    let same = data.flag(fields::BILLING_SAME_AS_SHIPPING).unwrap_or(false);
    match variant {
        AddressEditVariant::ChangeShippingAddress => {
            let shipping = resolve_address(data, customer_addresses, AddressType::Shipping)?;
            Ok(OrderAddressesInput {
                billing_address: same.then(|| shipping.clone()),
                shipping_address: Some(shipping),
            })
        }
        AddressEditVariant::ChangeBillingAddress => {
            let billing = resolve_address(data, customer_addresses, AddressType::Billing)?;
            Ok(OrderAddressesInput {
                shipping_address: same.then(|| billing.clone()),
                billing_address: Some(billing),
            })
        }
        AddressEditVariant::ChangeCustomer => {
            let shipping = resolve_address(data, customer_addresses, AddressType::Shipping)?;
            let billing = if same {
                shipping.clone()
            } else {
                resolve_address(data, customer_addresses, AddressType::Billing)?
            };
            Ok(OrderAddressesInput {
                shipping_address: Some(shipping),
                billing_address: Some(billing),
            })
        }
    }
}

pub struct AddressEditDialog {
    variant: AddressEditVariant,
    customer_addresses: Arc<Vec<CustomerAddress>>,
    search: Arc<Mutex<AddressSearchState>>,
    form: FormRenderer,
    errors: Vec<FieldError>,
}

impl AddressEditDialog {
    pub fn new(
        variant: AddressEditVariant,
        props: AddressEditProps,
        api: Arc<dyn DashboardApi>,
        order_id: impl Into<String>,
        config: FormConfig,
    ) -> Result<Self, SubmitError> {
        let initial = initial_data(variant, &props)?;
        let customer_addresses = Arc::new(props.customer_addresses);
        let search = Arc::new(Mutex::new(AddressSearchState::default()));
        let order_id = order_id.into();

        let handler = {
            let customer_addresses = Arc::clone(&customer_addresses);
            let search = Arc::clone(&search);
            submit_fn(move |data: &FormSnapshot| {
                let poisoned = || SubmitError::Handler("search state poisoned".to_string());
                let mut search_state = search.lock().map_err(|_| poisoned())?;
                if continues_to_search(variant, &search_state, data) {
                    if let Some(address_type) = variant.address_type() {
                        info!(
                            address_type = address_type.label(),
                            "opening saved address search"
                        );
                        *search_state = AddressSearchState::opened(address_type);
                    }
                    return Ok(Submission::Complete);
                }
                drop(search_state);

                let input = map_addresses(variant, &customer_addresses, data)?;
                let api = Arc::clone(&api);
                let search = Arc::clone(&search);
                let order_id = order_id.clone();
                Ok(Submission::deferred(async move {
                    let result = api.update_order_addresses(&order_id, input).await;
                    if result.is_ok() {
                        if let Ok(mut state) = search.lock() {
                            *state = AddressSearchState::default();
                        }
                    }
                    result.map_err(SubmitError::from)
                }))
            })
        };

        let form = FormRenderer::new(config, Some(initial))
            .named("order-customer-addresses")
            .on_submit(handler);

        Ok(Self {
            variant,
            customer_addresses,
            search,
            form,
            errors: Vec::new(),
        })
    }

    pub fn variant(&self) -> AddressEditVariant {
        self.variant
    }

    pub fn form(&self) -> &FormRenderer {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormRenderer {
        &mut self.form
    }

    pub fn data(&self) -> &FormSnapshot {
        self.form.controller().data()
    }

    pub fn customer_addresses(&self) -> &[CustomerAddress] {
        &self.customer_addresses
    }

    pub fn search_state(&self) -> AddressSearchState {
        self.search.lock().map(|state| *state).unwrap_or_default()
    }

    pub fn open_search(&mut self, address_type: AddressType) {
        self.set_search(AddressSearchState::opened(address_type));
    }

    pub fn exit_search(&mut self) {
        self.set_search(AddressSearchState::default());
    }

    fn set_search(&mut self, state: AddressSearchState) {
        if let Ok(mut search) = self.search.lock() {
            *search = state;
        }
    }

    pub fn change(&mut self, event: FormChangeEvent) {
        self.form.controller_mut().change(event);
    }

    /// Pick a saved address for `address_type`
    pub fn select_customer_address(&mut self, address_type: AddressType, id: &str) {
        let value = customer_address_value(self.customer_addresses.iter().find(|a| a.id == id));
        let field = customer_address_field(address_type);
        self.change(FormChangeEvent::new(field, value));
    }

    pub fn toggle_input_option(&mut self, address_type: AddressType) {
        let next = input_option(self.data(), address_type).toggled();
        let field = option_field(address_type);
        self.change(FormChangeEvent::new(field, next.as_str()));
    }

    fn billing_same_as_shipping(&self) -> bool {
        self.data()
            .flag(fields::BILLING_SAME_AS_SHIPPING)
            .unwrap_or(false)
    }

    pub fn toggle_billing_same_as_shipping(&mut self) {
        let same = !self.billing_same_as_shipping();
        self.change(FormChangeEvent::new(fields::BILLING_SAME_AS_SHIPPING, same));
    }

    /// Set one field of the typed address of `address_type`
    pub fn change_form_address(&mut self, address_type: AddressType, field: &str, value: &str) {
        let field_name = form_address_field(address_type);
        let mut address = self.data().record(field_name).cloned().unwrap_or_default();
        address.insert(field, value);
        self.change(FormChangeEvent::new(field_name, address));
    }

    /// Address sections to show, in order
    pub fn sections(&self) -> Vec<AddressType> {
        match self.variant {
            AddressEditVariant::ChangeShippingAddress => vec![AddressType::Shipping],
            AddressEditVariant::ChangeBillingAddress => vec![AddressType::Billing],
            AddressEditVariant::ChangeCustomer => {
                if self.billing_same_as_shipping() {
                    vec![AddressType::Shipping]
                } else {
                    vec![AddressType::Shipping, AddressType::Billing]
                }
            }
        }
    }

    pub fn title_key(&self) -> &'static str {
        match self.variant {
            AddressEditVariant::ChangeShippingAddress => "shippingChangeTitle",
            AddressEditVariant::ChangeBillingAddress => "billingChangeTitle",
            AddressEditVariant::ChangeCustomer => "customerChangeTitle",
        }
    }

    pub fn description_key(&self) -> &'static str {
        if self.customer_addresses.is_empty() {
            "noAddressDescription"
        } else if self.variant == AddressEditVariant::ChangeCustomer {
            "customerChangeDescription"
        } else {
            "addressChangeDescription"
        }
    }

    pub fn billing_description_key(&self) -> &'static str {
        if self.customer_addresses.is_empty() {
            "noAddressBillingDescription"
        } else {
            "customerChangeBillingDescription"
        }
    }

    /// "continue" while submitting would only open the picker, else "save"
    pub fn submit_label_key(&self) -> &'static str {
        if continues_to_search(self.variant, &self.search_state(), self.data()) {
            "continue"
        } else {
            "save"
        }
    }

    pub fn submit(
        &mut self,
        trigger: Option<&mut TriggerEvent>,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.form.handle_submit_trigger(trigger, None::<fn()>)
    }

    /// Record the user errors of the last settled submission
    pub fn set_errors(&mut self, errors: Vec<FieldError>) {
        self.errors = errors;
    }

    /// Errors for one address; errors without an address type apply to both
    pub fn errors_for(&self, address_type: AddressType) -> Vec<&FieldError> {
        self.errors
            .iter()
            .filter(|e| e.address_type.map_or(true, |t| t == address_type))
            .collect()
    }

    /// Close the dialog's picker; the owner drops the dialog afterwards
    pub fn close(&mut self) {
        self.exit_search();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CountryDisplay, MockDashboardApi};
    use pretty_assertions::assert_eq;

    fn saved(id: &str, city: &str) -> CustomerAddress {
        CustomerAddress {
            id: id.to_string(),
            first_name: "Ann".to_string(),
            last_name: "Smith".to_string(),
            company_name: String::new(),
            street_address1: "Main St 1".to_string(),
            street_address2: String::new(),
            city: city.to_string(),
            city_area: String::new(),
            postal_code: "10115".to_string(),
            country: CountryDisplay {
                code: "DE".to_string(),
                country: "Germany".to_string(),
            },
            country_area: String::new(),
            phone: None,
        }
    }

    fn props_with_addresses() -> AddressEditProps {
        AddressEditProps {
            customer_addresses: vec![
                saved("QWRkcmVzczox", "Berlin"),
                saved("QWRkcmVzczoy", "Hamburg"),
            ],
            default_shipping_address: Some(saved("QWRkcmVzczoy", "Hamburg")),
            default_billing_address: Some(saved("QWRkcmVzczo5", "Gone")),
        }
    }

    fn dialog(
        variant: AddressEditVariant,
        props: AddressEditProps,
        api: MockDashboardApi,
    ) -> AddressEditDialog {
        let config = FormConfig::default();
        AddressEditDialog::new(variant, props, Arc::new(api), "T3JkZXI6MQ==", config).unwrap()
    }

    fn typed(city: &str) -> AddressInput {
        AddressInput {
            city: Some(city.to_string()),
            ..Default::default()
        }
    }

    mod initial {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_saved_addresses_preselect_customer_option() {
            let props = props_with_addresses();
            let data = initial_data(AddressEditVariant::ChangeCustomer, &props).unwrap();
            assert_eq!(
                input_option(&data, AddressType::Shipping),
                AddressInputOption::CustomerAddress
            );
            assert_eq!(
                selected_customer_address_id(&data, AddressType::Shipping),
                Some("QWRkcmVzczoy")
            );
            assert_eq!(data.flag(fields::BILLING_SAME_AS_SHIPPING), Some(true));
        }

        #[test]
        fn test_stale_default_falls_back_to_first_address() {
            let props = props_with_addresses();
            let data = initial_data(AddressEditVariant::ChangeBillingAddress, &props).unwrap();
            assert_eq!(
                selected_customer_address_id(&data, AddressType::Billing),
                Some("QWRkcmVzczox")
            );
            assert_eq!(data.flag(fields::BILLING_SAME_AS_SHIPPING), Some(false));
        }

        #[test]
        fn test_no_saved_addresses() {
            let props = AddressEditProps::default();
            let data = initial_data(AddressEditVariant::ChangeCustomer, &props).unwrap();
            assert_eq!(
                input_option(&data, AddressType::Billing),
                AddressInputOption::NewAddress
            );
            let saved = data.get(fields::CUSTOMER_SHIPPING_ADDRESS);
            assert_eq!(saved, Some(&FieldValue::Null));
            let record = data.record(fields::SHIPPING_ADDRESS).unwrap();
            let address: AddressInput = record.into_record().unwrap();
            assert_eq!(address, AddressInput::default());
        }
    }

    mod mapping {
        use super::*;
        use pretty_assertions::assert_eq;

        fn new_address_data(same: bool) -> FormSnapshot {
            let props = AddressEditProps::default();
            let mut data = initial_data(AddressEditVariant::ChangeCustomer, &props).unwrap();
            let shipping = FormSnapshot::from_record(&typed("Berlin")).unwrap();
            let billing = FormSnapshot::from_record(&typed("Paris")).unwrap();
            data.insert(fields::SHIPPING_ADDRESS, shipping);
            data.insert(fields::BILLING_ADDRESS, billing);
            data.insert(fields::BILLING_SAME_AS_SHIPPING, same);
            data
        }

        #[test]
        fn test_change_customer_billing_same_as_shipping() {
            let data = new_address_data(true);
            let input = map_addresses(AddressEditVariant::ChangeCustomer, &[], &data).unwrap();
            assert_eq!(input.shipping_address, Some(typed("Berlin")));
            assert_eq!(input.billing_address, Some(typed("Berlin")));
        }

        #[test]
        fn test_change_customer_separate_billing() {
            let data = new_address_data(false);
            let input = map_addresses(AddressEditVariant::ChangeCustomer, &[], &data).unwrap();
            assert_eq!(input.shipping_address, Some(typed("Berlin")));
            assert_eq!(input.billing_address, Some(typed("Paris")));
        }

        #[test]
        fn test_change_shipping_only() {
            let data = new_address_data(false);
            let variant = AddressEditVariant::ChangeShippingAddress;
            let input = map_addresses(variant, &[], &data).unwrap();
            assert_eq!(input.shipping_address, Some(typed("Berlin")));
            assert_eq!(input.billing_address, None);
        }

        #[test]
        fn test_change_billing_copied_to_shipping() {
            let data = new_address_data(true);
            let variant = AddressEditVariant::ChangeBillingAddress;
            let input = map_addresses(variant, &[], &data).unwrap();
            assert_eq!(input.billing_address, Some(typed("Paris")));
            assert_eq!(input.shipping_address, Some(typed("Paris")));
        }

        #[test]
        fn test_saved_address_is_converted() {
            let props = props_with_addresses();
            let variant = AddressEditVariant::ChangeShippingAddress;
            let data = initial_data(variant, &props).unwrap();
            let input = map_addresses(variant, &props.customer_addresses, &data).unwrap();
            assert_eq!(
                input.shipping_address.and_then(|a| a.city),
                Some("Hamburg".to_string())
            );
        }

        #[test]
        fn test_unknown_saved_address_fails() {
            let props = props_with_addresses();
            let variant = AddressEditVariant::ChangeShippingAddress;
            let mut data = initial_data(variant, &props).unwrap();
            data.insert(
                fields::CUSTOMER_SHIPPING_ADDRESS,
                FormSnapshot::new().with("id", FieldValue::id("QWRkcmVzczo5")),
            );
            let err = map_addresses(variant, &props.customer_addresses, &data).unwrap_err();
            assert!(matches!(err, SubmitError::Handler(_)));
        }

        #[test]
        fn test_continue_to_search_rules() {
            let props = props_with_addresses();
            let variant = AddressEditVariant::ChangeShippingAddress;
            let data = initial_data(variant, &props).unwrap();
            let closed = AddressSearchState::default();
            let open = AddressSearchState::opened(AddressType::Shipping);
            assert!(continues_to_search(variant, &closed, &data));
            assert!(!continues_to_search(variant, &open, &data));
            let customer = AddressEditVariant::ChangeCustomer;
            assert!(!continues_to_search(customer, &closed, &data));
        }
    }

    mod dialog_flow {
        use super::*;
        use pretty_assertions::assert_eq;

        fn shipping_city(input: &OrderAddressesInput) -> Option<&str> {
            input.shipping_address.as_ref()?.city.as_deref()
        }

        #[tokio::test]
        async fn test_first_submit_opens_search_second_confirms() {
            let mut api = MockDashboardApi::new();
            api.expect_update_order_addresses()
                .withf(|_, input| {
                    input.billing_address.is_none() && shipping_city(input) == Some("Berlin")
                })
                .times(1)
                .returning(|_, _| Ok(Vec::new()));
            let variant = AddressEditVariant::ChangeShippingAddress;
            let mut dialog = dialog(variant, props_with_addresses(), api);
            assert_eq!(dialog.submit_label_key(), "continue");

            let mut trigger = TriggerEvent::new();
            let outcome = dialog.submit(Some(&mut trigger)).unwrap();
            assert!(!outcome.is_pending());
            assert!(trigger.is_default_prevented());
            let opened = AddressSearchState::opened(AddressType::Shipping);
            assert_eq!(dialog.search_state(), opened);
            assert_eq!(dialog.submit_label_key(), "save");

            dialog.select_customer_address(AddressType::Shipping, "QWRkcmVzczox");
            let outcome = dialog.submit(None).unwrap();
            assert!(outcome.is_pending());
            assert!(dialog.form().controller().is_submitting());

            let errors = outcome.settle().await.unwrap();
            assert!(errors.is_empty());
            assert!(!dialog.form().controller().is_submitting());
            assert_eq!(dialog.search_state(), AddressSearchState::default());
        }

        #[tokio::test]
        async fn test_change_customer_with_typed_address() {
            let mut api = MockDashboardApi::new();
            api.expect_update_order_addresses()
                .withf(|_, input| {
                    input.shipping_address.is_some()
                        && input.shipping_address == input.billing_address
                })
                .times(1)
                .returning(|_, _| Ok(Vec::new()));
            let props = AddressEditProps::default();
            let mut dialog = dialog(AddressEditVariant::ChangeCustomer, props, api);
            dialog.change_form_address(AddressType::Shipping, "city", "Berlin");
            dialog.change_form_address(AddressType::Shipping, "postalCode", "10115");
            assert!(dialog.form().controller().is_dirty());

            let errors = dialog.submit(None).unwrap().settle().await.unwrap();
            assert!(errors.is_empty());
        }

        #[tokio::test]
        async fn test_api_failure_propagates_and_keeps_search_open() {
            let mut api = MockDashboardApi::new();
            api.expect_update_order_addresses()
                .returning(|_, _| Err(crate::error::ApiError::Unavailable));
            let variant = AddressEditVariant::ChangeBillingAddress;
            let mut dialog = dialog(variant, props_with_addresses(), api);
            dialog.open_search(AddressType::Billing);

            let result = dialog.submit(None).unwrap().settle().await;
            assert!(matches!(result, Err(SubmitError::Api(_))));
            assert!(!dialog.form().controller().is_submitting());
            assert!(dialog.search_state().open);
        }

        #[test]
        fn test_mapping_failure_is_synchronous() {
            let mut api = MockDashboardApi::new();
            api.expect_update_order_addresses().never();
            let variant = AddressEditVariant::ChangeShippingAddress;
            let mut dialog = dialog(variant, props_with_addresses(), api);
            dialog.open_search(AddressType::Shipping);
            let cleared = FieldValue::Null;
            dialog.change(FormChangeEvent::new(fields::CUSTOMER_SHIPPING_ADDRESS, cleared));
            assert!(dialog.submit(None).is_err());
            assert!(!dialog.form().controller().is_submitting());
        }

        #[test]
        fn test_sections_follow_billing_toggle() {
            let mut dialog = dialog(
                AddressEditVariant::ChangeCustomer,
                props_with_addresses(),
                MockDashboardApi::new(),
            );
            assert_eq!(dialog.sections(), vec![AddressType::Shipping]);
            dialog.toggle_billing_same_as_shipping();
            let both = vec![AddressType::Shipping, AddressType::Billing];
            assert_eq!(dialog.sections(), both);
        }

        #[test]
        fn test_toggle_input_option() {
            let mut dialog = dialog(
                AddressEditVariant::ChangeShippingAddress,
                props_with_addresses(),
                MockDashboardApi::new(),
            );
            dialog.toggle_input_option(AddressType::Shipping);
            assert_eq!(
                input_option(dialog.data(), AddressType::Shipping),
                AddressInputOption::NewAddress
            );
            assert_eq!(dialog.submit_label_key(), "save");
        }

        #[test]
        fn test_text_keys() {
            let customer = dialog(
                AddressEditVariant::ChangeCustomer,
                props_with_addresses(),
                MockDashboardApi::new(),
            );
            assert_eq!(customer.title_key(), "customerChangeTitle");
            assert_eq!(customer.description_key(), "customerChangeDescription");
            assert_eq!(
                customer.billing_description_key(),
                "customerChangeBillingDescription"
            );

            let shipping = dialog(
                AddressEditVariant::ChangeShippingAddress,
                props_with_addresses(),
                MockDashboardApi::new(),
            );
            assert_eq!(shipping.title_key(), "shippingChangeTitle");
            assert_eq!(shipping.description_key(), "addressChangeDescription");

            let empty = dialog(
                AddressEditVariant::ChangeBillingAddress,
                AddressEditProps::default(),
                MockDashboardApi::new(),
            );
            assert_eq!(empty.title_key(), "billingChangeTitle");
            assert_eq!(empty.description_key(), "noAddressDescription");
            let billing_key = empty.billing_description_key();
            assert_eq!(billing_key, "noAddressBillingDescription");
        }

        #[test]
        fn test_errors_filtered_by_address_type() {
            let mut dialog = dialog(
                AddressEditVariant::ChangeCustomer,
                props_with_addresses(),
                MockDashboardApi::new(),
            );
            dialog.set_errors(vec![
                FieldError::new(Some("postalCode"), "INVALID")
                    .with_address_type(AddressType::Shipping),
                FieldError::new(Some("city"), "REQUIRED").with_address_type(AddressType::Billing),
                FieldError::new(None, "GRAPHQL_ERROR"),
            ]);
            let shipping: Vec<_> = dialog
                .errors_for(AddressType::Shipping)
                .into_iter()
                .map(|e| e.code.as_str())
                .collect();
            assert_eq!(shipping, vec!["INVALID", "GRAPHQL_ERROR"]);
        }
    }
}
