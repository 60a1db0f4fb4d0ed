//! In-memory dashboard API backed by fixture data
//!
//! Serves the terminal host when no real backend is wired in. Data comes
//! from a JSON fixture file or the built-in sample set.

use super::traits::DashboardApi;
use super::types::{
    CountryDisplay, CustomerAddress, OrderAddressesInput, PageInfo, SearchGiftCardTags,
    SearchGiftCardTagsConnection, SearchGiftCardTagsNode, SearchGiftCardTagsVariables,
};
use crate::error::{ApiError, FieldError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardRecord {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Contents of a fixture file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixtureData {
    /// Saved addresses keyed by customer id
    pub customers: HashMap<String, Vec<CustomerAddress>>,
    pub gift_cards: Vec<GiftCardRecord>,
    /// Current addresses keyed by order id
    pub orders: HashMap<String, OrderAddressesInput>,
}

pub const SAMPLE_CUSTOMER_ID: &str = "VXNlcjox";
pub const SAMPLE_ORDER_ID: &str = "T3JkZXI6MQ==";
pub const SAMPLE_GIFT_CARD_ID: &str = "R2lmdENhcmQ6MQ==";

/// [`DashboardApi`] over [`FixtureData`] held in memory
pub struct FixtureApi {
    data: Mutex<FixtureData>,
    latency: Duration,
}

impl FixtureApi {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data: Mutex::new(data),
            latency: Duration::ZERO,
        }
    }

    /// Delay every request, so the submitting state is observable
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Load fixture data from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let fixture_error = |message: String| ApiError::Fixture {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| fixture_error(e.to_string()))?;
        let data: FixtureData =
            serde_json::from_str(&content).map_err(|e| fixture_error(e.to_string()))?;
        info!(
            path = %path.display(),
            customers = data.customers.len(),
            gift_cards = data.gift_cards.len(),
            "loaded fixture"
        );
        Ok(Self::new(data))
    }

    /// Built-in demo data: one customer with two addresses, one order, three gift cards
    pub fn sample() -> Self {
        let mut data = FixtureData::default();
        data.customers.insert(
            SAMPLE_CUSTOMER_ID.to_string(),
            vec![
                sample_address("QWRkcmVzczox", "Main St 1", "Berlin", "10115"),
                sample_address("QWRkcmVzczoy", "Harbour Rd 7", "Hamburg", "20095"),
            ],
        );
        data.orders.insert(SAMPLE_ORDER_ID.to_string(), OrderAddressesInput::default());
        data.gift_cards = vec![
            GiftCardRecord {
                id: SAMPLE_GIFT_CARD_ID.to_string(),
                tags: vec!["vip".to_string(), "summer-sale".to_string()],
            },
            GiftCardRecord {
                id: "R2lmdENhcmQ6Mg==".to_string(),
                tags: vec!["promo".to_string()],
            },
            GiftCardRecord {
                id: "R2lmdENhcmQ6Mw==".to_string(),
                tags: Vec::new(),
            },
        ];
        Self::new(data)
    }

    /// Copy of the current data
    pub fn snapshot(&self) -> Result<FixtureData, ApiError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, FixtureData>, ApiError> {
        self.data.lock().map_err(|_| ApiError::Unavailable)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn sample_address(id: &str, street: &str, city: &str, postal_code: &str) -> CustomerAddress {
    CustomerAddress {
        id: id.to_string(),
        first_name: "Ann".to_string(),
        last_name: "Smith".to_string(),
        company_name: String::new(),
        street_address1: street.to_string(),
        street_address2: String::new(),
        city: city.to_string(),
        city_area: String::new(),
        postal_code: postal_code.to_string(),
        country: CountryDisplay {
            code: "DE".to_string(),
            country: "Germany".to_string(),
        },
        country_area: String::new(),
        phone: None,
    }
}

fn cursor(index: usize) -> String {
    index.to_string()
}

fn parse_cursor(cursor: Option<&str>) -> Option<usize> {
    cursor.and_then(|c| c.parse().ok())
}

#[async_trait]
impl DashboardApi for FixtureApi {
    async fn customer_addresses(
        &self,
        customer_id: &str,
    ) -> Result<Vec<CustomerAddress>, ApiError> {
        self.simulate_latency().await;
        self.lock()?
            .customers
            .get(customer_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                entity: "customer",
                id: customer_id.to_string(),
            })
    }

    async fn update_order_addresses(
        &self,
        order_id: &str,
        input: OrderAddressesInput,
    ) -> Result<Vec<FieldError>, ApiError> {
        self.simulate_latency().await;
        let mut data = self.lock()?;
        let order = data
            .orders
            .get_mut(order_id)
            .ok_or_else(|| ApiError::NotFound {
                entity: "order",
                id: order_id.to_string(),
            })?;
        if let Some(shipping) = input.shipping_address {
            order.shipping_address = Some(shipping);
        }
        if let Some(billing) = input.billing_address {
            order.billing_address = Some(billing);
        }
        info!(order = order_id, "order addresses updated");
        Ok(Vec::new())
    }

    async fn gift_card_tags(&self, gift_card_id: &str) -> Result<Vec<String>, ApiError> {
        self.simulate_latency().await;
        self.lock()?
            .gift_cards
            .iter()
            .find(|card| card.id == gift_card_id)
            .map(|card| card.tags.clone())
            .ok_or_else(|| ApiError::NotFound {
                entity: "gift card",
                id: gift_card_id.to_string(),
            })
    }

    async fn search_gift_card_tags(
        &self,
        variables: SearchGiftCardTagsVariables,
    ) -> Result<SearchGiftCardTags, ApiError> {
        self.simulate_latency().await;
        let data = self.lock()?;
        let query = variables.query.to_lowercase();
        let matches: Vec<SearchGiftCardTagsNode> = data
            .gift_cards
            .iter()
            .flat_map(|card| {
                let id = card.id.as_str();
                card.tags
                    .iter()
                    .map(move |tag| SearchGiftCardTagsNode::new(id, Some(tag.as_str())))
            })
            .filter(|node| {
                node.tag
                    .as_deref()
                    .is_some_and(|tag| tag.to_lowercase().contains(&query))
            })
            .collect();

        let total = matches.len();
        let start = parse_cursor(variables.after.as_deref()).map_or(0, |i| i.saturating_add(1));
        let end = start.saturating_add(variables.first as usize).min(total);
        let page: Vec<_> = matches
            .into_iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect();
        debug!(query = %variables.query, total, returned = page.len(), "searched gift card tags");

        let page_info = PageInfo::new(
            (!page.is_empty()).then(|| cursor(start)),
            (!page.is_empty()).then(|| cursor(end - 1)),
            start > 0,
            end < total,
        );
        let connection = SearchGiftCardTagsConnection::new(page, total as u32, page_info);
        Ok(SearchGiftCardTags {
            search: Some(connection),
        })
    }

    async fn update_gift_card_tags(
        &self,
        gift_card_id: &str,
        tags: Vec<String>,
    ) -> Result<Vec<FieldError>, ApiError> {
        self.simulate_latency().await;
        let mut data = self.lock()?;
        let card = data
            .gift_cards
            .iter_mut()
            .find(|card| card.id == gift_card_id);
        match card {
            Some(card) => {
                card.tags = tags;
                info!(gift_card = %gift_card_id, tags = card.tags.len(), "gift card tags updated");
                Ok(Vec::new())
            }
            None => Ok(vec![FieldError::new(Some("id"), "NOT_FOUND")]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{tag_choices, AddressInput};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_customer_addresses() {
        let api = FixtureApi::sample();
        let addresses = api.customer_addresses("VXNlcjox").await.unwrap();
        assert_eq!(addresses.len(), 2);
        match api.customer_addresses("missing").await {
            Err(ApiError::NotFound { entity, .. }) => assert_eq!(entity, "customer"),
            other => panic!("expected a missing customer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let api = FixtureApi::sample();
        let response = api
            .search_gift_card_tags(SearchGiftCardTagsVariables::first_page("VI", 10))
            .await
            .unwrap();
        assert_eq!(tag_choices(&response), vec!["vip"]);
    }

    #[tokio::test]
    async fn test_search_pages_with_cursor() {
        let api = FixtureApi::sample();
        let first = api
            .search_gift_card_tags(SearchGiftCardTagsVariables::first_page("", 2))
            .await
            .unwrap();
        let search = first.search.as_ref().unwrap();
        assert_eq!(search.total_count, Some(3));
        assert_eq!(search.edges.len(), 2);
        assert!(search.page_info.has_next_page);
        assert!(!search.page_info.has_previous_page);

        let mut vars = SearchGiftCardTagsVariables::first_page("", 2);
        vars.after = search.page_info.end_cursor.clone();
        let second = api.search_gift_card_tags(vars).await.unwrap();
        let search = second.search.unwrap();
        assert_eq!(search.edges.len(), 1);
        assert_eq!(search.edges[0].node.tag.as_deref(), Some("promo"));
        assert!(!search.page_info.has_next_page);
        assert!(search.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn test_search_after_last_possible_cursor_is_empty() {
        let api = FixtureApi::sample();
        let mut vars = SearchGiftCardTagsVariables::first_page("", 2);
        vars.after = Some(usize::MAX.to_string());
        let response = api.search_gift_card_tags(vars).await.unwrap();
        let search = response.search.unwrap();
        assert!(search.edges.is_empty());
        assert_eq!(search.total_count, Some(3));
        assert!(search.page_info.end_cursor.is_none());
        assert!(!search.page_info.has_next_page);
    }

    #[tokio::test]
    async fn test_update_order_addresses_keeps_absent_address() {
        let api = FixtureApi::sample();
        let shipping = AddressInput {
            city: Some("Berlin".to_string()),
            ..Default::default()
        };
        let errors = api
            .update_order_addresses(
                "T3JkZXI6MQ==",
                OrderAddressesInput {
                    shipping_address: Some(shipping.clone()),
                    billing_address: None,
                },
            )
            .await
            .unwrap();
        assert!(errors.is_empty());
        let order = api.snapshot().unwrap().orders["T3JkZXI6MQ=="].clone();
        assert_eq!(order.shipping_address, Some(shipping));
        assert_eq!(order.billing_address, None);
    }

    #[tokio::test]
    async fn test_update_unknown_order_fails() {
        let api = FixtureApi::sample();
        let result = api
            .update_order_addresses("missing", OrderAddressesInput::default())
            .await;
        match result {
            Err(ApiError::NotFound { entity, .. }) => assert_eq!(entity, "order"),
            other => panic!("expected a missing order, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_gift_card_tags() {
        let api = FixtureApi::sample();
        let errors = api
            .update_gift_card_tags("R2lmdENhcmQ6Mw==", vec!["new".to_string()])
            .await
            .unwrap();
        assert!(errors.is_empty());
        assert_eq!(
            api.gift_card_tags("R2lmdENhcmQ6Mw==").await.unwrap(),
            vec!["new".to_string()]
        );
        let errors = api.update_gift_card_tags("missing", vec![]).await.unwrap();
        assert_eq!(errors, vec![FieldError::new(Some("id"), "NOT_FOUND")]);
    }

    #[test]
    fn test_fixture_data_from_json() {
        let json = r#"{"giftCards": [{"id": "R2lmdENhcmQ6OQ==", "tags": ["b2b"]}]}"#;
        let data: FixtureData = serde_json::from_str(json).unwrap();
        assert_eq!(data.gift_cards.len(), 1);
        assert!(data.customers.is_empty());
    }

    #[test]
    fn test_from_missing_path_is_fixture_error() {
        let result = FixtureApi::from_path(Path::new("/nonexistent/fixture.json"));
        assert!(matches!(result, Err(ApiError::Fixture { .. })));
    }
}
