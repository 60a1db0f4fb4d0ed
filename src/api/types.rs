//! GraphQL data types exchanged with the dashboard API
//!
//! Response types mirror the query shapes field for field, including
//! `__typename`, so they deserialize straight from a GraphQL response body.

use serde::{Deserialize, Serialize};

/// Which of an order's addresses an input or error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    Shipping,
    Billing,
}

impl AddressType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Billing => "Billing",
        }
    }
}

/// Address as sent in mutations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub street_address1: Option<String>,
    pub street_address2: Option<String>,
    pub city: Option<String>,
    pub city_area: Option<String>,
    pub postal_code: Option<String>,
    /// ISO country code
    pub country: Option<String>,
    pub country_area: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDisplay {
    pub code: String,
    pub country: String,
}

/// One of a customer's saved addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddress {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub street_address1: String,
    #[serde(default)]
    pub street_address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub city_area: String,
    #[serde(default)]
    pub postal_code: String,
    pub country: CountryDisplay,
    #[serde(default)]
    pub country_area: String,
    #[serde(default)]
    pub phone: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CustomerAddress {
    /// Convert a saved address into mutation input, keeping the country code
    pub fn to_address_input(&self) -> AddressInput {
        AddressInput {
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            company_name: non_empty(&self.company_name),
            street_address1: non_empty(&self.street_address1),
            street_address2: non_empty(&self.street_address2),
            city: non_empty(&self.city),
            city_area: non_empty(&self.city_area),
            postal_code: non_empty(&self.postal_code),
            country: non_empty(&self.country.code),
            country_area: non_empty(&self.country_area),
            phone: self.phone.clone(),
        }
    }

    /// One-line summary for lists
    pub fn summary(&self) -> String {
        format!(
            "{} {}, {}, {} {}",
            self.first_name, self.last_name, self.street_address1, self.postal_code, self.city
        )
    }
}

/// Addresses to apply to an order; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddressesInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<AddressInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AddressInput>,
}

// SearchGiftCardTags query

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGiftCardTagsNode {
    #[serde(rename = "__typename", default = "typename::gift_card")]
    pub typename: String,
    pub id: String,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGiftCardTagsEdge {
    #[serde(rename = "__typename", default = "typename::gift_card_edge")]
    pub typename: String,
    pub node: SearchGiftCardTagsNode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(rename = "__typename", default = "typename::page_info")]
    pub typename: String,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchGiftCardTagsConnection {
    #[serde(rename = "__typename", default = "typename::gift_card_connection")]
    pub typename: String,
    pub total_count: Option<u32>,
    pub edges: Vec<SearchGiftCardTagsEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGiftCardTags {
    pub search: Option<SearchGiftCardTagsConnection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGiftCardTagsVariables {
    pub query: String,
    pub first: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl SearchGiftCardTagsVariables {
    pub fn first_page(query: impl Into<String>, first: u32) -> Self {
        Self {
            query: query.into(),
            first,
            after: None,
            last: None,
            before: None,
        }
    }
}

mod typename {
    pub fn gift_card() -> String {
        "GiftCard".to_string()
    }
    pub fn gift_card_edge() -> String {
        "GiftCardCountableEdge".to_string()
    }
    pub fn gift_card_connection() -> String {
        "GiftCardCountableConnection".to_string()
    }
    pub fn page_info() -> String {
        "PageInfo".to_string()
    }
}

impl SearchGiftCardTagsNode {
    pub fn new(id: impl Into<String>, tag: Option<&str>) -> Self {
        Self {
            typename: typename::gift_card(),
            id: id.into(),
            tag: tag.map(str::to_string),
        }
    }
}

impl SearchGiftCardTagsConnection {
    pub fn new(nodes: Vec<SearchGiftCardTagsNode>, total_count: u32, page_info: PageInfo) -> Self {
        Self {
            typename: typename::gift_card_connection(),
            total_count: Some(total_count),
            edges: nodes
                .into_iter()
                .map(|node| SearchGiftCardTagsEdge {
                    typename: typename::gift_card_edge(),
                    node,
                })
                .collect(),
            page_info,
        }
    }
}

impl PageInfo {
    pub fn new(
        start: Option<String>,
        end: Option<String>,
        has_previous: bool,
        has_next: bool,
    ) -> Self {
        Self {
            typename: typename::page_info(),
            end_cursor: end,
            has_next_page: has_next,
            has_previous_page: has_previous,
            start_cursor: start,
        }
    }
}

/// Distinct non-null tags of a search response, in edge order
pub fn tag_choices(response: &SearchGiftCardTags) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let edges = response
        .search
        .iter()
        .flat_map(|search| search.edges.iter());
    for tag in edges.filter_map(|edge| edge.node.tag.as_deref()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
