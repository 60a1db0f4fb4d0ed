//! Trait abstraction for the dashboard API to enable mocking in tests

use super::types::{
    CustomerAddress, OrderAddressesInput, SearchGiftCardTags, SearchGiftCardTagsVariables,
};
use crate::error::{ApiError, FieldError};
use async_trait::async_trait;

/// Queries and mutations the dialogs depend on.
///
/// Mutations resolve to the user errors they reported; an empty list means
/// the change was applied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Saved addresses of a customer
    async fn customer_addresses(&self, customer_id: &str) -> Result<Vec<CustomerAddress>, ApiError>;

    /// Replace the shipping and/or billing address of an order
    async fn update_order_addresses(
        &self,
        order_id: &str,
        input: OrderAddressesInput,
    ) -> Result<Vec<FieldError>, ApiError>;

    /// Current tags of a gift card
    async fn gift_card_tags(&self, gift_card_id: &str) -> Result<Vec<String>, ApiError>;

    /// Search gift card tags
    async fn search_gift_card_tags(
        &self,
        variables: SearchGiftCardTagsVariables,
    ) -> Result<SearchGiftCardTags, ApiError>;

    /// Replace the tags of a gift card
    async fn update_gift_card_tags(
        &self,
        gift_card_id: &str,
        tags: Vec<String>,
    ) -> Result<Vec<FieldError>, ApiError>;
}
