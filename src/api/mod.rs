//! Dashboard API seam
//!
//! GraphQL transport lives outside this crate; dialogs talk to the
//! [`DashboardApi`] trait and the terminal host plugs in [`FixtureApi`].

mod fixture;
mod traits;
mod types;

pub use fixture::{
    FixtureApi, FixtureData, GiftCardRecord, SAMPLE_CUSTOMER_ID, SAMPLE_GIFT_CARD_ID,
    SAMPLE_ORDER_ID,
};
pub use traits::DashboardApi;
pub use types::{
    tag_choices, AddressInput, AddressType, CountryDisplay, CustomerAddress,
    OrderAddressesInput, PageInfo, SearchGiftCardTags, SearchGiftCardTagsConnection,
    SearchGiftCardTagsEdge, SearchGiftCardTagsNode, SearchGiftCardTagsVariables,
};

#[cfg(test)]
pub use traits::MockDashboardApi;
