//! Dashboard dialogs built on the form renderer

pub mod address_edit;
pub mod gift_card_tags;

pub use address_edit::{
    AddressEditDialog, AddressEditProps, AddressEditVariant, AddressInputOption,
    AddressSearchState,
};
pub use gift_card_tags::GiftCardTagInput;
