//! Error types shared by the form core, the API seam and configuration

use crate::api::AddressType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a form submission.
///
/// The controller never swallows these; they reach whoever called
/// `submit()` or awaited the pending result.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The submit handler failed before producing a result
    #[error("submit handler failed: {0}")]
    Handler(String),
    /// The deferred result of the handler settled with a failure
    #[error("submission rejected: {0}")]
    Rejected(String),
    /// A collaborator request made on behalf of the form failed
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The snapshot could not be converted to the record the handler expects
    #[error("form data does not match the expected record: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Failure talking to the dashboard API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("api state unavailable")]
    Unavailable,
    #[error("failed to load fixture {path}: {message}")]
    Fixture { path: PathBuf, message: String },
}

/// Failure reading or writing the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A user error reported by a mutation that otherwise completed.
///
/// These are data, not failures: a submission resolving to a non-empty list
/// still settled successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: Option<String>,
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub address_type: Option<AddressType>,
}

impl FieldError {
    pub fn new(field: Option<&str>, code: &str) -> Self {
        Self {
            field: field.map(str::to_string),
            code: code.to_string(),
            message: None,
            address_type: None,
        }
    }

    pub fn with_address_type(mut self, address_type: AddressType) -> Self {
        self.address_type = Some(address_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_is_transparent_in_submit_error() {
        let err: SubmitError = ApiError::NotFound {
            entity: "gift card",
            id: "R2lmdENhcmQ6MQ==".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "gift card not found: R2lmdENhcmQ6MQ==");
    }

    #[test]
    fn test_field_error_deserializes_order_error_fragment() {
        let json = r#"{"__typename":"OrderError","code":"REQUIRED","field":"postalCode","addressType":"SHIPPING","message":null}"#;
        let err: FieldError = serde_json::from_str(json).unwrap();
        assert_eq!(err.field.as_deref(), Some("postalCode"));
        assert_eq!(err.code, "REQUIRED");
        assert_eq!(err.address_type, Some(AddressType::Shipping));
    }
}
