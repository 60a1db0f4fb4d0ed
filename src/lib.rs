//! Dashboard forms - controlled form state for dashboard dialogs
//!
//! The core is [`form::FormController`], which owns a snapshot of field
//! values, tracks whether it diverged from its initial value and whether a
//! submission is in flight, and [`form::FormRenderer`], which binds a
//! controller to a submit trigger and a render callback.
//!
//! The [`dialogs`] module holds the two dialogs built on top of it, and
//! [`api`] the data types and collaborator trait they talk to.

pub mod api;
pub mod config;
pub mod dialogs;
pub mod error;
pub mod form;

pub use config::DashboardConfig;
pub use error::{ApiError, ConfigError, FieldError, SubmitError};
pub use form::{
    submit_fn, FieldValue, FormAttributes, FormChangeEvent, FormConfig, FormController,
    FormRenderer, FormSnapshot, FormSurface, LeaveDecision, PendingSubmit, SubmitHandler,
    SubmitOutcome, Submission, TriggerEvent,
};
