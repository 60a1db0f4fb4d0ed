//! Form domain layer
//!
//! - `value`: typed field values
//! - `snapshot`: the open record of field values
//! - `event`: field change events
//! - `controller`: form state, dirty/submitting flags and submission
//! - `renderer`: binds a controller to a submit trigger and a render callback

mod controller;
mod event;
mod renderer;
mod snapshot;
mod value;

pub use controller::{
    submit_fn, FormController, PendingSubmit, SubmitFn, SubmitFuture, SubmitHandler,
    SubmitOutcome, SubmitResult, Submission,
};
pub use event::FormChangeEvent;
pub use renderer::{
    FormAttributes, FormConfig, FormRenderer, FormSurface, LeaveDecision, TriggerEvent,
};
pub use snapshot::FormSnapshot;
pub use value::FieldValue;

#[cfg(test)]
pub use controller::MockSubmitHandler;
