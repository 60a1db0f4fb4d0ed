//! Form state controller
//!
//! Owns the live snapshot of a form, derives the dirty and submitting flags,
//! and hands the snapshot to a caller-supplied [`SubmitHandler`] on submit.
//!
//! All mutation goes through `&mut self` on the thread that owns the view.
//! The only state shared with the outside world is the in-flight counter
//! held by each [`PendingSubmit`], so a pending submission may be spawned
//! onto a runtime while the controller stays with its owner.

use super::event::FormChangeEvent;
use super::snapshot::FormSnapshot;
use super::value::FieldValue;
use crate::error::{FieldError, SubmitError};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of a deferred submission: user errors reported by the mutation
pub type SubmitResult = Result<Vec<FieldError>, SubmitError>;

/// Boxed future produced by a deferred submit handler
pub type SubmitFuture = Pin<Box<dyn Future<Output = SubmitResult> + Send + 'static>>;

/// What a submit handler produced
pub enum Submission {
    /// Nothing to track; the form never enters the submitting state
    Complete,
    /// A result that settles later; the form is submitting until it does
    Deferred(SubmitFuture),
}

impl Submission {
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = SubmitResult> + Send + 'static,
    {
        Submission::Deferred(Box::pin(future))
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Submission::Complete => f.write_str("Complete"),
            Submission::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Receives the snapshot when a form is submitted
#[cfg_attr(test, mockall::automock)]
pub trait SubmitHandler: Send + Sync {
    fn on_submit(&self, data: &FormSnapshot) -> Result<Submission, SubmitError>;
}

/// Adapter turning a closure into a [`SubmitHandler`]
pub struct SubmitFn<F>(F);

/// Wrap a closure as a submit handler
pub fn submit_fn<F>(f: F) -> SubmitFn<F>
where
    F: Fn(&FormSnapshot) -> Result<Submission, SubmitError> + Send + Sync,
{
    SubmitFn(f)
}

impl<F> SubmitHandler for SubmitFn<F>
where
    F: Fn(&FormSnapshot) -> Result<Submission, SubmitError> + Send + Sync,
{
    fn on_submit(&self, data: &FormSnapshot) -> Result<Submission, SubmitError> {
        (self.0)(data)
    }
}

/// What `submit()` handed back to its caller
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The handler finished synchronously, or there was no handler
    Void,
    /// The handler's result is still settling
    Pending(PendingSubmit),
}

impl SubmitOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmitOutcome::Pending(_))
    }

    /// Wait for the submission to settle. `Void` settles immediately with no errors.
    pub async fn settle(self) -> SubmitResult {
        match self {
            SubmitOutcome::Void => Ok(Vec::new()),
            SubmitOutcome::Pending(pending) => pending.await,
        }
    }
}

/// Holds one unit of the in-flight counter until released or dropped
struct InFlightGuard {
    counter: Arc<AtomicUsize>,
    released: bool,
}

impl InFlightGuard {
    fn acquire(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter,
            released: false,
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// A submission whose result has not settled yet.
///
/// The owning controller reports `is_submitting()` until this future
/// resolves or is dropped. Dropping it abandons the result; the handler's
/// side effects are not rolled back.
pub struct PendingSubmit {
    future: SubmitFuture,
    guard: InFlightGuard,
    form: String,
}

impl fmt::Debug for PendingSubmit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSubmit")
            .field("form", &self.form)
            .field("settled", &self.guard.released)
            .finish()
    }
}

impl Future for PendingSubmit {
    type Output = SubmitResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let result = match self.future.as_mut().poll(cx) {
            Poll::Ready(result) => result,
            Poll::Pending => return Poll::Pending,
        };
        self.guard.release();
        match &result {
            Ok(errors) if errors.is_empty() => info!(form = %self.form, "submission settled"),
            Ok(errors) => info!(
                form = %self.form,
                errors = errors.len(),
                "submission settled with user errors"
            ),
            Err(err) => warn!(form = %self.form, error = %err, "submission failed"),
        }
        Poll::Ready(result)
    }
}

/// Live state of one form.
///
/// The caller must not assume a second `submit()` is prevented while one is
/// pending; views disable their submit action by observing
/// [`is_submitting`](Self::is_submitting).
pub struct FormController {
    id: Uuid,
    name: String,
    initial: Arc<FormSnapshot>,
    data: FormSnapshot,
    dirty: bool,
    changed: bool,
    in_flight: Arc<AtomicUsize>,
    handler: Option<Box<dyn SubmitHandler>>,
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("data", &self.data)
            .field("dirty", &self.dirty)
            .field("submitting", &self.is_submitting())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl FormController {
    pub fn new(initial: FormSnapshot) -> Self {
        Self::from_shared(Arc::new(initial))
    }

    /// Create a controller over an initial value the caller keeps a handle to
    pub fn from_shared(initial: Arc<FormSnapshot>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "form".to_string(),
            data: FormSnapshot::clone(&initial),
            initial,
            dirty: false,
            changed: false,
            in_flight: Arc::new(AtomicUsize::new(0)),
            handler: None,
        }
    }

    /// Name used to tag log records
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn on_submit(mut self, handler: impl SubmitHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current snapshot
    pub fn data(&self) -> &FormSnapshot {
        &self.data
    }

    pub fn initial(&self) -> &Arc<FormSnapshot> {
        &self.initial
    }

    /// True when the snapshot differs structurally from the initial value
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dirty, or marked changed through [`trigger_change`](Self::trigger_change)
    pub fn has_changed(&self) -> bool {
        self.dirty || self.changed
    }

    /// True while at least one deferred submission is unsettled
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn change(&mut self, event: FormChangeEvent) {
        debug!(form = %self.name, field = %event.name, "field changed");
        self.data.apply(event);
        self.recompute_dirty();
    }

    /// Merge several fields at once
    pub fn set(&mut self, partial: FormSnapshot) {
        debug!(form = %self.name, fields = partial.len(), "fields set");
        self.data.merge(partial);
        self.recompute_dirty();
    }

    /// Add `item` to the list field `name`, or remove it if already present.
    ///
    /// A missing or non-list field is treated as an empty list.
    pub fn toggle_value(&mut self, name: &str, item: FieldValue) {
        let mut items = self
            .data
            .get(name)
            .and_then(FieldValue::as_list)
            .map(<[FieldValue]>::to_vec)
            .unwrap_or_default();
        match items.iter().position(|existing| *existing == item) {
            Some(index) => {
                items.remove(index);
            }
            None => items.push(item),
        }
        self.change(FormChangeEvent::new(name, FieldValue::List(items)));
    }

    /// Mark the form as changed without touching a field
    pub fn trigger_change(&mut self) {
        self.changed = true;
    }

    /// Restore the initial value. Never calls the submit handler.
    pub fn reset(&mut self) {
        debug!(form = %self.name, "form reset");
        self.data = FormSnapshot::clone(&self.initial);
        self.dirty = false;
        self.changed = false;
    }

    /// Adopt a new initial value.
    ///
    /// The form resets only when `initial` is a different allocation from the
    /// current one; passing the same `Arc` again keeps the user's edits.
    pub fn set_initial(&mut self, initial: Arc<FormSnapshot>) {
        if Arc::ptr_eq(&self.initial, &initial) {
            return;
        }
        self.initial = initial;
        self.reset();
    }

    /// Hand the current snapshot to the submit handler.
    ///
    /// A synchronous handler failure is returned as is. A deferred result
    /// marks the form as submitting until the returned future settles.
    pub fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        self.submit_data(self.data.clone())
    }

    /// Submit a snapshot captured earlier by the caller
    pub(crate) fn submit_data(&self, data: FormSnapshot) -> Result<SubmitOutcome, SubmitError> {
        let Some(handler) = self.handler.as_ref() else {
            debug!(form = %self.name, "submit without handler");
            return Ok(SubmitOutcome::Void);
        };

        info!(form = %self.name, id = %self.id, fields = data.len(), "submitting form");
        match handler.on_submit(&data) {
            Ok(Submission::Complete) => Ok(SubmitOutcome::Void),
            Ok(Submission::Deferred(future)) => Ok(SubmitOutcome::Pending(PendingSubmit {
                future,
                guard: InFlightGuard::acquire(Arc::clone(&self.in_flight)),
                form: self.name.clone(),
            })),
            Err(err) => {
                warn!(form = %self.name, error = %err, "submit handler failed");
                Err(err)
            }
        }
    }

    fn recompute_dirty(&mut self) {
        self.dirty = self.data != *self.initial;
    }
}
