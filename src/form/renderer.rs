//! Binds a form controller to a submit trigger and a render callback

use super::controller::{FormController, SubmitHandler, SubmitOutcome};
use super::snapshot::FormSnapshot;
use crate::error::SubmitError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Attributes passed through untouched to the input surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub disabled: bool,
    pub extra: BTreeMap<String, String>,
}

impl FormAttributes {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Options recognized by [`FormRenderer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormConfig {
    /// Reset the form to its initial value when it is submitted. Default: false
    pub reset_on_submit: bool,
    /// Ask before leaving a form with unsaved changes. Default: false
    pub confirm_leave: bool,
    pub attributes: FormAttributes,
}

/// The physical signal that asked the surface to submit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerEvent {
    propagation_stopped: usize,
    default_prevented: usize,
}

impl TriggerEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped += 1;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented += 1;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped > 0
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented > 0
    }

    /// How many times the default action was suppressed
    pub fn suppressions(&self) -> usize {
        self.default_prevented
    }
}

/// Whether the owner may navigate away from the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Leave,
    ConfirmRequired,
}

/// The input surface: pass-through attributes wrapping the rendered content
#[derive(Debug, Clone, PartialEq)]
pub struct FormSurface<V> {
    pub attributes: FormAttributes,
    pub content: V,
}

/// Adapts a [`FormController`] to an input surface.
///
/// The owner forwards change events through [`controller_mut`](Self::controller_mut)
/// and submit triggers through [`handle_submit_trigger`](Self::handle_submit_trigger).
#[derive(Debug)]
pub struct FormRenderer {
    config: FormConfig,
    controller: FormController,
}

impl FormRenderer {
    /// A missing `initial` means an empty form
    pub fn new(config: FormConfig, initial: Option<FormSnapshot>) -> Self {
        Self {
            config,
            controller: FormController::new(initial.unwrap_or_default()),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.controller = self.controller.named(name);
        self
    }

    /// Without a handler, submitting is a no-op
    pub fn on_submit(mut self, handler: impl SubmitHandler + 'static) -> Self {
        self.controller = self.controller.on_submit(handler);
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FormController {
        &mut self.controller
    }

    pub fn set_initial(&mut self, initial: Arc<FormSnapshot>) {
        self.controller.set_initial(initial);
    }

    /// React to a submit trigger.
    ///
    /// In order: suppress the trigger's propagation and default action, run
    /// `side_effect`, reset if `reset_on_submit` is set, then submit. The
    /// snapshot is captured before the reset, so the handler always receives
    /// the data the user submitted rather than the reset defaults.
    pub fn handle_submit_trigger<F>(
        &mut self,
        trigger: Option<&mut TriggerEvent>,
        side_effect: Option<F>,
    ) -> Result<SubmitOutcome, SubmitError>
    where
        F: FnOnce(),
    {
        if let Some(event) = trigger {
            event.stop_propagation();
            event.prevent_default();
        }

        if let Some(side_effect) = side_effect {
            side_effect();
        }

        let data = self.controller.data().clone();
        if self.config.reset_on_submit {
            debug!(form = %self.controller.name(), "resetting before submit");
            self.controller.reset();
        }

        self.controller.submit_data(data)
    }

    /// Submit from a physical trigger with no side effect
    pub fn submit(&mut self, trigger: &mut TriggerEvent) -> Result<SubmitOutcome, SubmitError> {
        self.handle_submit_trigger(Some(trigger), None::<fn()>)
    }

    /// Render the surface; `children` receives the live controller state
    pub fn render<V>(&self, children: impl FnOnce(&FormController) -> V) -> FormSurface<V> {
        FormSurface {
            attributes: self.config.attributes.clone(),
            content: children(&self.controller),
        }
    }

    pub fn request_leave(&self) -> LeaveDecision {
        if self.config.confirm_leave && self.controller.has_changed() {
            LeaveDecision::ConfirmRequired
        } else {
            LeaveDecision::Leave
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::controller::{submit_fn, MockSubmitHandler, Submission};
    use crate::form::event::FormChangeEvent;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn capture() -> (Arc<Mutex<Vec<FormSnapshot>>>, impl SubmitHandler) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (
            seen,
            submit_fn(move |data: &FormSnapshot| {
                sink.lock().unwrap().push(data.clone());
                Ok(Submission::Complete)
            }),
        )
    }

    fn resetting() -> FormConfig {
        FormConfig {
            reset_on_submit: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_reset_on_submit_submits_pre_reset_data() {
        let (seen, handler) = capture();
        let initial = FormSnapshot::new().with("name", "");
        let mut form = FormRenderer::new(resetting(), Some(initial)).on_submit(handler);
        form.controller_mut().change(FormChangeEvent::new("name", "Alice"));

        form.submit(&mut TriggerEvent::new()).unwrap();

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[FormSnapshot::new().with("name", "Alice")]
        );
        let cleared = FormSnapshot::new().with("name", "");
        assert_eq!(form.controller().data(), &cleared);
        assert!(!form.controller().is_dirty());
    }

    #[test]
    fn test_without_reset_data_is_kept() {
        let (seen, handler) = capture();
        let initial = FormSnapshot::new().with("name", "");
        let mut form = FormRenderer::new(FormConfig::default(), Some(initial)).on_submit(handler);
        form.controller_mut().change(FormChangeEvent::new("name", "Alice"));
        form.submit(&mut TriggerEvent::new()).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(form.controller().data().text("name"), Some("Alice"));
    }

    #[test]
    fn test_trigger_suppressed_exactly_once_per_invocation() {
        let mut form = FormRenderer::new(FormConfig::default(), None);
        let mut trigger = TriggerEvent::new();
        form.submit(&mut trigger).unwrap();
        assert!(trigger.is_propagation_stopped());
        assert_eq!(trigger.suppressions(), 1);

        form.submit(&mut trigger).unwrap();
        assert_eq!(trigger.suppressions(), 2);
    }

    #[test]
    fn test_trigger_suppressed_even_when_handler_fails() {
        let mut handler = MockSubmitHandler::new();
        handler
            .expect_on_submit()
            .returning(|_| Err(SubmitError::Handler("boom".to_string())));
        let mut form = FormRenderer::new(FormConfig::default(), None).on_submit(handler);
        let mut trigger = TriggerEvent::new();
        assert!(form.submit(&mut trigger).is_err());
        assert!(trigger.is_default_prevented());
    }

    #[test]
    fn test_order_side_effect_reset_submit() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler_log = Arc::clone(&log);
        let handler = submit_fn(move |data: &FormSnapshot| {
            let name = data.text("name").unwrap_or_default();
            handler_log.lock().unwrap().push(format!("submit:{name}"));
            Ok(Submission::Complete)
        });
        let initial = FormSnapshot::new().with("name", "");
        let mut form = FormRenderer::new(resetting(), Some(initial)).on_submit(handler);
        form.controller_mut().change(FormChangeEvent::new("name", "Alice"));

        let side_log = Arc::clone(&log);
        let side_effect = move || side_log.lock().unwrap().push("side effect".to_string());
        let mut trigger = TriggerEvent::new();
        form.handle_submit_trigger(Some(&mut trigger), Some(side_effect)).unwrap();

        assert_eq!(
            log.lock().unwrap().as_slice(),
            &["side effect".to_string(), "submit:Alice".to_string()]
        );
        assert_eq!(form.controller().data().text("name"), Some(""));
        assert_eq!(trigger.suppressions(), 1);
    }

    #[test]
    fn test_no_trigger_no_side_effect() {
        let (seen, handler) = capture();
        let mut form = FormRenderer::new(FormConfig::default(), None).on_submit(handler);
        let outcome = form.handle_submit_trigger(None, None::<fn()>).unwrap();
        assert!(!outcome.is_pending());
        assert_eq!(seen.lock().unwrap().as_slice(), &[FormSnapshot::new()]);
    }

    #[test]
    fn test_missing_handler_is_noop() {
        let mut form = FormRenderer::new(resetting(), Some(FormSnapshot::new().with("name", "")));
        form.controller_mut().change(FormChangeEvent::new("name", "Alice"));
        let outcome = form.submit(&mut TriggerEvent::new()).unwrap();
        assert!(!outcome.is_pending());
        assert_eq!(form.controller().data().text("name"), Some(""));
    }

    #[test]
    fn test_render_passes_live_state_and_attributes() {
        let config = FormConfig {
            attributes: FormAttributes::default()
                .with_id("gift-card-tags")
                .with_attr("data-test", "form"),
            ..Default::default()
        };
        let mut form = FormRenderer::new(config, Some(FormSnapshot::new().with("tag", "")));
        form.controller_mut().change(FormChangeEvent::new("tag", "vip"));

        let surface = form.render(|state| {
            (
                state.data().text("tag").map(str::to_string),
                state.is_dirty(),
                state.is_submitting(),
            )
        });

        assert_eq!(surface.attributes.id.as_deref(), Some("gift-card-tags"));
        let data_test = surface.attributes.extra.get("data-test");
        assert_eq!(data_test.map(String::as_str), Some("form"));
        assert_eq!(surface.content, (Some("vip".to_string()), true, false));
    }

    #[test]
    fn test_request_leave() {
        let config = FormConfig {
            confirm_leave: true,
            ..Default::default()
        };
        let mut form = FormRenderer::new(config, Some(FormSnapshot::new().with("tag", "")));
        assert_eq!(form.request_leave(), LeaveDecision::Leave);
        form.controller_mut().change(FormChangeEvent::new("tag", "vip"));
        assert_eq!(form.request_leave(), LeaveDecision::ConfirmRequired);

        let mut form = FormRenderer::new(FormConfig::default(), None);
        form.controller_mut().change(FormChangeEvent::new("tag", "vip"));
        assert_eq!(form.request_leave(), LeaveDecision::Leave);
    }

    #[test]
    fn test_set_initial_resets_through_renderer() {
        let mut form = FormRenderer::new(FormConfig::default(), None);
        form.controller_mut().change(FormChangeEvent::new("tag", "vip"));
        form.set_initial(Arc::new(FormSnapshot::new().with("tag", "promo")));
        assert_eq!(form.controller().data().text("tag"), Some("promo"));
    }
}
