//! Gift card tag editor
//!
//! A single `tags` list field, toggled from search results or from the typed
//! query, saved through `update_gift_card_tags`.

use crate::api::{tag_choices, DashboardApi, SearchGiftCardTagsVariables};
use crate::error::SubmitError;
use crate::form::{
    submit_fn, FieldValue, FormConfig, FormRenderer, FormSnapshot, SubmitOutcome, Submission,
    TriggerEvent,
};
use std::sync::Arc;
use tracing::debug;

pub const TAGS_FIELD: &str = "tags";

/// Tags held in a snapshot's `tags` field, in selection order
pub fn tags_of(data: &FormSnapshot) -> Vec<String> {
    data.get(TAGS_FIELD)
        .and_then(FieldValue::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(FieldValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn tags_value(tags: &[String]) -> FieldValue {
    FieldValue::List(tags.iter().cloned().map(FieldValue::from).collect())
}

pub struct GiftCardTagInput {
    gift_card_id: String,
    api: Arc<dyn DashboardApi>,
    form: FormRenderer,
    query: String,
    choices: Vec<String>,
    page_size: u32,
}

impl GiftCardTagInput {
    pub fn new(
        gift_card_id: impl Into<String>,
        current_tags: &[String],
        api: Arc<dyn DashboardApi>,
        config: FormConfig,
        page_size: u32,
    ) -> Self {
        let gift_card_id = gift_card_id.into();
        let initial = FormSnapshot::new().with(TAGS_FIELD, tags_value(current_tags));

        let handler = {
            let api = Arc::clone(&api);
            let gift_card_id = gift_card_id.clone();
            submit_fn(move |data: &FormSnapshot| {
                let tags = tags_of(data);
                let api = Arc::clone(&api);
                let gift_card_id = gift_card_id.clone();
                Ok(Submission::deferred(async move {
                    api.update_gift_card_tags(&gift_card_id, tags)
                        .await
                        .map_err(SubmitError::from)
                }))
            })
        };

        let form = FormRenderer::new(config, Some(initial))
            .named("gift-card-tags")
            .on_submit(handler);

        Self {
            gift_card_id,
            api,
            form,
            query: String::new(),
            choices: Vec::new(),
            page_size,
        }
    }

    pub fn gift_card_id(&self) -> &str {
        &self.gift_card_id
    }

    pub fn form(&self) -> &FormRenderer {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormRenderer {
        &mut self.form
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// A typed query is unsaved input, so it marks the form as changed
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if !self.query.trim().is_empty() {
            self.form.controller_mut().trigger_change();
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Fetch the first page of tags matching the current query
    pub async fn search(&mut self) -> Result<&[String], SubmitError> {
        let variables = SearchGiftCardTagsVariables::first_page(self.query.clone(), self.page_size);
        let response = self.api.search_gift_card_tags(variables).await?;
        self.choices = tag_choices(&response);
        debug!(query = %self.query, choices = self.choices.len(), "tag search finished");
        Ok(&self.choices)
    }

    pub fn selected_tags(&self) -> Vec<String> {
        tags_of(self.form.controller().data())
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected_tags().iter().any(|t| t == tag)
    }

    /// Add `tag` if absent, remove it otherwise
    pub fn toggle_tag(&mut self, tag: &str) {
        self.form
            .controller_mut()
            .toggle_value(TAGS_FIELD, FieldValue::from(tag));
    }

    /// Toggle the trimmed query as a tag, allowing tags that do not exist yet
    pub fn toggle_query_tag(&mut self) {
        let tag = self.query.trim().to_string();
        if !tag.is_empty() {
            self.toggle_tag(&tag);
        }
    }

    pub fn submit(
        &mut self,
        trigger: Option<&mut TriggerEvent>,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.form.handle_submit_trigger(trigger, None::<fn()>)
    }
}
