//! Note creation form.
//!
//! [`NoteFormController`] is a controlled-state container for one form
//! session. It seeds its fields from the draft store, validates on every
//! edit, writes each edit back to the draft, and submits through
//! [`CreateNoteMutation`].
//!
//! Submission state machine:
//!
//! ```text
//! Idle --begin_submit (valid && dirty)--> Submitting
//! Submitting --complete_submit(Ok)--> Idle (fields and draft cleared)
//! Submitting --complete_submit(Err)--> Idle (fields kept, error shown)
//! ```

mod props;

pub use props::{Callback, NoteFormProps};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::NotesApi;
use crate::draft::DraftStore;
use crate::entity::{Note, NoteDraft, NoteFormValues};
use crate::error::{NotehubError, Result};
use crate::mutation::CreateNoteMutation;
use crate::validation::{parse_tag_label, validate, FormField, FormFields, ValidationErrors};

pub const SUBMIT_LABEL: &str = "Create note";
pub const SUBMITTING_LABEL: &str = "Creating...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

pub struct NoteFormController<A> {
    drafts: Arc<dyn DraftStore>,
    mutation: CreateNoteMutation<A>,
    props: NoteFormProps,
    initial: FormFields,
    fields: FormFields,
    errors: ValidationErrors,
    state: SubmitState,
    submit_error: Option<String>,
}

/// Initial fields from a draft, with the default tag when none was chosen.
fn fields_from_draft(draft: NoteDraft) -> FormFields {
    FormFields {
        title: draft.title.unwrap_or_default(),
        content: draft.content.unwrap_or_default(),
        tag: draft.tag.unwrap_or_default().to_string(),
    }
}

impl<A: NotesApi> NoteFormController<A> {
    /// Open a form session seeded from the current draft.
    pub fn mount(
        drafts: Arc<dyn DraftStore>,
        mutation: CreateNoteMutation<A>,
        props: NoteFormProps,
    ) -> Self {
        let initial = fields_from_draft(drafts.read_draft());
        let errors = validate(&initial);
        debug!(valid = errors.is_empty(), "note form mounted");

        Self {
            drafts,
            mutation,
            props,
            fields: initial.clone(),
            initial,
            errors,
            state: SubmitState::Idle,
            submit_error: None,
        }
    }

    /// Apply one edit: update the field, persist it to the draft, revalidate.
    ///
    /// A tag outside the allowed set is kept in the form (and reported by
    /// validation) but not written to the draft.
    pub fn change_field(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        let value = value.into();

        let partial = match field {
            FormField::Title => Some(NoteDraft::with_title(value.clone())),
            FormField::Content => Some(NoteDraft::with_content(value.clone())),
            FormField::Tag => parse_tag_label(&value).map(NoteDraft::with_tag),
        };

        self.fields.set(field, value);
        self.errors = validate(&self.fields);
        self.submit_error = None;

        match partial {
            Some(partial) => self.drafts.set_draft(partial)?,
            None => debug!(field = %field, "not persisting invalid tag to draft"),
        }
        Ok(())
    }

    pub fn values(&self) -> &FormFields {
        &self.fields
    }

    pub fn initial_values(&self) -> &FormFields {
        &self.initial
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.errors.message(field)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fields differ from the values the form was mounted (or last reset) with.
    pub fn is_dirty(&self) -> bool {
        self.fields != self.initial
    }

    pub fn is_pending(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid() && self.is_dirty() && !self.is_pending()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_pending() {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Notice from the last failed submission, until the next edit.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Enter `Submitting` and hand out the values to send.
    ///
    /// Fails with `SubmitBlocked` while a submission is outstanding or the
    /// form is invalid or unchanged.
    pub fn begin_submit(&mut self) -> Result<NoteFormValues> {
        if !self.can_submit() {
            return Err(NotehubError::SubmitBlocked);
        }
        let values = self.fields.to_values().map_err(NotehubError::Validation)?;
        self.state = SubmitState::Submitting;
        self.submit_error = None;
        Ok(values)
    }

    /// Apply the outcome of the create call started by [`begin_submit`].
    ///
    /// [`begin_submit`]: Self::begin_submit
    pub fn complete_submit(&mut self, outcome: Result<Note>) -> Result<Note> {
        self.state = SubmitState::Idle;

        match outcome {
            Ok(note) => {
                info!(id = %note.id, "note form submitted");
                self.initial = FormFields::empty();
                self.fields = FormFields::empty();
                self.errors = validate(&self.fields);

                // note already exists server-side, so only log
                if let Err(e) = self.drafts.clear_draft() {
                    warn!(error = %e, "failed to clear draft after submit");
                }

                if let Some(on_success) = self.props.on_success.as_mut() {
                    on_success();
                }
                if let Some(on_close) = self.props.on_close.as_mut() {
                    on_close();
                }
                Ok(note)
            }
            Err(e) => {
                warn!(error = %e, "note form submission failed");
                self.submit_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Submit the current values and wait for the outcome.
    pub async fn submit(&mut self) -> Result<Note> {
        let values = self.begin_submit()?;
        let outcome = self.mutation.create_note(&values).await;
        self.complete_submit(outcome)
    }

    /// Close without submitting. The draft is kept for next time.
    pub fn cancel(&mut self) {
        debug!(dirty = self.is_dirty(), "note form cancelled");
        if let Some(on_close) = self.props.on_close.as_mut() {
            on_close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryNotesApi;
    use crate::cache::{QueryCache, QueryKey};
    use crate::draft::MemoryDraftStore;
    use crate::entity::{NoteListResponse, NoteTag};
    use crate::validation::messages;
    use std::sync::Mutex;

    struct Harness {
        api: Arc<MemoryNotesApi>,
        drafts: Arc<MemoryDraftStore>,
        cache: QueryCache<NoteListResponse>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                api: Arc::new(MemoryNotesApi::new()),
                drafts: Arc::new(MemoryDraftStore::new()),
                cache: QueryCache::new(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn mount(&self) -> NoteFormController<MemoryNotesApi> {
            let on_success = Arc::clone(&self.calls);
            let on_close = Arc::clone(&self.calls);
            let props = NoteFormProps::new()
                .on_success(move || on_success.lock().unwrap().push("success"))
                .on_close(move || on_close.lock().unwrap().push("close"));
            let mutation = CreateNoteMutation::new(Arc::clone(&self.api), self.cache.clone());
            NoteFormController::mount(self.drafts.clone(), mutation, props)
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[test]
    fn test_empty_form_cannot_submit() {
        let h = Harness::new();
        let mut form = h.mount();

        assert_eq!(form.values(), &FormFields::empty());
        assert_eq!(form.values().tag, "Todo");
        assert!(!form.is_dirty());
        assert!(!form.can_submit());
        assert!(matches!(form.begin_submit(), Err(NotehubError::SubmitBlocked)));
    }

    #[test]
    fn test_short_title_blocks_submit() {
        let h = Harness::new();
        let mut form = h.mount();

        form.change_field(FormField::Title, "Hi").unwrap();

        assert_eq!(form.field_error(FormField::Title), Some(messages::TITLE_TOO_SHORT));
        assert!(form.is_dirty());
        assert!(!form.is_valid());
        assert!(!form.can_submit());
    }

    #[test]
    fn test_every_edit_is_written_to_draft() {
        let h = Harness::new();
        let mut form = h.mount();

        form.change_field(FormField::Title, "Gro").unwrap();
        form.change_field(FormField::Title, "Groceries").unwrap();
        form.change_field(FormField::Content, "eggs").unwrap();
        form.change_field(FormField::Tag, "Shopping").unwrap();

        let draft = h.drafts.read_draft();
        assert_eq!(draft.title.as_deref(), Some("Groceries"));
        assert_eq!(draft.content.as_deref(), Some("eggs"));
        assert_eq!(draft.tag, Some(NoteTag::Shopping));
    }

    #[test]
    fn test_invalid_tag_is_reported_but_not_persisted() {
        let h = Harness::new();
        h.drafts.set_draft(NoteDraft::with_tag(NoteTag::Work)).unwrap();
        let mut form = h.mount();

        form.change_field(FormField::Title, "Valid title").unwrap();
        form.change_field(FormField::Tag, "Ideas").unwrap();

        assert_eq!(form.field_error(FormField::Tag), Some(messages::TAG_INVALID));
        assert!(!form.can_submit());
        assert_eq!(h.drafts.read_draft().tag, Some(NoteTag::Work));
    }

    #[test]
    fn test_reverting_edit_is_not_dirty() {
        let h = Harness::new();
        let mut form = h.mount();

        form.change_field(FormField::Title, "Something").unwrap();
        assert!(form.is_dirty());
        form.change_field(FormField::Title, "").unwrap();
        assert!(!form.is_dirty());
    }

    #[tokio::test]
    async fn test_successful_submit_clears_draft_and_calls_back() {
        let h = Harness::new();
        let listing = QueryKey::notes().child(["all", "", "1", "12"]);
        h.cache.insert(
            listing.clone(),
            NoteListResponse {
                notes: Vec::new(),
                total_pages: 0,
            },
        );
        let mut form = h.mount();

        form.change_field(FormField::Title, "Buy milk").unwrap();
        form.change_field(FormField::Tag, "Work").unwrap();
        assert!(form.can_submit());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);

        let note = form.submit().await.unwrap();

        assert_eq!(
            h.api.received(),
            vec![NoteFormValues {
                title: "Buy milk".to_string(),
                content: String::new(),
                tag: NoteTag::Work,
            }]
        );
        assert_eq!(note.title, "Buy milk");
        assert!(h.drafts.read_draft().is_empty());
        assert_eq!(h.calls(), vec!["success", "close"]);
        assert_eq!(form.values(), &FormFields::empty());
        assert!(!form.is_dirty());
        assert!(!form.can_submit());
        assert!(h.cache.get(&listing).is_none());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft_and_allows_retry() {
        let h = Harness::new();
        h.api.set_unavailable(true);
        let mut form = h.mount();

        form.change_field(FormField::Title, "Buy milk").unwrap();
        form.change_field(FormField::Tag, "Work").unwrap();

        let err = form.submit().await.unwrap_err();
        assert!(err.is_submission_failure());
        assert!(form.submit_error().is_some());
        assert_eq!(form.values().title, "Buy milk");
        assert_eq!(h.drafts.read_draft().title.as_deref(), Some("Buy milk"));
        assert!(h.calls().is_empty());
        assert_eq!(form.state(), SubmitState::Idle);
        assert!(form.can_submit());

        h.api.set_unavailable(false);
        form.submit().await.unwrap();
        assert_eq!(h.api.received().len(), 2);
        assert!(h.drafts.read_draft().is_empty());
    }

    #[test]
    fn test_pending_submission_blocks_second_submit() {
        let h = Harness::new();
        let mut form = h.mount();
        form.change_field(FormField::Title, "Standup notes").unwrap();

        let values = form.begin_submit().unwrap();
        assert_eq!(values.tag, NoteTag::Todo);
        assert!(form.is_pending());
        assert_eq!(form.submit_label(), SUBMITTING_LABEL);
        assert!(!form.can_submit());
        assert!(matches!(form.begin_submit(), Err(NotehubError::SubmitBlocked)));

        let err = NotehubError::Server {
            status: 500,
            body: "oops".to_string(),
        };
        assert!(form.complete_submit(Err(err)).is_err());
        assert!(!form.is_pending());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
        assert!(form.can_submit());
    }

    #[test]
    fn test_edit_clears_submission_notice() {
        let h = Harness::new();
        let mut form = h.mount();
        form.change_field(FormField::Title, "Standup notes").unwrap();
        form.begin_submit().unwrap();
        let _ = form.complete_submit(Err(NotehubError::Server {
            status: 502,
            body: "bad gateway".to_string(),
        }));
        assert!(form.submit_error().is_some());

        form.change_field(FormField::Content, "agenda").unwrap();
        assert!(form.submit_error().is_none());
    }

    #[test]
    fn test_cancel_keeps_draft() {
        let h = Harness::new();
        let mut form = h.mount();
        form.change_field(FormField::Title, "Half written").unwrap();

        form.cancel();

        assert_eq!(h.calls(), vec!["close"]);
        assert!(h.api.received().is_empty());
        assert_eq!(h.drafts.read_draft().title.as_deref(), Some("Half written"));
    }

    #[test]
    fn test_remount_restores_draft() {
        let h = Harness::new();
        {
            let mut form = h.mount();
            form.change_field(FormField::Title, "Quarterly review").unwrap();
            form.change_field(FormField::Content, "numbers").unwrap();
            form.change_field(FormField::Tag, "Meeting").unwrap();
        }

        let form = h.mount();
        assert_eq!(
            form.initial_values(),
            &FormFields {
                title: "Quarterly review".to_string(),
                content: "numbers".to_string(),
                tag: "Meeting".to_string(),
            }
        );
        // restored but unchanged since mount
        assert!(!form.is_dirty());
        assert!(form.is_valid());
    }

    #[test]
    fn test_props_are_optional() {
        let h = Harness::new();
        let mutation = CreateNoteMutation::new(Arc::clone(&h.api), h.cache.clone());
        let mut form =
            NoteFormController::mount(h.drafts.clone(), mutation, NoteFormProps::default());
        form.cancel();
        form.change_field(FormField::Title, "No callbacks").unwrap();
        form.begin_submit().unwrap();
        let note = Note {
            id: "1".to_string(),
            title: "No callbacks".to_string(),
            content: String::new(),
            tag: NoteTag::Todo,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(form.complete_submit(Ok(note)).is_ok());
    }
}
