//! Field rules for the note form.
//!
//! Validation is a pure function over the raw form fields. It runs on every
//! edit so the submit control always reflects the current state.

use std::collections::BTreeMap;
use std::fmt;

use crate::entity::{NoteFormValues, NoteTag};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 500;

pub mod messages {
    pub const TITLE_REQUIRED: &str = "Title is required";
    pub const TITLE_TOO_SHORT: &str = "Title too short";
    pub const TITLE_TOO_LONG: &str = "Title is too long";
    pub const CONTENT_TOO_LONG: &str = "Content is too long";
    pub const TAG_REQUIRED: &str = "Tag is required";
    pub const TAG_INVALID: &str = "Tag must be one of: Todo, Work, Personal, Meeting, Shopping";
}

/// The fields of the note form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Content,
    Tag,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Title => write!(f, "title"),
            FormField::Content => write!(f, "content"),
            FormField::Tag => write!(f, "tag"),
        }
    }
}

/// A rule violation on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// At most one error per field, ordered title, content, tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn message(&self, field: FormField) -> Option<&str> {
        self.get(field).map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.values()
    }

    fn push(&mut self, field: FormField, message: &str) {
        self.errors.insert(
            field,
            FieldError {
                field,
                message: message.to_string(),
            },
        );
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Raw, controlled input state of the form. The tag stays a string so an
/// out-of-set selection can be represented and rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl FormFields {
    /// The blank form: empty strings, default tag.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.title = value,
            FormField::Content => self.content = value,
            FormField::Tag => self.tag = value,
        }
    }

    /// Convert to submittable values, or the errors that prevent it.
    pub fn to_values(&self) -> Result<NoteFormValues, ValidationErrors> {
        let errors = validate(self);
        if !errors.is_empty() {
            return Err(errors);
        }
        // validate() already rejected unknown tags
        let tag = parse_tag_label(&self.tag).unwrap_or_default();
        Ok(NoteFormValues {
            title: self.title.clone(),
            content: self.content.clone(),
            tag,
        })
    }
}

/// Tags must match a label exactly, the way a select control submits them.
pub fn parse_tag_label(raw: &str) -> Option<NoteTag> {
    NoteTag::ALL.into_iter().find(|t| t.as_str() == raw)
}

pub fn validate_title(title: &str) -> Option<&'static str> {
    let len = title.chars().count();
    if len == 0 {
        Some(messages::TITLE_REQUIRED)
    } else if len < TITLE_MIN_CHARS {
        Some(messages::TITLE_TOO_SHORT)
    } else if len > TITLE_MAX_CHARS {
        Some(messages::TITLE_TOO_LONG)
    } else {
        None
    }
}

pub fn validate_content(content: &str) -> Option<&'static str> {
    if content.chars().count() > CONTENT_MAX_CHARS {
        Some(messages::CONTENT_TOO_LONG)
    } else {
        None
    }
}

pub fn validate_tag(tag: &str) -> Option<&'static str> {
    if tag.is_empty() {
        Some(messages::TAG_REQUIRED)
    } else if parse_tag_label(tag).is_none() {
        Some(messages::TAG_INVALID)
    } else {
        None
    }
}

/// Check every field and collect the violations.
pub fn validate(fields: &FormFields) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if let Some(msg) = validate_title(&fields.title) {
        errors.push(FormField::Title, msg);
    }
    if let Some(msg) = validate_content(&fields.content) {
        errors.push(FormField::Content, msg);
    }
    if let Some(msg) = validate_tag(&fields.tag) {
        errors.push(FormField::Tag, msg);
    }
    errors
}
