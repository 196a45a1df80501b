// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NoteTag;

pub const DEFAULT_PER_PAGE: u32 = 12;

/// A note as stored by the backend. The id is assigned server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a note. Only built from fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFormValues {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

/// An unsubmitted note. Every field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<NoteTag>,
}

impl NoteDraft {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_tag(tag: NoteTag) -> Self {
        Self {
            tag: Some(tag),
            ..Default::default()
        }
    }

    /// Overwrite the fields that are set in `partial`, keep the rest.
    pub fn merge(&mut self, partial: NoteDraft) {
        if let Some(title) = partial.title {
            self.title = Some(title);
        }
        if let Some(content) = partial.content {
            self.content = Some(content);
        }
        if let Some(tag) = partial.tag {
            self.tag = Some(tag);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tag.is_none()
    }
}

/// One page of the note listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListResponse {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

/// Query parameters for the note listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchNotesParams {
    pub search: Option<String>,
    pub tag: Option<NoteTag>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for FetchNotesParams {
    fn default() -> Self {
        Self {
            search: None,
            tag: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FetchNotesParams {
    /// Parse a tag filter where `all` (any case) or an empty string means no filter.
    pub fn parse_tag_filter(raw: &str) -> Result<Option<NoteTag>, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }

    /// Search text with surrounding whitespace removed, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Key segments identifying this listing in the query cache.
    pub fn cache_segments(&self) -> Vec<String> {
        vec![
            self.tag
                .map(|t| t.to_string())
                .unwrap_or_else(|| "all".to_string()),
            self.search_term().unwrap_or_default().to_string(),
            self.page.to_string(),
            self.per_page.to_string(),
        ]
    }
}
