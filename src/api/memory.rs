use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::entity::{FetchNotesParams, Note, NoteFormValues, NoteListResponse};
use crate::error::{NotehubError, Result};

use super::NotesApi;

/// In-process notes backend. Newest notes are listed first.
#[derive(Debug, Default)]
pub struct MemoryNotesApi {
    notes: Mutex<Vec<Note>>,
    received: Mutex<Vec<NoteFormValues>>,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
}

impl MemoryNotesApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every create fails with a 503 server error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Every create payload received, including rejected ones.
    pub fn received(&self) -> Vec<NoteFormValues> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of listing requests served.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.notes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matches(note: &Note, params: &FetchNotesParams) -> bool {
        if let Some(tag) = params.tag {
            if note.tag != tag {
                return false;
            }
        }
        match params.search_term() {
            Some(term) => {
                let term = term.to_lowercase();
                note.title.to_lowercase().contains(&term)
                    || note.content.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

impl NotesApi for MemoryNotesApi {
    async fn create_note(&self, values: &NoteFormValues) -> Result<Note> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(values.clone());

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NotehubError::Server {
                status: 503,
                body: "backend unavailable".to_string(),
            });
        }

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: values.title.clone(),
            content: values.content.clone(),
            tag: values.tag,
            created_at: now,
            updated_at: now,
        };
        self.notes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(note.clone());
        debug!(id = %note.id, "stored note in memory");
        Ok(note)
    }

    async fn fetch_notes(&self, params: &FetchNotesParams) -> Result<NoteListResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        let matching: Vec<&Note> = notes
            .iter()
            .rev()
            .filter(|n| Self::matches(n, params))
            .collect();

        let per_page = params.per_page.max(1) as usize;
        let total_pages = matching.len().div_ceil(per_page) as u32;
        let skip = (params.page.max(1) as usize - 1) * per_page;
        let page = matching
            .into_iter()
            .skip(skip)
            .take(per_page)
            .cloned()
            .collect();

        Ok(NoteListResponse {
            notes: page,
            total_pages,
        })
    }

    async fn fetch_note_by_id(&self, id: &str) -> Result<Note> {
        let notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| NotehubError::NoteNotFound(id.to_string()))
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        let mut notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        let pos = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| NotehubError::NoteNotFound(id.to_string()))?;
        Ok(notes.remove(pos))
    }
}
