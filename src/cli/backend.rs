use crate::api::{HttpNotesApi, MemoryNotesApi, NotesApi};
use crate::config::Config;
use crate::entity::{FetchNotesParams, Note, NoteFormValues, NoteListResponse};
use crate::error::Result;

/// The notes backend chosen on the command line.
pub enum Backend {
    Http(HttpNotesApi),
    Memory(MemoryNotesApi),
}

impl Backend {
    pub fn from_config(config: &Config, offline: bool) -> Result<Self> {
        if offline {
            Ok(Backend::Memory(MemoryNotesApi::new()))
        } else {
            Ok(Backend::Http(HttpNotesApi::from_config(config)?))
        }
    }
}

impl NotesApi for Backend {
    async fn create_note(&self, values: &NoteFormValues) -> Result<Note> {
        match self {
            Backend::Http(api) => api.create_note(values).await,
            Backend::Memory(api) => api.create_note(values).await,
        }
    }

    async fn fetch_notes(&self, params: &FetchNotesParams) -> Result<NoteListResponse> {
        match self {
            Backend::Http(api) => api.fetch_notes(params).await,
            Backend::Memory(api) => api.fetch_notes(params).await,
        }
    }

    async fn fetch_note_by_id(&self, id: &str) -> Result<Note> {
        match self {
            Backend::Http(api) => api.fetch_note_by_id(id).await,
            Backend::Memory(api) => api.fetch_note_by_id(id).await,
        }
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        match self {
            Backend::Http(api) => api.delete_note(id).await,
            Backend::Memory(api) => api.delete_note(id).await,
        }
    }
}
