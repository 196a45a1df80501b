pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod draft;
pub mod entity;
pub mod error;
pub mod form;
pub mod logging;
pub mod mutation;
pub mod validation;

pub use api::{HttpNotesApi, MemoryNotesApi, NoteListService, NotesApi};
pub use cache::{QueryCache, QueryKey};
pub use config::Config;
pub use draft::{DraftStore, FileDraftStore, MemoryDraftStore};
pub use error::{NotehubError, Result};
pub use form::{NoteFormController, NoteFormProps};
pub use mutation::CreateNoteMutation;
