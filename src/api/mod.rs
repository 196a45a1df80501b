//! Backend capability for notes.
//!
//! [`NotesApi`] is the seam between the form/listing logic and the REST
//! backend. [`HttpNotesApi`] talks to a real server; [`MemoryNotesApi`] keeps
//! notes in process for offline use and tests.

mod http;
mod listing;
mod memory;

pub use http::HttpNotesApi;
pub use listing::NoteListService;
pub use memory::MemoryNotesApi;

use std::future::Future;

use crate::entity::{FetchNotesParams, Note, NoteFormValues, NoteListResponse};
use crate::error::Result;

pub trait NotesApi: Send + Sync {
    /// Create a note. The backend assigns the id.
    fn create_note(&self, values: &NoteFormValues) -> impl Future<Output = Result<Note>> + Send;

    fn fetch_notes(
        &self,
        params: &FetchNotesParams,
    ) -> impl Future<Output = Result<NoteListResponse>> + Send;

    fn fetch_note_by_id(&self, id: &str) -> impl Future<Output = Result<Note>> + Send;

    /// Delete a note and return the removed record.
    fn delete_note(&self, id: &str) -> impl Future<Output = Result<Note>> + Send;
}
