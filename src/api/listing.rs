use std::sync::Arc;

use crate::cache::{QueryCache, QueryKey};
use crate::entity::{FetchNotesParams, NoteListResponse};
use crate::error::Result;

use super::NotesApi;

/// Reads note listings through the query cache.
///
/// Every listing is keyed under `["notes", ...]`, so a successful create
/// (which invalidates that prefix) forces the next read back to the backend.
pub struct NoteListService<A> {
    api: Arc<A>,
    cache: QueryCache<NoteListResponse>,
}

impl<A: NotesApi> NoteListService<A> {
    pub fn new(api: Arc<A>, cache: QueryCache<NoteListResponse>) -> Self {
        Self { api, cache }
    }

    pub fn query_key(params: &FetchNotesParams) -> QueryKey {
        QueryKey::notes().child(params.cache_segments())
    }

    pub async fn list(&self, params: &FetchNotesParams) -> Result<NoteListResponse> {
        let api = Arc::clone(&self.api);
        self.cache
            .fetch(Self::query_key(params), || async move {
                api.fetch_notes(params).await
            })
            .await
    }

    pub fn cache(&self) -> &QueryCache<NoteListResponse> {
        &self.cache
    }
}
