//! Create-note mutation with post-success listing invalidation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::NotesApi;
use crate::cache::{QueryCache, QueryKey};
use crate::entity::{Note, NoteFormValues, NoteListResponse};
use crate::error::Result;

/// Performs the create call and keeps the cached note listing coherent.
///
/// Nothing is written to the listing before the server confirms; on success
/// every query under `["notes"]` is invalidated so the next read re-fetches.
pub struct CreateNoteMutation<A> {
    api: Arc<A>,
    cache: QueryCache<NoteListResponse>,
}

impl<A> Clone for CreateNoteMutation<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: self.cache.clone(),
        }
    }
}

impl<A: NotesApi> CreateNoteMutation<A> {
    pub fn new(api: Arc<A>, cache: QueryCache<NoteListResponse>) -> Self {
        Self { api, cache }
    }

    pub async fn create_note(&self, values: &NoteFormValues) -> Result<Note> {
        match self.api.create_note(values).await {
            Ok(note) => {
                let stale = self.cache.invalidate(&QueryKey::notes());
                info!(id = %note.id, stale, "note created, listing invalidated");
                Ok(note)
            }
            Err(e) => {
                warn!(error = %e, "create note failed");
                Err(e)
            }
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache<NoteListResponse> {
        &self.cache
    }
}
