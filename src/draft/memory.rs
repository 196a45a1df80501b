use std::sync::Mutex;

use crate::entity::NoteDraft;
use crate::error::Result;

use super::DraftStore;

/// Session-scoped draft held in process memory.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    draft: Mutex<NoteDraft>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing draft, e.g. one restored by the embedding app.
    pub fn with_draft(draft: NoteDraft) -> Self {
        Self {
            draft: Mutex::new(draft),
        }
    }
}

impl DraftStore for MemoryDraftStore {
    fn set_draft(&self, partial: NoteDraft) -> Result<()> {
        let mut draft = self.draft.lock().unwrap_or_else(|e| e.into_inner());
        draft.merge(partial);
        Ok(())
    }

    fn clear_draft(&self) -> Result<()> {
        let mut draft = self.draft.lock().unwrap_or_else(|e| e.into_inner());
        *draft = NoteDraft::default();
        Ok(())
    }

    fn read_draft(&self) -> NoteDraft {
        self.draft
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
