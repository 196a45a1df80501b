//! Pending-note draft persistence.
//!
//! A form session reads its initial values from a [`DraftStore`] and writes
//! every edit back, so leaving a half-written note and coming back restores it.

mod file_store;
mod memory;

pub use file_store::{FileDraftStore, DRAFT_FILE};
pub use memory::MemoryDraftStore;

use crate::entity::NoteDraft;
use crate::error::Result;

/// Holds at most one unsubmitted note per session.
pub trait DraftStore: Send + Sync {
    /// Merge the set fields of `partial` into the current draft. No validation.
    fn set_draft(&self, partial: NoteDraft) -> Result<()>;

    /// Reset to the empty draft.
    fn clear_draft(&self) -> Result<()>;

    /// Current draft. Never fails; a backend that cannot read returns empty.
    fn read_draft(&self) -> NoteDraft;
}
