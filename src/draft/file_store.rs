use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::entity::NoteDraft;
use crate::error::Result;

use super::DraftStore;

pub const DRAFT_FILE: &str = "draft.json";

const TEMP_SUFFIX: &str = ".tmp";

/// Draft persisted as JSON so it survives across CLI invocations.
#[derive(Debug)]
pub struct FileDraftStore {
    path: PathBuf,
    // serializes read-modify-write within this process
    lock: Mutex<()>,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store the draft as `draft.json` inside the given notehub directory.
    pub fn in_dir(notehub_dir: &Path) -> Self {
        Self::new(notehub_dir.join(DRAFT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a sibling temp file, then rename over the draft, so an
    /// interrupted save never leaves a half-written file behind.
    fn save(&self, draft: &NoteDraft) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(TEMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(draft)?)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn load(&self) -> NoteDraft {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return NoteDraft::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read draft");
                return NoteDraft::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt draft");
                NoteDraft::default()
            }
        }
    }
}

impl DraftStore for FileDraftStore {
    fn set_draft(&self, partial: NoteDraft) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut draft = self.load();
        draft.merge(partial);
        self.save(&draft)?;
        debug!(path = %self.path.display(), "draft saved");
        Ok(())
    }

    fn clear_draft(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "draft cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_draft(&self) -> NoteDraft {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load()
    }
}
