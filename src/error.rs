use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum NotehubError {
    #[error("Already initialized. Remove .notehub/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Invalid note: {0}")]
    Validation(ValidationErrors),

    #[error("Submit is disabled until the form is valid and changed")]
    SubmitBlocked,

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Confirmation required. Use --force to delete in non-interactive mode")]
    ConfirmationRequired,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl NotehubError {
    /// True for failures the user can fix by resubmitting later.
    pub fn is_submission_failure(&self) -> bool {
        matches!(
            self,
            NotehubError::Network(_) | NotehubError::Server { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NotehubError>;
