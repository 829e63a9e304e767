//! Error taxonomy for the library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WizardError>;

#[derive(Debug, Error)]
pub enum WizardError {
    /// The caller asked for something the current state cannot satisfy
    #[error("{0}")]
    InvalidInput(String),

    /// A file entry is malformed (empty path, undecodable binary content, ...)
    #[error("invalid file entry '{path}': {reason}")]
    InvalidEntry { path: String, reason: String },

    #[error("the archive is empty or contains no readable files")]
    EmptyArchive,

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The model answered, but not with a usable file list
    #[error("invalid generation response: {0}")]
    InvalidGeneration(String),

    /// The primary generation call failed; the message is passed through as-is
    #[error("{0}")]
    Generation(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("history record '{0}' not found")]
    HistoryNotFound(String),
}

impl WizardError {
    pub fn invalid_entry(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
