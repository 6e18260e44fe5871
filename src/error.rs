use std::path::PathBuf;
use thiserror::Error;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read {}: {source}", path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index {index} out of bounds (len {len})")]
    Index { index: usize, len: usize },

    #[error("malformed history data: {0}")]
    Format(#[from] serde_json::Error),

    #[error("nothing selected to paste")]
    NoSelection,

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

impl HistoryError {
    /// Short tag used in status messages and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageRead { .. } => "STORAGE_READ",
            Self::StorageWrite { .. } => "STORAGE_WRITE",
            Self::Index { .. } => "INDEX",
            Self::Format(_) => "FORMAT",
            Self::NoSelection => "NO_SELECTION",
            Self::Clipboard(_) => "CLIPBOARD",
            Self::InvalidSetting(_) => "INVALID_SETTING",
        }
    }
}
