//! Error types shared by the record and credential stores.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced while reading or writing a snapshot.
///
/// Not-found and rejected logins are ordinary return values, never errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted content exists but cannot be understood.
    #[error("corrupt store {}: {}", .path.display(), .reason)]
    CorruptStore { path: PathBuf, reason: String },

    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
