//! Manifest error types.

use std::path::PathBuf;
use thiserror::Error;
use xrcg_common_fs::FsError;

/// Manifest operation error.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// A node the compiler writes into is not a JSON object.
    #[error("expected {location} to be a JSON object")]
    NotAnObject { location: String },

    /// Two commands would show the same title.
    #[error("duplicate command titles: {}", titles.join(", "))]
    DuplicateTitle { titles: Vec<String> },

    /// Manifest file is not valid JSON.
    #[error("invalid manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization failure.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Underlying file system failure.
    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;
