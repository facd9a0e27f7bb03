//! Registry error types.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use xrcg_common_fs::FsError;

/// One command id produced by more than one template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCollision {
    /// The colliding id.
    pub id: String,
    /// Every `(language, style)` pair that produced it.
    pub sources: Vec<(String, String)>,
}

impl fmt::Display for IdCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .sources
            .iter()
            .map(|(language, style)| format!("{language}/{style}"))
            .collect();
        write!(f, "{} <- {}", self.id, pairs.join(", "))
    }
}

/// One description shared by more than one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionCollision {
    /// The shared description.
    pub description: String,
    /// Ids of every command carrying it.
    pub ids: Vec<String>,
}

impl fmt::Display for DescriptionCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} <- {}", self.description, self.ids.join(", "))
    }
}

fn join_lines<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("\n  {item}"))
        .collect::<String>()
}

/// Registry build error.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Template root missing or not a directory.
    #[error("template root not found: {}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    /// A metadata file exists but cannot be used.
    #[error("malformed metadata in {}: {reason}", path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    /// Several template directories map to the same command id.
    #[error("duplicate command ids:{}", join_lines(collisions))]
    DuplicateCommand { collisions: Vec<IdCollision> },

    /// Several commands share a description.
    #[error("duplicate command descriptions:{}", join_lines(collisions))]
    DuplicateDescription { collisions: Vec<DescriptionCollision> },

    /// Persisted registry could not be parsed.
    #[error("invalid registry file {}: {source}", path.display())]
    InvalidRegistry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Underlying file system failure.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// Serialization failure.
    #[error("failed to serialize registry: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
