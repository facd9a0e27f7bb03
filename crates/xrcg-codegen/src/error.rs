//! Code generation error types.

use thiserror::Error;
use xrcg_common_fs::FsError;

/// Code generation error.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Template references variables the context does not define.
    #[error("missing template variables: {0}")]
    MissingVariable(String),

    /// Configured minimum tool version is not `MAJOR.MINOR.PATCH`.
    #[error("invalid minimum tool version {version:?}: {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// Tool configuration cannot be expressed in generated code.
    #[error("invalid tool configuration: {0}")]
    InvalidTool(String),

    /// Underlying file system failure.
    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;
