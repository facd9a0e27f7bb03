//! CLI error handling and formatting.

use std::error::Error as StdError;
use std::process::ExitCode;

use console::style;
use thiserror::Error;
use xrcg_codegen::CodegenError;
use xrcg_common_config::ConfigError;
use xrcg_common_fs::FsError;
use xrcg_manifest::ManifestError;
use xrcg_registry::RegistryError;

/// CLI error type with rich context
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<ConfigError>,
        hint: Option<String>,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Fs(#[from] FsError),

    /// The manifest check found duplicates; the diagnostics were already
    /// printed.
    #[error("{message}")]
    Validation { message: String, problems: usize },

    #[error("{message}")]
    User {
        message: String,
        hint: Option<String>,
    },

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Registry(_) => "E002",
            Self::Manifest(_) => "E003",
            Self::Codegen(_) => "E004",
            Self::Validation { .. } => "E005",
            Self::Fs(_) => "E006",
            Self::User { .. } => "E010",
            Self::Other(_) => "E999",
        }
    }

    /// Get the exit code for this error. Every failure exits with 1; clap
    /// reports usage errors itself with 2.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::User { hint, .. } => hint.as_deref(),
            Self::Registry(e) => registry_hint(e),
            Self::Manifest(e) => manifest_hint(e),
            Self::Codegen(CodegenError::InvalidVersion { .. }) => {
                Some("tool.min_version must be MAJOR.MINOR.PATCH")
            }
            _ => None,
        }
    }

    /// Create a user error with hint
    pub fn user_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

fn registry_hint(error: &RegistryError) -> Option<&'static str> {
    match error {
        RegistryError::Discovery { .. } => {
            Some("set paths.templates_root in .xrcg/config.yaml or run from the project root")
        }
        RegistryError::MalformedMetadata { .. } => {
            Some("fix the metadata file or set registry.metadata_policy to lenient")
        }
        RegistryError::DuplicateCommand { .. } => {
            Some("rename one of the template directories so each maps to its own command id")
        }
        RegistryError::DuplicateDescription { .. } => {
            Some("give each template a distinct description in its metadata file")
        }
        RegistryError::Fs(FsError::NotFound { .. }) | RegistryError::InvalidRegistry { .. } => {
            Some("run `xrcg-tools registry-build` to regenerate the registry")
        }
        _ => None,
    }
}

fn manifest_hint(error: &ManifestError) -> Option<&'static str> {
    match error {
        ManifestError::DuplicateTitle { .. } => {
            Some("titles come from template descriptions; make them distinct")
        }
        ManifestError::Fs(FsError::NotFound { .. }) => {
            Some("pass --extension-root or set paths.extension_root")
        }
        _ => None,
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::NotFound { .. } => Some("check the --config path or XRCG_CONFIG"),
            ConfigError::ParseError { .. } => Some("the configuration file must be valid YAML"),
            ConfigError::EnvVarNotFound { .. } => Some("set the variable or give a ${VAR:-default}"),
            _ => None,
        };
        Self::Config {
            message: format!("configuration error: {err}"),
            source: Some(err),
            hint: hint.map(str::to_string),
        }
    }
}

/// Print `error` to stderr with its code and hint. In verbose mode the
/// source chain follows.
pub fn report(error: &CliError, verbose: bool) {
    eprintln!(
        "{} {error}",
        style(format!("error[{}]:", error.code())).red().bold()
    );

    if verbose {
        let mut source = error.source();
        while let Some(cause) = source {
            eprintln!("  {} {cause}", style("caused by:").dim());
            source = cause.source();
        }
    }

    if let Some(hint) = error.hint() {
        eprintln!("{} {hint}", style("hint:").cyan().bold());
    }
}
