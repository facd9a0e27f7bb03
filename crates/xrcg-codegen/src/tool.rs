//! Rules for working with the external generation tool.
//!
//! These mirror what the generated handlers do at run time, so that
//! `doctor` and the tests can apply the same rules from Rust.

use crate::error::{CodegenError, CodegenResult};
use regex::Regex;
use semver::Version;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::debug;
use xrcg_common_config::ToolConfig;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("version pattern is valid"))
}

/// First `MAJOR.MINOR.PATCH` in `text`, e.g. from `xrcg 0.13.2 (python 3.12)`.
pub fn parse_tool_version(text: &str) -> Option<Version> {
    let caps = version_pattern().captures(text)?;
    Some(Version::new(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// The configured minimum version.
pub fn required_version(tool: &ToolConfig) -> CodegenResult<Version> {
    Version::parse(&tool.min_version).map_err(|source| CodegenError::InvalidVersion {
        version: tool.min_version.clone(),
        source,
    })
}

/// How an installed tool version relates to the required one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Same major and at least the required minor/patch, or a newer major.
    Compatible,
    /// Same major, older minor or patch: works with a warning.
    OutdatedMinor,
    /// Older major: generation is blocked.
    IncompatibleMajor,
}

impl Compatibility {
    /// Whether generation may proceed.
    pub fn is_usable(self) -> bool {
        !matches!(self, Compatibility::IncompatibleMajor)
    }
}

/// Classify `actual` against `required`. Pre-release and build metadata are
/// ignored; only the numeric triple counts.
pub fn check_compatibility(actual: &Version, required: &Version) -> Compatibility {
    if actual.major < required.major {
        Compatibility::IncompatibleMajor
    } else if actual.major > required.major {
        Compatibility::Compatible
    } else if (actual.minor, actual.patch) < (required.minor, required.patch) {
        Compatibility::OutdatedMinor
    } else {
        Compatibility::Compatible
    }
}

/// Fill `{input_file_name}` in `pattern` with the input's base name (last
/// extension removed) and place the result next to the input.
pub fn suggested_output_path(input: &Path, pattern: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = pattern.replacen("{input_file_name}", &stem, 1);

    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

/// Project name passed to the tool: the input file name without the first
/// matching configured extension, or without its last extension otherwise.
pub fn project_name(input: &Path, extensions: &[String]) -> String {
    let file_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    for extension in extensions {
        if file_name.len() > extension.len() {
            if let Some(stripped) = file_name.strip_suffix(extension.as_str()) {
                return stripped.to_string();
            }
        }
    }

    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(file_name)
}

/// Argument list for one generation run. Passed to the tool as separate
/// arguments, never through a shell.
pub fn generate_args(
    project: &str,
    language: &str,
    style: &str,
    definitions: &Path,
    output: &Path,
) -> Vec<String> {
    vec![
        "generate".to_string(),
        "--projectname".to_string(),
        project.to_string(),
        "--language".to_string(),
        language.to_string(),
        "--style".to_string(),
        style.to_string(),
        "--definitions".to_string(),
        definitions.to_string_lossy().into_owned(),
        "--output".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Outcome of running `<tool> --version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolProbe {
    /// The tool could not be started or exited with an error.
    Missing { reason: String },
    /// The tool ran but printed no recognisable version.
    Unparsable { output: String },
    /// The tool reported a version.
    Found {
        version: Version,
        compatibility: Compatibility,
    },
}

impl fmt::Display for ToolProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolProbe::Missing { reason } => write!(f, "not available ({reason})"),
            ToolProbe::Unparsable { output } => write!(f, "unrecognised version output {output:?}"),
            ToolProbe::Found {
                version,
                compatibility,
            } => match compatibility {
                Compatibility::Compatible => write!(f, "{version}"),
                Compatibility::OutdatedMinor => write!(f, "{version} (outdated)"),
                Compatibility::IncompatibleMajor => write!(f, "{version} (incompatible)"),
            },
        }
    }
}

/// Run `<tool> --version` and classify the result.
pub fn probe_tool(tool: &ToolConfig) -> CodegenResult<ToolProbe> {
    let required = required_version(tool)?;

    let output = match Command::new(&tool.name).arg("--version").output() {
        Ok(output) => output,
        Err(e) => {
            debug!(tool = %tool.name, error = %e, "tool could not be started");
            return Ok(ToolProbe::Missing {
                reason: e.to_string(),
            });
        }
    };

    if !output.status.success() {
        return Ok(ToolProbe::Missing {
            reason: format!("exited with {}", output.status),
        });
    }

    // Some builds print the version on stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let text = if stdout.trim().is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        stdout.into_owned()
    };

    Ok(match parse_tool_version(&text) {
        Some(version) => {
            let compatibility = check_compatibility(&version, &required);
            ToolProbe::Found {
                version,
                compatibility,
            }
        }
        None => ToolProbe::Unparsable {
            output: text.trim().to_string(),
        },
    })
}
