//! Editor extension manifest (`package.json`) generation and validation.
//!
//! The compiler owns `contributes.commands`, `contributes.menus`,
//! `contributes.submenus` and the top-level `version`; everything else in the
//! document belongs to whoever maintains it by hand and is carried through
//! unchanged.

pub mod document;
pub mod error;
pub mod generator;
pub mod validator;
pub mod version;

pub use document::{load_manifest, render_manifest, save_manifest};
pub use error::{ManifestError, ManifestResult};
pub use generator::{
    check_titles, command_title, commands_section, menu_layout, qualified_id, update_manifest,
    when_clause, ManifestSummary, MenuLayout,
};
pub use validator::{validate_manifest, Diagnostic, DuplicateKind, ValidationReport};
pub use version::{normalize_tag, resolve_version, FixedVersion, GitTagOracle, VersionOracle};

use std::path::Path;
use xrcg_common_config::ManifestConfig;
use xrcg_common_fs::StagedWrite;
use xrcg_registry::CommandRegistry;

/// Load the manifest at `path`, update it, and write it back.
///
/// The file is only rewritten when every step succeeds.
pub fn update_manifest_file(
    path: &Path,
    registry: &CommandRegistry,
    settings: &ManifestConfig,
    version: &str,
) -> ManifestResult<ManifestSummary> {
    let (staged, summary) = stage_manifest_update(path, registry, settings, version)?;
    staged.commit()?;
    Ok(summary)
}

/// Like [`update_manifest_file`], but leaves the new document staged next to
/// `path`. The caller commits it once its other outputs are ready; dropping
/// the stage discards it.
pub fn stage_manifest_update(
    path: &Path,
    registry: &CommandRegistry,
    settings: &ManifestConfig,
    version: &str,
) -> ManifestResult<(StagedWrite, ManifestSummary)> {
    let mut document = load_manifest(path)?;
    let summary = update_manifest(&mut document, registry, settings, version)?;
    let text = render_manifest(&document)?;
    let staged = xrcg_common_fs::stage(path, text.as_bytes())?;
    Ok((staged, summary))
}
