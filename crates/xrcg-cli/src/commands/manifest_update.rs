//! Manifest update command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use serde::Serialize;
use tracing::info;
use xrcg_codegen::{generate_source, stage_source, SourceSettings};
use xrcg_common_log::spans::{file_span, phase_span, Timer};
use xrcg_manifest::{resolve_version, GitTagOracle};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Merge the command registry into the extension manifest
#[derive(Debug, Parser)]
pub struct ManifestUpdateCommand {
    /// Extension project holding package.json (default: paths.extension_root)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub extension_root: Option<PathBuf>,

    /// Command registry to read (default: paths.commands_file)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub commands: Option<PathBuf>,

    /// Also regenerate src/extension.ts
    #[arg(long)]
    pub update_extension_ts: bool,
}

/// What a manifest update wrote.
#[derive(Debug, Serialize)]
pub struct ManifestUpdateOutput {
    pub manifest: String,
    pub version: String,
    pub commands: usize,
    pub submenus: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unlisted_groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FormattedOutput for ManifestUpdateOutput {
    fn format_text(&self) -> String {
        let mut text = format!(
            "Updated {} to version {}: {} commands, {} submenus",
            self.manifest,
            self.version,
            self.commands,
            self.submenus.len()
        );
        if !self.unlisted_groups.is_empty() {
            text.push_str(&format!(
                "\nGroups without a menu: {}",
                self.unlisted_groups.join(", ")
            ));
        }
        if let Some(source) = &self.source {
            text.push_str(&format!("\nWrote {source}"));
        }
        text
    }
}

impl ManifestUpdateCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let extension_root = self
            .extension_root
            .clone()
            .unwrap_or_else(|| ctx.paths.extension_root.clone());
        let commands = self
            .commands
            .clone()
            .unwrap_or_else(|| ctx.paths.commands_file.clone());

        let output = update_manifest(ctx, &UpdateTargets {
            extension_root,
            commands,
            update_source: self.update_extension_ts,
        })?;
        print_output(ctx, &output)
    }
}

/// Inputs and outputs of one manifest update.
#[derive(Debug, Clone)]
pub struct UpdateTargets {
    pub extension_root: PathBuf,
    pub commands: PathBuf,
    pub update_source: bool,
}

/// Read the registry, resolve the version once, then rewrite the manifest
/// and optionally the dispatch source. Both files are staged next to their
/// targets before either is renamed into place, so a generation or write
/// error leaves both untouched.
pub fn update_manifest(
    ctx: &CommandContext,
    targets: &UpdateTargets,
) -> Result<ManifestUpdateOutput, CliError> {
    let _span = phase_span("manifest-update").entered();
    let timer = Timer::start("manifest-update");

    let registry = xrcg_registry::load_registry(&targets.commands)?;

    let staged_source = if targets.update_source {
        let settings = SourceSettings::from_config(&ctx.config);
        let text = generate_source(&registry, &settings)?;
        Some(stage_source(&targets.extension_root, &text)?)
    } else {
        None
    };

    let oracle = GitTagOracle::new(ctx.root.clone());
    let version = resolve_version(&oracle, &ctx.config.manifest.fallback_version);

    let manifest_path = CommandContext::manifest_path(&targets.extension_root);
    let (staged_manifest, summary) = xrcg_manifest::stage_manifest_update(
        &manifest_path,
        &registry,
        &ctx.config.manifest,
        &version,
    )?;

    staged_manifest.commit()?;
    let source_path = match staged_source {
        Some(staged) => {
            let _file = file_span("write", &ctx.display_path(staged.target())).entered();
            Some(staged.commit()?)
        }
        None => None,
    };

    info!(
        commands = summary.commands,
        submenus = summary.submenus.len(),
        version = %summary.version,
        "manifest updated"
    );
    timer.finish();

    Ok(ManifestUpdateOutput {
        manifest: ctx.display_path(&manifest_path),
        version: summary.version,
        commands: summary.commands,
        submenus: summary.submenus,
        unlisted_groups: summary.unlisted_groups,
        source: source_path.map(|p| ctx.display_path(&p)),
    })
}
