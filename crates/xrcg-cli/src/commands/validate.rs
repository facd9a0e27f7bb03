//! Validate command implementation.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueHint};
use console::style;
use serde::Serialize;
use tracing::info;
use xrcg_common_log::spans::phase_span;
use xrcg_common_log::timed;
use xrcg_manifest::{load_manifest, validate_manifest};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Check an extension manifest for duplicated commands
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    /// Manifest to check (default: package.json under paths.extension_root)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub package_json: Option<PathBuf>,
}

/// Summary of a clean manifest.
#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub manifest: String,
    pub commands_checked: usize,
    pub menus_checked: usize,
}

impl FormattedOutput for ValidateOutput {
    fn format_text(&self) -> String {
        format!(
            "{} is consistent: {} commands, {} menu sections",
            self.manifest, self.commands_checked, self.menus_checked
        )
    }
}

impl ValidateCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let path = self
            .package_json
            .clone()
            .unwrap_or_else(|| CommandContext::manifest_path(&ctx.paths.extension_root));
        let output = check_manifest(ctx, &path)?;
        print_output(ctx, &output)
    }
}

/// Check `path` and print every duplicate to stderr. Any duplicate makes this
/// fail; the file is never modified.
pub fn check_manifest(ctx: &CommandContext, path: &Path) -> Result<ValidateOutput, CliError> {
    let _span = phase_span("validate").entered();

    let document = load_manifest(path)?;
    let report = timed!("validate", validate_manifest(&document));
    let manifest = ctx.display_path(path);

    if !report.is_clean() {
        for diagnostic in &report.diagnostics {
            eprintln!("{} {manifest}: {diagnostic}", style("duplicate:").yellow().bold());
        }
        return Err(CliError::Validation {
            message: format!(
                "{manifest} failed validation with {} duplicate group(s)",
                report.diagnostics.len()
            ),
            problems: report.diagnostics.len(),
        });
    }

    info!(
        commands = report.commands_checked,
        menus = report.menus_checked,
        "manifest is consistent"
    );
    Ok(ValidateOutput {
        manifest,
        commands_checked: report.commands_checked,
        menus_checked: report.menus_checked,
    })
}
