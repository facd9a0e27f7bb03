//! Pipeline command implementation.

use clap::Parser;
use serde::Serialize;

use super::manifest_update::{update_manifest, UpdateTargets};
use super::registry_build::build_registry;
use super::validate::check_manifest;
use super::{ManifestUpdateOutput, RegistryBuildOutput, ValidateOutput};
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Run registry-build, manifest-update and validate in one go
///
/// Uses the configured paths throughout and always regenerates
/// src/extension.ts. Stops at the first failing phase.
#[derive(Debug, Parser)]
pub struct PipelineCommand {
    /// Leave src/extension.ts as it is
    #[arg(long)]
    pub skip_extension_ts: bool,
}

/// Combined result of the three phases.
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub registry: RegistryBuildOutput,
    pub manifest: ManifestUpdateOutput,
    pub validation: ValidateOutput,
}

impl FormattedOutput for PipelineOutput {
    fn format_text(&self) -> String {
        [
            self.registry.format_text(),
            self.manifest.format_text(),
            self.validation.format_text(),
        ]
        .join("\n")
    }
}

impl PipelineCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let registry = build_registry(ctx)?;

        let targets = UpdateTargets {
            extension_root: ctx.paths.extension_root.clone(),
            commands: ctx.paths.commands_file.clone(),
            update_source: !self.skip_extension_ts,
        };
        let manifest = update_manifest(ctx, &targets)?;

        let manifest_path = CommandContext::manifest_path(&ctx.paths.extension_root);
        let validation = check_manifest(ctx, &manifest_path)?;

        print_output(
            ctx,
            &PipelineOutput {
                registry,
                manifest,
                validation,
            },
        )
    }
}
