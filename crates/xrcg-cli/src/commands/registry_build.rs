//! Registry build command implementation.

use clap::Parser;
use serde::Serialize;
use tracing::info;
use xrcg_common_log::spans::{phase_span, Timer};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Scan the template tree and write the command registry
#[derive(Debug, Parser)]
pub struct RegistryBuildCommand {}

/// What a registry build produced.
#[derive(Debug, Serialize)]
pub struct RegistryBuildOutput {
    pub commands: usize,
    pub templates_root: String,
    pub commands_file: String,
}

impl FormattedOutput for RegistryBuildOutput {
    fn format_text(&self) -> String {
        format!(
            "Wrote {} commands from {} to {}",
            self.commands, self.templates_root, self.commands_file
        )
    }
}

impl RegistryBuildCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let output = build_registry(ctx)?;
        print_output(ctx, &output)
    }
}

/// Scan `paths.templates_root` and write `paths.commands_file`. Nothing is
/// written when scanning or building fails.
pub fn build_registry(ctx: &CommandContext) -> Result<RegistryBuildOutput, CliError> {
    let _span = phase_span("registry-build").entered();
    let timer = Timer::start("registry-build");

    let registry = xrcg_registry::compile(&ctx.paths.templates_root, &ctx.config.registry)?;
    xrcg_registry::save_registry(&ctx.paths.commands_file, &registry)?;

    info!(commands = registry.len(), "registry written");
    timer.finish();

    Ok(RegistryBuildOutput {
        commands: registry.len(),
        templates_root: ctx.display_path(&ctx.paths.templates_root),
        commands_file: ctx.display_path(&ctx.paths.commands_file),
    })
}
