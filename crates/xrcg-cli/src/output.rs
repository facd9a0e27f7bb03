//! Output formatting utilities for CLI commands.

use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Trait for types that can be formatted for output
pub trait FormattedOutput: Serialize {
    fn format_text(&self) -> String;

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Print formatted output to stdout, unless `--quiet` was given.
pub fn print_output<T: FormattedOutput>(ctx: &CommandContext, value: &T) -> Result<(), CliError> {
    if ctx.quiet {
        return Ok(());
    }
    println!("{}", render_output(ctx.format, value)?);
    Ok(())
}

/// Render `value` in the selected format.
pub fn render_output<T: FormattedOutput>(format: OutputFormat, value: &T) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(value.format_text()),
        OutputFormat::Json => value
            .format_json()
            .map_err(|e| CliError::Other(anyhow::anyhow!("JSON serialization failed: {e}"))),
    }
}
