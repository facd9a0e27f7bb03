//! Doctor command implementation.

use clap::Parser;
use console::{style, Emoji};
use std::path::Path;
use xrcg_codegen::{probe_tool, Compatibility, ToolProbe};
use xrcg_common_config::ConfigLoader;
use xrcg_common_fs::list_dirs;

use crate::cli::CommandContext;
use crate::error::CliError;

static CHECK: Emoji<'_, '_> = Emoji("✓", "ok");
static CROSS: Emoji<'_, '_> = Emoji("✗", "x");
static WARNING: Emoji<'_, '_> = Emoji("⚠", "!");

/// Check the external generation tool and project layout
#[derive(Debug, Parser)]
pub struct DoctorCommand {
    /// Fail when any issue is found
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Default)]
struct Findings {
    issues: Vec<String>,
    warnings: Vec<String>,
}

impl DoctorCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        println!("{}", style("xrcg-tools health check").bold());
        println!();

        let mut findings = Findings::default();
        check_layout(ctx, &mut findings);
        println!();
        check_tool(ctx, &mut findings)?;
        println!();

        if !findings.issues.is_empty() {
            println!("{}", style("Issues found:").red().bold());
            for (i, issue) in findings.issues.iter().enumerate() {
                println!("  {}. {}", i + 1, issue);
            }
            println!();
        }

        if !findings.warnings.is_empty() {
            println!("{}", style("Warnings:").yellow().bold());
            for (i, warning) in findings.warnings.iter().enumerate() {
                println!("  {}. {}", i + 1, warning);
            }
            println!();
        }

        let status = if !findings.issues.is_empty() {
            style("Not ready - fix issues above").red()
        } else if !findings.warnings.is_empty() {
            style("Ready with warnings").yellow()
        } else {
            style("Ready").green()
        };
        println!("Overall: {status}");

        if self.strict && !findings.issues.is_empty() {
            return Err(CliError::user_with_hint(
                format!("doctor found {} issue(s)", findings.issues.len()),
                "run without --strict to see the report only",
            ));
        }
        Ok(())
    }
}

fn check_layout(ctx: &CommandContext, findings: &mut Findings) {
    println!("{}", style("Project:").bold());
    println!("  root {}", ctx.root.display());

    let config_path = ConfigLoader::new(&ctx.root).config_path();
    if config_path.exists() {
        println!("  {CHECK} configuration {}", ctx.display_path(&config_path));
    } else {
        println!("  {WARNING} no {}, using defaults", ctx.display_path(&config_path));
    }

    match list_dirs(&ctx.paths.templates_root) {
        Ok(languages) => println!(
            "  {CHECK} templates {} ({} languages)",
            ctx.display_path(&ctx.paths.templates_root),
            languages.len()
        ),
        Err(e) => {
            println!("  {CROSS} templates: {e}");
            findings
                .issues
                .push("Create the template tree or set paths.templates_root".to_string());
        }
    }

    report_file(ctx, &ctx.paths.commands_file, "registry", findings, || {
        "Run `xrcg-tools registry-build`".to_string()
    });

    let manifest = CommandContext::manifest_path(&ctx.paths.extension_root);
    report_file(ctx, &manifest, "manifest", findings, || {
        "Create the extension project or set paths.extension_root".to_string()
    });
}

fn report_file(
    ctx: &CommandContext,
    path: &Path,
    label: &str,
    findings: &mut Findings,
    fix: impl FnOnce() -> String,
) {
    if path.is_file() {
        println!("  {CHECK} {label} {}", ctx.display_path(path));
    } else {
        println!("  {WARNING} {label} {} not found", ctx.display_path(path));
        findings.warnings.push(fix());
    }
}

fn check_tool(ctx: &CommandContext, findings: &mut Findings) -> Result<(), CliError> {
    let tool = &ctx.config.tool;
    println!("{}", style("Generator tool:").bold());

    let probe = probe_tool(tool)?;
    match &probe {
        ToolProbe::Found {
            compatibility: Compatibility::Compatible,
            ..
        } => println!("  {CHECK} {} {probe}", tool.name),
        ToolProbe::Found {
            compatibility: Compatibility::OutdatedMinor,
            ..
        } => {
            println!("  {WARNING} {} {probe}", tool.name);
            findings
                .warnings
                .push(format!("Update {} to {} or newer", tool.name, tool.min_version));
        }
        ToolProbe::Found {
            compatibility: Compatibility::IncompatibleMajor,
            ..
        } => {
            println!("  {CROSS} {} {probe}", tool.name);
            findings.issues.push(format!(
                "{} {} or newer is required",
                tool.name, tool.min_version
            ));
        }
        ToolProbe::Missing { .. } | ToolProbe::Unparsable { .. } => {
            println!("  {CROSS} {} {probe}", tool.name);
            findings
                .issues
                .push(format!("Install it with `{}`", tool.install_command.join(" ")));
        }
    }
    Ok(())
}
