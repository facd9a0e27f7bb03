//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use tracing::debug;
use xrcg_common_config::{ConfigLoader, PathsConfig, XrcgConfig};
use xrcg_common_fs::find_project_root;

use crate::commands::{
    DoctorCommand, ManifestUpdateCommand, PipelineCommand, RegistryBuildCommand, ValidateCommand,
};
use crate::error::CliError;

/// xrcg-tools - compile code generator templates into an editor extension
///
/// Scans the template tree, writes the command registry, projects it into the
/// extension manifest and dispatch source, and checks the result.
#[derive(Debug, Parser)]
#[command(
    name = "xrcg-tools",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "XRCG_CONFIG",
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the template tree and write the command registry
    RegistryBuild(RegistryBuildCommand),

    /// Merge the command registry into the extension manifest
    ManifestUpdate(ManifestUpdateCommand),

    /// Check an extension manifest for duplicated commands
    Validate(ValidateCommand),

    /// Run registry-build, manifest-update and validate in one go
    Pipeline(PipelineCommand),

    /// Check the external generation tool and project layout
    Doctor(DoctorCommand),
}

impl Cli {
    /// Load configuration and run the selected command.
    pub fn run(self) -> Result<(), CliError> {
        let cwd = std::env::current_dir().context("cannot determine the working directory")?;
        let root = find_project_root(&cwd).unwrap_or(cwd);
        debug!(root = %root.display(), "project root");

        let config = self.load_config(&root)?;
        self.execute(CommandContext::new(config, root, self.format, self.quiet))
    }

    /// Load configuration from `--config` or the project's `.xrcg/config.yaml`.
    pub fn load_config(&self, root: &Path) -> Result<XrcgConfig, CliError> {
        let loader = ConfigLoader::new(root);
        let config = match &self.config {
            Some(path) => loader.load_from(path)?,
            None => loader.load()?,
        };
        Ok(config)
    }

    /// Execute the selected command
    pub fn execute(&self, ctx: CommandContext) -> Result<(), CliError> {
        match &self.command {
            Command::RegistryBuild(cmd) => cmd.execute(&ctx),
            Command::ManifestUpdate(cmd) => cmd.execute(&ctx),
            Command::Validate(cmd) => cmd.execute(&ctx),
            Command::Pipeline(cmd) => cmd.execute(&ctx),
            Command::Doctor(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: XrcgConfig,
    /// Project root that relative configured paths are anchored at.
    pub root: PathBuf,
    /// Configured paths, already resolved against `root`.
    pub paths: PathsConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    pub fn new(config: XrcgConfig, root: PathBuf, format: OutputFormat, quiet: bool) -> Self {
        let paths = config.paths.resolve(&root);
        Self {
            config,
            root,
            paths,
            format,
            quiet,
        }
    }

    /// `path` relative to the project root with forward slashes, for messages.
    pub fn display_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        xrcg_common_fs::to_unix_string(relative)
    }

    /// The extension manifest under `extension_root`.
    pub fn manifest_path(extension_root: &Path) -> PathBuf {
        extension_root.join("package.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_manifest_update_flags() {
        let cli = Cli::try_parse_from([
            "xrcg-tools",
            "-vv",
            "manifest-update",
            "--extension-root",
            "ext",
            "--update-extension-ts",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::ManifestUpdate(cmd) => {
                assert_eq!(cmd.extension_root, Some(PathBuf::from("ext")));
                assert!(cmd.commands.is_none());
                assert!(cmd.update_extension_ts);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["xrcg-tools", "-q", "-v", "validate"]).is_err());
    }

    #[test]
    fn test_display_path_is_relative_to_root() {
        let root = PathBuf::from("/work/project");
        let ctx = CommandContext::new(XrcgConfig::default(), root.clone(), OutputFormat::Text, false);

        assert_eq!(ctx.display_path(&ctx.paths.commands_file), "xregistry/commands.json");
        assert_eq!(ctx.display_path(Path::new("/elsewhere/x.json")), "/elsewhere/x.json");
    }
}
