//! Generates the extension's dispatch module from the command registry.

use crate::error::{CodegenError, CodegenResult};
use crate::renderer::{render, RenderContext};
use crate::templates::{EPILOGUE, HANDLER, PRELUDE};
use crate::tool::required_version;
use std::path::{Path, PathBuf};
use tracing::info;
use xrcg_common_config::{ToolConfig, XrcgConfig};
use xrcg_common_fs as xfs;
use xrcg_registry::CommandRegistry;

/// Inputs for source generation beyond the registry itself.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Command id prefix, joined with a dot.
    pub namespace: String,
    /// External tool the handlers invoke.
    pub tool: ToolConfig,
    /// Input suffixes stripped when deriving a project name.
    pub extensions: Vec<String>,
}

impl SourceSettings {
    pub fn from_config(config: &XrcgConfig) -> Self {
        Self {
            namespace: config.manifest.namespace.clone(),
            tool: config.tool.clone(),
            extensions: config.registry.extensions.clone(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self::from_config(&XrcgConfig::default())
    }
}

/// Render the complete TypeScript module: one registered handler per
/// command, in registry order.
pub fn generate_source(registry: &CommandRegistry, settings: &SourceSettings) -> CodegenResult<String> {
    if settings.tool.install_command.is_empty() {
        return Err(CodegenError::InvalidTool(
            "install command must not be empty".to_string(),
        ));
    }
    let min = required_version(&settings.tool)?;

    let prelude = RenderContext::new()
        .literal("tool_name", &settings.tool.name)
        .raw("min_major", min.major.to_string())
        .raw("min_minor", min.minor.to_string())
        .raw("min_patch", min.patch.to_string())
        .literal_list("install_command", &settings.tool.install_command)
        .literal_list("extensions", &settings.extensions)
        .literal("channel_name", &settings.namespace);

    let mut source = render(PRELUDE, &prelude)?;

    for entry in registry {
        let handler = RenderContext::new()
            .literal("command_id", &format!("{}.{}", settings.namespace, entry.id))
            .literal("language", &entry.language)
            .literal("style", &entry.style)
            .literal("output_pattern", &entry.suggested_output_template);
        source.push_str(&render(HANDLER, &handler)?);
    }

    source.push_str(EPILOGUE);
    Ok(source)
}

/// Location of the generated module inside an extension project.
pub fn source_path(extension_root: &Path) -> PathBuf {
    extension_root.join("src").join("extension.ts")
}

/// Write the module to `<extension_root>/src/extension.ts`, replacing any
/// previous version atomically.
pub fn write_source(extension_root: &Path, source: &str) -> CodegenResult<PathBuf> {
    let path = stage_source(extension_root, source)?.commit()?;
    info!(path = %path.display(), "wrote extension source");
    Ok(path)
}

/// Write the module next to `src/extension.ts` without replacing it yet.
pub fn stage_source(extension_root: &Path, source: &str) -> CodegenResult<xfs::StagedWrite> {
    Ok(xfs::stage(source_path(extension_root), source.as_bytes())?)
}
