//! Registry persistence (`commands.json`).

use crate::entry::{CommandEntry, CommandRegistry};
use crate::error::{RegistryError, RegistryResult};
use std::path::Path;
use tracing::info;
use xrcg_common_fs as xfs;

const MAX_REGISTRY_BYTES: u64 = xfs::DEFAULT_MAX_READ;

/// Render the registry exactly as it is written to disk: two-space indented
/// JSON with a trailing newline.
pub fn render_registry(registry: &CommandRegistry) -> RegistryResult<String> {
    let mut text = serde_json::to_string_pretty(registry).map_err(RegistryError::Serialize)?;
    text.push('\n');
    Ok(text)
}

/// Write the registry atomically.
pub fn save_registry(path: &Path, registry: &CommandRegistry) -> RegistryResult<()> {
    let text = render_registry(registry)?;
    xfs::write_string_atomic(path, &text)?;
    info!(path = %path.display(), commands = registry.len(), "wrote command registry");
    Ok(())
}

/// Read a registry back, re-checking order and uniqueness.
pub fn load_registry(path: &Path) -> RegistryResult<CommandRegistry> {
    let text = xfs::read_to_string(path, MAX_REGISTRY_BYTES)?;
    let entries: Vec<CommandEntry> =
        serde_json::from_str(&text).map_err(|source| RegistryError::InvalidRegistry {
            path: path.to_path_buf(),
            source,
        })?;
    CommandRegistry::from_entries(entries)
}
