//! Configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XrcgConfig {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Template scanning and command derivation.
    pub registry: RegistryConfig,
    /// Manifest projection.
    pub manifest: ManifestConfig,
    /// External generation tool.
    pub tool: ToolConfig,
}

/// Input and output locations, relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the two-level template tree.
    pub templates_root: PathBuf,
    /// Persisted command registry.
    pub commands_file: PathBuf,
    /// Editor extension project holding `package.json` and `src/`.
    pub extension_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_root: PathBuf::from("xregistry/templates"),
            commands_file: PathBuf::from("xregistry/commands.json"),
            extension_root: PathBuf::from("xrcg_vscode"),
        }
    }
}

impl PathsConfig {
    /// Anchor relative paths at `root`.
    pub fn resolve(&self, root: &Path) -> Self {
        let anchor = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        Self {
            templates_root: anchor(&self.templates_root),
            commands_file: anchor(&self.commands_file),
            extension_root: anchor(&self.extension_root),
        }
    }
}

/// What to do with a metadata file that exists but cannot be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPolicy {
    /// Fail the whole build.
    #[default]
    Strict,
    /// Log a warning and continue with empty metadata.
    Lenient,
}

/// Template scanning and command derivation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Leading word of every command id.
    pub command_prefix: String,
    /// Joins prefix, language and style.
    pub separator: String,
    /// Priority for styles without a `priority` override.
    pub default_priority: i64,
    /// Directories starting with this marker are never scanned.
    pub reserved_marker: String,
    /// Metadata file looked up at language and style level.
    pub metadata_file: String,
    /// Handling of malformed metadata files.
    pub metadata_policy: MetadataPolicy,
    /// Input file suffixes every command accepts.
    pub extensions: Vec<String>,
    /// Output name pattern; `{language}` and `{style}` are filled at build time,
    /// `{input_file_name}` is left for the handler.
    pub output_pattern: String,
    /// Raw language key to menu group.
    pub language_aliases: BTreeMap<String, String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let language_aliases = [
            ("py", "python"),
            ("ts", "typescript"),
            ("cs", "csharp"),
            ("java", "java"),
            ("asyncapi", "asyncapi"),
            ("openapi", "openapi"),
            ("asaql", "azure-stream-analytics"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            command_prefix: "generate".to_string(),
            separator: "-".to_string(),
            default_priority: 100,
            reserved_marker: "_".to_string(),
            metadata_file: "_templateinfo.json".to_string(),
            metadata_policy: MetadataPolicy::default(),
            extensions: vec![".xreg.json".to_string()],
            output_pattern: "{input_file_name}-{language}-{style}".to_string(),
            language_aliases,
        }
    }
}

/// Display entry for one menu group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDisplay {
    /// Group key as produced by the alias table.
    pub key: String,
    /// Submenu label.
    pub label: String,
    /// Submenu identifier.
    pub id: String,
}

impl GroupDisplay {
    fn new(key: &str, label: &str, id: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            id: id.to_string(),
        }
    }
}

/// Umbrella submenu hung off the context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuConfig {
    pub id: String,
    pub label: String,
}

/// Manifest projection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Prefix joined to command ids with a dot.
    pub namespace: String,
    /// Category shown in the command palette.
    pub category: String,
    /// Leading word stripped from descriptions to form titles.
    pub title_marker: String,
    /// Menu the umbrella submenu is attached to.
    pub context_menu: String,
    /// Ordering group inside the context menu.
    pub context_group: String,
    /// Umbrella submenu.
    pub umbrella: SubmenuConfig,
    /// Group display table; order is submenu order.
    pub groups: Vec<GroupDisplay>,
    /// Version stamped when the version oracle has nothing.
    pub fallback_version: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            namespace: "xrcg".to_string(),
            category: "XRegistry".to_string(),
            title_marker: "Generate ".to_string(),
            context_menu: "explorer/context".to_string(),
            context_group: "8_transformation".to_string(),
            umbrella: SubmenuConfig {
                id: "xrcgSubmenu".to_string(),
                label: "Generate Code".to_string(),
            },
            groups: vec![
                GroupDisplay::new("python", "Python", "xrcg.py"),
                GroupDisplay::new("typescript", "TypeScript", "xrcg.ts"),
                GroupDisplay::new("csharp", "C#", "xrcg.cs"),
                GroupDisplay::new("java", "Java", "xrcg.java"),
                GroupDisplay::new("asyncapi", "AsyncAPI", "xrcg.asyncapi"),
                GroupDisplay::new("openapi", "OpenAPI", "xrcg.openapi"),
                GroupDisplay::new("azure-stream-analytics", "Azure Stream Analytics", "xrcg.asaql"),
            ],
            fallback_version: "0.13.0".to_string(),
        }
    }
}

impl ManifestConfig {
    /// Look up the display entry for a group key.
    pub fn group(&self, key: &str) -> Option<&GroupDisplay> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// External generation tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable name.
    pub name: String,
    /// Lowest compatible version; only the major component blocks.
    pub min_version: String,
    /// Installer invocation offered when the tool is missing.
    pub install_command: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: "xrcg".to_string(),
            min_version: "0.13.0".to_string(),
            install_command: vec!["pip".to_string(), "install".to_string(), "xrcg".to_string()],
        }
    }
}
