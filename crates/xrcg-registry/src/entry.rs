//! Command descriptors and the ordered registry.

use crate::error::{DescriptionCollision, IdCollision, RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Argument descriptor carried in the serialized registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArg {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub help: String,
}

impl CommandArg {
    fn string(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: "str".to_string(),
            help: help.to_string(),
        }
    }
}

/// The two arguments every generate command takes: a positional input file
/// and an output directory.
pub fn standard_args() -> Vec<CommandArg> {
    vec![
        CommandArg::string("input", "Input file path"),
        CommandArg::string("--output", "Output directory"),
    ]
}

/// One generated command.
///
/// Field order is the key order of the persisted registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Globally unique id, e.g. `generate-py-kafkaproducer`.
    #[serde(rename = "command")]
    pub id: String,
    pub description: String,
    /// Input file suffixes the command accepts.
    pub extensions: Vec<String>,
    /// Menu group; distinct from `language` when an alias applies.
    pub group: String,
    pub language: String,
    pub style: String,
    pub priority: i64,
    #[serde(default = "standard_args")]
    pub args: Vec<CommandArg>,
    #[serde(default)]
    pub prompts: Vec<Value>,
    /// Output name with `{input_file_name}` left for the handler to fill.
    #[serde(rename = "suggested_output_file_path")]
    pub suggested_output_template: String,
}

/// Ordered, duplicate-free set of commands.
///
/// Order is ascending priority, ties broken by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Sort `entries` and check id and description uniqueness.
    pub fn from_entries(mut entries: Vec<CommandEntry>) -> RegistryResult<Self> {
        check_ids(&entries)?;
        check_descriptions(&entries)?;
        entries.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
        Ok(Self { entries })
    }

    /// Entries in registry order.
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommandEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Ids in registry order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a CommandRegistry {
    type Item = &'a CommandEntry;
    type IntoIter = std::slice::Iter<'a, CommandEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn check_ids(entries: &[CommandEntry]) -> RegistryResult<()> {
    let mut by_id: BTreeMap<&str, Vec<(String, String)>> = BTreeMap::new();
    for entry in entries {
        by_id
            .entry(entry.id.as_str())
            .or_default()
            .push((entry.language.clone(), entry.style.clone()));
    }

    let collisions: Vec<IdCollision> = by_id
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(id, sources)| IdCollision {
            id: id.to_string(),
            sources,
        })
        .collect();

    if collisions.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::DuplicateCommand { collisions })
    }
}

fn check_descriptions(entries: &[CommandEntry]) -> RegistryResult<()> {
    let mut by_description: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in entries {
        by_description
            .entry(entry.description.as_str())
            .or_default()
            .push(entry.id.clone());
    }

    let collisions: Vec<DescriptionCollision> = by_description
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(description, mut ids)| {
            ids.sort();
            DescriptionCollision {
                description: description.to_string(),
                ids,
            }
        })
        .collect();

    if collisions.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::DuplicateDescription { collisions })
    }
}
