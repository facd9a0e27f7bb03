//! Turns scanned template records into the command registry.

use crate::entry::{standard_args, CommandEntry, CommandRegistry};
use crate::error::RegistryResult;
use crate::scanner::TemplateRecord;
use tracing::{debug, info};
use xrcg_common_config::RegistryConfig;

/// Derive one command per record and return them as an ordered registry.
///
/// Fails when two records derive the same id, or when two commands end up
/// with the same description; every collision is reported in one error.
pub fn build(records: &[TemplateRecord], settings: &RegistryConfig) -> RegistryResult<CommandRegistry> {
    let entries: Vec<CommandEntry> = records.iter().map(|r| derive_entry(r, settings)).collect();
    let registry = CommandRegistry::from_entries(entries)?;

    for entry in &registry {
        debug!(command = %entry.id, priority = entry.priority, "registered command");
    }
    info!(commands = registry.len(), "built command registry");
    Ok(registry)
}

/// Derive a single command from a template record.
pub fn derive_entry(record: &TemplateRecord, settings: &RegistryConfig) -> CommandEntry {
    let language = record.language.as_str();
    let style = record.style.as_str();
    let sep = settings.separator.as_str();

    let description = record
        .style_info
        .description()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Generate {} {}", language.to_uppercase(), style));

    let group = settings
        .language_aliases
        .get(language)
        .cloned()
        .unwrap_or_else(|| language.to_string());

    CommandEntry {
        id: format!("{}{sep}{language}{sep}{style}", settings.command_prefix),
        description,
        extensions: settings.extensions.clone(),
        group,
        language: language.to_string(),
        style: style.to_string(),
        priority: record.style_info.priority().unwrap_or(settings.default_priority),
        args: standard_args(),
        prompts: Vec::new(),
        suggested_output_template: settings
            .output_pattern
            .replace("{language}", language)
            .replace("{style}", style),
    }
}
