//! Projects the command registry into the manifest's command and menu
//! sections.

use crate::error::{ManifestError, ManifestResult};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};
use xrcg_common_config::{GroupDisplay, ManifestConfig};
use xrcg_registry::{CommandEntry, CommandRegistry};

/// What an update wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSummary {
    /// Number of commands written.
    pub commands: usize,
    /// Submenu ids emitted, in menu order.
    pub submenus: Vec<String>,
    /// Groups without a display entry; their commands have no menu.
    pub unlisted_groups: Vec<String>,
    /// Version stamped into the document.
    pub version: String,
}

/// Fully qualified command id as registered with the editor.
pub fn qualified_id(entry: &CommandEntry, settings: &ManifestConfig) -> String {
    format!("{}.{}", settings.namespace, entry.id)
}

/// Display title: the description with the leading title marker removed.
pub fn command_title<'a>(entry: &'a CommandEntry, settings: &ManifestConfig) -> &'a str {
    entry
        .description
        .strip_prefix(settings.title_marker.as_str())
        .unwrap_or(&entry.description)
}

/// Build a `when` clause from file suffixes.
///
/// The editor only exposes the final dotted segment of a file name, so
/// `.xreg.json` is matched as `.json`. Duplicates are dropped in first-seen
/// order.
pub fn when_clause<'a>(extensions: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut seen: Vec<&str> = Vec::new();
    for extension in extensions {
        let last = match extension.rfind('.') {
            Some(idx) => &extension[idx..],
            None => extension,
        };
        if !last.is_empty() && !seen.contains(&last) {
            seen.push(last);
        }
    }

    if seen.is_empty() {
        None
    } else {
        Some(
            seen.iter()
                .map(|ext| format!("resourceExtname == {ext}"))
                .collect::<Vec<_>>()
                .join(" || "),
        )
    }
}

fn when_for<'a>(entries: impl IntoIterator<Item = &'a CommandEntry>) -> Option<String> {
    when_clause(
        entries
            .into_iter()
            .flat_map(|e| e.extensions.iter().map(String::as_str)),
    )
}

fn with_when(mut item: Map<String, Value>, when: &Option<String>) -> Value {
    if let Some(when) = when {
        item.insert("when".to_string(), Value::String(when.clone()));
    }
    Value::Object(item)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Fail when two commands would carry the same title.
pub fn check_titles(registry: &CommandRegistry, settings: &ManifestConfig) -> ManifestResult<()> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in registry {
        *counts.entry(command_title(entry, settings)).or_default() += 1;
    }

    let titles: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(title, _)| title.to_string())
        .collect();

    if titles.is_empty() {
        Ok(())
    } else {
        Err(ManifestError::DuplicateTitle { titles })
    }
}

/// The `contributes.commands` array.
pub fn commands_section(registry: &CommandRegistry, settings: &ManifestConfig) -> Value {
    Value::Array(
        registry
            .iter()
            .map(|entry| {
                json!({
                    "category": settings.category,
                    "command": qualified_id(entry, settings),
                    "title": command_title(entry, settings),
                })
            })
            .collect(),
    )
}

/// Menu and submenu sections derived from the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    /// `contributes.menus`.
    pub menus: Value,
    /// `contributes.submenus`.
    pub submenus: Value,
    /// Submenu ids emitted, in order.
    pub submenu_ids: Vec<String>,
    /// Groups with no display entry.
    pub unlisted_groups: Vec<String>,
}

/// Group the registry into submenus following the display table.
pub fn menu_layout(registry: &CommandRegistry, settings: &ManifestConfig) -> MenuLayout {
    // Registry order within each group, group keys in first-seen order
    let mut groups: Vec<(&str, Vec<&CommandEntry>)> = Vec::new();
    for entry in registry {
        match groups.iter_mut().find(|(key, _)| *key == entry.group) {
            Some((_, members)) => members.push(entry),
            None => groups.push((entry.group.as_str(), vec![entry])),
        }
    }

    let unlisted_groups: Vec<String> = groups
        .iter()
        .filter(|(key, _)| settings.group(key).is_none())
        .map(|(key, _)| key.to_string())
        .collect();
    for group in &unlisted_groups {
        warn!(group = %group, "group has no display entry; its commands get no submenu");
    }

    let tabled: Vec<(&GroupDisplay, Vec<&CommandEntry>)> = settings
        .groups
        .iter()
        .filter_map(|display| {
            groups
                .iter()
                .find(|(key, _)| *key == display.key)
                .map(|(_, members)| (display, members.clone()))
        })
        .collect();

    let umbrella = &settings.umbrella;
    let mut menus = Map::new();
    let mut submenus = vec![json!({ "id": umbrella.id, "label": umbrella.label })];
    let mut umbrella_items = Vec::new();
    let mut group_sections = Vec::new();

    for (display, members) in &tabled {
        let group_when = when_for(members.iter().copied());

        submenus.push(json!({ "id": display.id, "label": display.label }));
        umbrella_items.push(with_when(
            object(json!({ "submenu": display.id, "title": display.label })),
            &group_when,
        ));

        let mut sorted = members.clone();
        sorted.sort_by(|a, b| a.description.cmp(&b.description));
        let items: Vec<Value> = sorted
            .into_iter()
            .map(|entry| {
                with_when(
                    object(json!({
                        "title": command_title(entry, settings),
                        "command": qualified_id(entry, settings),
                    })),
                    &when_for([entry]),
                )
            })
            .collect();
        group_sections.push((display.id.clone(), Value::Array(items)));
    }

    if !registry.is_empty() {
        let all_when = when_for(registry);
        menus.insert(
            settings.context_menu.clone(),
            Value::Array(vec![with_when(
                object(json!({
                    "submenu": umbrella.id,
                    "group": settings.context_group,
                    "title": umbrella.label,
                })),
                &all_when,
            )]),
        );
    }
    menus.insert(umbrella.id.clone(), Value::Array(umbrella_items));

    let submenu_ids = group_sections.iter().map(|(id, _)| id.clone()).collect();
    for (id, items) in group_sections {
        menus.insert(id, items);
    }

    MenuLayout {
        menus: Value::Object(menus),
        submenus: Value::Array(submenus),
        submenu_ids,
        unlisted_groups,
    }
}

/// Replace the compiler-owned sections of `document` and stamp `version`.
///
/// `contributes` is created when missing; all other keys keep their value and
/// position. On error the document is left untouched.
pub fn update_manifest(
    document: &mut Value,
    registry: &CommandRegistry,
    settings: &ManifestConfig,
    version: &str,
) -> ManifestResult<ManifestSummary> {
    check_titles(registry, settings)?;

    let root = document
        .as_object_mut()
        .ok_or_else(|| ManifestError::NotAnObject {
            location: "the manifest document".to_string(),
        })?;
    if root.get("contributes").is_some_and(|c| !c.is_object()) {
        return Err(ManifestError::NotAnObject {
            location: "`contributes`".to_string(),
        });
    }

    let layout = menu_layout(registry, settings);
    let commands = commands_section(registry, settings);

    root.insert("version".to_string(), Value::String(version.to_string()));

    let contributes = root
        .entry("contributes")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(contributes) = contributes {
        contributes.insert("commands".to_string(), commands);
        contributes.insert("menus".to_string(), layout.menus);
        contributes.insert("submenus".to_string(), layout.submenus);
    }

    info!(
        commands = registry.len(),
        submenus = layout.submenu_ids.len(),
        version,
        "updated manifest"
    );

    Ok(ManifestSummary {
        commands: registry.len(),
        submenus: layout.submenu_ids,
        unlisted_groups: layout.unlisted_groups,
        version: version.to_string(),
    })
}
