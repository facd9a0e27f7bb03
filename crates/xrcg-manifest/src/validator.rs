//! Read-only consistency check of a manifest.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// What kind of value was duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// `contributes.commands[].command`
    CommandId,
    /// `contributes.commands[].title`
    Title,
    /// `command` references inside one menu section.
    MenuCommand,
}

/// One duplicated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DuplicateKind,
    pub value: String,
    pub count: usize,
    /// Menu section, for [`DuplicateKind::MenuCommand`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.menu) {
            (DuplicateKind::CommandId, _) => {
                write!(f, "duplicate command id {:?} ({} occurrences)", self.value, self.count)
            }
            (DuplicateKind::Title, _) => {
                write!(f, "duplicate command title {:?} ({} occurrences)", self.value, self.count)
            }
            (DuplicateKind::MenuCommand, Some(menu)) => write!(
                f,
                "duplicate menu command {:?} in {menu} ({} occurrences)",
                self.value, self.count
            ),
            (DuplicateKind::MenuCommand, None) => {
                write!(f, "duplicate menu command {:?} ({} occurrences)", self.value, self.count)
            }
        }
    }
}

/// Result of [`validate_manifest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Entries in `contributes.commands`.
    pub commands_checked: usize,
    /// Menu sections inspected.
    pub menus_checked: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// No duplicates of any kind.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Count occurrences in first-seen order; values that are not strings are
/// compared by their JSON text.
fn duplicates<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        let key = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts.retain(|(_, count)| *count > 1);
    counts
}

/// Check a manifest for duplicated command ids, titles and per-menu command
/// references. Missing sections count as empty. A command without a `command`
/// or `title` key takes no part in that key's duplicate check.
pub fn validate_manifest(document: &Value) -> ValidationReport {
    let contributes = document.get("contributes");
    let commands: &[Value] = contributes
        .and_then(|c| c.get("commands"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut report = ValidationReport {
        commands_checked: commands.len(),
        ..ValidationReport::default()
    };

    for (kind, key) in [(DuplicateKind::CommandId, "command"), (DuplicateKind::Title, "title")] {
        for (value, count) in duplicates(commands.iter().filter_map(|c| c.get(key))) {
            report.diagnostics.push(Diagnostic {
                kind,
                value,
                count,
                menu: None,
            });
        }
    }

    if let Some(menus) = contributes.and_then(|c| c.get("menus")).and_then(Value::as_object) {
        for (menu, items) in menus {
            let Some(items) = items.as_array() else {
                continue;
            };
            report.menus_checked += 1;
            for (value, count) in duplicates(items.iter().filter_map(|i| i.get("command"))) {
                report.diagnostics.push(Diagnostic {
                    kind: DuplicateKind::MenuCommand,
                    value,
                    count,
                    menu: Some(menu.clone()),
                });
            }
        }
    }

    report
}
