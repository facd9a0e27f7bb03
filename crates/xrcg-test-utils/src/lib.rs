//! Test utilities for xRegistry command compiler crates.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given content.
pub fn temp_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("test_file");
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Metadata file name used by default template trees.
pub const TEMPLATE_INFO: &str = "_templateinfo.json";

/// Builder for an on-disk `<root>/<language>/<style>` template tree.
///
/// ```ignore
/// let tree = TemplateTree::new()
///     .style_with_info("py", "kafkaproducer", json!({"priority": 10}))
///     .style("py", "kafkaconsumer");
/// ```
pub struct TemplateTree {
    dir: TempDir,
}

impl Default for TemplateTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateTree {
    /// Start an empty tree in a fresh temporary directory.
    pub fn new() -> Self {
        Self { dir: temp_dir() }
    }

    /// Root of the tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Add a style directory holding a placeholder template.
    pub fn style(self, language: &str, style: &str) -> Self {
        let style_dir = self.dir.path().join(language).join(style);
        std::fs::create_dir_all(&style_dir).expect("Failed to create style dir");
        std::fs::write(style_dir.join("main.jinja"), "{# template #}\n")
            .expect("Failed to write template");
        self
    }

    /// Add a style directory with a metadata file.
    pub fn style_with_info(self, language: &str, style: &str, info: Value) -> Self {
        let tree = self.style(language, style);
        tree.file(&format!("{language}/{style}/{TEMPLATE_INFO}"), &info.to_string())
    }

    /// Add a language-level metadata file.
    pub fn language_info(self, language: &str, info: Value) -> Self {
        self.file(&format!("{language}/{TEMPLATE_INFO}"), &info.to_string())
    }

    /// Write an arbitrary file relative to the root.
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        self
    }
}

/// The three-command tree used throughout the pipeline tests:
/// `py/kafkaproducer` (priority 10), `py/kafkaconsumer` (no metadata) and
/// `cs/sbproducer` (priority 50).
pub fn sample_tree() -> TemplateTree {
    TemplateTree::new()
        .style_with_info(
            "py",
            "kafkaproducer",
            json!({"description": "Generate Python Kafka producer", "priority": 10}),
        )
        .style("py", "kafkaconsumer")
        .style_with_info(
            "cs",
            "sbproducer",
            json!({"description": "Generate C# Service Bus producer", "priority": 50}),
        )
}

/// A hand-maintained extension manifest with keys the compiler must not touch.
pub fn base_manifest() -> Value {
    json!({
        "name": "xrcg",
        "displayName": "xRegistry Code Generator",
        "version": "0.0.1",
        "publisher": "clemensvasters",
        "engines": { "vscode": "^1.85.0" },
        "categories": ["Programming Languages"],
        "activationEvents": [],
        "main": "./out/extension.js",
        "contributes": {
            "configuration": {
                "title": "xRegistry",
                "properties": {}
            }
        },
        "scripts": { "compile": "tsc -p ./" },
        "devDependencies": { "typescript": "^5.3.3" }
    })
}

/// Write `value` as pretty JSON to `dir/package.json` and return the path.
pub fn write_manifest(dir: &Path, value: &Value) -> PathBuf {
    let path = dir.join("package.json");
    std::fs::create_dir_all(dir).expect("Failed to create manifest dir");
    let text = serde_json::to_string_pretty(value).expect("Failed to serialize manifest");
    std::fs::write(&path, text).expect("Failed to write manifest");
    path
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
