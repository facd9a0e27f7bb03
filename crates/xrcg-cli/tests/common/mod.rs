//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

/// Test context: a project root marked with `.xrcg/`.
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp_dir.path().join(".xrcg")).expect("Failed to create .xrcg");
        Self { temp_dir }
    }

    /// Write `.xrcg/config.yaml`.
    pub fn with_config(self, config: &str) -> Self {
        self.write(".xrcg/config.yaml", config)
    }

    /// Add a template directory under the default templates root.
    pub fn with_template(self, language: &str, style: &str, info: Option<Value>) -> Self {
        let dir = format!("xregistry/templates/{language}/{style}");
        let ctx = self.write(&format!("{dir}/main.jinja"), "{# template #}\n");
        match info {
            Some(info) => ctx.write(&format!("{dir}/_templateinfo.json"), &info.to_string()),
            None => ctx,
        }
    }

    /// The three-template tree used across the pipeline tests.
    pub fn with_sample_templates(self) -> Self {
        self.with_template(
            "py",
            "kafkaproducer",
            Some(serde_json::json!({"description": "Generate Python Kafka producer", "priority": 10})),
        )
        .with_template("py", "kafkaconsumer", None)
        .with_template(
            "cs",
            "sbproducer",
            Some(serde_json::json!({"description": "Generate C# Service Bus producer", "priority": 50})),
        )
    }

    /// Add a hand-maintained extension manifest under the default extension root.
    pub fn with_extension(self) -> Self {
        xrcg_test_utils::write_manifest(
            &self.path().join("xrcg_vscode"),
            &xrcg_test_utils::base_manifest(),
        );
        self
    }

    /// Write a file relative to the project root.
    pub fn write(self, relative: &str, content: &str) -> Self {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        self
    }

    /// Get path to the project root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.path().join(relative)
    }

    pub fn read_json(&self, relative: &str) -> Value {
        let text = std::fs::read_to_string(self.file(relative)).expect("Failed to read file");
        serde_json::from_str(&text).expect("Failed to parse JSON")
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("xrcg-tools").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("XRCG_CONFIG")
            .env_remove("XRCG_LOG_LEVEL")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("Failed to run binary")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert helpers for CLI output
pub trait OutputAssertions {
    fn assert_success(&self);
    fn assert_failure(&self);
    fn assert_stdout_contains(&self, text: &str);
    fn assert_stderr_contains(&self, text: &str);
    fn assert_exit_code(&self, code: i32);
}

impl OutputAssertions for Output {
    fn assert_success(&self) {
        assert!(
            self.status.success(),
            "Command failed with status: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stderr)
        );
    }

    fn assert_failure(&self) {
        assert!(
            !self.status.success(),
            "Command succeeded unexpectedly\nstdout: {}",
            String::from_utf8_lossy(&self.stdout)
        );
    }

    fn assert_stdout_contains(&self, text: &str) {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(
            stdout.contains(text),
            "stdout did not contain '{}'\nstdout: {}",
            text,
            stdout
        );
    }

    fn assert_stderr_contains(&self, text: &str) {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(
            stderr.contains(text),
            "stderr did not contain '{}'\nstderr: {}",
            text,
            stderr
        );
    }

    fn assert_exit_code(&self, code: i32) {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Expected exit code {}, got {:?}",
            code,
            self.status.code()
        );
    }
}
