//! TypeScript dispatch module generation.
//!
//! [`generate_source`] turns a [`CommandRegistry`](xrcg_registry::CommandRegistry)
//! into `src/extension.ts`: one registered handler per command, each of which
//! checks the external tool, asks for an output location and runs the tool.
//! The [`tool`] module carries the same version and naming rules in Rust.

pub mod error;
pub mod generator;
pub mod renderer;
pub mod templates;
pub mod tool;

pub use error::{CodegenError, CodegenResult};
pub use generator::{generate_source, source_path, stage_source, write_source, SourceSettings};
pub use renderer::{render, string_literal, RenderContext};
pub use tool::{
    check_compatibility, generate_args, parse_tool_version, probe_tool, project_name,
    required_version, suggested_output_path, Compatibility, ToolProbe,
};
