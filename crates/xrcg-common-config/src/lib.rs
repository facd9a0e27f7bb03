//! Configuration types for the xRegistry command compiler.
//!
//! This crate provides the configuration read from `.xrcg/config.yaml`:
//! where templates and outputs live, how command ids are derived, how the
//! manifest is laid out, and which external tool the generated handlers call.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
