//! xrcg-tools library
//!
//! Command line front end for the template scanner, registry builder,
//! manifest generator, source generator and validator.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
