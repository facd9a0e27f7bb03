//! Template scanning and command registry construction.
//!
//! A template tree is laid out as `<root>/<language>/<style>/`, with an
//! optional `_templateinfo.json` at either level. [`scan`] turns the tree into
//! [`TemplateRecord`]s, [`build`] derives the ordered [`CommandRegistry`] from
//! them, and [`save_registry`] persists it as `commands.json`.

pub mod builder;
pub mod entry;
pub mod error;
pub mod metadata;
pub mod scanner;
pub mod store;

pub use builder::{build, derive_entry};
pub use entry::{standard_args, CommandArg, CommandEntry, CommandRegistry};
pub use error::{DescriptionCollision, IdCollision, RegistryError, RegistryResult};
pub use metadata::TemplateInfo;
pub use scanner::{scan, TemplateRecord};
pub use store::{load_registry, render_registry, save_registry};

use std::path::Path;
use xrcg_common_config::RegistryConfig;

/// Scan `root` and build the registry in one step.
pub fn compile(root: &Path, settings: &RegistryConfig) -> RegistryResult<CommandRegistry> {
    let records = scan(root, settings)?;
    build(&records, settings)
}
