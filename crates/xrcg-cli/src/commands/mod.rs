//! Command implementations.

mod doctor;
mod manifest_update;
mod pipeline;
mod registry_build;
mod validate;

pub use doctor::DoctorCommand;
pub use manifest_update::{ManifestUpdateCommand, ManifestUpdateOutput};
pub use pipeline::PipelineCommand;
pub use registry_build::{RegistryBuildCommand, RegistryBuildOutput};
pub use validate::{ValidateCommand, ValidateOutput};
