//! Template directory scanner.

use crate::error::{RegistryError, RegistryResult};
use crate::metadata::TemplateInfo;
use std::path::Path;
use tracing::{debug, warn};
use xrcg_common_config::{MetadataPolicy, RegistryConfig};
use xrcg_common_fs::{self as xfs, FsError};

/// Metadata files are tiny; anything larger is almost certainly a mistake.
const MAX_METADATA_BYTES: u64 = 1024 * 1024;

/// One `<language>/<style>` pair found under the template root.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRecord {
    pub language: String,
    pub style: String,
    pub language_info: TemplateInfo,
    pub style_info: TemplateInfo,
}

/// Walk `<root>/<language>/<style>` and return one record per style
/// directory, sorted by `(language, style)`.
///
/// Directories whose names start with the reserved marker are skipped at
/// both levels, as are plain files.
pub fn scan(root: &Path, settings: &RegistryConfig) -> RegistryResult<Vec<TemplateRecord>> {
    let languages = xfs::list_dirs(root).map_err(|source| RegistryError::Discovery {
        path: root.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for language in languages {
        if is_reserved(&language.name, settings) {
            debug!(language = %language.name, "skipping reserved directory");
            continue;
        }

        let language_info = read_info(&language.path, settings)?;

        for style in xfs::list_dirs(&language.path)? {
            if is_reserved(&style.name, settings) {
                debug!(language = %language.name, style = %style.name, "skipping reserved directory");
                continue;
            }

            let style_info = read_info(&style.path, settings)?;
            debug!(language = %language.name, style = %style.name, "found template style");
            records.push(TemplateRecord {
                language: language.name.clone(),
                style: style.name,
                language_info: language_info.clone(),
                style_info,
            });
        }
    }

    records.sort_by(|a, b| (&a.language, &a.style).cmp(&(&b.language, &b.style)));
    Ok(records)
}

fn is_reserved(name: &str, settings: &RegistryConfig) -> bool {
    !settings.reserved_marker.is_empty() && name.starts_with(&settings.reserved_marker)
}

fn read_info(dir: &Path, settings: &RegistryConfig) -> RegistryResult<TemplateInfo> {
    let path = dir.join(&settings.metadata_file);
    let parsed = match xfs::read_optional(&path, MAX_METADATA_BYTES) {
        Ok(None) => return Ok(TemplateInfo::empty()),
        Ok(Some(text)) => TemplateInfo::parse(&text),
        Err(e @ FsError::TooLarge { .. }) => Err(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    match parsed {
        Ok(info) => Ok(info),
        Err(reason) => match settings.metadata_policy {
            MetadataPolicy::Strict => Err(RegistryError::MalformedMetadata { path, reason }),
            MetadataPolicy::Lenient => {
                warn!(path = %path.display(), %reason, "ignoring malformed metadata");
                Ok(TemplateInfo::empty())
            }
        },
    }
}
