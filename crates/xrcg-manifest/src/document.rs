//! Manifest file I/O.
//!
//! Documents are handled as generic JSON trees. Values, key order and number
//! spelling of keys the compiler does not own survive a load/save cycle.
//! String escapes do not: `\u00e9` is written back as `é` and `\/` as `/`.

use crate::error::{ManifestError, ManifestResult};
use serde_json::Value;
use std::path::Path;
use xrcg_common_fs as xfs;

/// Parse a manifest file.
pub fn load_manifest(path: &Path) -> ManifestResult<Value> {
    let text = xfs::read_to_string(path, xfs::DEFAULT_MAX_READ)?;
    serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a manifest as two-space indented JSON with a trailing newline.
pub fn render_manifest(document: &Value) -> ManifestResult<String> {
    let mut text = serde_json::to_string_pretty(document).map_err(ManifestError::Serialize)?;
    text.push('\n');
    Ok(text)
}

/// Write a manifest atomically.
pub fn save_manifest(path: &Path, document: &Value) -> ManifestResult<()> {
    let text = render_manifest(document)?;
    xfs::write_string_atomic(path, &text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrcg_test_utils::temp_dir;

    #[test]
    fn test_round_trip_keeps_order_and_numbers() {
        let dir = temp_dir();
        let path = dir.path().join("package.json");
        let original = "{\n  \"zeta\": 1.50,\n  \"alpha\": {\n    \"b\": 1e3,\n    \"a\": 2\n  }\n}\n";
        std::fs::write(&path, original).unwrap();

        let document = load_manifest(&path).unwrap();
        save_manifest(&path, &document).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_round_trip_normalises_string_escapes() {
        let dir = temp_dir();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{\n  \"publisher\": \"caf\\u00e9 \\/ x\"\n}\n").unwrap();

        let document = load_manifest(&path).unwrap();
        save_manifest(&path, &document).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n  \"publisher\": \"caf\u{e9} / x\"\n}\n");
        assert_eq!(load_manifest(&path).unwrap(), document);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = temp_dir();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{ \"name\": ").unwrap();
        assert!(matches!(load_manifest(&path), Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = temp_dir();
        assert!(matches!(
            load_manifest(&dir.path().join("package.json")),
            Err(ManifestError::Fs(_))
        ));
    }
}
