//! File system utilities for the xRegistry command compiler.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod path;

pub use path::{find_project_root, to_unix_string};

/// Default upper bound for files read into memory (16 MiB).
pub const DEFAULT_MAX_READ: u64 = 16 * 1024 * 1024;

/// File system errors. Every variant carries the path it concerns.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("file too large: {} ({size} bytes, max {max})", path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            FsError::NotFound { path }
            | FsError::NotADirectory { path }
            | FsError::TooLarge { path, .. }
            | FsError::Read { path, .. }
            | FsError::Write { path, .. } => path,
        }
    }

    fn read(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound {
                path: path.to_path_buf(),
            },
            _ => FsError::Read {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    fn write(path: &Path, source: io::Error) -> Self {
        FsError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias for file system operations.
pub type Result<T> = std::result::Result<T, FsError>;

/// Read a file to string with size limit.
pub fn read_to_string(path: impl AsRef<Path>, max_size: u64) -> Result<String> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| FsError::read(path, e))?;

    if metadata.len() > max_size {
        return Err(FsError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: max_size,
        });
    }

    fs::read_to_string(path).map_err(|e| FsError::read(path, e))
}

/// Read a file if it exists. A missing file yields `Ok(None)`.
pub fn read_optional(path: impl AsRef<Path>, max_size: u64) -> Result<Option<String>> {
    match read_to_string(path, max_size) {
        Ok(contents) => Ok(Some(contents)),
        Err(FsError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write to a file atomically (write to temp, then rename).
///
/// The temporary file lives next to the target as `.<name>.tmp` so the
/// rename never crosses a file system boundary.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    stage(path, contents)?.commit().map(|_| ())
}

/// Contents written to a temporary file that has not yet replaced its
/// target.
///
/// Several files can be staged and then committed together, so a failure
/// while preparing any of them leaves every target untouched. Dropping an
/// uncommitted stage removes its temporary file.
#[derive(Debug)]
pub struct StagedWrite {
    target: PathBuf,
    temp: PathBuf,
    committed: bool,
}

impl StagedWrite {
    /// Path the contents will be renamed to.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the temporary file over the target.
    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.temp, &self.target).map_err(|e| FsError::write(&self.target, e))?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

/// Write `contents` to the temporary sibling of `path` without touching
/// `path` itself. Parent directories are created as needed.
pub fn stage(path: impl AsRef<Path>, contents: &[u8]) -> Result<StagedWrite> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    ensure_dir(parent)?;

    let mut temp_path = path.to_path_buf();
    match path.file_name() {
        Some(name) => temp_path.set_file_name(format!(".{}.tmp", name.to_string_lossy())),
        None => temp_path.push(".tmp"),
    }

    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(FsError::write(&temp_path, e));
    }

    Ok(StagedWrite {
        target: path.to_path_buf(),
        temp: temp_path,
        committed: false,
    })
}

/// Write string to file atomically.
pub fn write_string_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    write_atomic(path, contents.as_bytes())
}

/// Ensure a directory exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| FsError::write(path, e))?;
    }
    Ok(())
}

/// A named sub-directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Final path component.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
}

/// List the immediate sub-directories of `dir`, sorted by name.
///
/// Plain files are skipped, as are entries whose names are not valid UTF-8.
pub fn list_dirs(dir: impl AsRef<Path>) -> Result<Vec<DirEntry>> {
    let dir = dir.as_ref();
    let metadata = fs::metadata(dir).map_err(|e| FsError::read(dir, e))?;
    if !metadata.is_dir() {
        return Err(FsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| FsError::read(dir, e))? {
        let entry = entry.map_err(|e| FsError::read(dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            entries.push(DirEntry {
                name: name.to_string(),
                path,
            });
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_to_string_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = read_to_string(&missing, DEFAULT_MAX_READ).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
        assert_eq!(err.path(), missing.as_path());
    }

    #[test]
    fn test_read_to_string_size_limit() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("big.txt");
        fs::write(&file, "0123456789").unwrap();

        assert!(matches!(
            read_to_string(&file, 4),
            Err(FsError::TooLarge { size: 10, max: 4, .. })
        ));
        assert_eq!(read_to_string(&file, 10).unwrap(), "0123456789");
    }

    #[test]
    fn test_read_optional() {
        let dir = tempdir().unwrap();
        assert_eq!(read_optional(dir.path().join("none"), 64).unwrap(), None);
        fs::write(dir.path().join("some"), "x").unwrap();
        assert_eq!(read_optional(dir.path().join("some"), 64).unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_write_atomic_creates_parents_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested/out/commands.json");
        write_string_atomic(&target, "[]\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[]\n");
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("package.json");
        fs::write(&target, "old").unwrap();
        write_atomic(&target, b"new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_dropped_stage_leaves_target_alone() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("package.json");
        fs::write(&target, "old").unwrap();

        let staged = stage(&target, b"new").unwrap();
        assert_eq!(staged.target(), target.as_path());
        assert!(dir.path().join(".package.json.tmp").exists());
        drop(staged);

        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        assert!(!dir.path().join(".package.json.tmp").exists());
    }

    #[test]
    fn test_commit_replaces_target() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("src/extension.ts");
        let written = stage(&target, b"export {};\n").unwrap().commit().unwrap();

        assert_eq!(written, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "export {};\n");
        assert!(!dir.path().join("src/.extension.ts.tmp").exists());
    }

    #[test]
    fn test_stage_under_plain_file_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("src"), "not a directory").unwrap();

        let err = stage(dir.path().join("src/extension.ts"), b"x").unwrap_err();
        assert!(matches!(err, FsError::Write { .. }));
    }

    #[test]
    fn test_list_dirs_sorted_and_skips_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("ts")).unwrap();
        fs::create_dir(dir.path().join("cs")).unwrap();
        fs::create_dir(dir.path().join("py")).unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let names: Vec<String> = list_dirs(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["cs", "py", "ts"]);
    }

    #[test]
    fn test_list_dirs_rejects_file_and_missing() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "").unwrap();

        assert!(matches!(list_dirs(&file), Err(FsError::NotADirectory { .. })));
        assert!(matches!(
            list_dirs(dir.path().join("missing")),
            Err(FsError::NotFound { .. })
        ));
    }
}
