//! Filesystem utilities.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{PackError, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|err| PackError::Write {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
    }
    Ok(())
}

/// Read a file to string, returning None if it doesn't exist.
pub fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    if path.exists() {
        Ok(Some(std::fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

/// Write `bytes` to `path` through a sibling temp file and a rename. Readers
/// never observe a half-written file. Parent directories are created.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let write_err = |err: &dyn std::fmt::Display| PackError::Write {
        path: path.display().to_string(),
        reason: err.to_string(),
    };

    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|err| write_err(&err))?;
    tmp.write_all(bytes).map_err(|err| write_err(&err))?;
    tmp.flush().map_err(|err| write_err(&err))?;
    tmp.persist(path).map_err(|err| write_err(&err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // =========================================================================
    // ensure_dir tests
    // =========================================================================

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("packs").join("en");

        assert!(!dir.exists());
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dist");

        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.exists());
    }

    #[test]
    fn ensure_dir_over_a_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        let err = ensure_dir(file.join("child")).unwrap_err();
        assert!(matches!(err, PackError::Write { .. }));
    }

    // =========================================================================
    // read_optional tests
    // =========================================================================

    #[test]
    fn read_optional_existing_and_missing() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("prompts.csv");
        std::fs::write(&file, "act,prompt\n").unwrap();

        assert_eq!(read_optional(&file).unwrap().as_deref(), Some("act,prompt\n"));
        assert!(read_optional(temp.path().join("missing.csv")).unwrap().is_none());
    }

    // =========================================================================
    // write_atomic tests
    // =========================================================================

    #[test]
    fn write_atomic_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("packs/zh/linux.json");

        write_atomic(&path, b"[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn write_atomic_replaces_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");

        write_atomic(&path, b"old content that is longer").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        let leftovers = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
