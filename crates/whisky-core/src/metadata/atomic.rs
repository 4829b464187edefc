//! Atomic JSON reads and writes.
//!
//! Writes go to a temp file in the target's directory, are synced, and then
//! renamed over the target so readers never observe a half-written document.

use crate::{Result, WhiskyError};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read and parse a JSON document.
///
/// A missing file is an `Io` error; callers that want defaults for absent
/// documents substitute them.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| WhiskyError::Io {
        message: format!("Failed to read {}", path.display()),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    serde_json::from_str(&contents).map_err(|e| WhiskyError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })
}

/// Serialize `data` as pretty JSON and atomically replace `path` with it.
///
/// The parent directory is created if needed.
pub fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| WhiskyError::io_with_path(e, parent))?;

    let serialized = serde_json::to_vec_pretty(data).map_err(|e| WhiskyError::Json {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        source: Some(e),
    })?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| WhiskyError::Io {
        message: format!("Failed to create temp file in {}", parent.display()),
        path: Some(parent.to_path_buf()),
        source: Some(e),
    })?;
    temp.write_all(&serialized)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| WhiskyError::Io {
            message: format!("Failed to write temp file for {}", path.display()),
            path: Some(temp.path().to_path_buf()),
            source: Some(e),
        })?;

    temp.persist(path).map_err(|e| WhiskyError::Io {
        message: format!("Failed to move temp file over {}", path.display()),
        path: Some(path.to_path_buf()),
        source: Some(e.error),
    })?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        name: String,
        value: i32,
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        let doc = Doc {
            name: "bottle".into(),
            value: 3,
        };

        write_json_atomic(&path, &doc).unwrap();
        let back: Doc = read_json(&path).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");

        for value in 0..3 {
            let doc = Doc {
                name: "x".into(),
                value,
            };
            write_json_atomic(&path, &doc).unwrap();
        }

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let back: Doc = read_json(&path).unwrap();
        assert_eq!(back.value, 2);
    }

    #[test]
    fn test_read_missing_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result: Result<Doc> = read_json(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(WhiskyError::Io { .. })));
    }

    #[test]
    fn test_read_malformed_is_json_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Doc> = read_json(&path);
        assert!(matches!(result, Err(WhiskyError::Json { .. })));
    }

    #[test]
    fn test_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("doc.json");
        let doc = Doc {
            name: "nested".into(),
            value: 99,
        };

        write_json_atomic(&path, &doc).unwrap();
        assert!(path.exists());
    }
}
