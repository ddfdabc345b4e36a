//! Atomic file writes for the manifest, launchers and icons.
//!
//! Every write goes through the same sequence:
//! 1. Build the complete contents in memory
//! 2. Write them to a temp file beside the target with a PID suffix
//! 3. fsync the temp file
//! 4. Rename the temp file over the target
//!
//! A failure at any step leaves the previous target untouched.

use crate::error::{Result, SsbError};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

/// Read and parse a JSON file.
///
/// Returns `None` if the file doesn't exist, or an error if parsing fails.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| SsbError::Io {
        message: format!("Failed to read {}", path.display()),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    let data: T = serde_json::from_str(&contents).map_err(|e| SsbError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;

    Ok(Some(data))
}

/// Serialize `data` and write it to `path` atomically.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(data).map_err(|e| SsbError::Json {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        source: Some(e),
    })?;

    write_bytes(path, serialized.as_bytes())
}

/// Write `contents` to `path` atomically, creating parent directories.
pub fn write_bytes(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SsbError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let temp_path = temp_path_for(path);

    let written = write_temp(&temp_path, contents).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| SsbError::Io {
            message: format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            ),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })
    });

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

fn write_temp(temp_path: &Path, contents: &[u8]) -> Result<()> {
    let io_err = |what: &str, e: std::io::Error| SsbError::Io {
        message: format!("Failed to {} temp file {}", what, temp_path.display()),
        path: Some(temp_path.to_path_buf()),
        source: Some(e),
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| io_err("create", e))?;

    file.write_all(contents).map_err(|e| io_err("write", e))?;
    file.flush().map_err(|e| io_err("flush", e))?;
    file.sync_all().map_err(|e| io_err("sync", e))?;

    Ok(())
}

/// `apps.json` -> `.apps.json.<pid>.tmp` in the same directory, so the rename
/// never crosses filesystems.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", file_name, process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_write_and_read_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json(&path, &data).unwrap();
        assert!(path.exists());

        let read_data: Option<TestData> = read_json(&path).unwrap();
        assert_eq!(read_data, Some(data));
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let result: Option<TestData> = read_json(&path).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_malformed_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<TestData>> = read_json(&path);
        assert!(matches!(result, Err(SsbError::Json { .. })));
    }

    #[test]
    fn test_write_creates_directories_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("dir");
        let path = dir.join("launcher.desktop");

        write_bytes(&path, b"[Desktop Entry]\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[Desktop Entry]\n");
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icon.ico");

        write_bytes(&path, b"first").unwrap();
        write_bytes(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }
}
