//! File permission handling for desktop entries.

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Make a file executable.
///
/// Desktop environments only trust launchers that carry the executable bit.
///
/// # Platform Behavior
/// - **Linux/macOS**: Sets mode 0o755
/// - **Windows**: No-op
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use crate::error::SsbError;
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path).map_err(|e| SsbError::io_with_path(e, path))?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(path, permissions).map_err(|e| SsbError::io_with_path(e, path))?;
        debug!("Set executable permissions on: {}", path.display());
    }

    #[cfg(not(unix))]
    {
        debug!("Skipping executable bit for: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SsbError;
    use tempfile::TempDir;

    #[test]
    #[cfg(unix)]
    fn test_set_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.desktop");
        std::fs::write(&path, "[Desktop Entry]\n").unwrap();

        set_executable(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o755, 0o755);
    }

    #[test]
    fn test_set_executable_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = set_executable(&temp_dir.path().join("missing.desktop"));

        #[cfg(unix)]
        assert!(matches!(result, Err(SsbError::Io { .. })));
        #[cfg(not(unix))]
        assert!(result.is_ok());
    }
}
