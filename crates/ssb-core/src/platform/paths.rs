//! Home directory lookup.

use crate::error::{Result, SsbError};
use std::path::PathBuf;

/// Get the user's home directory, the root that launcher, profile and icon
/// paths from the configuration are joined to.
///
/// # Platform Behavior
/// Uses the `dirs` crate:
/// - **Linux/macOS**: `$HOME`
/// - **Windows**: `{FOLDERID_Profile}`
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| SsbError::Config {
        message: "Could not determine home directory".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_dir_is_absolute() {
        if let Ok(home) = home_dir() {
            assert!(home.is_absolute());
        }
    }
}
