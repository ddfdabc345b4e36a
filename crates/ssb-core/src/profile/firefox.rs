//! Firefox profile creation.
//!
//! A profile is a directory. Preferences are appended to `user.js`, which
//! Firefox copies into its preference database on start.

use super::{PrefValue, ProfileFactory, ProfileHandle};
use crate::error::{Result, SsbError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

const USER_JS: &str = "user.js";
const USER_CHROME_CSS: &str = include_str!("../../res/userChrome.css");

/// Creates Firefox profiles on disk.
#[derive(Debug, Clone, Default)]
pub struct FirefoxProfileFactory;

impl FirefoxProfileFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ProfileFactory for FirefoxProfileFactory {
    fn create_profile(&self, path: &Path) -> Result<ProfileHandle> {
        let chrome_dir = path.join("chrome");
        fs::create_dir_all(&chrome_dir).map_err(|e| SsbError::Io {
            message: format!("Failed to create profile directory {}", chrome_dir.display()),
            path: Some(chrome_dir.clone()),
            source: Some(e),
        })?;

        // A fresh profile never inherits preferences from an earlier one.
        let user_js = path.join(USER_JS);
        fs::write(&user_js, "").map_err(|e| SsbError::io_with_path(e, &user_js))?;

        let css = chrome_dir.join("userChrome.css");
        fs::write(&css, USER_CHROME_CSS).map_err(|e| SsbError::io_with_path(e, &css))?;

        debug!("Created Firefox profile in {}", path.display());
        Ok(ProfileHandle::new(path))
    }

    fn set_preference(&self, handle: &ProfileHandle, key: &str, value: &PrefValue) -> Result<()> {
        let user_js = handle.path().join(USER_JS);
        let key_literal = serde_json::to_string(key)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&user_js)
            .map_err(|e| SsbError::io_with_path(e, &user_js))?;
        writeln!(file, "user_pref({}, {});", key_literal, value)
            .map_err(|e| SsbError::io_with_path(e, &user_js))?;

        debug!("Setting {}, value {}", key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_profile_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles").join("mail");

        let handle = FirefoxProfileFactory::new().create_profile(&path).unwrap();

        assert_eq!(handle.path(), path);
        assert!(path.join(USER_JS).exists());
        let css = fs::read_to_string(path.join("chrome").join("userChrome.css")).unwrap();
        assert!(css.contains("#TabsToolbar"));
    }

    #[test]
    fn test_preferences_written_to_user_js() {
        let temp_dir = TempDir::new().unwrap();
        let factory = FirefoxProfileFactory::new();
        let handle = factory.create_profile(temp_dir.path()).unwrap();

        factory
            .set_preference(&handle, "browser.cache.disk.enable", &PrefValue::Bool(false))
            .unwrap();
        factory
            .set_preference(&handle, "browser.startup.homepage", &"about:blank".into())
            .unwrap();

        let user_js = fs::read_to_string(temp_dir.path().join(USER_JS)).unwrap();
        assert_eq!(
            user_js,
            "user_pref(\"browser.cache.disk.enable\", false);\n\
             user_pref(\"browser.startup.homepage\", \"about:blank\");\n"
        );
    }

    #[test]
    fn test_recreate_resets_preferences() {
        let temp_dir = TempDir::new().unwrap();
        let factory = FirefoxProfileFactory::new();
        let handle = factory.create_profile(temp_dir.path()).unwrap();
        factory
            .set_preference(&handle, "a.b", &PrefValue::from(1i64))
            .unwrap();

        factory.create_profile(temp_dir.path()).unwrap();

        let user_js = fs::read_to_string(temp_dir.path().join(USER_JS)).unwrap();
        assert!(user_js.is_empty());
    }
}
