//! Profile store: one isolated browser profile per installed app.

mod firefox;

pub use firefox::FirefoxProfileFactory;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A browser preference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        PrefValue::Number(value.into())
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl fmt::Display for PrefValue {
    /// Formats as a JavaScript literal, the form `user.js` expects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Number(n) => write!(f, "{}", n),
            PrefValue::String(s) => {
                let literal = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&literal)
            }
        }
    }
}

/// Preferences every SSB profile gets before the operator's defaults.
pub fn hardening_preferences() -> Vec<(&'static str, PrefValue)> {
    vec![
        ("browser.sessionstore.resume_from_crash", PrefValue::Bool(false)),
        ("browser.cache.disk.enable", PrefValue::Bool(false)),
        ("browser.ssb.enabled", PrefValue::Bool(true)),
        (
            "toolkit.legacyUserProfileCustomizations.stylesheets",
            PrefValue::Bool(true),
        ),
    ]
}

/// A materialized profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHandle {
    path: PathBuf,
}

impl ProfileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Creates browser profiles and sets their preferences.
pub trait ProfileFactory {
    /// Materialize a fresh, non-resumed profile at `path`.
    fn create_profile(&self, path: &Path) -> Result<ProfileHandle>;

    /// Persist one preference into the profile.
    fn set_preference(&self, handle: &ProfileHandle, key: &str, value: &PrefValue) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pref_value_js_literals() {
        assert_eq!(PrefValue::Bool(false).to_string(), "false");
        assert_eq!(PrefValue::from(42i64).to_string(), "42");
        assert_eq!(
            PrefValue::from("say \"hi\"").to_string(),
            "\"say \\\"hi\\\"\""
        );
    }

    #[test]
    fn test_pref_value_from_json() {
        let values: Vec<PrefValue> = serde_json::from_str(r#"[true, 1.5, "x"]"#).unwrap();
        assert_eq!(values[0], PrefValue::Bool(true));
        assert!(matches!(values[1], PrefValue::Number(_)));
        assert_eq!(values[2], PrefValue::String("x".into()));
    }

    #[test]
    fn test_hardening_disables_crash_resume_and_disk_cache() {
        let prefs = hardening_preferences();
        assert!(prefs.contains(&(
            "browser.sessionstore.resume_from_crash",
            PrefValue::Bool(false)
        )));
        assert!(prefs.contains(&("browser.cache.disk.enable", PrefValue::Bool(false))));
        assert!(prefs.contains(&("browser.ssb.enabled", PrefValue::Bool(true))));
    }
}
