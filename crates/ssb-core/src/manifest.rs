//! Manifest store: the JSON registry of installed apps.
//!
//! On disk the manifest is one object keyed by app name:
//!
//! ```json
//! {
//!   "Mail": {
//!     "profile": "/home/u/.firefox-ssb/mail",
//!     "desktop": "/home/u/.local/share/applications/mail.desktop",
//!     "URL": "https://mail.example.com",
//!     "icon": "/home/u/.local/share/icons/firefox-ssb/mail.ico"
//!   }
//! }
//! ```
//!
//! An app without an icon stores `""`. Hand-written manifests may omit
//! `profile` and `desktop`; those read as empty paths, meaning "unknown".

use crate::atomic;
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map::{self, BTreeMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One installed app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    /// Browser profile directory. Fixed at install; empty when unknown.
    #[serde(rename = "profile", default)]
    pub profile_dir: PathBuf,
    /// Desktop entry file. Fixed at install; empty when unknown.
    #[serde(rename = "desktop", default)]
    pub launcher_file: PathBuf,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(
        rename = "icon",
        default,
        serialize_with = "serialize_icon",
        deserialize_with = "deserialize_icon"
    )]
    pub icon_path: Option<PathBuf>,
}

fn serialize_icon<S: Serializer>(icon: &Option<PathBuf>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match icon {
        Some(path) => serializer.serialize_str(&path.to_string_lossy()),
        None => serializer.serialize_str(""),
    }
}

/// `null`, `""` and the legacy `"None"` all mean "no icon".
fn deserialize_icon<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty() && s != "None")
        .map(PathBuf::from))
}

/// Mapping of app name to record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    apps: BTreeMap<String, AppRecord>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the manifest, or an empty one if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        match atomic::read_json(path)? {
            Some(manifest) => {
                debug!("Loaded manifest from {}", path.display());
                Ok(manifest)
            }
            None => {
                debug!("{} doesn't exist, starting with an empty manifest", path.display());
                Ok(Self::new())
            }
        }
    }

    /// Write the whole manifest. The document is built in memory first, so a
    /// serialization failure never truncates the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        atomic::write_json(path, self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AppRecord> {
        self.apps.get(name)
    }

    /// Insert or overwrite a record.
    pub fn insert(&mut self, name: impl Into<String>, record: AppRecord) -> Option<AppRecord> {
        self.apps.insert(name.into(), record)
    }

    pub fn remove(&mut self, name: &str) -> Option<AppRecord> {
        self.apps.remove(name)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AppRecord> {
        self.apps.iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = (&'a String, &'a AppRecord);
    type IntoIter = btree_map::Iter<'a, String, AppRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.apps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(url: &str, icon: Option<&str>) -> AppRecord {
        AppRecord {
            profile_dir: PathBuf::from("/p/mail"),
            launcher_file: PathBuf::from("/l/mail.desktop"),
            url: url.to_string(),
            icon_path: icon.map(PathBuf::from),
        }
    }

    #[test]
    fn test_save_and_reload_is_equal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apps.json");

        let mut manifest = Manifest::new();
        manifest.insert("Mail", record("https://mail.example.com", Some("/i/mail.ico")));
        manifest.insert("Chat", record("https://chat.example.com", None));
        manifest.save(&path).unwrap();

        let reloaded = Manifest::load(&path).unwrap();
        assert_eq!(reloaded, manifest);
    }

    #[test]
    fn test_wire_field_names() {
        let mut manifest = Manifest::new();
        manifest.insert("Mail", record("https://mail.example.com", None));

        let value = serde_json::to_value(&manifest).unwrap();
        let mail = &value["Mail"];
        assert_eq!(mail["profile"], "/p/mail");
        assert_eq!(mail["desktop"], "/l/mail.desktop");
        assert_eq!(mail["URL"], "https://mail.example.com");
        assert_eq!(mail["icon"], "");
    }

    #[test]
    fn test_legacy_icon_markers_read_as_none() {
        let json = r#"{
            "A": {"profile": "/p/a", "desktop": "/l/a.desktop", "URL": "http://a", "icon": "None"},
            "B": {"profile": "/p/b", "desktop": "/l/b.desktop", "URL": "http://b", "icon": null},
            "C": {"profile": "/p/c", "desktop": "/l/c.desktop", "URL": "http://c"}
        }"#;

        let manifest: Manifest = serde_json::from_str(json).unwrap();

        assert_eq!(manifest.len(), 3);
        assert!(manifest.iter().all(|(_, r)| r.icon_path.is_none()));
    }

    #[test]
    fn test_url_only_records_load() {
        let json = r#"{"Foo":{"URL":"http://a"}, "Bar":{"URL":"http://b"}}"#;

        let manifest: Manifest = serde_json::from_str(json).unwrap();

        let foo = manifest.get("Foo").unwrap();
        assert_eq!(foo.url, "http://a");
        assert!(foo.profile_dir.as_os_str().is_empty());
        assert!(foo.launcher_file.as_os_str().is_empty());
        assert!(foo.icon_path.is_none());
        assert_eq!(manifest.get("Bar").unwrap().url, "http://b");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::load(&temp_dir.path().join("apps.json")).unwrap();
        assert!(manifest.is_empty());
    }
}
