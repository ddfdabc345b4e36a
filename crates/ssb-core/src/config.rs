//! Configuration for the SSB registry.
//!
//! Holds the tunable constants and the JSON configuration file that tells
//! the registry where its manifest, launchers, profiles and icons live.

use crate::error::{Result, SsbError};
use crate::profile::PrefValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Fixed defaults and timings.
pub struct SsbDefaults;

impl SsbDefaults {
    pub const CONFIG_FILE_NAME: &'static str = "config.json";
    pub const APPS_PATH: &'static str = "apps.json";
    pub const LAUNCHERS_PATH: &'static str = ".local/share/applications";
    pub const PROFILES_PATH: &'static str = ".firefox-ssb";
    pub const ICONS_PATH: &'static str = ".local/share/icons/firefox-ssb";
    pub const BROWSER: &'static str = "firefox";

    // Favicon download
    pub const FAVICON_TIMEOUT: Duration = Duration::from_secs(10);
    pub const FAVICON_FILE_NAME: &'static str = "favicon.ico";

    // Headless first start
    pub const WARM_UP_DURATION: Duration = Duration::from_secs(5);
    pub const WARM_UP_POLL_INTERVAL: Duration = Duration::from_millis(100);

    // `list` table
    pub const TABLE_COLUMN_WIDTH: usize = 40;
    pub const TABLE_RULE_WIDTH: usize = 85;
}

/// Paths and behaviour switches, the `config` object of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Manifest location, used as given (not joined to the home directory).
    pub apps_path: PathBuf,
    /// Desktop entry directory, relative to the home directory.
    pub launchers_path: PathBuf,
    /// Profile root, relative to the home directory.
    pub profiles_path: PathBuf,
    /// Downloaded favicon directory, relative to the home directory.
    pub icons_path: PathBuf,
    /// Browser executable written into `Exec` and used for the warm-up.
    pub browser: String,
    /// Start the browser headless once after install.
    pub warm_up: bool,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            apps_path: PathBuf::from(SsbDefaults::APPS_PATH),
            launchers_path: PathBuf::from(SsbDefaults::LAUNCHERS_PATH),
            profiles_path: PathBuf::from(SsbDefaults::PROFILES_PATH),
            icons_path: PathBuf::from(SsbDefaults::ICONS_PATH),
            browser: SsbDefaults::BROWSER.to_string(),
            warm_up: true,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsbConfig {
    pub config: PathsSection,
    /// Browser preferences applied to every new profile.
    pub default_settings: BTreeMap<String, PrefValue>,
}

impl SsbConfig {
    /// Load the configuration file.
    ///
    /// A missing file yields the defaults; a file that does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        debug!("Opening {}", path.display());
        let contents =
            std::fs::read_to_string(path).map_err(|e| SsbError::io_with_path(e, path))?;

        serde_json::from_str(&contents).map_err(|e| SsbError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    /// Resolve the configured locations against a home directory.
    pub fn resolve(&self, home: &Path) -> RegistryPaths {
        let section = &self.config;
        let paths = RegistryPaths {
            manifest: section.apps_path.clone(),
            launchers: home.join(&section.launchers_path),
            profiles: home.join(&section.profiles_path),
            icons: home.join(&section.icons_path),
        };

        debug!("Desktop files will be saved in {}", paths.launchers.display());
        debug!("Profiles will be saved in {}", paths.profiles.display());
        debug!("Icons will be saved in {}", paths.icons.display());

        paths
    }
}

/// Absolute (or working-directory relative) locations of the three stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPaths {
    pub manifest: PathBuf,
    pub launchers: PathBuf,
    pub profiles: PathBuf,
    pub icons: PathBuf,
}
