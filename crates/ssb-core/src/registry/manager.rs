//! The registry manager: keeps the manifest, the profile directories and the
//! desktop entries consistent across install, edit and uninstall.
//!
//! Naming rule: the manifest key is the app name exactly as given. The
//! profile directory, `<name>.desktop` and `<name>.ico` use the lower-cased
//! name. Edit and uninstall always use the paths stored in the manifest; an
//! empty stored path means "unknown".

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use url::Url;

use super::builder::RegistryManagerBuilder;
use crate::atomic;
use crate::config::{RegistryPaths, SsbConfig, SsbDefaults};
use crate::console::Console;
use crate::error::{Result, SsbError};
use crate::favicon::IconSource;
use crate::launcher::{self, DesktopEntry, ExecCommand};
use crate::manifest::{AppRecord, Manifest};
use crate::profile::{self, PrefValue, ProfileFactory};
use crate::warm_up::WarmUp;

/// Result of an uninstall request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// The app and its files are gone.
    Removed,
    /// The user declined; nothing was touched.
    Aborted,
}

/// Manager for installed site-specific browser apps.
pub struct RegistryManager {
    paths: RegistryPaths,
    browser: String,
    default_settings: BTreeMap<String, PrefValue>,
    manifest: Manifest,
    profiles: Box<dyn ProfileFactory>,
    icons: Box<dyn IconSource>,
    console: Box<dyn Console>,
    warm_up: Option<WarmUp>,
}

/// Files created by an install that hasn't been recorded yet.
#[derive(Default)]
struct PendingInstall {
    profile_dir: Option<PathBuf>,
    icon: Option<PathBuf>,
    launcher: Option<PathBuf>,
}

impl PendingInstall {
    /// Best-effort removal after a failed install.
    fn discard(self) {
        for file in self.launcher.iter().chain(self.icon.iter()) {
            match fs::remove_file(file) {
                Ok(()) => debug!("Rolled back {}", file.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to roll back {}: {}", file.display(), e),
            }
        }
        if let Some(profile_dir) = self.profile_dir {
            match fs::remove_dir_all(&profile_dir) {
                Ok(()) => debug!("Rolled back {}", profile_dir.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to roll back {}: {}", profile_dir.display(), e),
            }
        }
    }
}

impl RegistryManager {
    /// Start configuring a manager.
    pub fn builder(config: SsbConfig, home: impl Into<PathBuf>) -> RegistryManagerBuilder {
        RegistryManagerBuilder::new(config, home)
    }

    pub(super) fn from_parts(
        config: &SsbConfig,
        home: &Path,
        profiles: Box<dyn ProfileFactory>,
        icons: Box<dyn IconSource>,
        console: Box<dyn Console>,
        warm_up: Option<WarmUp>,
    ) -> Result<Self> {
        debug!("Loading relevant paths");
        let paths = config.resolve(home);

        debug!("Check the existence of {}", paths.manifest.display());
        let manifest = Manifest::load(&paths.manifest)?;

        if paths.profiles.exists() {
            debug!("{} already exists", paths.profiles.display());
        } else {
            info!(
                "{} is missing. Creating new one...",
                paths.profiles.display()
            );
            // List and uninstall work from the manifest alone, so keep going.
            if let Err(e) = fs::create_dir_all(&paths.profiles) {
                error!(
                    "An error occurred during creation of {}: {}",
                    paths.profiles.display(),
                    e
                );
            }
        }

        Ok(Self {
            paths,
            browser: config.config.browser.clone(),
            default_settings: config.default_settings.clone(),
            manifest,
            profiles,
            icons,
            console,
            warm_up,
        })
    }

    pub fn paths(&self) -> &RegistryPaths {
        &self.paths
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn get(&self, name: &str) -> Option<&AppRecord> {
        self.manifest.get(name)
    }

    /// Install a new app.
    ///
    /// Duplicate names and orphaned launchers are rejected before anything
    /// is written. A missing favicon or a failed warm-up only logs a warning.
    pub fn install(&mut self, name: &str, url: &str, icon: Option<&Path>) -> Result<AppRecord> {
        validate_name(name)?;
        validate_url(url)?;

        debug!("Check if the application is already installed");
        if self.manifest.contains(name) {
            error!("{} is already installed. Aborting.", name);
            return Err(SsbError::DuplicateApp {
                name: name.to_string(),
            });
        }

        let slug = name.to_lowercase();
        let launcher_path = self.paths.launchers.join(format!("{}.desktop", slug));
        if launcher_path.exists() {
            error!(
                "The desktop entry {} already exists. Maybe the web application is already installed. Aborting.",
                launcher_path.display()
            );
            return Err(SsbError::DuplicateLauncher {
                path: launcher_path,
            });
        }

        let mut pending = PendingInstall::default();
        match self.install_files(name, &slug, url, icon, &launcher_path, &mut pending) {
            Ok(record) => Ok(record),
            Err(e) => {
                error!("Installation of {} failed: {}", name, e);
                pending.discard();
                Err(e)
            }
        }
    }

    fn install_files(
        &mut self,
        name: &str,
        slug: &str,
        url: &str,
        icon: Option<&Path>,
        launcher_path: &Path,
        pending: &mut PendingInstall,
    ) -> Result<AppRecord> {
        info!("Creating new Firefox profile");
        let profile_dir = self.paths.profiles.join(slug);
        if profile_dir.exists() {
            // Not ours to roll back: it may hold another profile's data.
            warn!("Profile {} already exists. Reusing it.", profile_dir.display());
        } else {
            pending.profile_dir = Some(profile_dir.clone());
        }
        self.create_profile(&profile_dir)?;
        info!("New profile created in: {}", profile_dir.display());

        let icon_path = match icon {
            Some(path) => {
                if !path.exists() {
                    warn!("Icon {} does not exist", path.display());
                }
                Some(path.to_path_buf())
            }
            None => {
                let fetched = self.fetch_icon(slug, url);
                pending.icon = fetched.clone();
                fetched
            }
        };

        info!(
            "Creating {}.desktop file in {}",
            slug,
            self.paths.launchers.display()
        );
        let exec = ExecCommand::for_app(&self.browser, &profile_dir, name, url);
        let entry = launcher::app_entry(name, &exec, icon_path.as_deref());
        pending.launcher = Some(launcher_path.to_path_buf());
        entry.write_to_file(launcher_path)?;

        let record = AppRecord {
            profile_dir,
            launcher_file: launcher_path.to_path_buf(),
            url: url.to_string(),
            icon_path,
        };

        info!("Saving application data");
        let mut updated = self.manifest.clone();
        updated.insert(name, record.clone());
        self.commit(updated)?;

        if let Some(ref warm_up) = self.warm_up {
            match warm_up.run(&exec) {
                Ok(outcome) => debug!("Warm-up finished: {:?}", outcome),
                Err(e) => warn!("Warm-up launch failed: {}", e),
            }
        }

        info!("{} application has been installed correctly!", name);
        Ok(record)
    }

    fn create_profile(&self, profile_dir: &Path) -> Result<()> {
        let handle = self.profiles.create_profile(profile_dir)?;

        debug!("Setting default profile preferences");
        for (key, value) in profile::hardening_preferences() {
            self.profiles.set_preference(&handle, key, &value)?;
        }
        for (key, value) in &self.default_settings {
            self.profiles.set_preference(&handle, key, value)?;
        }

        Ok(())
    }

    /// Download and store `<icons>/<slug>.ico`. Never fails the install.
    fn fetch_icon(&self, slug: &str, url: &str) -> Option<PathBuf> {
        let scheme = Url::parse(url).map(|u| u.scheme().to_string()).ok();
        if !matches!(scheme.as_deref(), Some("http") | Some("https")) {
            warn!("No favicon lookup for non-HTTP URL {}. Default icon will be used.", url);
            return None;
        }

        let bytes = match self.icons.fetch(url) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Request error: {}", e);
                warn!("No icon found. Default icon will be used.");
                return None;
            }
        };

        let icon_path = self.paths.icons.join(format!("{}.ico", slug));
        debug!("Saving the icon in {}", icon_path.display());
        match atomic::write_bytes(&icon_path, &bytes) {
            Ok(()) => Some(icon_path),
            Err(e) => {
                warn!("Failed to save icon {}: {}", icon_path.display(), e);
                None
            }
        }
    }

    /// Remove an app and everything it owns, after confirmation.
    ///
    /// Files that are already gone are skipped with a warning; the manifest
    /// entry is always removed once the user confirms.
    pub fn uninstall(&mut self, name: &str) -> Result<UninstallOutcome> {
        debug!("Check if application exists");
        let Some(record) = self.manifest.get(name).cloned() else {
            error!("{} is not installed.", name);
            return Err(SsbError::NotInstalled {
                name: name.to_string(),
            });
        };

        if !self
            .console
            .confirm(&format!("{} will be removed. Proceed?", name))?
        {
            info!("Aborting...");
            return Ok(UninstallOutcome::Aborted);
        }

        if is_unknown(&record.launcher_file) {
            warn!("No desktop file recorded for {}. Skipping...", name);
        } else {
            info!("Removing {} file", record.launcher_file.display());
            remove_file_if_present(&record.launcher_file, "Desktop file");
        }

        if is_unknown(&record.profile_dir) {
            warn!("No profile recorded for {}. Skipping...", name);
        } else {
            info!("Removing firefox profile");
            remove_dir_if_present(&record.profile_dir);
        }

        match record.icon_path {
            Some(ref icon) if self.is_managed_icon(icon) => {
                info!("Removing application icon");
                remove_file_if_present(icon, "Icon");
            }
            Some(ref icon) => {
                debug!("Leaving user-supplied icon {} in place", icon.display());
            }
            None => debug!("{} has no icon", name),
        }

        info!("Removing application entry");
        let mut updated = self.manifest.clone();
        updated.remove(name);
        self.commit(updated)?;

        info!("{} successfully uninstalled!", name);
        Ok(UninstallOutcome::Removed)
    }

    /// Change the URL and/or icon of an installed app.
    ///
    /// The profile and the launcher location never change. A launcher that
    /// went missing is regenerated from the manifest.
    pub fn edit(&mut self, name: &str, url: Option<&str>, icon: Option<&Path>) -> Result<AppRecord> {
        let Some(mut record) = self.manifest.get(name).cloned() else {
            error!("{} is not installed.", name);
            return Err(SsbError::NotInstalled {
                name: name.to_string(),
            });
        };

        if url.is_none() && icon.is_none() {
            error!("You must specify a new URL or a new icon. Aborting...");
            return Err(SsbError::NothingToEdit {
                name: name.to_string(),
            });
        }
        if let Some(url) = url {
            validate_url(url)?;
        }

        let slug = name.to_lowercase();
        if is_unknown(&record.launcher_file) {
            record.launcher_file = self.paths.launchers.join(format!("{}.desktop", slug));
            warn!(
                "No desktop file recorded for {}. Using {}",
                name,
                record.launcher_file.display()
            );
        }
        if is_unknown(&record.profile_dir) {
            record.profile_dir = self.paths.profiles.join(&slug);
            warn!(
                "No profile recorded for {}. Using {}",
                name,
                record.profile_dir.display()
            );
        }

        let previous_icon = record.icon_path.clone();
        let launcher_path = record.launcher_file.clone();
        let mut entry = self.load_launcher(name, &record)?;

        if let Some(icon) = icon {
            info!(
                "Changing the application icon. The new icon path will be {}",
                icon.display()
            );
            if !icon.exists() {
                warn!("Icon {} does not exist", icon.display());
            }
            entry.icon = icon.to_string_lossy().into_owned();
            record.icon_path = Some(icon.to_path_buf());
        }

        if let Some(url) = url {
            info!("Changing the application URL. The new URL will be {}", url);
            entry.exec =
                ExecCommand::for_app(&self.browser, &record.profile_dir, name, url).to_exec_value();
            record.url = url.to_string();
        }

        info!("Saving changes in {}", launcher_path.display());
        entry.write_to_file(&launcher_path)?;

        info!("Saving changes in {}", self.paths.manifest.display());
        let mut updated = self.manifest.clone();
        updated.insert(name, record.clone());
        self.commit(updated)?;

        if let Some(old) = previous_icon {
            if record.icon_path.as_ref() != Some(&old) && self.is_managed_icon(&old) {
                info!("Removing replaced icon {}", old.display());
                remove_file_if_present(&old, "Icon");
            }
        }

        info!("Updating complete!");
        Ok(record)
    }

    fn load_launcher(&self, name: &str, record: &AppRecord) -> Result<DesktopEntry> {
        if record.launcher_file.exists() {
            return DesktopEntry::read_from_file(&record.launcher_file);
        }

        warn!(
            "Desktop file {} doesn't exist. Regenerating it.",
            record.launcher_file.display()
        );
        let exec = ExecCommand::for_app(&self.browser, &record.profile_dir, name, &record.url);
        Ok(launcher::app_entry(
            name,
            &exec,
            record.icon_path.as_deref(),
        ))
    }

    /// Installed apps as `(name, url)` pairs in manifest order.
    ///
    /// Call again to restart, or clone the iterator.
    pub fn apps(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.manifest
            .iter()
            .map(|(name, record)| (name.as_str(), record.url.as_str()))
    }

    /// Write the app table to the console.
    pub fn render_list(&mut self) -> Result<()> {
        let rule = "-".repeat(SsbDefaults::TABLE_RULE_WIDTH);

        self.console.write_line(&rule)?;
        self.console
            .write_line(&table_row("Application Name", "URL"))?;
        self.console.write_line(&rule)?;
        for (name, record) in &self.manifest {
            self.console.write_line(&table_row(name, &record.url))?;
        }
        self.console.write_line(&rule)?;

        Ok(())
    }

    /// Icons downloaded by install live in the icon directory; anything else
    /// belongs to the user.
    fn is_managed_icon(&self, icon: &Path) -> bool {
        icon.starts_with(&self.paths.icons)
    }

    /// Persist `manifest`, then adopt it. On failure the in-memory manifest is unchanged.
    fn commit(&mut self, manifest: Manifest) -> Result<()> {
        manifest.save(&self.paths.manifest)?;
        self.manifest = manifest;
        Ok(())
    }
}

fn table_row(left: &str, right: &str) -> String {
    format!(
        "| {:<width$}| {:<width$}|",
        left,
        right,
        width = SsbDefaults::TABLE_COLUMN_WIDTH
    )
}

fn is_unknown(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

fn remove_file_if_present(path: &Path, what: &str) {
    if !path.exists() {
        warn!("{} {} not found. Skipping...", what, path.display());
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

fn remove_dir_if_present(path: &Path) {
    if !path.exists() {
        warn!("Profile {} not found. Skipping...", path.display());
        return;
    }
    if let Err(e) = fs::remove_dir_all(path) {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

/// App names become file names, so they must be a single path component.
fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SsbError::MissingArgument {
            argument: "name".to_string(),
        });
    }

    let invalid = |message: &str| SsbError::Validation {
        field: "name".to_string(),
        message: message.to_string(),
    };
    if trimmed == "." || trimmed == ".." {
        return Err(invalid("must not be . or .."));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("must not contain path separators"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid("must not contain control characters"));
    }

    Ok(())
}

fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(SsbError::MissingArgument {
            argument: "url".to_string(),
        });
    }

    Url::parse(url).map_err(|e| SsbError::Validation {
        field: "url".to_string(),
        message: format!("{} is not an absolute URL: {}", url, e),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Mail").is_ok());
        assert!(validate_name("My Mail (work)").is_ok());
        assert!(matches!(
            validate_name("  "),
            Err(SsbError::MissingArgument { .. })
        ));
        assert!(matches!(
            validate_name(".."),
            Err(SsbError::Validation { .. })
        ));
        assert!(matches!(
            validate_name("a/b"),
            Err(SsbError::Validation { .. })
        ));
        assert!(matches!(
            validate_name("a\nb"),
            Err(SsbError::Validation { .. })
        ));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://mail.example.com").is_ok());
        assert!(validate_url("http://localhost:8080/app").is_ok());
        assert!(matches!(
            validate_url(""),
            Err(SsbError::MissingArgument { .. })
        ));
        assert!(matches!(
            validate_url("mail.example.com"),
            Err(SsbError::Validation { .. })
        ));
    }

    #[test]
    fn test_table_row_width() {
        let row = table_row("Mail", "https://mail.example.com");
        assert_eq!(row.len(), 2 + 40 + 2 + 40 + 1);
        assert!(row.starts_with("| Mail "));
        assert!(row.ends_with(" |"));
    }
}
