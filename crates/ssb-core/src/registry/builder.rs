//! Builder for configuring `RegistryManager` initialization.

use std::path::PathBuf;

use super::manager::RegistryManager;
use crate::cancel::CancellationToken;
use crate::config::SsbConfig;
use crate::console::{Console, TerminalConsole};
use crate::error::Result;
use crate::favicon::{HttpIconSource, IconSource};
use crate::profile::{FirefoxProfileFactory, ProfileFactory};
use crate::warm_up::WarmUp;

/// Builder for `RegistryManager`.
///
/// Every collaborator has a production default; tests and embedders swap
/// them out.
///
/// # Example
///
/// ```rust,ignore
/// use ssb_core::{RegistryManager, SsbConfig};
///
/// let config = SsbConfig::load("config.json".as_ref())?;
/// let mut manager = RegistryManager::builder(config, "/home/me")
///     .warm_up(None)
///     .build()?;
/// manager.install("Mail", "https://mail.example.com", None)?;
/// ```
pub struct RegistryManagerBuilder {
    config: SsbConfig,
    home: PathBuf,
    profiles: Option<Box<dyn ProfileFactory>>,
    icons: Option<Box<dyn IconSource>>,
    console: Option<Box<dyn Console>>,
    warm_up: Option<Option<WarmUp>>,
    cancel: CancellationToken,
}

impl RegistryManagerBuilder {
    pub fn new(config: SsbConfig, home: impl Into<PathBuf>) -> Self {
        Self {
            config,
            home: home.into(),
            profiles: None,
            icons: None,
            console: None,
            warm_up: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Profile creation. Default: `FirefoxProfileFactory`.
    pub fn profile_factory(mut self, profiles: impl ProfileFactory + 'static) -> Self {
        self.profiles = Some(Box::new(profiles));
        self
    }

    /// Favicon download. Default: `HttpIconSource`.
    pub fn icon_source(mut self, icons: impl IconSource + 'static) -> Self {
        self.icons = Some(Box::new(icons));
        self
    }

    /// Table output and confirmation prompts. Default: `TerminalConsole`.
    pub fn console(mut self, console: impl Console + 'static) -> Self {
        self.console = Some(Box::new(console));
        self
    }

    /// Override the post-install warm-up; `None` disables it.
    ///
    /// Default: enabled with standard timings when `config.warm_up` is set.
    pub fn warm_up(mut self, warm_up: Option<WarmUp>) -> Self {
        self.warm_up = Some(warm_up);
        self
    }

    /// Token that interrupts the default warm-up (e.g. from a Ctrl+C handler).
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Load the manifest and prepare the profile root.
    pub fn build(self) -> Result<RegistryManager> {
        let icons: Box<dyn IconSource> = match self.icons {
            Some(icons) => icons,
            None => Box::new(HttpIconSource::new()?),
        };

        let warm_up = match self.warm_up {
            Some(warm_up) => warm_up,
            None if self.config.config.warm_up => Some(WarmUp::new(self.cancel)),
            None => None,
        };

        RegistryManager::from_parts(
            &self.config,
            &self.home,
            self.profiles
                .unwrap_or_else(|| Box::new(FirefoxProfileFactory::new())),
            icons,
            self.console
                .unwrap_or_else(|| Box::new(TerminalConsole::new())),
            warm_up,
        )
    }
}
