//! SSB Core - registry of Firefox site-specific browser apps.
//!
//! An installed app is three things kept in step: an entry in the JSON
//! manifest, an isolated Firefox profile directory, and a desktop entry that
//! launches Firefox on that profile. `RegistryManager` owns all three.
//!
//! # Example
//!
//! ```rust,ignore
//! use ssb_core::{RegistryManager, SsbConfig};
//!
//! fn main() -> ssb_core::Result<()> {
//!     let config = SsbConfig::load("config.json".as_ref())?;
//!     let home = ssb_core::platform::home_dir()?;
//!     let mut manager = RegistryManager::builder(config, home).build()?;
//!
//!     manager.install("Mail", "https://mail.example.com", None)?;
//!     for (name, url) in manager.apps() {
//!         println!("{name}: {url}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod atomic;
pub mod cancel;
pub mod config;
pub mod console;
pub mod error;
pub mod favicon;
pub mod launcher;
pub mod manifest;
pub mod platform;
pub mod profile;
pub mod registry;
pub mod warm_up;

// Re-export commonly used types
pub use cancel::{CancellationToken, ListenGuard};
pub use config::{RegistryPaths, SsbConfig, SsbDefaults};
pub use console::{BufferConsole, Console, TerminalConsole};
pub use error::{Result, SsbError};
pub use favicon::{HttpIconSource, IconSource};
pub use launcher::{DesktopEntry, ExecCommand};
pub use manifest::{AppRecord, Manifest};
pub use profile::{FirefoxProfileFactory, PrefValue, ProfileFactory, ProfileHandle};
pub use registry::{RegistryManager, RegistryManagerBuilder, UninstallOutcome};
pub use warm_up::{WarmUp, WarmUpOutcome};
