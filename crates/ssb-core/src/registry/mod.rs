//! Registry manager and its builder.

mod builder;
mod manager;

pub use builder::RegistryManagerBuilder;
pub use manager::{RegistryManager, UninstallOutcome};
