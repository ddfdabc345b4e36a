//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here rather than being
//! scattered through the registry code.
//!
//! - `paths` - Home directory lookup
//! - `permissions` - Executable bit on desktop entries
//! - `process` - Child process liveness and termination

pub mod paths;
pub mod permissions;
pub mod process;

pub use paths::home_dir;
pub use permissions::set_executable;
pub use process::{terminate_child, ChildState};
