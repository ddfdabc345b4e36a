//! Launcher store: one desktop entry per installed app.

pub mod desktop_entry;
pub mod exec;

pub use desktop_entry::{DesktopEntry, DesktopEntryBuilder};
pub use exec::ExecCommand;

use std::path::Path;

/// Build the launcher for an app from its typed parts.
pub fn app_entry(name: &str, exec: &ExecCommand, icon: Option<&Path>) -> DesktopEntry {
    DesktopEntry::builder()
        .name(name)
        .comment(format!("{} Firefox app", name))
        .exec(exec.to_exec_value())
        .icon(
            icon.map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
        .no_display(false)
        .startup_notify(true)
        .terminal(false)
        .startup_wm_class(name)
        .build()
}
