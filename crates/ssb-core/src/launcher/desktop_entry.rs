//! Desktop entry (.desktop file) reading and writing.
//!
//! Implements the subset of the XDG Desktop Entry Specification that SSB
//! launchers use: a single `[Desktop Entry]` group of `Key=Value` lines.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::atomic;
use crate::error::{Result, SsbError};
use crate::platform;
use tracing::debug;

const GROUP: &str = "Desktop Entry";

/// A desktop entry representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Entry name (shown in menus).
    pub name: String,
    /// Comment/description.
    pub comment: Option<String>,
    /// Executable command, already quoted.
    pub exec: String,
    /// Icon name or path; empty for the desktop's default icon.
    pub icon: String,
    /// Whether this entry should not be displayed.
    pub no_display: bool,
    /// Whether the desktop should show startup feedback.
    pub startup_notify: bool,
    /// Whether to run in a terminal.
    pub terminal: bool,
    /// Entry type (usually "Application").
    pub entry_type: String,
    /// StartupWMClass for window matching.
    pub startup_wm_class: Option<String>,
    /// Keys this type doesn't model, kept in file order.
    pub extra: Vec<(String, String)>,
}

impl Default for DesktopEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            comment: None,
            exec: String::new(),
            icon: String::new(),
            no_display: false,
            startup_notify: true,
            terminal: false,
            entry_type: "Application".to_string(),
            startup_wm_class: None,
            extra: Vec::new(),
        }
    }
}

impl DesktopEntry {
    /// Create a new desktop entry builder.
    pub fn builder() -> DesktopEntryBuilder {
        DesktopEntryBuilder::new()
    }

    /// Generate the .desktop file content.
    ///
    /// No spaces are written around `=`.
    pub fn render(&self) -> String {
        let mut content = String::new();
        let mut line = |key: &str, value: &str| {
            // Writing into a String cannot fail.
            let _ = writeln!(content, "{}={}", key, escape_value(value));
        };

        if let Some(ref comment) = self.comment {
            line("Comment", comment);
        }
        line("Exec", &self.exec);
        line("Icon", &self.icon);
        line("Name", &self.name);
        line("NoDisplay", bool_str(self.no_display));
        line("StartupNotify", bool_str(self.startup_notify));
        line("Terminal", if self.terminal { "1" } else { "0" });
        line("Type", &self.entry_type);
        if let Some(ref wm_class) = self.startup_wm_class {
            line("StartupWMClass", wm_class);
        }
        for (key, value) in &self.extra {
            line(key, value);
        }

        format!("[{}]\n{}", GROUP, content)
    }

    /// Parse the `[Desktop Entry]` group of a .desktop file.
    ///
    /// Comments, blank lines and other groups are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entry = DesktopEntry::default();
        let mut in_group = false;
        let mut seen_group = false;

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                in_group = &line[1..line.len() - 1] == GROUP;
                seen_group |= in_group;
                continue;
            }
            if !in_group {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                debug!("Skipping malformed desktop entry line: {}", line);
                continue;
            };
            let key = key.trim();
            let value = unescape_value(value.trim());

            match key {
                "Name" => entry.name = value,
                "Comment" => entry.comment = Some(value),
                "Exec" => entry.exec = value,
                "Icon" => entry.icon = value,
                "NoDisplay" => entry.no_display = parse_bool(&value),
                "StartupNotify" => entry.startup_notify = parse_bool(&value),
                "Terminal" => entry.terminal = parse_bool(&value),
                "Type" => entry.entry_type = value,
                "StartupWMClass" => entry.startup_wm_class = Some(value),
                _ => entry.extra.push((key.to_string(), value)),
            }
        }

        if !seen_group {
            return Err(SsbError::Validation {
                field: "launcher".to_string(),
                message: format!("missing [{}] group", GROUP),
            });
        }

        Ok(entry)
    }

    /// Read and parse a desktop entry file.
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SsbError::io_with_path(e, path))?;
        Self::parse(&content)
    }

    /// Write the desktop entry to a file atomically and mark it executable.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        atomic::write_bytes(path, self.render().as_bytes())?;

        // Desktop environments only trust executable launchers
        platform::set_executable(path)?;

        debug!("Wrote desktop entry to {:?}", path);

        Ok(())
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "true" | "1")
}

/// Apply the string-value escapes: `\\`, `\n`, `\t`, `\r`.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => unescaped.push(' '),
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Builder for desktop entries.
pub struct DesktopEntryBuilder {
    entry: DesktopEntry,
}

impl DesktopEntryBuilder {
    pub fn new() -> Self {
        Self {
            entry: DesktopEntry::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entry.name = name.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.entry.comment = Some(comment.into());
        self
    }

    pub fn exec(mut self, exec: impl Into<String>) -> Self {
        self.entry.exec = exec.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.entry.icon = icon.into();
        self
    }

    pub fn no_display(mut self, no_display: bool) -> Self {
        self.entry.no_display = no_display;
        self
    }

    pub fn startup_notify(mut self, startup_notify: bool) -> Self {
        self.entry.startup_notify = startup_notify;
        self
    }

    pub fn terminal(mut self, terminal: bool) -> Self {
        self.entry.terminal = terminal;
        self
    }

    pub fn startup_wm_class(mut self, wm_class: impl Into<String>) -> Self {
        self.entry.startup_wm_class = Some(wm_class.into());
        self
    }

    /// Build the desktop entry.
    pub fn build(self) -> DesktopEntry {
        self.entry
    }
}

impl Default for DesktopEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
