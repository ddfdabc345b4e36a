//! The `Exec` command line of an SSB launcher.
//!
//! Arguments are kept as a typed list and only quoted when rendered, so app
//! names and URLs containing spaces, quotes or `%` cannot break the command.

use std::path::Path;
use std::process::Command;

/// Characters that force an argument to be quoted in an `Exec` value.
const RESERVED: &[char] = &[
    ' ', '\t', '\n', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(',
    ')', '`',
];

/// A browser invocation for one installed app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCommand {
    program: String,
    args: Vec<String>,
}

impl ExecCommand {
    /// `<browser> --no-remote --profile <profile> --class <name> --name <name> <url>`
    pub fn for_app(browser: &str, profile: &Path, name: &str, url: &str) -> Self {
        Self {
            program: browser.to_string(),
            args: vec![
                "--no-remote".to_string(),
                "--profile".to_string(),
                profile.to_string_lossy().into_owned(),
                "--class".to_string(),
                name.to_string(),
                "--name".to_string(),
                name.to_string(),
                url.to_string(),
            ],
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Render as an `Exec` value (before the desktop-entry string escapes are applied).
    pub fn to_exec_value(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build a process command with `extra` arguments appended; no shell involved.
    pub fn to_command(&self, extra: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(extra);
        command
    }
}

/// Quote one argument following the desktop entry `Exec` rules.
fn quote_arg(arg: &str) -> String {
    // `%` introduces field codes everywhere, quoted or not.
    let arg = arg.replace('%', "%%");

    if !arg.is_empty() && !arg.contains(RESERVED) {
        return arg;
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
