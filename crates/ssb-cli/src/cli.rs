//! Command line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "firefox-ssb")]
#[command(about = "Manage Firefox site-specific browser apps", version)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Don't print the banner
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file
    #[arg(long, global = true, default_value = ssb_core::SsbDefaults::CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Root for launcher, profile and icon paths (defaults to the home directory)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Action {
    /// Install a web application
    Install {
        /// Name to assign to the web application
        #[arg(short, long)]
        name: String,

        /// URL pointing to the web application to install
        #[arg(short, long)]
        url: String,

        /// Path of the icon to associate with the web application
        #[arg(short, long)]
        icon: Option<PathBuf>,

        /// Skip the headless first start
        #[arg(long)]
        no_warm_up: bool,
    },

    /// Remove a web application and its profile
    Uninstall {
        #[arg(short, long)]
        name: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Change the URL or icon of a web application
    Edit {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(short, long)]
        icon: Option<PathBuf>,
    },

    /// List installed web applications
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_install() {
        let args = Args::try_parse_from([
            "firefox-ssb",
            "install",
            "-n",
            "Mail",
            "-u",
            "https://mail.example.com",
        ])
        .unwrap();

        assert_eq!(
            args.action,
            Action::Install {
                name: "Mail".into(),
                url: "https://mail.example.com".into(),
                icon: None,
                no_warm_up: false,
            }
        );
        assert_eq!(args.config, PathBuf::from("config.json"));
    }

    #[test]
    fn test_install_requires_name_and_url() {
        assert!(Args::try_parse_from(["firefox-ssb", "install", "-u", "https://a"]).is_err());
        assert!(Args::try_parse_from(["firefox-ssb", "install", "-n", "A"]).is_err());
    }

    #[test]
    fn test_parse_edit_and_global_flags() {
        let args = Args::try_parse_from([
            "firefox-ssb",
            "edit",
            "--name",
            "Mail",
            "--icon",
            "/tmp/mail.png",
            "-d",
            "--home",
            "/tmp/home",
        ])
        .unwrap();

        assert!(args.debug);
        assert_eq!(args.home, Some(PathBuf::from("/tmp/home")));
        assert_eq!(
            args.action,
            Action::Edit {
                name: "Mail".into(),
                url: None,
                icon: Some(PathBuf::from("/tmp/mail.png")),
            }
        );
    }

    #[test]
    fn test_parse_list_and_uninstall() {
        let args = Args::try_parse_from(["firefox-ssb", "list"]).unwrap();
        assert_eq!(args.action, Action::List);

        let args = Args::try_parse_from(["firefox-ssb", "uninstall", "-n", "Mail", "-y"]).unwrap();
        assert_eq!(
            args.action,
            Action::Uninstall {
                name: "Mail".into(),
                yes: true,
            }
        );
    }
}
