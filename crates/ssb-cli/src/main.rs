//! Firefox-SSB - install Firefox site-specific browser apps.
//!
//! This binary parses the command line, sets up logging and hands the
//! requested action to `ssb_core::RegistryManager`.

mod cli;

use anyhow::Result;
use clap::Parser;
use ssb_core::{CancellationToken, RegistryManager, SsbConfig, SsbError, TerminalConsole};
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use cli::{Action, Args};

const BANNER: &str = r"    _______           ____                 __________ ____
   / ____(_)_______  / __/___  _  __     / ___/ ___// __ )
  / /_  / / ___/ _ \/ /_/ __ \| |/_/_____\__ \\__ \/ __  |
 / __/ / / /  /  __/ __/ /_/ />  </_____/__/ /__/ / /_/ /
/_/   /_/_/   \___/_/  \____/_/|_|     /____/____/_____/
";

/// Conventional status for a process ended by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Cancel a running warm-up. Returns `false` when none is running.
fn interrupt_warm_up(token: &CancellationToken) -> bool {
    if token.is_listening() {
        token.cancel();
        true
    } else {
        false
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    if !args.quiet {
        eprintln!("{}", BANNER);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            match e.downcast_ref::<SsbError>() {
                Some(err) if err.is_user_error() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = SsbConfig::load(&args.config)?;
    let home = match args.home {
        Some(path) => path,
        None => ssb_core::platform::home_dir()?,
    };

    // Ctrl+C during the warm-up terminates the headless browser and moves on.
    // Anywhere else (prompt, favicon download) it ends the process.
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        if !interrupt_warm_up(&handler_token) {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })?;

    let mut builder = RegistryManager::builder(config, home).cancellation_token(token);

    match args.action {
        Action::Install {
            name,
            url,
            icon,
            no_warm_up,
        } => {
            if icon.is_none() {
                tracing::warn!("You haven't provided a valid icon. We will try to find it");
            }
            if no_warm_up {
                builder = builder.warm_up(None);
            }
            let mut manager = builder.build()?;
            manager.install(&name, &url, icon.as_deref())?;
        }
        Action::Uninstall { name, yes } => {
            if yes {
                builder = builder.console(TerminalConsole::assume_yes());
            }
            let mut manager = builder.build()?;
            manager.uninstall(&name)?;
        }
        Action::Edit { name, url, icon } => {
            if url.is_none() && icon.is_none() {
                return Err(SsbError::NothingToEdit { name }.into());
            }
            let mut manager = builder.build()?;
            manager.edit(&name, url.as_deref(), icon.as_deref())?;
        }
        Action::List => {
            let mut manager = builder.build()?;
            manager.render_list()?;
        }
    }

    Ok(())
}
