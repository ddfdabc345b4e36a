//! Headless first start of a freshly installed app.
//!
//! Firefox only builds its preference database on first start. Launching the
//! app once headless makes the `user.js` preferences stick before the user
//! opens it. The child is never left running: it either exits on its own,
//! or receives one termination signal when the wait ends or is interrupted.

use crate::cancel::CancellationToken;
use crate::config::SsbDefaults;
use crate::error::{Result, SsbError};
use crate::launcher::ExecCommand;
use crate::platform::{self, ChildState};
use std::process::{Child, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How the warm-up ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmUpOutcome {
    /// The browser exited by itself within the wait.
    Exited,
    /// The wait elapsed and the browser was terminated.
    TimedOut,
    /// The token was cancelled and the browser was terminated.
    Interrupted,
}

/// Bounded wait around the headless launch.
#[derive(Debug, Clone)]
pub struct WarmUp {
    duration: Duration,
    poll_interval: Duration,
    token: CancellationToken,
}

impl Default for WarmUp {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

impl WarmUp {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            duration: SsbDefaults::WARM_UP_DURATION,
            poll_interval: SsbDefaults::WARM_UP_POLL_INTERVAL,
            token,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Spawn `exec --headless` and supervise it.
    pub fn run(&self, exec: &ExecCommand) -> Result<WarmUpOutcome> {
        info!("Starting {} headless with the new profile for the first time", exec.program());

        let mut child = exec
            .to_command(&["--headless"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SsbError::Process {
                message: format!("Failed to start {}: {}", exec.program(), e),
            })?;

        self.supervise(&mut child)
    }

    /// Wait for `child` to exit, terminating it on timeout or cancellation.
    pub fn supervise(&self, child: &mut Child) -> Result<WarmUpOutcome> {
        let deadline = Instant::now() + self.duration;
        let _listening = self.token.listen();

        loop {
            if self.token.is_cancelled() {
                platform::terminate_child(child)?;
                warn!("Browser process killed. It may not have been able to fully load settings");
                return Ok(WarmUpOutcome::Interrupted);
            }

            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("Warm-up process exited with {}", status);
                    return Ok(WarmUpOutcome::Exited);
                }
                Ok(None) => {}
                Err(e) => {
                    platform::terminate_child(child)?;
                    return Err(SsbError::Process {
                        message: format!("Failed to poll warm-up process: {}", e),
                    });
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return match platform::terminate_child(child)? {
                    ChildState::Terminated => Ok(WarmUpOutcome::TimedOut),
                    ChildState::AlreadyExited => Ok(WarmUpOutcome::Exited),
                };
            }

            thread::sleep(self.poll_interval.min(deadline - now));
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;

    fn sleeper(secs: &str) -> Child {
        Command::new("sleep").arg(secs).spawn().unwrap()
    }

    fn quick(token: CancellationToken) -> WarmUp {
        WarmUp::new(token)
            .with_duration(Duration::from_millis(300))
            .with_poll_interval(Duration::from_millis(20))
    }

    #[test]
    fn test_long_running_child_is_terminated() {
        let mut child = sleeper("30");

        let outcome = quick(CancellationToken::new()).supervise(&mut child).unwrap();

        assert_eq!(outcome, WarmUpOutcome::TimedOut);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_short_child_exits_on_its_own() {
        let mut child = Command::new("true").spawn().unwrap();

        let outcome = WarmUp::new(CancellationToken::new())
            .with_duration(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(20))
            .supervise(&mut child)
            .unwrap();

        assert_eq!(outcome, WarmUpOutcome::Exited);
    }

    #[test]
    fn test_cancelled_wait_terminates_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let mut child = sleeper("30");

        let started = Instant::now();
        let outcome = quick(token).supervise(&mut child).unwrap();

        assert_eq!(outcome, WarmUpOutcome::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_interrupt_while_waiting() {
        let token = CancellationToken::new();
        let handler = token.clone();
        let mut child = sleeper("30");

        // Acts like the Ctrl+C handler: cancels only once the wait listens.
        let interrupter = std::thread::spawn(move || {
            let started = Instant::now();
            while !handler.is_listening() {
                assert!(started.elapsed() < Duration::from_secs(5));
                std::thread::sleep(Duration::from_millis(5));
            }
            handler.cancel();
        });

        let outcome = WarmUp::new(token.clone())
            .with_duration(Duration::from_secs(20))
            .with_poll_interval(Duration::from_millis(20))
            .supervise(&mut child)
            .unwrap();
        interrupter.join().unwrap();

        assert_eq!(outcome, WarmUpOutcome::Interrupted);
        assert!(!token.is_listening());
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_missing_browser_is_an_error() {
        let exec = ExecCommand::for_app(
            "/nonexistent/firefox-ssb-test-browser",
            std::path::Path::new("/tmp/p"),
            "A",
            "https://a.example",
        );

        let result = quick(CancellationToken::new()).run(&exec);

        assert!(matches!(result, Err(SsbError::Process { .. })));
    }
}
