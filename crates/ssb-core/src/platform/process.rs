//! Child process termination.
//!
//! The warm-up launch must never leave the browser running. Termination
//! sends exactly one signal and then reaps the child.

use crate::error::{Result, SsbError};
use std::process::Child;
use tracing::{debug, warn};

/// What `terminate_child` found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    /// The child had already exited; no signal was sent.
    AlreadyExited,
    /// The child was signalled and has been reaped.
    Terminated,
}

/// Terminate a child process if it is still running.
///
/// # Platform Behavior
/// - **Linux/macOS**: Sends a single SIGTERM, then waits for the child to exit
/// - **Windows**: Uses `Child::kill` (TerminateProcess), then waits
pub fn terminate_child(child: &mut Child) -> Result<ChildState> {
    let pid = child.id();

    match child.try_wait() {
        Ok(Some(status)) => {
            debug!("Process {} already exited with {}", pid, status);
            return Ok(ChildState::AlreadyExited);
        }
        Ok(None) => {}
        Err(e) => warn!("Failed to poll process {}: {}", pid, e),
    }

    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        debug!("Sending SIGTERM to process {}", pid);
        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            if e == nix::errno::Errno::ESRCH {
                let _ = child.wait();
                return Ok(ChildState::AlreadyExited);
            }
            return Err(SsbError::Process {
                message: format!("Failed to send SIGTERM to {}: {}", pid, e),
            });
        }
    }

    #[cfg(not(unix))]
    {
        debug!("Killing process {}", pid);
        child.kill().map_err(|e| SsbError::Process {
            message: format!("Failed to kill process {}: {}", pid, e),
        })?;
    }

    // Reap so the child doesn't linger as a zombie.
    child.wait().map_err(|e| SsbError::Process {
        message: format!("Failed to wait for process {}: {}", pid, e),
    })?;

    debug!("Process {} terminated", pid);
    Ok(ChildState::Terminated)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    #[test]
    fn test_terminate_running_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();

        let state = terminate_child(&mut child).unwrap();

        assert_eq!(state, ChildState::Terminated);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_terminate_exited_child() {
        let mut child = Command::new("true").spawn().unwrap();
        child.wait().unwrap();

        let state = terminate_child(&mut child).unwrap();

        assert_eq!(state, ChildState::AlreadyExited);
    }
}
