//! Notification dispatch error types.
//!
//! A [`DispatchError`] never escapes as `Err` from a send: backends carry it
//! inside [`SendOutcome::Failed`](crate::SendOutcome::Failed), so the error
//! is cloneable and serializable along with the outcome.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DispatchError {
    /// The external program could not be started.
    #[error("failed to launch '{command}': {reason}")]
    Launch {
        /// Program that was executed
        command: String,
        /// OS error message
        reason: String,
    },

    /// The external program exited with a code outside the protocol.
    #[error("notification daemon exited with unrecognized code {0}")]
    UnrecognizedExit(i32),

    /// The external program was killed by a signal it did not receive from us.
    #[error("notification daemon was terminated by a signal")]
    Terminated,

    /// A non-interactive send did not finish within the launch guard.
    #[error("notification daemon did not return within {0} ms")]
    LaunchTimeout(u64),

    /// Waiting on the external program failed.
    #[error("failed to wait for notification daemon: {0}")]
    Wait(String),

    /// The program's output could not be read.
    #[error("failed to read notification daemon output: {0}")]
    Output(String),

    /// A background task running the send panicked or was aborted.
    #[error("send task failed: {0}")]
    Task(String),
}

impl DispatchError {
    /// Returns true if the external program never ran.
    #[must_use]
    pub fn is_launch_error(&self) -> bool {
        matches!(self, Self::Launch { .. })
    }

    /// Returns true if the program ran but broke the exit-code contract.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::UnrecognizedExit(_) | Self::Terminated)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Launch { .. } => "install dunst (dunstify) or choose the console backend",
            Self::UnrecognizedExit(_) | Self::Terminated => {
                "check that the notification daemon is running"
            }
            Self::LaunchTimeout(_) | Self::Wait(_) | Self::Output(_) => {
                "the notification daemon is unresponsive; try restarting it"
            }
            Self::Task(_) => "retry the send",
        }
    }
}
