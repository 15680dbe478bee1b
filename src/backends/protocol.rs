//! Interactive notification protocol.
//!
//! Models one daemon invocation as a state machine:
//!
//! ```text
//! Dispatching ──launched──▶ AwaitingResponse ──exit 0──────▶ Resolved(Selected(key) | Delivered)
//!      │                          │            ──exit 1 / 2──▶ Resolved(NoResponse)
//!      │                          │            ──timeout──────▶ Resolved(NoResponse)   (interactive)
//!      │                          │            ──cancel───────▶ Resolved(NoResponse)
//!      └──launch failed──▶ Failed ◀──other exit / signal / timeout (non-interactive)
//!                                 ▲
//!                                 └──output unreadable
//! ```
//!
//! Exit code 1 (expired) and 2 (dismissed) are deliberately not told apart.

use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};

use crossbeam_channel::select;
use tracing::debug;

use super::cancel::CancelToken;
use super::error::DispatchError;
use crate::types::SendOutcome;

/// Exit code: action selected or notification shown.
pub const EXIT_OK: i32 = 0;
/// Exit code: notification expired.
pub const EXIT_TIMEOUT: i32 = 1;
/// Exit code: notification dismissed.
pub const EXIT_DISMISSED: i32 = 2;

/// Interval between `try_wait` polls while waiting on the daemon.
pub const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// State of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    /// Building and launching the invocation
    Dispatching,
    /// The daemon process is running
    AwaitingResponse,
    /// Finished with a normalized outcome
    Resolved(SendOutcome),
    /// Finished with an error
    Failed(DispatchError),
}

impl DispatchState {
    /// Returns true for `Resolved` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed(_))
    }
}

/// Something that happened to the daemon process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// The process started
    Launched,
    /// The process could not be started
    LaunchFailed(DispatchError),
    /// The process exited; `code` is `None` when killed by a signal
    Exited {
        /// Exit code
        code: Option<i32>,
        /// Captured standard output
        stdout: String,
    },
    /// The wait bound elapsed and the process was killed
    TimedOut {
        /// The bound that elapsed
        after: Duration,
    },
    /// The caller cancelled and the process was killed
    Cancelled,
    /// Waiting on the process failed
    WaitFailed(DispatchError),
    /// The process exited but its output could not be read
    OutputFailed(DispatchError),
}

/// Drives a [`DispatchState`] through [`DispatchEvent`]s.
#[derive(Debug, Clone)]
pub struct DispatchMachine {
    interactive: bool,
    state: DispatchState,
}

impl DispatchMachine {
    /// Starts in `Dispatching`. `interactive` is true when the request has actions.
    #[must_use]
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            state: DispatchState::Dispatching,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Applies an event. Events that do not fit the current state are ignored.
    pub fn advance(&mut self, event: DispatchEvent) -> &DispatchState {
        let next = match (&self.state, event) {
            (DispatchState::Dispatching, DispatchEvent::Launched) => {
                Some(DispatchState::AwaitingResponse)
            }
            (DispatchState::Dispatching, DispatchEvent::LaunchFailed(e)) => {
                Some(DispatchState::Failed(e))
            }
            (DispatchState::AwaitingResponse, DispatchEvent::Exited { code, stdout }) => {
                Some(match interpret_exit(self.interactive, code, &stdout) {
                    SendOutcome::Failed { error } => DispatchState::Failed(error),
                    outcome => DispatchState::Resolved(outcome),
                })
            }
            (DispatchState::AwaitingResponse, DispatchEvent::TimedOut { after }) => {
                Some(if self.interactive {
                    DispatchState::Resolved(SendOutcome::no_response())
                } else {
                    DispatchState::Failed(DispatchError::LaunchTimeout(after.as_millis() as u64))
                })
            }
            (DispatchState::AwaitingResponse, DispatchEvent::Cancelled) => {
                Some(DispatchState::Resolved(SendOutcome::no_response()))
            }
            (
                DispatchState::AwaitingResponse,
                DispatchEvent::WaitFailed(e) | DispatchEvent::OutputFailed(e),
            ) => Some(DispatchState::Failed(e)),
            (state, event) => {
                debug!("Ignoring {:?} in state {:?}", event, state);
                None
            }
        };

        if let Some(next) = next {
            debug!("Dispatch {:?} -> {:?}", self.state, next);
            self.state = next;
        }
        &self.state
    }

    /// Returns the outcome of a finished dispatch.
    ///
    /// A dispatch that never reached a terminal state counts as failed.
    #[must_use]
    pub fn into_outcome(self) -> SendOutcome {
        match self.state {
            DispatchState::Resolved(outcome) => outcome,
            DispatchState::Failed(error) => SendOutcome::failed(error),
            state => SendOutcome::failed(DispatchError::Wait(format!(
                "dispatch ended in state {:?}",
                state
            ))),
        }
    }
}

/// Maps a daemon exit to an outcome.
///
/// For interactive sends, exit 0 selects the key printed on the first
/// non-empty stdout line; no key at all is treated as no response.
#[must_use]
pub fn interpret_exit(interactive: bool, code: Option<i32>, stdout: &str) -> SendOutcome {
    match (interactive, code) {
        (_, None) => SendOutcome::failed(DispatchError::Terminated),
        (false, Some(EXIT_OK)) => SendOutcome::Delivered,
        (true, Some(EXIT_OK)) => match stdout.lines().map(str::trim).find(|l| !l.is_empty()) {
            Some(key) => SendOutcome::selected(key),
            None => SendOutcome::no_response(),
        },
        (true, Some(EXIT_TIMEOUT | EXIT_DISMISSED)) => SendOutcome::no_response(),
        (_, Some(other)) => SendOutcome::failed(DispatchError::UnrecognizedExit(other)),
    }
}

/// How a wait on the daemon ended.
#[derive(Debug)]
pub enum WaitResult {
    /// The process exited on its own
    Exited(ExitStatus),
    /// The deadline passed; the process was killed
    TimedOut,
    /// The token was cancelled; the process was killed
    Cancelled,
}

/// Polls `child` until it exits, `deadline` passes, or `cancel` fires.
///
/// # Errors
///
/// Returns an error if the process status cannot be queried.
pub fn wait_for_exit(
    child: &mut Child,
    deadline: Option<Instant>,
    cancel: &CancelToken,
) -> Result<WaitResult, DispatchError> {
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|e| DispatchError::Wait(e.to_string()))?
        {
            return Ok(WaitResult::Exited(status));
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            terminate(child);
            return Ok(WaitResult::TimedOut);
        }

        select! {
            recv(cancel.receiver()) -> _ => {
                terminate(child);
                return Ok(WaitResult::Cancelled);
            }
            default(POLL_INTERVAL) => {}
        }
    }
}

fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Failed to kill daemon process {}: {}", child.id(), e);
    }
    let _ = child.wait();
}
