//! Notification daemon backend (`dunstify`).
//!
//! Builds one `dunstify` invocation per notification and runs it through
//! the protocol state machine in [`protocol`](super::protocol):
//!
//! - `-r <id>` replaces a visible notification with the same identifier
//! - `-A key,label` per action; the process then blocks until the user
//!   picks one, the notification expires, or it is dismissed
//! - Title and message are always the last two arguments, after `--`
//!
//! Both output pipes are drained on reader threads while the process runs,
//! so a chatty daemon never blocks on a full pipe.

use std::collections::BTreeSet;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use super::cancel::CancelToken;
use super::error::DispatchError;
use super::protocol::{wait_for_exit, DispatchEvent, DispatchMachine, WaitResult};
use super::NotificationBackend;
use crate::config::DaemonSettings;
use crate::icons::{glyph, ResolvedIcon, SourceKind};
use crate::types::{Capability, NotificationRequest, SendOutcome};

/// Name of the daemon backend.
pub const DUNST_BACKEND: &str = "dunst";

/// Upper bound for non-interactive invocations.
const LAUNCH_GUARD: Duration = Duration::from_secs(10);

/// Extra wait past the notification timeout before killing the process.
const RESPONSE_GRACE: Duration = Duration::from_millis(1000);

/// Modulus for hashed replace ids.
const REPLACE_ID_MODULUS: u64 = 1_000_000;

/// Backend that shells out to `dunstify`.
#[derive(Debug, Clone)]
pub struct DaemonBackend {
    settings: DaemonSettings,
}

impl DaemonBackend {
    /// Creates a backend from its settings.
    #[must_use]
    pub fn new(settings: DaemonSettings) -> Self {
        Self { settings }
    }

    /// Returns the backend settings.
    #[must_use]
    pub fn settings(&self) -> &DaemonSettings {
        &self.settings
    }

    /// Builds the notification arguments, after the configured prefix args.
    #[must_use]
    pub fn build_args(&self, request: &NotificationRequest, icon: &ResolvedIcon) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(id) = &request.notification_id {
            args.push("-r".to_string());
            args.push(replace_id(id));
        }

        if let Some(urgency) = request.urgency {
            args.push("-u".to_string());
            args.push(urgency.as_str().to_string());
        }

        if let Some(timeout) = request.timeout_ms {
            args.push("-t".to_string());
            args.push(self.clamp_timeout(timeout).to_string());
        }

        if let Some(icon_arg) = icon_argument(icon) {
            args.push("-i".to_string());
            args.push(icon_arg);
        }

        if let Some(category) = &self.settings.category {
            args.push("-h".to_string());
            args.push(format!("string:category:{}", category));
        }

        if let Some(entry) = &self.settings.desktop_entry {
            args.push("-h".to_string());
            args.push(format!("string:desktop-entry:{}", entry));
        }

        for (key, label) in &request.actions {
            args.push("-A".to_string());
            args.push(format!("{},{}", key, label));
        }

        args.push("--".to_string());
        args.push(request.title.clone());
        args.push(request.message.clone());
        args
    }

    fn clamp_timeout(&self, timeout_ms: u32) -> u32 {
        timeout_ms.min(self.settings.max_timeout_ms)
    }

    /// How long to wait before killing the process, if at all.
    fn wait_bound(&self, request: &NotificationRequest) -> Option<Duration> {
        if !request.has_actions() {
            return Some(LAUNCH_GUARD);
        }
        match request.timeout_ms.map(|t| self.clamp_timeout(t)) {
            Some(0) | None => None,
            Some(ms) => Some(Duration::from_millis(u64::from(ms)) + RESPONSE_GRACE),
        }
    }
}

impl NotificationBackend for DaemonBackend {
    fn name(&self) -> &str {
        DUNST_BACKEND
    }

    fn priority(&self) -> i32 {
        self.settings.priority
    }

    fn capabilities(&self) -> BTreeSet<Capability> {
        let mut caps: BTreeSet<Capability> = [
            Capability::Actions,
            Capability::Urgency,
            Capability::Timeout,
            Capability::Icons,
        ]
        .into_iter()
        .collect();
        if self.settings.supports_markup {
            caps.insert(Capability::Markup);
        }
        caps
    }

    fn is_available(&self) -> bool {
        find_executable(&self.settings.command).is_some()
    }

    fn send(
        &self,
        request: &NotificationRequest,
        icon: &ResolvedIcon,
        cancel: &CancelToken,
    ) -> SendOutcome {
        let args = self.build_args(request, icon);
        let mut machine = DispatchMachine::new(request.has_actions());
        debug!(
            "Running {} {:?} {:?}",
            self.settings.command, self.settings.args, args
        );

        let spawned = Command::new(&self.settings.command)
            .args(&self.settings.args)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => {
                machine.advance(DispatchEvent::Launched);
                child
            }
            Err(e) => {
                error!("Failed to launch {}: {}", self.settings.command, e);
                machine.advance(DispatchEvent::LaunchFailed(DispatchError::Launch {
                    command: self.settings.command.clone(),
                    reason: e.to_string(),
                }));
                return machine.into_outcome();
            }
        };

        let stdout_reader = drain(child.stdout.take());
        let stderr_reader = drain(child.stderr.take());

        let bound = self.wait_bound(request);
        let deadline = bound.map(|b| Instant::now() + b);

        // Readers of a killed process are detached: a grandchild may still hold the pipe.
        let event = match wait_for_exit(&mut child, deadline, cancel) {
            Ok(WaitResult::Exited(status)) => {
                match collect(stderr_reader) {
                    Ok(stderr) if !status.success() && !stderr.trim_ascii().is_empty() => {
                        debug!("Daemon stderr: {}", String::from_utf8_lossy(&stderr).trim());
                    }
                    Ok(_) => {}
                    Err(e) => debug!("Failed to read daemon stderr: {}", e),
                }
                match collect(stdout_reader).and_then(|bytes| {
                    String::from_utf8(bytes).map_err(|e| format!("stdout is not UTF-8: {}", e))
                }) {
                    Ok(stdout) => DispatchEvent::Exited {
                        code: status.code(),
                        stdout,
                    },
                    Err(reason) => DispatchEvent::OutputFailed(DispatchError::Output(reason)),
                }
            }
            Ok(WaitResult::TimedOut) => DispatchEvent::TimedOut {
                after: bound.unwrap_or_default(),
            },
            Ok(WaitResult::Cancelled) => {
                debug!("Send cancelled; daemon process killed");
                DispatchEvent::Cancelled
            }
            Err(e) => DispatchEvent::WaitFailed(e),
        };

        machine.advance(event);
        let outcome = machine.into_outcome();
        if let SendOutcome::Failed { error } = &outcome {
            warn!("Notification '{}' failed: {}", request.title, error);
        }
        outcome
    }
}

/// Reads a child pipe to the end on its own thread.
fn drain<R>(pipe: Option<R>) -> Option<JoinHandle<io::Result<Vec<u8>>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).map(|_| buf)
        })
    })
}

/// Joins a pipe reader and returns what it read.
fn collect(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>, String> {
    match reader {
        None => Ok(Vec::new()),
        Some(handle) => match handle.join() {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err("pipe reader panicked".to_string()),
        },
    }
}

/// Chooses the `-i` argument for a resolved icon.
///
/// Files are passed as paths. Glyphs are dropped because the daemon cannot
/// render them. Unresolved names go through as theme icon names.
fn icon_argument(icon: &ResolvedIcon) -> Option<String> {
    match icon.source_kind {
        SourceKind::System | SourceKind::Bundled | SourceKind::LiteralPath => {
            icon.resolved_reference.clone()
        }
        SourceKind::Glyph => None,
        SourceKind::None => {
            let name = icon.original_name.trim();
            (!name.is_empty() && !glyph::is_literal_glyph(name)).then(|| name.to_string())
        }
    }
}

/// Maps a notification identifier to a `dunstify -r` id.
///
/// Numeric identifiers are used verbatim; anything else is hashed with
/// 64-bit FNV-1a modulo 1 000 000, so the same string always maps to the
/// same id across processes.
///
/// ```
/// use desktop_notify::backends::replace_id;
///
/// assert_eq!(replace_id("4242"), "4242");
/// assert_eq!(replace_id("build-status"), replace_id("build-status"));
/// ```
#[must_use]
pub fn replace_id(notification_id: &str) -> String {
    let trimmed = notification_id.trim();
    if let Ok(numeric) = trimmed.parse::<u32>() {
        return numeric.to_string();
    }

    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
    let hash = notification_id
        .bytes()
        .fold(FNV_OFFSET, |acc, byte| (acc ^ u64::from(byte)).wrapping_mul(FNV_PRIME));
    (hash % REPLACE_ID_MODULUS).to_string()
}

/// Locates a program the way a shell would.
///
/// Commands containing a `/` are checked directly; others are searched on `PATH`.
#[must_use]
pub fn find_executable(command: &str) -> Option<PathBuf> {
    which::which(command).ok()
}
