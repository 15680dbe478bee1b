//! Terminal fallback backend.
//!
//! Always available. Renders a notification as a short colored block:
//!
//! ```text
//! [14:03:22] [ALERT] 🚨 Disk almost full (ID: disk)
//!     Only 2% left on /home
//!     ────────────────────────
//! ```
//!
//! Actions are listed but cannot be answered, so sends always report
//! `Delivered`.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use tracing::warn;

use super::cancel::CancelToken;
use super::NotificationBackend;
use crate::config::{TerminalSettings, TerminalStream};
use crate::icons::ResolvedIcon;
use crate::types::{Capability, NotificationRequest, SendOutcome, Urgency};

/// Name of the terminal backend.
pub const CONSOLE_BACKEND: &str = "console";

const CONSOLE_PRIORITY: i32 = 1;
const SEPARATOR_MAX: usize = 50;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const BLUE: &str = "\x1b[34m";
const RED_BOLD: &str = "\x1b[31m\x1b[1m";

/// In-memory output sink, shared between the backend and its reader.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn append(&self, text: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(text.as_bytes());
    }
}

#[derive(Debug, Clone)]
enum Sink {
    Stream(TerminalStream),
    Buffer(SharedBuffer),
}

/// Backend that prints notifications to the terminal.
#[derive(Debug, Clone)]
pub struct TerminalBackend {
    settings: TerminalSettings,
    sink: Sink,
}

impl TerminalBackend {
    /// Creates a backend writing to the configured stream.
    #[must_use]
    pub fn new(settings: TerminalSettings) -> Self {
        let sink = Sink::Stream(settings.stream);
        Self { settings, sink }
    }

    /// Creates a backend writing into `buffer` instead of a stream.
    #[must_use]
    pub fn with_buffer(settings: TerminalSettings, buffer: SharedBuffer) -> Self {
        Self {
            settings,
            sink: Sink::Buffer(buffer),
        }
    }

    /// Renders a notification block, timestamp included when enabled.
    #[must_use]
    pub fn render(&self, request: &NotificationRequest, icon: &ResolvedIcon) -> String {
        let timestamp = self
            .settings
            .timestamp
            .then(|| Local::now().format("%H:%M:%S").to_string());
        format_block(request, icon, timestamp.as_deref(), self.settings.use_colors)
    }

    fn write(&self, text: &str) -> io::Result<()> {
        match &self.sink {
            Sink::Buffer(buffer) => {
                buffer.append(text);
                Ok(())
            }
            Sink::Stream(TerminalStream::Stderr) => {
                let mut err = io::stderr().lock();
                err.write_all(text.as_bytes())?;
                err.flush()
            }
            Sink::Stream(TerminalStream::Stdout) => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
        }
    }
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self::new(TerminalSettings::default())
    }
}

impl NotificationBackend for TerminalBackend {
    fn name(&self) -> &str {
        CONSOLE_BACKEND
    }

    fn priority(&self) -> i32 {
        CONSOLE_PRIORITY
    }

    fn capabilities(&self) -> BTreeSet<Capability> {
        [Capability::Urgency, Capability::Icons].into_iter().collect()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn send(
        &self,
        request: &NotificationRequest,
        icon: &ResolvedIcon,
        _cancel: &CancelToken,
    ) -> SendOutcome {
        // A closed terminal still counts as delivered.
        if let Err(e) = self.write(&self.render(request, icon)) {
            warn!("Failed to write notification to terminal: {}", e);
        }
        SendOutcome::Delivered
    }
}

fn urgency_style(urgency: Urgency) -> (&'static str, &'static str) {
    match urgency {
        Urgency::Low => (DIM, "[INFO]"),
        Urgency::Normal => (BLUE, "[NOTIFY]"),
        Urgency::Critical => (RED_BOLD, "[ALERT]"),
    }
}

fn format_block(
    request: &NotificationRequest,
    icon: &ResolvedIcon,
    timestamp: Option<&str>,
    colors: bool,
) -> String {
    let (color, tag) = urgency_style(request.urgency.unwrap_or_default());
    let (color, bold, reset) = if colors {
        (color, BOLD, RESET)
    } else {
        ("", "", "")
    };

    let mut out = String::new();
    if let Some(ts) = timestamp {
        out.push_str(&format!("[{}] ", ts));
    }
    out.push_str(&format!(
        "{}{} {} {}{}{}",
        color,
        tag,
        icon.display_glyph(),
        bold,
        request.title,
        reset
    ));
    if let Some(id) = &request.notification_id {
        out.push_str(&format!(" (ID: {})", id));
    }
    out.push('\n');

    if !request.message.is_empty() {
        out.push_str(&format!("    {}\n", request.message));
    }

    if request.has_actions() {
        out.push_str("    Available actions:\n");
        for (key, label) in &request.actions {
            out.push_str(&format!("      - {} ({})\n", label, key));
        }
        out.push_str("    Note: Console backend does not support interactive actions\n");
    }

    let width = request.message.chars().count().min(SEPARATOR_MAX);
    if width > 0 {
        out.push_str(&format!("    {}\n", "─".repeat(width)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::SourceKind;
    use std::time::Duration;

    fn glyph(name: &str, glyph: &str) -> ResolvedIcon {
        ResolvedIcon::unresolved(name, vec!["minimal".into()], Duration::ZERO).with_reference(
            SourceKind::Glyph,
            Some("minimal"),
            glyph,
            false,
        )
    }

    fn plain() -> TerminalSettings {
        TerminalSettings {
            use_colors: false,
            timestamp: false,
            stream: TerminalStream::Stderr,
        }
    }

    #[test]
    fn test_plain_block() {
        let request = NotificationRequest::new("info", "Build done", "All green")
            .with_urgency(Urgency::Low)
            .with_notification_id("build");

        let text = format_block(&request, &glyph("info", "ℹ️"), None, false);
        assert_eq!(
            text,
            "[INFO] ℹ️ Build done (ID: build)\n    All green\n    ─────────\n"
        );
    }

    #[test]
    fn test_urgency_tags_and_colors() {
        let request = NotificationRequest::new("error", "Disk", "Full").with_urgency(Urgency::Critical);
        let text = format_block(&request, &glyph("error", "❌"), Some("10:00:00"), true);
        assert!(text.starts_with("[10:00:00] \x1b[31m\x1b[1m[ALERT] ❌ \x1b[1mDisk\x1b[0m"));

        let normal = NotificationRequest::new("info", "T", "M");
        let text = format_block(&normal, &glyph("info", "ℹ️"), None, true);
        assert!(text.starts_with("\x1b[34m[NOTIFY]"));
    }

    #[test]
    fn test_actions_are_listed() {
        let request = NotificationRequest::new("question", "Deploy?", "Ship it")
            .with_actions([("default", "Deploy"), ("later", "Later")]);
        let text = format_block(&request, &glyph("question", "❓"), None, false);

        assert!(text.contains("    Available actions:\n"));
        assert!(text.contains("      - Deploy (default)\n"));
        assert!(text.contains("      - Later (later)\n"));
        assert!(text.contains("does not support interactive actions"));
    }

    #[test]
    fn test_separator_is_capped() {
        let request = NotificationRequest::new("info", "T", "x".repeat(200));
        let text = format_block(&request, &glyph("info", "ℹ️"), None, false);
        let separator = text.lines().last().unwrap().trim();
        assert_eq!(separator.chars().count(), SEPARATOR_MAX);
    }

    #[test]
    fn test_unresolved_icon_uses_name_glyph() {
        let request = NotificationRequest::new("warning", "T", "");
        let icon = ResolvedIcon::unresolved("warning", Vec::new(), Duration::ZERO);
        let text = format_block(&request, &icon, None, false);
        assert!(text.starts_with(&format!("[NOTIFY] {} T", icon.display_glyph())));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_send_writes_to_buffer_and_delivers() {
        let buffer = SharedBuffer::new();
        let backend = TerminalBackend::with_buffer(plain(), buffer.clone());
        let request = NotificationRequest::new("info", "Hello", "World").with_action("ok", "OK");

        let outcome = backend.send(&request, &glyph("info", "ℹ️"), &CancelToken::new());
        assert_eq!(outcome, SendOutcome::Delivered);
        assert!(buffer.contents().contains("Hello"));
        assert!(buffer.contents().contains("- OK (ok)"));
    }

    #[test]
    fn test_timestamp_prefix() {
        let backend = TerminalBackend::with_buffer(
            TerminalSettings {
                use_colors: false,
                timestamp: true,
                stream: TerminalStream::Stderr,
            },
            SharedBuffer::new(),
        );
        let text = backend.render(&NotificationRequest::new("info", "T", "M"), &glyph("info", "ℹ️"));
        let bytes = text.as_bytes();
        assert_eq!(bytes[0], b'[');
        assert_eq!(bytes[9], b']');
        assert_eq!(bytes[3], b':');
    }

    #[test]
    fn test_descriptor() {
        let backend = TerminalBackend::default();
        assert_eq!(backend.name(), CONSOLE_BACKEND);
        assert_eq!(backend.priority(), 1);
        assert!(backend.is_available());
        assert!(!backend.supports(Capability::Actions));
    }
}
