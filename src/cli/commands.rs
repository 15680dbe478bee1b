//! Command definitions for the desktop-notify CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{IconRequest, NotificationRequest, Urgency};

// ============================================================================
// CLI Structure
// ============================================================================

/// Desktop notifications with consistent icons
#[derive(Parser, Debug)]
#[command(
    name = "desktop-notify",
    version,
    about = "Send desktop notifications through dunst or the terminal",
    long_about = "Sends desktop notifications through the best available backend \
                  (dunstify, falling back to the terminal) and resolves icon names \
                  against system, bundled and glyph icon sets.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read settings from this file instead of the default locations
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Send a notification
    Send(SendArgs),

    /// Show the selected backend and active icon set
    Check,

    /// List notification backends
    Backends,

    /// List icon sets
    IconSets {
        /// Show up to N icons of each available set
        #[arg(long, value_name = "N")]
        preview: Option<usize>,
    },

    /// Resolve an icon name and show where it came from
    Resolve(ResolveArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Send Command Arguments
// ============================================================================

/// Arguments for the send command
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Notification title
    #[arg(value_parser = validate_title)]
    pub title: String,

    /// Notification body
    #[arg(default_value = "")]
    pub message: String,

    /// Symbolic icon name
    #[arg(short, long, default_value = "info")]
    pub icon: String,

    /// Use this icon file instead of resolving the name
    #[arg(long, value_name = "PATH", conflicts_with = "glyph")]
    pub icon_path: Option<PathBuf>,

    /// Use this glyph instead of resolving the name
    #[arg(long)]
    pub glyph: Option<String>,

    /// Urgency level
    #[arg(short, long, value_enum)]
    pub urgency: Option<Urgency>,

    /// Expiration in milliseconds (0 = persistent)
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u32>,

    /// Actions as key:Label, comma separated; waits for the user's choice
    #[arg(
        short,
        long = "actions",
        value_name = "KEY:LABEL",
        value_delimiter = ',',
        value_parser = parse_action
    )]
    pub actions: Vec<(String, String)>,

    /// Replace the visible notification with this identifier
    #[arg(short = 'n', long = "id", value_name = "ID")]
    pub notification_id: Option<String>,

    /// Backend to use instead of automatic selection
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Icon set to activate for this send
    #[arg(long, value_name = "SET")]
    pub icon_set: Option<String>,

    /// Print the send report as JSON
    #[arg(long)]
    pub json: bool,
}

impl SendArgs {
    /// Builds the notification request.
    #[must_use]
    pub fn to_request(&self) -> NotificationRequest {
        let mut icon = IconRequest::named(self.icon.as_str());
        if let Some(path) = &self.icon_path {
            icon = icon.with_path(path.clone());
        }
        if let Some(glyph) = &self.glyph {
            icon = icon.with_glyph(glyph.as_str());
        }

        let mut request = NotificationRequest::new(icon, self.title.as_str(), self.message.as_str())
            .with_actions(self.actions.iter().cloned());
        if let Some(urgency) = self.urgency {
            request = request.with_urgency(urgency);
        }
        if let Some(timeout) = self.timeout {
            request = request.with_timeout_ms(timeout);
        }
        if let Some(id) = &self.notification_id {
            request = request.with_notification_id(id.as_str());
        }
        request
    }
}

// ============================================================================
// Resolve Command Arguments
// ============================================================================

/// Arguments for the resolve command
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Symbolic icon name
    pub name: String,

    /// Resolve against this set instead of the active one
    #[arg(long, value_name = "SET")]
    pub icon_set: Option<String>,

    /// Do not fall back to other icon sets
    #[arg(long)]
    pub no_fallback: bool,

    /// Print the resolution as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

fn validate_title(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Title must not be empty".to_string());
    }
    Ok(s.to_string())
}

/// Parses `key:Label`. A bare `key` uses the key as its label.
fn parse_action(s: &str) -> Result<(String, String), String> {
    let (key, label) = match s.split_once(':') {
        Some((key, label)) => (key.trim(), label.trim()),
        None => (s.trim(), s.trim()),
    };
    if key.is_empty() {
        return Err(format!("Action '{}' has an empty key", s));
    }
    let label = if label.is_empty() { key } else { label };
    Ok((key.to_string(), label.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
