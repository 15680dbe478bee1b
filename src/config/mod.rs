//! Settings for the notifier.
//!
//! [`Settings`] is the strongly typed, read-only configuration consumed when
//! a [`Notifier`](crate::Notifier) is built. It is produced by merging TOML
//! files and environment variables:
//!
//! 1. `/etc/desktop-notify/config.toml`
//! 2. `<config_dir>/desktop-notify/config.toml`
//! 3. `./desktop-notify.toml`
//! 4. `DESKTOP_NOTIFY_*` environment variables
//!
//! Later sources win. Every field has a default, so an empty or missing
//! file yields [`Settings::default`].
//!
//! # Example
//!
//! ```
//! use desktop_notify::config::Settings;
//!
//! let settings = Settings::from_toml_str(
//!     r#"
//!     backend = "console"
//!     [icons]
//!     all_or_nothing = false
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(settings.backend, "console");
//! assert!(!settings.icons.all_or_nothing);
//! assert_eq!(settings.timeout_ms, 3000);
//! ```

pub mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::error::ConfigError;

use crate::types::Urgency;

/// Directory name used under system and user config directories.
const APP_DIR_NAME: &str = "desktop-notify";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "DESKTOP_NOTIFY_";

fn default_auto() -> String {
    "auto".to_string()
}

fn default_timeout_ms() -> u32 {
    3000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_required_icons() -> Vec<String> {
    ["info", "warning", "error", "success", "question"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

fn default_system_size() -> u32 {
    48
}

fn default_dunst_command() -> String {
    "dunstify".to_string()
}

fn default_max_timeout_ms() -> u32 {
    60_000
}

fn default_dunst_priority() -> i32 {
    90
}

// ============================================================================
// Settings
// ============================================================================

/// Resolved notifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend name or `"auto"`.
    #[serde(default = "default_auto")]
    pub backend: String,

    /// Icon set name or `"auto"`.
    #[serde(default = "default_auto")]
    pub icon_set: String,

    /// Timeout used when a request does not set one.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u32,

    /// Urgency used when a request does not set one.
    #[serde(default)]
    pub urgency: Urgency,

    /// Default tracing filter for the binary.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log every icon resolution at info level.
    #[serde(default)]
    pub log_icon_resolution: bool,

    /// Icon resolution settings.
    #[serde(default)]
    pub icons: IconSettings,

    /// Backend-specific settings.
    #[serde(default)]
    pub backends: BackendSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: default_auto(),
            icon_set: default_auto(),
            timeout_ms: default_timeout_ms(),
            urgency: Urgency::default(),
            log_level: default_log_level(),
            log_icon_resolution: false,
            icons: IconSettings::default(),
            backends: BackendSettings::default(),
        }
    }
}

/// Icon resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSettings {
    /// Reject an icon set unless every required icon resolves in it.
    #[serde(default = "default_true")]
    pub all_or_nothing: bool,

    /// Names an icon set must provide to pass validation.
    #[serde(default = "default_required_icons")]
    pub required: Vec<String>,

    /// Lifetime of cached resolutions.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Fall back to other icon sets when the active one lacks a name.
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,

    /// Icon theme for the system set; auto-detected when unset.
    #[serde(default)]
    pub system_theme: Option<String>,

    /// Preferred pixel size for themed icons.
    #[serde(default = "default_system_size")]
    pub system_size: u32,

    /// Try `scalable/` before sized directories.
    #[serde(default)]
    pub prefer_scalable: bool,

    /// Directory of bundled SVG icons.
    #[serde(default)]
    pub bundled_dir: Option<PathBuf>,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            all_or_nothing: true,
            required: default_required_icons(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            fallback_enabled: true,
            system_theme: None,
            system_size: default_system_size(),
            prefer_scalable: false,
            bundled_dir: None,
        }
    }
}

/// Per-backend settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Notification daemon CLI backend.
    #[serde(default)]
    pub dunst: DaemonSettings,

    /// Terminal fallback backend.
    #[serde(default)]
    pub console: TerminalSettings,
}

/// Settings for the notification daemon CLI backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonSettings {
    /// Program to execute.
    #[serde(default = "default_dunst_command")]
    pub command: String,

    /// Arguments placed before the notification arguments.
    #[serde(default)]
    pub args: Vec<String>,

    /// Upper bound for `-t`.
    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u32,

    /// Selection priority.
    #[serde(default = "default_dunst_priority")]
    pub priority: i32,

    /// Whether the daemon renders body markup.
    #[serde(default = "default_true")]
    pub supports_markup: bool,

    /// `category` hint.
    #[serde(default)]
    pub category: Option<String>,

    /// `desktop-entry` hint.
    #[serde(default)]
    pub desktop_entry: Option<String>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            command: default_dunst_command(),
            args: Vec::new(),
            max_timeout_ms: default_max_timeout_ms(),
            priority: default_dunst_priority(),
            supports_markup: true,
            category: None,
            desktop_entry: None,
        }
    }
}

/// Output stream of the terminal backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStream {
    /// Standard error (keeps script output clean)
    #[default]
    Stderr,
    /// Standard output
    Stdout,
}

/// Settings for the terminal fallback backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// Color lines by urgency.
    #[serde(default = "default_true")]
    pub use_colors: bool,

    /// Prefix lines with `[HH:MM:SS]`.
    #[serde(default = "default_true")]
    pub timestamp: bool,

    /// Where to write.
    #[serde(default)]
    pub stream: TerminalStream,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            use_colors: true,
            timestamp: true,
            stream: TerminalStream::default(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl Settings {
    /// Loads settings from the default files and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be read or parsed, or if an
    /// environment override has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Self::load_from(&default_config_paths())?;
        settings.apply_env_overrides(std::env::vars())?;
        Ok(settings)
    }

    /// Loads and merges the given files in order. Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be read or parsed.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();

        for path in paths {
            if !path.exists() {
                continue;
            }
            let table = read_table(path)?;
            debug!("Loaded config file {}", path.display());
            merge_tables(&mut merged, table);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                path: paths.last().cloned().unwrap_or_default(),
                message: e.to_string(),
            })
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid settings TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })
    }

    /// Applies `DESKTOP_NOTIFY_*` overrides from the given variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable does not parse.
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "BACKEND" => self.backend = value,
                "ICON_SET" => self.icon_set = value,
                "URGENCY" => self.urgency = Urgency::parse_lenient(&value),
                "LOG_LEVEL" => self.log_level = value,
                "TIMEOUT" => {
                    self.timeout_ms = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                        variable: key.clone(),
                        value: value.clone(),
                    })?;
                }
                "ALL_OR_NOTHING" => {
                    self.icons.all_or_nothing =
                        parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnv {
                            variable: key.clone(),
                            value: value.clone(),
                        })?;
                }
                _ => continue,
            }
            debug!("Applied environment override {}", key);
        }
        Ok(())
    }

    /// Returns the explicit backend preference, if not `"auto"`.
    pub fn backend_preference(&self) -> Option<&str> {
        non_auto(&self.backend)
    }

    /// Returns the explicit icon set preference, if not `"auto"`.
    pub fn icon_set_preference(&self) -> Option<&str> {
        non_auto(&self.icon_set)
    }
}

/// Returns the configuration files consulted by [`Settings::load`].
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc")
        .join(APP_DIR_NAME)
        .join("config.toml")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR_NAME).join("config.toml"));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(format!("{}.toml", APP_DIR_NAME)));
    }

    paths
}

fn non_auto(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(toml::Table::new());
    }

    content.parse::<toml::Table>().map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Recursively merges `overlay` into `base`; nested tables merge, other values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
