//! Bundled SVG icon directory.
//!
//! Icons are looked up through a symbolic-name mapping first and then as
//! `<name>.svg` directly.

use std::path::{Path, PathBuf};

use super::error::IconError;

/// Symbolic name to file name.
const MAPPING: &[(&str, &str)] = &[
    ("info", "info.svg"),
    ("warning", "warning.svg"),
    ("error", "error.svg"),
    ("success", "check_circle.svg"),
    ("question", "help.svg"),
    ("alert", "warning.svg"),
    ("ok", "check_circle.svg"),
    ("valid", "check.svg"),
    ("invalid", "close.svg"),
    ("save", "save.svg"),
    ("load", "download.svg"),
    ("open", "folder_open.svg"),
    ("close", "close.svg"),
    ("edit", "edit.svg"),
    ("delete", "delete.svg"),
    ("add", "add.svg"),
    ("remove", "remove.svg"),
    ("mic", "mic.svg"),
    ("microphone", "mic.svg"),
    ("camera", "camera_alt.svg"),
    ("speaker", "volume_up.svg"),
    ("headphones", "headphones.svg"),
    ("keyboard", "keyboard.svg"),
    ("mouse", "mouse.svg"),
    ("monitor", "desktop_windows.svg"),
    ("printer", "print.svg"),
    ("audio", "audiotrack.svg"),
    ("video", "videocam.svg"),
    ("image", "image.svg"),
    ("document", "description.svg"),
    ("folder", "folder.svg"),
    ("file", "insert_drive_file.svg"),
    ("music", "music_note.svg"),
    ("movie", "movie.svg"),
    ("network", "wifi.svg"),
    ("internet", "language.svg"),
    ("email", "email.svg"),
    ("download", "download.svg"),
    ("upload", "upload.svg"),
    ("sync", "sync.svg"),
    ("settings", "settings.svg"),
    ("config", "settings.svg"),
    ("preferences", "tune.svg"),
    ("user", "person.svg"),
    ("group", "group.svg"),
    ("security", "security.svg"),
    ("lock", "lock.svg"),
    ("unlock", "lock_open.svg"),
    ("key", "vpn_key.svg"),
    ("terminal", "terminal.svg"),
    ("calculator", "calculate.svg"),
    ("calendar", "calendar_today.svg"),
    ("clock", "schedule.svg"),
    ("search", "search.svg"),
    ("notification", "notifications.svg"),
    ("home", "home.svg"),
    ("work", "work.svg"),
    ("running", "play_arrow.svg"),
    ("stopped", "stop.svg"),
    ("paused", "pause.svg"),
    ("waiting", "hourglass_empty.svg"),
    ("complete", "done.svg"),
    ("failed", "error_outline.svg"),
];

/// A directory of bundled SVG icons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledIcons {
    dir: PathBuf,
}

impl BundledIcons {
    /// Creates a bundled set rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a bundled set at the default data directory.
    #[must_use]
    pub fn at_default_dir() -> Self {
        Self::new(default_dir())
    }

    /// Returns the icon directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns true if the directory exists and holds at least one SVG.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.svg_files().map(|files| !files.is_empty()).unwrap_or(false)
    }

    /// Resolves a name to an existing SVG file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be inspected.
    pub fn lookup(&self, name: &str) -> Result<Option<PathBuf>, IconError> {
        if !self.dir.is_dir() {
            return Ok(None);
        }

        if let Some((_, file)) = MAPPING.iter().find(|(n, _)| *n == name) {
            let path = self.dir.join(file);
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        let direct = self.dir.join(format!("{}.svg", name));
        if direct.is_file() {
            return Ok(Some(direct));
        }

        Ok(None)
    }

    /// Lists mapped names whose files exist plus every other SVG stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list_icons(&self) -> Result<Vec<String>, IconError> {
        let files = self.svg_files()?;
        let mut names: Vec<String> = MAPPING
            .iter()
            .filter(|(_, file)| files.iter().any(|f| f == file))
            .map(|(name, _)| name.to_string())
            .collect();

        for file in &files {
            if let Some(stem) = file.strip_suffix(".svg") {
                if !names.iter().any(|n| n == stem) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn svg_files(&self) -> Result<Vec<String>, IconError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(IconError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        Ok(entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".svg"))
            .collect())
    }
}

/// Returns `<data_dir>/desktop-notify/icons/material`.
#[must_use]
pub fn default_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/usr/share"))
        .join("desktop-notify")
        .join("icons")
        .join("material")
}
