//! Icon resolution error types.
//!
//! Provider errors stay inside the engine: `resolve` treats them as
//! "not found". Only set management operations report them.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in icon set management and lookup.
#[derive(Debug, Error)]
pub enum IconError {
    /// No icon set is registered under this name.
    #[error("unknown icon set: {0}")]
    UnknownSet(String),

    /// The icon set exists but cannot be used on this system.
    #[error("icon set '{0}' is not available")]
    Unavailable(String),

    /// The icon set lacks required icons while all-or-nothing mode is on.
    #[error("icon set '{set}' is missing required icons: {}", join(.missing))]
    Incomplete {
        /// Rejected set
        set: String,
        /// Required names that did not resolve
        missing: BTreeSet<String>,
    },

    /// A theme or icon directory could not be read.
    #[error("failed to read icon directory {path}: {source}")]
    Io {
        /// Directory that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

impl IconError {
    /// Returns true if the error rejects an icon set during activation.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Incomplete { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::UnknownSet(_) => "run 'desktop-notify icon-sets' to list icon sets",
            Self::Unavailable(_) => "install the icon theme or choose another icon set",
            Self::Incomplete { .. } => "disable icons.all_or_nothing or choose another icon set",
            Self::Io { .. } => "check the permissions of the icon directories",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IconError::Incomplete {
            set: "material".to_string(),
            missing: ["question", "error"].iter().map(|s| s.to_string()).collect(),
        };
        let text = err.to_string();
        assert!(text.contains("material"));
        assert!(text.contains("error, question"));

        assert!(IconError::UnknownSet("nope".into())
            .to_string()
            .contains("nope"));
    }

    #[test]
    fn test_is_rejection() {
        assert!(IconError::Unavailable("system".into()).is_rejection());
        assert!(IconError::Incomplete {
            set: "x".into(),
            missing: BTreeSet::new()
        }
        .is_rejection());
        assert!(!IconError::UnknownSet("x".into()).is_rejection());
    }

    #[test]
    fn test_suggestion() {
        assert!(IconError::UnknownSet("x".into())
            .suggestion()
            .contains("icon-sets"));
        assert!(IconError::Incomplete {
            set: "x".into(),
            missing: BTreeSet::new()
        }
        .suggestion()
        .contains("all_or_nothing"));
    }
}
