//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML or has wrong value types.
    #[error("failed to parse config file {path}: {message}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// An environment variable holds a value of the wrong type.
    #[error("invalid value '{value}' for {variable}")]
    InvalidEnv {
        /// Variable name
        variable: String,
        /// Offending value
        value: String,
    },
}

impl ConfigError {
    /// Returns true if the error comes from a file on disk.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Read { .. } => "check the file permissions of the config file",
            Self::Parse { .. } => "fix the TOML syntax or remove the offending key",
            Self::InvalidEnv { .. } => "unset the variable or give it a valid value",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::Parse {
            path: PathBuf::from("/tmp/config.toml"),
            message: "expected a table".to_string(),
        };
        assert!(err.to_string().contains("/tmp/config.toml"));
        assert!(err.to_string().contains("expected a table"));

        let err = ConfigError::InvalidEnv {
            variable: "DESKTOP_NOTIFY_TIMEOUT".to_string(),
            value: "soon".to_string(),
        };
        assert!(err.to_string().contains("DESKTOP_NOTIFY_TIMEOUT"));
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_is_file_error() {
        let err = ConfigError::Read {
            path: PathBuf::from("x"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_file_error());
        assert!(!ConfigError::InvalidEnv {
            variable: "X".into(),
            value: "y".into()
        }
        .is_file_error());
    }

    #[test]
    fn test_suggestion() {
        let err = ConfigError::Parse {
            path: PathBuf::from("x"),
            message: "m".into(),
        };
        assert!(err.suggestion().contains("TOML"));
    }
}
