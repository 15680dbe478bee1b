//! Desktop Notify Library
//!
//! This library sends desktop notifications through interchangeable
//! backends and resolves icon names consistently. It includes:
//! - Icon resolution engine with all-or-nothing icon set validation and caching
//! - Notification backends: dunstify (interactive) and a terminal fallback
//! - Backend registry with priority-based discovery and runtime switching
//! - Notifier that ties resolution, selection and delivery together
//! - Layered TOML configuration with environment overrides
//! - CLI command parsing and display utilities

pub mod backends;
pub mod cli;
pub mod config;
pub mod icons;
pub mod notifier;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ActionOutcome, Capability, IconOverride, IconRequest, NotificationRequest, SendOutcome,
    Urgency, DEFAULT_ACTION_KEY,
};

// Re-export configuration types
pub use config::{ConfigError, Settings};

// Re-export icon types
pub use icons::{IconEngine, IconError, IconSet, IconSetDescriptor, ResolvedIcon, SourceKind};

// Re-export backend types
pub use backends::{
    BackendDescriptor, BackendRegistry, CancelToken, DaemonBackend, DispatchError, MockBackend,
    NotificationBackend, TerminalBackend,
};

// Re-export notifier types
pub use notifier::{global, send_notification, Notifier, SendReport, Timings};
