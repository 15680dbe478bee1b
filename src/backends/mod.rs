//! Notification backends.
//!
//! A backend takes a request whose icon is already resolved and delivers
//! it, returning a normalized [`SendOutcome`]. This module provides:
//!
//! - [`DaemonBackend`]: the `dunstify` CLI, interactive-capable
//! - [`TerminalBackend`]: formatted terminal output, always available
//! - [`MockBackend`]: scripted outcomes for tests
//! - [`BackendRegistry`]: discovery, priority ordering and selection
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ BackendRegistry  │ ← select_best() / switch_to(name)
//! └────────┬─────────┘
//!          │ Arc<dyn NotificationBackend>
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │  DaemonBackend   │────▶│ dunstify process │ (protocol.rs)
//! ├──────────────────┤     └──────────────────┘
//! │ TerminalBackend  │────▶ stderr / stdout
//! └──────────────────┘
//! ```

mod cancel;
mod daemon;
mod error;
mod mock;
pub mod protocol;
mod registry;
mod terminal;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use cancel::CancelToken;
pub use daemon::{find_executable, replace_id, DaemonBackend, DUNST_BACKEND};
pub use error::DispatchError;
pub use mock::MockBackend;
pub use registry::BackendRegistry;
pub use terminal::{SharedBuffer, TerminalBackend, CONSOLE_BACKEND};

use crate::icons::ResolvedIcon;
use crate::types::{Capability, NotificationRequest, SendOutcome};

/// Static description of a backend, queried fresh on each discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    /// Backend name
    pub name: String,
    /// Higher wins
    pub priority: i32,
    /// Supported features
    pub capabilities: BTreeSet<Capability>,
    /// Whether the backend can deliver right now
    pub available: bool,
}

/// A notification sink.
///
/// Implementations must never panic or return errors from `send`; every
/// failure becomes [`SendOutcome::Failed`].
pub trait NotificationBackend: Send + Sync {
    /// Returns the backend name.
    fn name(&self) -> &str;

    /// Returns the selection priority; higher wins.
    fn priority(&self) -> i32;

    /// Returns the supported features.
    fn capabilities(&self) -> BTreeSet<Capability>;

    /// Returns true if the backend can deliver right now.
    fn is_available(&self) -> bool;

    /// Delivers one notification.
    ///
    /// Blocks until the outcome is known. `cancel` ends an interactive wait
    /// early with [`ActionOutcome::NoResponse`](crate::ActionOutcome::NoResponse).
    fn send(
        &self,
        request: &NotificationRequest,
        icon: &ResolvedIcon,
        cancel: &CancelToken,
    ) -> SendOutcome;

    /// Returns true if the backend supports a feature.
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Describes the backend, probing availability now.
    fn describe(&self) -> BackendDescriptor {
        BackendDescriptor {
            name: self.name().to_string(),
            priority: self.priority(),
            capabilities: self.capabilities(),
            available: self.is_available(),
        }
    }
}
