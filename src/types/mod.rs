//! Core data types for desktop notifications.
//!
//! This module defines the data structures shared by every layer:
//! - Urgency levels and backend capabilities
//! - Notification and icon requests
//! - Normalized send outcomes

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::backends::DispatchError;

// ============================================================================
// Urgency
// ============================================================================

/// Urgency level of a notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(from = "String", into = "String")]
pub enum Urgency {
    /// Informational, shown dimmed
    Low,
    /// Regular notification
    #[default]
    Normal,
    /// Requires attention, usually persistent
    Critical,
}

impl Urgency {
    /// Returns the string representation used on the daemon command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }

    /// Parses an urgency name, accepting common aliases.
    ///
    /// Unknown values map to [`Urgency::Normal`].
    ///
    /// ```
    /// use desktop_notify::Urgency;
    ///
    /// assert_eq!(Urgency::parse_lenient("ERROR"), Urgency::Critical);
    /// assert_eq!(Urgency::parse_lenient("warning"), Urgency::Normal);
    /// assert_eq!(Urgency::parse_lenient("whatever"), Urgency::Normal);
    /// ```
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Urgency::Low,
            "critical" | "error" | "high" | "urgent" => Urgency::Critical,
            // normal, info, information, warn, warning and anything unknown
            _ => Urgency::Normal,
        }
    }
}

impl From<String> for Urgency {
    fn from(value: String) -> Self {
        Urgency::parse_lenient(&value)
    }
}

impl From<Urgency> for String {
    fn from(value: Urgency) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Capability
// ============================================================================

/// A feature a notification backend may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Interactive actions with a selected key as result
    Actions,
    /// Urgency levels
    Urgency,
    /// Custom expiration timeouts
    Timeout,
    /// Icons
    Icons,
    /// Body markup
    Markup,
}

impl Capability {
    /// Returns the string representation of the capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Actions => "actions",
            Capability::Urgency => "urgency",
            Capability::Timeout => "timeout",
            Capability::Icons => "icons",
            Capability::Markup => "markup",
        }
    }
}

// ============================================================================
// Icon Requests
// ============================================================================

/// Explicit icon given by the caller, bypassing icon sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconOverride {
    /// A file on disk
    Path(PathBuf),
    /// A literal unicode glyph
    Glyph(String),
}

/// The icon part of a notification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRequest {
    /// Symbolic icon name (e.g. "info", "mic")
    pub name: String,
    /// Optional explicit path or glyph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_with: Option<IconOverride>,
}

impl IconRequest {
    /// Creates a request for a symbolic icon name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            override_with: None,
        }
    }

    /// Uses an explicit file instead of any icon set.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_with = Some(IconOverride::Path(path.into()));
        self
    }

    /// Uses a literal glyph instead of any icon set.
    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.override_with = Some(IconOverride::Glyph(glyph.into()));
        self
    }
}

impl From<&str> for IconRequest {
    fn from(name: &str) -> Self {
        IconRequest::named(name)
    }
}

impl From<String> for IconRequest {
    fn from(name: String) -> Self {
        IconRequest::named(name)
    }
}

// ============================================================================
// NotificationRequest
// ============================================================================

/// Action key that the daemon triggers on the primary click.
pub const DEFAULT_ACTION_KEY: &str = "default";

/// A single notification to send.
///
/// `urgency` and `timeout_ms` left as `None` are filled from the settings
/// by the notifier. A timeout of `Some(0)` means persistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Icon to resolve
    pub icon: IconRequest,
    /// Summary line
    pub title: String,
    /// Body text
    pub message: String,
    /// Identifier used to replace a visible notification in place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    /// Urgency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    /// Expiration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u32>,
    /// Ordered action key/label pairs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<(String, String)>,
}

impl NotificationRequest {
    /// Creates a request with no actions and backend defaults.
    pub fn new(
        icon: impl Into<IconRequest>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            message: message.into(),
            notification_id: None,
            urgency: None,
            timeout_ms: None,
            actions: Vec::new(),
        }
    }

    /// Sets the replacement identifier.
    pub fn with_notification_id(mut self, id: impl Into<String>) -> Self {
        self.notification_id = Some(id.into());
        self
    }

    /// Sets the urgency level.
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    /// Sets the timeout in milliseconds (0 = persistent).
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Adds an action. Re-adding an existing key replaces its label in place.
    pub fn with_action(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        let key = key.into();
        let label = label.into();
        match self.actions.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.actions.push((key, label)),
        }
        self
    }

    /// Adds several actions in order.
    pub fn with_actions<I, K, L>(self, actions: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        actions
            .into_iter()
            .fold(self, |request, (key, label)| request.with_action(key, label))
    }

    /// Returns true if the request expects an action as result.
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Returns true if one of the actions is the `"default"` key.
    pub fn has_default_action(&self) -> bool {
        self.actions.iter().any(|(k, _)| k == DEFAULT_ACTION_KEY)
    }

    /// Returns the label for an action key.
    pub fn action_label(&self, key: &str) -> Option<&str> {
        self.actions
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, label)| label.as_str())
    }

    /// Returns true if the notification should stay until dismissed.
    pub fn is_persistent(&self) -> bool {
        self.timeout_ms == Some(0)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of an interactive notification.
///
/// `NoResponse` covers both the daemon's timeout and dismissal; the two
/// are reported identically by the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The user picked the action with this key
    Selected(String),
    /// Timed out, dismissed, or cancelled
    NoResponse,
}

/// Normalized result of sending one notification through any backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    /// A non-interactive notification was shown
    Delivered,
    /// An interactive notification finished
    Action {
        /// What the user did
        outcome: ActionOutcome,
    },
    /// The backend could not deliver the notification
    Failed {
        /// Why delivery failed
        error: DispatchError,
    },
}

impl SendOutcome {
    /// Shorthand for `SendOutcome::Action { outcome: Selected(key) }`.
    pub fn selected(key: impl Into<String>) -> Self {
        SendOutcome::Action {
            outcome: ActionOutcome::Selected(key.into()),
        }
    }

    /// Shorthand for `SendOutcome::Action { outcome: NoResponse }`.
    pub fn no_response() -> Self {
        SendOutcome::Action {
            outcome: ActionOutcome::NoResponse,
        }
    }

    /// Shorthand for `SendOutcome::Failed { error }`.
    pub fn failed(error: DispatchError) -> Self {
        SendOutcome::Failed { error }
    }

    /// Returns the selected action key, if any.
    pub fn selected_action(&self) -> Option<&str> {
        match self {
            SendOutcome::Action {
                outcome: ActionOutcome::Selected(key),
            } => Some(key),
            _ => None,
        }
    }

    /// Returns the action outcome for interactive sends.
    pub fn action_outcome(&self) -> Option<&ActionOutcome> {
        match self {
            SendOutcome::Action { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Returns true if the backend failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, SendOutcome::Failed { .. })
    }

    /// Boolean view: delivered or an action was selected.
    pub fn as_bool(&self) -> bool {
        match self {
            SendOutcome::Delivered => true,
            SendOutcome::Action { outcome } => matches!(outcome, ActionOutcome::Selected(_)),
            SendOutcome::Failed { .. } => false,
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Delivered => f.write_str("delivered"),
            SendOutcome::Action {
                outcome: ActionOutcome::Selected(key),
            } => f.write_str(key),
            SendOutcome::Action {
                outcome: ActionOutcome::NoResponse,
            } => f.write_str("no response"),
            SendOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Urgency Tests
    // ------------------------------------------------------------------------

    mod urgency_tests {
        use super::*;

        #[test]
        fn test_default_is_normal() {
            assert_eq!(Urgency::default(), Urgency::Normal);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(Urgency::Low.as_str(), "low");
            assert_eq!(Urgency::Normal.as_str(), "normal");
            assert_eq!(Urgency::Critical.as_str(), "critical");
        }

        #[test]
        fn test_aliases() {
            assert_eq!(Urgency::parse_lenient("info"), Urgency::Normal);
            assert_eq!(Urgency::parse_lenient("Information"), Urgency::Normal);
            assert_eq!(Urgency::parse_lenient("warn"), Urgency::Normal);
            assert_eq!(Urgency::parse_lenient("urgent"), Urgency::Critical);
            assert_eq!(Urgency::parse_lenient("high"), Urgency::Critical);
            assert_eq!(Urgency::parse_lenient(" LOW "), Urgency::Low);
        }

        #[test]
        fn test_serde_uses_lowercase_and_aliases() {
            let json = serde_json::to_string(&Urgency::Critical).unwrap();
            assert_eq!(json, "\"critical\"");

            let parsed: Urgency = serde_json::from_str("\"error\"").unwrap();
            assert_eq!(parsed, Urgency::Critical);
        }
    }

    // ------------------------------------------------------------------------
    // NotificationRequest Tests
    // ------------------------------------------------------------------------

    mod request_tests {
        use super::*;

        #[test]
        fn test_new_has_no_actions() {
            let request = NotificationRequest::new("info", "Title", "Body");
            assert_eq!(request.icon.name, "info");
            assert!(!request.has_actions());
            assert!(!request.has_default_action());
            assert!(request.urgency.is_none());
            assert!(request.timeout_ms.is_none());
        }

        #[test]
        fn test_actions_keep_order() {
            let request = NotificationRequest::new("info", "T", "M")
                .with_actions([("yes", "Y"), ("no", "N"), ("later", "L")]);
            let keys: Vec<&str> = request.actions.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(keys, vec!["yes", "no", "later"]);
        }

        #[test]
        fn test_readding_action_replaces_label() {
            let request = NotificationRequest::new("info", "T", "M")
                .with_action("yes", "Y")
                .with_action("no", "N")
                .with_action("yes", "Sure");
            assert_eq!(request.actions.len(), 2);
            assert_eq!(request.actions[0], ("yes".to_string(), "Sure".to_string()));
        }

        #[test]
        fn test_default_action_is_derived() {
            let request = NotificationRequest::new("info", "T", "M").with_action("default", "Accept");
            assert!(request.has_default_action());
            assert_eq!(request.action_label("default"), Some("Accept"));
            assert_eq!(request.action_label("other"), None);
        }

        #[test]
        fn test_persistent_timeout() {
            let request = NotificationRequest::new("info", "T", "M").with_timeout_ms(0);
            assert!(request.is_persistent());
            let request = NotificationRequest::new("info", "T", "M").with_timeout_ms(5000);
            assert!(!request.is_persistent());
        }

        #[test]
        fn test_icon_overrides() {
            let icon = IconRequest::named("mic").with_glyph("🎙");
            assert_eq!(icon.override_with, Some(IconOverride::Glyph("🎙".to_string())));

            let icon = IconRequest::named("mic").with_path("/tmp/mic.svg");
            assert!(matches!(icon.override_with, Some(IconOverride::Path(_))));
        }
    }

    // ------------------------------------------------------------------------
    // Outcome Tests
    // ------------------------------------------------------------------------

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_selected_action() {
            let outcome = SendOutcome::selected("default");
            assert_eq!(outcome.selected_action(), Some("default"));
            assert!(outcome.as_bool());
            assert!(!outcome.is_failed());
        }

        #[test]
        fn test_no_response_is_falsy() {
            let outcome = SendOutcome::no_response();
            assert_eq!(outcome.selected_action(), None);
            assert_eq!(outcome.action_outcome(), Some(&ActionOutcome::NoResponse));
            assert!(!outcome.as_bool());
        }

        #[test]
        fn test_failed() {
            let outcome = SendOutcome::failed(DispatchError::UnrecognizedExit(3));
            assert!(outcome.is_failed());
            assert!(!outcome.as_bool());
            assert!(outcome.to_string().contains('3'));
        }

        #[test]
        fn test_serialize_outcome() {
            let json = serde_json::to_value(SendOutcome::selected("yes")).unwrap();
            assert_eq!(json["status"], "action");
            assert_eq!(json["outcome"]["kind"], "selected");
            assert_eq!(json["outcome"]["key"], "yes");

            let json = serde_json::to_value(SendOutcome::Delivered).unwrap();
            assert_eq!(json["status"], "delivered");
        }
    }
}
