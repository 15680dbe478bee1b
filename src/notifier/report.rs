//! Diagnostic record of one send.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::icons::ResolvedIcon;
use crate::types::SendOutcome;

/// Time spent in each phase of a send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Icon resolution
    pub icon_resolution: Duration,
    /// Backend selection, including availability probes
    pub backend_selection: Duration,
    /// Backend send, including any interactive wait
    pub dispatch: Duration,
    /// Whole send
    pub total: Duration,
}

/// Everything known about one send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReport {
    /// Correlation id, also attached to the send's log lines
    pub id: Uuid,
    /// When the send started
    pub sent_at: DateTime<Utc>,
    /// Normalized result
    pub outcome: SendOutcome,
    /// How the icon was resolved
    pub icon: ResolvedIcon,
    /// Backend that handled the send
    pub backend: String,
    /// Phase timings
    pub timings: Timings,
}

impl SendReport {
    /// Returns true unless the send failed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.outcome.is_failed()
    }

    /// Serializes the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
