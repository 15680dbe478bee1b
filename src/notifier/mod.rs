//! Notification dispatcher.
//!
//! [`Notifier`] is the context object that ties the icon engine, the
//! backend registry and the resolved settings together. A send flows in
//! one direction:
//!
//! ```text
//! NotificationRequest
//!        │ fill urgency/timeout defaults from Settings
//!        ▼
//! ┌──────────────┐   ResolvedIcon   ┌──────────────────┐
//! │  IconEngine  │─────────────────▶│ BackendRegistry  │ selected()
//! └──────────────┘                  └────────┬─────────┘
//!                                            │ send(request, icon, cancel)
//!                                            ▼
//!                                  SendOutcome + SendReport
//! ```
//!
//! The only blocking point is the backend send. Concurrent sends share the
//! engine and registry through their internal locks and never hold them
//! across the wait.

mod report;

use std::future::Future;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

pub use report::{SendReport, Timings};

use crate::backends::{BackendDescriptor, BackendRegistry, CancelToken, DispatchError};
use crate::config::Settings;
use crate::icons::{IconEngine, IconSetDescriptor};
use crate::types::{NotificationRequest, SendOutcome};

/// Dispatches notification requests through the selected backend.
#[derive(Debug)]
pub struct Notifier {
    settings: Settings,
    engine: IconEngine,
    registry: BackendRegistry,
    last_report: RwLock<Option<SendReport>>,
}

impl Notifier {
    /// Builds the engine and registry from settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let engine = IconEngine::from_settings(&settings);
        let registry = BackendRegistry::with_defaults(&settings);
        Self::with_parts(settings, engine, registry)
    }

    /// Assembles a notifier from prebuilt parts.
    #[must_use]
    pub fn with_parts(settings: Settings, engine: IconEngine, registry: BackendRegistry) -> Self {
        Self {
            settings,
            engine,
            registry,
            last_report: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn engine(&self) -> &IconEngine {
        &self.engine
    }

    #[must_use]
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    // ========================================================================
    // Sending
    // ========================================================================

    /// Sends a notification and returns the normalized outcome.
    ///
    /// Blocks for interactive requests until the user answers, the
    /// notification expires, or it is dismissed.
    pub fn send(&self, request: NotificationRequest) -> SendOutcome {
        self.send_detailed(request).outcome
    }

    /// Sends a notification and returns the full report.
    pub fn send_detailed(&self, request: NotificationRequest) -> SendReport {
        self.dispatch(request, &CancelToken::new())
    }

    /// Sends a notification whose wait ends early when `cancel` fires.
    ///
    /// A cancelled interactive send yields `NoResponse`.
    pub fn send_with_cancel(&self, request: NotificationRequest, cancel: &CancelToken) -> SendOutcome {
        self.dispatch(request, cancel).outcome
    }

    /// Runs the send on the blocking pool.
    ///
    /// Dropping the returned future cancels the wait and kills the daemon
    /// process.
    pub fn send_async(
        self: &Arc<Self>,
        request: NotificationRequest,
    ) -> impl Future<Output = SendOutcome> + Send + 'static {
        let notifier = Arc::clone(self);
        async move {
            let token = CancelToken::new();
            let _guard = CancelOnDrop(token.clone());
            tokio::task::spawn_blocking(move || notifier.send_with_cancel(request, &token))
                .await
                .unwrap_or_else(|e| SendOutcome::failed(DispatchError::Task(e.to_string())))
        }
    }

    /// Sends a fixed test notification through the selected backend.
    pub fn test_notification(&self) -> SendOutcome {
        self.send(NotificationRequest::new(
            "info",
            "Test Notification",
            "desktop-notify is working",
        ))
    }

    /// Returns the report of the most recent send.
    #[must_use]
    pub fn last_report(&self) -> Option<SendReport> {
        self.last_report
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply_defaults(&self, mut request: NotificationRequest) -> NotificationRequest {
        request.urgency.get_or_insert(self.settings.urgency);
        request.timeout_ms.get_or_insert(self.settings.timeout_ms);
        request
    }

    fn dispatch(&self, request: NotificationRequest, cancel: &CancelToken) -> SendReport {
        let id = Uuid::new_v4();
        let span = info_span!("send", %id);
        let _entered = span.enter();

        let sent_at = Utc::now();
        let started = Instant::now();
        let request = self.apply_defaults(request);

        let icon = self.engine.resolve_request(&request.icon, true);
        let resolved = Instant::now();

        let backend = self.registry.selected();
        let selected = Instant::now();
        debug!(
            "Sending '{}' via {} with icon {:?}",
            request.title,
            backend.name(),
            icon.resolved_reference
        );

        let outcome = backend.send(&request, &icon, cancel);
        let finished = Instant::now();
        debug!("Send finished: {}", outcome);

        let report = SendReport {
            id,
            sent_at,
            outcome,
            icon,
            backend: backend.name().to_string(),
            timings: Timings {
                icon_resolution: resolved - started,
                backend_selection: selected - resolved,
                dispatch: finished - selected,
                total: finished - started,
            },
        };

        *self
            .last_report
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(report.clone());
        report
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Pins a backend by name if it is available.
    pub fn switch_backend(&self, name: &str) -> bool {
        self.registry.switch_to(name)
    }

    /// Activates an icon set by name; false if it is rejected.
    pub fn switch_icon_set(&self, name: &str) -> bool {
        self.engine.set_active_icon_set(name)
    }

    /// Name of the backend the next send would use.
    #[must_use]
    pub fn current_backend(&self) -> String {
        self.registry.selected().name().to_string()
    }

    /// Name of the active icon set.
    #[must_use]
    pub fn current_icon_set(&self) -> String {
        self.engine.active_icon_set()
    }

    /// Available backends, best first.
    #[must_use]
    pub fn available_backends(&self) -> Vec<BackendDescriptor> {
        self.registry.discover_available()
    }

    /// Available icon sets, best first.
    #[must_use]
    pub fn available_icon_sets(&self) -> Vec<IconSetDescriptor> {
        self.engine.list_available_sets()
    }

    /// Returns true if the selected backend can deliver.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.registry.selected().is_available()
    }
}

struct CancelOnDrop(CancelToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

// ============================================================================
// Global accessor
// ============================================================================

static GLOBAL: OnceLock<Arc<Notifier>> = OnceLock::new();

/// Returns the process-wide notifier, building it on first use.
///
/// Settings come from [`Settings::load`]; a broken configuration falls
/// back to defaults with a warning.
pub fn global() -> Arc<Notifier> {
    let notifier = GLOBAL.get_or_init(|| {
        let settings = Settings::load().unwrap_or_else(|e| {
            warn!("Using default settings: {}", e);
            Settings::default()
        });
        Arc::new(Notifier::new(settings))
    });
    Arc::clone(notifier)
}

/// Sends a plain notification through the global notifier.
pub fn send_notification(icon: &str, title: &str, message: &str) -> SendOutcome {
    global().send(NotificationRequest::new(icon, title, message))
}
