//! Scripted backend for tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::cancel::CancelToken;
use super::NotificationBackend;
use crate::icons::ResolvedIcon;
use crate::types::{Capability, NotificationRequest, SendOutcome};

/// Mock backend that records requests and returns a scripted outcome.
///
/// With no scripted outcome it answers `Delivered` for plain requests and
/// `NoResponse` for interactive ones.
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    priority: i32,
    capabilities: BTreeSet<Capability>,
    available: AtomicBool,
    outcome: Mutex<Option<SendOutcome>>,
    calls: Mutex<Vec<(NotificationRequest, ResolvedIcon)>>,
    availability_checks: AtomicUsize,
}

impl MockBackend {
    /// Creates an available mock with every capability.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            capabilities: [
                Capability::Actions,
                Capability::Urgency,
                Capability::Timeout,
                Capability::Icons,
                Capability::Markup,
            ]
            .into_iter()
            .collect(),
            available: AtomicBool::new(true),
            outcome: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            availability_checks: AtomicUsize::new(0),
        }
    }

    /// Replaces the capability set.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes every following send return `outcome`.
    pub fn set_outcome(&self, outcome: SendOutcome) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
    }

    #[must_use]
    pub fn send_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn get_send_calls(&self) -> Vec<(NotificationRequest, ResolvedIcon)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `is_available` probes so far.
    #[must_use]
    pub fn availability_checks(&self) -> usize {
        self.availability_checks.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl NotificationBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn capabilities(&self) -> BTreeSet<Capability> {
        self.capabilities.clone()
    }

    fn is_available(&self) -> bool {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.available.load(Ordering::SeqCst)
    }

    fn send(
        &self,
        request: &NotificationRequest,
        icon: &ResolvedIcon,
        _cancel: &CancelToken,
    ) -> SendOutcome {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((request.clone(), icon.clone()));

        let scripted = self
            .outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        scripted.unwrap_or_else(|| {
            if request.has_actions() {
                SendOutcome::no_response()
            } else {
                SendOutcome::Delivered
            }
        })
    }
}
