//! Backend discovery and selection.

use std::cmp::Reverse;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::daemon::DaemonBackend;
use super::terminal::TerminalBackend;
use super::{BackendDescriptor, NotificationBackend};
use crate::config::Settings;

/// Registered backends plus an optional pinned selection.
///
/// Availability is probed on every discovery pass; nothing about an
/// external daemon is cached. The terminal fallback is returned whenever
/// no registered backend is available.
pub struct BackendRegistry {
    backends: Vec<Arc<dyn NotificationBackend>>,
    fallback: Arc<dyn NotificationBackend>,
    pinned: RwLock<Option<Arc<dyn NotificationBackend>>>,
}

impl BackendRegistry {
    /// Creates an empty registry with a default terminal fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            fallback: Arc::new(TerminalBackend::default()),
            pinned: RwLock::new(None),
        }
    }

    /// Creates a registry holding the daemon and terminal backends.
    ///
    /// The configured backend preference, if any, is pinned when it is
    /// available; otherwise selection stays automatic.
    #[must_use]
    pub fn with_defaults(settings: &Settings) -> Self {
        let terminal: Arc<dyn NotificationBackend> =
            Arc::new(TerminalBackend::new(settings.backends.console.clone()));

        let mut registry = Self::new();
        registry.fallback = Arc::clone(&terminal);
        registry.register(Arc::new(DaemonBackend::new(settings.backends.dunst.clone())));
        registry.register(terminal);

        if let Some(preferred) = settings.backend_preference() {
            if !registry.switch_to(preferred) {
                warn!(
                    "Configured backend '{}' is not available; selecting automatically",
                    preferred
                );
            }
        }
        registry
    }

    /// Adds a backend. Registration order breaks priority ties.
    pub fn register(&mut self, backend: Arc<dyn NotificationBackend>) {
        debug!(
            "Registered backend {} (priority {})",
            backend.name(),
            backend.priority()
        );
        self.backends.push(backend);
    }

    /// Returns the number of registered backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Probes every backend and returns the available ones, best first.
    #[must_use]
    pub fn discover_available(&self) -> Vec<BackendDescriptor> {
        self.available_backends()
            .into_iter()
            .map(|(descriptor, _)| descriptor)
            .collect()
    }

    /// Returns the highest-priority available backend, or the terminal
    /// fallback when none is available.
    #[must_use]
    pub fn select_best(&self) -> Arc<dyn NotificationBackend> {
        match self.available_backends().into_iter().next() {
            Some((_, backend)) => backend,
            None => {
                debug!("No backend available; using terminal fallback");
                Arc::clone(&self.fallback)
            }
        }
    }

    /// Returns the backend to send through: the pinned one if set,
    /// otherwise the best available.
    #[must_use]
    pub fn selected(&self) -> Arc<dyn NotificationBackend> {
        let pinned = self
            .pinned
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        pinned.unwrap_or_else(|| self.select_best())
    }

    /// Name of the pinned backend, if any.
    #[must_use]
    pub fn pinned_name(&self) -> Option<String> {
        self.pinned
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|b| b.name().to_string())
    }

    /// Looks a backend up by name without probing availability.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn NotificationBackend>> {
        self.backends
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|b| b.name() == name)
            .cloned()
    }

    /// Pins the named backend if it is available right now.
    ///
    /// Returns false and leaves the selection unchanged otherwise.
    pub fn switch_to(&self, name: &str) -> bool {
        let Some(backend) = self.get_by_name(name) else {
            warn!("Unknown backend: {}", name);
            return false;
        };
        if !backend.is_available() {
            warn!("Backend {} is not available", name);
            return false;
        }

        info!("Switched to backend {}", name);
        *self.pinned.write().unwrap_or_else(PoisonError::into_inner) = Some(backend);
        true
    }

    /// Returns to automatic selection.
    pub fn clear_pin(&self) {
        *self.pinned.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Describes every registered backend in registration order.
    #[must_use]
    pub fn list_all(&self) -> Vec<BackendDescriptor> {
        self.backends.iter().map(|b| b.describe()).collect()
    }

    fn available_backends(&self) -> Vec<(BackendDescriptor, Arc<dyn NotificationBackend>)> {
        let mut available: Vec<_> = self
            .backends
            .iter()
            .map(|b| (b.describe(), Arc::clone(b)))
            .filter(|(descriptor, _)| descriptor.available)
            .collect();
        // Stable sort keeps registration order within a priority.
        available.sort_by_key(|(descriptor, _)| Reverse(descriptor.priority));
        available
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("BackendRegistry")
            .field("backends", &names)
            .field("fallback", &self.fallback.name())
            .field("pinned", &self.pinned_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{MockBackend, CONSOLE_BACKEND, DUNST_BACKEND};
    use crate::config::DaemonSettings;

    fn registry_of(mocks: &[Arc<MockBackend>]) -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        for mock in mocks {
            registry.register(Arc::clone(mock) as Arc<dyn NotificationBackend>);
        }
        registry
    }

    fn names(descriptors: &[BackendDescriptor]) -> Vec<&str> {
        descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    // ------------------------------------------------------------------------
    // Discovery Tests
    // ------------------------------------------------------------------------

    mod discovery_tests {
        use super::*;

        #[test]
        fn test_sorted_by_descending_priority() {
            let low = Arc::new(MockBackend::new("low", 10));
            let high = Arc::new(MockBackend::new("high", 90));
            let mid = Arc::new(MockBackend::new("mid", 50));
            let registry = registry_of(&[low, high, mid]);

            assert_eq!(names(&registry.discover_available()), ["high", "mid", "low"]);
        }

        #[test]
        fn test_ties_keep_registration_order() {
            let first = Arc::new(MockBackend::new("first", 50));
            let second = Arc::new(MockBackend::new("second", 50));
            let registry = registry_of(&[first, second]);

            assert_eq!(names(&registry.discover_available()), ["first", "second"]);
            assert_eq!(registry.select_best().name(), "first");
        }

        #[test]
        fn test_unavailable_are_excluded() {
            let gone = Arc::new(MockBackend::new("gone", 100));
            gone.set_available(false);
            let here = Arc::new(MockBackend::new("here", 5));
            let registry = registry_of(&[gone, here]);

            assert_eq!(names(&registry.discover_available()), ["here"]);
            assert_eq!(registry.list_all().len(), 2);
        }

        #[test]
        fn test_availability_is_probed_every_pass() {
            let mock = Arc::new(MockBackend::new("mock", 10));
            let registry = registry_of(&[Arc::clone(&mock)]);

            let _ = registry.discover_available();
            let _ = registry.discover_available();
            assert_eq!(mock.availability_checks(), 2);

            mock.set_available(false);
            assert!(registry.discover_available().is_empty());
        }

        #[test]
        fn test_select_best_falls_back_to_terminal() {
            let gone = Arc::new(MockBackend::new("gone", 100));
            gone.set_available(false);
            let registry = registry_of(&[gone]);

            let backend = registry.select_best();
            assert_eq!(backend.name(), CONSOLE_BACKEND);
            assert!(backend.is_available());
        }

        #[test]
        fn test_empty_registry_still_selects() {
            let registry = BackendRegistry::new();
            assert!(registry.is_empty());
            assert_eq!(registry.selected().name(), CONSOLE_BACKEND);
        }
    }

    // ------------------------------------------------------------------------
    // Selection Tests
    // ------------------------------------------------------------------------

    mod selection_tests {
        use super::*;

        #[test]
        fn test_switch_to_available_pins() {
            let high = Arc::new(MockBackend::new("high", 90));
            let low = Arc::new(MockBackend::new("low", 10));
            let registry = registry_of(&[high, low]);

            assert!(registry.switch_to("low"));
            assert_eq!(registry.selected().name(), "low");
            assert_eq!(registry.pinned_name().as_deref(), Some("low"));

            registry.clear_pin();
            assert_eq!(registry.selected().name(), "high");
        }

        #[test]
        fn test_switch_to_unavailable_keeps_state() {
            let high = Arc::new(MockBackend::new("high", 90));
            let low = Arc::new(MockBackend::new("low", 10));
            low.set_available(false);
            let registry = registry_of(&[high, low]);

            assert!(registry.switch_to("high"));
            assert!(!registry.switch_to("low"));
            assert!(!registry.switch_to("missing"));
            assert_eq!(registry.pinned_name().as_deref(), Some("high"));
        }

        #[test]
        fn test_get_by_name_does_not_probe() {
            let mock = Arc::new(MockBackend::new("mock", 10));
            let registry = registry_of(&[Arc::clone(&mock)]);

            assert!(registry.get_by_name("mock").is_some());
            assert!(registry.get_by_name("other").is_none());
            assert_eq!(mock.availability_checks(), 0);
        }

        #[test]
        fn test_switch_to_terminal_fallback() {
            let registry = BackendRegistry::new();
            assert!(registry.switch_to(CONSOLE_BACKEND));
            assert_eq!(registry.selected().name(), CONSOLE_BACKEND);
        }
    }

    // ------------------------------------------------------------------------
    // Default Registry Tests
    // ------------------------------------------------------------------------

    mod defaults_tests {
        use super::*;

        fn settings_without_daemon() -> Settings {
            let mut settings = Settings::default();
            settings.backends.dunst = DaemonSettings {
                command: "definitely-not-a-real-command-xyz".to_string(),
                ..DaemonSettings::default()
            };
            settings
        }

        #[test]
        fn test_defaults_register_daemon_and_terminal() {
            let registry = BackendRegistry::with_defaults(&settings_without_daemon());
            let all = registry.list_all();
            assert_eq!(names(&all), [DUNST_BACKEND, CONSOLE_BACKEND]);
            assert!(!all[0].available);
            assert_eq!(registry.select_best().name(), CONSOLE_BACKEND);
        }

        #[test]
        fn test_unavailable_preference_is_not_pinned() {
            let mut settings = settings_without_daemon();
            settings.backend = DUNST_BACKEND.to_string();
            let registry = BackendRegistry::with_defaults(&settings);
            assert_eq!(registry.pinned_name(), None);
        }

        #[test]
        fn test_available_preference_is_pinned() {
            let mut settings = Settings::default();
            settings.backend = CONSOLE_BACKEND.to_string();
            let registry = BackendRegistry::with_defaults(&settings);
            assert_eq!(registry.pinned_name().as_deref(), Some(CONSOLE_BACKEND));
        }
    }
}
