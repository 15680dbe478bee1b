//! Display utilities for the desktop-notify CLI.
//!
//! This module provides formatted output for:
//! - Send outcomes
//! - Backend and icon set listings
//! - Icon resolution details
//! - Error messages

use crate::backends::BackendDescriptor;
use crate::icons::{IconSetDescriptor, ResolvedIcon, SourceKind};
use crate::types::{ActionOutcome, Capability, SendOutcome};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the result of a send.
    pub fn show_outcome(outcome: &SendOutcome, backend: &str) {
        match outcome {
            SendOutcome::Failed { error } => {
                Self::show_error(&error.to_string());
                eprintln!("  Hint: {}", error.suggestion());
            }
            _ => println!("{}", Self::format_outcome(outcome, backend)),
        }
    }

    /// Shows the selected backend and icon set.
    pub fn show_check(backend: &str, icon_set: &str, all_or_nothing: bool) {
        println!("desktop-notify status");
        println!("─────────────────────────────");
        println!("Backend:        {}", backend);
        println!("Icon set:       {}", icon_set);
        println!(
            "All-or-nothing: {}",
            if all_or_nothing { "enabled" } else { "disabled" }
        );
    }

    /// Shows all backends.
    pub fn show_backends(backends: &[BackendDescriptor], selected: &str) {
        println!("Backends");
        println!("─────────────────────────────");
        for backend in backends {
            println!("{}", Self::format_backend(backend, backend.name == selected));
        }
    }

    /// Shows all icon sets, with an optional icon preview per set.
    pub fn show_icon_sets(sets: &[(IconSetDescriptor, Vec<(String, String)>)], active: &str) {
        println!("Icon sets");
        println!("─────────────────────────────");
        for (set, preview) in sets {
            println!("{}", Self::format_icon_set(set, set.name == active));
            for (name, reference) in preview {
                println!("      {:<16} {}", name, reference);
            }
        }
    }

    /// Shows how an icon name was resolved.
    pub fn show_resolution(icon: &ResolvedIcon) {
        println!("{}", Self::format_resolution(icon));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats a non-failed outcome.
    #[must_use]
    pub fn format_outcome(outcome: &SendOutcome, backend: &str) -> String {
        match outcome {
            SendOutcome::Delivered => format!("Notification sent via {}", backend),
            SendOutcome::Action {
                outcome: ActionOutcome::Selected(key),
            } => format!("User selected: {}", key),
            SendOutcome::Action {
                outcome: ActionOutcome::NoResponse,
            } => "No action selected (timeout or dismissed)".to_string(),
            SendOutcome::Failed { error } => format!("Failed: {}", error),
        }
    }

    /// Formats one backend row.
    #[must_use]
    pub fn format_backend(backend: &BackendDescriptor, selected: bool) -> String {
        let capabilities: Vec<&str> = backend.capabilities.iter().map(Capability::as_str).collect();
        format!(
            "{} {:<10} priority {:>3}  {:<13} [{}]",
            if selected { "*" } else { " " },
            backend.name,
            backend.priority,
            if backend.available {
                "available"
            } else {
                "not available"
            },
            capabilities.join(", ")
        )
    }

    /// Formats one icon set row.
    #[must_use]
    pub fn format_icon_set(set: &IconSetDescriptor, active: bool) -> String {
        format!(
            "{} {:<10} priority {:>3}  {}",
            if active { "*" } else { " " },
            set.name,
            set.priority,
            if set.available {
                "available"
            } else {
                "not available"
            }
        )
    }

    /// Formats an icon resolution.
    #[must_use]
    pub fn format_resolution(icon: &ResolvedIcon) -> String {
        let mut lines = vec![format!("Icon:      {}", icon.original_name)];
        lines.push(format!(
            "Resolved:  {}",
            icon.resolved_reference.as_deref().unwrap_or("(none)")
        ));
        lines.push(format!("Source:    {}", Self::source_label(icon.source_kind)));
        if let Some(set) = &icon.set_used {
            lines.push(format!(
                "Set:       {}{}",
                set,
                if icon.is_fallback { " (fallback)" } else { "" }
            ));
        }
        lines.push(format!("Tried:     {}", icon.fallback_chain.join(" -> ")));
        if icon.resolved_at_cache_hit {
            lines.push("Cache:     hit".to_string());
        }
        lines.join("\n")
    }

    fn source_label(kind: SourceKind) -> &'static str {
        match kind {
            SourceKind::System => "system theme",
            SourceKind::Bundled => "bundled",
            SourceKind::Glyph => "glyph",
            SourceKind::LiteralPath => "literal path",
            SourceKind::None => "none",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::DispatchError;
    use std::collections::BTreeSet;
    use std::time::Duration;

    // ------------------------------------------------------------------------
    // Format Tests
    // ------------------------------------------------------------------------

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_outcomes() {
            assert_eq!(
                Display::format_outcome(&SendOutcome::selected("default"), "dunst"),
                "User selected: default"
            );
            assert_eq!(
                Display::format_outcome(&SendOutcome::no_response(), "dunst"),
                "No action selected (timeout or dismissed)"
            );
            assert_eq!(
                Display::format_outcome(&SendOutcome::Delivered, "console"),
                "Notification sent via console"
            );
            assert!(Display::format_outcome(
                &SendOutcome::failed(DispatchError::UnrecognizedExit(4)),
                "dunst"
            )
            .starts_with("Failed:"));
        }

        #[test]
        fn test_format_backend() {
            let backend = BackendDescriptor {
                name: "dunst".to_string(),
                priority: 90,
                capabilities: [Capability::Actions, Capability::Urgency].into_iter().collect(),
                available: false,
            };
            let row = Display::format_backend(&backend, false);
            assert!(row.contains("dunst"));
            assert!(row.contains("priority  90"));
            assert!(row.contains("not available"));
            assert!(row.contains("[actions, urgency]"));
            assert!(Display::format_backend(&backend, true).starts_with('*'));
        }

        #[test]
        fn test_format_icon_set() {
            let set = IconSetDescriptor {
                name: "minimal".to_string(),
                priority: 10,
                required_icon_names: BTreeSet::new(),
                available: true,
            };
            let row = Display::format_icon_set(&set, true);
            assert!(row.starts_with("* minimal"));
            assert!(row.ends_with("available"));
        }

        #[test]
        fn test_format_resolution() {
            let icon = ResolvedIcon::unresolved(
                "warning",
                vec!["system".into(), "minimal".into()],
                Duration::ZERO,
            )
            .with_reference(SourceKind::Glyph, Some("minimal"), "⚠️", true);

            let text = Display::format_resolution(&icon);
            assert!(text.contains("Resolved:  ⚠️"));
            assert!(text.contains("Source:    glyph"));
            assert!(text.contains("Set:       minimal (fallback)"));
            assert!(text.contains("Tried:     system -> minimal"));
            assert!(!text.contains("Cache"));
        }

        #[test]
        fn test_format_unresolved() {
            let icon = ResolvedIcon::unresolved("nothing", Vec::new(), Duration::ZERO);
            let text = Display::format_resolution(&icon);
            assert!(text.contains("Resolved:  (none)"));
            assert!(!text.contains("Set:"));
        }
    }

    // ------------------------------------------------------------------------
    // Display Output Tests
    // ------------------------------------------------------------------------

    mod display_tests {
        use super::*;

        #[test]
        fn test_show_functions_do_not_panic() {
            Display::show_outcome(&SendOutcome::Delivered, "console");
            Display::show_outcome(&SendOutcome::failed(DispatchError::Terminated), "dunst");
            Display::show_check("console", "minimal", true);
            Display::show_backends(&[], "console");
            Display::show_icon_sets(&[], "minimal");
            Display::show_error("Test error message");
        }
    }
}
