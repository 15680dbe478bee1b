//! Icon resolution for notifications.
//!
//! This module turns symbolic icon names ("info", "mic") into something a
//! backend can render: a themed icon file, a bundled SVG, or a unicode
//! glyph. It provides:
//!
//! - Three icon sets ranked by priority (system 100, material 80, minimal 10)
//! - All-or-nothing validation so one notification stream never mixes styles
//! - A TTL cache keyed by (active set, name)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │    IconEngine    │ ← resolve(name)
//! └────────┬─────────┘
//!          │ override / literal
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │    active set    │────▶│ lower-priority   │ (all-or-nothing off)
//! └────────┬─────────┘     └────────┬─────────┘
//!          │                        │
//!          ▼                        ▼
//! ┌───────────────────────────────────────────┐
//! │      minimal glyphs (total, terminal)     │
//! └───────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use desktop_notify::config::IconSettings;
//! use desktop_notify::icons::{IconEngine, IconSet, SourceKind};
//!
//! let engine = IconEngine::new(vec![IconSet::Glyph], &IconSettings::default());
//! let icon = engine.resolve("info", true);
//! assert_eq!(icon.source_kind, SourceKind::Glyph);
//! assert_eq!(engine.active_icon_set(), "minimal");
//! ```

mod bundled;
mod cache;
mod error;
pub mod glyph;
mod set;
mod system;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use bundled::{default_dir as default_bundled_dir, BundledIcons};
pub use cache::{CacheLookup, IconCache};
pub use error::IconError;
pub use set::{IconSet, IconSetDescriptor, BUNDLED_SET, GLYPH_SET, SYSTEM_SET};
pub use system::{default_search_roots, SystemTheme, HICOLOR};

use crate::config::{IconSettings, Settings};
use crate::types::{IconOverride, IconRequest};

/// Chain entry recorded for caller-supplied overrides.
pub const OVERRIDE_SOURCE: &str = "override";

/// Chain entry recorded for names that are themselves a path or glyph.
pub const LITERAL_SOURCE: &str = "literal";

// ============================================================================
// ResolvedIcon
// ============================================================================

/// Where a resolved icon came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Freedesktop theme file
    System,
    /// Bundled SVG file
    Bundled,
    /// Unicode glyph
    Glyph,
    /// Explicit file path
    LiteralPath,
    /// Nothing resolved
    None,
}

impl SourceKind {
    /// Returns true if the reference is a file path.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::System | Self::Bundled | Self::LiteralPath)
    }
}

/// Outcome of resolving one icon name. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIcon {
    /// Name as requested
    pub original_name: String,
    /// Path or glyph, `None` if nothing resolved
    pub resolved_reference: Option<String>,
    /// Kind of `resolved_reference`
    pub source_kind: SourceKind,
    /// Icon set that produced the reference
    pub set_used: Option<String>,
    /// True if a set other than the active one produced the reference
    pub is_fallback: bool,
    /// Every source attempted, in order
    pub fallback_chain: Vec<String>,
    /// True if served from the cache
    pub resolved_at_cache_hit: bool,
    /// Time spent resolving
    pub resolution_time: Duration,
}

impl ResolvedIcon {
    /// Creates a result with nothing resolved.
    #[must_use]
    pub fn unresolved(
        name: impl Into<String>,
        fallback_chain: Vec<String>,
        resolution_time: Duration,
    ) -> Self {
        Self {
            original_name: name.into(),
            resolved_reference: None,
            source_kind: SourceKind::None,
            set_used: None,
            is_fallback: false,
            fallback_chain,
            resolved_at_cache_hit: false,
            resolution_time,
        }
    }

    /// Returns a copy carrying a resolved reference.
    #[must_use]
    pub fn with_reference(
        mut self,
        kind: SourceKind,
        set: Option<&str>,
        reference: impl Into<String>,
        is_fallback: bool,
    ) -> Self {
        self.source_kind = kind;
        self.set_used = set.map(str::to_string);
        self.resolved_reference = Some(reference.into());
        self.is_fallback = is_fallback;
        self
    }

    /// Returns true if a reference was produced.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved_reference.is_some()
    }

    /// Returns the reference as a path for file-backed kinds.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.resolved_reference
            .as_deref()
            .filter(|_| self.source_kind.is_file())
            .map(Path::new)
    }

    /// Returns the reference if it is a glyph.
    #[must_use]
    pub fn glyph(&self) -> Option<&str> {
        self.resolved_reference
            .as_deref()
            .filter(|_| self.source_kind == SourceKind::Glyph)
    }

    /// Returns a glyph suitable for text output, whatever the source kind.
    #[must_use]
    pub fn display_glyph(&self) -> &str {
        self.glyph()
            .unwrap_or_else(|| glyph::glyph_for(&self.original_name))
    }
}

// ============================================================================
// Engine State
// ============================================================================

#[derive(Debug)]
struct EngineState {
    /// Registration order; always contains the glyph set.
    sets: Vec<IconSet>,
    active: usize,
    all_or_nothing: bool,
    fallback_enabled: bool,
    required: BTreeSet<String>,
}

impl EngineState {
    /// Set indices by descending priority; ties keep registration order.
    fn by_priority(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.sets.len()).collect();
        order.sort_by_key(|&idx| std::cmp::Reverse(self.sets[idx].priority()));
        order
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.sets.iter().position(|set| set.name() == name)
    }

    fn glyph_index(&self) -> usize {
        self.sets
            .iter()
            .position(IconSet::is_total)
            .unwrap_or(self.sets.len() - 1)
    }

    fn accepts(&self, idx: usize) -> Result<(), IconError> {
        let set = &self.sets[idx];
        if !set.is_available() {
            return Err(IconError::Unavailable(set.name().to_string()));
        }
        if self.all_or_nothing {
            let missing = set.missing_icons(&self.required);
            if !missing.is_empty() {
                return Err(IconError::Incomplete {
                    set: set.name().to_string(),
                    missing,
                });
            }
        }
        Ok(())
    }

    /// First accepted set in `order`, or the glyph set.
    fn first_accepted(&self, order: impl IntoIterator<Item = usize>) -> usize {
        for idx in order {
            match self.accepts(idx) {
                Ok(()) => return idx,
                Err(e) => debug!("Skipping icon set: {}", e),
            }
        }
        self.glyph_index()
    }

    /// Sets ranked after `idx` in priority order.
    fn lower_than(&self, idx: usize) -> Vec<usize> {
        self.by_priority()
            .into_iter()
            .skip_while(|&i| i != idx)
            .skip(1)
            .collect()
    }

    /// Moves off the active set if it no longer passes validation.
    fn revalidate(&mut self) {
        if let Err(e) = self.accepts(self.active) {
            let next = self.first_accepted(self.lower_than(self.active));
            warn!(
                "Icon set rejected ({}); falling back to '{}'",
                e,
                self.sets[next].name()
            );
            self.active = next;
        }
    }
}

// ============================================================================
// IconEngine
// ============================================================================

/// Resolves icon names against prioritized icon sets.
///
/// `resolve` never fails; the worst case is a result with
/// [`SourceKind::None`]. The engine is `Sync`: concurrent resolutions share
/// read locks, set switches take write locks. Locks are always taken in the
/// order state, then cache.
#[derive(Debug)]
pub struct IconEngine {
    state: RwLock<EngineState>,
    cache: RwLock<IconCache>,
    log_resolution: bool,
}

impl IconEngine {
    /// Creates an engine over `sets` (registration order) and selects the
    /// highest-priority set that passes validation.
    ///
    /// The glyph set is appended if `sets` does not contain it.
    #[must_use]
    pub fn new(mut sets: Vec<IconSet>, options: &IconSettings) -> Self {
        if !sets.iter().any(IconSet::is_total) {
            sets.push(IconSet::Glyph);
        }

        let mut state = EngineState {
            sets,
            active: 0,
            all_or_nothing: options.all_or_nothing,
            fallback_enabled: options.fallback_enabled,
            required: options.required.iter().cloned().collect(),
        };
        state.active = state.first_accepted(state.by_priority());
        debug!("Selected icon set '{}'", state.sets[state.active].name());

        Self {
            state: RwLock::new(state),
            cache: RwLock::new(IconCache::new(Duration::from_secs(
                options.cache_ttl_seconds,
            ))),
            log_resolution: false,
        }
    }

    /// Creates the system, material and minimal sets from settings and
    /// applies the configured icon set preference.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let icons = &settings.icons;
        let system = IconSet::System(SystemTheme::new(
            icons.system_theme.as_deref(),
            icons.system_size,
            icons.prefer_scalable,
        ));
        let bundled = IconSet::Bundled(
            icons
                .bundled_dir
                .clone()
                .map(BundledIcons::new)
                .unwrap_or_else(BundledIcons::at_default_dir),
        );

        let engine = Self::new(vec![system, bundled, IconSet::Glyph], icons)
            .with_resolution_logging(settings.log_icon_resolution);

        if let Some(preferred) = settings.icon_set_preference() {
            if let Err(e) = engine.activate_icon_set(preferred) {
                warn!(
                    "Preferred icon set '{}' not used: {}; using '{}'",
                    preferred,
                    e,
                    engine.active_icon_set()
                );
            }
        }
        engine
    }

    /// Logs every resolution at info level instead of debug.
    #[must_use]
    pub fn with_resolution_logging(mut self, enabled: bool) -> Self {
        self.log_resolution = enabled;
        self
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, IconCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, IconCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Resolves a symbolic name.
    ///
    /// With `allow_fallback = false` only the active set is consulted.
    pub fn resolve(&self, name: &str, allow_fallback: bool) -> ResolvedIcon {
        self.resolve_request(&IconRequest::named(name), allow_fallback)
    }

    /// Resolves an icon request, honoring explicit path or glyph overrides.
    pub fn resolve_request(&self, request: &IconRequest, allow_fallback: bool) -> ResolvedIcon {
        let started = Instant::now();
        let name = request.name.as_str();

        let literal = match &request.override_with {
            Some(IconOverride::Path(path)) => Some((
                OVERRIDE_SOURCE,
                SourceKind::LiteralPath,
                path.to_string_lossy().into_owned(),
            )),
            Some(IconOverride::Glyph(g)) => Some((OVERRIDE_SOURCE, SourceKind::Glyph, g.clone())),
            None if Path::new(name).is_absolute() && Path::new(name).exists() => {
                Some((LITERAL_SOURCE, SourceKind::LiteralPath, name.to_string()))
            }
            None if glyph::is_literal_glyph(name) => {
                Some((LITERAL_SOURCE, SourceKind::Glyph, name.to_string()))
            }
            None => None,
        };

        let icon = match literal {
            Some((source, kind, reference)) => {
                ResolvedIcon::unresolved(name, vec![source.to_string()], started.elapsed())
                    .with_reference(kind, None, reference, false)
            }
            None => self.resolve_named(name, allow_fallback, started),
        };

        self.trace(&icon);
        icon
    }

    fn resolve_named(&self, name: &str, allow_fallback: bool, started: Instant) -> ResolvedIcon {
        let state = self.read_state();
        let active = &state.sets[state.active];
        let active_name = active.name();

        let cached = self.read_cache().lookup(active_name, name);
        match cached {
            CacheLookup::Hit(icon) if allow_fallback || !icon.is_fallback => {
                return ResolvedIcon {
                    resolved_at_cache_hit: true,
                    resolution_time: started.elapsed(),
                    ..icon
                };
            }
            CacheLookup::Expired => {
                self.write_cache().evict_if_expired(active_name, name);
            }
            _ => {}
        }

        let mut chain = Vec::new();
        let mut found = try_set(active, name, &mut chain).map(|r| (active, r, false));

        if found.is_none() && allow_fallback && state.fallback_enabled {
            if !state.all_or_nothing {
                found = state
                    .lower_than(state.active)
                    .into_iter()
                    .map(|idx| &state.sets[idx])
                    .filter(|set| !set.is_total() && set.is_available())
                    .find_map(|set| try_set(set, name, &mut chain).map(|r| (set, r, true)));
            }
            if found.is_none() {
                let glyphs = &state.sets[state.glyph_index()];
                found = try_set(glyphs, name, &mut chain).map(|r| (glyphs, r, true));
            }
        }

        let icon = ResolvedIcon::unresolved(name, chain, started.elapsed());
        match found {
            Some((set, reference, is_fallback)) => {
                let icon = icon.with_reference(
                    set.source_kind(),
                    Some(set.name()),
                    reference,
                    is_fallback,
                );
                self.write_cache().insert(active_name, name, icon.clone());
                icon
            }
            None => icon,
        }
    }

    /// Resolves a name against one specific set without touching the
    /// active selection or the cache.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::UnknownSet`] if no set has that name.
    pub fn resolve_with(
        &self,
        set_name: &str,
        name: &str,
        allow_fallback: bool,
    ) -> Result<ResolvedIcon, IconError> {
        let started = Instant::now();
        let state = self.read_state();
        let idx = state
            .index_of(set_name)
            .ok_or_else(|| IconError::UnknownSet(set_name.to_string()))?;
        let set = &state.sets[idx];

        let mut chain = Vec::new();
        let mut found = try_set(set, name, &mut chain).map(|r| (set, r, false));
        if found.is_none() && allow_fallback {
            let glyphs = &state.sets[state.glyph_index()];
            found = try_set(glyphs, name, &mut chain).map(|r| (glyphs, r, true));
        }

        let icon = ResolvedIcon::unresolved(name, chain, started.elapsed());
        let icon = match found {
            Some((set, reference, is_fallback)) => {
                icon.with_reference(set.source_kind(), Some(set.name()), reference, is_fallback)
            }
            None => icon,
        };
        self.trace(&icon);
        Ok(icon)
    }

    fn trace(&self, icon: &ResolvedIcon) {
        let reference = icon.resolved_reference.as_deref().unwrap_or("<none>");
        let chain = icon.fallback_chain.join(" -> ");
        if self.log_resolution {
            info!(
                "Icon '{}' -> '{}' via [{}]{}",
                icon.original_name,
                reference,
                chain,
                if icon.resolved_at_cache_hit { " (cached)" } else { "" }
            );
        } else {
            debug!(
                "Icon '{}' -> '{}' via [{}]{}",
                icon.original_name,
                reference,
                chain,
                if icon.resolved_at_cache_hit { " (cached)" } else { "" }
            );
        }
    }

    // ------------------------------------------------------------------------
    // Set Management
    // ------------------------------------------------------------------------

    /// Returns the configured required names the named set cannot resolve.
    ///
    /// Does not change any state.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::UnknownSet`] if no set has that name.
    pub fn validate_icon_set(&self, set_name: &str) -> Result<BTreeSet<String>, IconError> {
        let state = self.read_state();
        let idx = state
            .index_of(set_name)
            .ok_or_else(|| IconError::UnknownSet(set_name.to_string()))?;
        Ok(state.sets[idx].missing_icons(&state.required))
    }

    /// Returns the names in `required` the named set cannot resolve.
    ///
    /// Like [`validate_icon_set`](Self::validate_icon_set) but against a
    /// caller-supplied list instead of the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::UnknownSet`] if no set has that name.
    pub fn validate_icon_set_against(
        &self,
        set_name: &str,
        required: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, IconError> {
        let state = self.read_state();
        let idx = state
            .index_of(set_name)
            .ok_or_else(|| IconError::UnknownSet(set_name.to_string()))?;
        Ok(state.sets[idx].missing_icons(required))
    }

    /// Makes the named set active and clears the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is unknown, unavailable, or (with
    /// all-or-nothing mode on) missing required icons. The active set is
    /// unchanged on error.
    pub fn activate_icon_set(&self, set_name: &str) -> Result<(), IconError> {
        let mut state = self.write_state();
        let idx = state
            .index_of(set_name)
            .ok_or_else(|| IconError::UnknownSet(set_name.to_string()))?;
        state.accepts(idx)?;

        state.active = idx;
        self.write_cache().clear();
        info!("Active icon set: {}", set_name);
        Ok(())
    }

    /// Boolean form of [`activate_icon_set`](Self::activate_icon_set).
    pub fn set_active_icon_set(&self, set_name: &str) -> bool {
        match self.activate_icon_set(set_name) {
            Ok(()) => true,
            Err(e) => {
                warn!("Cannot activate icon set '{}': {}", set_name, e);
                false
            }
        }
    }

    /// Turns all-or-nothing validation on or off.
    ///
    /// Enabling re-validates the active set and cascades to the next
    /// accepted set if it fails. The cache is cleared either way.
    pub fn set_all_or_nothing_mode(&self, enabled: bool) {
        let mut state = self.write_state();
        state.all_or_nothing = enabled;
        state.revalidate();
        self.write_cache().clear();
    }

    /// Replaces the required icon names and re-validates the active set.
    pub fn set_required_icons<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.write_state();
        state.required = names.into_iter().map(Into::into).collect();
        state.revalidate();
        self.write_cache().clear();
    }

    /// Turns cross-set fallback on or off.
    pub fn set_fallback_enabled(&self, enabled: bool) {
        self.write_state().fallback_enabled = enabled;
        self.write_cache().clear();
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Returns the name of the active set.
    #[must_use]
    pub fn active_icon_set(&self) -> String {
        let state = self.read_state();
        state.sets[state.active].name().to_string()
    }

    /// Returns true if all-or-nothing mode is on.
    #[must_use]
    pub fn is_all_or_nothing(&self) -> bool {
        self.read_state().all_or_nothing
    }

    /// Returns the required icon names.
    #[must_use]
    pub fn required_icons(&self) -> BTreeSet<String> {
        self.read_state().required.clone()
    }

    /// Describes every registered set by descending priority.
    #[must_use]
    pub fn list_sets(&self) -> Vec<IconSetDescriptor> {
        let state = self.read_state();
        state
            .by_priority()
            .into_iter()
            .map(|idx| state.sets[idx].describe(&state.required))
            .collect()
    }

    /// Describes the available sets by descending priority.
    #[must_use]
    pub fn list_available_sets(&self) -> Vec<IconSetDescriptor> {
        self.list_sets().into_iter().filter(|d| d.available).collect()
    }

    /// Describes one set.
    #[must_use]
    pub fn describe(&self, set_name: &str) -> Option<IconSetDescriptor> {
        let state = self.read_state();
        state
            .index_of(set_name)
            .map(|idx| state.sets[idx].describe(&state.required))
    }

    /// Lists the icons of one set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is unknown or its files cannot be read.
    pub fn list_icons(&self, set_name: &str) -> Result<Vec<String>, IconError> {
        let state = self.read_state();
        let idx = state
            .index_of(set_name)
            .ok_or_else(|| IconError::UnknownSet(set_name.to_string()))?;
        state.sets[idx].list_icons()
    }

    /// Returns up to `limit` (name, reference) pairs from one set.
    ///
    /// # Errors
    ///
    /// Returns [`IconError::UnknownSet`] if no set has that name.
    pub fn preview(&self, set_name: &str, limit: usize) -> Result<Vec<(String, String)>, IconError> {
        let state = self.read_state();
        let idx = state
            .index_of(set_name)
            .ok_or_else(|| IconError::UnknownSet(set_name.to_string()))?;
        Ok(state.sets[idx].preview(limit))
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.read_cache().len()
    }

    /// Drops all cached resolutions.
    pub fn clear_cache(&self) {
        self.write_cache().clear();
    }
}

/// Queries one set, recording the attempt. Provider errors count as not found.
fn try_set(set: &IconSet, name: &str, chain: &mut Vec<String>) -> Option<String> {
    chain.push(set.name().to_string());
    match set.lookup(name) {
        Ok(found) => found,
        Err(e) => {
            debug!("Icon set '{}' failed to look up '{}': {}", set.name(), name, e);
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
