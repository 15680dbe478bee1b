//! TTL cache for icon resolutions.
//!
//! Entries are keyed by (active set, symbolic name). Expiry is checked on
//! read; there is no background sweeper.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::ResolvedIcon;

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A fresh entry
    Hit(ResolvedIcon),
    /// An entry exists but outlived the TTL
    Expired,
    /// No entry
    Miss,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    icon: ResolvedIcon,
}

/// Resolution cache with a fixed time-to-live.
#[derive(Debug, Clone)]
pub struct IconCache {
    ttl: Duration,
    entries: HashMap<(String, String), CacheEntry>,
}

impl IconCache {
    /// Creates an empty cache. A zero TTL disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the configured TTL.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns true if entries are ever stored.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Reads an entry without modifying the cache.
    #[must_use]
    pub fn lookup(&self, set: &str, name: &str) -> CacheLookup {
        match self.entries.get(&key(set, name)) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                CacheLookup::Hit(entry.icon.clone())
            }
            Some(_) => CacheLookup::Expired,
            None => CacheLookup::Miss,
        }
    }

    /// Stores a resolution.
    pub fn insert(&mut self, set: &str, name: &str, icon: ResolvedIcon) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            key(set, name),
            CacheEntry {
                stored_at: Instant::now(),
                icon,
            },
        );
    }

    /// Removes an entry if it has expired; returns true if one was removed.
    pub fn evict_if_expired(&mut self, set: &str, name: &str) -> bool {
        let k = key(set, name);
        let expired = self
            .entries
            .get(&k)
            .is_some_and(|entry| entry.stored_at.elapsed() >= self.ttl);
        if expired {
            self.entries.remove(&k);
        }
        expired
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key(set: &str, name: &str) -> (String, String) {
    (set.to_string(), name.to_string())
}
