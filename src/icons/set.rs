//! Icon set variants.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::bundled::BundledIcons;
use super::error::IconError;
use super::glyph;
use super::system::SystemTheme;
use super::SourceKind;

/// Name of the XDG theme icon set.
pub const SYSTEM_SET: &str = "system";

/// Name of the bundled SVG icon set.
pub const BUNDLED_SET: &str = "material";

/// Name of the unicode glyph icon set.
pub const GLYPH_SET: &str = "minimal";

/// Static description of an icon set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSetDescriptor {
    /// Set name
    pub name: String,
    /// Higher wins
    pub priority: i32,
    /// Names the set must provide to pass validation
    pub required_icon_names: BTreeSet<String>,
    /// Whether the set can be used on this system
    pub available: bool,
}

/// A named, prioritized provider of icons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSet {
    /// Freedesktop icon theme files.
    System(SystemTheme),
    /// Bundled SVG files.
    Bundled(BundledIcons),
    /// Unicode glyphs; total over all names.
    Glyph,
}

impl IconSet {
    /// Returns the set name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::System(_) => SYSTEM_SET,
            Self::Bundled(_) => BUNDLED_SET,
            Self::Glyph => GLYPH_SET,
        }
    }

    /// Returns the selection priority; higher wins.
    #[must_use]
    pub fn priority(&self) -> i32 {
        match self {
            Self::System(_) => 100,
            Self::Bundled(_) => 80,
            Self::Glyph => 10,
        }
    }

    /// Returns the kind of reference this set produces.
    #[must_use]
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::System(_) => SourceKind::System,
            Self::Bundled(_) => SourceKind::Bundled,
            Self::Glyph => SourceKind::Glyph,
        }
    }

    /// Returns true if the glyph set, which resolves every name.
    #[must_use]
    pub fn is_total(&self) -> bool {
        matches!(self, Self::Glyph)
    }

    /// Returns true if the set can be used on this system.
    #[must_use]
    pub fn is_available(&self) -> bool {
        match self {
            Self::System(theme) => theme.is_available(),
            Self::Bundled(icons) => icons.is_available(),
            Self::Glyph => true,
        }
    }

    /// Resolves a name within this set only.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's files cannot be read.
    pub fn lookup(&self, name: &str) -> Result<Option<String>, IconError> {
        let path = match self {
            Self::System(theme) => theme.lookup(name)?,
            Self::Bundled(icons) => icons.lookup(name)?,
            Self::Glyph => return Ok(Some(glyph::glyph_for(name).to_string())),
        };
        Ok(path.map(|p| p.to_string_lossy().into_owned()))
    }

    /// Returns the required names this set cannot resolve.
    ///
    /// Provider errors count as missing.
    #[must_use]
    pub fn missing_icons(&self, required: &BTreeSet<String>) -> BTreeSet<String> {
        required
            .iter()
            .filter(|name| !matches!(self.lookup(name), Ok(Some(_))))
            .cloned()
            .collect()
    }

    /// Lists the names this set provides.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's files cannot be read.
    pub fn list_icons(&self) -> Result<Vec<String>, IconError> {
        match self {
            Self::System(theme) => theme.list_icons(),
            Self::Bundled(icons) => icons.list_icons(),
            Self::Glyph => Ok(glyph::glyph_names()),
        }
    }

    /// Returns up to `limit` names with their resolved references.
    #[must_use]
    pub fn preview(&self, limit: usize) -> Vec<(String, String)> {
        self.list_icons()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|name| {
                let reference = self.lookup(&name).ok().flatten()?;
                Some((name, reference))
            })
            .take(limit)
            .collect()
    }

    /// Describes the set against a required-name set.
    #[must_use]
    pub fn describe(&self, required: &BTreeSet<String>) -> IconSetDescriptor {
        IconSetDescriptor {
            name: self.name().to_string(),
            priority: self.priority(),
            required_icon_names: required.clone(),
            available: self.is_available(),
        }
    }
}
