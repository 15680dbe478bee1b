//! Unicode glyph icons.
//!
//! The glyph table is total: every name resolves, unknown ones to
//! [`UNKNOWN_GLYPH`]. This makes the glyph set the terminal fallback of
//! icon resolution.

/// Glyph returned for names the table does not know.
pub const UNKNOWN_GLYPH: &str = "❓";

const GLYPHS: &[(&str, &str)] = &[
    // Status
    ("info", "ℹ️"),
    ("warning", "⚠️"),
    ("error", "❌"),
    ("success", "✅"),
    ("question", "❓"),
    ("valid", "✓"),
    ("invalid", "✗"),
    // Actions
    ("save", "💾"),
    ("load", "📥"),
    ("open", "📂"),
    ("close", "❌"),
    ("edit", "✏️"),
    ("delete", "🗑️"),
    ("add", "➕"),
    ("remove", "➖"),
    ("copy", "📋"),
    ("cut", "✂️"),
    ("paste", "📌"),
    // Devices
    ("mic", "🎤"),
    ("camera", "📷"),
    ("speaker", "🔊"),
    ("headphones", "🎧"),
    ("keyboard", "⌨️"),
    ("mouse", "🖱️"),
    ("monitor", "🖥️"),
    ("printer", "🖨️"),
    ("computer", "💻"),
    // Media
    ("audio", "🔊"),
    ("video", "📹"),
    ("image", "🖼️"),
    ("document", "📄"),
    ("folder", "📁"),
    ("file", "📄"),
    ("music", "🎵"),
    ("movie", "🎬"),
    ("archive", "📦"),
    // Network
    ("network", "🌐"),
    ("internet", "🌍"),
    ("wifi", "📶"),
    ("bluetooth", "📘"),
    ("email", "✉️"),
    ("download", "⬇️"),
    ("upload", "⬆️"),
    ("sync", "🔄"),
    // System
    ("settings", "⚙️"),
    ("preferences", "🔧"),
    ("user", "👤"),
    ("group", "👥"),
    ("security", "🔒"),
    ("lock", "🔒"),
    ("unlock", "🔓"),
    ("key", "🔑"),
    ("password", "🔐"),
    // Applications
    ("terminal", "💻"),
    ("calculator", "🧮"),
    ("calendar", "📅"),
    ("clock", "🕐"),
    ("search", "🔍"),
    ("notification", "🔔"),
    ("home", "🏠"),
    ("work", "💼"),
    ("games", "🎮"),
    // Process states
    ("running", "▶️"),
    ("stopped", "⏹️"),
    ("paused", "⏸️"),
    ("waiting", "⏳"),
    ("complete", "✅"),
    ("failed", "❌"),
    ("loading", "⏳"),
    // Navigation
    ("up", "⬆️"),
    ("down", "⬇️"),
    ("left", "⬅️"),
    ("right", "➡️"),
    ("next", "⏭️"),
    ("previous", "⏮️"),
    ("forward", "⏩"),
    ("backward", "⏪"),
    // Symbols
    ("star", "⭐"),
    ("heart", "❤️"),
    ("check", "✓"),
    ("cross", "✗"),
    ("plus", "+"),
    ("minus", "-"),
    ("equals", "="),
    ("percent", "%"),
    ("at", "@"),
    ("hash", "#"),
    ("dollar", "$"),
    // Technical
    ("code", "💻"),
    ("bug", "🐛"),
    ("gear", "⚙️"),
    ("wrench", "🔧"),
    ("hammer", "🔨"),
    ("electric", "⚡"),
    ("battery", "🔋"),
    ("signal", "📶"),
    ("antenna", "📡"),
];

const ALIASES: &[(&str, &str)] = &[
    ("information", "info"),
    ("alert", "warning"),
    ("fail", "error"),
    ("ok", "success"),
    ("help", "question"),
    ("microphone", "mic"),
    ("volume", "speaker"),
    ("screen", "monitor"),
    ("config", "settings"),
    ("configure", "settings"),
    ("person", "user"),
    ("people", "group"),
    ("locked", "lock"),
    ("unlocked", "unlock"),
    ("cmd", "terminal"),
    ("shell", "terminal"),
    ("find", "search"),
    ("bell", "notification"),
    ("house", "home"),
    ("office", "work"),
    ("play", "running"),
    ("stop", "stopped"),
    ("pause", "paused"),
    ("done", "complete"),
    ("finish", "complete"),
    ("broken", "failed"),
];

/// Returns the glyph for a name or one of its aliases, if the table has one.
#[must_use]
pub fn known_glyph(name: &str) -> Option<&'static str> {
    let lookup = |key: &str| {
        GLYPHS
            .iter()
            .find(|(n, _)| *n == key)
            .map(|(_, glyph)| *glyph)
    };

    lookup(name).or_else(|| {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .and_then(|(_, target)| lookup(target))
    })
}

/// Returns the glyph for any name, falling back to [`UNKNOWN_GLYPH`].
#[must_use]
pub fn glyph_for(name: &str) -> &'static str {
    known_glyph(name).unwrap_or(UNKNOWN_GLYPH)
}

/// Returns all canonical names in the table, sorted.
#[must_use]
pub fn glyph_names() -> Vec<String> {
    let mut names: Vec<String> = GLYPHS.iter().map(|(n, _)| n.to_string()).collect();
    names.sort();
    names
}

/// Returns true if `value` looks like a literal glyph rather than a name.
///
/// A literal glyph is at most four characters long and contains a
/// non-ASCII character.
#[must_use]
pub fn is_literal_glyph(value: &str) -> bool {
    let count = value.chars().count();
    count > 0 && count <= 4 && !value.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_names_have_glyphs() {
        for name in ["info", "warning", "error", "success", "question"] {
            assert!(known_glyph(name).is_some(), "missing glyph for {}", name);
        }
    }

    #[test]
    fn test_aliases_resolve_to_target() {
        assert_eq!(known_glyph("information"), known_glyph("info"));
        assert_eq!(known_glyph("bell"), Some("🔔"));
        assert_eq!(known_glyph("microphone"), Some("🎤"));
    }

    #[test]
    fn test_table_is_total() {
        assert_eq!(known_glyph("no-such-icon"), None);
        assert_eq!(glyph_for("no-such-icon"), UNKNOWN_GLYPH);
        assert_eq!(glyph_for("mic"), "🎤");
    }

    #[test]
    fn test_glyph_names_sorted_and_unique() {
        let names = glyph_names();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert!(names.contains(&"notification".to_string()));
    }

    #[test]
    fn test_is_literal_glyph() {
        assert!(is_literal_glyph("🎙"));
        assert!(is_literal_glyph("ℹ️"));
        assert!(!is_literal_glyph("info"));
        assert!(!is_literal_glyph(""));
        assert!(!is_literal_glyph("ünïcödé"));
    }
}
