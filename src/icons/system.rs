//! XDG icon theme lookup.
//!
//! Implements the parts of the freedesktop icon theme lookup needed to
//! find a file for a symbolic name:
//!
//! - Search roots: `$XDG_DATA_HOME/icons`, `$XDG_DATA_DIRS/*/icons`,
//!   `~/.icons`, then the flat `/usr/share/pixmaps` directory
//! - Icon directories come from `index.theme` (`Directories=`, `Size=`,
//!   `Scale=`, `Type=`, `MinSize=`, `MaxSize=`, `Threshold=`) and are
//!   tried by size distance, closest first
//! - Themes without an index are scanned and sized by directory name
//!   (`48x48/<context>`, `<context>/48`, `scalable/`)
//! - `Inherits=` from `index.theme`, always ending at `hicolor`
//!
//! The ordered directory list for the whole inheritance chain is built on
//! first lookup and reused afterwards.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

use super::error::IconError;

/// Theme every lookup falls back to.
pub const HICOLOR: &str = "hicolor";

/// Themes tried when no theme is configured.
const AUTO_THEMES: &[&str] = &["breeze", "Adwaita", HICOLOR];

const EXTENSIONS: &[&str] = &["svg", "png", "xpm"];

/// Section of `index.theme` holding the theme-wide keys.
const THEME_SECTION: &str = "Icon Theme";

/// `Threshold=` default for threshold directories.
const DEFAULT_THRESHOLD: u32 = 2;

/// Symbolic name to freedesktop icon names, best first.
const FREEDESKTOP_NAMES: &[(&str, &[&str])] = &[
    ("info", &["dialog-information", "help-info"]),
    ("warning", &["dialog-warning"]),
    ("error", &["dialog-error"]),
    ("success", &["dialog-ok", "emblem-ok-symbolic", "emblem-default"]),
    ("question", &["dialog-question", "help-about"]),
    ("save", &["document-save"]),
    ("open", &["document-open", "folder-open"]),
    ("close", &["window-close"]),
    ("edit", &["document-edit", "accessories-text-editor"]),
    ("delete", &["edit-delete"]),
    ("add", &["list-add"]),
    ("remove", &["list-remove"]),
    ("copy", &["edit-copy"]),
    ("cut", &["edit-cut"]),
    ("paste", &["edit-paste"]),
    ("mic", &["audio-input-microphone"]),
    ("microphone", &["audio-input-microphone"]),
    ("camera", &["camera-photo", "camera-web"]),
    ("speaker", &["audio-speakers", "audio-volume-high"]),
    ("headphones", &["audio-headphones"]),
    ("keyboard", &["input-keyboard"]),
    ("mouse", &["input-mouse"]),
    ("monitor", &["video-display"]),
    ("printer", &["printer"]),
    ("computer", &["computer"]),
    ("audio", &["audio-x-generic"]),
    ("video", &["video-x-generic"]),
    ("image", &["image-x-generic"]),
    ("document", &["text-x-generic", "x-office-document"]),
    ("folder", &["folder"]),
    ("file", &["text-x-generic"]),
    ("music", &["audio-x-generic"]),
    ("archive", &["package-x-generic"]),
    ("network", &["network-wired", "network-workgroup"]),
    ("internet", &["applications-internet"]),
    ("wifi", &["network-wireless"]),
    ("bluetooth", &["bluetooth"]),
    ("email", &["mail-message", "internet-mail"]),
    ("download", &["go-down", "download"]),
    ("upload", &["go-up", "upload"]),
    ("sync", &["view-refresh"]),
    ("settings", &["preferences-system", "configure"]),
    ("preferences", &["preferences-desktop"]),
    ("user", &["user-identity", "system-users"]),
    ("group", &["system-users"]),
    ("security", &["security-high"]),
    ("lock", &["system-lock-screen", "changes-prevent"]),
    ("unlock", &["changes-allow"]),
    ("key", &["dialog-password"]),
    ("terminal", &["utilities-terminal"]),
    ("calculator", &["accessories-calculator"]),
    ("calendar", &["x-office-calendar"]),
    ("clock", &["preferences-system-time"]),
    ("search", &["edit-find", "system-search"]),
    ("notification", &["preferences-desktop-notification"]),
    ("home", &["go-home", "user-home"]),
    ("running", &["media-playback-start"]),
    ("stopped", &["media-playback-stop"]),
    ("paused", &["media-playback-pause"]),
    ("battery", &["battery"]),
];

/// A freedesktop icon theme with its search configuration.
#[derive(Debug, Clone)]
pub struct SystemTheme {
    theme: String,
    size: u32,
    prefer_scalable: bool,
    roots: Vec<PathBuf>,
    pixmaps: Option<PathBuf>,
    search_order: OnceLock<Vec<PathBuf>>,
}

impl PartialEq for SystemTheme {
    fn eq(&self, other: &Self) -> bool {
        self.theme == other.theme
            && self.size == other.size
            && self.prefer_scalable == other.prefer_scalable
            && self.roots == other.roots
            && self.pixmaps == other.pixmaps
    }
}

impl Eq for SystemTheme {}

impl SystemTheme {
    /// Creates a theme lookup over the standard XDG search roots.
    ///
    /// When `theme` is `None` the first installed of `breeze`, `Adwaita`
    /// and `hicolor` is used.
    #[must_use]
    pub fn new(theme: Option<&str>, size: u32, prefer_scalable: bool) -> Self {
        Self::with_roots(
            theme,
            size,
            prefer_scalable,
            default_search_roots(),
            Some(PathBuf::from("/usr/share/pixmaps")),
        )
    }

    /// Creates a theme lookup over explicit search roots.
    #[must_use]
    pub fn with_roots(
        theme: Option<&str>,
        size: u32,
        prefer_scalable: bool,
        roots: Vec<PathBuf>,
        pixmaps: Option<PathBuf>,
    ) -> Self {
        let theme = match theme {
            Some(name) => name.to_string(),
            None => detect_theme(&roots),
        };
        Self {
            theme,
            size,
            prefer_scalable,
            roots,
            pixmaps,
            search_order: OnceLock::new(),
        }
    }

    /// Returns the theme name.
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Returns true if the theme directory exists under some root.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.theme_dirs(&self.theme).next().is_some()
    }

    /// Resolves a symbolic name to an icon file.
    ///
    /// Mapped freedesktop names are tried first, then the raw name.
    ///
    /// # Errors
    ///
    /// Returns an error if a theme directory exists but cannot be read.
    pub fn lookup(&self, name: &str) -> Result<Option<PathBuf>, IconError> {
        if !self.is_available() {
            return Ok(None);
        }

        let candidates = candidate_names(name);

        for dir in self.search_order()? {
            if let Some(found) = find_in_dir(dir, &candidates) {
                debug!("Theme '{}' provides '{}' at {}", self.theme, name, found.display());
                return Ok(Some(found));
            }
        }

        Ok(self
            .pixmaps
            .as_deref()
            .and_then(|dir| find_in_dir(dir, &candidates)))
    }

    /// Lists icon names in the theme itself (not inherited themes).
    ///
    /// # Errors
    ///
    /// Returns an error if a theme directory cannot be read.
    pub fn list_icons(&self) -> Result<Vec<String>, IconError> {
        let mut names = Vec::new();
        for theme_dir in self.theme_dirs(&self.theme) {
            for dir in self.ordered_subdirs(&theme_dir)? {
                let Ok(entries) = std::fs::read_dir(&dir) else {
                    continue;
                };
                for entry in entries.filter_map(Result::ok) {
                    let path = entry.path();
                    let has_icon_ext = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| EXTENSIONS.contains(&e));
                    if let (true, Some(stem)) = (has_icon_ext, path.file_stem()) {
                        names.push(stem.to_string_lossy().into_owned());
                    }
                }
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Returns the theme followed by its `Inherits=` ancestors, ending at `hicolor`.
    #[must_use]
    pub fn inheritance_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([self.theme.clone()]);

        while let Some(theme) = queue.pop_front() {
            if !seen.insert(theme.clone()) {
                continue;
            }
            queue.extend(self.read_inherits(&theme));
            chain.push(theme);
        }

        if !seen.contains(HICOLOR) {
            chain.push(HICOLOR.to_string());
        }
        chain
    }

    /// Icon directories of the whole inheritance chain, in lookup order.
    fn search_order(&self) -> Result<&[PathBuf], IconError> {
        if let Some(order) = self.search_order.get() {
            return Ok(order.as_slice());
        }

        let mut order = Vec::new();
        for theme in self.inheritance_chain() {
            for theme_dir in self.theme_dirs(&theme) {
                order.extend(self.ordered_subdirs(&theme_dir)?);
            }
        }
        debug!("Theme '{}' searches {} directories", self.theme, order.len());
        Ok(self.search_order.get_or_init(|| order).as_slice())
    }

    fn theme_dirs<'a>(&'a self, theme: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.roots
            .iter()
            .map(move |root| root.join(theme))
            .filter(|dir| dir.is_dir())
    }

    fn read_inherits(&self, theme: &str) -> Vec<String> {
        self.theme_dirs(theme)
            .find_map(|dir| read_index(&dir))
            .map(|index| index.inherits)
            .unwrap_or_default()
    }

    /// Returns the icon directories of one theme dir, best match first.
    fn ordered_subdirs(&self, theme_dir: &Path) -> Result<Vec<PathBuf>, IconError> {
        let mut dirs = match read_index(theme_dir) {
            Some(index) if !index.directories.is_empty() => index.directories,
            _ => scan_layout(theme_dir)?,
        };

        dirs.sort_by_cached_key(|dir| (self.rank(dir), dir.path.clone()));
        Ok(dirs.into_iter().map(|dir| dir.path).collect())
    }

    /// Sort key: preferred scalable dirs, size distance, scale mismatch, fixed before scalable.
    fn rank(&self, dir: &IconDir) -> (bool, u32, bool, bool) {
        let scalable = dir.kind == DirType::Scalable;
        (
            !(scalable && self.prefer_scalable),
            dir.size_distance(self.size),
            dir.scale != 1,
            scalable,
        )
    }
}

// ============================================================================
// index.theme
// ============================================================================

/// How a directory's icons may be scaled, from `Type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirType {
    Fixed,
    Scalable,
    Threshold,
}

/// One icon directory of a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IconDir {
    path: PathBuf,
    size: u32,
    scale: u32,
    kind: DirType,
    min_size: u32,
    max_size: u32,
    threshold: u32,
}

impl IconDir {
    /// Builds a directory from its `index.theme` section; `None` without `Size=`.
    fn from_section(theme_dir: &Path, name: &str, keys: &HashMap<String, String>) -> Option<Self> {
        let number = |key: &str| keys.get(key).and_then(|v| v.parse::<u32>().ok());
        let size = number("Size")?;
        let kind = match keys.get("Type").map(String::as_str) {
            Some("Fixed") => DirType::Fixed,
            Some("Scalable") => DirType::Scalable,
            _ => DirType::Threshold,
        };
        Some(Self {
            path: theme_dir.join(name),
            size,
            scale: number("Scale").unwrap_or(1).max(1),
            kind,
            min_size: number("MinSize").unwrap_or(size),
            max_size: number("MaxSize").unwrap_or(size),
            threshold: number("Threshold").unwrap_or(DEFAULT_THRESHOLD),
        })
    }

    /// Distance in pixels between this directory and a requested size at scale 1.
    fn size_distance(&self, requested: u32) -> u32 {
        let scaled = |v: u32| v.saturating_mul(self.scale);
        match self.kind {
            DirType::Fixed => scaled(self.size).abs_diff(requested),
            DirType::Scalable => {
                outside(requested, scaled(self.min_size), scaled(self.max_size))
            }
            DirType::Threshold => {
                let low = scaled(self.size.saturating_sub(self.threshold));
                let high = scaled(self.size.saturating_add(self.threshold));
                outside(requested, low, high)
            }
        }
    }
}

/// How far `value` lies outside `low..=high`.
fn outside(value: u32, low: u32, high: u32) -> u32 {
    if value < low {
        low - value
    } else if value > high {
        value - high
    } else {
        0
    }
}

/// The parts of an `index.theme` file the lookup uses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct ThemeIndex {
    inherits: Vec<String>,
    directories: Vec<IconDir>,
}

fn read_index(theme_dir: &Path) -> Option<ThemeIndex> {
    let content = std::fs::read_to_string(theme_dir.join("index.theme")).ok()?;
    Some(parse_index(theme_dir, &content))
}

/// Parses an `index.theme`. Keys before any section header count as `[Icon Theme]`.
fn parse_index(theme_dir: &Path, content: &str) -> ThemeIndex {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = THEME_SECTION.to_string();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            sections
                .entry(current.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    let list = |key: &str| -> Vec<String> {
        sections
            .get(THEME_SECTION)
            .and_then(|keys| keys.get(key))
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut names = list("Directories");
    names.extend(list("ScaledDirectories"));
    let mut seen = HashSet::new();
    let directories = names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .filter_map(|name| IconDir::from_section(theme_dir, name, sections.get(name)?))
        .collect();

    ThemeIndex {
        inherits: list("Inherits"),
        directories,
    }
}

// ============================================================================
// Index-less themes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirKind {
    Sized(u32),
    Scalable,
    Context,
}

/// Classifies `48x48`, `48x48@2`, `48`, `scalable` and `symbolic` directory names.
fn classify(name: &str) -> DirKind {
    if name == "scalable" || name == "symbolic" {
        return DirKind::Scalable;
    }
    let (base, scale) = name.split_once('@').unwrap_or((name, ""));
    let size = base.split('x').next().unwrap_or(base);
    match size.parse::<u32>() {
        Ok(px) if scale.is_empty() => DirKind::Sized(px),
        Ok(px) => DirKind::Sized(px.saturating_mul(scale.parse().unwrap_or(1))),
        Err(_) => DirKind::Context,
    }
}

/// Builds a layout for a theme without `index.theme` from directory names.
///
/// Layouts are either `<size>/<context>` or `<context>/<size>`.
fn scan_layout(theme_dir: &Path) -> Result<Vec<IconDir>, IconError> {
    let mut dirs = Vec::new();

    for (first, first_path) in read_subdirs(theme_dir)? {
        let first_kind = classify(&first);
        for (second, second_path) in read_subdirs(&first_path)? {
            let kind = match first_kind {
                DirKind::Context => classify(&second),
                sized => sized,
            };
            let dir = match kind {
                DirKind::Sized(size) => IconDir {
                    path: second_path,
                    size,
                    scale: 1,
                    kind: DirType::Fixed,
                    min_size: size,
                    max_size: size,
                    threshold: DEFAULT_THRESHOLD,
                },
                DirKind::Scalable => IconDir {
                    path: second_path,
                    size: 0,
                    scale: 1,
                    kind: DirType::Scalable,
                    min_size: 1,
                    max_size: u32::MAX,
                    threshold: DEFAULT_THRESHOLD,
                },
                DirKind::Context => continue,
            };
            dirs.push(dir);
        }
    }

    Ok(dirs)
}

fn read_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, IconError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(IconError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    Ok(entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            Some((name, entry.path()))
        })
        .collect())
}

fn find_in_dir(dir: &Path, candidates: &[String]) -> Option<PathBuf> {
    candidates.iter().find_map(|name| {
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
    })
}

fn candidate_names(name: &str) -> Vec<String> {
    let mut names: Vec<String> = FREEDESKTOP_NAMES
        .iter()
        .find(|(symbolic, _)| *symbolic == name)
        .map(|(_, mapped)| mapped.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
    names
}

fn detect_theme(roots: &[PathBuf]) -> String {
    AUTO_THEMES
        .iter()
        .find(|theme| roots.iter().any(|root| root.join(theme).is_dir()))
        .unwrap_or(&HICOLOR)
        .to_string()
}

/// Returns the XDG icon search roots in lookup order.
#[must_use]
pub fn default_search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(data_home) = dirs::data_dir() {
        roots.push(data_home.join("icons"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    for dir in data_dirs.split(':').filter(|d| !d.is_empty()) {
        roots.push(PathBuf::from(dir).join("icons"));
    }

    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".icons"));
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: PathBuf) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    fn theme_at(root: &TempDir, theme: &str) -> SystemTheme {
        SystemTheme::with_roots(Some(theme), 48, false, vec![root.path().to_path_buf()], None)
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("48x48"), DirKind::Sized(48));
        assert_eq!(classify("24x24@2"), DirKind::Sized(48));
        assert_eq!(classify("16"), DirKind::Sized(16));
        assert_eq!(classify("scalable"), DirKind::Scalable);
        assert_eq!(classify("symbolic"), DirKind::Scalable);
        assert_eq!(classify("actions"), DirKind::Context);
    }

    #[test]
    fn test_parse_index() {
        let index = "\
[Icon Theme]
Name=Test
Inherits = breeze, hicolor
Directories=small/status,vector/status,nosize
ScaledDirectories=small@2/status

[small/status]
Size=16
Type=Fixed

[vector/status]
Size=64
MinSize=8
MaxSize=512
Type=Scalable

[nosize]
Context=Status

[small@2/status]
Size=16
Scale=2
";
        let parsed = parse_index(Path::new("/t"), index);
        assert_eq!(parsed.inherits, vec!["breeze", "hicolor"]);

        let paths: Vec<_> = parsed.directories.iter().map(|d| d.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/t/small/status"),
                PathBuf::from("/t/vector/status"),
                PathBuf::from("/t/small@2/status"),
            ]
        );
        assert_eq!(parsed.directories[1].kind, DirType::Scalable);
        assert_eq!(parsed.directories[2].kind, DirType::Threshold);
        assert_eq!(parsed.directories[2].scale, 2);
    }

    #[test]
    fn test_keys_before_header_belong_to_theme() {
        let parsed = parse_index(Path::new("/t"), "Inherits=parent\n");
        assert_eq!(parsed.inherits, vec!["parent"]);
        assert!(parsed.directories.is_empty());
        assert_eq!(parse_index(Path::new("/t"), "[Icon Theme]\nName=X\n"), ThemeIndex::default());
    }

    #[test]
    fn test_size_distance() {
        let dir = |kind, size, min, max, scale| IconDir {
            path: PathBuf::new(),
            size,
            scale,
            kind,
            min_size: min,
            max_size: max,
            threshold: DEFAULT_THRESHOLD,
        };
        assert_eq!(dir(DirType::Fixed, 32, 32, 32, 1).size_distance(48), 16);
        assert_eq!(dir(DirType::Fixed, 24, 24, 24, 2).size_distance(48), 0);
        assert_eq!(dir(DirType::Scalable, 64, 8, 512, 1).size_distance(48), 0);
        assert_eq!(dir(DirType::Scalable, 64, 64, 512, 1).size_distance(48), 16);
        assert_eq!(dir(DirType::Threshold, 48, 48, 48, 1).size_distance(50), 0);
        assert_eq!(dir(DirType::Threshold, 48, 48, 48, 1).size_distance(56), 6);
    }

    #[test]
    fn test_candidate_names_include_raw_name() {
        assert_eq!(candidate_names("info"), vec!["dialog-information", "help-info", "info"]);
        assert_eq!(candidate_names("firefox"), vec!["firefox"]);
    }

    #[test]
    fn test_missing_theme_is_unavailable() {
        let root = TempDir::new().unwrap();
        let theme = theme_at(&root, "nothing-here");
        assert!(!theme.is_available());
        assert_eq!(theme.lookup("info").unwrap(), None);
    }

    #[test]
    fn test_lookup_maps_symbolic_names() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("test/48x48/status/dialog-information.png");
        touch(file.clone());

        let theme = theme_at(&root, "test");
        assert!(theme.is_available());
        assert_eq!(theme.lookup("info").unwrap(), Some(file));
        assert_eq!(theme.lookup("warning").unwrap(), None);
    }

    #[test]
    fn test_sized_before_scalable() {
        let root = TempDir::new().unwrap();
        let sized = root.path().join("test/48x48/status/dialog-error.png");
        let scalable = root.path().join("test/scalable/status/dialog-error.svg");
        touch(sized.clone());
        touch(scalable.clone());

        let theme = theme_at(&root, "test");
        assert_eq!(theme.lookup("error").unwrap(), Some(sized));

        let theme =
            SystemTheme::with_roots(Some("test"), 48, true, vec![root.path().to_path_buf()], None);
        assert_eq!(theme.lookup("error").unwrap(), Some(scalable));
    }

    #[test]
    fn test_closest_size_wins() {
        let root = TempDir::new().unwrap();
        let small = root.path().join("test/status/16/dialog-warning.svg");
        let close = root.path().join("test/status/32/dialog-warning.svg");
        touch(small);
        touch(close.clone());

        let theme = theme_at(&root, "test");
        assert_eq!(theme.lookup("warning").unwrap(), Some(close));
    }

    #[test]
    fn test_index_theme_sizes_unconventional_dirs() {
        let root = TempDir::new().unwrap();
        let tiny = root.path().join("test/tiny/dialog-warning.png");
        let big = root.path().join("test/big/dialog-warning.png");
        touch(tiny);
        touch(big.clone());
        std::fs::write(
            root.path().join("test/index.theme"),
            "[Icon Theme]\nDirectories=tiny,big\n\n[tiny]\nSize=16\nType=Fixed\n\n[big]\nSize=48\nType=Fixed\n",
        )
        .unwrap();

        let theme = theme_at(&root, "test");
        assert_eq!(theme.lookup("warning").unwrap(), Some(big));
    }

    #[test]
    fn test_index_theme_limits_searched_dirs() {
        let root = TempDir::new().unwrap();
        touch(root.path().join("test/48x48/status/dialog-error.png"));
        let listed = root.path().join("test/icons/dialog-question.svg");
        touch(listed.clone());
        std::fs::write(
            root.path().join("test/index.theme"),
            "[Icon Theme]\nDirectories=icons\n\n[icons]\nSize=48\nType=Scalable\n",
        )
        .unwrap();

        let theme = theme_at(&root, "test");
        assert_eq!(theme.lookup("question").unwrap(), Some(listed));
        assert_eq!(theme.lookup("error").unwrap(), None);
    }

    #[test]
    fn test_search_order_is_built_once() {
        let root = TempDir::new().unwrap();
        let icon = root.path().join("test/48x48/status/dialog-information.png");
        touch(icon.clone());

        let theme = theme_at(&root, "test");
        assert_eq!(theme.lookup("info").unwrap(), Some(icon));
        let order = theme.search_order().unwrap().to_vec();

        // A directory added later is not part of the cached order.
        touch(root.path().join("test/16x16/status/dialog-warning.png"));
        assert_eq!(theme.search_order().unwrap(), order.as_slice());
        assert_eq!(theme.lookup("warning").unwrap(), None);
    }

    #[test]
    fn test_follows_inherits_to_hicolor() {
        let root = TempDir::new().unwrap();
        touch(root.path().join("child/48x48/apps/placeholder.png"));
        std::fs::write(
            root.path().join("child/index.theme"),
            "[Icon Theme]\nInherits=parent\n",
        )
        .unwrap();
        let parent_icon = root.path().join("parent/48x48/status/dialog-question.png");
        touch(parent_icon.clone());
        let hicolor_icon = root.path().join("hicolor/scalable/apps/firefox.svg");
        touch(hicolor_icon.clone());

        let theme = theme_at(&root, "child");
        assert_eq!(theme.inheritance_chain(), vec!["child", "parent", "hicolor"]);
        assert_eq!(theme.lookup("question").unwrap(), Some(parent_icon));
        assert_eq!(theme.lookup("firefox").unwrap(), Some(hicolor_icon));
    }

    #[test]
    fn test_inherits_cycle_terminates() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("a")).unwrap();
        std::fs::create_dir_all(root.path().join("b")).unwrap();
        std::fs::write(root.path().join("a/index.theme"), "Inherits=b\n").unwrap();
        std::fs::write(root.path().join("b/index.theme"), "Inherits=a\n").unwrap();

        let theme = theme_at(&root, "a");
        assert_eq!(theme.inheritance_chain(), vec!["a", "b", "hicolor"]);
    }

    #[test]
    fn test_pixmaps_fallback() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("icons/test")).unwrap();
        let pixmap = root.path().join("pixmaps/myapp.png");
        touch(pixmap.clone());

        let theme = SystemTheme::with_roots(
            Some("test"),
            48,
            false,
            vec![root.path().join("icons")],
            Some(root.path().join("pixmaps")),
        );
        assert_eq!(theme.lookup("myapp").unwrap(), Some(pixmap));
    }

    #[test]
    fn test_detect_theme() {
        let root = TempDir::new().unwrap();
        assert_eq!(detect_theme(&[root.path().to_path_buf()]), "hicolor");

        std::fs::create_dir_all(root.path().join("Adwaita")).unwrap();
        assert_eq!(detect_theme(&[root.path().to_path_buf()]), "Adwaita");
    }

    #[test]
    fn test_list_icons() {
        let root = TempDir::new().unwrap();
        touch(root.path().join("test/48x48/status/dialog-error.png"));
        touch(root.path().join("test/scalable/status/dialog-error.svg"));
        touch(root.path().join("test/scalable/apps/terminal.svg"));
        touch(root.path().join("test/scalable/apps/notes.txt"));

        let theme = theme_at(&root, "test");
        assert_eq!(theme.list_icons().unwrap(), vec!["dialog-error", "terminal"]);
    }
}
