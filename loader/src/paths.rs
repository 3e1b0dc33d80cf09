//! Where fragments live on disk.
//!
//! A [`PathCatalog`] names two things: the app config directory holding the
//! global fragment files, and the ordered list of root directories that are
//! probed at `<root>/<app>/<kind>`. Roots later in the list take precedence.
//!
//! [`PathCatalog::discover`] resolves these the XDG way:
//!
//! 1. every entry of `XDG_DATA_DIRS` (default `/usr/local/share:/usr/share`);
//! 2. the user data directory;
//! 3. the user config directory.
//!
//! The config directory defaults to `<user config dir>/<app>` and can be
//! overridden with `LEADERKIT_CONFIG_DIR`.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::kind::FragmentKind;

/// Environment variable overriding the app config directory.
pub const CONFIG_DIR_ENV: &str = "LEADERKIT_CONFIG_DIR";

/// Default application name used for directory lookups.
pub const DEFAULT_APP_NAME: &str = "leaderkit";

/// Fallback for an unset or empty `XDG_DATA_DIRS`.
#[cfg(unix)]
const DEFAULT_DATA_DIRS: &[&str] = &["/usr/local/share", "/usr/share"];
#[cfg(not(unix))]
const DEFAULT_DATA_DIRS: &[&str] = &[];

/// Resolved fragment locations for one application.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use leaderkit_loader::{LeaderKind, PathCatalog};
///
/// let catalog = PathCatalog::new(
///     "k9s",
///     "/home/me/.config/k9s",
///     vec![PathBuf::from("/usr/share"), PathBuf::from("/home/me/.local/share")],
/// );
/// assert_eq!(
///     catalog.global_file(&LeaderKind),
///     PathBuf::from("/home/me/.config/k9s/leaders.yaml")
/// );
/// assert_eq!(
///     catalog.fragment_dirs(&LeaderKind)[1],
///     PathBuf::from("/home/me/.local/share/k9s/leaders")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCatalog {
    app_name: String,
    config_dir: PathBuf,
    roots: Vec<PathBuf>,
}

impl PathCatalog {
    /// Creates a catalog from explicit locations.
    pub fn new(
        app_name: impl Into<String>,
        config_dir: impl Into<PathBuf>,
        roots: Vec<PathBuf>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            config_dir: config_dir.into(),
            roots,
        }
    }

    /// Resolves locations from the environment and platform directories.
    pub fn discover(app_name: &str) -> Self {
        let base = BaseDirs::new();

        let config_dir = match env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => base
                .as_ref()
                .map(|b| b.config_dir().join(app_name))
                .unwrap_or_else(|| PathBuf::from(app_name)),
        };

        let mut roots = data_dirs(env::var_os("XDG_DATA_DIRS").as_deref());
        if let Some(base) = &base {
            roots.push(base.data_dir().to_path_buf());
            roots.push(base.config_dir().to_path_buf());
        }

        Self::new(app_name, config_dir, roots)
    }

    /// Application name used as the directory segment under each root.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Directory holding the global fragment files.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Root directories in ascending precedence.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Appends a root with the highest precedence so far.
    pub fn push_root(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    /// Replaces every root.
    pub fn set_roots(&mut self, roots: Vec<PathBuf>) {
        self.roots = roots;
    }

    /// The global fragment file for `kind`.
    pub fn global_file<K: FragmentKind>(&self, kind: &K) -> PathBuf {
        self.config_dir.join(kind.global_file_name())
    }

    /// `<root>/<app>/<kind>` for every root, in precedence order.
    pub fn fragment_dirs<K: FragmentKind>(&self, kind: &K) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(&self.app_name).join(kind.dir_name()))
            .collect()
    }
}

/// Parses an `XDG_DATA_DIRS` value. Relative entries are ignored.
pub fn data_dirs(value: Option<&OsStr>) -> Vec<PathBuf> {
    let parsed: Vec<PathBuf> = value
        .map(|v| {
            env::split_paths(v)
                .filter(|p| p.is_absolute())
                .collect()
        })
        .unwrap_or_default();

    if parsed.is_empty() {
        DEFAULT_DATA_DIRS.iter().map(PathBuf::from).collect()
    } else {
        parsed
    }
}
