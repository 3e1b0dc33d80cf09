//! Recursive directory scanning.
//!
//! [`walk_fragments`] lazily yields every YAML file under a directory, and
//! [`DirectoryScanner`] feeds each of them to a [`FragmentLoader`], keeping
//! every failure instead of stopping at the first bad file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use leaderkit_core::SchemaValidator;
use tracing::debug;
use walkdir::WalkDir;

use crate::collection::Collection;
use crate::error::{CombinedError, LoadError};
use crate::fragment::FragmentLoader;
use crate::kind::FragmentKind;

/// Returns `true` for `.yml` and `.yaml` files.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use leaderkit_loader::is_fragment_file;
///
/// assert!(is_fragment_file(Path::new("leaders/pods.yaml")));
/// assert!(is_fragment_file(Path::new("pods.yml")));
/// assert!(!is_fragment_file(Path::new("pods.json")));
/// assert!(!is_fragment_file(Path::new("pods.YAML")));
/// ```
pub fn is_fragment_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("yml" | "yaml")
    )
}

/// Walks `dir` recursively, yielding fragment file paths.
///
/// Entries in a directory are visited in file-name order. Only regular files
/// and symlinks are yielded; symlinked directories are not descended into.
pub fn walk_fragments(dir: &Path) -> FragmentWalk {
    FragmentWalk {
        root: dir.to_path_buf(),
        inner: WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter(),
        failed: false,
    }
}

/// Lazy sequence of fragment paths under one root.
///
/// Yields `Err` once if the walk itself fails and ends right after it; the
/// rest of that tree is not visited.
pub struct FragmentWalk {
    root: PathBuf,
    inner: walkdir::IntoIter,
    failed: bool,
}

impl Iterator for FragmentWalk {
    type Item = Result<PathBuf, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    // FIFOs, sockets and device nodes would block or fail the read.
                    let file_type = entry.file_type();
                    let readable = file_type.is_file() || file_type.is_symlink();
                    if !readable || !is_fragment_file(entry.path()) {
                        continue;
                    }
                    return Some(Ok(entry.into_path()));
                }
                Err(source) => {
                    self.failed = true;
                    let path = source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    return Some(Err(LoadError::Traversal { path, source }));
                }
            }
        }
    }
}

/// Loads every fragment under a directory tree.
pub struct DirectoryScanner<'a, K, V> {
    loader: FragmentLoader<'a, K, V>,
}

impl<'a, K: FragmentKind, V: SchemaValidator> DirectoryScanner<'a, K, V> {
    /// Creates a scanner that loads files with `loader`.
    pub fn new(loader: FragmentLoader<'a, K, V>) -> Self {
        Self { loader }
    }

    /// Scans `dir`, merging every fragment found into `into`.
    ///
    /// A missing directory contributes nothing and reports nothing. One bad
    /// file never stops the scan; a failing walk stops only this tree.
    pub fn scan(&self, dir: &Path, into: &mut Collection<K::Entry>) -> CombinedError {
        let mut errors = CombinedError::new();

        if matches!(dir.try_exists(), Ok(false)) {
            debug!(dir = %dir.display(), "fragment dir absent, skipping");
            return errors;
        }

        for item in walk_fragments(dir) {
            match item {
                Ok(path) => errors.record(self.loader.load(&path, into)),
                Err(err) => errors.push(err),
            }
        }

        errors
    }
}
