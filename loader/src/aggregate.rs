//! Layered aggregation of fragments from every source.
//!
//! Sources are applied in a fixed order, each one on top of the previous:
//!
//! 1. the global fragment file;
//! 2. caller supplied override files, in the order given;
//! 3. when extra sources are enabled, every fragment directory in catalog
//!    order (later directories win).
//!
//! Failures never stop the pass. They are collected into a
//! [`CombinedError`] returned next to whatever was merged.
//!
//! # Example
//!
//! ```no_run
//! use leaderkit_loader::{LayeredLoader, LeaderKind, PathCatalog};
//!
//! let catalog = PathCatalog::discover("k9s");
//! let loaded = LayeredLoader::from_catalog(LeaderKind, &catalog).load_all(&[], true);
//! if let Some(errors) = loaded.error() {
//!     eprintln!("some leader fragments were skipped:\n{errors}");
//! }
//! for (scope, leader) in loaded.collection.sorted() {
//!     println!("{scope}: {} shortcuts", leader.shortcuts.len());
//! }
//! ```

use std::path::{Path, PathBuf};

use leaderkit_core::{BuiltinValidator, Leader, Plugin, SchemaValidator};
use tracing::debug;

use crate::collection::Collection;
use crate::error::CombinedError;
use crate::fragment::FragmentLoader;
use crate::kind::{FragmentKind, LeaderKind, PluginKind};
use crate::paths::PathCatalog;
use crate::scan::DirectoryScanner;

/// Result of one aggregation pass.
///
/// The collection holds every entry that loaded, even when `errors` is not
/// empty.
#[derive(Debug)]
pub struct Loaded<E> {
    /// Merged entries.
    pub collection: Collection<E>,
    /// Every failure encountered, in source order.
    pub errors: CombinedError,
}

impl<E> Loaded<E> {
    /// The combined error, or `None` if every source succeeded.
    pub fn error(&self) -> Option<&CombinedError> {
        if self.errors.is_empty() {
            None
        } else {
            Some(&self.errors)
        }
    }

    /// Splits into the collection and the optional combined error.
    pub fn into_parts(self) -> (Collection<E>, Option<CombinedError>) {
        (self.collection, self.errors.into_option())
    }
}

/// Discovers and merges fragments of kind `K` from layered sources.
#[derive(Debug, Clone)]
pub struct LayeredLoader<K, V = BuiltinValidator> {
    kind: K,
    validator: V,
    global_file: Option<PathBuf>,
    fragment_dirs: Vec<PathBuf>,
}

impl<K: FragmentKind> LayeredLoader<K> {
    /// Returns a new [`LayeredLoaderBuilder`] with no sources.
    pub fn builder(kind: K) -> LayeredLoaderBuilder<K> {
        LayeredLoaderBuilder::new(kind)
    }

    /// Creates a loader reading the global file and fragment dirs of `catalog`.
    pub fn from_catalog(kind: K, catalog: &PathCatalog) -> Self {
        Self::builder(kind).catalog(catalog).build()
    }
}

impl<K: FragmentKind, V: SchemaValidator> LayeredLoader<K, V> {
    /// The kind this loader merges.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// The global fragment file, if one is configured.
    pub fn global_file(&self) -> Option<&Path> {
        self.global_file.as_deref()
    }

    /// Fragment directories in precedence order.
    pub fn fragment_dirs(&self) -> &[PathBuf] {
        &self.fragment_dirs
    }

    /// Runs one aggregation pass.
    ///
    /// `overrides` are optional files (e.g. per-context fragments) loaded
    /// right after the global file; pass `&[]` when there are none. With
    /// `include_extra_sources` off, the pass stops before the fragment
    /// directories.
    pub fn load_all(&self, overrides: &[PathBuf], include_extra_sources: bool) -> Loaded<K::Entry> {
        let kind = self.kind.name();
        let mut collection = Collection::new();
        let mut errors = CombinedError::new();
        let loader = FragmentLoader::new(&self.kind, &self.validator);

        if let Some(global) = &self.global_file {
            debug!(kind, path = %global.display(), "loading global fragment");
            errors.record(loader.load(global, &mut collection));
        }

        for path in overrides {
            debug!(kind, path = %path.display(), "loading override fragment");
            errors.record(loader.load(path, &mut collection));
        }

        if include_extra_sources {
            let scanner = DirectoryScanner::new(loader);
            for dir in &self.fragment_dirs {
                debug!(kind, dir = %dir.display(), "scanning fragment dir");
                errors.absorb(scanner.scan(dir, &mut collection));
            }
        }

        debug!(
            kind,
            entries = collection.len(),
            errors = errors.len(),
            "aggregation finished"
        );
        Loaded { collection, errors }
    }
}

/// Builder for a [`LayeredLoader`].
///
/// # Example
///
/// ```
/// use leaderkit_loader::{LayeredLoader, LeaderKind};
///
/// let loader = LayeredLoader::builder(LeaderKind)
///     .global_file("/etc/k9s/leaders.yaml")
///     .fragment_dir("/usr/share/k9s/leaders")
///     .fragment_dir("/home/me/.local/share/k9s/leaders")
///     .build();
/// assert_eq!(loader.fragment_dirs().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LayeredLoaderBuilder<K, V = BuiltinValidator> {
    kind: K,
    validator: V,
    global_file: Option<PathBuf>,
    fragment_dirs: Vec<PathBuf>,
}

impl<K: FragmentKind> LayeredLoaderBuilder<K> {
    /// Creates a builder with no sources and the built-in validator.
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            validator: BuiltinValidator,
            global_file: None,
            fragment_dirs: Vec::new(),
        }
    }
}

impl<K: FragmentKind, V: SchemaValidator> LayeredLoaderBuilder<K, V> {
    /// Sets the global fragment file.
    pub fn global_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_file = Some(path.into());
        self
    }

    /// Appends a fragment directory with the highest precedence so far.
    pub fn fragment_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fragment_dirs.push(dir.into());
        self
    }

    /// Uses the global file and fragment dirs of `catalog`, replacing any
    /// set before.
    pub fn catalog(mut self, catalog: &PathCatalog) -> Self {
        self.global_file = Some(catalog.global_file(&self.kind));
        self.fragment_dirs = catalog.fragment_dirs(&self.kind);
        self
    }

    /// Classifies files with `validator` instead of the built-in one.
    pub fn validator<W: SchemaValidator>(self, validator: W) -> LayeredLoaderBuilder<K, W> {
        LayeredLoaderBuilder {
            kind: self.kind,
            validator,
            global_file: self.global_file,
            fragment_dirs: self.fragment_dirs,
        }
    }

    /// Finishes the loader.
    pub fn build(self) -> LayeredLoader<K, V> {
        LayeredLoader {
            kind: self.kind,
            validator: self.validator,
            global_file: self.global_file,
            fragment_dirs: self.fragment_dirs,
        }
    }
}

/// Loads leaders from `catalog`.
pub fn load_leaders(
    catalog: &PathCatalog,
    overrides: &[PathBuf],
    include_extra_sources: bool,
) -> Loaded<Leader> {
    LayeredLoader::from_catalog(LeaderKind, catalog).load_all(overrides, include_extra_sources)
}

/// Loads plugins from `catalog`.
pub fn load_plugins(
    catalog: &PathCatalog,
    overrides: &[PathBuf],
    include_extra_sources: bool,
) -> Loaded<Plugin> {
    LayeredLoader::from_catalog(PluginKind, catalog).load_all(overrides, include_extra_sources)
}
