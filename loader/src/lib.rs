//! Layered discovery and merging of shortcut fragments.
//!
//! Fragments are small YAML files contributing leaders (or plugins) to one
//! merged collection. They are read from a fixed global file, optional
//! override files, and every `<root>/<app>/<kind>` directory of a
//! [`PathCatalog`], in that order; a later source replaces entries of an
//! earlier one with the same scope key.
//!
//! Loading is best effort. Missing sources are skipped, and broken ones are
//! reported through a [`CombinedError`] while everything else still merges.
//!
//! # Quick start
//!
//! ```no_run
//! use leaderkit_loader::{PathCatalog, load_leaders};
//!
//! let catalog = PathCatalog::discover("k9s");
//! let (leaders, errors) = load_leaders(&catalog, &[], true).into_parts();
//! if let Some(errors) = errors {
//!     eprintln!("{errors}");
//! }
//! if let Some(pods) = leaders.get("pods") {
//!     println!("pods has {} shortcuts", pods.shortcuts.len());
//! }
//! ```
//!
//! The pipeline is generic over [`FragmentKind`]; [`LeaderKind`] and
//! [`PluginKind`] are the two built-in instantiations.

mod aggregate;
mod collection;
mod error;
mod fragment;
mod kind;
mod paths;
mod scan;
mod settings;

pub use aggregate::{LayeredLoader, LayeredLoaderBuilder, Loaded, load_leaders, load_plugins};
pub use collection::Collection;
pub use error::{CombinedError, LoadError, Result};
pub use fragment::FragmentLoader;
pub use kind::{FragmentKind, LeaderKind, PluginKind};
pub use paths::{CONFIG_DIR_ENV, DEFAULT_APP_NAME, PathCatalog, data_dirs};
pub use scan::{DirectoryScanner, FragmentWalk, is_fragment_file, walk_fragments};
pub use settings::{LoaderSettings, SettingsError};
