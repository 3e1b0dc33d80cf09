//! Single-file fragment loading.
//!
//! [`FragmentLoader::load`] runs one file through the whole gate: existence,
//! read, schema classification, kind check, strict decode, merge. Missing
//! files and files of another kind are skipped silently; everything else
//! that goes wrong is returned as a [`LoadError`] tagged with the file path
//! and leaves the target collection untouched.

use std::fs;
use std::path::Path;

use leaderkit_core::SchemaValidator;
use tracing::{debug, warn};

use crate::collection::Collection;
use crate::error::{LoadError, Result};
use crate::kind::FragmentKind;

/// Loads one fragment file of kind `K` into a collection.
#[derive(Debug)]
pub struct FragmentLoader<'a, K, V> {
    kind: &'a K,
    validator: &'a V,
}

impl<K, V> Clone for FragmentLoader<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for FragmentLoader<'_, K, V> {}

impl<'a, K: FragmentKind, V: SchemaValidator> FragmentLoader<'a, K, V> {
    /// Creates a loader for `kind` that classifies files with `validator`.
    pub fn new(kind: &'a K, validator: &'a V) -> Self {
        Self { kind, validator }
    }

    /// Loads `path` and folds its entries into `into`.
    ///
    /// Decoding is all-or-nothing: either every entry of the file is merged
    /// or none is.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if an existing file cannot be read,
    /// [`LoadError::Validation`] if classification fails, or
    /// [`LoadError::Decode`] if strict decoding rejects the file.
    pub fn load(&self, path: &Path, into: &mut Collection<K::Entry>) -> Result<()> {
        let kind = self.kind.name();

        if matches!(path.try_exists(), Ok(false)) {
            debug!(kind, path = %path.display(), "fragment absent, skipping");
            return Ok(());
        }

        let bytes = fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let schema = match self.validator.validate(&bytes) {
            Ok(schema) => schema,
            Err(source) => {
                warn!(kind, path = %path.display(), error = %source, "schema validation failed");
                return Err(LoadError::Validation {
                    kind,
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if !self.kind.accepts(schema) {
            debug!(kind, path = %path.display(), %schema, "fragment holds another schema, skipping");
            return Ok(());
        }

        let entries = self
            .kind
            .decode(schema, path, &bytes)
            .map_err(|source| LoadError::Decode {
                kind,
                path: path.to_path_buf(),
                source,
            })?;

        debug!(kind, path = %path.display(), entries = entries.len(), "fragment loaded");
        for (key, entry) in entries {
            if into.insert(key.clone(), entry).is_some() {
                debug!(kind, path = %path.display(), key = %key, "entry superseded");
            }
        }

        Ok(())
    }
}
