//! Error types for fragment loading.
//!
//! [`LoadError`] describes one failed source. [`CombinedError`] collects every
//! failure of an aggregation pass without discarding any of them.

use std::fmt;
use std::path::{Path, PathBuf};

use leaderkit_core::ValidationError;
use thiserror::Error;

/// A single failed source, tagged with the path that produced it.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An existing file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file failed schema classification.
    #[error("{kind} validation failed for {}: {source}", path.display())]
    Validation {
        /// Fragment kind being loaded (e.g. `"leaders"`).
        kind: &'static str,
        /// File that failed classification.
        path: PathBuf,
        /// Classifier diagnostic.
        #[source]
        source: ValidationError,
    },

    /// The file matched the schema but strict decoding rejected it.
    #[error("{kind} unmarshal failed for {}: {source}", path.display())]
    Decode {
        /// Fragment kind being loaded.
        kind: &'static str,
        /// File that failed to decode.
        path: PathBuf,
        /// Decoder error, including unknown fields.
        #[source]
        source: serde_yaml::Error,
    },

    /// The directory walk itself failed.
    #[error("failed to walk {}: {source}", path.display())]
    Traversal {
        /// Entry the walk failed on, or the walk root.
        path: PathBuf,
        /// Walker failure.
        #[source]
        source: walkdir::Error,
    },
}

impl LoadError {
    /// Path of the source that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Validation { path, .. }
            | Self::Decode { path, .. }
            | Self::Traversal { path, .. } => path,
        }
    }
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;

/// Every failure of one aggregation pass, in the order encountered.
///
/// Displays as one cause per line.
///
/// # Examples
///
/// ```
/// use leaderkit_loader::CombinedError;
///
/// let errors = CombinedError::new();
/// assert!(errors.is_empty());
/// assert!(errors.into_option().is_none());
/// ```
#[derive(Debug, Default)]
pub struct CombinedError {
    errors: Vec<LoadError>,
}

impl CombinedError {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one failure.
    pub fn push(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    /// Records the failure of `result`, if any.
    pub fn record(&mut self, result: Result<()>) {
        if let Err(err) = result {
            self.errors.push(err);
        }
    }

    /// Moves every failure of `other` into `self`.
    pub fn absorb(&mut self, other: CombinedError) {
        self.errors.extend(other.errors);
    }

    /// Returns `true` if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over the recorded failures.
    pub fn iter(&self) -> std::slice::Iter<'_, LoadError> {
        self.errors.iter()
    }

    /// Paths of the failed sources, in order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.errors.iter().map(LoadError::path)
    }

    /// `None` when nothing failed, `Some(self)` otherwise.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    /// Consumes the accumulator, returning the individual failures.
    pub fn into_vec(self) -> Vec<LoadError> {
        self.errors
    }
}

impl fmt::Display for CombinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.errors.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CombinedError {}

impl From<LoadError> for CombinedError {
    fn from(error: LoadError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl Extend<LoadError> for CombinedError {
    fn extend<I: IntoIterator<Item = LoadError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl FromIterator<LoadError> for CombinedError {
    fn from_iter<I: IntoIterator<Item = LoadError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CombinedError {
    type Item = LoadError;
    type IntoIter = std::vec::IntoIter<LoadError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a CombinedError {
    type Item = &'a LoadError;
    type IntoIter = std::slice::Iter<'a, LoadError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_error(path: &str) -> LoadError {
        LoadError::Read {
            path: PathBuf::from(path),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
    }

    #[test]
    fn test_display_joins_causes_by_line() {
        let errors: CombinedError = [read_error("/a.yaml"), read_error("/b.yaml")]
            .into_iter()
            .collect();

        let text = errors.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("/a.yaml"));
        assert!(lines[1].contains("/b.yaml"));
    }

    #[test]
    fn test_record_ignores_success() {
        let mut errors = CombinedError::new();
        errors.record(Ok(()));
        errors.record(Err(read_error("/c.yaml")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.paths().collect::<Vec<_>>(), vec![Path::new("/c.yaml")]);
    }

    #[test]
    fn test_absorb_keeps_order() {
        let mut first = CombinedError::from(read_error("/1.yaml"));
        let second: CombinedError = [read_error("/2.yaml"), read_error("/3.yaml")]
            .into_iter()
            .collect();
        first.absorb(second);

        let paths: Vec<_> = first.paths().map(|p| p.to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/1.yaml"),
                PathBuf::from("/2.yaml"),
                PathBuf::from("/3.yaml")
            ]
        );
    }

    #[test]
    fn test_validation_error_is_tagged_with_path() {
        let err = LoadError::Validation {
            kind: "leaders",
            path: PathBuf::from("/etc/leaders.yaml"),
            source: ValidationError::NotAMapping,
        };
        assert_eq!(
            err.to_string(),
            "leaders validation failed for /etc/leaders.yaml: top level must be a mapping"
        );
        assert_eq!(err.path(), Path::new("/etc/leaders.yaml"));
    }
}
