//! The merged, scope-keyed collection.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Entries keyed by scope key; a later insert for the same key replaces the
/// earlier one.
///
/// Only the loader inserts. Once an aggregation pass returns, callers get the
/// collection by value and read it through the accessors below.
///
/// # Examples
///
/// ```
/// use leaderkit_loader::{Collection, LeaderKind, LayeredLoader};
///
/// let loaded = LayeredLoader::builder(LeaderKind)
///     .global_file("/nonexistent/leaders.yaml")
///     .build()
///     .load_all(&[], true);
/// let leaders: &Collection<_> = &loaded.collection;
/// assert!(leaders.is_empty());
/// assert!(leaders.get("pods").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collection<E> {
    entries: HashMap<String, E>,
}

impl<E> Collection<E> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: String, entry: E) -> Option<E> {
        self.entries.insert(key, entry)
    }

    /// Looks up an entry by scope key.
    pub fn get(&self, key: &str) -> Option<&E> {
        self.entries.get(key)
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the collection holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over scope keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over `(scope key, entry)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &E)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrowed view ordered by scope key, for stable output.
    pub fn sorted(&self) -> BTreeMap<&str, &E> {
        self.iter().collect()
    }

    /// Consumes the collection, returning the underlying map.
    pub fn into_inner(self) -> HashMap<String, E> {
        self.entries
    }
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> IntoIterator for Collection<E> {
    type Item = (String, E);
    type IntoIter = std::collections::hash_map::IntoIter<String, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_last_write_wins() {
        let mut collection = Collection::new();
        assert!(collection.insert("pods".to_string(), 1).is_none());
        assert_eq!(collection.insert("pods".to_string(), 2), Some(1));
        assert_eq!(collection.get("pods"), Some(&2));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_sorted_view() {
        let mut collection = Collection::new();
        collection.insert("svc".to_string(), "b");
        collection.insert("deploy".to_string(), "a");
        collection.insert("pods".to_string(), "c");

        let keys: Vec<&str> = collection.sorted().into_keys().collect();
        assert_eq!(keys, vec!["deploy", "pods", "svc"]);
    }
}
