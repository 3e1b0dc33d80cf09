//! Per-kind configuration for the layered merger.
//!
//! The discovery and merge pipeline is the same for every kind of fragment.
//! What differs is captured by [`FragmentKind`]: which schema layouts a kind
//! accepts, how a file is decoded, and which key each decoded entry is
//! stored under.

use std::fmt;
use std::path::Path;

use leaderkit_core::{
    Leader, LeadersDocument, Plugin, PluginMultiDocument, PluginsDocument, SchemaKind,
    decode_strict,
};

/// Describes one kind of mergeable fragment.
pub trait FragmentKind {
    /// Entry stored in the merged collection.
    type Entry: Clone + fmt::Debug;

    /// Short name used in logs and error messages (e.g. `"leaders"`).
    fn name(&self) -> &'static str;

    /// File name of the global fragment inside the app config dir.
    fn global_file_name(&self) -> &'static str;

    /// Directory name probed under each `<root>/<app>/`.
    fn dir_name(&self) -> &'static str;

    /// Whether a file classified as `schema` belongs to this kind.
    fn accepts(&self, schema: SchemaKind) -> bool;

    /// Strictly decodes `bytes` and returns `(scope key, entry)` pairs in
    /// the order they should be applied.
    fn decode(
        &self,
        schema: SchemaKind,
        path: &Path,
        bytes: &[u8],
    ) -> Result<Vec<(String, Self::Entry)>, serde_yaml::Error>;
}

/// Leader fragments, re-keyed by each leader's declared `keyspace`.
///
/// The key a leader appears under in its file is dropped, so two leaders in
/// one file that declare the same keyspace collapse into a single entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderKind;

impl FragmentKind for LeaderKind {
    type Entry = Leader;

    fn name(&self) -> &'static str {
        "leaders"
    }

    fn global_file_name(&self) -> &'static str {
        "leaders.yaml"
    }

    fn dir_name(&self) -> &'static str {
        "leaders"
    }

    fn accepts(&self, schema: SchemaKind) -> bool {
        schema == SchemaKind::Leaders
    }

    fn decode(
        &self,
        _schema: SchemaKind,
        _path: &Path,
        bytes: &[u8],
    ) -> Result<Vec<(String, Leader)>, serde_yaml::Error> {
        let doc: LeadersDocument = decode_strict(bytes)?;
        Ok(doc
            .leaders
            .into_values()
            .map(|leader| (leader.keyspace.clone(), leader))
            .collect())
    }
}

/// Plugin fragments, keyed by plugin name.
///
/// A single-plugin file has no name of its own and is keyed by its file stem.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginKind;

impl FragmentKind for PluginKind {
    type Entry = Plugin;

    fn name(&self) -> &'static str {
        "plugins"
    }

    fn global_file_name(&self) -> &'static str {
        "plugins.yaml"
    }

    fn dir_name(&self) -> &'static str {
        "plugins"
    }

    fn accepts(&self, schema: SchemaKind) -> bool {
        matches!(
            schema,
            SchemaKind::Plugin | SchemaKind::Plugins | SchemaKind::PluginMulti
        )
    }

    fn decode(
        &self,
        schema: SchemaKind,
        path: &Path,
        bytes: &[u8],
    ) -> Result<Vec<(String, Plugin)>, serde_yaml::Error> {
        match schema {
            SchemaKind::Plugin => {
                let plugin: Plugin = decode_strict(bytes)?;
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(vec![(name, plugin)])
            }
            SchemaKind::Plugins => {
                let doc: PluginsDocument = decode_strict(bytes)?;
                Ok(doc.plugins.into_iter().collect())
            }
            SchemaKind::PluginMulti => {
                let doc: PluginMultiDocument = decode_strict(bytes)?;
                Ok(doc.into_iter().collect())
            }
            SchemaKind::Leaders => Ok(Vec::new()),
        }
    }
}
