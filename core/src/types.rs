//! Shortcut and leader type definitions.
//!
//! These types mirror the on-disk YAML layout of shortcut fragments. Every
//! struct rejects unknown fields, so decoding into them is strict: a single
//! misspelled key anywhere in a document fails the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single shortcut action.
///
/// The record is carried through aggregation untouched; nothing in this
/// workspace interprets `command` or `args`.
///
/// # Examples
///
/// ```
/// use leaderkit_core::Shortcut;
///
/// let shortcut = Shortcut::new("Shift-L", "stern")
///     .with_description("Tail logs")
///     .with_scopes(["pods"])
///     .with_args(["--tail", "50", "$NAME"]);
/// assert_eq!(shortcut.short_cut, "Shift-L");
/// assert_eq!(shortcut.args.len(), 3);
/// assert!(!shortcut.background);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Shortcut {
    /// Key chord that triggers the action (e.g. `Shift-L`).
    pub short_cut: String,
    /// Replace a built-in binding bound to the same key.
    #[serde(default, rename = "override", skip_serializing_if = "is_false")]
    pub override_builtin: bool,
    /// Commands the output is piped through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pipes: Vec<String>,
    /// Human readable description shown in menus.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Views the shortcut is active in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Program to execute.
    pub command: String,
    /// Ask before running.
    #[serde(default, skip_serializing_if = "is_false")]
    pub confirm: bool,
    /// Run detached from the terminal.
    #[serde(default, skip_serializing_if = "is_false")]
    pub background: bool,
    /// Arguments passed to `command`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Hidden when the consumer runs in read-only mode.
    #[serde(default, skip_serializing_if = "is_false")]
    pub dangerous: bool,
    /// Copy command output to the clipboard.
    #[serde(default, skip_serializing_if = "is_false")]
    pub output_to_clipboard: bool,
}

impl Shortcut {
    /// Creates a shortcut with the two required fields.
    pub fn new(short_cut: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            short_cut: short_cut.into(),
            override_builtin: false,
            pipes: Vec::new(),
            description: String::new(),
            scopes: Vec::new(),
            command: command.into(),
            confirm: false,
            background: false,
            args: Vec::new(),
            dangerous: false,
            output_to_clipboard: false,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Plugins share the shortcut record layout.
pub type Plugin = Shortcut;

/// A leader: a scope key plus the shortcuts bound under it.
///
/// The `keyspace` is the identity of a leader once merged; the key a leader
/// appears under in its source file is discarded.
///
/// # Examples
///
/// ```
/// use leaderkit_core::{Leader, Shortcut};
///
/// let leader = Leader::new("pods")
///     .with_shortcut(Shortcut::new("l", "stern"))
///     .with_shortcut(Shortcut::new("d", "dive"));
/// assert_eq!(leader.keyspace, "pods");
/// assert_eq!(leader.shortcuts[1].short_cut, "d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Leader {
    /// Scope key the leader is stored under after merging.
    pub keyspace: String,
    /// Shortcuts in declaration order.
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
}

impl Leader {
    /// Creates a leader with no shortcuts.
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            shortcuts: Vec::new(),
        }
    }

    /// Appends a shortcut, keeping declaration order.
    pub fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcuts.push(shortcut);
        self
    }
}

/// Top-level layout of a leaders fragment.
///
/// ```yaml
/// leaders:
///   pod-tools:
///     keyspace: pods
///     shortcuts:
///       - shortCut: l
///         command: stern
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeadersDocument {
    /// Leaders keyed by a file-local identifier.
    #[serde(default)]
    pub leaders: BTreeMap<String, Leader>,
}

/// Top-level layout of a plugins fragment (`plugins:` wrapper).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsDocument {
    /// Plugins keyed by name.
    #[serde(default)]
    pub plugins: BTreeMap<String, Plugin>,
}

/// Top-level layout of an unwrapped multi-plugin fragment.
pub type PluginMultiDocument = BTreeMap<String, Plugin>;

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_uses_camel_case_keys() {
        let mut shortcut = Shortcut::new("Ctrl-T", "k9s-tools");
        shortcut.output_to_clipboard = true;
        shortcut.override_builtin = true;

        let json = serde_json::to_value(&shortcut).unwrap();
        assert_eq!(json["shortCut"], "Ctrl-T");
        assert_eq!(json["outputToClipboard"], true);
        assert_eq!(json["override"], true);
        assert!(json.get("confirm").is_none());
    }

    #[test]
    fn test_leader_preserves_shortcut_order() {
        let yaml = r#"
keyspace: pods
shortcuts:
  - shortCut: c
    command: third
  - shortCut: a
    command: first
  - shortCut: b
    command: second
"#;
        let leader: Leader = serde_yaml::from_str(yaml).unwrap();
        let keys: Vec<&str> = leader
            .shortcuts
            .iter()
            .map(|s| s.short_cut.as_str())
            .collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_leader_rejects_unknown_field() {
        let yaml = "keyspace: pods\ncolor: red\n";
        assert!(serde_yaml::from_str::<Leader>(yaml).is_err());
    }

    #[test]
    fn test_shortcut_rejects_unknown_nested_field() {
        let yaml = r#"
leaders:
  tools:
    keyspace: pods
    shortcuts:
      - shortCut: l
        command: stern
        shell: true
"#;
        assert!(serde_yaml::from_str::<LeadersDocument>(yaml).is_err());
    }
}
