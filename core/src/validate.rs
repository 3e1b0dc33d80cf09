//! Schema classification for shortcut fragments.
//!
//! A fragment is classified before it is decoded. Classification answers
//! "which of the known layouts is this?" and catches structural mistakes
//! (wrong types, missing required keys, empty keyspaces). Unknown keys are
//! deliberately left to the strict decoder.
//!
//! # Examples
//!
//! ```
//! use leaderkit_core::*;
//!
//! let yaml = b"leaders:\n  tools:\n    keyspace: pods\n    shortcuts: []\n";
//! assert_eq!(BuiltinValidator.validate(yaml), Ok(SchemaKind::Leaders));
//!
//! // Empty keyspace
//! let bad = b"leaders:\n  tools:\n    keyspace: \"\"\n";
//! assert!(BuiltinValidator.validate(bad).is_err());
//! ```

use std::fmt;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Known fragment layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// A single plugin record at the top level.
    Plugin,
    /// Plugins wrapped in a `plugins:` mapping.
    Plugins,
    /// A bare mapping of plugin name to plugin record.
    PluginMulti,
    /// Leaders wrapped in a `leaders:` mapping.
    Leaders,
}

impl SchemaKind {
    /// Returns the stable name used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plugin => "plugin",
            Self::Plugins => "plugins",
            Self::PluginMulti => "plugin-multi",
            Self::Leaders => "leaders",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification errors.
///
/// Each variant describes the first structural problem found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The bytes are not a YAML document.
    #[error("malformed YAML: {0}")]
    Malformed(String),
    /// The document is empty.
    #[error("document is empty")]
    EmptyDocument,
    /// The top level is a scalar or a sequence.
    #[error("top level must be a mapping")]
    NotAMapping,
    /// The document matches none of the known layouts.
    #[error("document matches no known schema")]
    UnrecognizedSchema,
    /// A section or entry that must be a mapping is not.
    #[error("`{0}` must be a mapping")]
    NotASection(String),
    /// A leader declares an empty or whitespace-only keyspace.
    #[error("leader `{0}` must declare a non-empty keyspace")]
    EmptyKeyspace(String),
    /// A required field is absent.
    #[error("`{entry}` is missing required field `{field}`")]
    MissingField {
        /// Entry the field belongs to.
        entry: String,
        /// Field name.
        field: &'static str,
    },
    /// A field holds the wrong kind of value.
    #[error("`{entry}.{field}` must be {expected}")]
    InvalidField {
        /// Entry the field belongs to.
        entry: String,
        /// Field name.
        field: &'static str,
        /// Human readable expected type.
        expected: &'static str,
    },
}

/// Classifies raw fragment bytes.
///
/// Implemented for [`BuiltinValidator`] and for any
/// `Fn(&[u8]) -> Result<SchemaKind, ValidationError>`, which makes it easy
/// to stub in tests.
pub trait SchemaValidator {
    /// Returns the layout `bytes` conform to.
    fn validate(&self, bytes: &[u8]) -> Result<SchemaKind, ValidationError>;
}

impl<F> SchemaValidator for F
where
    F: Fn(&[u8]) -> Result<SchemaKind, ValidationError>,
{
    fn validate(&self, bytes: &[u8]) -> Result<SchemaKind, ValidationError> {
        self(bytes)
    }
}

/// Structural validator for the four built-in layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinValidator;

impl SchemaValidator for BuiltinValidator {
    fn validate(&self, bytes: &[u8]) -> Result<SchemaKind, ValidationError> {
        let doc: Value =
            serde_yaml::from_slice(bytes).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        classify(&doc)
    }
}

/// Classifies an already parsed document.
pub fn classify(doc: &Value) -> Result<SchemaKind, ValidationError> {
    let root = match doc {
        Value::Null => return Err(ValidationError::EmptyDocument),
        Value::Mapping(map) => map,
        _ => return Err(ValidationError::NotAMapping),
    };

    if let Some(section) = root.get("leaders") {
        validate_leaders(section)?;
        return Ok(SchemaKind::Leaders);
    }

    if let Some(section) = root.get("plugins") {
        let plugins = section_mapping("plugins", section)?;
        for (name, plugin) in plugins {
            validate_shortcut(&key_name(name), plugin)?;
        }
        return Ok(SchemaKind::Plugins);
    }

    if root.contains_key("shortCut") {
        validate_shortcut("plugin", doc)?;
        return Ok(SchemaKind::Plugin);
    }

    let looks_multi = !root.is_empty()
        && root
            .values()
            .all(|v| v.as_mapping().is_some_and(|m| m.contains_key("shortCut")));
    if looks_multi {
        for (name, plugin) in root {
            validate_shortcut(&key_name(name), plugin)?;
        }
        return Ok(SchemaKind::PluginMulti);
    }

    Err(ValidationError::UnrecognizedSchema)
}

fn validate_leaders(section: &Value) -> Result<(), ValidationError> {
    let leaders = section_mapping("leaders", section)?;

    for (key, leader) in leaders {
        let entry = key_name(key);
        let Some(fields) = leader.as_mapping() else {
            return Err(ValidationError::NotASection(entry));
        };

        match fields.get("keyspace") {
            None => {
                return Err(ValidationError::MissingField {
                    entry,
                    field: "keyspace",
                });
            }
            Some(Value::String(keyspace)) => {
                if keyspace.trim().is_empty() {
                    return Err(ValidationError::EmptyKeyspace(entry));
                }
            }
            Some(_) => {
                return Err(ValidationError::InvalidField {
                    entry,
                    field: "keyspace",
                    expected: "a string",
                });
            }
        }

        if let Some(shortcuts) = fields.get("shortcuts") {
            let Some(shortcuts) = shortcuts.as_sequence() else {
                return Err(ValidationError::InvalidField {
                    entry,
                    field: "shortcuts",
                    expected: "a sequence",
                });
            };
            for (idx, shortcut) in shortcuts.iter().enumerate() {
                validate_shortcut(&format!("{entry}.shortcuts[{idx}]"), shortcut)?;
            }
        }
    }

    Ok(())
}

fn validate_shortcut(entry: &str, value: &Value) -> Result<(), ValidationError> {
    let Some(fields) = value.as_mapping() else {
        return Err(ValidationError::NotASection(entry.to_string()));
    };

    for field in ["shortCut", "command"] {
        match fields.get(field) {
            None => {
                return Err(ValidationError::MissingField {
                    entry: entry.to_string(),
                    field,
                });
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(ValidationError::InvalidField {
                    entry: entry.to_string(),
                    field,
                    expected: "a string",
                });
            }
        }
    }

    check_field(fields, entry, "description", "a string", Value::is_string)?;
    for field in ["scopes", "args", "pipes"] {
        check_field(fields, entry, field, "a sequence of strings", is_string_seq)?;
    }
    for field in [
        "override",
        "confirm",
        "background",
        "dangerous",
        "outputToClipboard",
    ] {
        check_field(fields, entry, field, "a boolean", Value::is_bool)?;
    }

    Ok(())
}

fn check_field(
    fields: &Mapping,
    entry: &str,
    field: &'static str,
    expected: &'static str,
    ok: fn(&Value) -> bool,
) -> Result<(), ValidationError> {
    match fields.get(field) {
        Some(value) if !ok(value) => Err(ValidationError::InvalidField {
            entry: entry.to_string(),
            field,
            expected,
        }),
        _ => Ok(()),
    }
}

fn is_string_seq(value: &Value) -> bool {
    value
        .as_sequence()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

fn section_mapping<'a>(name: &str, section: &'a Value) -> Result<&'a Mapping, ValidationError> {
    section
        .as_mapping()
        .ok_or_else(|| ValidationError::NotASection(name.to_string()))
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "<key>".to_string()),
    }
}
