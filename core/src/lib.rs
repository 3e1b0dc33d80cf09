//! Core shortcut types, fragment classification and strict decoding.
//!
//! This crate defines the data model shared by every layer of leaderkit:
//!
//! - [`Shortcut`]: one key-bound action (also used as [`Plugin`]).
//! - [`Leader`]: a scope key (`keyspace`) and its ordered shortcuts.
//! - [`LeadersDocument`], [`PluginsDocument`], [`PluginMultiDocument`]:
//!   the on-disk fragment layouts.
//!
//! Classification ([`SchemaValidator`], [`BuiltinValidator`]) decides which
//! layout a fragment uses, and [`decode_strict`] parses it, rejecting any
//! field the layout does not declare.
//!
//! # Example
//!
//! ```
//! use leaderkit_core::*;
//!
//! let yaml = br#"
//! leaders:
//!   pod-tools:
//!     keyspace: pods
//!     shortcuts:
//!       - shortCut: l
//!         description: Tail logs
//!         command: stern
//! "#;
//!
//! assert_eq!(BuiltinValidator.validate(yaml).unwrap(), SchemaKind::Leaders);
//! let doc: LeadersDocument = decode_strict(yaml).unwrap();
//! assert_eq!(doc.leaders["pod-tools"].keyspace, "pods");
//! ```

mod decode;
mod types;
mod validate;

pub use decode::decode_strict;
pub use types::*;
pub use validate::{BuiltinValidator, SchemaKind, SchemaValidator, ValidationError, classify};
