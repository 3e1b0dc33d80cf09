//! Strict YAML decoding.

use serde::de::DeserializeOwned;

/// Decodes `bytes` into `T`.
///
/// Strictness comes from the target type: every document type in this crate
/// is `#[serde(deny_unknown_fields)]`, so any key the type does not declare,
/// at any depth, fails the whole decode.
///
/// # Examples
///
/// ```
/// use leaderkit_core::{LeadersDocument, decode_strict};
///
/// let ok = b"leaders:\n  t:\n    keyspace: pods\n";
/// let doc: LeadersDocument = decode_strict(ok).unwrap();
/// assert_eq!(doc.leaders["t"].keyspace, "pods");
///
/// let extra = b"leaders:\n  t:\n    keyspace: pods\n    colour: red\n";
/// assert!(decode_strict::<LeadersDocument>(extra).is_err());
/// ```
pub fn decode_strict<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_slice(bytes)
}
