//! # Key Normalization
//!
//! Fabric composite keys join their attributes with NUL bytes and wrap the
//! whole key in them (`\0objectType\0attr1\0attr2\0`). Search indexes reject
//! NUL in ids, so keys are rewritten before they leave the transformer.

/// Separator replacing interior NUL bytes.
pub const COMPOSITE_KEY_SEPARATOR: &str = "__";

/// Trim leading/trailing NUL bytes and replace interior ones with `__`.
pub fn normalize_key(key: &str) -> String {
    key.trim_matches('\u{0}')
        .replace('\u{0}', COMPOSITE_KEY_SEPARATOR)
}
