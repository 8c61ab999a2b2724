//! # Error Types
//!
//! Errors raised while turning peer bytes into domain entities.

use thiserror::Error;

/// Errors that can occur when decoding a raw `common.Block`.
#[derive(Debug, Clone, Error)]
pub enum BlockDecodeError {
    /// The bytes are not a protobuf `common.Block`.
    #[error("Malformed block: {0}")]
    Malformed(String),

    /// The block carries no header, so its number is unknown.
    #[error("Block has no header")]
    MissingHeader,
}

impl From<prost::DecodeError> for BlockDecodeError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Malformed(err.to_string())
    }
}
