//! # Domain Errors

use thiserror::Error;

/// Errors from the key-value store backing the checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KvStoreError {
    /// Underlying I/O or database failure.
    #[error("I/O error: {message}")]
    IoError {
        /// Backend message
        message: String,
    },
}

/// Errors raised by checkpoint persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    /// The marker could not be written.
    #[error("Failed to persist checkpoint {block}: {source}")]
    Write {
        /// Block number that was being saved
        block: u64,
        /// Store failure
        source: KvStoreError,
    },
}
