//! # Domain Errors
//!
//! Every variant is fatal for the sync loop: it stops without advancing the
//! checkpoint and hands the error to its caller.

use hs_01_block_transformation::TransformError;
use hs_04_storage_sinks::SinkError;
use thiserror::Error;

/// Sync engine error types.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Channel membership is empty.
    #[error("No peers available on the channel")]
    NoPeers,

    /// Membership or height could not be queried.
    #[error("Failed to resolve chain height: {0}")]
    HeightResolution(String),

    /// A block could not be fetched or decoded.
    #[error("Failed to fetch block {block}: {reason}")]
    Fetch {
        /// Requested block
        block: u64,
        /// Failure description
        reason: String,
    },

    /// A block fetch exceeded its deadline.
    #[error("Fetching block {block} timed out after {timeout_secs}s")]
    FetchTimeout {
        /// Requested block
        block: u64,
        /// Configured timeout
        timeout_secs: u64,
    },

    /// A peer answered with a different block than requested.
    #[error("Requested block {requested}, received block {received}")]
    BlockMismatch {
        /// Requested block
        requested: u64,
        /// Block number found in the response
        received: u64,
    },

    /// A block could not be transformed.
    #[error("Transformation failed: {0}")]
    Transform(#[from] TransformError),

    /// The sink rejected the batch.
    #[error("Sink apply failed: {0}")]
    Sink(#[from] SinkError),
}

impl SyncError {
    /// Short label for the error metric.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoPeers => "no_peers",
            Self::HeightResolution(_) => "height",
            Self::Fetch { .. } => "fetch",
            Self::FetchTimeout { .. } => "fetch_timeout",
            Self::BlockMismatch { .. } => "block_mismatch",
            Self::Transform(_) => "transform",
            Self::Sink(_) => "sink",
        }
    }
}
