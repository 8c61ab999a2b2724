//! # Domain Errors
//!
//! Error types for block transformation.

use thiserror::Error;

/// A nested Fabric message could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Outer `common.Envelope`.
    #[error("Malformed envelope: {0}")]
    Envelope(String),

    /// `common.Payload` inside the envelope.
    #[error("Malformed payload: {0}")]
    Payload(String),

    /// Payload has no header.
    #[error("Payload has no header")]
    MissingHeader,

    /// `common.ChannelHeader` inside the payload header.
    #[error("Malformed channel header: {0}")]
    ChannelHeader(String),

    /// Channel header carries no timestamp.
    #[error("Channel header has no timestamp")]
    MissingTimestamp,

    /// Channel header timestamp does not fit in epoch milliseconds.
    #[error("Channel header timestamp out of range: {seconds}s {nanos}ns")]
    InvalidTimestamp {
        /// Seconds field as received
        seconds: i64,
        /// Nanos field as received
        nanos: i32,
    },

    /// `peer.Transaction` in the payload data.
    #[error("Malformed transaction: {0}")]
    Transaction(String),

    /// Transaction holds no actions.
    #[error("Transaction has no actions")]
    NoActions,

    /// `peer.ChaincodeActionPayload` of the first action.
    #[error("Malformed chaincode action payload: {0}")]
    ActionPayload(String),

    /// Action payload has no endorsed action.
    #[error("Chaincode action payload has no endorsed action")]
    MissingEndorsedAction,

    /// `peer.ProposalResponsePayload` of the endorsed action.
    #[error("Malformed proposal response payload: {0}")]
    ProposalResponse(String),

    /// `peer.ChaincodeAction` in the proposal response extension.
    #[error("Malformed chaincode action: {0}")]
    ChaincodeAction(String),

    /// `rwset.TxReadWriteSet` in the chaincode action results.
    #[error("Malformed read/write set: {0}")]
    ReadWriteSet(String),

    /// `kvrwset.KVRWSet` of one namespace.
    #[error("Malformed key/value set for namespace {namespace}: {reason}")]
    KvRwSet {
        /// Namespace whose write set failed
        namespace: String,
        /// Decoder message
        reason: String,
    },
}

/// A block could not be transformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A transaction envelope failed to decode.
    #[error("Block {block}: transaction {index} envelope: {source}")]
    Envelope {
        /// Block number
        block: u64,
        /// Position of the transaction in the block
        index: usize,
        /// Underlying failure
        source: DecodeError,
    },

    /// An endorser transaction's read/write set failed to decode.
    #[error("Block {block}: read/write set of tx {tx_id}: {source}")]
    ReadWriteSet {
        /// Block number
        block: u64,
        /// Transaction id
        tx_id: String,
        /// Underlying failure
        source: DecodeError,
    },

    /// Blocks handed to the merger are not strictly ascending.
    #[error("Blocks out of order: {next} follows {previous}")]
    OutOfOrder {
        /// Number of the preceding block
        previous: u64,
        /// Number of the offending block
        next: u64,
    },
}

impl TransformError {
    /// Number of the block that failed.
    pub fn block_number(&self) -> u64 {
        match self {
            Self::Envelope { block, .. } | Self::ReadWriteSet { block, .. } => *block,
            Self::OutOfOrder { next, .. } => *next,
        }
    }
}
