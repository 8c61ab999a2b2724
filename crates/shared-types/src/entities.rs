//! # Core Domain Entities
//!
//! Ledger-side entities as seen by the sync pipeline.
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, `HeaderType`, `TransactionMeta`
//! - **State**: `Write`
//! - **Networking**: `PeerInfo`

use fabric_proto::common::{self, header_type, BlockMetadataIndex, TX_VALIDATION_CODE_VALID};
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::errors::BlockDecodeError;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A committed ledger block, reduced to what the transformer reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Position of the block in the ledger.
    pub number: u64,
    /// Serialized transaction envelopes, in block order.
    pub transactions: Vec<Vec<u8>>,
    /// One validation code per transaction (`0` = valid). May be shorter than
    /// `transactions`; uncovered entries count as valid.
    pub validity_flags: Vec<u8>,
}

impl Block {
    /// Build a block from its parts.
    pub fn new(number: u64, transactions: Vec<Vec<u8>>, validity_flags: Vec<u8>) -> Self {
        Self {
            number,
            transactions,
            validity_flags,
        }
    }

    /// Decode the protobuf bytes a peer returns for a block.
    pub fn from_proto_bytes(bytes: &[u8]) -> Result<Self, BlockDecodeError> {
        let block = common::Block::decode(bytes)?;
        Self::try_from(block)
    }

    /// Whether the transaction at `index` passed validation.
    pub fn is_valid(&self, index: usize) -> bool {
        self.validity_flags
            .get(index)
            .map_or(true, |code| *code == TX_VALIDATION_CODE_VALID)
    }
}

impl TryFrom<common::Block> for Block {
    type Error = BlockDecodeError;

    fn try_from(block: common::Block) -> Result<Self, Self::Error> {
        let number = block
            .header
            .map(|h| h.number)
            .ok_or(BlockDecodeError::MissingHeader)?;
        let transactions = block.data.map(|d| d.data).unwrap_or_default();
        let validity_flags = block
            .metadata
            .and_then(|m| {
                m.metadata
                    .into_iter()
                    .nth(BlockMetadataIndex::TransactionsFilter as usize)
            })
            .unwrap_or_default();

        Ok(Self {
            number,
            transactions,
            validity_flags,
        })
    }
}

/// Classification of a transaction envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderType {
    /// Chaincode invocation; the only type carrying application writes.
    EndorserTransaction,
    Config,
    ConfigUpdate,
    Message,
    OrdererTransaction,
    DeliverSeekInfo,
    ChaincodePackage,
    /// A discriminant this version does not know.
    Unknown(i32),
}

impl From<i32> for HeaderType {
    fn from(value: i32) -> Self {
        match value {
            header_type::MESSAGE => Self::Message,
            header_type::CONFIG => Self::Config,
            header_type::CONFIG_UPDATE => Self::ConfigUpdate,
            header_type::ENDORSER_TRANSACTION => Self::EndorserTransaction,
            header_type::ORDERER_TRANSACTION => Self::OrdererTransaction,
            header_type::DELIVER_SEEK_INFO => Self::DeliverSeekInfo,
            header_type::CHAINCODE_PACKAGE => Self::ChaincodePackage,
            other => Self::Unknown(other),
        }
    }
}

/// Metadata of one decoded transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionMeta {
    pub header_type: HeaderType,
    pub channel_id: String,
    pub tx_id: String,
    /// Commit proposal time in epoch milliseconds.
    pub timestamp_millis: i64,
}

// =============================================================================
// CLUSTER B: STATE
// =============================================================================

/// A single key mutation from a transaction's write set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    /// Chaincode namespace.
    pub namespace: String,
    /// Raw key; composite keys contain NUL separators.
    pub key: String,
    pub value: Vec<u8>,
    pub is_delete: bool,
}

impl Write {
    /// A put of `value` under `key`.
    pub fn put(namespace: impl Into<String>, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value: value.into(),
            is_delete: false,
        }
    }

    /// A delete of `key`.
    pub fn delete(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value: Vec::new(),
            is_delete: true,
        }
    }
}

// =============================================================================
// CLUSTER C: NETWORKING
// =============================================================================

/// A channel member as reported by service discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    /// Endpoint of the peer.
    pub url: String,
    /// Owning organization.
    #[serde(default)]
    pub msp_id: String,
    /// Number of blocks the peer has committed (highest block + 1).
    pub ledger_height: u64,
}

impl PeerInfo {
    pub fn new(url: impl Into<String>, msp_id: impl Into<String>, ledger_height: u64) -> Self {
        Self {
            url: url.into(),
            msp_id: msp_id.into(),
            ledger_height,
        }
    }
}
