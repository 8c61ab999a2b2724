//! # Fabric Proto
//!
//! Protobuf message definitions for Hyperledger Fabric blocks.
//!
//! Only the messages on the path from a committed `common.Block` down to the
//! individual `kvrwset.KVWrite` entries are modelled. Field tags match the
//! upstream `.proto` files so that bytes produced by a Fabric peer decode
//! directly; unknown fields are skipped by prost.
//!
//! ## Module Structure
//!
//! ```text
//! fabric-proto/
//! ├── common.rs    # Block, Envelope, Payload, ChannelHeader
//! ├── peer.rs      # Transaction, ChaincodeActionPayload, ChaincodeAction
//! ├── rwset.rs     # TxReadWriteSet, NsReadWriteSet, KVRWSet, KVWrite
//! └── fixtures.rs  # Builders for synthetic blocks (tests, demos)
//! ```

#![deny(unsafe_code)]

pub mod common;
pub mod fixtures;
pub mod peer;
pub mod rwset;

pub use prost::Message;
