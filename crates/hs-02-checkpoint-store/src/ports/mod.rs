//! # Ports Module
//!
//! Inbound: [`CheckpointStore`], what the sync engine calls.
//! Outbound: [`KeyValueStore`], what the checkpoint store needs.

pub mod inbound;
pub mod outbound;

pub use inbound::CheckpointStore;
pub use outbound::{InMemoryKVStore, KeyValueStore};
