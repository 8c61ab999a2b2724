//! Key/value write decoder.
//!
//! Read/write set bytes to the ordered list of writes they contain.

use fabric_proto::rwset::{KvRwSet, TxReadWriteSet};
use prost::Message;
use shared_types::Write;

use crate::domain::DecodeError;

/// Decode a `TxReadWriteSet`, preserving namespace order then write order.
///
/// Reads, range queries and private collection hashes are ignored.
pub fn decode_writes(results: &[u8]) -> Result<Vec<Write>, DecodeError> {
    let tx_rwset =
        TxReadWriteSet::decode(results).map_err(|e| DecodeError::ReadWriteSet(e.to_string()))?;

    let mut writes = Vec::new();
    for ns in tx_rwset.ns_rwset {
        let kv = KvRwSet::decode(ns.rwset.as_slice()).map_err(|e| DecodeError::KvRwSet {
            namespace: ns.namespace.clone(),
            reason: e.to_string(),
        })?;

        writes.extend(kv.writes.into_iter().map(|w| Write {
            namespace: ns.namespace.clone(),
            key: w.key,
            value: w.value,
            is_delete: w.is_delete,
        }));
    }

    Ok(writes)
}
