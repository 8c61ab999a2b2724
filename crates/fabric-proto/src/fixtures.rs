//! Builders for synthetic Fabric blocks.
//!
//! Used by unit and integration tests across the workspace to produce the
//! exact nesting a peer would deliver, without a running network.

use prost::Message;

use crate::common::{
    header_type, Block, BlockData, BlockHeader, BlockMetadata, BlockMetadataIndex, ChannelHeader,
    Envelope, Header, Payload,
};
use crate::peer::{
    ChaincodeAction, ChaincodeActionPayload, ChaincodeEndorsedAction, ChaincodeId,
    ProposalResponsePayload, Transaction, TransactionAction,
};
use crate::rwset::{KvRwSet, KvWrite, NsReadWriteSet, TxReadWriteSet};

/// Bytes that no message in this crate accepts (truncated varint).
pub const GARBAGE: &[u8] = &[0xff, 0xff, 0xff];

/// A put of `value` under `key`.
pub fn kv_write(key: &str, value: &[u8]) -> KvWrite {
    KvWrite {
        key: key.to_string(),
        is_delete: false,
        value: value.to_vec(),
    }
}

/// A delete of `key`.
pub fn kv_delete(key: &str) -> KvWrite {
    KvWrite {
        key: key.to_string(),
        is_delete: true,
        value: Vec::new(),
    }
}

/// Serialized `TxReadWriteSet` with one namespace entry per element.
pub fn rwset_bytes(namespaces: &[(&str, Vec<KvWrite>)]) -> Vec<u8> {
    let ns_rwset = namespaces
        .iter()
        .map(|(namespace, writes)| NsReadWriteSet {
            namespace: namespace.to_string(),
            rwset: KvRwSet {
                reads: Vec::new(),
                writes: writes.clone(),
            }
            .encode_to_vec(),
            collection_hashed_rwset: Vec::new(),
        })
        .collect();

    TxReadWriteSet {
        data_model: 0,
        ns_rwset,
    }
    .encode_to_vec()
}

/// Serialized `Transaction` whose single action carries `results` as its
/// chaincode action results.
pub fn endorser_transaction_data(chaincode: &str, results: Vec<u8>) -> Vec<u8> {
    let chaincode_action = ChaincodeAction {
        results,
        events: Vec::new(),
        response: None,
        chaincode_id: Some(ChaincodeId {
            path: String::new(),
            name: chaincode.to_string(),
            version: "1.0".to_string(),
        }),
    };
    let response_payload = ProposalResponsePayload {
        proposal_hash: vec![0u8; 32],
        extension: chaincode_action.encode_to_vec(),
    };
    let action_payload = ChaincodeActionPayload {
        chaincode_proposal_payload: Vec::new(),
        action: Some(ChaincodeEndorsedAction {
            proposal_response_payload: response_payload.encode_to_vec(),
            endorsements: Vec::new(),
        }),
    };

    Transaction {
        actions: vec![TransactionAction {
            header: Vec::new(),
            payload: action_payload.encode_to_vec(),
        }],
    }
    .encode_to_vec()
}

/// Serialized envelope with the given header type and raw payload data.
pub fn envelope(
    r#type: i32,
    channel_id: &str,
    tx_id: &str,
    timestamp_millis: i64,
    data: Vec<u8>,
) -> Vec<u8> {
    let channel_header = ChannelHeader {
        r#type,
        version: 0,
        timestamp: Some(prost_types::Timestamp {
            seconds: timestamp_millis.div_euclid(1000),
            nanos: (timestamp_millis.rem_euclid(1000) * 1_000_000) as i32,
        }),
        channel_id: channel_id.to_string(),
        tx_id: tx_id.to_string(),
        epoch: 0,
        extension: Vec::new(),
        tls_cert_hash: Vec::new(),
    };
    let payload = Payload {
        header: Some(Header {
            channel_header: channel_header.encode_to_vec(),
            signature_header: Vec::new(),
        }),
        data,
    };

    Envelope {
        payload: payload.encode_to_vec(),
        signature: Vec::new(),
    }
    .encode_to_vec()
}

/// Serialized endorser transaction envelope writing `namespaces`.
pub fn endorser_envelope(
    channel_id: &str,
    tx_id: &str,
    timestamp_millis: i64,
    namespaces: &[(&str, Vec<KvWrite>)],
) -> Vec<u8> {
    let chaincode = namespaces.first().map(|(ns, _)| *ns).unwrap_or_default();
    envelope(
        header_type::ENDORSER_TRANSACTION,
        channel_id,
        tx_id,
        timestamp_millis,
        endorser_transaction_data(chaincode, rwset_bytes(namespaces)),
    )
}

/// Serialized config transaction envelope (no application writes).
pub fn config_envelope(channel_id: &str, tx_id: &str, timestamp_millis: i64) -> Vec<u8> {
    envelope(
        header_type::CONFIG,
        channel_id,
        tx_id,
        timestamp_millis,
        b"config".to_vec(),
    )
}

/// A block holding `envelopes`. `validation_codes`, when given, is stored in
/// the transactions filter metadata slot.
pub fn block(number: u64, envelopes: Vec<Vec<u8>>, validation_codes: Option<Vec<u8>>) -> Block {
    let metadata = validation_codes.map(|codes| {
        let mut slots = vec![Vec::new(); BlockMetadataIndex::TransactionsFilter as usize + 1];
        slots[BlockMetadataIndex::TransactionsFilter as usize] = codes;
        BlockMetadata { metadata: slots }
    });

    Block {
        header: Some(BlockHeader {
            number,
            previous_hash: Vec::new(),
            data_hash: Vec::new(),
        }),
        data: Some(BlockData { data: envelopes }),
        metadata,
    }
}

/// [`block`] serialized the way a peer returns it.
pub fn block_bytes(
    number: u64,
    envelopes: Vec<Vec<u8>>,
    validation_codes: Option<Vec<u8>>,
) -> Vec<u8> {
    block(number, envelopes, validation_codes).encode_to_vec()
}
