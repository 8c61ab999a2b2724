//! Ledger fixtures shared by the integration tests and benchmarks.

use fabric_proto::common::header_type;
use fabric_proto::fixtures;
use fabric_proto::rwset::KvWrite;
use shared_types::Block;

/// Channel every fixture transaction belongs to.
pub const CHANNEL: &str = "mychannel";

/// Chaincode every fixture write targets unless stated otherwise.
pub const CHAINCODE: &str = "assets";

/// Commit time of every fixture transaction (2020-09-13T12:26:40Z).
pub const TX_DATE_MILLIS: i64 = 1_600_000_000_000;

/// Convert a protobuf block into the domain block.
pub fn to_block(block: fabric_proto::common::Block) -> Block {
    Block::try_from(block).expect("fixture block has a header")
}

/// Endorser envelope with transaction id `tx_id` writing `writes` to `chaincode`.
pub fn tx(tx_id: &str, chaincode: &str, writes: Vec<KvWrite>) -> Vec<u8> {
    fixtures::endorser_envelope(CHANNEL, tx_id, TX_DATE_MILLIS, &[(chaincode, writes)])
}

/// Config envelope (carries no application writes).
pub fn config_tx(tx_id: &str) -> Vec<u8> {
    fixtures::config_envelope(CHANNEL, tx_id, TX_DATE_MILLIS)
}

/// Endorser envelope whose payload is not a transaction.
pub fn malformed_action_tx(tx_id: &str) -> Vec<u8> {
    fixtures::envelope(
        header_type::ENDORSER_TRANSACTION,
        CHANNEL,
        tx_id,
        TX_DATE_MILLIS,
        fixtures::GARBAGE.to_vec(),
    )
}

/// Endorser envelope whose chaincode action carries unparseable results.
pub fn malformed_rwset_tx(tx_id: &str) -> Vec<u8> {
    fixtures::envelope(
        header_type::ENDORSER_TRANSACTION,
        CHANNEL,
        tx_id,
        TX_DATE_MILLIS,
        fixtures::endorser_transaction_data(CHAINCODE, fixtures::GARBAGE.to_vec()),
    )
}

/// Block `number` holding `envelopes`, all valid.
pub fn block(number: u64, envelopes: Vec<Vec<u8>>) -> Block {
    to_block(fixtures::block(number, envelopes, None))
}

/// Block `number` holding `envelopes` with explicit validation codes.
pub fn block_with_codes(number: u64, envelopes: Vec<Vec<u8>>, codes: Vec<u8>) -> Block {
    to_block(fixtures::block(number, envelopes, Some(codes)))
}

/// Block `number` whose single transaction puts `value` under `key`.
pub fn put_block(number: u64, key: &str, value: &str) -> Block {
    block(
        number,
        vec![tx(
            &format!("tx-{}", number),
            CHAINCODE,
            vec![fixtures::kv_write(key, value.as_bytes())],
        )],
    )
}

/// Block `number` whose single transaction deletes `key`.
pub fn delete_block(number: u64, key: &str) -> Block {
    block(
        number,
        vec![tx(
            &format!("tx-{}", number),
            CHAINCODE,
            vec![fixtures::kv_delete(key)],
        )],
    )
}

/// Blocks `0..count`, block `n` writing `K{n} = {"n": n}`.
pub fn chain(count: u64) -> Vec<Block> {
    (0..count)
        .map(|n| put_block(n, &format!("K{}", n), &format!(r#"{{"n":{}}}"#, n)))
        .collect()
}

/// Serialized protobuf bytes of block `number` writing `key = value`.
pub fn put_block_bytes(number: u64, key: &str, value: &str) -> Vec<u8> {
    fixtures::block_bytes(
        number,
        vec![tx(
            &format!("tx-{}", number),
            CHAINCODE,
            vec![fixtures::kv_write(key, value.as_bytes())],
        )],
        None,
    )
}
