//! Document builder.
//!
//! One write plus its transaction context becomes one document. Chaincodes
//! are expected to store JSON objects; anything else is wrapped as
//! `{"value": <text>}` so every document body is an object.

use serde_json::{Map, Value};
use shared_types::{Document, Write, FIELD_DATE, FIELD_ID, FIELD_TXID};
use tracing::warn;

use crate::domain::normalize_key;

/// Field holding a non-object value.
pub const WRAPPED_VALUE_FIELD: &str = "value";

/// Build the document for `write`. Reserved `_fabric_*` fields overwrite any
/// chaincode field of the same name.
pub fn build_document(
    write: &Write,
    tx_id: &str,
    tx_date_millis: i64,
    channel_id: &str,
    block_number: u64,
) -> Document {
    let primary_key = normalize_key(&write.key);

    let mut data = match serde_json::from_slice::<Value>(&write.value) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!(
                "[hs-01] Non-object JSON for key {} in {} (tx {}), wrapping",
                primary_key, write.namespace, tx_id
            );
            wrap(&write.value)
        }
        Err(_) => wrap(&write.value),
    };

    data.insert(FIELD_ID.to_string(), Value::String(primary_key.clone()));
    data.insert(FIELD_TXID.to_string(), Value::String(tx_id.to_string()));
    data.insert(FIELD_DATE.to_string(), Value::from(tx_date_millis));

    Document {
        primary_key,
        channel_id: channel_id.to_string(),
        chaincode_id: write.namespace.clone(),
        tx_id: tx_id.to_string(),
        tx_date_millis,
        block_number,
        data,
    }
}

fn wrap(value: &[u8]) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        WRAPPED_VALUE_FIELD.to_string(),
        Value::String(String::from_utf8_lossy(value).into_owned()),
    );
    map
}
