//! Block transformer.
//!
//! Per transaction in block order: skip if invalidated, decode the envelope,
//! and for endorser transactions turn every write into a document. Later
//! writes to a key replace earlier ones in the result.

use shared_types::{Block, ExtractionResult, HeaderType};
use tracing::{debug, warn};

use crate::algorithms::{build_document, decode_envelope, decode_writes, extract_chaincode_action};
use crate::domain::TransformError;

/// Transform one block into its add/remove sets.
pub fn transform_block(block: &Block) -> Result<ExtractionResult, TransformError> {
    let mut result = ExtractionResult::new();

    for (index, raw) in block.transactions.iter().enumerate() {
        if !block.is_valid(index) {
            debug!(
                "[hs-01] Block {}: skipping invalidated transaction {}",
                block.number, index
            );
            continue;
        }

        let envelope = decode_envelope(raw).map_err(|source| TransformError::Envelope {
            block: block.number,
            index,
            source,
        })?;
        let meta = envelope.meta;

        match meta.header_type {
            HeaderType::EndorserTransaction => {}
            HeaderType::Unknown(code) => {
                warn!(
                    "[hs-01] Block {}: unknown header type {} for tx {}",
                    block.number, code, meta.tx_id
                );
                continue;
            }
            other => {
                debug!(
                    "[hs-01] Block {}: ignoring {:?} transaction {}",
                    block.number, other, meta.tx_id
                );
                continue;
            }
        }

        let action = match extract_chaincode_action(&envelope.data) {
            Ok(action) => action,
            Err(e) => {
                warn!(
                    "[hs-01] Block {}: skipping tx {}, no chaincode action: {}",
                    block.number, meta.tx_id, e
                );
                continue;
            }
        };

        let writes =
            decode_writes(&action.results).map_err(|source| TransformError::ReadWriteSet {
                block: block.number,
                tx_id: meta.tx_id.clone(),
                source,
            })?;

        for write in &writes {
            let doc = build_document(
                write,
                &meta.tx_id,
                meta.timestamp_millis,
                &meta.channel_id,
                block.number,
            );
            if write.is_delete {
                result.remove(doc);
            } else {
                result.add(doc);
            }
        }
    }

    debug!(
        "[hs-01] Block {}: {} to add, {} to remove",
        block.number,
        result.to_add().len(),
        result.to_remove().len()
    );
    Ok(result)
}
