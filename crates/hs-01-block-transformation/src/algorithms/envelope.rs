//! Envelope walking.
//!
//! `decode_envelope` reads the outer layers every transaction has;
//! `extract_chaincode_action` follows an endorser transaction down to the
//! chaincode action holding its read/write set.

use fabric_proto::common::{ChannelHeader, Envelope, Payload};
use fabric_proto::peer::{ChaincodeAction, ChaincodeActionPayload, ProposalResponsePayload, Transaction};
use prost::Message;
use shared_types::{HeaderType, TransactionMeta};

use crate::domain::DecodeError;

/// Outer layers of a transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEnvelope {
    /// Channel header fields.
    pub meta: TransactionMeta,
    /// Type-specific payload data.
    pub data: Vec<u8>,
}

/// Decode envelope, payload, header and channel header.
pub fn decode_envelope(bytes: &[u8]) -> Result<DecodedEnvelope, DecodeError> {
    let envelope = Envelope::decode(bytes).map_err(|e| DecodeError::Envelope(e.to_string()))?;
    let payload = Payload::decode(envelope.payload.as_slice())
        .map_err(|e| DecodeError::Payload(e.to_string()))?;
    let header = payload.header.ok_or(DecodeError::MissingHeader)?;
    let channel_header = ChannelHeader::decode(header.channel_header.as_slice())
        .map_err(|e| DecodeError::ChannelHeader(e.to_string()))?;
    let timestamp = channel_header
        .timestamp
        .ok_or(DecodeError::MissingTimestamp)?;
    let timestamp_millis = timestamp
        .seconds
        .checked_mul(1000)
        .and_then(|ms| ms.checked_add(i64::from(timestamp.nanos) / 1_000_000))
        .ok_or(DecodeError::InvalidTimestamp {
            seconds: timestamp.seconds,
            nanos: timestamp.nanos,
        })?;

    Ok(DecodedEnvelope {
        meta: TransactionMeta {
            header_type: HeaderType::from(channel_header.r#type),
            channel_id: channel_header.channel_id,
            tx_id: channel_header.tx_id,
            timestamp_millis,
        },
        data: payload.data,
    })
}

/// Follow an endorser transaction's payload data to its first chaincode
/// action.
pub fn extract_chaincode_action(data: &[u8]) -> Result<ChaincodeAction, DecodeError> {
    let tx = Transaction::decode(data).map_err(|e| DecodeError::Transaction(e.to_string()))?;
    let action = tx.actions.into_iter().next().ok_or(DecodeError::NoActions)?;

    let action_payload = ChaincodeActionPayload::decode(action.payload.as_slice())
        .map_err(|e| DecodeError::ActionPayload(e.to_string()))?;
    let endorsed = action_payload
        .action
        .ok_or(DecodeError::MissingEndorsedAction)?;

    let response_payload = ProposalResponsePayload::decode(endorsed.proposal_response_payload.as_slice())
        .map_err(|e| DecodeError::ProposalResponse(e.to_string()))?;

    ChaincodeAction::decode(response_payload.extension.as_slice())
        .map_err(|e| DecodeError::ChaincodeAction(e.to_string()))
}
