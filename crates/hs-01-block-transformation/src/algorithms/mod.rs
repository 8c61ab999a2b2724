//! # Algorithms Module
//!
//! Pure functions from block bytes to extraction results.

pub mod batch_merger;
pub mod block_transformer;
pub mod document_builder;
pub mod envelope;
pub mod write_decoder;

pub use batch_merger::{merge_results, transform_blocks};
pub use block_transformer::transform_block;
pub use document_builder::build_document;
pub use envelope::{decode_envelope, extract_chaincode_action, DecodedEnvelope};
pub use write_decoder::decode_writes;
