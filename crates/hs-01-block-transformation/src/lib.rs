//! # HS-01 Block Transformation
//!
//! Turns committed Fabric blocks into storage-agnostic documents.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (domain + pure algorithms, no I/O)
//!
//! ## Purpose
//!
//! Walk each transaction envelope of a block down to its key/value writes and
//! emit one [`Document`](shared_types::Document) per write, collected into an
//! [`ExtractionResult`](shared_types::ExtractionResult). Results of consecutive
//! blocks merge into one batch before a sink sees them.
//!
//! ## Failure Policy
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Envelope, payload or channel header undecodable | whole block fails |
//! | Chaincode action undecodable | transaction skipped, warning logged |
//! | Read/write set undecodable | whole block fails |
//! | Transaction flagged invalid | transaction skipped |
//! | Unknown header type | transaction skipped, warning logged |
//!
//! ## Module Structure
//!
//! ```text
//! hs-01-block-transformation/
//! ├── domain/          # DecodeError, TransformError, key normalization
//! └── algorithms/      # envelope walk, write decoder, document builder,
//!                      # block transformer, batch merger
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{
    build_document, decode_envelope, decode_writes, extract_chaincode_action, merge_results,
    transform_block, transform_blocks, DecodedEnvelope,
};
pub use domain::{normalize_key, DecodeError, TransformError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
