//! # Ports Module
//!
//! The capability every sink variant provides.

use async_trait::async_trait;
use shared_types::ExtractionResult;

use crate::domain::SinkError;

/// Destination for extraction results.
///
/// `apply` upserts every document of `to_add` and removes every key of
/// `to_remove`, identified by `(chaincode, primary key)`. Documents of the
/// Fabric system namespaces are not indexed. Re-applying the same result is
/// harmless.
#[async_trait]
pub trait StorageSink: Send + Sync {
    /// Apply one batch. Any partial failure fails the whole call.
    async fn apply(&self, result: &ExtractionResult) -> Result<(), SinkError>;

    /// Backend name (for logging).
    fn name(&self) -> &str;
}
