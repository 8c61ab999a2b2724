//! # Domain Errors
//!
//! Error types for storage sinks.

use thiserror::Error;

/// Storage sink error types.
///
/// Any of these fails the whole `apply` call; partial success is never
/// reported as success.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Transport failure talking to the backend.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Database failure; the batch transaction was rolled back.
    #[error("Database error: {0}")]
    Sql(#[from] sqlx::Error),

    /// None of the configured nodes answered.
    #[error("No reachable node among {urls:?}: {reason}")]
    Unavailable {
        /// Nodes that were tried, in order
        urls: Vec<String>,
        /// Failure of the last attempt
        reason: String,
    },

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// A bulk request item was rejected.
    #[error("Bulk item {id} in {index} rejected: {reason}")]
    BulkItem {
        /// Target index
        index: String,
        /// Document id
        id: String,
        /// Backend reason
        reason: String,
    },

    /// An asynchronous indexing task did not succeed.
    #[error("Task {uid} ended as {status}: {reason}")]
    Task {
        /// Task id
        uid: u64,
        /// Final task status
        status: String,
        /// Backend reason
        reason: String,
    },

    /// An asynchronous indexing task did not finish in time.
    #[error("Task {uid} still pending after {waited_ms}ms")]
    TaskTimeout {
        /// Task id
        uid: u64,
        /// Time spent polling
        waited_ms: u64,
    },

    /// The backend answered with an unexpected body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The sink settings are unusable.
    #[error("Invalid sink configuration: {0}")]
    Config(String),

    /// The sink refused the batch (test sinks).
    #[error("Batch rejected: {0}")]
    Rejected(String),
}

/// Truncate a response body for inclusion in an error.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
