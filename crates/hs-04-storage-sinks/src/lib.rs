//! # HS-04 Storage Sinks
//!
//! Applies extraction results to external search indexes and relational
//! tables.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Backends
//!
//! | Backend | Index layout | Write path |
//! |---------|--------------|------------|
//! | Elasticsearch | `<channel>_<chaincode>` | one `_bulk` request per batch |
//! | Meilisearch | `<channel>_<chaincode>` | add + delete-batch tasks, awaited |
//! | SQL | table `<channel>`, key `(chaincode, id)` | upserts + deletes in one transaction |
//! | In-memory | single map | direct |
//!
//! Every backend skips the Fabric system namespaces (`lscc`, `_lifecycle`)
//! and fails the whole batch on any item failure, so the caller never
//! advances its checkpoint past unconfirmed data.
//!
//! ## Module Structure
//!
//! ```text
//! hs-04-storage-sinks/
//! ├── domain/          # SinkError
//! ├── ports/           # StorageSink
//! ├── adapters/        # Elasticsearch, Meilisearch, SQL, in-memory
//! ├── backend.rs       # SinkBackend (closed set of variants)
//! └── config.rs        # SinkConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod backend;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{ElasticsearchSink, InMemorySink, MeilisearchSink, SqlSink};
pub use backend::SinkBackend;
pub use config::{ElasticsearchConfig, MeilisearchConfig, SinkConfig, SqlConfig};
pub use domain::SinkError;
pub use ports::StorageSink;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
