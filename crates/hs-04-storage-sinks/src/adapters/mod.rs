//! # Adapters
//!
//! Sink variants behind the `StorageSink` port.

pub mod elasticsearch;
pub mod meilisearch;
pub mod memory;
pub mod sql;

pub use elasticsearch::ElasticsearchSink;
pub use meilisearch::MeilisearchSink;
pub use memory::InMemorySink;
pub use sql::SqlSink;
