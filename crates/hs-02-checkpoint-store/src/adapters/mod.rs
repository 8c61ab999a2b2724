//! # Adapters
//!
//! Production implementations of the outbound ports.

pub mod rocksdb_store;

pub use rocksdb_store::{RocksDbConfig, RocksDbStore};
