//! # Outbound Ports (Driven Ports)
//!
//! Storage the checkpoint store requires.

use std::collections::HashMap;

use crate::domain::KvStoreError;

/// Abstract interface for key-value database operations.
///
/// Production: `RocksDbStore` (adapters/rocksdb_store.rs)
/// Testing: `InMemoryKVStore` (below)
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvStoreError>;
}

/// In-memory key-value store for unit testing.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
    /// Reject every read with an I/O error.
    pub fail_reads: bool,
    /// Reject every write with an I/O error.
    pub fail_writes: bool,
}

impl InMemoryKVStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one raw entry.
    pub fn with_entry(key: &[u8], value: &[u8]) -> Self {
        let mut store = Self::default();
        store.data.insert(key.to_vec(), value.to_vec());
        store
    }

    fn io_error(op: &str) -> KvStoreError {
        KvStoreError::IoError {
            message: format!("simulated {} failure", op),
        }
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvStoreError> {
        if self.fail_reads {
            return Err(Self::io_error("read"));
        }
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvStoreError> {
        if self.fail_writes {
            return Err(Self::io_error("write"));
        }
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
