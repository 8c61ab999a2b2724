//! # Checkpoint Service
//!
//! `CheckpointStore` over any `KeyValueStore`.

use tracing::{debug, warn};

use crate::domain::CheckpointError;
use crate::ports::{CheckpointStore, KeyValueStore};

/// Key under which the marker is stored.
pub const CHECKPOINT_KEY: &[u8] = b"current_block";

/// Checkpoint persisted as decimal text under [`CHECKPOINT_KEY`].
pub struct KvCheckpointStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvCheckpointStore<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KeyValueStore> CheckpointStore for KvCheckpointStore<S> {
    fn load(&self) -> Option<u64> {
        let raw = match self.store.get(CHECKPOINT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                warn!("[hs-02] No checkpoint found, starting from block 0");
                return None;
            }
            Err(e) => {
                warn!("[hs-02] Checkpoint unreadable ({}), starting from block 0", e);
                return None;
            }
        };

        let parsed = std::str::from_utf8(&raw)
            .ok()
            .and_then(|text| text.trim().parse::<u64>().ok());
        match parsed {
            Some(block) => {
                debug!("[hs-02] Loaded checkpoint {}", block);
                Some(block)
            }
            None => {
                warn!(
                    "[hs-02] Checkpoint value {:?} is not a block number, starting from block 0",
                    String::from_utf8_lossy(&raw)
                );
                None
            }
        }
    }

    fn save(&mut self, block: u64) -> Result<(), CheckpointError> {
        self.store
            .put(CHECKPOINT_KEY, block.to_string().as_bytes())
            .map_err(|source| CheckpointError::Write { block, source })?;
        debug!("[hs-02] Saved checkpoint {}", block);
        Ok(())
    }
}
