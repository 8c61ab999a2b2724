//! # Outbound Ports
//!
//! The ledger as seen by the sync loop: channel membership and raw blocks.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{Block, PeerInfo};

use crate::domain::SyncError;

/// Ledger client - outbound port.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch block `number` from one of `targets`.
    async fn get_block(&self, number: u64, targets: &[PeerInfo]) -> Result<Block, SyncError>;

    /// Current channel membership with ledger heights.
    async fn list_peers(&self) -> Result<Vec<PeerInfo>, SyncError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Mock ledger serving blocks from memory.
///
/// Unless peers are set explicitly, membership is a single peer whose
/// ledger height covers the highest stored block.
#[derive(Default)]
pub struct MockLedgerClient {
    blocks: RwLock<BTreeMap<u64, Block>>,
    peers: RwLock<Option<Vec<PeerInfo>>>,
    fail_fetch: AtomicBool,
    fail_peers: AtomicBool,
    fetch_delay: RwLock<Option<Duration>>,
    fetched: Mutex<Vec<u64>>,
}

impl MockLedgerClient {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger holding `blocks`, each stored under its own number.
    pub fn with_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let client = Self::new();
        for block in blocks {
            client.push_block(block);
        }
        client
    }

    /// Store `block` under its own number.
    pub fn push_block(&self, block: Block) {
        self.blocks.write().insert(block.number, block);
    }

    /// Serve `block` when `number` is requested.
    pub fn insert_block_at(&self, number: u64, block: Block) {
        self.blocks.write().insert(number, block);
    }

    /// Replace the reported membership.
    pub fn set_peers(&self, peers: Vec<PeerInfo>) {
        *self.peers.write() = Some(peers);
    }

    /// Make block fetches fail.
    pub fn set_fetch_failure(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make membership queries fail.
    pub fn set_peers_failure(&self, fail: bool) {
        self.fail_peers.store(fail, Ordering::SeqCst);
    }

    /// Delay every block fetch.
    pub fn set_fetch_delay(&self, delay: Option<Duration>) {
        *self.fetch_delay.write() = delay;
    }

    /// Block numbers requested so far, in request order.
    pub fn fetched(&self) -> Vec<u64> {
        self.fetched.lock().clone()
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn get_block(&self, number: u64, _targets: &[PeerInfo]) -> Result<Block, SyncError> {
        self.fetched.lock().push(number);

        let delay = *self.fetch_delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(SyncError::Fetch {
                block: number,
                reason: "Mock failure".to_string(),
            });
        }

        self.blocks
            .read()
            .get(&number)
            .cloned()
            .ok_or_else(|| SyncError::Fetch {
                block: number,
                reason: "block not found".to_string(),
            })
    }

    async fn list_peers(&self) -> Result<Vec<PeerInfo>, SyncError> {
        if self.fail_peers.load(Ordering::SeqCst) {
            return Err(SyncError::HeightResolution("Mock failure".to_string()));
        }
        if let Some(peers) = self.peers.read().clone() {
            return Ok(peers);
        }
        Ok(self
            .blocks
            .read()
            .keys()
            .next_back()
            .map(|highest| vec![PeerInfo::new("mock-peer", "MockMSP", highest + 1)])
            .unwrap_or_default())
    }
}
