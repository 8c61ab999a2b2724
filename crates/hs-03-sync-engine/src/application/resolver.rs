//! # Peer/Height Resolver
//!
//! One membership query yields both the chain height and the peers worth
//! fetching from.

use std::sync::Arc;

use shared_types::PeerInfo;
use tracing::debug;

use crate::algorithms::{chain_height, select_fresh_peers};
use crate::domain::SyncError;
use crate::ports::LedgerClient;

/// Chain view derived from a single membership query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSnapshot {
    /// Highest committed block number.
    pub height: u64,
    /// Peers within the freshness threshold.
    pub targets: Vec<PeerInfo>,
}

/// Resolves chain height and target peers from channel membership.
pub struct PeerResolver<L: LedgerClient> {
    client: Arc<L>,
    freshness_threshold: u64,
}

impl<L: LedgerClient> PeerResolver<L> {
    /// Create a resolver over `client`.
    pub fn new(client: Arc<L>, freshness_threshold: u64) -> Self {
        Self {
            client,
            freshness_threshold,
        }
    }

    /// Query membership once and derive height and targets.
    pub async fn resolve(&self) -> Result<PeerSnapshot, SyncError> {
        let peers = self.client.list_peers().await?;
        let height = chain_height(&peers).ok_or(SyncError::NoPeers)?;
        let targets = select_fresh_peers(&peers, self.freshness_threshold);

        debug!(
            height,
            peers = peers.len(),
            targets = targets.len(),
            "[hs-03] Resolved channel membership"
        );
        Ok(PeerSnapshot { height, targets })
    }

    /// Highest committed block number.
    pub async fn current_height(&self) -> Result<u64, SyncError> {
        Ok(self.resolve().await?.height)
    }

    /// Peers within the freshness threshold of the highest peer.
    pub async fn target_peers(&self) -> Result<Vec<PeerInfo>, SyncError> {
        Ok(self.resolve().await?.targets)
    }
}
