//! # Peer Selection
//!
//! `ledgerHeight` is a block count, so the highest committed block number
//! is the maximum height minus one.

use shared_types::PeerInfo;

/// Highest committed block number across `peers`. `None` when empty.
pub fn chain_height(peers: &[PeerInfo]) -> Option<u64> {
    peers
        .iter()
        .map(|p| p.ledger_height)
        .max()
        .map(|h| h.saturating_sub(1))
}

/// Peers whose ledger height is strictly within `threshold` of the highest.
pub fn select_fresh_peers(peers: &[PeerInfo], threshold: u64) -> Vec<PeerInfo> {
    let Some(max_height) = peers.iter().map(|p| p.ledger_height).max() else {
        return Vec::new();
    };
    peers
        .iter()
        .filter(|p| max_height - p.ledger_height < threshold)
        .cloned()
        .collect()
}
