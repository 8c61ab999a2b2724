//! # Sync Engine Configuration
//!
//! Tuning knobs for the sync loop. The defaults match a single channel on a
//! production network.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Blocks fetched per catch-up batch.
pub const DEFAULT_BATCH_SIZE: u64 = 2000;

/// Lag (in blocks) above which the loop switches to catch-up.
pub const DEFAULT_MAX_ALLOWED_LAG: u64 = 1;

/// Peers further than this behind the highest peer are not queried.
pub const DEFAULT_PEER_FRESHNESS_THRESHOLD: u64 = 1000;

/// Sync engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Channel to replicate.
    pub channel_name: String,

    /// First block to fetch, ignoring any stored checkpoint.
    pub start_block_override: Option<u64>,

    /// Maximum blocks per catch-up batch. Must be positive.
    pub batch_size: u64,

    /// Lag threshold between catch-up and tailing.
    pub max_allowed_lag: u64,

    /// Sleep between tailing iterations, in seconds.
    pub idle_interval_secs: u64,

    /// Upper bound for a single block fetch, in seconds.
    pub fetch_timeout_secs: u64,

    /// Maximum distance from the highest peer for a peer to be targeted.
    pub peer_freshness_threshold: u64,

    /// Block fetches in flight within one range.
    pub fetch_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel_name: "mychannel".to_string(),
            start_block_override: None,
            batch_size: DEFAULT_BATCH_SIZE,
            max_allowed_lag: DEFAULT_MAX_ALLOWED_LAG,
            idle_interval_secs: 10,
            fetch_timeout_secs: 30,
            peer_freshness_threshold: DEFAULT_PEER_FRESHNESS_THRESHOLD,
            fetch_concurrency: 4,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (small batches, no idle wait).
    pub fn for_testing() -> Self {
        Self {
            channel_name: "testchannel".to_string(),
            start_block_override: None,
            batch_size: 10,
            max_allowed_lag: DEFAULT_MAX_ALLOWED_LAG,
            idle_interval_secs: 0,
            fetch_timeout_secs: 5,
            peer_freshness_threshold: DEFAULT_PEER_FRESHNESS_THRESHOLD,
            fetch_concurrency: 2,
        }
    }

    /// Idle sleep as a [`Duration`].
    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_secs)
    }

    /// Per-fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Batch size clamped to at least one block.
    pub fn effective_batch_size(&self) -> u64 {
        self.batch_size.max(1)
    }

    /// Fetch concurrency clamped to at least one request.
    pub fn effective_fetch_concurrency(&self) -> usize {
        self.fetch_concurrency.max(1)
    }
}

/// Connection settings for the ledger gateway.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Base URL of the gateway.
    pub gateway_url: String,

    /// Organization (MSP) the client acts for.
    pub org: String,

    /// Enrolled user within `org`.
    pub user: String,

    /// Timeout for a single HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:7080".to_string(),
            org: "Org1".to_string(),
            user: "User1".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl LedgerConfig {
    /// Create a config pointing at `gateway_url`.
    pub fn for_testing(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            request_timeout_secs: 5,
            ..Self::default()
        }
    }
}
