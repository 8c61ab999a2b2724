//! Ledger gateway client.
//!
//! Talks to an HTTP gateway in front of the channel's peers:
//!
//! - `GET {gateway}/channels/{channel}/peers` returns membership as JSON.
//! - `GET {gateway}/channels/{channel}/blocks/{n}?target=..` returns the
//!   protobuf `common.Block` bytes, fetched from one of the target peers.
//!
//! Every request carries the `X-Fabric-Org` and `X-Fabric-User` identity
//! headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use shared_types::{Block, PeerInfo};
use tracing::debug;

use crate::config::LedgerConfig;
use crate::domain::SyncError;
use crate::ports::LedgerClient;

/// Organization header.
pub const ORG_HEADER: &str = "X-Fabric-Org";

/// User header.
pub const USER_HEADER: &str = "X-Fabric-User";

/// Gateway-backed ledger client for one channel.
pub struct GatewayLedgerClient {
    client: Client,
    config: LedgerConfig,
    channel: String,
}

impl GatewayLedgerClient {
    /// Create a client for `channel`.
    pub fn new(config: LedgerConfig, channel: impl Into<String>) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| SyncError::HeightResolution(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            channel: channel.into(),
        })
    }

    /// URL of the membership endpoint.
    pub fn peers_url(&self) -> String {
        format!("{}/peers", self.channel_url())
    }

    /// URL of block `number`.
    pub fn block_url(&self, number: u64) -> String {
        format!("{}/blocks/{}", self.channel_url(), number)
    }

    fn channel_url(&self) -> String {
        format!(
            "{}/channels/{}",
            self.config.gateway_url.trim_end_matches('/'),
            self.channel
        )
    }

    fn with_identity(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ORG_HEADER, &self.config.org)
            .header(USER_HEADER, &self.config.user)
    }
}

#[async_trait]
impl LedgerClient for GatewayLedgerClient {
    async fn get_block(&self, number: u64, targets: &[PeerInfo]) -> Result<Block, SyncError> {
        let fetch_error = |reason: String| SyncError::Fetch {
            block: number,
            reason,
        };

        let query: Vec<(&str, &str)> = targets.iter().map(|p| ("target", p.url.as_str())).collect();
        let response = self
            .with_identity(self.client.get(self.block_url(number)))
            .query(&query)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(fetch_error(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        let block = Block::from_proto_bytes(&bytes).map_err(|e| fetch_error(e.to_string()))?;

        debug!(
            block = number,
            txs = block.transactions.len(),
            "[hs-03] Fetched block from gateway"
        );
        Ok(block)
    }

    async fn list_peers(&self) -> Result<Vec<PeerInfo>, SyncError> {
        let response = self
            .with_identity(self.client.get(self.peers_url()))
            .send()
            .await
            .map_err(|e| SyncError::HeightResolution(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::HeightResolution(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<Vec<PeerInfo>>()
            .await
            .map_err(|e| SyncError::HeightResolution(format!("bad membership response: {}", e)))
    }
}
