//! Elasticsearch Sink Adapter
//!
//! One `_bulk` request per batch: an `index` action per document to add and
//! a `delete` action per key to remove. Each chaincode gets its own index,
//! named `<channel>_<chaincode>` in lowercase.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{Document, ExtractionResult};
use tracing::{debug, info, warn};

use crate::config::ElasticsearchConfig;
use crate::domain::errors::truncate_body;
use crate::domain::SinkError;
use crate::ports::StorageSink;

/// Index holding the documents of one chaincode on one channel.
pub fn index_name(channel_id: &str, chaincode_id: &str) -> String {
    format!("{}_{}", channel_id, chaincode_id).to_lowercase()
}

/// Build the NDJSON body of a bulk request. Returns `None` when there is
/// nothing to send.
pub fn build_bulk_body(result: &ExtractionResult) -> Option<String> {
    let mut body = String::new();

    for doc in result.indexable_additions() {
        push_action(&mut body, "index", doc);
        body.push_str(&Value::Object(doc.data.clone()).to_string());
        body.push('\n');
    }
    for doc in result.indexable_removals() {
        push_action(&mut body, "delete", doc);
    }

    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

fn push_action(body: &mut String, action: &str, doc: &Document) {
    let line = json!({
        action: {
            "_index": index_name(&doc.channel_id, &doc.chaincode_id),
            "_id": doc.primary_key,
        }
    });
    body.push_str(&line.to_string());
    body.push('\n');
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(rename = "_index", default)]
    index: String,
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(default)]
    error: Option<Value>,
}

/// Map a bulk response body to the first failing item, if any.
pub fn check_bulk_response(body: &str) -> Result<(), SinkError> {
    let response: BulkResponse =
        serde_json::from_str(body).map_err(|e| SinkError::Parse(e.to_string()))?;
    if !response.errors {
        return Ok(());
    }

    let failed = response
        .items
        .into_iter()
        .flat_map(|item| item.into_values())
        .find(|item| item.error.is_some());

    Err(match failed {
        Some(item) => {
            let reason = item.error.as_ref().map(describe_error).unwrap_or_default();
            SinkError::BulkItem {
                index: item.index,
                id: item.id,
                reason,
            }
        }
        None => SinkError::BulkItem {
            index: String::new(),
            id: String::new(),
            reason: "errors flagged without a failing item".to_string(),
        },
    })
}

fn describe_error(error: &Value) -> String {
    error
        .get("reason")
        .or_else(|| error.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// Elasticsearch-backed sink.
pub struct ElasticsearchSink {
    client: Client,
    config: ElasticsearchConfig,
}

impl ElasticsearchSink {
    /// Create a sink for the configured cluster.
    pub fn new(config: ElasticsearchConfig) -> Result<Self, SinkError> {
        if config.urls.is_empty() {
            return Err(SinkError::Config("elasticsearch needs at least one url".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { client, config })
    }

    async fn post_bulk(&self, url: &str, body: String) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self
            .client
            .post(format!("{}/_bulk", url.trim_end_matches('/')))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);
        if !self.config.user.is_empty() {
            request = request.basic_auth(&self.config.user, Some(&self.config.password));
        }
        request.send().await
    }

    /// Send `body` to the first node that answers.
    async fn send_bulk(&self, body: String) -> Result<(StatusCode, String), SinkError> {
        let mut last_error = String::new();

        for url in &self.config.urls {
            match self.post_bulk(url, body.clone()).await {
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await?;
                    return Ok((status, text));
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    warn!("[hs-04] Elasticsearch node {} unreachable: {}", url, e);
                    last_error = e.to_string();
                }
                Err(e) => return Err(SinkError::Http(e)),
            }
        }

        Err(SinkError::Unavailable {
            urls: self.config.urls.clone(),
            reason: last_error,
        })
    }
}

#[async_trait]
impl StorageSink for ElasticsearchSink {
    async fn apply(&self, result: &ExtractionResult) -> Result<(), SinkError> {
        let added = result.indexable_additions().count();
        let removed = result.indexable_removals().count();
        let Some(body) = build_bulk_body(result) else {
            debug!("[hs-04] Nothing to index");
            return Ok(());
        };

        let (status, text) = self.send_bulk(body).await?;
        if !status.is_success() {
            return Err(SinkError::Status {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }
        check_bulk_response(&text)?;

        info!(
            "[hs-04] Elasticsearch: added {} items, removed {} items",
            added, removed
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "elasticsearch"
    }
}
