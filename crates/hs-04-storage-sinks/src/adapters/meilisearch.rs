//! Meilisearch Sink Adapter
//!
//! Each chaincode gets its own index, `<channel>_<chaincode>`, created on
//! first use with `_fabric_id` as primary key and the transaction date as the
//! last ranking rule. Additions and removals are enqueued as tasks; `apply`
//! returns only after every task has succeeded.
//!
//! Meilisearch only accepts `[A-Za-z0-9_-]` in index uids and document ids.
//! Index uids are rewritten to fit; document ids are the ledger keys and are
//! sent unchanged, so a key outside that set fails its task.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{Document, ExtractionResult, FIELD_DATE, FIELD_ID};
use tracing::{debug, info, warn};

use crate::adapters::elasticsearch::index_name;
use crate::config::MeilisearchConfig;
use crate::domain::errors::truncate_body;
use crate::domain::SinkError;
use crate::ports::StorageSink;

/// Longest document id Meilisearch accepts, in bytes.
pub const MAX_DOCUMENT_ID_LEN: usize = 511;

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Index uid for the documents of one chaincode on one channel. Characters
/// Meilisearch rejects (such as the dots of a channel name) become `_`.
pub fn index_uid(channel_id: &str, chaincode_id: &str) -> String {
    index_name(channel_id, chaincode_id)
        .chars()
        .map(|c| if is_allowed_char(c) { c } else { '_' })
        .collect()
}

/// Whether Meilisearch accepts `id` as a document id.
pub fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_DOCUMENT_ID_LEN && id.chars().all(is_allowed_char)
}

/// Ids among `docs` that Meilisearch will reject.
fn rejected_ids<'a>(docs: &[&'a Document]) -> Vec<&'a str> {
    docs.iter()
        .map(|d| d.primary_key.as_str())
        .filter(|id| !is_valid_document_id(id))
        .collect()
}

/// Ranking rules applied to every index created by the sink.
pub fn ranking_rules() -> Vec<String> {
    ["words", "typo", "proximity", "attribute", "sort", "exactness"]
        .iter()
        .map(|r| r.to_string())
        .chain(std::iter::once(format!("{}:desc", FIELD_DATE)))
        .collect()
}

/// Acknowledgement of an enqueued task.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TaskInfo {
    /// Task id to poll.
    #[serde(rename = "taskUid", alias = "uid")]
    pub task_uid: u64,
}

/// Status of a task as reported by `GET /tasks/{uid}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Task id.
    pub uid: u64,
    /// `enqueued`, `processing`, `succeeded`, `failed` or `canceled`.
    pub status: String,
    /// Failure details, present when `status` is `failed`.
    #[serde(default)]
    pub error: Option<Value>,
}

impl TaskStatus {
    /// Whether the task reached a final state.
    pub fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }

    /// `Ok` for a succeeded task, the failure otherwise.
    pub fn into_result(self) -> Result<(), SinkError> {
        if self.status == "succeeded" {
            return Ok(());
        }
        let reason = self
            .error
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("no error details")
            .to_string();
        Err(SinkError::Task {
            uid: self.uid,
            status: self.status,
            reason,
        })
    }
}

/// Documents of a result grouped by target index.
fn group_by_index<'a>(docs: impl Iterator<Item = &'a Document>) -> BTreeMap<String, Vec<&'a Document>> {
    let mut groups: BTreeMap<String, Vec<&Document>> = BTreeMap::new();
    for doc in docs {
        groups
            .entry(index_uid(&doc.channel_id, &doc.chaincode_id))
            .or_default()
            .push(doc);
    }
    groups
}

/// Meilisearch-backed sink.
pub struct MeilisearchSink {
    client: Client,
    config: MeilisearchConfig,
    /// Indexes known to exist with the expected settings.
    known_indexes: Mutex<HashSet<String>>,
}

impl MeilisearchSink {
    /// Create a sink for the configured server.
    pub fn new(config: MeilisearchConfig) -> Result<Self, SinkError> {
        if config.url.is_empty() {
            return Err(SinkError::Config("meilisearch needs a url".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            config,
            known_indexes: Mutex::new(HashSet::new()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if self.config.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.config.api_key)
        }
    }

    async fn expect_success(response: Response) -> Result<Response, SinkError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        })
    }

    async fn enqueue(&self, request: RequestBuilder) -> Result<TaskInfo, SinkError> {
        let response = Self::expect_success(self.authorize(request).send().await?).await?;
        response
            .json::<TaskInfo>()
            .await
            .map_err(|e| SinkError::Parse(e.to_string()))
    }

    /// Poll a task until it reaches a final state.
    pub async fn wait_for_task(&self, task: &TaskInfo) -> Result<(), SinkError> {
        let started = Instant::now();
        let timeout = Duration::from_secs(self.config.task_timeout_secs);
        let interval = Duration::from_millis(self.config.task_poll_interval_ms);

        loop {
            let request = self.client.get(self.url(&format!("/tasks/{}", task.task_uid)));
            let response = Self::expect_success(self.authorize(request).send().await?).await?;
            let status: TaskStatus = response
                .json()
                .await
                .map_err(|e| SinkError::Parse(e.to_string()))?;

            if status.is_finished() {
                return status.into_result();
            }
            if started.elapsed() >= timeout {
                return Err(SinkError::TaskTimeout {
                    uid: task.task_uid,
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Create `uid` with the sink's primary key and ranking rules unless it
    /// already exists.
    pub async fn ensure_index(&self, uid: &str) -> Result<(), SinkError> {
        let known = self.known_indexes.lock().contains(uid);
        if known {
            return Ok(());
        }

        let request = self.client.get(self.url(&format!("/indexes/{}", uid)));
        let response = self.authorize(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            info!("[hs-04] Creating Meilisearch index {}", uid);
            let create = self
                .client
                .post(self.url("/indexes"))
                .json(&json!({ "uid": uid, "primaryKey": FIELD_ID }));
            let task = self.enqueue(create).await?;
            self.wait_for_task(&task).await?;

            let settings = self
                .client
                .patch(self.url(&format!("/indexes/{}/settings", uid)))
                .json(&json!({ "rankingRules": ranking_rules() }));
            let task = self.enqueue(settings).await?;
            self.wait_for_task(&task).await?;
        } else {
            Self::expect_success(response).await?;
        }

        self.known_indexes.lock().insert(uid.to_string());
        Ok(())
    }

    async fn add_documents(&self, uid: &str, docs: &[&Document]) -> Result<TaskInfo, SinkError> {
        let body: Vec<Value> = docs.iter().map(|d| Value::Object(d.data.clone())).collect();
        let request = self
            .client
            .post(self.url(&format!("/indexes/{}/documents", uid)))
            .query(&[("primaryKey", FIELD_ID)])
            .json(&body);
        self.enqueue(request).await
    }

    async fn delete_documents(&self, uid: &str, docs: &[&Document]) -> Result<TaskInfo, SinkError> {
        let ids: Vec<&str> = docs.iter().map(|d| d.primary_key.as_str()).collect();
        let request = self
            .client
            .post(self.url(&format!("/indexes/{}/documents/delete-batch", uid)))
            .json(&ids);
        self.enqueue(request).await
    }
}

#[async_trait]
impl StorageSink for MeilisearchSink {
    async fn apply(&self, result: &ExtractionResult) -> Result<(), SinkError> {
        let additions = group_by_index(result.indexable_additions());
        let removals = group_by_index(result.indexable_removals());
        if additions.is_empty() && removals.is_empty() {
            debug!("[hs-04] Nothing to index");
            return Ok(());
        }

        let mut tasks = Vec::new();
        for (uid, docs) in &additions {
            self.ensure_index(uid).await?;
            tasks.push((uid, rejected_ids(docs), self.add_documents(uid, docs).await?));
        }
        for (uid, docs) in &removals {
            self.ensure_index(uid).await?;
            tasks.push((uid, rejected_ids(docs), self.delete_documents(uid, docs).await?));
        }
        for (uid, rejected, task) in &tasks {
            if let Err(e) = self.wait_for_task(task).await {
                if rejected.is_empty() {
                    warn!("[hs-04] Meilisearch task {} on index {} failed", task.task_uid, uid);
                } else {
                    warn!(
                        "[hs-04] Meilisearch task {} on index {} failed; keys outside [A-Za-z0-9_-]: {:?}",
                        task.task_uid, uid, rejected
                    );
                }
                return Err(e);
            }
        }

        info!(
            "[hs-04] Meilisearch: added {} items, removed {} items",
            additions.values().map(Vec::len).sum::<usize>(),
            removals.values().map(Vec::len).sum::<usize>()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "meilisearch"
    }
}
