//! # Sink Configuration
//!
//! Selected once at startup from the `[database]` settings section.

use serde::{Deserialize, Serialize};

/// Backend selection, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkConfig {
    /// Elasticsearch bulk API.
    Elasticsearch(ElasticsearchConfig),
    /// Meilisearch documents API.
    Meilisearch(MeilisearchConfig),
    /// Relational database, one table per channel.
    Sql(SqlConfig),
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::Meilisearch(MeilisearchConfig::default())
    }
}

/// Elasticsearch settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchConfig {
    /// Cluster nodes, tried in order until one answers.
    pub urls: Vec<String>,

    /// Basic auth user; empty disables auth.
    pub user: String,

    /// Basic auth password.
    pub password: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            urls: vec!["http://localhost:9200".to_string()],
            user: String::new(),
            password: String::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Meilisearch settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeilisearchConfig {
    /// Server URL.
    pub url: String,

    /// API key sent as a bearer token; empty disables auth.
    #[serde(alias = "apiKey")]
    pub api_key: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Delay between task status polls in milliseconds.
    pub task_poll_interval_ms: u64,

    /// Give up waiting for a task after this many seconds.
    pub task_timeout_secs: u64,
}

impl Default for MeilisearchConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7700".to_string(),
            api_key: String::new(),
            request_timeout_secs: 30,
            task_poll_interval_ms: 100,
            task_timeout_secs: 60,
        }
    }
}

/// Relational database settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    /// `postgres`, `mysql` or `sqlite`.
    pub driver: String,

    /// Connection URL, e.g. `postgres://user:pw@host/db`.
    #[serde(alias = "dataSource")]
    pub data_source: String,

    /// Pool size.
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    pub connect_timeout_secs: u64,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            driver: "postgres".to_string(),
            data_source: String::new(),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }
}

impl SqlConfig {
    /// Create a config for testing (single connection).
    pub fn for_testing(driver: impl Into<String>, data_source: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            data_source: data_source.into(),
            max_connections: 1,
            connect_timeout_secs: 5,
        }
    }
}

impl MeilisearchConfig {
    /// Create a config for testing (fast polling).
    pub fn for_testing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: String::new(),
            request_timeout_secs: 5,
            task_poll_interval_ms: 5,
            task_timeout_secs: 2,
        }
    }
}

impl ElasticsearchConfig {
    /// Create a config for testing.
    pub fn for_testing(urls: Vec<String>) -> Self {
        Self {
            urls,
            user: String::new(),
            password: String::new(),
            request_timeout_secs: 5,
        }
    }
}
