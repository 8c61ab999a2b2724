//! # Sink Backend
//!
//! The closed set of sink variants, chosen once at startup from settings.

use async_trait::async_trait;
use shared_types::ExtractionResult;
use tracing::info;

use crate::adapters::{ElasticsearchSink, InMemorySink, MeilisearchSink, SqlSink};
use crate::config::SinkConfig;
use crate::domain::SinkError;
use crate::ports::StorageSink;

/// A configured sink.
pub enum SinkBackend {
    /// Elasticsearch bulk API.
    Elasticsearch(ElasticsearchSink),
    /// Meilisearch documents API.
    Meilisearch(MeilisearchSink),
    /// Relational tables.
    Sql(SqlSink),
    /// In-process map.
    InMemory(InMemorySink),
}

impl SinkBackend {
    /// Build the sink described by `config`.
    pub fn from_config(config: &SinkConfig) -> Result<Self, SinkError> {
        let backend = match config {
            SinkConfig::Elasticsearch(es) => Self::Elasticsearch(ElasticsearchSink::new(es.clone())?),
            SinkConfig::Meilisearch(meili) => Self::Meilisearch(MeilisearchSink::new(meili.clone())?),
            SinkConfig::Sql(sql) => Self::Sql(SqlSink::new(sql.clone())?),
        };
        info!("[hs-04] Using {} sink", backend.name());
        Ok(backend)
    }

    fn inner(&self) -> &dyn StorageSink {
        match self {
            Self::Elasticsearch(sink) => sink,
            Self::Meilisearch(sink) => sink,
            Self::Sql(sink) => sink,
            Self::InMemory(sink) => sink,
        }
    }
}

#[async_trait]
impl StorageSink for SinkBackend {
    async fn apply(&self, result: &ExtractionResult) -> Result<(), SinkError> {
        self.inner().apply(result).await
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}
