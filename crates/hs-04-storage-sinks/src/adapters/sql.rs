//! SQL Sink Adapter
//!
//! One table per channel, one row per document keyed by `(chaincode, id)`.
//! The table is created on first use. A batch is applied inside a single
//! transaction: every upsert and delete commits together or not at all.
//!
//! Connections go through the sqlx `Any` driver; the dialect picks the
//! placeholder style, the JSON column type and the upsert clause.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use shared_types::{Document, ExtractionResult};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::{debug, info};

use crate::config::SqlConfig;
use crate::domain::SinkError;
use crate::ports::StorageSink;

/// SQL flavour spoken by the configured database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// PostgreSQL (`JSONB` column, `ON CONFLICT`).
    Postgres,
    /// MySQL (`JSON` column, `ON DUPLICATE KEY UPDATE`).
    MySql,
    /// SQLite (`TEXT` column, `ON CONFLICT`).
    Sqlite,
}

impl Dialect {
    /// Dialect for a configured driver name.
    pub fn from_driver(driver: &str) -> Result<Self, SinkError> {
        match driver.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(SinkError::Config(format!("Driver {} not supported", other))),
        }
    }

    fn quote(self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{}`", ident),
            Self::Postgres | Self::Sqlite => format!("\"{}\"", ident),
        }
    }

    fn placeholders(self, count: usize) -> Vec<String> {
        (1..=count)
            .map(|i| match self {
                Self::Postgres => format!("${}", i),
                Self::MySql | Self::Sqlite => "?".to_string(),
            })
            .collect()
    }

    /// `CREATE TABLE` statement for `table`.
    pub fn create_table(self, table: &str) -> String {
        let (key, data) = match self {
            Self::Postgres => ("VARCHAR(512)", "JSONB"),
            Self::MySql => ("VARCHAR(512)", "JSON"),
            Self::Sqlite => ("TEXT", "TEXT"),
        };
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id {key} NOT NULL, \
             chaincode VARCHAR(255) NOT NULL, \
             data {data} NOT NULL, \
             created_at BIGINT NOT NULL, \
             updated_at BIGINT NOT NULL, \
             PRIMARY KEY (chaincode, id))",
            self.quote(table),
        )
    }

    /// Insert-or-replace statement binding `(id, chaincode, data, created_at, updated_at)`.
    pub fn upsert(self, table: &str) -> String {
        let p = self.placeholders(5);
        let data = match self {
            Self::Postgres => format!("CAST({} AS JSONB)", p[2]),
            Self::MySql | Self::Sqlite => p[2].clone(),
        };
        let on_conflict = match self {
            Self::MySql => "ON DUPLICATE KEY UPDATE data = VALUES(data), updated_at = VALUES(updated_at)",
            Self::Postgres | Self::Sqlite => {
                "ON CONFLICT (chaincode, id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at"
            }
        };
        format!(
            "INSERT INTO {} (id, chaincode, data, created_at, updated_at) VALUES ({}, {}, {}, {}, {}) {}",
            self.quote(table),
            p[0],
            p[1],
            data,
            p[3],
            p[4],
            on_conflict
        )
    }

    /// Delete statement binding `(chaincode, id)`.
    pub fn delete(self, table: &str) -> String {
        let p = self.placeholders(2);
        format!(
            "DELETE FROM {} WHERE chaincode = {} AND id = {}",
            self.quote(table),
            p[0],
            p[1]
        )
    }
}

/// Table holding the documents of `channel_id`. Anything outside
/// `[A-Za-z0-9_]` becomes `_`.
pub fn table_name(channel_id: &str) -> String {
    channel_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn group_by_table<'a>(docs: impl Iterator<Item = &'a Document>) -> BTreeMap<String, Vec<&'a Document>> {
    let mut groups: BTreeMap<String, Vec<&Document>> = BTreeMap::new();
    for doc in docs {
        groups.entry(table_name(&doc.channel_id)).or_default().push(doc);
    }
    groups
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Relational-database sink.
pub struct SqlSink {
    pool: AnyPool,
    dialect: Dialect,
    /// Tables known to exist.
    known_tables: Mutex<HashSet<String>>,
}

impl SqlSink {
    /// Create a sink for the configured database. Connections are opened on
    /// first use; the pool's maintenance task needs a running Tokio runtime.
    pub fn new(config: SqlConfig) -> Result<Self, SinkError> {
        let dialect = Dialect::from_driver(&config.driver)?;
        if config.data_source.is_empty() {
            return Err(SinkError::Config("sql needs a data_source".to_string()));
        }
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy(&config.data_source)?;

        Ok(Self {
            pool,
            dialect,
            known_tables: Mutex::new(HashSet::new()),
        })
    }

    /// Dialect in use.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Connection pool, for inspection.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Create `table` unless it is already known to exist.
    pub async fn ensure_table(&self, table: &str) -> Result<(), SinkError> {
        let known = self.known_tables.lock().contains(table);
        if known {
            return Ok(());
        }

        debug!("[hs-04] Ensuring SQL table {}", table);
        sqlx::query(&self.dialect.create_table(table))
            .execute(&self.pool)
            .await?;

        self.known_tables.lock().insert(table.to_string());
        Ok(())
    }
}

#[async_trait]
impl StorageSink for SqlSink {
    async fn apply(&self, result: &ExtractionResult) -> Result<(), SinkError> {
        let additions = group_by_table(result.indexable_additions());
        let removals = group_by_table(result.indexable_removals());
        if additions.is_empty() && removals.is_empty() {
            debug!("[hs-04] Nothing to index");
            return Ok(());
        }

        // Outside the transaction: MySQL commits implicitly on DDL.
        for table in additions.keys().chain(removals.keys()) {
            self.ensure_table(table).await?;
        }

        let now = now_millis();
        let mut tx = self.pool.begin().await?;
        for (table, docs) in &additions {
            let statement = self.dialect.upsert(table);
            for doc in docs {
                sqlx::query(&statement)
                    .bind(doc.primary_key.as_str())
                    .bind(doc.chaincode_id.as_str())
                    .bind(Value::Object(doc.data.clone()).to_string())
                    .bind(now)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        for (table, docs) in &removals {
            let statement = self.dialect.delete(table);
            for doc in docs {
                sqlx::query(&statement)
                    .bind(doc.chaincode_id.as_str())
                    .bind(doc.primary_key.as_str())
                    .execute(&mut *tx)
                    .await?;
            }
        }
        tx.commit().await?;

        let added: Vec<&str> = additions
            .values()
            .flatten()
            .take(10)
            .map(|d| d.primary_key.as_str())
            .collect();
        info!(
            "[hs-04] SQL: added {} items {:?}, removed {} items",
            additions.values().map(Vec::len).sum::<usize>(),
            added,
            removals.values().map(Vec::len).sum::<usize>()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "sql"
    }
}
