//! # Settings
//!
//! Layered configuration: TOML file, then `HLF_*` environment variables,
//! then command line flags.
//!
//! ```toml
//! [ledger]
//! gateway_url = "http://fabric-gateway:7080"
//! org = "Org1"
//! user = "admin"
//!
//! [sync]
//! channel_name = "mychannel"
//! batch_size = 2000
//!
//! [database]
//! type = "elasticsearch"
//! urls = ["http://es1:9200", "http://es2:9200"]
//! user = "elastic"
//! password = "changeme"
//!
//! [checkpoint]
//! path = "hlf-sync.db"
//! ```
//!
//! A relational sink instead:
//!
//! ```toml
//! [database]
//! type = "sql"
//! driver = "postgres"
//! data_source = "postgres://hlf:secret@db:5432/hlf"
//! ```

use std::fs;
use std::path::Path;

use hs_02_checkpoint_store::RocksDbConfig;
use hs_03_sync_engine::{LedgerConfig, SyncConfig};
use hs_04_storage_sinks::SinkConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::SyncArgs;

/// Settings errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        error: String,
    },

    /// The settings file is not valid TOML for [`Settings`].
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
    },

    /// The merged settings are inconsistent.
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Checkpoint database settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointSettings {
    /// Database directory.
    pub path: String,
    /// fsync every checkpoint write.
    pub sync_writes: bool,
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        let defaults = RocksDbConfig::default();
        Self {
            path: defaults.path,
            sync_writes: defaults.sync_writes,
        }
    }
}

impl CheckpointSettings {
    /// RocksDB configuration for these settings.
    pub fn rocksdb_config(&self) -> RocksDbConfig {
        RocksDbConfig {
            path: self.path.clone(),
            sync_writes: self.sync_writes,
            ..RocksDbConfig::default()
        }
    }
}

/// Complete runtime settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ledger gateway connection.
    pub ledger: LedgerConfig,
    /// Sync loop tuning.
    pub sync: SyncConfig,
    /// Sink backend.
    pub database: SinkConfig,
    /// Checkpoint database.
    pub checkpoint: CheckpointSettings,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load settings from a TOML file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Resolve the full stack: file, environment, then flags.
    pub fn resolve(args: &SyncArgs) -> Result<Self, ConfigError> {
        let mut settings = Self::load(&args.settings)?;
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.apply_args(args);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `HLF_*` overrides from `lookup`.
    ///
    /// | Variable | Setting |
    /// |----------|---------|
    /// | `HLF_GATEWAY_URL` | `ledger.gateway_url` |
    /// | `HLF_ORG` | `ledger.org` |
    /// | `HLF_USER` | `ledger.user` |
    /// | `HLF_CHANNEL` | `sync.channel_name` |
    /// | `HLF_BLOCK_NUMBER` | `sync.start_block_override` |
    /// | `HLF_BATCH_SIZE` | `sync.batch_size` |
    /// | `HLF_DATABASE_URL` | sink URL (comma separated for Elasticsearch, data source for SQL) |
    /// | `HLF_DATABASE_DRIVER` | SQL driver |
    /// | `HLF_DATABASE_USER` | Elasticsearch user |
    /// | `HLF_DATABASE_PASSWORD` | Elasticsearch password |
    /// | `HLF_DATABASE_API_KEY` | Meilisearch API key |
    /// | `HLF_CHECKPOINT_PATH` | `checkpoint.path` |
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HLF_GATEWAY_URL") {
            self.ledger.gateway_url = v;
        }
        if let Some(v) = lookup("HLF_ORG") {
            self.ledger.org = v;
        }
        if let Some(v) = lookup("HLF_USER") {
            self.ledger.user = v;
        }
        if let Some(v) = lookup("HLF_CHANNEL") {
            self.sync.channel_name = v;
        }
        if let Some(v) = lookup("HLF_BLOCK_NUMBER") {
            self.sync.start_block_override = Some(parse_env("HLF_BLOCK_NUMBER", &v)?);
        }
        if let Some(v) = lookup("HLF_BATCH_SIZE") {
            self.sync.batch_size = parse_env("HLF_BATCH_SIZE", &v)?;
        }
        if let Some(v) = lookup("HLF_CHECKPOINT_PATH") {
            self.checkpoint.path = v;
        }

        match &mut self.database {
            SinkConfig::Elasticsearch(es) => {
                if let Some(v) = lookup("HLF_DATABASE_URL") {
                    es.urls = v
                        .split(',')
                        .map(str::trim)
                        .filter(|u| !u.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                if let Some(v) = lookup("HLF_DATABASE_USER") {
                    es.user = v;
                }
                if let Some(v) = lookup("HLF_DATABASE_PASSWORD") {
                    es.password = v;
                }
            }
            SinkConfig::Meilisearch(meili) => {
                if let Some(v) = lookup("HLF_DATABASE_URL") {
                    meili.url = v;
                }
                if let Some(v) = lookup("HLF_DATABASE_API_KEY") {
                    meili.api_key = v;
                }
            }
            SinkConfig::Sql(sql) => {
                if let Some(v) = lookup("HLF_DATABASE_URL") {
                    sql.data_source = v;
                }
                if let Some(v) = lookup("HLF_DATABASE_DRIVER") {
                    sql.driver = v;
                }
            }
        }
        Ok(())
    }

    /// Apply command line overrides.
    pub fn apply_args(&mut self, args: &SyncArgs) {
        if let Some(channel) = &args.channel {
            self.sync.channel_name = channel.clone();
        }
        if let Some(org) = &args.org {
            self.ledger.org = org.clone();
        }
        if let Some(block) = args.block_number {
            self.sync.start_block_override = Some(block);
        }
        if let Some(batch) = args.batch_index {
            self.sync.batch_size = batch;
        }
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.channel_name.trim().is_empty() {
            return Err(ConfigError::Invalid("channel name is empty".to_string()));
        }
        if self.sync.batch_size == 0 {
            return Err(ConfigError::Invalid("batch size must be positive".to_string()));
        }
        if self.ledger.gateway_url.trim().is_empty() {
            return Err(ConfigError::Invalid("ledger gateway url is empty".to_string()));
        }
        match &self.database {
            SinkConfig::Elasticsearch(es) if es.urls.is_empty() => {
                return Err(ConfigError::Invalid("elasticsearch needs at least one url".to_string()));
            }
            SinkConfig::Sql(sql) if sql.data_source.trim().is_empty() => {
                return Err(ConfigError::Invalid("sql needs a data_source".to_string()));
            }
            _ => {}
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}
