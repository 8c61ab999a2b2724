//! # Sync Telemetry
//!
//! Structured logging and Prometheus metrics for hlf-sync.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sync_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HLF_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `HLF_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `HLF_LOG_SOURCE` | `false` | File/line in log lines |
//! | `HLF_SERVICE_NAME` | `hlf-sync` | Service name |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BATCHES_APPLIED, BLOCKS_SYNCED,
    CHAIN_HEIGHT, CHECKPOINT_WRITE_FAILURES, DOCUMENTS_ADDED, DOCUMENTS_REMOVED,
    LAST_APPLIED_BLOCK, SINK_APPLY_DURATION, SYNC_ERRORS, TARGET_PEERS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metrics could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging and register metrics.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
