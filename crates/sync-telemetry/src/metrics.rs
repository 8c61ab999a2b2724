//! Prometheus metrics for the sync pipeline.
//!
//! All metrics follow the naming convention: `hlf_sync_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., blocks_synced_total)
//! - **Gauge**: Value that can go up or down (e.g., chain_height)
//! - **Histogram**: Distribution of values (e.g., sink_apply_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SYNC PROGRESS
    // =========================================================================

    /// Blocks applied to the sink
    pub static ref BLOCKS_SYNCED: Counter = Counter::new(
        "hlf_sync_blocks_synced_total",
        "Total number of blocks applied to the sink"
    ).expect("metric creation failed");

    /// Batches applied, by phase (catchup/tailing)
    pub static ref BATCHES_APPLIED: CounterVec = CounterVec::new(
        Opts::new("hlf_sync_batches_applied_total", "Total block ranges applied"),
        &["phase"]
    ).expect("metric creation failed");

    /// Current chain height as reported by peers
    pub static ref CHAIN_HEIGHT: Gauge = Gauge::new(
        "hlf_sync_chain_height",
        "Highest committed block number across peers"
    ).expect("metric creation failed");

    /// Last block fully applied
    pub static ref LAST_APPLIED_BLOCK: Gauge = Gauge::new(
        "hlf_sync_last_applied_block",
        "Highest block number confirmed by the sink"
    ).expect("metric creation failed");

    /// Peers currently considered fresh
    pub static ref TARGET_PEERS: Gauge = Gauge::new(
        "hlf_sync_target_peers",
        "Number of peers used for block fetches"
    ).expect("metric creation failed");

    // =========================================================================
    // DOCUMENTS
    // =========================================================================

    /// Documents upserted
    pub static ref DOCUMENTS_ADDED: Counter = Counter::new(
        "hlf_sync_documents_added_total",
        "Total documents submitted for upsert"
    ).expect("metric creation failed");

    /// Documents removed
    pub static ref DOCUMENTS_REMOVED: Counter = Counter::new(
        "hlf_sync_documents_removed_total",
        "Total documents submitted for removal"
    ).expect("metric creation failed");

    /// Sink apply duration
    pub static ref SINK_APPLY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "hlf_sync_sink_apply_duration_seconds",
            "Time spent applying a batch to the sink"
        ).buckets(exponential_buckets(0.001, 2.0, 16).unwrap_or_default())
    ).expect("metric creation failed");

    // =========================================================================
    // ERRORS
    // =========================================================================

    /// Checkpoint writes that failed (non-fatal)
    pub static ref CHECKPOINT_WRITE_FAILURES: Counter = Counter::new(
        "hlf_sync_checkpoint_write_failures_total",
        "Checkpoint writes that failed after a successful sink apply"
    ).expect("metric creation failed");

    /// Fatal sync errors by kind
    pub static ref SYNC_ERRORS: CounterVec = CounterVec::new(
        Opts::new("hlf_sync_errors_total", "Fatal sync errors"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Progress
        Box::new(BLOCKS_SYNCED.clone()),
        Box::new(BATCHES_APPLIED.clone()),
        Box::new(CHAIN_HEIGHT.clone()),
        Box::new(LAST_APPLIED_BLOCK.clone()),
        Box::new(TARGET_PEERS.clone()),
        // Documents
        Box::new(DOCUMENTS_ADDED.clone()),
        Box::new(DOCUMENTS_REMOVED.clone()),
        Box::new(SINK_APPLY_DURATION.clone()),
        // Errors
        Box::new(CHECKPOINT_WRITE_FAILURES.clone()),
        Box::new(SYNC_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
