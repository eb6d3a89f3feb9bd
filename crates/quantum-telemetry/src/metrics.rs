//! Prometheus metrics for the signature expansion pipeline.
//!
//! All metrics follow the naming convention: `qc_<subsystem>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., expansions_total)
//! - **Gauge**: Value that can go up or down (e.g., span_cache_entries)
//! - **Histogram**: Distribution of values (e.g., expansion_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, IntCounter,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // EXPANSION METRICS (Subsystem 10)
    // =========================================================================

    /// Expansion runs by phase and final status
    pub static ref EXPANSIONS: CounterVec = CounterVec::new(
        Opts::new("qc_sigexp_expansions_total", "Signature expansion runs"),
        &["phase", "status"]  // phase: expand/handle, status: OK/INVALID_SIGNATURE/...
    ).expect("metric creation failed");

    /// Expansion duration
    pub static ref EXPANSION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "qc_sigexp_expansion_duration_seconds",
            "Time spent expanding one transaction"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).expect("bucket layout")),
        &["phase"]
    ).expect("metric creation failed");

    /// Panics caught inside expansion and downgraded to a failure status
    pub static ref EXPANSION_PANICS: IntCounter = IntCounter::new(
        "qc_sigexp_expansion_panics_total",
        "Expansions aborted by an unexpected panic"
    ).expect("metric creation failed");

    // =========================================================================
    // SPAN CACHE METRICS
    // =========================================================================

    /// Span cache events
    pub static ref SPAN_CACHE_EVENTS: CounterVec = CounterVec::new(
        Opts::new("qc_sigexp_span_cache_events_total", "Span cache events"),
        &["event"]  // event: inserted/hit/miss/stale/rejected/expired
    ).expect("metric creation failed");

    /// Entries currently cached
    pub static ref SPAN_CACHE_ENTRIES: Gauge = Gauge::new(
        "qc_sigexp_span_cache_entries",
        "Expanded transactions waiting for consensus handling"
    ).expect("metric creation failed");

    // =========================================================================
    // SIGNATURE METRICS
    // =========================================================================

    /// Total signature verifications
    pub static ref SIGNATURE_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("qc_signature_verifications_total", "Total signature verifications"),
        &["type", "result"]  // type: ed25519/ecdsa_secp256k1, result: valid/invalid
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Expansion
        Box::new(EXPANSIONS.clone()),
        Box::new(EXPANSION_DURATION.clone()),
        Box::new(EXPANSION_PANICS.clone()),
        // Span cache
        Box::new(SPAN_CACHE_EVENTS.clone()),
        Box::new(SPAN_CACHE_ENTRIES.clone()),
        // Signatures
        Box::new(SIGNATURE_VERIFICATIONS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
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
    histogram: prometheus::Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the `label` series of `histogram`.
    pub fn new(histogram: &HistogramVec, label: &str) -> Self {
        Self {
            histogram: histogram.with_label_values(&[label]),
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

/// Start timing for a labelled histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr, $label:expr) => {
        $crate::HistogramTimer::new(&$histogram, $label)
    };
}
