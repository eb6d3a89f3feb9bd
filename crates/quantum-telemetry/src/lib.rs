//! # Quantum Telemetry
//!
//! Logging and metrics for Quantum-Chain subsystems.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with an `EnvFilter` and plain or JSON output
//! - **Metrics**: Prometheus counters, gauges and histograms in a global registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_subsystem("10", "signature-expansion");
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QC_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` is the fallback) |
//! | `QC_JSON_LOGS` | `false` | JSON formatted log lines |
//! | `QC_SUBSYSTEM_ID` | `00` | Subsystem identifier |
//! | `QC_METRICS_ENABLED` | `true` | Register Prometheus metrics |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, EXPANSIONS,
    EXPANSION_DURATION, EXPANSION_PANICS, REGISTRY, SIGNATURE_VERIFICATIONS, SPAN_CACHE_ENTRIES,
    SPAN_CACHE_EVENTS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and, when enabled, metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    if config.service_name.is_empty() {
        return Err(TelemetryError::Config("service name is empty".to_string()));
    }

    let metrics = if config.metrics_enabled {
        Some(register_metrics()?)
    } else {
        None
    };

    init_logging(&config)?;

    Ok(TelemetryGuard {
        config,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    config: TelemetryConfig,
    _metrics: Option<MetricsHandle>,
}

impl TelemetryGuard {
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with subsystem context.
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
