//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber: an `EnvFilter` built from the
//! configured level, followed by a human-readable or JSON formatter. JSON
//! lines carry the span fields, so `txn`, `status` and `entity` fields logged
//! by the pipeline are preserved for log shippers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Build the filter for `config`, falling back to `info` on a bad directive.
pub fn env_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Fails if another subscriber was already installed in this process.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if config.json_logs {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        service = %config.service_name,
        subsystem = %config.subsystem_id,
        json_logs = config.json_logs,
        "Structured logging initialized"
    );
    Ok(())
}

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(subsystem = $subsystem, $($($field)*,)? $msg)
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(subsystem = $subsystem, $($($field)*,)? $msg)
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(subsystem = $subsystem, $($($field)*,)? $msg)
    };
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_txn_event {
    ($level:ident, $subsystem:expr, $msg:expr, $txn:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            txn = %$txn,
            $($($field)*,)?
            $msg
        )
    };
}
