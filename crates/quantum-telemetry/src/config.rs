//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Subsystem identifier (e.g. "10")
    pub subsystem_id: String,

    /// Log filter directive (trace, debug, info, warn, error, or an `EnvFilter` expression)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to register Prometheus metrics on init
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "quantum-chain".to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_SERVICE_NAME`: Service name (default: quantum-chain)
    /// - `QC_SUBSYSTEM_ID`: Subsystem ID (default: 00)
    /// - `QC_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `QC_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `QC_METRICS_ENABLED`: Register Prometheus metrics (default: true)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("QC_SERVICE_NAME")
                .unwrap_or_else(|_| "quantum-chain".to_string()),

            subsystem_id: env::var("QC_SUBSYSTEM_ID").unwrap_or_else(|_| "00".to_string()),

            log_level: env::var("QC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("QC_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            metrics_enabled: env::var("QC_METRICS_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    /// Create configuration for a specific subsystem.
    pub fn for_subsystem(subsystem_id: &str, subsystem_name: &str) -> Self {
        let mut config = Self::from_env();
        config.subsystem_id = subsystem_id.to_string();
        config.service_name = format!("qc-{}-{}", subsystem_id, subsystem_name);
        config
    }

    /// Quiet configuration for tests: warnings only, no metrics registration.
    pub fn for_testing() -> Self {
        Self {
            log_level: "warn".to_string(),
            metrics_enabled: false,
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "quantum-chain");
        assert_eq!(config.log_level, "info");
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_for_subsystem_names_service() {
        let config = TelemetryConfig::for_subsystem("10", "signature-expansion");
        assert_eq!(config.subsystem_id, "10");
        assert_eq!(config.service_name, "qc-10-signature-expansion");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }
}
