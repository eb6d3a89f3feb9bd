//! # Signature Expansion Configuration
//!
//! Bounds for the span cache and the unused-signature sweep policy.

use serde::{Deserialize, Serialize};

/// Default number of cached spans.
pub const DEFAULT_SPAN_CACHE_CAPACITY: usize = 100_000;

/// Default time a span may wait for consensus (3 minutes).
pub const DEFAULT_SPAN_TTL_MS: u64 = 180_000;

/// Signature expansion configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Maximum spans held between intake and handling.
    pub span_cache_capacity: usize,

    /// Age after which `purge_expired` drops a span.
    pub span_ttl_ms: u64,

    /// Include unused full-prefix signatures in the verified set after a
    /// successful expansion.
    pub sweep_unused_full_prefix_sigs: bool,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            span_cache_capacity: DEFAULT_SPAN_CACHE_CAPACITY,
            span_ttl_ms: DEFAULT_SPAN_TTL_MS,
            sweep_unused_full_prefix_sigs: true,
        }
    }
}

impl ExpansionConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            span_cache_capacity: 64,
            span_ttl_ms: 1_000,
            sweep_unused_full_prefix_sigs: true,
        }
    }
}
