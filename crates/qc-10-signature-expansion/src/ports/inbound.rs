//! # Inbound Ports (Driving Ports / API)
//!
//! The two calls the node makes into this subsystem: once per transaction at
//! gossip intake, once per transaction at consensus handling.

use crate::domain::accessor::TxnAccessor;
use crate::domain::errors::AccessorError;
use crate::domain::rationalization::SpanAccessor;
use std::sync::Arc;

/// Signature expansion API.
///
/// Implementations must be thread-safe (`Send + Sync`): `track` is called
/// from many intake threads, `accessor_for` from the single handle thread.
pub trait SignatureExpansionApi: Send + Sync {
    /// Parses, expands and verifies raw transaction contents, caching the
    /// result for the handle phase.
    fn track(&self, contents: &[u8]) -> Result<Arc<TxnAccessor>, AccessorError>;

    /// Consumes the cached span for `contents`, reusing it if still current
    /// and expanding again otherwise. Never populates the cache.
    fn accessor_for(&self, contents: &[u8]) -> Result<SpanAccessor, AccessorError>;
}
