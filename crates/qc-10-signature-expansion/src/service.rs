//! # Expand/Handle Span Service
//!
//! Application service implementing `SignatureExpansionApi`.
//!
//! ## Flow
//!
//! ```text
//! intake threads                          handle thread
//! ──────────────                          ─────────────
//! track(contents)                         accessor_for(contents)
//!   parse → expand → verify                 take cached span
//!   insert into SpanCache ───────────────►    hit:  rationalize (reuse or reexpand)
//!                                             miss: parse → expand → verify
//! ```

use crate::adapters::sig_factory::BodySigningFactory;
use crate::adapters::sig_map::SigMapPubKeyToSigBytes;
use crate::config::ExpansionConfig;
use crate::domain::accessor::{TxnAccessor, TxnRef};
use crate::domain::errors::AccessorError;
use crate::domain::expansion::{Expansion, ExpansionOutcome};
use crate::domain::lookup::StateSigMetadataLookup;
use crate::domain::order::SigRequirements;
use crate::domain::rationalization::{Rationalization, SpanAccessor, SpanSource};
use crate::domain::span_cache::{CacheInsert, CachedSpan, SpanCache};
use crate::ports::inbound::SignatureExpansionApi;
use crate::ports::outbound::{LedgerStateView, SyncVerifier, SystemTimeSource, TimeSource};
use quantum_telemetry::{
    metric_inc, subsystem_span, time_histogram, EXPANSIONS, EXPANSION_DURATION,
    SPAN_CACHE_ENTRIES, SPAN_CACHE_EVENTS,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Signature expansion service.
///
/// Generic over the ledger state view, the signature verifier and the clock.
pub struct ExpandHandleSpan<S: LedgerStateView, V: SyncVerifier, T: TimeSource = SystemTimeSource>
{
    state: Arc<S>,
    requirements: SigRequirements<StateSigMetadataLookup<S>>,
    verifier: V,
    time_source: T,
    cache: SpanCache,
    config: ExpansionConfig,
}

impl<S: LedgerStateView, V: SyncVerifier> ExpandHandleSpan<S, V, SystemTimeSource> {
    pub fn new(state: Arc<S>, verifier: V, config: ExpansionConfig) -> Self {
        Self::with_time_source(state, verifier, config, SystemTimeSource)
    }
}

impl<S: LedgerStateView, V: SyncVerifier, T: TimeSource> ExpandHandleSpan<S, V, T> {
    pub fn with_time_source(state: Arc<S>, verifier: V, config: ExpansionConfig, time_source: T) -> Self {
        Self {
            requirements: SigRequirements::new(StateSigMetadataLookup::new(Arc::clone(&state))),
            state,
            verifier,
            time_source,
            cache: SpanCache::new(config.span_cache_capacity, config.span_ttl_ms),
            config,
        }
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Spans currently waiting for the handle phase.
    pub fn cached_spans(&self) -> usize {
        self.cache.len()
    }

    pub fn is_cached(&self, txn_ref: &TxnRef) -> bool {
        self.cache.contains(txn_ref)
    }

    /// Drops cached spans older than the configured time-to-live.
    pub fn purge_expired(&self) -> usize {
        let removed = self.cache.purge_expired(self.time_source.now());
        if removed > 0 {
            SPAN_CACHE_EVENTS
                .with_label_values(&["expired"])
                .inc_by(removed as f64);
            SPAN_CACHE_ENTRIES.set(self.cache.len() as f64);
        }
        removed
    }

    fn parse(&self, contents: &[u8]) -> Result<Arc<TxnAccessor>, AccessorError> {
        TxnAccessor::from_signed_bytes(contents)
            .map(Arc::new)
            .map_err(|e| {
                debug!(error = %e, "Rejected undecodable transaction contents");
                e
            })
    }

    /// Expands `accessor` from scratch and verifies the resulting signatures.
    fn expand_and_verify(&self, accessor: &TxnAccessor) -> ExpansionOutcome {
        let _timer = time_histogram!(EXPANSION_DURATION, "expand");
        let mut sig_bytes = SigMapPubKeyToSigBytes::new(accessor.sig_map());
        let factory = BodySigningFactory::new(Arc::clone(accessor.body_bytes()));

        let mut outcome = Expansion::new(&self.requirements, accessor.body(), &mut sig_bytes, &factory)
            .with_sweep(self.config.sweep_unused_full_prefix_sigs)
            .execute_guarded();
        if let Some(sigs) = outcome.sig_meta.sigs_mut() {
            self.verifier.verify_sync(sigs);
        }
        outcome
    }
}

impl<S: LedgerStateView, V: SyncVerifier, T: TimeSource> SignatureExpansionApi
    for ExpandHandleSpan<S, V, T>
{
    fn track(&self, contents: &[u8]) -> Result<Arc<TxnAccessor>, AccessorError> {
        let accessor = self.parse(contents)?;
        let txn_ref = accessor.txn_ref();
        let _span = subsystem_span!("track", subsystem = "qc-10", txn = %txn_ref).entered();
        let outcome = self.expand_and_verify(&accessor);
        metric_inc!(EXPANSIONS, &["expand", outcome.status.as_str()]);
        debug!(txn = %txn_ref, status = %outcome.status, "Expanded at intake");

        let span = CachedSpan {
            accessor: Arc::clone(&accessor),
            outcome,
            cached_at: self.time_source.now(),
        };
        match self.cache.insert(txn_ref, span) {
            CacheInsert::Inserted => metric_inc!(SPAN_CACHE_EVENTS, &["inserted"]),
            CacheInsert::Duplicate => metric_inc!(SPAN_CACHE_EVENTS, &["duplicate"]),
            CacheInsert::AtCapacity => {
                metric_inc!(SPAN_CACHE_EVENTS, &["rejected"]);
                warn!(txn = %txn_ref, "Span not cached; handle phase will re-expand");
            }
        }
        SPAN_CACHE_ENTRIES.set(self.cache.len() as f64);

        Ok(accessor)
    }

    fn accessor_for(&self, contents: &[u8]) -> Result<SpanAccessor, AccessorError> {
        let txn_ref = TxnRef::of(contents);
        let _span = subsystem_span!("accessor_for", subsystem = "qc-10", txn = %txn_ref).entered();
        let (accessor, cached) = match self.cache.take(&txn_ref) {
            Some(span) => {
                metric_inc!(SPAN_CACHE_EVENTS, &["hit"]);
                SPAN_CACHE_ENTRIES.set(self.cache.len() as f64);
                (span.accessor, Some(span.outcome))
            }
            None => {
                metric_inc!(SPAN_CACHE_EVENTS, &["miss"]);
                (self.parse(contents)?, None)
            }
        };

        let _timer = time_histogram!(EXPANSION_DURATION, "handle");
        let mut sig_bytes = SigMapPubKeyToSigBytes::new(accessor.sig_map());
        let factory = BodySigningFactory::new(Arc::clone(accessor.body_bytes()));
        let span = Rationalization::new(&self.requirements, self.state.as_ref(), &self.verifier)
            .with_sweep(self.config.sweep_unused_full_prefix_sigs)
            .rationalize(&accessor, cached, &mut sig_bytes, &factory);

        if matches!(span.source, SpanSource::Reexpanded { .. }) {
            metric_inc!(SPAN_CACHE_EVENTS, &["stale"]);
        }
        metric_inc!(EXPANSIONS, &["handle", span.outcome.status.as_str()]);
        debug!(
            txn = %txn_ref,
            status = %span.outcome.status,
            sync = span.used_sync_verification,
            "Rationalized at handle"
        );

        Ok(SpanAccessor::new(accessor, span))
    }
}
