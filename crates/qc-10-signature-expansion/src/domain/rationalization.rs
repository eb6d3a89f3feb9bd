//! # Rationalization
//!
//! Handle-time decision for one transaction: reuse the expansion cached at
//! intake, or expand again against current state.
//!
//! A cached outcome is reused only when every linked entity still carries the
//! version marker observed at expansion. Any difference (including an entity
//! that appeared or disappeared) forces a full expansion inline, followed by
//! synchronous verification. An outcome downgraded from a panic is always
//! expanded again.

use super::accessor::{TxnAccessor, TxnRef};
use super::expansion::{Expansion, ExpansionOutcome};
use super::linked_refs::LinkedRefs;
use super::lookup::SigMetadataLookup;
use super::order::SigRequirements;
use super::sig_meta::RationalizedSigMeta;
use crate::ports::outbound::{
    LedgerStateView, PlatformSigFactory, PubKeyToSigBytes, SyncVerifier,
};
use shared_types::{EntityRef, ResponseCode};
use std::sync::Arc;
use tracing::debug;

/// Where a rationalized outcome came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpanSource {
    /// Cached intake expansion, still current.
    Reused,
    /// Cached expansion was stale and has been redone.
    Reexpanded { stale: Option<EntityRef> },
    /// Nothing was cached; expanded from scratch.
    Uncached,
}

/// Handle-time result for one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalizedSpan {
    pub outcome: ExpansionOutcome,
    /// True when signatures were verified on the handle thread.
    pub used_sync_verification: bool,
    pub source: SpanSource,
}

/// What the handle thread receives for one transaction.
#[derive(Clone, Debug)]
pub struct SpanAccessor {
    accessor: Arc<TxnAccessor>,
    span: RationalizedSpan,
}

impl SpanAccessor {
    pub fn new(accessor: Arc<TxnAccessor>, span: RationalizedSpan) -> Self {
        Self { accessor, span }
    }

    pub fn accessor(&self) -> &TxnAccessor {
        &self.accessor
    }

    pub fn txn_ref(&self) -> TxnRef {
        self.accessor.txn_ref()
    }

    pub fn sig_meta(&self) -> &RationalizedSigMeta {
        &self.span.outcome.sig_meta
    }

    /// Expansion status: `Ok` or the single failure that ended it.
    pub fn status(&self) -> ResponseCode {
        self.span.outcome.status
    }

    pub fn linked_refs(&self) -> &LinkedRefs {
        &self.span.outcome.linked_refs
    }

    pub fn used_sync_verification(&self) -> bool {
        self.span.used_sync_verification
    }

    pub fn source(&self) -> &SpanSource {
        &self.span.source
    }
}

/// Reuse-or-reexpand logic over one state view.
pub struct Rationalization<'a, L: SigMetadataLookup> {
    requirements: &'a SigRequirements<L>,
    state: &'a dyn LedgerStateView,
    verifier: &'a dyn SyncVerifier,
    sweep_unused_full_prefix_sigs: bool,
}

impl<'a, L: SigMetadataLookup> Rationalization<'a, L> {
    pub fn new(
        requirements: &'a SigRequirements<L>,
        state: &'a dyn LedgerStateView,
        verifier: &'a dyn SyncVerifier,
    ) -> Self {
        Self {
            requirements,
            state,
            verifier,
            sweep_unused_full_prefix_sigs: true,
        }
    }

    pub fn with_sweep(mut self, enabled: bool) -> Self {
        self.sweep_unused_full_prefix_sigs = enabled;
        self
    }

    pub fn rationalize(
        &self,
        accessor: &TxnAccessor,
        cached: Option<ExpansionOutcome>,
        pk_to_sig_bytes: &mut dyn PubKeyToSigBytes,
        sig_factory: &dyn PlatformSigFactory,
    ) -> RationalizedSpan {
        let source = match cached {
            Some(outcome) if outcome.interrupted => {
                debug!(txn = %accessor.txn_ref(), "Cached expansion was interrupted");
                SpanSource::Reexpanded { stale: None }
            }
            Some(outcome) => match outcome.linked_refs.first_stale(self.state) {
                None => {
                    debug!(txn = %accessor.txn_ref(), "Reusing cached expansion");
                    return RationalizedSpan {
                        outcome,
                        used_sync_verification: false,
                        source: SpanSource::Reused,
                    };
                }
                Some(stale) => {
                    debug!(txn = %accessor.txn_ref(), entity = %stale, "Cached expansion is stale");
                    SpanSource::Reexpanded {
                        stale: Some(stale.clone()),
                    }
                }
            },
            None => SpanSource::Uncached,
        };

        pk_to_sig_bytes.reset_all_sigs_to_unused();
        let mut outcome = Expansion::new(self.requirements, accessor.body(), pk_to_sig_bytes, sig_factory)
            .with_sweep(self.sweep_unused_full_prefix_sigs)
            .execute_guarded();
        if let Some(sigs) = outcome.sig_meta.sigs_mut() {
            self.verifier.verify_sync(sigs);
        }

        RationalizedSpan {
            outcome,
            used_sync_verification: true,
            source,
        }
    }
}
