//! # Expansion Coordinator
//!
//! Runs one signature expansion for one transaction:
//!
//! ```text
//! START ──payer keys + sigs──► PAYER_EXPANDED ──other keys + sigs──► OTHER_EXPANDED
//!   │                               │                                     │
//!   ▼                               ▼                                  sweep
//! FAILED_AT_PAYER            FAILED_AT_OTHERS                             ▼
//! (none_available)           (for_payer_only)                         FINALIZED
//!                                                               (for_payer_and_others)
//! ```
//!
//! Every terminal state carries the linked refs gathered so far, including the
//! ref of the lookup that failed.

use super::errors::KeyOrderingFailure;
use super::linked_refs::LinkedRefs;
use super::lookup::SigMetadataLookup;
use super::matcher::create_crypto_sigs_from;
use super::order::SigRequirements;
use super::platform_sig::PlatformSignature;
use super::sig_meta::RationalizedSigMeta;
use crate::ports::outbound::{PlatformSigFactory, PubKeyToSigBytes};
use quantum_telemetry::{metric_inc, EXPANSION_PANICS};
use shared_types::{Key, ResponseCode, TransactionBody};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Coordinator states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpansionState {
    Start,
    PayerExpanded,
    OtherExpanded,
    Finalized,
    FailedAtPayer,
    FailedAtOthers,
}

impl ExpansionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::FailedAtPayer | Self::FailedAtOthers)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::PayerExpanded => "payer_expanded",
            Self::OtherExpanded => "other_expanded",
            Self::Finalized => "finalized",
            Self::FailedAtPayer => "failed_at_payer",
            Self::FailedAtOthers => "failed_at_others",
        }
    }
}

/// Terminal result of one expansion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionOutcome {
    pub sig_meta: RationalizedSigMeta,
    /// `Ok`, or the single failure that ended the run.
    pub status: ResponseCode,
    pub linked_refs: LinkedRefs,
    pub terminal_state: ExpansionState,
    /// Set when the run panicked and was downgraded; such an outcome is never
    /// reused.
    pub interrupted: bool,
}

/// One expansion run. Consumed by [`Expansion::execute`].
pub struct Expansion<'a, L: SigMetadataLookup> {
    requirements: &'a SigRequirements<L>,
    body: &'a TransactionBody,
    pk_to_sig_bytes: &'a mut dyn PubKeyToSigBytes,
    sig_factory: &'a dyn PlatformSigFactory,
    sweep_unused_full_prefix_sigs: bool,
    state: ExpansionState,
    linked_refs: LinkedRefs,
    expanded_sigs: Vec<PlatformSignature>,
}

impl<'a, L: SigMetadataLookup> Expansion<'a, L> {
    pub fn new(
        requirements: &'a SigRequirements<L>,
        body: &'a TransactionBody,
        pk_to_sig_bytes: &'a mut dyn PubKeyToSigBytes,
        sig_factory: &'a dyn PlatformSigFactory,
    ) -> Self {
        Self {
            requirements,
            body,
            pk_to_sig_bytes,
            sig_factory,
            sweep_unused_full_prefix_sigs: true,
            state: ExpansionState::Start,
            linked_refs: LinkedRefs::new(),
            expanded_sigs: Vec::new(),
        }
    }

    /// Enables or disables the final sweep of unused full-prefix signatures.
    pub fn with_sweep(mut self, enabled: bool) -> Self {
        self.sweep_unused_full_prefix_sigs = enabled;
        self
    }

    pub fn execute(mut self) -> ExpansionOutcome {
        let (sig_meta, status) = self.run();
        self.finish(sig_meta, status)
    }

    /// Runs [`Expansion::execute`], downgrading a panic to an unresolvable outcome.
    ///
    /// The outcome keeps the linked refs gathered before the panic and ends in
    /// the failure state of the pass that was running.
    pub fn execute_guarded(mut self) -> ExpansionOutcome {
        let result = catch_unwind(AssertUnwindSafe(|| self.run()));
        match result {
            Ok((sig_meta, status)) => self.finish(sig_meta, status),
            Err(_) => {
                metric_inc!(EXPANSION_PANICS);
                warn!(
                    payer = %self.body.payer(),
                    state = self.state.as_str(),
                    linked = self.linked_refs.len(),
                    "Signature expansion panicked; marking signers unresolvable"
                );
                self.state = match self.state {
                    ExpansionState::Start => ExpansionState::FailedAtPayer,
                    _ => ExpansionState::FailedAtOthers,
                };
                self.expanded_sigs.clear();
                let mut outcome = self.finish(
                    RationalizedSigMeta::none_available(),
                    KeyOrderingFailure::GeneralError.into(),
                );
                outcome.interrupted = true;
                outcome
            }
        }
    }

    fn run(&mut self) -> (RationalizedSigMeta, ResponseCode) {
        let payer_key = match self.expand_payer() {
            Ok(key) => key,
            Err(status) => {
                self.state = ExpansionState::FailedAtPayer;
                return (RationalizedSigMeta::none_available(), status);
            }
        };
        self.state = ExpansionState::PayerExpanded;

        let others = match self.expand_others() {
            Ok(keys) => keys,
            Err(status) => {
                self.state = ExpansionState::FailedAtOthers;
                let sigs = std::mem::take(&mut self.expanded_sigs);
                return (RationalizedSigMeta::for_payer_only(payer_key, sigs), status);
            }
        };
        self.state = ExpansionState::OtherExpanded;

        if self.sweep_unused_full_prefix_sigs {
            self.sweep_unused_sigs();
        }
        self.state = ExpansionState::Finalized;
        let sigs = std::mem::take(&mut self.expanded_sigs);
        (
            RationalizedSigMeta::for_payer_and_others(payer_key, others, sigs),
            ResponseCode::Ok,
        )
    }

    fn expand_payer(&mut self) -> Result<Key, ResponseCode> {
        let order = self
            .requirements
            .keys_for_payer(self.body, &mut self.linked_refs);
        if let Some(report) = order.error_report() {
            return Err(report.into());
        }
        let payer_key = order.payer_key().cloned().ok_or(ResponseCode::UnresolvableRequiredSigners)?;
        self.match_sigs(order.ordered_keys())?;
        Ok(payer_key)
    }

    fn expand_others(&mut self) -> Result<Vec<Key>, ResponseCode> {
        let order = self
            .requirements
            .keys_for_other_parties(self.body, &mut self.linked_refs);
        if let Some(report) = order.error_report() {
            return Err(report.into());
        }
        self.match_sigs(order.ordered_keys())?;
        Ok(order.into_ordered_keys())
    }

    fn match_sigs(&mut self, keys: &[Key]) -> Result<(), ResponseCode> {
        let created = create_crypto_sigs_from(keys, &mut *self.pk_to_sig_bytes, self.sig_factory);
        if created.has_failed() {
            return Err(created.as_code());
        }
        self.expanded_sigs.extend(created.into_platform_sigs());
        Ok(())
    }

    fn sweep_unused_sigs(&mut self) {
        if !self.pk_to_sig_bytes.has_at_least_one_unused_sig_with_full_prefix() {
            return;
        }
        let factory = self.sig_factory;
        let sigs = &mut self.expanded_sigs;
        self.pk_to_sig_bytes
            .for_each_unused_sig_with_full_prefix(&mut |key_type, public_key, signature| {
                sigs.push(factory.sign_appropriately(key_type, public_key, signature));
            });
    }

    fn finish(self, sig_meta: RationalizedSigMeta, status: ResponseCode) -> ExpansionOutcome {
        debug!(
            payer = %self.body.payer(),
            state = self.state.as_str(),
            status = %status,
            linked = self.linked_refs.len(),
            "Signature expansion finished"
        );
        ExpansionOutcome {
            sig_meta,
            status,
            linked_refs: self.linked_refs,
            terminal_state: self.state,
            interrupted: false,
        }
    }
}
