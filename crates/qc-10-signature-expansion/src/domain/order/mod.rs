//! # Signing Order
//!
//! Computes, for one transaction body, the ordered keys that must sign it:
//! first the payer, then every other party the body involves.
//!
//! ## Ordering
//!
//! Entities are resolved in the body's declaration order. The first failed
//! lookup aborts the pass and becomes its single error report; no partial key
//! list is returned. Accounts equal to the payer are skipped in the
//! other-parties pass because the payer key already covers them.

mod contract;
mod crypto;
mod file;
mod schedule;
mod token;
mod topic;

use super::errors::KeyOrderingFailure;
use super::linked_refs::LinkedRefs;
use super::lookup::SigMetadataLookup;
use shared_types::{AccountRef, EntityId, IdOrAlias, Key, TransactionBody, TransactionData};

// =============================================================================
// RESULT
// =============================================================================

/// Ordered keys for one role (payer or other parties), or the reason they
/// could not be ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningOrderResult {
    ordered_keys: Vec<Key>,
    error_report: Option<KeyOrderingFailure>,
}

impl SigningOrderResult {
    pub fn success(ordered_keys: Vec<Key>) -> Self {
        Self {
            ordered_keys,
            error_report: None,
        }
    }

    pub fn failure(report: KeyOrderingFailure) -> Self {
        Self {
            ordered_keys: Vec::new(),
            error_report: Some(report),
        }
    }

    pub fn has_error_report(&self) -> bool {
        self.error_report.is_some()
    }

    pub fn error_report(&self) -> Option<KeyOrderingFailure> {
        self.error_report
    }

    /// Keys in signing order; always empty when an error is reported.
    pub fn ordered_keys(&self) -> &[Key] {
        &self.ordered_keys
    }

    /// The payer key of a successful payer pass.
    pub fn payer_key(&self) -> Option<&Key> {
        self.ordered_keys.first()
    }

    pub fn into_ordered_keys(self) -> Vec<Key> {
        self.ordered_keys
    }
}

impl From<Result<Vec<Key>, KeyOrderingFailure>> for SigningOrderResult {
    fn from(result: Result<Vec<Key>, KeyOrderingFailure>) -> Self {
        match result {
            Ok(keys) => Self::success(keys),
            Err(report) => Self::failure(report),
        }
    }
}

// =============================================================================
// ORDER CONTEXT
// =============================================================================

/// State of one other-parties pass: the payer, the run's linked refs and the
/// keys gathered so far.
pub(crate) struct OrderContext<'a> {
    payer: EntityId,
    linked_refs: &'a mut LinkedRefs,
    keys: Vec<Key>,
}

impl<'a> OrderContext<'a> {
    fn new(payer: EntityId, linked_refs: &'a mut LinkedRefs) -> Self {
        Self {
            payer,
            linked_refs,
            keys: Vec::new(),
        }
    }

    fn is_payer(&self, account: &AccountRef) -> bool {
        account.as_id() == Some(&self.payer)
    }

    /// Adds `key` unless it can never sign.
    fn push(&mut self, key: Key) {
        if !key.is_empty() {
            self.keys.push(key);
        }
    }

    fn push_optional(&mut self, key: Option<&Key>) {
        if let Some(key) = key {
            self.push(key.clone());
        }
    }

    /// Adds a newly supplied admin key; contract-id keys need no signature.
    fn push_new_admin_key(&mut self, key: Option<&Key>) {
        if let Some(key) = key.filter(|k| !k.is_contract_id()) {
            self.push(key.clone());
        }
    }

    fn finish(self) -> Vec<Key> {
        self.keys
    }
}

// =============================================================================
// SIGNING ORDER ENGINE
// =============================================================================

/// Derives required signing keys from a transaction body and a metadata lookup.
pub struct SigRequirements<L: SigMetadataLookup> {
    lookup: L,
}

impl<L: SigMetadataLookup> SigRequirements<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Key of the payer named in the transaction id.
    pub fn keys_for_payer(
        &self,
        body: &TransactionBody,
        linked_refs: &mut LinkedRefs,
    ) -> SigningOrderResult {
        let payer = IdOrAlias::Id(*body.payer());
        match self.lookup.account_signing_meta_for(&payer, linked_refs) {
            Ok(meta) if meta.key.is_empty() => {
                SigningOrderResult::failure(KeyOrderingFailure::ImmutableAccount)
            }
            Ok(meta) => SigningOrderResult::success(vec![meta.key]),
            Err(report) => SigningOrderResult::failure(report),
        }
    }

    /// Keys of every non-payer party, in declaration order.
    pub fn keys_for_other_parties(
        &self,
        body: &TransactionBody,
        linked_refs: &mut LinkedRefs,
    ) -> SigningOrderResult {
        let mut ctx = OrderContext::new(*body.payer(), linked_refs);
        let ordered = match &body.data {
            TransactionData::CryptoCreate(op) => self.crypto_create(op, &mut ctx),
            TransactionData::CryptoUpdate(op) => self.crypto_update(op, &mut ctx),
            TransactionData::CryptoDelete(op) => self.crypto_delete(op, &mut ctx),
            TransactionData::CryptoTransfer(op) => self.crypto_transfer(op, &mut ctx),
            TransactionData::CryptoApproveAllowance(op) => self.crypto_approve(op, &mut ctx),
            TransactionData::FileCreate(op) => self.file_create(op, &mut ctx),
            TransactionData::FileAppend(op) => self.file_modify(&op.file, &mut ctx),
            TransactionData::FileUpdate(op) => self.file_update(op, &mut ctx),
            TransactionData::FileDelete(op) => self.file_modify(&op.file, &mut ctx),
            TransactionData::ContractCreate(op) => self.contract_create(op, &mut ctx),
            TransactionData::ContractUpdate(op) => self.contract_update(op, &mut ctx),
            TransactionData::ContractDelete(op) => self.contract_delete(op, &mut ctx),
            TransactionData::ContractCall(op) => self.contract_call(op, &mut ctx),
            TransactionData::TopicCreate(op) => self.topic_create(op, &mut ctx),
            TransactionData::TopicUpdate(op) => self.topic_update(op, &mut ctx),
            TransactionData::TopicDelete(op) => self.topic_delete(op, &mut ctx),
            TransactionData::TopicSubmitMessage(op) => self.topic_submit(op, &mut ctx),
            TransactionData::TokenCreate(op) => self.token_create(op, &mut ctx),
            TransactionData::TokenUpdate(op) => self.token_update(op, &mut ctx),
            TransactionData::TokenManage(op) => self.token_manage(op, &mut ctx),
            TransactionData::TokenAssociate(op) | TransactionData::TokenDissociate(op) => {
                self.required_account_key(&op.account, &mut ctx)
            }
            TransactionData::ScheduleCreate(op) => self.schedule_create(op, &mut ctx),
            TransactionData::ScheduleSign(op) => self.schedule_sign(op, &mut ctx),
            TransactionData::ScheduleDelete(op) => self.schedule_delete(op, &mut ctx),
        };
        ordered.map(|()| ctx.finish()).into()
    }

    // -------------------------------------------------------------------------
    // Shared account rules
    // -------------------------------------------------------------------------

    /// The account must sign; an account whose key can never sign is immutable.
    fn required_account_key(
        &self,
        account: &AccountRef,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        if ctx.is_payer(account) {
            return Ok(());
        }
        let meta = self.lookup.account_signing_meta_for(account, ctx.linked_refs)?;
        if meta.key.is_empty() {
            return Err(KeyOrderingFailure::ImmutableAccount);
        }
        ctx.push(meta.key);
        Ok(())
    }

    /// A receiving account signs only when it requires receiver signatures.
    ///
    /// A credit to an alias nobody holds yet creates the account, so nothing
    /// can sign for it.
    fn receiver_key(
        &self,
        account: &AccountRef,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        if ctx.is_payer(account) {
            return Ok(());
        }
        match self.lookup.account_signing_meta_for(account, ctx.linked_refs) {
            Ok(meta) => {
                if meta.receiver_sig_required {
                    ctx.push(meta.key);
                }
                Ok(())
            }
            Err(KeyOrderingFailure::MissingAccount) if matches!(account, IdOrAlias::Alias(_)) => {
                Ok(())
            }
            Err(report) => Err(report),
        }
    }

    fn auto_renew_key(
        &self,
        account: Option<&AccountRef>,
        ctx: &mut OrderContext<'_>,
    ) -> Result<(), KeyOrderingFailure> {
        let Some(account) = account else {
            return Ok(());
        };
        if ctx.is_payer(account) {
            return Ok(());
        }
        let meta = self
            .lookup
            .account_signing_meta_for(account, ctx.linked_refs)
            .map_err(|_| KeyOrderingFailure::InvalidAutoRenewAccount)?;
        ctx.push(meta.key);
        Ok(())
    }
}
