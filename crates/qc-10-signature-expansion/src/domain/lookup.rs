//! # Entity Key Resolution
//!
//! Per-entity-type lookup of signing metadata: the key an entity requires
//! plus the flags that decide whether that key must sign.
//!
//! Every lookup links the entity (and its observed version marker) into the
//! caller's [`LinkedRefs`] before deciding, so a failed lookup is tracked for
//! invalidation exactly like a successful one.

use super::errors::KeyOrderingFailure;
use super::linked_refs::LinkedRefs;
use crate::ports::outbound::LedgerStateView;
use shared_types::{
    AccountId, AccountRecord, AccountRef, ContractRef, EntityId, EntityRef, FileId, IdOrAlias,
    Key, ScheduleId, TokenId, TopicId, VersionMarker,
};
use std::sync::Arc;

// =============================================================================
// SIGNING METADATA
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountSigningMetadata {
    pub key: Key,
    pub receiver_sig_required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractSigningMetadata {
    /// `None` for an immutable contract.
    pub admin_key: Option<Key>,
    pub receiver_sig_required: bool,
}

impl ContractSigningMetadata {
    pub fn is_immutable(&self) -> bool {
        self.admin_key.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSigningMetadata {
    pub admin_key: Option<Key>,
    pub kyc_key: Option<Key>,
    pub wipe_key: Option<Key>,
    pub freeze_key: Option<Key>,
    pub supply_key: Option<Key>,
    pub fee_schedule_key: Option<Key>,
    pub pause_key: Option<Key>,
    pub treasury: AccountId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicSigningMetadata {
    pub admin_key: Option<Key>,
    pub submit_key: Option<Key>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSigningMetadata {
    /// An empty WACL marks an immutable file.
    pub wacl: Key,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleSigningMetadata {
    pub admin_key: Option<Key>,
    pub designated_payer: Option<AccountId>,
}

/// Signing metadata for any entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SigningMetadata {
    Account(AccountSigningMetadata),
    Contract(ContractSigningMetadata),
    Token(TokenSigningMetadata),
    Topic(TopicSigningMetadata),
    File(FileSigningMetadata),
    Schedule(ScheduleSigningMetadata),
}

/// Result of one entity lookup: metadata or exactly one failure reason.
pub type LookupOutcome = Result<SigningMetadata, KeyOrderingFailure>;

// =============================================================================
// LOOKUP PORT
// =============================================================================

/// Resolves signing metadata for ledger entities.
///
/// Implementations never retain the returned values; each call produces fresh
/// metadata from current state.
pub trait SigMetadataLookup: Send + Sync {
    fn account_signing_meta_for(
        &self,
        account: &AccountRef,
        linked_refs: &mut LinkedRefs,
    ) -> Result<AccountSigningMetadata, KeyOrderingFailure>;

    fn contract_signing_meta_for(
        &self,
        contract: &ContractRef,
        linked_refs: &mut LinkedRefs,
    ) -> Result<ContractSigningMetadata, KeyOrderingFailure>;

    fn token_signing_meta_for(
        &self,
        token: &TokenId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<TokenSigningMetadata, KeyOrderingFailure>;

    fn topic_signing_meta_for(
        &self,
        topic: &TopicId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<TopicSigningMetadata, KeyOrderingFailure>;

    fn file_signing_meta_for(
        &self,
        file: &FileId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<FileSigningMetadata, KeyOrderingFailure>;

    fn schedule_signing_meta_for(
        &self,
        schedule: &ScheduleId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<ScheduleSigningMetadata, KeyOrderingFailure>;

    /// Lookup dispatched on the entity tag.
    fn lookup(&self, entity: &EntityRef, linked_refs: &mut LinkedRefs) -> LookupOutcome {
        match entity {
            EntityRef::Account(r) => self
                .account_signing_meta_for(r, linked_refs)
                .map(SigningMetadata::Account),
            EntityRef::Contract(r) => self
                .contract_signing_meta_for(r, linked_refs)
                .map(SigningMetadata::Contract),
            EntityRef::Token(id) => self
                .token_signing_meta_for(id, linked_refs)
                .map(SigningMetadata::Token),
            EntityRef::Topic(id) => self
                .topic_signing_meta_for(id, linked_refs)
                .map(SigningMetadata::Topic),
            EntityRef::File(id) => self
                .file_signing_meta_for(id, linked_refs)
                .map(SigningMetadata::File),
            EntityRef::Schedule(id) => self
                .schedule_signing_meta_for(id, linked_refs)
                .map(SigningMetadata::Schedule),
        }
    }
}

// =============================================================================
// STATE-BACKED LOOKUP
// =============================================================================

/// [`SigMetadataLookup`] over a [`LedgerStateView`].
pub struct StateSigMetadataLookup<S: LedgerStateView> {
    state: Arc<S>,
}

impl<S: LedgerStateView> StateSigMetadataLookup<S> {
    pub fn new(state: Arc<S>) -> Self {
        Self { state }
    }

    /// Resolves an account-like reference to its numeric id and record.
    ///
    /// Links the alias binding (when addressed by alias) and then the numeric
    /// entity, both tagged via `tag`.
    fn resolve_account_like(
        &self,
        reference: &IdOrAlias,
        tag: fn(IdOrAlias) -> EntityRef,
        linked_refs: &mut LinkedRefs,
    ) -> Option<(EntityId, AccountRecord)> {
        let id = match reference {
            IdOrAlias::Id(id) => *id,
            IdOrAlias::Alias(alias) => {
                let binding = self.state.resolve_alias(alias);
                linked_refs.link(
                    tag(reference.clone()),
                    binding.map(|b| b.version).unwrap_or(VersionMarker::ABSENT),
                );
                binding?.id
            }
        };

        let record = self.state.account(&id);
        linked_refs.link(
            tag(IdOrAlias::Id(id)),
            record.as_ref().map(|r| r.version).unwrap_or(VersionMarker::ABSENT),
        );
        record.map(|r| (id, r))
    }
}

impl<S: LedgerStateView> SigMetadataLookup for StateSigMetadataLookup<S> {
    fn account_signing_meta_for(
        &self,
        account: &AccountRef,
        linked_refs: &mut LinkedRefs,
    ) -> Result<AccountSigningMetadata, KeyOrderingFailure> {
        let (_, record) = self
            .resolve_account_like(account, EntityRef::Account, linked_refs)
            .ok_or(KeyOrderingFailure::MissingAccount)?;

        if record.deleted {
            return Err(KeyOrderingFailure::InvalidAccount);
        }
        Ok(AccountSigningMetadata {
            key: record.key,
            receiver_sig_required: record.receiver_sig_required,
        })
    }

    fn contract_signing_meta_for(
        &self,
        contract: &ContractRef,
        linked_refs: &mut LinkedRefs,
    ) -> Result<ContractSigningMetadata, KeyOrderingFailure> {
        let (_, record) = self
            .resolve_account_like(contract, EntityRef::Contract, linked_refs)
            .ok_or(KeyOrderingFailure::InvalidContract)?;

        if record.deleted || !record.is_smart_contract {
            return Err(KeyOrderingFailure::InvalidContract);
        }

        let admin_key = Some(record.key).filter(|k| !k.is_empty() && !k.is_contract_id());
        Ok(ContractSigningMetadata {
            admin_key,
            receiver_sig_required: record.receiver_sig_required,
        })
    }

    fn token_signing_meta_for(
        &self,
        token: &TokenId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<TokenSigningMetadata, KeyOrderingFailure> {
        let record = self.state.token(token);
        linked_refs.link(
            EntityRef::Token(*token),
            record.as_ref().map(|r| r.version).unwrap_or(VersionMarker::ABSENT),
        );
        let record = record.ok_or(KeyOrderingFailure::MissingToken)?;

        Ok(TokenSigningMetadata {
            admin_key: record.admin_key,
            kyc_key: record.kyc_key,
            wipe_key: record.wipe_key,
            freeze_key: record.freeze_key,
            supply_key: record.supply_key,
            fee_schedule_key: record.fee_schedule_key,
            pause_key: record.pause_key,
            treasury: record.treasury,
        })
    }

    fn topic_signing_meta_for(
        &self,
        topic: &TopicId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<TopicSigningMetadata, KeyOrderingFailure> {
        let record = self.state.topic(topic);
        linked_refs.link(
            EntityRef::Topic(*topic),
            record.as_ref().map(|r| r.version).unwrap_or(VersionMarker::ABSENT),
        );

        match record {
            Some(record) if !record.deleted => Ok(TopicSigningMetadata {
                admin_key: record.admin_key,
                submit_key: record.submit_key,
            }),
            _ => Err(KeyOrderingFailure::InvalidTopic),
        }
    }

    fn file_signing_meta_for(
        &self,
        file: &FileId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<FileSigningMetadata, KeyOrderingFailure> {
        let record = self.state.file(file);
        linked_refs.link(
            EntityRef::File(*file),
            record.as_ref().map(|r| r.version).unwrap_or(VersionMarker::ABSENT),
        );
        let record = record.ok_or(KeyOrderingFailure::MissingFile)?;

        Ok(FileSigningMetadata { wacl: record.wacl })
    }

    fn schedule_signing_meta_for(
        &self,
        schedule: &ScheduleId,
        linked_refs: &mut LinkedRefs,
    ) -> Result<ScheduleSigningMetadata, KeyOrderingFailure> {
        let record = self.state.schedule(schedule);
        linked_refs.link(
            EntityRef::Schedule(*schedule),
            record.as_ref().map(|r| r.version).unwrap_or(VersionMarker::ABSENT),
        );
        let record = record.ok_or(KeyOrderingFailure::MissingSchedule)?;

        Ok(ScheduleSigningMetadata {
            admin_key: record.admin_key,
            designated_payer: record.designated_payer,
        })
    }
}
