//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the expansion pipeline depends on but does not own:
//! the ledger state view, the raw signature-bytes source, the platform
//! signature factory, the synchronous verifier, and a clock.

use crate::domain::errors::SigMatchError;
use crate::domain::platform_sig::PlatformSignature;
use shared_types::{
    AccountRecord, Alias, AliasBinding, EntityId, EntityRef, FileRecord, IdOrAlias, KeyType,
    ScheduleRecord, TokenRecord, TopicRecord, VersionMarker,
};

// =============================================================================
// LEDGER STATE
// =============================================================================

/// Read-only view of current ledger state.
///
/// Every call is an in-memory map access; implementations must not block on I/O
/// because rationalization runs on the consensus handle thread.
pub trait LedgerStateView: Send + Sync {
    /// Account or contract-account record.
    fn account(&self, id: &EntityId) -> Option<AccountRecord>;

    fn token(&self, id: &EntityId) -> Option<TokenRecord>;

    fn topic(&self, id: &EntityId) -> Option<TopicRecord>;

    fn file(&self, id: &EntityId) -> Option<FileRecord>;

    fn schedule(&self, id: &EntityId) -> Option<ScheduleRecord>;

    /// Current binding of `alias`, if any.
    fn resolve_alias(&self, alias: &Alias) -> Option<AliasBinding>;

    /// Current version marker of `entity`, [`VersionMarker::ABSENT`] if it does not exist.
    ///
    /// Alias references report the version of the alias binding itself, so a
    /// later bind (or rebind) of the alias is observed as a change.
    fn version_of(&self, entity: &EntityRef) -> VersionMarker {
        let observed = match entity {
            EntityRef::Account(IdOrAlias::Id(id)) | EntityRef::Contract(IdOrAlias::Id(id)) => {
                self.account(id).map(|r| r.version)
            }
            EntityRef::Account(IdOrAlias::Alias(alias))
            | EntityRef::Contract(IdOrAlias::Alias(alias)) => {
                self.resolve_alias(alias).map(|b| b.version)
            }
            EntityRef::Token(id) => self.token(id).map(|r| r.version),
            EntityRef::Topic(id) => self.topic(id).map(|r| r.version),
            EntityRef::File(id) => self.file(id).map(|r| r.version),
            EntityRef::Schedule(id) => self.schedule(id).map(|r| r.version),
        };
        observed.unwrap_or(VersionMarker::ABSENT)
    }
}

// =============================================================================
// SIGNATURE SOURCES
// =============================================================================

/// Signature bytes found for a primitive key, with their position in the
/// transaction's signature map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuppliedSig {
    pub index: usize,
    pub bytes: Vec<u8>,
}

/// Raw signature bytes supplied with one transaction.
///
/// Implementations track which signatures have already been consumed so that
/// each raw signature maps into a verified set at most once.
pub trait PubKeyToSigBytes: Send {
    /// Signature bytes for the given primitive key. Does not consume them.
    ///
    /// Returns `Ok(None)` when nothing supplied matches `public_key`.
    fn sig_bytes_for(
        &self,
        key_type: KeyType,
        public_key: &[u8],
    ) -> Result<Option<SuppliedSig>, SigMatchError>;

    /// Consumes the signature at `index`. Returns `false` if it was already used.
    fn mark_used(&mut self, index: usize) -> bool;

    fn has_at_least_one_unused_sig_with_full_prefix(&self) -> bool;

    /// Visits every unused full-prefix signature as `(key_type, public_key, signature)`
    /// and marks it used.
    fn for_each_unused_sig_with_full_prefix(&mut self, visitor: &mut dyn FnMut(KeyType, &[u8], &[u8]));

    /// Forgets every consumption, e.g. before a re-expansion.
    fn reset_all_sigs_to_unused(&mut self);
}

/// Builds platform-verifiable signature objects.
pub trait PlatformSigFactory: Send + Sync {
    fn sign_appropriately(
        &self,
        key_type: KeyType,
        public_key: &[u8],
        signature: &[u8],
    ) -> PlatformSignature;
}

/// Verifies platform signatures in place, stamping each with its status.
pub trait SyncVerifier: Send + Sync {
    fn verify_sync(&self, sigs: &mut [PlatformSignature]);
}

// =============================================================================
// TIME
// =============================================================================

/// Time source abstraction for testability.
pub trait TimeSource: Send + Sync {
    /// Current time in milliseconds since the epoch.
    fn now(&self) -> u64;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
