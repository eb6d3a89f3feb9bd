//! # Ledger State Records
//!
//! Snapshot records that the state subsystem exposes for signing decisions.
//! Each record carries the [`VersionMarker`] stamped on its last mutation so
//! that consumers can detect staleness of anything they derived from it.

use crate::entities::{AccountId, EntityId, Key};
use std::fmt;

/// Monotonically increasing stamp assigned to an entity on every mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionMarker(pub u64);

impl VersionMarker {
    /// Marker observed for an entity that does not exist.
    pub const ABSENT: VersionMarker = VersionMarker(0);

    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}

impl fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Account (or contract account) record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRecord {
    pub key: Key,
    pub deleted: bool,
    pub receiver_sig_required: bool,
    pub is_smart_contract: bool,
    pub version: VersionMarker,
}

impl AccountRecord {
    /// A live, non-contract account controlled by `key`.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            deleted: false,
            receiver_sig_required: false,
            is_smart_contract: false,
            version: VersionMarker::ABSENT,
        }
    }

    /// A live contract account; `admin_key` of `None` makes it immutable.
    pub fn contract(admin_key: Option<Key>) -> Self {
        Self {
            key: admin_key.unwrap_or(Key::KeyList(vec![])),
            is_smart_contract: true,
            ..Self::new(Key::KeyList(vec![]))
        }
    }

    pub fn with_receiver_sig_required(mut self) -> Self {
        self.receiver_sig_required = true;
        self
    }

    pub fn marked_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}

/// Token record with every role key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRecord {
    pub treasury: AccountId,
    pub admin_key: Option<Key>,
    pub kyc_key: Option<Key>,
    pub wipe_key: Option<Key>,
    pub freeze_key: Option<Key>,
    pub supply_key: Option<Key>,
    pub fee_schedule_key: Option<Key>,
    pub pause_key: Option<Key>,
    pub deleted: bool,
    pub version: VersionMarker,
}

impl TokenRecord {
    pub fn new(treasury: AccountId) -> Self {
        Self {
            treasury,
            admin_key: None,
            kyc_key: None,
            wipe_key: None,
            freeze_key: None,
            supply_key: None,
            fee_schedule_key: None,
            pause_key: None,
            deleted: false,
            version: VersionMarker::ABSENT,
        }
    }
}

/// Consensus topic record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicRecord {
    pub admin_key: Option<Key>,
    pub submit_key: Option<Key>,
    pub deleted: bool,
    pub version: VersionMarker,
}

impl TopicRecord {
    pub fn new(admin_key: Option<Key>, submit_key: Option<Key>) -> Self {
        Self {
            admin_key,
            submit_key,
            deleted: false,
            version: VersionMarker::ABSENT,
        }
    }
}

/// File record; the WACL key controls modifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub wacl: Key,
    pub deleted: bool,
    pub version: VersionMarker,
}

impl FileRecord {
    pub fn new(wacl: Key) -> Self {
        Self {
            wacl,
            deleted: false,
            version: VersionMarker::ABSENT,
        }
    }
}

/// Schedule record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub admin_key: Option<Key>,
    pub designated_payer: Option<AccountId>,
    pub deleted: bool,
    pub executed: bool,
    pub version: VersionMarker,
}

impl ScheduleRecord {
    pub fn new(admin_key: Option<Key>) -> Self {
        Self {
            admin_key,
            designated_payer: None,
            deleted: false,
            executed: false,
            version: VersionMarker::ABSENT,
        }
    }
}

/// Binding of an alias to the entity it currently names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AliasBinding {
    pub id: EntityId,
    pub version: VersionMarker,
}
