//! In-Memory Ledger State Adapter
//!
//! Implements the `LedgerStateView` port over plain maps. Every mutation
//! stamps the touched record with a fresh, strictly larger version marker.

use crate::ports::outbound::LedgerStateView;
use parking_lot::RwLock;
use shared_types::{
    AccountRecord, Alias, AliasBinding, EntityId, FileRecord, ScheduleRecord, TokenRecord,
    TopicRecord, VersionMarker,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory ledger state for tests, benches and embedding.
pub struct InMemoryLedgerState {
    accounts: RwLock<HashMap<EntityId, AccountRecord>>,
    tokens: RwLock<HashMap<EntityId, TokenRecord>>,
    topics: RwLock<HashMap<EntityId, TopicRecord>>,
    files: RwLock<HashMap<EntityId, FileRecord>>,
    schedules: RwLock<HashMap<EntityId, ScheduleRecord>>,
    aliases: RwLock<HashMap<Alias, AliasBinding>>,
    /// Last version marker handed out.
    last_version: AtomicU64,
}

impl InMemoryLedgerState {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            topics: RwLock::new(HashMap::new()),
            files: RwLock::new(HashMap::new()),
            schedules: RwLock::new(HashMap::new()),
            aliases: RwLock::new(HashMap::new()),
            last_version: AtomicU64::new(VersionMarker::ABSENT.0),
        }
    }

    fn next_version(&self) -> VersionMarker {
        VersionMarker(self.last_version.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Inserts or replaces an account; returns the marker it was stamped with.
    pub fn put_account(&self, id: EntityId, mut record: AccountRecord) -> VersionMarker {
        record.version = self.next_version();
        let version = record.version;
        self.accounts.write().insert(id, record);
        version
    }

    pub fn put_token(&self, id: EntityId, mut record: TokenRecord) -> VersionMarker {
        record.version = self.next_version();
        let version = record.version;
        self.tokens.write().insert(id, record);
        version
    }

    pub fn put_topic(&self, id: EntityId, mut record: TopicRecord) -> VersionMarker {
        record.version = self.next_version();
        let version = record.version;
        self.topics.write().insert(id, record);
        version
    }

    pub fn put_file(&self, id: EntityId, mut record: FileRecord) -> VersionMarker {
        record.version = self.next_version();
        let version = record.version;
        self.files.write().insert(id, record);
        version
    }

    pub fn put_schedule(&self, id: EntityId, mut record: ScheduleRecord) -> VersionMarker {
        record.version = self.next_version();
        let version = record.version;
        self.schedules.write().insert(id, record);
        version
    }

    /// Binds (or rebinds) `alias` to `id`.
    pub fn bind_alias(&self, alias: Alias, id: EntityId) -> VersionMarker {
        let version = self.next_version();
        self.aliases.write().insert(alias, AliasBinding { id, version });
        version
    }

    /// Marks an existing account deleted. Returns `false` if it does not exist.
    pub fn delete_account(&self, id: &EntityId) -> bool {
        let version = self.next_version();
        match self.accounts.write().get_mut(id) {
            Some(record) => {
                record.deleted = true;
                record.version = version;
                true
            }
            None => false,
        }
    }

    /// Removes an account entirely.
    pub fn remove_account(&self, id: &EntityId) -> Option<AccountRecord> {
        self.accounts.write().remove(id)
    }
}

impl Default for InMemoryLedgerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStateView for InMemoryLedgerState {
    fn account(&self, id: &EntityId) -> Option<AccountRecord> {
        self.accounts.read().get(id).cloned()
    }

    fn token(&self, id: &EntityId) -> Option<TokenRecord> {
        self.tokens.read().get(id).cloned()
    }

    fn topic(&self, id: &EntityId) -> Option<TopicRecord> {
        self.topics.read().get(id).cloned()
    }

    fn file(&self, id: &EntityId) -> Option<FileRecord> {
        self.files.read().get(id).cloned()
    }

    fn schedule(&self, id: &EntityId) -> Option<ScheduleRecord> {
        self.schedules.read().get(id).cloned()
    }

    fn resolve_alias(&self, alias: &Alias) -> Option<AliasBinding> {
        self.aliases.read().get(alias).copied()
    }
}
