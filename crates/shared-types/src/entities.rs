//! # Ledger Entities
//!
//! Identifiers and key structures shared by every subsystem that reasons about
//! ledger entities (accounts, contracts, tokens, topics, files, schedules).
//!
//! ## Addressing
//!
//! Every entity is addressed by a `shard.realm.num` triple. Accounts and
//! contracts may additionally be addressed by alias bytes (a public key or an
//! EVM address) that the ledger binds to a numeric id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric entity identifier (`shard.realm.num`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Entity in the default shard and realm.
    pub const fn from_num(num: u64) -> Self {
        Self::new(0, 0, num)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

pub type AccountId = EntityId;
pub type ContractId = EntityId;
pub type TokenId = EntityId;
pub type TopicId = EntityId;
pub type FileId = EntityId;
pub type ScheduleId = EntityId;

/// Alias bytes bound to an account or contract (public key or EVM address).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Alias(pub Vec<u8>);

impl Alias {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alias(0x{})", hex::encode(&self.0))
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

/// Reference to an account or contract by numeric id or by alias.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IdOrAlias {
    Id(EntityId),
    Alias(Alias),
}

impl IdOrAlias {
    /// Returns the numeric id if this reference is not an alias.
    pub fn as_id(&self) -> Option<&EntityId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Alias(_) => None,
        }
    }
}

impl From<EntityId> for IdOrAlias {
    fn from(id: EntityId) -> Self {
        Self::Id(id)
    }
}

impl From<Alias> for IdOrAlias {
    fn from(alias: Alias) -> Self {
        Self::Alias(alias)
    }
}

impl fmt::Display for IdOrAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => id.fmt(f),
            Self::Alias(alias) => alias.fmt(f),
        }
    }
}

pub type AccountRef = IdOrAlias;
pub type ContractRef = IdOrAlias;

/// A reference to one ledger entity, tagged with its entity type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityRef {
    Account(AccountRef),
    Contract(ContractRef),
    Token(TokenId),
    Topic(TopicId),
    File(FileId),
    Schedule(ScheduleId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(r) => write!(f, "account:{}", r),
            Self::Contract(r) => write!(f, "contract:{}", r),
            Self::Token(id) => write!(f, "token:{}", id),
            Self::Topic(id) => write!(f, "topic:{}", id),
            Self::File(id) => write!(f, "file:{}", id),
            Self::Schedule(id) => write!(f, "schedule:{}", id),
        }
    }
}

// =============================================================================
// KEYS
// =============================================================================

/// Length of an Ed25519 public key.
pub const ED25519_KEY_LEN: usize = 32;

/// Length of a compressed secp256k1 public key.
pub const ECDSA_SECP256K1_KEY_LEN: usize = 33;

/// Cryptographic scheme of a primitive key or signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    Ed25519,
    EcdsaSecp256k1,
}

impl KeyType {
    /// Length in bytes of a complete public key of this type.
    pub const fn public_key_len(self) -> usize {
        match self {
            Self::Ed25519 => ED25519_KEY_LEN,
            Self::EcdsaSecp256k1 => ECDSA_SECP256K1_KEY_LEN,
        }
    }
}

/// A (possibly composite) key controlling a ledger entity.
///
/// Leaves are either primitive cryptographic keys or contract-id keys, which
/// are authorized by contract execution context instead of signatures.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Ed25519(Vec<u8>),
    EcdsaSecp256k1(Vec<u8>),
    ContractId(ContractId),
    DelegatableContractId(ContractId),
    Threshold { threshold: u32, keys: Vec<Key> },
    KeyList(Vec<Key>),
}

impl Key {
    /// Returns the scheme and bytes if this is a primitive cryptographic key.
    pub fn as_primitive(&self) -> Option<(KeyType, &[u8])> {
        match self {
            Self::Ed25519(bytes) => Some((KeyType::Ed25519, bytes)),
            Self::EcdsaSecp256k1(bytes) => Some((KeyType::EcdsaSecp256k1, bytes)),
            _ => None,
        }
    }

    /// True for contract-id style keys.
    pub fn is_contract_id(&self) -> bool {
        matches!(self, Self::ContractId(_) | Self::DelegatableContractId(_))
    }

    /// True if no leaf of this key can ever be satisfied by a signature.
    ///
    /// An entity whose key is empty is immutable.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ed25519(bytes) | Self::EcdsaSecp256k1(bytes) => bytes.is_empty(),
            Self::ContractId(_) | Self::DelegatableContractId(_) => false,
            Self::Threshold { keys, .. } | Self::KeyList(keys) => keys.iter().all(Key::is_empty),
        }
    }

    /// Visits every primitive cryptographic key, depth first, in declaration order.
    pub fn visit_primitive_keys<'a>(&'a self, visitor: &mut impl FnMut(KeyType, &'a [u8])) {
        match self {
            Self::Ed25519(bytes) => visitor(KeyType::Ed25519, bytes),
            Self::EcdsaSecp256k1(bytes) => visitor(KeyType::EcdsaSecp256k1, bytes),
            Self::ContractId(_) | Self::DelegatableContractId(_) => {}
            Self::Threshold { keys, .. } | Self::KeyList(keys) => {
                for key in keys {
                    key.visit_primitive_keys(visitor);
                }
            }
        }
    }

    /// Collects the bytes of every primitive key.
    pub fn primitive_keys(&self) -> Vec<&[u8]> {
        let mut out = Vec::new();
        self.visit_primitive_keys(&mut |_, bytes| out.push(bytes));
        out
    }
}
