//! # Transactions
//!
//! Deserialized transaction bodies and the signature map that travels with
//! them. Only the fields that influence which keys must sign are modelled.
//!
//! Raw contents received from gossip are the bincode encoding of a
//! [`SignedTransaction`]; the signed body is itself bincode-encoded inside
//! `body_bytes` so signatures cover exactly those bytes.

use crate::entities::{
    AccountRef, Alias, ContractRef, EntityId, FileId, Key, KeyType, ScheduleId, TokenId, TopicId,
};
use crate::errors::CodecError;
use serde::{Deserialize, Serialize};

/// Identity of a transaction as chosen by its payer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    /// Account paying for the transaction.
    pub payer: EntityId,
    /// Start of the validity window, nanoseconds since the epoch.
    pub valid_start_nanos: u64,
}

/// A transaction body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    pub node_account: EntityId,
    pub memo: String,
    pub data: TransactionData,
}

impl TransactionBody {
    pub fn payer(&self) -> &EntityId {
        &self.transaction_id.payer
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Transaction-type specific content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    CryptoCreate(CryptoCreateBody),
    CryptoUpdate(CryptoUpdateBody),
    CryptoDelete(CryptoDeleteBody),
    CryptoTransfer(CryptoTransferBody),
    CryptoApproveAllowance(CryptoApproveAllowanceBody),
    FileCreate(FileCreateBody),
    FileAppend(FileAppendBody),
    FileUpdate(FileUpdateBody),
    FileDelete(FileDeleteBody),
    ContractCreate(ContractCreateBody),
    ContractUpdate(ContractUpdateBody),
    ContractDelete(ContractDeleteBody),
    ContractCall(ContractCallBody),
    TopicCreate(TopicCreateBody),
    TopicUpdate(TopicUpdateBody),
    TopicDelete(TopicDeleteBody),
    TopicSubmitMessage(TopicSubmitMessageBody),
    TokenCreate(TokenCreateBody),
    TokenUpdate(TokenUpdateBody),
    TokenManage(TokenManageBody),
    TokenAssociate(TokenAssociationBody),
    TokenDissociate(TokenAssociationBody),
    ScheduleCreate(ScheduleCreateBody),
    ScheduleSign(ScheduleSignBody),
    ScheduleDelete(ScheduleDeleteBody),
}

impl TransactionData {
    /// Short name of the transaction type, used in logs and metrics.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::CryptoCreate(_) => "CryptoCreate",
            Self::CryptoUpdate(_) => "CryptoUpdate",
            Self::CryptoDelete(_) => "CryptoDelete",
            Self::CryptoTransfer(_) => "CryptoTransfer",
            Self::CryptoApproveAllowance(_) => "CryptoApproveAllowance",
            Self::FileCreate(_) => "FileCreate",
            Self::FileAppend(_) => "FileAppend",
            Self::FileUpdate(_) => "FileUpdate",
            Self::FileDelete(_) => "FileDelete",
            Self::ContractCreate(_) => "ContractCreate",
            Self::ContractUpdate(_) => "ContractUpdate",
            Self::ContractDelete(_) => "ContractDelete",
            Self::ContractCall(_) => "ContractCall",
            Self::TopicCreate(_) => "TopicCreate",
            Self::TopicUpdate(_) => "TopicUpdate",
            Self::TopicDelete(_) => "TopicDelete",
            Self::TopicSubmitMessage(_) => "TopicSubmitMessage",
            Self::TokenCreate(_) => "TokenCreate",
            Self::TokenUpdate(_) => "TokenUpdate",
            Self::TokenManage(_) => "TokenManage",
            Self::TokenAssociate(_) => "TokenAssociate",
            Self::TokenDissociate(_) => "TokenDissociate",
            Self::ScheduleCreate(_) => "ScheduleCreate",
            Self::ScheduleSign(_) => "ScheduleSign",
            Self::ScheduleDelete(_) => "ScheduleDelete",
        }
    }
}

// =============================================================================
// CRYPTO
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoCreateBody {
    pub key: Key,
    pub receiver_sig_required: bool,
    pub alias: Option<Alias>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoUpdateBody {
    pub account: AccountRef,
    pub key: Option<Key>,
    pub receiver_sig_required: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoDeleteBody {
    pub account: AccountRef,
    pub transfer_account: AccountRef,
}

/// One hbar or fungible-token adjustment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account: AccountRef,
    /// Negative for debits, positive for credits.
    pub amount: i64,
    /// Debit authorized by an allowance granted to the payer.
    pub is_approval: bool,
}

impl AccountAmount {
    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }

    pub fn is_credit(&self) -> bool {
        self.amount > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    pub sender: AccountRef,
    pub receiver: AccountRef,
    pub serial_number: i64,
    pub is_approval: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferList {
    pub token: TokenId,
    pub transfers: Vec<AccountAmount>,
    pub nft_transfers: Vec<NftTransfer>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTransferBody {
    pub hbar_transfers: Vec<AccountAmount>,
    pub token_transfers: Vec<TokenTransferList>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceGrant {
    /// Owner granting the allowance; the payer when absent.
    pub owner: Option<AccountRef>,
    pub spender: AccountRef,
    pub token: Option<TokenId>,
    pub amount: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoApproveAllowanceBody {
    pub allowances: Vec<AllowanceGrant>,
}

// =============================================================================
// FILES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreateBody {
    pub keys: Key,
    pub contents: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAppendBody {
    pub file: FileId,
    pub contents: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpdateBody {
    pub file: FileId,
    pub keys: Option<Key>,
    pub contents: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDeleteBody {
    pub file: FileId,
}

// =============================================================================
// CONTRACTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCreateBody {
    pub admin_key: Option<Key>,
    pub auto_renew_account: Option<AccountRef>,
    pub initial_balance: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractUpdateBody {
    pub contract: ContractRef,
    pub admin_key: Option<Key>,
    pub auto_renew_account: Option<AccountRef>,
    pub memo: Option<String>,
    pub expiration_time: Option<u64>,
}

impl ContractUpdateBody {
    /// True when the update only extends the expiration time.
    pub fn only_extends_expiry(&self) -> bool {
        self.expiration_time.is_some()
            && self.admin_key.is_none()
            && self.auto_renew_account.is_none()
            && self.memo.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeleteBody {
    pub contract: ContractRef,
    pub transfer_account: Option<AccountRef>,
    pub transfer_contract: Option<ContractRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCallBody {
    pub contract: ContractRef,
    pub amount: i64,
    pub function_parameters: Vec<u8>,
}

// =============================================================================
// TOPICS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCreateBody {
    pub admin_key: Option<Key>,
    pub submit_key: Option<Key>,
    pub auto_renew_account: Option<AccountRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicUpdateBody {
    pub topic: TopicId,
    pub admin_key: Option<Key>,
    pub submit_key: Option<Key>,
    pub auto_renew_account: Option<AccountRef>,
    pub memo: Option<String>,
    pub expiration_time: Option<u64>,
}

impl TopicUpdateBody {
    /// True when the update only extends the expiration time.
    pub fn only_extends_expiry(&self) -> bool {
        self.expiration_time.is_some()
            && self.admin_key.is_none()
            && self.submit_key.is_none()
            && self.auto_renew_account.is_none()
            && self.memo.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDeleteBody {
    pub topic: TopicId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSubmitMessageBody {
    pub topic: TopicId,
    pub message: Vec<u8>,
}

// =============================================================================
// TOKENS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreateBody {
    pub symbol: String,
    pub treasury: AccountRef,
    pub admin_key: Option<Key>,
    pub auto_renew_account: Option<AccountRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUpdateBody {
    pub token: TokenId,
    pub treasury: Option<AccountRef>,
    pub admin_key: Option<Key>,
    pub auto_renew_account: Option<AccountRef>,
}

/// Token operations authorized by one of the token's role keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenOperation {
    Mint,
    Burn,
    Wipe,
    Freeze,
    Unfreeze,
    GrantKyc,
    RevokeKyc,
    Delete,
    Pause,
    Unpause,
    FeeScheduleUpdate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenManageBody {
    pub token: TokenId,
    pub operation: TokenOperation,
    /// Account targeted by wipe/freeze/KYC operations.
    pub account: Option<AccountRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssociationBody {
    pub account: AccountRef,
    pub tokens: Vec<TokenId>,
}

// =============================================================================
// SCHEDULES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCreateBody {
    pub admin_key: Option<Key>,
    pub payer: Option<AccountRef>,
    pub scheduled_memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSignBody {
    pub schedule: ScheduleId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDeleteBody {
    pub schedule: ScheduleId,
}

// =============================================================================
// SIGNATURES
// =============================================================================

/// Raw signature bytes tagged with their scheme.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureBytes {
    Ed25519(Vec<u8>),
    EcdsaSecp256k1(Vec<u8>),
}

impl SignatureBytes {
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Ed25519(_) => KeyType::Ed25519,
            Self::EcdsaSecp256k1(_) => KeyType::EcdsaSecp256k1,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ed25519(bytes) | Self::EcdsaSecp256k1(bytes) => bytes,
        }
    }
}

/// A signature accompanied by a (possibly partial) prefix of its public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub pub_key_prefix: Vec<u8>,
    pub signature: SignatureBytes,
}

impl SignaturePair {
    pub fn ed25519(pub_key_prefix: impl Into<Vec<u8>>, sig: impl Into<Vec<u8>>) -> Self {
        Self {
            pub_key_prefix: pub_key_prefix.into(),
            signature: SignatureBytes::Ed25519(sig.into()),
        }
    }

    pub fn ecdsa_secp256k1(pub_key_prefix: impl Into<Vec<u8>>, sig: impl Into<Vec<u8>>) -> Self {
        Self {
            pub_key_prefix: pub_key_prefix.into(),
            signature: SignatureBytes::EcdsaSecp256k1(sig.into()),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.signature.key_type()
    }

    /// True when the prefix is the complete public key.
    pub fn has_full_prefix(&self) -> bool {
        self.pub_key_prefix.len() == self.key_type().public_key_len()
    }
}

/// All signatures supplied with a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMap {
    pub sig_pairs: Vec<SignaturePair>,
}

impl SignatureMap {
    pub fn new(sig_pairs: Vec<SignaturePair>) -> Self {
        Self { sig_pairs }
    }
}

/// Signed transaction envelope as carried by gossip events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub body_bytes: Vec<u8>,
    pub sig_map: SignatureMap,
}

impl SignedTransaction {
    /// Encodes `body` and pairs it with `sig_map`.
    pub fn new(body: &TransactionBody, sig_map: SignatureMap) -> Result<Self, CodecError> {
        Ok(Self {
            body_bytes: body.to_bytes()?,
            sig_map,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    pub fn body(&self) -> Result<TransactionBody, CodecError> {
        TransactionBody::from_bytes(&self.body_bytes)
    }
}
