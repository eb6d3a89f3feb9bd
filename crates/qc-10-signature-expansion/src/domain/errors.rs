//! # Signature Expansion Errors
//!
//! Error types for the expansion pipeline. Key-ordering failures and
//! signature-matching failures are kept in separate enums so that the final
//! status always tells which stage stopped the expansion.

use shared_types::{CodecError, KeyType, ResponseCode};
use thiserror::Error;

/// Why the keys required for a transaction could not be ordered.
///
/// Closed set; new conditions are added as variants, never as strings.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum KeyOrderingFailure {
    #[error("Referenced file does not exist")]
    MissingFile,

    #[error("Referenced account does not exist")]
    MissingAccount,

    #[error("Referenced contract does not exist or is deleted")]
    InvalidContract,

    #[error("Contract has no admin key")]
    ImmutableContract,

    #[error("Auto-renew account does not exist or is deleted")]
    InvalidAutoRenewAccount,

    #[error("Referenced token does not exist")]
    MissingToken,

    #[error("Referenced topic does not exist or is deleted")]
    InvalidTopic,

    #[error("Token treasury account does not exist or is deleted")]
    MissingTokenTreasury,

    #[error("Referenced schedule does not exist")]
    MissingSchedule,

    #[error("Referenced account is deleted")]
    InvalidAccount,

    #[error("Account key can never sign")]
    ImmutableAccount,

    /// Unexpected condition while resolving keys.
    #[error("Required signers could not be resolved")]
    GeneralError,
}

impl From<KeyOrderingFailure> for ResponseCode {
    fn from(failure: KeyOrderingFailure) -> Self {
        match failure {
            KeyOrderingFailure::MissingFile => ResponseCode::InvalidFileId,
            KeyOrderingFailure::MissingAccount => ResponseCode::InvalidAccountId,
            KeyOrderingFailure::InvalidContract => ResponseCode::InvalidContractId,
            KeyOrderingFailure::ImmutableContract => ResponseCode::ModifyingImmutableContract,
            KeyOrderingFailure::InvalidAutoRenewAccount => ResponseCode::InvalidAutorenewAccount,
            KeyOrderingFailure::MissingToken => ResponseCode::InvalidTokenId,
            KeyOrderingFailure::InvalidTopic => ResponseCode::InvalidTopicId,
            KeyOrderingFailure::MissingTokenTreasury => {
                ResponseCode::InvalidTreasuryAccountForToken
            }
            KeyOrderingFailure::MissingSchedule => ResponseCode::InvalidScheduleId,
            KeyOrderingFailure::InvalidAccount => ResponseCode::AccountDeleted,
            KeyOrderingFailure::ImmutableAccount => ResponseCode::ImmutableAccount,
            KeyOrderingFailure::GeneralError => ResponseCode::UnresolvableRequiredSigners,
        }
    }
}

/// Why supplied signature bytes could not be matched to the required keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigMatchError {
    /// No supplied signature matches a required primitive key.
    #[error("No signature supplied for {key_type:?} key 0x{}", hex_prefix(.public_key))]
    MissingSignature {
        key_type: KeyType,
        public_key: Vec<u8>,
    },

    /// Several prefixes matched one key but carried different signatures.
    #[error("Ambiguous signature prefixes for key 0x{}", hex_prefix(.public_key))]
    KeyPrefixMismatch { public_key: Vec<u8> },
}

impl SigMatchError {
    pub fn as_code(&self) -> ResponseCode {
        match self {
            Self::MissingSignature { .. } => ResponseCode::InvalidSignature,
            Self::KeyPrefixMismatch { .. } => ResponseCode::KeyPrefixMismatch,
        }
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(4)
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Access to a part of a rationalized result that its shape does not carry.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SigMetaError {
    #[error("Payer required signing keys could not be rationalized")]
    PayerUnavailable,

    #[error("Other-party required signing keys could not be rationalized")]
    OthersUnavailable,

    #[error("Verified signatures could not be rationalized")]
    SigsUnavailable,
}

/// Failure to turn raw transaction contents into an accessor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessorError {
    #[error("Malformed transaction contents: {0}")]
    Decode(#[from] CodecError),
}
