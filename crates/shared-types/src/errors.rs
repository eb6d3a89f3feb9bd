//! # Error Types
//!
//! Status codes and codec errors shared across subsystems.

use std::fmt;
use thiserror::Error;

/// Errors raised while encoding or decoding transaction envelopes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Failed to encode: {0}")]
    Encode(String),

    #[error("Failed to decode: {0}")]
    Decode(String),
}

/// Closed set of statuses a transaction's signature expansion can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Ok,
    InvalidAccountId,
    AccountDeleted,
    ImmutableAccount,
    InvalidContractId,
    ModifyingImmutableContract,
    InvalidAutorenewAccount,
    InvalidTokenId,
    InvalidTreasuryAccountForToken,
    InvalidTopicId,
    InvalidFileId,
    InvalidScheduleId,
    UnresolvableRequiredSigners,
    /// A required key had no matching signature.
    InvalidSignature,
    /// Several signature prefixes matched one key with different signatures.
    KeyPrefixMismatch,
}

impl ResponseCode {
    pub fn is_ok(&self) -> bool {
        *self == Self::Ok
    }

    /// True for failures raised while matching signatures to required keys.
    pub fn is_sig_matching_failure(&self) -> bool {
        matches!(self, Self::InvalidSignature | Self::KeyPrefixMismatch)
    }

    /// True for failures raised while resolving required keys from state.
    pub fn is_key_ordering_failure(&self) -> bool {
        !self.is_ok() && !self.is_sig_matching_failure()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Self::AccountDeleted => "ACCOUNT_DELETED",
            Self::ImmutableAccount => "IMMUTABLE_ACCOUNT",
            Self::InvalidContractId => "INVALID_CONTRACT_ID",
            Self::ModifyingImmutableContract => "MODIFYING_IMMUTABLE_CONTRACT",
            Self::InvalidAutorenewAccount => "INVALID_AUTORENEW_ACCOUNT",
            Self::InvalidTokenId => "INVALID_TOKEN_ID",
            Self::InvalidTreasuryAccountForToken => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
            Self::InvalidTopicId => "INVALID_TOPIC_ID",
            Self::InvalidFileId => "INVALID_FILE_ID",
            Self::InvalidScheduleId => "INVALID_SCHEDULE_ID",
            Self::UnresolvableRequiredSigners => "UNRESOLVABLE_REQUIRED_SIGNERS",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::KeyPrefixMismatch => "KEY_PREFIX_MISMATCH",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
