//! # Platform Signatures
//!
//! A raw signature matched to its full public key, together with the message
//! it must cover. These are the objects handed to the platform verifier.

use shared_types::KeyType;
use std::fmt;
use std::sync::Arc;

/// Outcome of cryptographic verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

/// A signature ready for platform verification.
#[derive(Clone, PartialEq, Eq)]
pub struct PlatformSignature {
    pub key_type: KeyType,
    /// Complete public key bytes.
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    /// Bytes the signature must cover (the signed transaction body).
    pub message: Arc<[u8]>,
    pub status: VerificationStatus,
}

impl PlatformSignature {
    pub fn new(
        key_type: KeyType,
        public_key: &[u8],
        signature: &[u8],
        message: Arc<[u8]>,
    ) -> Self {
        Self {
            key_type,
            public_key: public_key.to_vec(),
            signature: signature.to_vec(),
            message,
            status: VerificationStatus::Unknown,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == VerificationStatus::Valid
    }
}

impl fmt::Debug for PlatformSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformSignature")
            .field("key_type", &self.key_type)
            .field("public_key", &hex_head(&self.public_key))
            .field("signature_len", &self.signature.len())
            .field("message_len", &self.message.len())
            .field("status", &self.status)
            .finish()
    }
}

fn hex_head(bytes: &[u8]) -> String {
    let head: String = bytes.iter().take(6).map(|b| format!("{:02x}", b)).collect();
    format!("0x{}..", head)
}
