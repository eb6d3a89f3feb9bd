//! # Transaction Accessor
//!
//! Parsed view of raw transaction contents, identified by the SHA-384 digest
//! of those contents.

use super::errors::AccessorError;
use sha2::{Digest, Sha384};
use shared_types::{SignatureMap, SignedTransaction, TransactionBody};
use std::fmt;
use std::sync::Arc;

/// Identity of one transaction: SHA-384 of its raw contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxnRef([u8; 48]);

impl TxnRef {
    pub fn of(contents: &[u8]) -> Self {
        let mut digest = [0u8; 48];
        digest.copy_from_slice(&Sha384::digest(contents));
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 48] {
        &self.0
    }
}

impl fmt::Display for TxnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for TxnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxnRef({})", hex::encode(self.0))
    }
}

/// A decoded transaction together with the exact bytes its signatures cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxnAccessor {
    txn_ref: TxnRef,
    body_bytes: Arc<[u8]>,
    body: TransactionBody,
    sig_map: SignatureMap,
}

impl TxnAccessor {
    /// Decodes raw signed-transaction contents.
    pub fn from_signed_bytes(contents: &[u8]) -> Result<Self, AccessorError> {
        let signed = SignedTransaction::from_bytes(contents)?;
        let body = signed.body()?;
        Ok(Self {
            txn_ref: TxnRef::of(contents),
            body_bytes: signed.body_bytes.into(),
            body,
            sig_map: signed.sig_map,
        })
    }

    pub fn txn_ref(&self) -> TxnRef {
        self.txn_ref
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn body_bytes(&self) -> &Arc<[u8]> {
        &self.body_bytes
    }

    pub fn sig_map(&self) -> &SignatureMap {
        &self.sig_map
    }
}
