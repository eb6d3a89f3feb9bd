//! # Signature Matching
//!
//! Walks required key trees and pairs each primitive key with the raw
//! signature bytes supplied for it. Matching is structural only; nothing here
//! performs cryptographic verification.
//!
//! ## Key Semantics
//!
//! - `KeyList` needs every child.
//! - `Threshold { t }` needs at least `t` children.
//! - Contract-id keys are authorized by execution context and always count as
//!   satisfied.
//!
//! Signatures matched by a threshold child that ends up unsatisfied are not
//! consumed. A raw signature already consumed, in this pass or an earlier one,
//! yields no second platform signature.

use super::errors::SigMatchError;
use super::platform_sig::PlatformSignature;
use crate::ports::outbound::{PlatformSigFactory, PubKeyToSigBytes, SuppliedSig};
use shared_types::{Key, KeyType, ResponseCode};

/// Platform signatures for one pass, or the error that ended it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlatformSigsCreationResult {
    platform_sigs: Vec<PlatformSignature>,
    terminating_error: Option<SigMatchError>,
}

impl PlatformSigsCreationResult {
    fn failed(error: SigMatchError) -> Self {
        Self {
            platform_sigs: Vec::new(),
            terminating_error: Some(error),
        }
    }

    pub fn has_failed(&self) -> bool {
        self.terminating_error.is_some()
    }

    pub fn terminating_error(&self) -> Option<&SigMatchError> {
        self.terminating_error.as_ref()
    }

    /// Status of the pass: `Ok` or the matching failure code.
    pub fn as_code(&self) -> ResponseCode {
        self.terminating_error
            .as_ref()
            .map(SigMatchError::as_code)
            .unwrap_or(ResponseCode::Ok)
    }

    /// Matched signatures; always empty for a failed pass.
    pub fn platform_sigs(&self) -> &[PlatformSignature] {
        &self.platform_sigs
    }

    pub fn into_platform_sigs(self) -> Vec<PlatformSignature> {
        self.platform_sigs
    }
}

/// Creates platform signatures for every key in `keys`, in order.
pub fn create_crypto_sigs_from(
    keys: &[Key],
    pk_to_sig_bytes: &mut dyn PubKeyToSigBytes,
    sig_factory: &dyn PlatformSigFactory,
) -> PlatformSigsCreationResult {
    let mut platform_sigs = Vec::new();
    for key in keys {
        let mut matched = Vec::new();
        if let Err(error) = satisfy(key, &*pk_to_sig_bytes, &mut matched) {
            return PlatformSigsCreationResult::failed(error);
        }
        for (key_type, public_key, sig) in matched {
            if pk_to_sig_bytes.mark_used(sig.index) {
                platform_sigs.push(sig_factory.sign_appropriately(key_type, &public_key, &sig.bytes));
            }
        }
    }
    PlatformSigsCreationResult {
        platform_sigs,
        terminating_error: None,
    }
}

type Matched = (KeyType, Vec<u8>, SuppliedSig);

fn satisfy(
    key: &Key,
    pk_to_sig_bytes: &dyn PubKeyToSigBytes,
    out: &mut Vec<Matched>,
) -> Result<(), SigMatchError> {
    if let Some((key_type, public_key)) = key.as_primitive() {
        return match pk_to_sig_bytes.sig_bytes_for(key_type, public_key)? {
            Some(sig) => {
                out.push((key_type, public_key.to_vec(), sig));
                Ok(())
            }
            None => Err(SigMatchError::MissingSignature {
                key_type,
                public_key: public_key.to_vec(),
            }),
        };
    }

    match key {
        Key::KeyList(children) => {
            for child in children {
                satisfy(child, pk_to_sig_bytes, out)?;
            }
            Ok(())
        }
        Key::Threshold { threshold, keys } => {
            let mut satisfied = 0usize;
            let mut first_missing = None;

            for child in keys {
                let mut child_sigs = Vec::new();
                match satisfy(child, pk_to_sig_bytes, &mut child_sigs) {
                    Ok(()) => {
                        satisfied += 1;
                        out.append(&mut child_sigs);
                    }
                    Err(mismatch @ SigMatchError::KeyPrefixMismatch { .. }) => return Err(mismatch),
                    Err(missing) => {
                        first_missing.get_or_insert(missing);
                    }
                }
            }

            if satisfied >= *threshold as usize {
                return Ok(());
            }
            Err(first_missing.unwrap_or_else(|| unsatisfiable(key)))
        }
        // Contract-id keys; primitives returned above.
        _ => Ok(()),
    }
}

/// Error for a threshold larger than its key list.
fn unsatisfiable(key: &Key) -> SigMatchError {
    let mut first = None;
    key.visit_primitive_keys(&mut |key_type, public_key| {
        first.get_or_insert((key_type, public_key.to_vec()));
    });
    let (key_type, public_key) = first.unwrap_or((KeyType::Ed25519, Vec::new()));
    SigMatchError::MissingSignature {
        key_type,
        public_key,
    }
}
