//! Cryptographic Verifier Adapter
//!
//! Implements `SyncVerifier` with real primitives:
//!
//! - Ed25519 via `ed25519-dalek`, strict verification over the message bytes
//! - ECDSA secp256k1 via `k256`, over the Keccak-256 digest of the message
//!
//! Signatures are independent, so a batch is verified in parallel with rayon.

use crate::domain::platform_sig::{PlatformSignature, VerificationStatus};
use crate::ports::outbound::SyncVerifier;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use quantum_telemetry::{metric_inc, SIGNATURE_VERIFICATIONS};
use rayon::prelude::*;
use sha3::{Digest, Keccak256};
use shared_types::{KeyType, ED25519_KEY_LEN};

/// Verifier backed by `ed25519-dalek` and `k256`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoVerifier;

impl CryptoVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl SyncVerifier for CryptoVerifier {
    fn verify_sync(&self, sigs: &mut [PlatformSignature]) {
        sigs.par_iter_mut().for_each(|sig| {
            sig.status = if verify_one(sig) {
                VerificationStatus::Valid
            } else {
                VerificationStatus::Invalid
            };
            let kind = match sig.key_type {
                KeyType::Ed25519 => "ed25519",
                KeyType::EcdsaSecp256k1 => "ecdsa_secp256k1",
            };
            let result = if sig.is_valid() { "valid" } else { "invalid" };
            metric_inc!(SIGNATURE_VERIFICATIONS, &[kind, result]);
        });
    }
}

fn verify_one(sig: &PlatformSignature) -> bool {
    match sig.key_type {
        KeyType::Ed25519 => verify_ed25519(&sig.public_key, &sig.signature, &sig.message),
        KeyType::EcdsaSecp256k1 => verify_secp256k1(&sig.public_key, &sig.signature, &sig.message),
    }
}

fn verify_ed25519(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let Ok(key_bytes) = <[u8; ED25519_KEY_LEN]>::try_from(public_key) else {
        return false;
    };
    let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
        return false;
    };
    key.verify_strict(message, &signature).is_ok()
}

fn verify_secp256k1(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = k256::ecdsa::Signature::from_slice(signature) else {
        return false;
    };
    let digest = keccak256(message);
    key.verify_prehash(&digest, &signature).is_ok()
}

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}
