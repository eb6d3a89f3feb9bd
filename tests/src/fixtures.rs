//! # Shared Fixtures
//!
//! Real key pairs, ledger setup and signed transaction contents for the
//! integration flows and benchmarks.

use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use qc_10_signature_expansion::{
    keccak256, CryptoVerifier, ExpandHandleSpan, ExpansionConfig, InMemoryLedgerState,
};
use shared_types::{
    AccountRecord, EntityId, Key, SignatureMap, SignaturePair, SignedTransaction,
    TransactionBody, TransactionData, TransactionId,
};
use std::sync::Arc;

pub const PAYER: u64 = 1001;
pub const NODE: u64 = 3;

pub type Service = ExpandHandleSpan<InMemoryLedgerState, CryptoVerifier>;

/// A key pair able to sign transaction bodies.
pub enum TestKey {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

impl TestKey {
    pub fn ed25519(seed: u8) -> Self {
        Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[seed; 32]))
    }

    pub fn secp256k1(seed: u8) -> Self {
        let scalar = [seed.max(1); 32];
        Self::Secp256k1(k256::ecdsa::SigningKey::from_slice(&scalar).expect("valid scalar"))
    }

    pub fn random_ed25519() -> Self {
        Self::Ed25519(ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng))
    }

    pub fn random_secp256k1() -> Self {
        Self::Secp256k1(k256::ecdsa::SigningKey::random(&mut rand::thread_rng()))
    }

    pub fn public_key(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(signing) => signing.verifying_key().to_bytes().to_vec(),
            Self::Secp256k1(signing) => signing.verifying_key().to_sec1_bytes().to_vec(),
        }
    }

    pub fn key(&self) -> Key {
        match self {
            Self::Ed25519(_) => Key::Ed25519(self.public_key()),
            Self::Secp256k1(_) => Key::EcdsaSecp256k1(self.public_key()),
        }
    }

    /// Full-prefix signature over `body_bytes`.
    pub fn sign(&self, body_bytes: &[u8]) -> SignaturePair {
        self.sign_with_prefix(body_bytes, self.public_key().len())
    }

    /// Signature over `body_bytes` announced with the first `prefix_len` key bytes.
    pub fn sign_with_prefix(&self, body_bytes: &[u8], prefix_len: usize) -> SignaturePair {
        let prefix = self.public_key()[..prefix_len].to_vec();
        match self {
            Self::Ed25519(signing) => {
                SignaturePair::ed25519(prefix, signing.sign(body_bytes).to_bytes().to_vec())
            }
            Self::Secp256k1(signing) => {
                let sig: k256::ecdsa::Signature = signing
                    .sign_prehash(&keccak256(body_bytes))
                    .expect("prehash signing");
                SignaturePair::ecdsa_secp256k1(prefix, sig.to_bytes().to_vec())
            }
        }
    }
}

pub fn id(num: u64) -> EntityId {
    EntityId::from_num(num)
}

pub fn body(payer: u64, memo: &str, data: TransactionData) -> TransactionBody {
    TransactionBody {
        transaction_id: TransactionId {
            payer: id(payer),
            valid_start_nanos: 1_700_000_000_000_000_000,
        },
        node_account: id(NODE),
        memo: memo.to_string(),
        data,
    }
}

/// Raw contents of `body` signed by every key in `signers`, in order.
pub fn signed_contents(body: &TransactionBody, signers: &[&TestKey]) -> Vec<u8> {
    let body_bytes = body.to_bytes().expect("encodable body");
    let pairs = signers.iter().map(|signer| signer.sign(&body_bytes)).collect();
    contents_with_pairs(body, pairs)
}

/// Raw contents of `body` carrying exactly `pairs`.
pub fn contents_with_pairs(body: &TransactionBody, pairs: Vec<SignaturePair>) -> Vec<u8> {
    SignedTransaction::new(body, SignatureMap::new(pairs))
        .and_then(|signed| signed.to_bytes())
        .expect("encodable transaction")
}

/// Ledger holding the payer account controlled by `payer_key`.
pub fn ledger_with_payer(payer_key: &TestKey) -> Arc<InMemoryLedgerState> {
    let state = Arc::new(InMemoryLedgerState::new());
    state.put_account(id(PAYER), AccountRecord::new(payer_key.key()));
    state
}

pub fn service(state: &Arc<InMemoryLedgerState>) -> Service {
    ExpandHandleSpan::new(Arc::clone(state), CryptoVerifier::new(), ExpansionConfig::for_testing())
}

pub fn service_with(state: &Arc<InMemoryLedgerState>, config: ExpansionConfig) -> Service {
    ExpandHandleSpan::new(Arc::clone(state), CryptoVerifier::new(), config)
}
