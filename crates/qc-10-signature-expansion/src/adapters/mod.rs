//! # Adapters
//!
//! Concrete implementations of the outbound ports.

pub mod crypto_verifier;
pub mod memory_state;
pub mod sig_factory;
pub mod sig_map;

pub use crypto_verifier::{keccak256, CryptoVerifier};
pub use memory_state::InMemoryLedgerState;
pub use sig_factory::BodySigningFactory;
pub use sig_map::SigMapPubKeyToSigBytes;
