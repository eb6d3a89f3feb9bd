//! # Signature Expansion Subsystem (QC-10)
//!
//! Decides, for every transaction, which keys must have signed it and which
//! supplied signatures satisfy them.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): key resolution, signing order, signature
//!   matching, the expansion state machine, span cache and rationalization
//! - **Ports Layer** (`ports/`): the expansion API and the ledger/signature
//!   collaborators it depends on
//! - **Adapters Layer** (`adapters/`): in-memory ledger state, signature-map
//!   matching and Ed25519/secp256k1 verification
//! - **Service Layer** (`service.rs`): `ExpandHandleSpan`, wiring intake-time
//!   expansion to handle-time rationalization
//!
//! ## Pipeline
//!
//! ```text
//! raw contents ─► TxnAccessor ─► SigRequirements (payer, then others)
//!                                     │ via SigMetadataLookup + LinkedRefs
//!                                     ▼
//!                           create_crypto_sigs_from ─► sweep ─► RationalizedSigMeta
//!                                                                  │
//!                                       SpanCache ◄────────────────┘
//!                                           │ take (single use)
//!                                           ▼
//!                               Rationalization: reuse or reexpand
//! ```
//!
//! ## Determinism
//!
//! Entities are resolved in the body's declaration order and the first
//! failure ends a pass, so every node reaches the same status for the same
//! transaction and state.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{
    keccak256, BodySigningFactory, CryptoVerifier, InMemoryLedgerState, SigMapPubKeyToSigBytes,
};
pub use config::ExpansionConfig;
pub use domain::accessor::{TxnAccessor, TxnRef};
pub use domain::errors::{AccessorError, KeyOrderingFailure, SigMatchError, SigMetaError};
pub use domain::expansion::{Expansion, ExpansionOutcome, ExpansionState};
pub use domain::linked_refs::LinkedRefs;
pub use domain::lookup::{
    AccountSigningMetadata, ContractSigningMetadata, FileSigningMetadata, LookupOutcome,
    ScheduleSigningMetadata, SigMetadataLookup, SigningMetadata, StateSigMetadataLookup,
    TokenSigningMetadata, TopicSigningMetadata,
};
pub use domain::matcher::{create_crypto_sigs_from, PlatformSigsCreationResult};
pub use domain::order::{SigRequirements, SigningOrderResult};
pub use domain::platform_sig::{PlatformSignature, VerificationStatus};
pub use domain::rationalization::{
    Rationalization, RationalizedSpan, SpanAccessor, SpanSource,
};
pub use domain::sig_meta::RationalizedSigMeta;
pub use domain::span_cache::{CacheInsert, CachedSpan, SpanCache, SpanCacheStats};
pub use ports::inbound::SignatureExpansionApi;
pub use ports::outbound::{
    LedgerStateView, PlatformSigFactory, PubKeyToSigBytes, SuppliedSig, SyncVerifier,
    SystemTimeSource, TimeSource,
};
pub use service::ExpandHandleSpan;
