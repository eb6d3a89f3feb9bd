//! # Rationalized Signature Metadata
//!
//! Terminal output of one expansion, in one of three shapes:
//!
//! | Shape | Payer key | Other-party keys | Signatures |
//! |-------|-----------|------------------|------------|
//! | `none_available` | - | - | - |
//! | `for_payer_only` | yes | - | payer pass |
//! | `for_payer_and_others` | yes | yes | both passes + sweep |
//!
//! Downstream handlers treat it as read-only.

use super::errors::SigMetaError;
use super::platform_sig::PlatformSignature;
use shared_types::Key;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalizedSigMeta {
    payer_key: Option<Key>,
    others_req_sigs: Option<Vec<Key>>,
    rationalized_sigs: Option<Vec<PlatformSignature>>,
    /// Public keys whose signatures must be treated as absent.
    revoked: BTreeSet<Vec<u8>>,
}

impl RationalizedSigMeta {
    pub fn none_available() -> Self {
        Self {
            payer_key: None,
            others_req_sigs: None,
            rationalized_sigs: None,
            revoked: BTreeSet::new(),
        }
    }

    pub fn for_payer_only(payer_key: Key, sigs: Vec<PlatformSignature>) -> Self {
        Self {
            payer_key: Some(payer_key),
            rationalized_sigs: Some(sigs),
            ..Self::none_available()
        }
    }

    pub fn for_payer_and_others(
        payer_key: Key,
        others_req_sigs: Vec<Key>,
        sigs: Vec<PlatformSignature>,
    ) -> Self {
        Self {
            payer_key: Some(payer_key),
            others_req_sigs: Some(others_req_sigs),
            rationalized_sigs: Some(sigs),
            revoked: BTreeSet::new(),
        }
    }

    pub fn could_rationalize_payer(&self) -> bool {
        self.payer_key.is_some()
    }

    pub fn could_rationalize_others(&self) -> bool {
        self.others_req_sigs.is_some()
    }

    pub fn payer_key(&self) -> Result<&Key, SigMetaError> {
        self.payer_key.as_ref().ok_or(SigMetaError::PayerUnavailable)
    }

    pub fn others_req_sigs(&self) -> Result<&[Key], SigMetaError> {
        self.others_req_sigs
            .as_deref()
            .ok_or(SigMetaError::OthersUnavailable)
    }

    pub fn verified_sigs(&self) -> Result<&[PlatformSignature], SigMetaError> {
        self.rationalized_sigs
            .as_deref()
            .ok_or(SigMetaError::SigsUnavailable)
    }

    /// The valid signature made by `public_key`, unless revoked.
    pub fn pk_to_verified_sig(&self, public_key: &[u8]) -> Option<&PlatformSignature> {
        if self.revoked.contains(public_key) {
            return None;
        }
        self.rationalized_sigs
            .as_deref()?
            .iter()
            .find(|sig| sig.public_key == public_key && sig.is_valid())
    }

    /// Copy in which every primitive key of `key` counts as unsigned.
    pub fn revoking_crypto_sigs_from(&self, key: &Key) -> Self {
        let mut revoked = self.clone();
        key.visit_primitive_keys(&mut |_, public_key| {
            revoked.revoked.insert(public_key.to_vec());
        });
        revoked
    }

    pub(crate) fn sigs_mut(&mut self) -> Option<&mut Vec<PlatformSignature>> {
        self.rationalized_sigs.as_mut()
    }
}
