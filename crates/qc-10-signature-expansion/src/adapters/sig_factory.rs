//! Platform Signature Factory Adapter
//!
//! Every signature of a transaction covers the same bytes: the encoded body.

use crate::domain::platform_sig::PlatformSignature;
use crate::ports::outbound::PlatformSigFactory;
use shared_types::KeyType;
use std::sync::Arc;

/// Builds platform signatures over one transaction's body bytes.
#[derive(Clone, Debug)]
pub struct BodySigningFactory {
    body_bytes: Arc<[u8]>,
}

impl BodySigningFactory {
    pub fn new(body_bytes: Arc<[u8]>) -> Self {
        Self { body_bytes }
    }
}

impl PlatformSigFactory for BodySigningFactory {
    fn sign_appropriately(
        &self,
        key_type: KeyType,
        public_key: &[u8],
        signature: &[u8],
    ) -> PlatformSignature {
        PlatformSignature::new(key_type, public_key, signature, Arc::clone(&self.body_bytes))
    }
}
