//! Signature Map Adapter
//!
//! Implements `PubKeyToSigBytes` over the signature map carried by a
//! transaction. Keeps one `used` flag per supplied signature.

use crate::domain::errors::SigMatchError;
use crate::ports::outbound::{PubKeyToSigBytes, SuppliedSig};
use shared_types::{KeyType, SignatureMap, SignaturePair};

/// Prefix-matching view of one transaction's signature map.
#[derive(Clone, Debug)]
pub struct SigMapPubKeyToSigBytes {
    pairs: Vec<SignaturePair>,
    used: Vec<bool>,
}

impl SigMapPubKeyToSigBytes {
    pub fn new(sig_map: &SignatureMap) -> Self {
        Self {
            pairs: sig_map.sig_pairs.clone(),
            used: vec![false; sig_map.sig_pairs.len()],
        }
    }

    pub fn unused_count(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }

    /// Index of the pair whose prefix identifies `public_key`.
    ///
    /// An exact full-prefix match wins. Otherwise every partial prefix of the
    /// key is a candidate and they must all carry the same signature bytes;
    /// the longest one is chosen.
    fn matching_index(
        &self,
        key_type: KeyType,
        public_key: &[u8],
    ) -> Result<Option<usize>, SigMatchError> {
        let same_type = || {
            self.pairs
                .iter()
                .enumerate()
                .filter(move |(_, pair)| pair.key_type() == key_type)
        };

        if let Some((index, _)) =
            same_type().find(|(_, pair)| pair.has_full_prefix() && pair.pub_key_prefix == public_key)
        {
            return Ok(Some(index));
        }

        let mut chosen: Option<(usize, &SignaturePair)> = None;
        for (index, pair) in same_type() {
            if pair.has_full_prefix() || !public_key.starts_with(&pair.pub_key_prefix) {
                continue;
            }
            match chosen {
                Some((_, seen)) if seen.signature != pair.signature => {
                    return Err(SigMatchError::KeyPrefixMismatch {
                        public_key: public_key.to_vec(),
                    });
                }
                Some((_, seen)) if seen.pub_key_prefix.len() >= pair.pub_key_prefix.len() => {}
                _ => chosen = Some((index, pair)),
            }
        }
        Ok(chosen.map(|(index, _)| index))
    }
}

impl PubKeyToSigBytes for SigMapPubKeyToSigBytes {
    fn sig_bytes_for(
        &self,
        key_type: KeyType,
        public_key: &[u8],
    ) -> Result<Option<SuppliedSig>, SigMatchError> {
        Ok(self
            .matching_index(key_type, public_key)?
            .map(|index| SuppliedSig {
                index,
                bytes: self.pairs[index].signature.as_bytes().to_vec(),
            }))
    }

    fn mark_used(&mut self, index: usize) -> bool {
        match self.used.get_mut(index) {
            Some(used) if !*used => {
                *used = true;
                true
            }
            _ => false,
        }
    }

    fn has_at_least_one_unused_sig_with_full_prefix(&self) -> bool {
        self.pairs
            .iter()
            .zip(&self.used)
            .any(|(pair, used)| !*used && pair.has_full_prefix())
    }

    fn for_each_unused_sig_with_full_prefix(
        &mut self,
        visitor: &mut dyn FnMut(KeyType, &[u8], &[u8]),
    ) {
        for (pair, used) in self.pairs.iter().zip(self.used.iter_mut()) {
            if *used || !pair.has_full_prefix() {
                continue;
            }
            *used = true;
            visitor(pair.key_type(), &pair.pub_key_prefix, pair.signature.as_bytes());
        }
    }

    fn reset_all_sigs_to_unused(&mut self) {
        self.used.iter_mut().for_each(|used| *used = false);
    }
}
