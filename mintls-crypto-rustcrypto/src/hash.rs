//! SHA-2 hash functions via the `sha2` crate.

use mintls_crypto::{Hash, HashAlgorithm};
use sha2::{Digest, Sha256, Sha384};

/// SHA-256 hash state.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sha256Hash {
    inner: Sha256,
}

impl Sha256Hash {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Hash for Sha256Hash {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.inner.finalize().to_vec()
    }

    fn clone_box(&self) -> Box<dyn Hash> {
        Box::new(self.clone())
    }

    fn output_size(&self) -> usize {
        32
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}

/// SHA-384 hash state.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sha384Hash {
    inner: Sha384,
}

impl Sha384Hash {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Hash for Sha384Hash {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.inner.finalize().to_vec()
    }

    fn clone_box(&self) -> Box<dyn Hash> {
        Box::new(self.clone())
    }

    fn output_size(&self) -> usize {
        48
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha384
    }
}
