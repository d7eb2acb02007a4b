//! HMAC via the `hmac` crate.

use hmac::{Hmac as HmacImpl, Mac};
use mintls_crypto::{Error, HashAlgorithm, Hmac, Result};
use sha2::{Sha256, Sha384};

/// HMAC-SHA-256 state.
pub(crate) struct HmacSha256 {
    inner: HmacImpl<Sha256>,
}

impl HmacSha256 {
    pub(crate) fn new(key: &[u8]) -> Result<Self> {
        let inner = <HmacImpl<Sha256> as Mac>::new_from_slice(key)
            .map_err(|_| Error::Internal("HMAC key setup failed".to_string()))?;
        Ok(Self { inner })
    }
}

impl Hmac for HmacSha256 {
    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.inner.finalize().into_bytes().to_vec()
    }

    fn output_size(&self) -> usize {
        32
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}

/// HMAC-SHA-384 state.
pub(crate) struct HmacSha384 {
    inner: HmacImpl<Sha384>,
}

impl HmacSha384 {
    pub(crate) fn new(key: &[u8]) -> Result<Self> {
        let inner = <HmacImpl<Sha384> as Mac>::new_from_slice(key)
            .map_err(|_| Error::Internal("HMAC key setup failed".to_string()))?;
        Ok(Self { inner })
    }
}

impl Hmac for HmacSha384 {
    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.inner.finalize().into_bytes().to_vec()
    }

    fn output_size(&self) -> usize {
        48
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha384
    }
}
