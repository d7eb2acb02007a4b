//! RustCrypto-backed provider for MinTLS.
//!
//! Implements the `mintls-crypto` traits on top of the pure-Rust RustCrypto
//! crates: `sha2`, `hmac`, `aes-gcm`, `chacha20poly1305`, `aes`/`cbc`,
//! `p256`, `x25519-dalek` and `rsa`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

mod aead;
mod block;
mod hash;
mod hmac;
mod key_exchange;
mod random;
mod signature;

use mintls_crypto::{
    Aead, AeadAlgorithm, BlockCipher, BlockCipherAlgorithm, CryptoProvider, Hash, HashAlgorithm,
    Hmac, KeyExchange, KeyExchangeAlgorithm, Random, Result, Signature, SignatureAlgorithm,
};

/// Crypto provider backed by the RustCrypto crates.
///
/// Stateless and cheap to construct; the protocol layer typically holds one
/// behind an `Arc<dyn CryptoProvider>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCryptoProvider {
    rng: random::OsRandom,
}

impl RustCryptoProvider {
    /// Create a new provider.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn aead(&self, algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>> {
        Ok(match algorithm {
            AeadAlgorithm::Aes128Gcm => Box::new(aead::Aes128GcmCipher),
            AeadAlgorithm::Aes256Gcm => Box::new(aead::Aes256GcmCipher),
            AeadAlgorithm::ChaCha20Poly1305 => Box::new(aead::ChaCha20Poly1305Cipher),
        })
    }

    fn block_cipher(&self, algorithm: BlockCipherAlgorithm) -> Result<Box<dyn BlockCipher>> {
        Ok(match algorithm {
            BlockCipherAlgorithm::Aes128Cbc => Box::new(block::Aes128CbcCipher),
            BlockCipherAlgorithm::Aes256Cbc => Box::new(block::Aes256CbcCipher),
        })
    }

    fn hash(&self, algorithm: HashAlgorithm) -> Result<Box<dyn Hash>> {
        Ok(match algorithm {
            HashAlgorithm::Sha256 => Box::new(hash::Sha256Hash::new()),
            HashAlgorithm::Sha384 => Box::new(hash::Sha384Hash::new()),
        })
    }

    fn hmac(&self, algorithm: HashAlgorithm, key: &[u8]) -> Result<Box<dyn Hmac>> {
        Ok(match algorithm {
            HashAlgorithm::Sha256 => Box::new(hmac::HmacSha256::new(key)?),
            HashAlgorithm::Sha384 => Box::new(hmac::HmacSha384::new(key)?),
        })
    }

    fn random(&self) -> &dyn Random {
        &self.rng
    }

    fn key_exchange(&self, algorithm: KeyExchangeAlgorithm) -> Result<Box<dyn KeyExchange>> {
        Ok(match algorithm {
            KeyExchangeAlgorithm::X25519 => Box::new(key_exchange::X25519Exchange),
            KeyExchangeAlgorithm::Secp256r1 => Box::new(key_exchange::P256Exchange),
        })
    }

    fn signature(&self, algorithm: SignatureAlgorithm) -> Result<Box<dyn Signature>> {
        Ok(match algorithm {
            SignatureAlgorithm::EcdsaSecp256r1Sha256 => Box::new(signature::EcdsaP256Sha256),
            SignatureAlgorithm::RsaPkcs1Sha256 => Box::new(signature::RsaPkcs1Sha256Scheme),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_dispenses_all_algorithms() {
        let provider = RustCryptoProvider::new();

        for alg in [
            AeadAlgorithm::Aes128Gcm,
            AeadAlgorithm::Aes256Gcm,
            AeadAlgorithm::ChaCha20Poly1305,
        ] {
            assert!(provider.aead(alg).is_ok());
        }
        for alg in [
            BlockCipherAlgorithm::Aes128Cbc,
            BlockCipherAlgorithm::Aes256Cbc,
        ] {
            assert!(provider.block_cipher(alg).is_ok());
        }
        for alg in [HashAlgorithm::Sha256, HashAlgorithm::Sha384] {
            assert!(provider.hash(alg).is_ok());
            assert!(provider.hmac(alg, b"key").is_ok());
        }
        assert!(provider.supports_key_exchange(KeyExchangeAlgorithm::X25519));
        assert!(provider.supports_key_exchange(KeyExchangeAlgorithm::Secp256r1));
        assert!(provider.supports_signature(SignatureAlgorithm::EcdsaSecp256r1Sha256));
    }

    #[test]
    fn random_generates_distinct_buffers() {
        let provider = RustCryptoProvider::new();
        let a = provider.random().generate(32).unwrap();
        let b = provider.random().generate(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
