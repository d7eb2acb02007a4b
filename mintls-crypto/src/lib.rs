//! # MinTLS Cryptographic Provider Interface
//!
//! This crate defines the cryptographic abstraction layer for MinTLS.
//! It provides trait-based interfaces that allow pluggable cryptographic
//! backends.
//!
//! ## Architecture
//!
//! ```text
//! CryptoProvider (main trait)
//! ├── Aead (AEAD ciphers: AES-GCM, ChaCha20-Poly1305)
//! ├── BlockCipher (raw CBC for MAC-then-encrypt record protection)
//! ├── Hash (SHA-256, SHA-384)
//! ├── Hmac (HMAC with various hash functions)
//! ├── Random (CSPRNG)
//! ├── KeyExchange (ECDHE)
//! └── Signature (ECDSA, RSA PKCS#1 v1.5)
//! ```
//!
//! Providers are checked out per algorithm: the caller asks for an instance
//! and receives a boxed trait object, so two connections never share mutable
//! state.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

pub mod aead;
pub mod block;
pub mod error;
pub mod hash;
pub mod hmac;
pub mod key_exchange;
pub mod random;
pub mod signature;

pub use aead::{Aead, AeadAlgorithm};
pub use block::{BlockCipher, BlockCipherAlgorithm};
pub use error::{Error, Result};
pub use hash::{Hash, HashAlgorithm};
pub use hmac::Hmac;
pub use key_exchange::{KeyExchange, KeyExchangeAlgorithm, PrivateKey, PublicKey, SharedSecret};
pub use random::Random;
pub use signature::{Signature, SignatureAlgorithm, SigningKey, VerifyingKey};

/// The main cryptographic provider trait.
///
/// Implementations of this trait provide all cryptographic operations
/// needed by MinTLS. The trait is object-safe so protocol code can hold a
/// `&dyn CryptoProvider` and remain backend-agnostic.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use in multi-threaded
/// environments.
pub trait CryptoProvider: Send + Sync + 'static {
    /// Get an AEAD cipher instance.
    ///
    /// Returns an error if the algorithm is not supported; the caller treats
    /// that as fatal.
    fn aead(&self, algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>>;

    /// Get a raw block cipher (CBC mode, no padding) instance.
    fn block_cipher(&self, algorithm: BlockCipherAlgorithm) -> Result<Box<dyn BlockCipher>>;

    /// Get a hash function instance.
    fn hash(&self, algorithm: HashAlgorithm) -> Result<Box<dyn Hash>>;

    /// Get an HMAC instance keyed with `key`.
    fn hmac(&self, algorithm: HashAlgorithm, key: &[u8]) -> Result<Box<dyn Hmac>>;

    /// Get the random number generator.
    fn random(&self) -> &dyn Random;

    /// Get a key exchange instance.
    fn key_exchange(&self, algorithm: KeyExchangeAlgorithm) -> Result<Box<dyn KeyExchange>>;

    /// Get a signature scheme instance.
    fn signature(&self, algorithm: SignatureAlgorithm) -> Result<Box<dyn Signature>>;

    /// Check if the provider supports a specific key exchange algorithm.
    fn supports_key_exchange(&self, algorithm: KeyExchangeAlgorithm) -> bool {
        self.key_exchange(algorithm).is_ok()
    }

    /// Check if the provider supports a specific signature algorithm.
    fn supports_signature(&self, algorithm: SignatureAlgorithm) -> bool {
        self.signature(algorithm).is_ok()
    }
}
