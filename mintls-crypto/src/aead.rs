//! AEAD (Authenticated Encryption with Associated Data) cipher interface.

use crate::Result;

/// AEAD cipher algorithms supported by MinTLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AeadAlgorithm {
    /// AES-128-GCM
    Aes128Gcm,
    /// AES-256-GCM
    Aes256Gcm,
    /// ChaCha20-Poly1305
    ChaCha20Poly1305,
}

impl AeadAlgorithm {
    /// Get the key size in bytes for this algorithm.
    pub const fn key_size(self) -> usize {
        match self {
            AeadAlgorithm::Aes128Gcm => 16,
            AeadAlgorithm::Aes256Gcm => 32,
            AeadAlgorithm::ChaCha20Poly1305 => 32,
        }
    }

    /// Get the nonce size in bytes for this algorithm.
    pub const fn nonce_size(self) -> usize {
        12
    }

    /// Get the authentication tag size in bytes for this algorithm.
    pub const fn tag_size(self) -> usize {
        16
    }

    /// Get the name of this algorithm as used in TLS.
    pub const fn name(self) -> &'static str {
        match self {
            AeadAlgorithm::Aes128Gcm => "AES_128_GCM",
            AeadAlgorithm::Aes256Gcm => "AES_256_GCM",
            AeadAlgorithm::ChaCha20Poly1305 => "CHACHA20_POLY1305",
        }
    }
}

/// AEAD cipher trait.
///
/// Instances are stateless; key and nonce are passed per call. The record
/// layer owns nonce construction and guarantees uniqueness via the sequence
/// number.
///
/// # Security Requirements
///
/// - Tag verification MUST be constant-time
/// - Nonces MUST NOT be reused with the same key
pub trait Aead: Send + Sync {
    /// Encrypt and authenticate plaintext.
    ///
    /// Returns ciphertext with the authentication tag appended.
    ///
    /// # Errors
    ///
    /// - `InvalidKeySize` / `InvalidNonceSize` if sizes don't match the algorithm
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt and verify ciphertext (tag appended).
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailed` if tag verification fails
    /// - `InvalidKeySize` / `InvalidNonceSize` if sizes don't match the algorithm
    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Get the algorithm this cipher implements.
    fn algorithm(&self) -> AeadAlgorithm;

    /// Get the key size in bytes.
    fn key_size(&self) -> usize {
        self.algorithm().key_size()
    }

    /// Get the nonce size in bytes.
    fn nonce_size(&self) -> usize {
        self.algorithm().nonce_size()
    }

    /// Get the authentication tag size in bytes.
    fn tag_size(&self) -> usize {
        self.algorithm().tag_size()
    }
}
