//! Raw block cipher (CBC mode) interface.
//!
//! Used by the MAC-then-encrypt record protection. Padding is a protocol
//! concern, so the cipher operates on whole blocks only.

use crate::Result;

/// CBC block cipher algorithms supported by MinTLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockCipherAlgorithm {
    /// AES-128 in CBC mode
    Aes128Cbc,
    /// AES-256 in CBC mode
    Aes256Cbc,
}

impl BlockCipherAlgorithm {
    /// Get the key size in bytes for this algorithm.
    pub const fn key_size(self) -> usize {
        match self {
            BlockCipherAlgorithm::Aes128Cbc => 16,
            BlockCipherAlgorithm::Aes256Cbc => 32,
        }
    }

    /// Get the block size (and IV size) in bytes.
    pub const fn block_size(self) -> usize {
        16
    }

    /// Get the name of this algorithm as used in TLS.
    pub const fn name(self) -> &'static str {
        match self {
            BlockCipherAlgorithm::Aes128Cbc => "AES_128_CBC",
            BlockCipherAlgorithm::Aes256Cbc => "AES_256_CBC",
        }
    }
}

/// Raw CBC block cipher trait.
///
/// Input length must be a multiple of the block size; implementations apply
/// no padding of their own.
pub trait BlockCipher: Send + Sync {
    /// Encrypt whole blocks in CBC mode.
    ///
    /// # Errors
    ///
    /// - `InvalidKeySize` if the key doesn't match the algorithm
    /// - `InvalidLength` if `data` is empty or not block-aligned, or the IV
    ///   is not one block
    fn encrypt(&self, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt whole blocks in CBC mode.
    ///
    /// # Errors
    ///
    /// Same conditions as [`BlockCipher::encrypt`].
    fn decrypt(&self, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>>;

    /// Get the algorithm this cipher implements.
    fn algorithm(&self) -> BlockCipherAlgorithm;

    /// Get the key size in bytes.
    fn key_size(&self) -> usize {
        self.algorithm().key_size()
    }

    /// Get the block size in bytes.
    fn block_size(&self) -> usize {
        self.algorithm().block_size()
    }
}
