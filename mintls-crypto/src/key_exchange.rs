//! Key exchange algorithms for TLS.

use crate::Result;
use zeroize::Zeroize;

/// Key exchange algorithms supported by MinTLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExchangeAlgorithm {
    /// X25519 (Curve25519 ECDHE)
    X25519,
    /// secp256r1 (P-256, NIST curve)
    Secp256r1,
}

impl KeyExchangeAlgorithm {
    /// Get the public key size in bytes for this algorithm.
    pub const fn public_key_size(self) -> usize {
        match self {
            KeyExchangeAlgorithm::X25519 => 32,
            KeyExchangeAlgorithm::Secp256r1 => 65, // Uncompressed point
        }
    }

    /// Get the shared secret size in bytes.
    pub const fn shared_secret_size(self) -> usize {
        32
    }

    /// Get the IANA TLS supported_groups codepoint.
    pub const fn iana_codepoint(self) -> u16 {
        match self {
            KeyExchangeAlgorithm::X25519 => 0x001D,
            KeyExchangeAlgorithm::Secp256r1 => 0x0017,
        }
    }

    /// Convert to wire format (u16).
    pub const fn to_u16(self) -> u16 {
        self.iana_codepoint()
    }

    /// Convert from wire format (u16).
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x001D => Some(KeyExchangeAlgorithm::X25519),
            0x0017 => Some(KeyExchangeAlgorithm::Secp256r1),
            _ => None,
        }
    }

    /// Get the algorithm name.
    pub const fn name(self) -> &'static str {
        match self {
            KeyExchangeAlgorithm::X25519 => "X25519",
            KeyExchangeAlgorithm::Secp256r1 => "secp256r1",
        }
    }
}

/// Private key for key exchange.
///
/// Wraps the private key material and ensures it's zeroized when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct PrivateKey {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"<redacted>")
            .finish()
    }
}

impl PrivateKey {
    /// Create a new private key from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the private key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Public key for key exchange.
#[derive(Debug, Clone)]
pub struct PublicKey {
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Create a new public key from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the public key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert to owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Shared secret from key exchange.
///
/// Wraps the shared secret and ensures it's zeroized when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("bytes", &"<redacted>")
            .finish()
    }
}

impl SharedSecret {
    /// Create a new shared secret from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the shared secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Key exchange trait.
///
/// Provides the ephemeral ECDHE exchange used by the handshake.
pub trait KeyExchange: Send + Sync {
    /// Generate an ephemeral key pair.
    ///
    /// The private key MUST be generated with a CSPRNG and is zeroized on
    /// drop.
    fn generate_keypair(&self) -> Result<(PrivateKey, PublicKey)>;

    /// Perform key exchange against the peer's public key bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidPublicKey` if the peer's public key is malformed
    /// - `KeyExchangeFailed` for other errors
    fn exchange(&self, private_key: &PrivateKey, peer_public_key: &[u8]) -> Result<SharedSecret>;

    /// Get the algorithm this key exchange implements.
    fn algorithm(&self) -> KeyExchangeAlgorithm;

    /// Get the expected public key size in bytes.
    fn public_key_size(&self) -> usize {
        self.algorithm().public_key_size()
    }
}
