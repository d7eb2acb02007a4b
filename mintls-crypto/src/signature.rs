//! Digital signature algorithms for TLS.

use crate::Result;
use zeroize::Zeroize;

/// Signature algorithms supported by MinTLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// ECDSA with P-256 and SHA-256
    EcdsaSecp256r1Sha256,
    /// RSA PKCS#1 v1.5 with SHA-256
    RsaPkcs1Sha256,
}

impl SignatureAlgorithm {
    /// Get the IANA TLS SignatureScheme codepoint.
    pub const fn iana_codepoint(self) -> u16 {
        match self {
            SignatureAlgorithm::EcdsaSecp256r1Sha256 => 0x0403,
            SignatureAlgorithm::RsaPkcs1Sha256 => 0x0401,
        }
    }

    /// Convert to wire format (u16).
    pub const fn to_u16(self) -> u16 {
        self.iana_codepoint()
    }

    /// Convert from wire format (u16).
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0403 => Some(SignatureAlgorithm::EcdsaSecp256r1Sha256),
            0x0401 => Some(SignatureAlgorithm::RsaPkcs1Sha256),
            _ => None,
        }
    }

    /// Get the algorithm name.
    pub const fn name(self) -> &'static str {
        match self {
            SignatureAlgorithm::EcdsaSecp256r1Sha256 => "ecdsa_secp256r1_sha256",
            SignatureAlgorithm::RsaPkcs1Sha256 => "rsa_pkcs1_sha256",
        }
    }
}

/// Signing key material.
///
/// For ECDSA this is the raw P-256 scalar; for RSA a PKCS#1 DER private key.
/// Zeroized when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("bytes", &"<redacted>")
            .finish()
    }
}

impl SigningKey {
    /// Create a new signing key from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Verifying (public) key material.
///
/// For ECDSA this is an uncompressed SEC1 point; for RSA a PKCS#1 DER public
/// key. Both match the SubjectPublicKeyInfo BIT STRING contents of the
/// corresponding certificate.
#[derive(Debug, Clone)]
pub struct VerifyingKey {
    bytes: Vec<u8>,
}

impl VerifyingKey {
    /// Create a new verifying key from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Signature scheme trait.
///
/// `sign` and `verify` take the raw message; hashing is internal to the
/// scheme. ECDSA signatures are DER-encoded.
pub trait Signature: Send + Sync {
    /// Sign a message.
    fn sign(&self, key: &SigningKey, message: &[u8]) -> Result<Vec<u8>>;

    /// Verify a signature over a message.
    ///
    /// # Errors
    ///
    /// - `SignatureVerificationFailed` if the signature doesn't verify
    /// - `InvalidSignature` / `InvalidPublicKey` on malformed inputs
    fn verify(&self, key: &VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()>;

    /// Generate a fresh key pair for this scheme.
    fn generate_keypair(&self) -> Result<(SigningKey, VerifyingKey)>;

    /// Get the algorithm this scheme implements.
    fn algorithm(&self) -> SignatureAlgorithm;
}
