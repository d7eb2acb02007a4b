//! TLS 1.2 cipher suite catalog and negotiation.

use mintls_crypto::{
    AeadAlgorithm, BlockCipherAlgorithm, HashAlgorithm, SignatureAlgorithm,
};

/// How the record layer protects fragments for a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherType {
    /// AEAD cipher (GCM, ChaCha20-Poly1305).
    Aead,
    /// CBC block cipher with HMAC (MAC-then-encrypt).
    Block,
}

/// Static geometry of a cipher suite's record protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherDescription {
    /// AEAD or BLOCK.
    pub cipher_type: CipherType,
    /// Encryption key length in bytes.
    pub key_len: usize,
    /// Full nonce/IV length in bytes (block size for BLOCK suites).
    pub iv_len: usize,
    /// Length of the IV portion taken from the key block (0 for BLOCK).
    pub fixed_iv_len: usize,
    /// Authentication tag length (0 for BLOCK).
    pub tag_len: usize,
    /// MAC key length (0 for AEAD).
    pub mac_key_len: usize,
}

impl CipherDescription {
    /// Length of the explicit per-record nonce carried on the wire.
    pub const fn explicit_nonce_len(&self) -> usize {
        match self.cipher_type {
            CipherType::Aead => self.iv_len - self.fixed_iv_len,
            CipherType::Block => self.iv_len,
        }
    }
}

/// TLS 1.2 cipher suites supported by MinTLS.
///
/// All suites are ECDHE; the variants differ in server signature algorithm
/// and record cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CipherSuite {
    /// TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256
    EcdheEcdsaAes128GcmSha256 = 0xC02B,
    /// TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384
    EcdheEcdsaAes256GcmSha384 = 0xC02C,
    /// TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256
    EcdheRsaAes128GcmSha256 = 0xC02F,
    /// TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384
    EcdheRsaAes256GcmSha384 = 0xC030,
    /// TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256
    EcdheEcdsaChaCha20Poly1305 = 0xCCA9,
    /// TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256
    EcdheRsaChaCha20Poly1305 = 0xCCA8,
    /// TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256
    EcdheEcdsaAes128CbcSha256 = 0xC023,
    /// TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384
    EcdheEcdsaAes256CbcSha384 = 0xC024,
    /// TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256
    EcdheRsaAes128CbcSha256 = 0xC027,
    /// TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384
    EcdheRsaAes256CbcSha384 = 0xC028,
}

impl CipherSuite {
    /// Convert to wire format.
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Convert from wire format.
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0xC02B => Some(CipherSuite::EcdheEcdsaAes128GcmSha256),
            0xC02C => Some(CipherSuite::EcdheEcdsaAes256GcmSha384),
            0xC02F => Some(CipherSuite::EcdheRsaAes128GcmSha256),
            0xC030 => Some(CipherSuite::EcdheRsaAes256GcmSha384),
            0xCCA9 => Some(CipherSuite::EcdheEcdsaChaCha20Poly1305),
            0xCCA8 => Some(CipherSuite::EcdheRsaChaCha20Poly1305),
            0xC023 => Some(CipherSuite::EcdheEcdsaAes128CbcSha256),
            0xC024 => Some(CipherSuite::EcdheEcdsaAes256CbcSha384),
            0xC027 => Some(CipherSuite::EcdheRsaAes128CbcSha256),
            0xC028 => Some(CipherSuite::EcdheRsaAes256CbcSha384),
            _ => None,
        }
    }

    /// Get the IANA name of this suite.
    pub const fn name(self) -> &'static str {
        match self {
            CipherSuite::EcdheEcdsaAes128GcmSha256 => "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256",
            CipherSuite::EcdheEcdsaAes256GcmSha384 => "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384",
            CipherSuite::EcdheRsaAes128GcmSha256 => "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
            CipherSuite::EcdheRsaAes256GcmSha384 => "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
            CipherSuite::EcdheEcdsaChaCha20Poly1305 => {
                "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256"
            },
            CipherSuite::EcdheRsaChaCha20Poly1305 => {
                "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256"
            },
            CipherSuite::EcdheEcdsaAes128CbcSha256 => "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256",
            CipherSuite::EcdheEcdsaAes256CbcSha384 => "TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384",
            CipherSuite::EcdheRsaAes128CbcSha256 => "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256",
            CipherSuite::EcdheRsaAes256CbcSha384 => "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384",
        }
    }

    /// Get the PRF / transcript hash algorithm for this suite.
    pub const fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            CipherSuite::EcdheEcdsaAes256GcmSha384
            | CipherSuite::EcdheRsaAes256GcmSha384
            | CipherSuite::EcdheEcdsaAes256CbcSha384
            | CipherSuite::EcdheRsaAes256CbcSha384 => HashAlgorithm::Sha384,
            _ => HashAlgorithm::Sha256,
        }
    }

    /// Get the server signature algorithm required by this suite.
    pub const fn signature_algorithm(self) -> SignatureAlgorithm {
        match self {
            CipherSuite::EcdheEcdsaAes128GcmSha256
            | CipherSuite::EcdheEcdsaAes256GcmSha384
            | CipherSuite::EcdheEcdsaChaCha20Poly1305
            | CipherSuite::EcdheEcdsaAes128CbcSha256
            | CipherSuite::EcdheEcdsaAes256CbcSha384 => {
                SignatureAlgorithm::EcdsaSecp256r1Sha256
            },
            _ => SignatureAlgorithm::RsaPkcs1Sha256,
        }
    }

    /// Get the AEAD algorithm, if this is an AEAD suite.
    pub const fn aead_algorithm(self) -> Option<AeadAlgorithm> {
        match self {
            CipherSuite::EcdheEcdsaAes128GcmSha256 | CipherSuite::EcdheRsaAes128GcmSha256 => {
                Some(AeadAlgorithm::Aes128Gcm)
            },
            CipherSuite::EcdheEcdsaAes256GcmSha384 | CipherSuite::EcdheRsaAes256GcmSha384 => {
                Some(AeadAlgorithm::Aes256Gcm)
            },
            CipherSuite::EcdheEcdsaChaCha20Poly1305 | CipherSuite::EcdheRsaChaCha20Poly1305 => {
                Some(AeadAlgorithm::ChaCha20Poly1305)
            },
            _ => None,
        }
    }

    /// Get the block cipher algorithm, if this is a BLOCK suite.
    pub const fn block_algorithm(self) -> Option<BlockCipherAlgorithm> {
        match self {
            CipherSuite::EcdheEcdsaAes128CbcSha256 | CipherSuite::EcdheRsaAes128CbcSha256 => {
                Some(BlockCipherAlgorithm::Aes128Cbc)
            },
            CipherSuite::EcdheEcdsaAes256CbcSha384 | CipherSuite::EcdheRsaAes256CbcSha384 => {
                Some(BlockCipherAlgorithm::Aes256Cbc)
            },
            _ => None,
        }
    }

    /// Get the record protection geometry for this suite.
    pub const fn description(self) -> CipherDescription {
        match self {
            CipherSuite::EcdheEcdsaAes128GcmSha256 | CipherSuite::EcdheRsaAes128GcmSha256 => {
                CipherDescription {
                    cipher_type: CipherType::Aead,
                    key_len: 16,
                    iv_len: 12,
                    fixed_iv_len: 4,
                    tag_len: 16,
                    mac_key_len: 0,
                }
            },
            CipherSuite::EcdheEcdsaAes256GcmSha384 | CipherSuite::EcdheRsaAes256GcmSha384 => {
                CipherDescription {
                    cipher_type: CipherType::Aead,
                    key_len: 32,
                    iv_len: 12,
                    fixed_iv_len: 4,
                    tag_len: 16,
                    mac_key_len: 0,
                }
            },
            CipherSuite::EcdheEcdsaChaCha20Poly1305 | CipherSuite::EcdheRsaChaCha20Poly1305 => {
                CipherDescription {
                    cipher_type: CipherType::Aead,
                    key_len: 32,
                    iv_len: 12,
                    fixed_iv_len: 12,
                    tag_len: 16,
                    mac_key_len: 0,
                }
            },
            CipherSuite::EcdheEcdsaAes128CbcSha256 | CipherSuite::EcdheRsaAes128CbcSha256 => {
                CipherDescription {
                    cipher_type: CipherType::Block,
                    key_len: 16,
                    iv_len: 16,
                    fixed_iv_len: 0,
                    tag_len: 0,
                    mac_key_len: 32,
                }
            },
            CipherSuite::EcdheEcdsaAes256CbcSha384 | CipherSuite::EcdheRsaAes256CbcSha384 => {
                CipherDescription {
                    cipher_type: CipherType::Block,
                    key_len: 32,
                    iv_len: 16,
                    fixed_iv_len: 0,
                    tag_len: 0,
                    mac_key_len: 48,
                }
            },
        }
    }

    /// Get the total key block length derived by the key schedule.
    pub const fn key_block_length(self) -> usize {
        let desc = self.description();
        2 * (desc.mac_key_len + desc.key_len + desc.fixed_iv_len)
    }
}

/// Default cipher suite list, in preference order.
pub fn default_cipher_suites() -> Vec<CipherSuite> {
    vec![
        CipherSuite::EcdheEcdsaAes128GcmSha256,
        CipherSuite::EcdheEcdsaChaCha20Poly1305,
        CipherSuite::EcdheEcdsaAes256GcmSha384,
        CipherSuite::EcdheRsaAes128GcmSha256,
        CipherSuite::EcdheRsaChaCha20Poly1305,
        CipherSuite::EcdheRsaAes256GcmSha384,
        CipherSuite::EcdheEcdsaAes128CbcSha256,
        CipherSuite::EcdheEcdsaAes256CbcSha384,
        CipherSuite::EcdheRsaAes128CbcSha256,
        CipherSuite::EcdheRsaAes256CbcSha384,
    ]
}

/// Select the first suite in the client's preference order that the server
/// also enables. Returns `None` when the lists don't intersect.
pub fn negotiate(client_offered: &[u16], server_enabled: &[CipherSuite]) -> Option<CipherSuite> {
    client_offered
        .iter()
        .filter_map(|&id| CipherSuite::from_u16(id))
        .find(|suite| server_enabled.contains(suite))
}
