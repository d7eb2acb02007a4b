//! Per-direction record protection: sequence numbering plus AEAD or
//! MAC-then-encrypt transforms.

use crate::cipher_suites::{CipherSuite, CipherType};
use crate::error::{Error, Result};
use crate::key_schedule::DirectionKeys;
use crate::protocol::{ContentType, ProtocolVersion};
use mintls_crypto::{Aead, BlockCipher, CryptoProvider, HashAlgorithm};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Per-direction 64-bit record sequence number.
///
/// Starts at zero when protection is installed, increments by exactly one
/// per record, and never wraps: hitting the ceiling is a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Authenticator {
    sequence_number: u64,
}

impl Authenticator {
    /// Create an authenticator at sequence zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sequence number the next record will use.
    pub fn current(&self) -> u64 {
        self.sequence_number
    }

    /// Advance past the current record.
    pub fn advance(&mut self) -> Result<()> {
        self.sequence_number = self
            .sequence_number
            .checked_add(1)
            .ok_or(Error::SequenceOverflow)?;
        Ok(())
    }

    /// Build the 13-byte pseudo-header authenticated with each record:
    /// sequence (8) || type (1) || version (2) || fragment length (2).
    pub fn pseudo_header(
        sequence: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        fragment_len: usize,
    ) -> [u8; 13] {
        let mut header = [0u8; 13];
        header[..8].copy_from_slice(&sequence.to_be_bytes());
        header[8] = content_type.to_u8();
        header[9..11].copy_from_slice(&version.to_u16().to_be_bytes());
        header[11..13].copy_from_slice(&(fragment_len as u16).to_be_bytes());
        header
    }
}

/// The cipher machinery for one direction.
enum CipherBox {
    Aead {
        aead: Box<dyn Aead>,
        key: Zeroizing<Vec<u8>>,
        fixed_iv: Zeroizing<Vec<u8>>,
    },
    Block {
        cipher: Box<dyn BlockCipher>,
        key: Zeroizing<Vec<u8>>,
        mac_key: Zeroizing<Vec<u8>>,
        mac_algorithm: HashAlgorithm,
    },
}

impl std::fmt::Debug for CipherBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CipherBox::Aead { .. } => f.write_str("CipherBox::Aead"),
            CipherBox::Block { .. } => f.write_str("CipherBox::Block"),
        }
    }
}

/// Record protection for one direction of one connection.
pub struct RecordProtection {
    provider: Arc<dyn CryptoProvider>,
    suite: CipherSuite,
    cipher: CipherBox,
    authenticator: Authenticator,
}

impl std::fmt::Debug for RecordProtection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordProtection")
            .field("suite", &self.suite)
            .field("cipher", &self.cipher)
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

impl RecordProtection {
    /// Install protection for one direction from its key-block slice.
    pub fn new(
        provider: Arc<dyn CryptoProvider>,
        suite: CipherSuite,
        keys: &DirectionKeys,
    ) -> Result<Self> {
        let desc = suite.description();
        let cipher = match desc.cipher_type {
            CipherType::Aead => {
                let algorithm = suite.aead_algorithm().ok_or_else(|| {
                    Error::InternalError("AEAD suite without AEAD algorithm".into())
                })?;
                CipherBox::Aead {
                    aead: provider.aead(algorithm)?,
                    key: keys.key.clone(),
                    fixed_iv: keys.fixed_iv.clone(),
                }
            },
            CipherType::Block => {
                let algorithm = suite.block_algorithm().ok_or_else(|| {
                    Error::InternalError("BLOCK suite without block algorithm".into())
                })?;
                CipherBox::Block {
                    cipher: provider.block_cipher(algorithm)?,
                    key: keys.key.clone(),
                    mac_key: keys.mac_key.clone(),
                    mac_algorithm: suite.hash_algorithm(),
                }
            },
        };

        Ok(Self {
            provider,
            suite,
            cipher,
            authenticator: Authenticator::new(),
        })
    }

    /// The negotiated suite this protection serves.
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Sequence number of the next record.
    pub fn sequence_number(&self) -> u64 {
        self.authenticator.current()
    }

    /// Protect one fragment, producing the record payload.
    pub fn encrypt(
        &mut self,
        content_type: ContentType,
        version: ProtocolVersion,
        fragment: &[u8],
    ) -> Result<Vec<u8>> {
        let sequence = self.authenticator.current();
        let payload = match &self.cipher {
            CipherBox::Aead {
                aead,
                key,
                fixed_iv,
            } => {
                let aad =
                    Authenticator::pseudo_header(sequence, content_type, version, fragment.len());
                let desc = self.suite.description();
                let (nonce, explicit) = build_nonce(fixed_iv, desc.explicit_nonce_len(), sequence);

                let mut payload = explicit;
                payload.extend_from_slice(&aead.seal(key, &nonce, &aad, fragment)?);
                payload
            },
            CipherBox::Block {
                cipher,
                key,
                mac_key,
                mac_algorithm,
            } => {
                let mut mac = self.provider.hmac(*mac_algorithm, mac_key)?;
                mac.update(&Authenticator::pseudo_header(
                    sequence,
                    content_type,
                    version,
                    fragment.len(),
                ));
                mac.update(fragment);
                let tag = mac.finalize();

                let block = cipher.block_size();
                let mut plaintext = Vec::with_capacity(fragment.len() + tag.len() + block);
                plaintext.extend_from_slice(fragment);
                plaintext.extend_from_slice(&tag);
                let pad = (block - (plaintext.len() + 1) % block) % block;
                plaintext.resize(plaintext.len() + pad + 1, pad as u8);

                let iv = self.provider.random().generate(block)?;
                let mut payload = iv.clone();
                payload.extend_from_slice(&cipher.encrypt(key, &iv, &plaintext)?);
                payload
            },
        };
        self.authenticator.advance()?;
        Ok(payload)
    }

    /// Unprotect one record payload, returning the plaintext fragment.
    ///
    /// All padding, MAC, and tag defects collapse into
    /// [`Error::DecryptionFailed`].
    pub fn decrypt(
        &mut self,
        content_type: ContentType,
        version: ProtocolVersion,
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        let sequence = self.authenticator.current();
        let fragment = match &self.cipher {
            CipherBox::Aead {
                aead,
                key,
                fixed_iv,
            } => {
                let desc = self.suite.description();
                let explicit_len = desc.explicit_nonce_len();
                if payload.len() < explicit_len + desc.tag_len {
                    return Err(Error::DecryptionFailed);
                }

                let nonce = if explicit_len == 0 {
                    // ChaCha20-Poly1305: fixed IV XOR padded sequence
                    build_nonce(fixed_iv, 0, sequence).0
                } else {
                    let mut nonce = fixed_iv.to_vec();
                    nonce.extend_from_slice(&payload[..explicit_len]);
                    nonce
                };

                let fragment_len = payload.len() - explicit_len - desc.tag_len;
                let aad =
                    Authenticator::pseudo_header(sequence, content_type, version, fragment_len);
                aead.open(key, &nonce, &aad, &payload[explicit_len..])
                    .map_err(|_| Error::DecryptionFailed)?
            },
            CipherBox::Block {
                cipher,
                key,
                mac_key,
                mac_algorithm,
            } => {
                let block = cipher.block_size();
                let mac_len = mac_algorithm.output_size();
                if payload.len() < block * 2 || (payload.len() - block) % block != 0 {
                    return Err(Error::DecryptionFailed);
                }
                let (iv, ciphertext) = payload.split_at(block);
                let plaintext = cipher
                    .decrypt(key, iv, ciphertext)
                    .map_err(|_| Error::DecryptionFailed)?;

                // Padding: value p followed by p copies of itself.
                let pad = *plaintext.last().ok_or(Error::DecryptionFailed)? as usize;
                if plaintext.len() < pad + 1 + mac_len {
                    return Err(Error::DecryptionFailed);
                }
                let content_end = plaintext.len() - pad - 1;
                let mut pad_ok = 1u8;
                for &b in &plaintext[content_end..] {
                    pad_ok &= u8::from(b == pad as u8);
                }
                if pad_ok == 0 {
                    return Err(Error::DecryptionFailed);
                }

                let fragment_end = content_end - mac_len;
                let (fragment, tag) = plaintext[..content_end].split_at(fragment_end);

                let mut mac = self.provider.hmac(*mac_algorithm, mac_key)?;
                mac.update(&Authenticator::pseudo_header(
                    sequence,
                    content_type,
                    version,
                    fragment.len(),
                ));
                mac.update(fragment);
                if !mac.verify(tag) {
                    return Err(Error::DecryptionFailed);
                }
                fragment.to_vec()
            },
        };
        self.authenticator.advance()?;
        Ok(fragment)
    }
}

/// Build the AEAD nonce and the explicit portion carried on the wire.
///
/// GCM suites concatenate the 4-byte fixed IV with the 8-byte sequence
/// number (which is also the explicit nonce). ChaCha20-Poly1305 XORs the
/// left-padded sequence into the 12-byte fixed IV and sends nothing.
fn build_nonce(fixed_iv: &[u8], explicit_len: usize, sequence: u64) -> (Vec<u8>, Vec<u8>) {
    let seq_bytes = sequence.to_be_bytes();
    if explicit_len == 0 {
        let mut nonce = fixed_iv.to_vec();
        for (i, b) in seq_bytes.iter().enumerate() {
            nonce[4 + i] ^= b;
        }
        (nonce, Vec::new())
    } else {
        let mut nonce = fixed_iv.to_vec();
        nonce.extend_from_slice(&seq_bytes);
        (nonce, seq_bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_schedule::split_key_block;
    use mintls_crypto_rustcrypto::RustCryptoProvider;

    fn protections(suite: CipherSuite) -> (RecordProtection, RecordProtection) {
        let provider: Arc<dyn CryptoProvider> = Arc::new(RustCryptoProvider::new());
        let key_block: Vec<u8> = (0..suite.key_block_length() as u32)
            .map(|i| (i * 7 + 3) as u8)
            .collect();
        let keys = split_key_block(suite, &key_block).unwrap();
        let writer = RecordProtection::new(provider.clone(), suite, &keys.client).unwrap();
        let reader = RecordProtection::new(provider, suite, &keys.client).unwrap();
        (writer, reader)
    }

    #[test]
    fn pseudo_header_layout() {
        let header = Authenticator::pseudo_header(
            0x0102030405060708,
            ContentType::ApplicationData,
            ProtocolVersion::Tls12,
            0x1234,
        );
        assert_eq!(
            header,
            [1, 2, 3, 4, 5, 6, 7, 8, 23, 0x03, 0x03, 0x12, 0x34]
        );
    }

    #[test]
    fn authenticator_never_wraps() {
        let mut auth = Authenticator {
            sequence_number: u64::MAX,
        };
        assert_eq!(auth.advance(), Err(Error::SequenceOverflow));
    }

    #[test]
    fn aead_round_trip_and_sequence_monotonicity() {
        let (mut writer, mut reader) = protections(CipherSuite::EcdheEcdsaAes128GcmSha256);

        for i in 0..5u64 {
            assert_eq!(writer.sequence_number(), i);
            let payload = writer
                .encrypt(
                    ContentType::ApplicationData,
                    ProtocolVersion::Tls12,
                    b"hello record",
                )
                .unwrap();
            // explicit nonce is the sequence number
            assert_eq!(&payload[..8], &i.to_be_bytes());

            let plain = reader
                .decrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, &payload)
                .unwrap();
            assert_eq!(plain, b"hello record");
        }
        assert_eq!(writer.sequence_number(), 5);
    }

    #[test]
    fn chacha_payload_has_no_explicit_nonce() {
        let (mut writer, mut reader) = protections(CipherSuite::EcdheEcdsaChaCha20Poly1305);

        let payload = writer
            .encrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, b"ping")
            .unwrap();
        assert_eq!(payload.len(), 4 + 16); // fragment + tag only

        let plain = reader
            .decrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, &payload)
            .unwrap();
        assert_eq!(plain, b"ping");
    }

    #[test]
    fn aead_tamper_is_detected() {
        let (mut writer, mut reader) = protections(CipherSuite::EcdheRsaAes256GcmSha384);

        let mut payload = writer
            .encrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, b"data")
            .unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        assert_eq!(
            reader.decrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, &payload),
            Err(Error::DecryptionFailed)
        );
    }

    #[test]
    fn sequence_mismatch_is_detected() {
        let (mut writer, mut reader) = protections(CipherSuite::EcdheEcdsaAes128GcmSha256);

        // writer at seq 0 and 1; reader consumes only the second record, so
        // its sequence expectation (0) disagrees with the record's AAD.
        let _ = writer
            .encrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, b"a")
            .unwrap();
        let second = writer
            .encrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, b"b")
            .unwrap();
        assert_eq!(
            reader.decrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, &second),
            Err(Error::DecryptionFailed)
        );
    }

    #[test]
    fn block_round_trip() {
        let (mut writer, mut reader) = protections(CipherSuite::EcdheEcdsaAes128CbcSha256);

        let payload = writer
            .encrypt(ContentType::Handshake, ProtocolVersion::Tls12, b"finished msg")
            .unwrap();
        // explicit IV + at least one ciphertext block
        assert!(payload.len() >= 32);
        assert_eq!((payload.len() - 16) % 16, 0);

        let plain = reader
            .decrypt(ContentType::Handshake, ProtocolVersion::Tls12, &payload)
            .unwrap();
        assert_eq!(plain, b"finished msg");
    }

    #[test]
    fn block_records_are_randomized_per_record() {
        let (mut writer, _) = protections(CipherSuite::EcdheRsaAes256CbcSha384);

        let a = writer
            .encrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, b"same")
            .unwrap();
        let b = writer
            .encrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, b"same")
            .unwrap();
        // fresh random IV per record
        assert_ne!(a[..16], b[..16]);
    }

    #[test]
    fn block_tamper_reports_generic_failure() {
        let (mut writer, _) = protections(CipherSuite::EcdheEcdsaAes256CbcSha384);
        let payload = writer
            .encrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, b"secret")
            .unwrap();

        // Flip a bit anywhere: ciphertext body, the IV, and the final
        // (padding) block must all produce the same opaque error.
        for index in [0usize, 16, payload.len() - 1] {
            let (_, mut reader) = protections(CipherSuite::EcdheEcdsaAes256CbcSha384);
            let mut tampered = payload.clone();
            tampered[index] ^= 0x40;
            assert_eq!(
                reader.decrypt(
                    ContentType::ApplicationData,
                    ProtocolVersion::Tls12,
                    &tampered
                ),
                Err(Error::DecryptionFailed)
            );
        }
    }

    #[test]
    fn truncated_payload_fails_closed() {
        let (_, mut reader) = protections(CipherSuite::EcdheEcdsaAes128GcmSha256);
        assert_eq!(
            reader.decrypt(ContentType::ApplicationData, ProtocolVersion::Tls12, &[0u8; 7]),
            Err(Error::DecryptionFailed)
        );
    }
}
