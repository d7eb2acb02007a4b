//! TLS 1.2 key schedule: pre-master through key block.

use crate::cipher_suites::CipherSuite;
use crate::error::{Error, Result};
use crate::prf::Prf;
use mintls_crypto::CryptoProvider;
use zeroize::Zeroizing;

/// One direction's slice of the key block.
pub struct DirectionKeys {
    /// MAC key (empty for AEAD suites).
    pub mac_key: Zeroizing<Vec<u8>>,
    /// Encryption key.
    pub key: Zeroizing<Vec<u8>>,
    /// Fixed IV portion (empty for BLOCK suites).
    pub fixed_iv: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for DirectionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionKeys")
            .field("mac_key", &"<redacted>")
            .field("key", &"<redacted>")
            .field("fixed_iv", &"<redacted>")
            .finish()
    }
}

/// Both directions' record keys.
#[derive(Debug)]
pub struct ConnectionKeys {
    /// Keys protecting client-to-server records.
    pub client: DirectionKeys,
    /// Keys protecting server-to-client records.
    pub server: DirectionKeys,
}

/// Secrets derived during one handshake.
///
/// All byte buffers zeroize on drop. The pre-master secret is consumed by
/// derivation and never stored.
pub struct SecretCollection {
    /// The 48-byte master secret.
    pub master_secret: Zeroizing<Vec<u8>>,
    /// Whether the extended master secret derivation was used.
    pub extended: bool,
    /// Record keys for both directions.
    pub keys: ConnectionKeys,
}

impl std::fmt::Debug for SecretCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCollection")
            .field("master_secret", &"<redacted>")
            .field("extended", &self.extended)
            .finish()
    }
}

impl SecretCollection {
    /// Run the full key schedule for a suite.
    ///
    /// When `session_hash` is present, the extended master secret derivation
    /// (RFC 7627) is used; otherwise the plain randoms-based one.
    pub fn derive(
        provider: &dyn CryptoProvider,
        suite: CipherSuite,
        pre_master: &[u8],
        client_random: &[u8; 32],
        server_random: &[u8; 32],
        session_hash: Option<&[u8]>,
    ) -> Result<Self> {
        let prf = Prf::new(provider, suite.hash_algorithm());

        let master_secret = Zeroizing::new(match session_hash {
            Some(hash) => prf.compute_extended_master_secret(pre_master, hash)?,
            None => prf.compute_master_secret(pre_master, client_random, server_random)?,
        });

        let key_block = Zeroizing::new(prf.compute_key_block(
            &master_secret,
            client_random,
            server_random,
            suite.key_block_length(),
        )?);
        let keys = split_key_block(suite, &key_block)?;

        Ok(Self {
            master_secret,
            extended: session_hash.is_some(),
            keys,
        })
    }
}

/// Slice a key block into per-direction keys.
///
/// Order per RFC 5246 section 6.3: client MAC, server MAC, client key,
/// server key, client IV, server IV. Zero-length sections are simply empty.
pub fn split_key_block(suite: CipherSuite, key_block: &[u8]) -> Result<ConnectionKeys> {
    let desc = suite.description();
    let expected = suite.key_block_length();
    if key_block.len() != expected {
        return Err(Error::InternalError(format!(
            "Key block must be {} bytes, got {}",
            expected,
            key_block.len()
        )));
    }

    let mut offset = 0;
    let mut take = |len: usize| {
        let slice = key_block[offset..offset + len].to_vec();
        offset += len;
        Zeroizing::new(slice)
    };

    let client_mac = take(desc.mac_key_len);
    let server_mac = take(desc.mac_key_len);
    let client_key = take(desc.key_len);
    let server_key = take(desc.key_len);
    let client_iv = take(desc.fixed_iv_len);
    let server_iv = take(desc.fixed_iv_len);

    Ok(ConnectionKeys {
        client: DirectionKeys {
            mac_key: client_mac,
            key: client_key,
            fixed_iv: client_iv,
        },
        server: DirectionKeys {
            mac_key: server_mac,
            key: server_key,
            fixed_iv: server_iv,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintls_crypto_rustcrypto::RustCryptoProvider;

    #[test]
    fn aead_key_block_slicing() {
        // 40 bytes for AES-128-GCM: 16 + 16 + 4 + 4
        let key_block: Vec<u8> = (0..40).collect();
        let keys =
            split_key_block(CipherSuite::EcdheEcdsaAes128GcmSha256, &key_block).unwrap();

        assert!(keys.client.mac_key.is_empty());
        assert!(keys.server.mac_key.is_empty());
        assert_eq!(&keys.client.key[..], &key_block[0..16]);
        assert_eq!(&keys.server.key[..], &key_block[16..32]);
        assert_eq!(&keys.client.fixed_iv[..], &key_block[32..36]);
        assert_eq!(&keys.server.fixed_iv[..], &key_block[36..40]);
    }

    #[test]
    fn block_key_block_slicing() {
        // 96 bytes for AES-128-CBC-SHA256: 32 + 32 + 16 + 16
        let key_block: Vec<u8> = (0..96).collect();
        let keys =
            split_key_block(CipherSuite::EcdheRsaAes128CbcSha256, &key_block).unwrap();

        assert_eq!(&keys.client.mac_key[..], &key_block[0..32]);
        assert_eq!(&keys.server.mac_key[..], &key_block[32..64]);
        assert_eq!(&keys.client.key[..], &key_block[64..80]);
        assert_eq!(&keys.server.key[..], &key_block[80..96]);
        assert!(keys.client.fixed_iv.is_empty());
        assert!(keys.server.fixed_iv.is_empty());
    }

    #[test]
    fn rejects_wrong_key_block_length() {
        assert!(split_key_block(CipherSuite::EcdheEcdsaAes128GcmSha256, &[0u8; 39]).is_err());
    }

    #[test]
    fn derivation_is_deterministic_and_ems_sensitive() {
        let provider = RustCryptoProvider::new();
        let suite = CipherSuite::EcdheEcdsaAes128GcmSha256;
        let pre_master = [7u8; 32];
        let client_random = [1u8; 32];
        let server_random = [2u8; 32];

        let a = SecretCollection::derive(
            &provider,
            suite,
            &pre_master,
            &client_random,
            &server_random,
            None,
        )
        .unwrap();
        let b = SecretCollection::derive(
            &provider,
            suite,
            &pre_master,
            &client_random,
            &server_random,
            None,
        )
        .unwrap();
        assert_eq!(a.master_secret, b.master_secret);
        assert_eq!(a.keys.client.key, b.keys.client.key);

        let extended = SecretCollection::derive(
            &provider,
            suite,
            &pre_master,
            &client_random,
            &server_random,
            Some(&[9u8; 32]),
        )
        .unwrap();
        assert!(extended.extended);
        assert_ne!(a.master_secret, extended.master_secret);
        assert_ne!(a.keys.client.key, extended.keys.client.key);
    }

    #[test]
    fn extended_master_secret_binds_session_hash_not_randoms() {
        let provider = RustCryptoProvider::new();
        let suite = CipherSuite::EcdheEcdsaAes128GcmSha256;
        let pre_master = [7u8; 32];
        let session_hash = [9u8; 32];

        let a = SecretCollection::derive(
            &provider,
            suite,
            &pre_master,
            &[1u8; 32],
            &[2u8; 32],
            Some(&session_hash),
        )
        .unwrap();
        // different randoms, same session hash: master secret is unchanged
        let b = SecretCollection::derive(
            &provider,
            suite,
            &pre_master,
            &[3u8; 32],
            &[4u8; 32],
            Some(&session_hash),
        )
        .unwrap();
        assert_eq!(a.master_secret, b.master_secret);
        // the key block still follows the randoms
        assert_ne!(a.keys.client.key, b.keys.client.key);

        // same randoms, different session hash: master secret moves
        let mut tampered_hash = session_hash;
        tampered_hash[0] ^= 0x01;
        let c = SecretCollection::derive(
            &provider,
            suite,
            &pre_master,
            &[1u8; 32],
            &[2u8; 32],
            Some(&tampered_hash),
        )
        .unwrap();
        assert_ne!(a.master_secret, c.master_secret);
    }

    #[test]
    fn client_and_server_directions_differ() {
        let provider = RustCryptoProvider::new();
        let secrets = SecretCollection::derive(
            &provider,
            CipherSuite::EcdheEcdsaAes256GcmSha384,
            &[3u8; 32],
            &[4u8; 32],
            &[5u8; 32],
            None,
        )
        .unwrap();
        assert_ne!(secrets.keys.client.key, secrets.keys.server.key);
        assert_ne!(secrets.keys.client.fixed_iv, secrets.keys.server.fixed_iv);
    }
}
