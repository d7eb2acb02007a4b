//! TLS 1.2 pseudo-random function (RFC 5246 section 5).
//!
//! `PRF(secret, label, seed) = P_hash(secret, label + seed)` where P_hash
//! chains `A(i) = HMAC(secret, A(i-1))` and concatenates
//! `HMAC(secret, A(i) + label + seed)` until enough output is produced.

use crate::error::{Error, Result};
use mintls_crypto::{CryptoProvider, HashAlgorithm};

/// Length of the master secret in bytes.
pub const MASTER_SECRET_LENGTH: usize = 48;

/// TLS 1.2 PRF bound to a provider and hash algorithm.
pub struct Prf<'a> {
    provider: &'a dyn CryptoProvider,
    hash_algorithm: HashAlgorithm,
}

impl std::fmt::Debug for Prf<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prf")
            .field("hash_algorithm", &self.hash_algorithm)
            .finish()
    }
}

impl<'a> Prf<'a> {
    /// Create a PRF for the given hash algorithm.
    pub fn new(provider: &'a dyn CryptoProvider, hash_algorithm: HashAlgorithm) -> Self {
        Self {
            provider,
            hash_algorithm,
        }
    }

    /// Compute `PRF(secret, label, seed)` truncated to `output_len` bytes.
    pub fn compute(
        &self,
        secret: &[u8],
        label: &[u8],
        seed: &[u8],
        output_len: usize,
    ) -> Result<Vec<u8>> {
        let mut label_seed = Vec::with_capacity(label.len() + seed.len());
        label_seed.extend_from_slice(label);
        label_seed.extend_from_slice(seed);
        self.p_hash(secret, &label_seed, output_len)
    }

    fn p_hash(&self, secret: &[u8], label_seed: &[u8], output_len: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(output_len);

        // A(1) = HMAC(secret, label_seed)
        let mut hmac = self.provider.hmac(self.hash_algorithm, secret)?;
        hmac.update(label_seed);
        let mut a = hmac.finalize();

        while output.len() < output_len {
            // output += HMAC(secret, A(i) + label_seed)
            let mut hmac = self.provider.hmac(self.hash_algorithm, secret)?;
            hmac.update(&a);
            hmac.update(label_seed);
            output.extend_from_slice(&hmac.finalize());

            // A(i+1) = HMAC(secret, A(i))
            let mut hmac = self.provider.hmac(self.hash_algorithm, secret)?;
            hmac.update(&a);
            a = hmac.finalize();
        }

        output.truncate(output_len);
        Ok(output)
    }

    /// Derive the master secret from the pre-master secret.
    ///
    /// `PRF(pre_master, "master secret", client_random + server_random)[0..48]`
    pub fn compute_master_secret(
        &self,
        pre_master: &[u8],
        client_random: &[u8; 32],
        server_random: &[u8; 32],
    ) -> Result<Vec<u8>> {
        let mut seed = Vec::with_capacity(64);
        seed.extend_from_slice(client_random);
        seed.extend_from_slice(server_random);
        self.compute(pre_master, b"master secret", &seed, MASTER_SECRET_LENGTH)
    }

    /// Derive the extended master secret (RFC 7627).
    ///
    /// `PRF(pre_master, "extended master secret", session_hash)[0..48]`
    /// where `session_hash` is the transcript hash through
    /// ClientKeyExchange.
    pub fn compute_extended_master_secret(
        &self,
        pre_master: &[u8],
        session_hash: &[u8],
    ) -> Result<Vec<u8>> {
        self.compute(
            pre_master,
            b"extended master secret",
            session_hash,
            MASTER_SECRET_LENGTH,
        )
    }

    /// Derive the key block. The seed reverses the randoms:
    /// `PRF(master, "key expansion", server_random + client_random)`.
    pub fn compute_key_block(
        &self,
        master_secret: &[u8],
        client_random: &[u8; 32],
        server_random: &[u8; 32],
        length: usize,
    ) -> Result<Vec<u8>> {
        if master_secret.len() != MASTER_SECRET_LENGTH {
            return Err(Error::InternalError(format!(
                "Master secret must be {} bytes, got {}",
                MASTER_SECRET_LENGTH,
                master_secret.len()
            )));
        }
        let mut seed = Vec::with_capacity(64);
        seed.extend_from_slice(server_random);
        seed.extend_from_slice(client_random);
        self.compute(master_secret, b"key expansion", &seed, length)
    }

    /// Derive Finished verify_data.
    ///
    /// `PRF(master, label, transcript_hash)[0..12]` with label
    /// `"client finished"` or `"server finished"`.
    pub fn compute_verify_data(
        &self,
        master_secret: &[u8],
        label: &[u8],
        transcript_hash: &[u8],
    ) -> Result<Vec<u8>> {
        self.compute(
            master_secret,
            label,
            transcript_hash,
            crate::messages::finished::VERIFY_DATA_LENGTH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintls_crypto_rustcrypto::RustCryptoProvider;

    #[test]
    fn prf_is_deterministic() {
        let provider = RustCryptoProvider::new();
        let prf = Prf::new(&provider, HashAlgorithm::Sha256);

        let a = prf.compute(b"secret", b"test label", b"seed", 64).unwrap();
        let b = prf.compute(b"secret", b"test label", b"seed", 64).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn prf_output_depends_on_all_inputs() {
        let provider = RustCryptoProvider::new();
        let prf = Prf::new(&provider, HashAlgorithm::Sha256);

        let base = prf.compute(b"secret", b"label", b"seed", 32).unwrap();
        assert_ne!(base, prf.compute(b"other", b"label", b"seed", 32).unwrap());
        assert_ne!(base, prf.compute(b"secret", b"babel", b"seed", 32).unwrap());
        assert_ne!(base, prf.compute(b"secret", b"label", b"deed", 32).unwrap());
    }

    #[test]
    fn truncation_is_a_prefix() {
        let provider = RustCryptoProvider::new();
        let prf = Prf::new(&provider, HashAlgorithm::Sha384);

        let long = prf.compute(b"s", b"l", b"x", 100).unwrap();
        let short = prf.compute(b"s", b"l", b"x", 48).unwrap();
        assert_eq!(&long[..48], &short[..]);
    }

    #[test]
    fn master_secret_is_48_bytes() {
        let provider = RustCryptoProvider::new();
        let prf = Prf::new(&provider, HashAlgorithm::Sha256);

        let master = prf
            .compute_master_secret(&[1u8; 32], &[2u8; 32], &[3u8; 32])
            .unwrap();
        assert_eq!(master.len(), MASTER_SECRET_LENGTH);
    }

    #[test]
    fn extended_master_secret_differs_from_plain() {
        let provider = RustCryptoProvider::new();
        let prf = Prf::new(&provider, HashAlgorithm::Sha256);

        let pre_master = [7u8; 32];
        let plain = prf
            .compute_master_secret(&pre_master, &[2u8; 32], &[3u8; 32])
            .unwrap();
        let extended = prf
            .compute_extended_master_secret(&pre_master, &[9u8; 32])
            .unwrap();
        assert_ne!(plain, extended);
        assert_eq!(extended.len(), MASTER_SECRET_LENGTH);
    }

    #[test]
    fn key_block_requires_master_length() {
        let provider = RustCryptoProvider::new();
        let prf = Prf::new(&provider, HashAlgorithm::Sha256);

        assert!(prf
            .compute_key_block(&[0u8; 47], &[0u8; 32], &[0u8; 32], 40)
            .is_err());
    }

    #[test]
    fn verify_data_is_12_bytes_and_label_sensitive() {
        let provider = RustCryptoProvider::new();
        let prf = Prf::new(&provider, HashAlgorithm::Sha256);

        let master = [5u8; 48];
        let hash = [6u8; 32];
        let client = prf
            .compute_verify_data(&master, b"client finished", &hash)
            .unwrap();
        let server = prf
            .compute_verify_data(&master, b"server finished", &hash)
            .unwrap();
        assert_eq!(client.len(), 12);
        assert_ne!(client, server);
    }
}
