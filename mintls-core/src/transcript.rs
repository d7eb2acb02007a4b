//! Running handshake transcript hash.
//!
//! Handshake bytes start flowing before the cipher suite (and therefore the
//! hash algorithm) is known, so the transcript buffers raw bytes until the
//! algorithm is set, then replays them into a live digest. Snapshots clone
//! the digest state so accumulation continues undisturbed.

use crate::error::{Error, Result};
use mintls_crypto::{CryptoProvider, Hash, HashAlgorithm};

/// Accumulates handshake messages (header + body) for Finished computation
/// and the extended-master-secret session hash.
pub struct HandshakeHash {
    buffer: Vec<u8>,
    digest: Option<Box<dyn Hash>>,
}

impl std::fmt::Debug for HandshakeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeHash")
            .field("buffered", &self.buffer.len())
            .field("algorithm_set", &self.digest.is_some())
            .finish()
    }
}

impl HandshakeHash {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            digest: None,
        }
    }

    /// Append a full handshake message (including its 4-byte header).
    pub fn update(&mut self, message: &[u8]) {
        match &mut self.digest {
            Some(digest) => digest.update(message),
            None => self.buffer.extend_from_slice(message),
        }
    }

    /// Fix the hash algorithm once the suite is negotiated, replaying any
    /// buffered bytes.
    pub fn set_algorithm(
        &mut self,
        provider: &dyn CryptoProvider,
        algorithm: HashAlgorithm,
    ) -> Result<()> {
        if self.digest.is_some() {
            return Err(Error::InternalError(
                "Transcript hash algorithm already set".into(),
            ));
        }
        let mut digest = provider.hash(algorithm)?;
        digest.update(&self.buffer);
        self.buffer.clear();
        self.digest = Some(digest);
        Ok(())
    }

    /// Hash of everything appended so far. The transcript keeps
    /// accumulating afterwards.
    pub fn current_hash(&self) -> Result<Vec<u8>> {
        let digest = self.digest.as_ref().ok_or_else(|| {
            Error::InternalError("Transcript hash requested before algorithm set".into())
        })?;
        Ok(digest.clone_box().finalize())
    }
}

impl Default for HandshakeHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintls_crypto_rustcrypto::RustCryptoProvider;

    #[test]
    fn buffered_bytes_replay_into_digest() {
        let provider = RustCryptoProvider::new();

        let mut transcript = HandshakeHash::new();
        transcript.update(b"client hello bytes");
        transcript
            .set_algorithm(&provider, HashAlgorithm::Sha256)
            .unwrap();
        transcript.update(b"server hello bytes");

        let mut direct = provider.hash(HashAlgorithm::Sha256).unwrap();
        direct.update(b"client hello bytes");
        direct.update(b"server hello bytes");

        assert_eq!(transcript.current_hash().unwrap(), direct.finalize());
    }

    #[test]
    fn snapshot_does_not_disturb_accumulation() {
        let provider = RustCryptoProvider::new();

        let mut transcript = HandshakeHash::new();
        transcript
            .set_algorithm(&provider, HashAlgorithm::Sha384)
            .unwrap();
        transcript.update(b"one");

        let snapshot = transcript.current_hash().unwrap();
        transcript.update(b"two");
        let after = transcript.current_hash().unwrap();

        assert_ne!(snapshot, after);
        // snapshot again without appending matches
        let mut replay = HandshakeHash::new();
        replay
            .set_algorithm(&provider, HashAlgorithm::Sha384)
            .unwrap();
        replay.update(b"one");
        assert_eq!(replay.current_hash().unwrap(), snapshot);
    }

    #[test]
    fn hash_before_algorithm_is_an_error() {
        let transcript = HandshakeHash::new();
        assert!(transcript.current_hash().is_err());
    }

    #[test]
    fn algorithm_can_only_be_set_once() {
        let provider = RustCryptoProvider::new();
        let mut transcript = HandshakeHash::new();
        transcript
            .set_algorithm(&provider, HashAlgorithm::Sha256)
            .unwrap();
        assert!(transcript
            .set_algorithm(&provider, HashAlgorithm::Sha256)
            .is_err());
    }
}
