//! Server credential lookup.
//!
//! The server handshaker never owns key material directly: during
//! negotiation it asks a [`KeyManager`] whether a credential exists for a
//! suite's signature algorithm, and later fetches the chain and signing key
//! by alias.

use mintls_crypto::{SignatureAlgorithm, SigningKey};

/// Capability interface for server certificates and signing keys.
pub trait KeyManager: Send + Sync {
    /// Pick an alias holding a credential usable with `algorithm`, or
    /// `None` if the key manager has nothing suitable.
    fn choose_alias(&self, algorithm: SignatureAlgorithm) -> Option<String>;

    /// The DER certificate chain for an alias, leaf first.
    fn certificate_chain(&self, alias: &str) -> Option<Vec<Vec<u8>>>;

    /// The signing key for an alias.
    fn signing_key(&self, alias: &str) -> Option<SigningKey>;
}

/// Key manager holding exactly one credential.
pub struct SingleCertKeyManager {
    alias: String,
    algorithm: SignatureAlgorithm,
    chain: Vec<Vec<u8>>,
    key: Vec<u8>,
}

impl std::fmt::Debug for SingleCertKeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleCertKeyManager")
            .field("alias", &self.alias)
            .field("algorithm", &self.algorithm)
            .field("chain_len", &self.chain.len())
            .field("key", &"<redacted>")
            .finish()
    }
}

impl SingleCertKeyManager {
    /// Create a key manager for one certificate chain and signing key.
    pub fn new(
        alias: impl Into<String>,
        algorithm: SignatureAlgorithm,
        chain: Vec<Vec<u8>>,
        key: Vec<u8>,
    ) -> Self {
        Self {
            alias: alias.into(),
            algorithm,
            chain,
            key,
        }
    }
}

impl KeyManager for SingleCertKeyManager {
    fn choose_alias(&self, algorithm: SignatureAlgorithm) -> Option<String> {
        (algorithm == self.algorithm).then(|| self.alias.clone())
    }

    fn certificate_chain(&self, alias: &str) -> Option<Vec<Vec<u8>>> {
        (alias == self.alias).then(|| self.chain.clone())
    }

    fn signing_key(&self, alias: &str) -> Option<SigningKey> {
        (alias == self.alias).then(|| SigningKey::from_bytes(self.key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cert_manager_matches_its_algorithm_only() {
        let manager = SingleCertKeyManager::new(
            "server",
            SignatureAlgorithm::EcdsaSecp256r1Sha256,
            vec![vec![0x30]],
            vec![1, 2, 3],
        );

        assert_eq!(
            manager.choose_alias(SignatureAlgorithm::EcdsaSecp256r1Sha256),
            Some("server".to_string())
        );
        assert_eq!(manager.choose_alias(SignatureAlgorithm::RsaPkcs1Sha256), None);

        assert!(manager.certificate_chain("server").is_some());
        assert!(manager.certificate_chain("other").is_none());
        assert!(manager.signing_key("server").is_some());
    }
}
