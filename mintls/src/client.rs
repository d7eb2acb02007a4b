//! Client configuration and connector.

use crate::stream::TlsStream;
use mintls_core::cipher_suites::{default_cipher_suites, CipherSuite};
use mintls_core::{ClientHandshaker, ClientOptions, Error, Result};
use mintls_crypto::{CryptoProvider, KeyExchangeAlgorithm, SignatureAlgorithm};
use mintls_crypto_rustcrypto::RustCryptoProvider;
use std::io::{Read, Write};
use std::sync::Arc;

/// Client-side TLS configuration.
///
/// Build one with [`ClientConfig::builder`], then connect as many times as
/// needed; the config is cheap to clone.
#[derive(Clone)]
pub struct ClientConfig {
    provider: Arc<dyn CryptoProvider>,
    options: ClientOptions,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Start building a client configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Handshake over a transport pair and return an established stream.
    pub fn connect<R: Read, W: Write>(&self, read_half: R, write_half: W) -> Result<TlsStream<R, W>> {
        let handshaker = ClientHandshaker::new(
            Arc::clone(&self.provider),
            self.options.clone(),
            read_half,
            write_half,
        )?;
        Ok(TlsStream::new(handshaker.kickstart()?))
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    provider: Option<Arc<dyn CryptoProvider>>,
    cipher_suites: Option<Vec<CipherSuite>>,
    server_name: Option<String>,
    supported_groups: Option<Vec<KeyExchangeAlgorithm>>,
    signature_algorithms: Option<Vec<SignatureAlgorithm>>,
}

impl std::fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("cipher_suites", &self.cipher_suites)
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

impl ClientConfigBuilder {
    /// Use a specific crypto provider instead of the default RustCrypto one.
    pub fn provider(mut self, provider: Arc<dyn CryptoProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Restrict the offered cipher suites, in preference order.
    pub fn cipher_suites(mut self, suites: Vec<CipherSuite>) -> Self {
        self.cipher_suites = Some(suites);
        self
    }

    /// Hostname sent in the server_name extension.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Restrict the offered ECDHE groups, in preference order.
    pub fn supported_groups(mut self, groups: Vec<KeyExchangeAlgorithm>) -> Self {
        self.supported_groups = Some(groups);
        self
    }

    /// Restrict the accepted ServerKeyExchange signature algorithms.
    pub fn signature_algorithms(mut self, algorithms: Vec<SignatureAlgorithm>) -> Self {
        self.signature_algorithms = Some(algorithms);
        self
    }

    /// Finish the configuration.
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientOptions::default();
        let options = ClientOptions {
            cipher_suites: self.cipher_suites.unwrap_or_else(default_cipher_suites),
            server_name: self.server_name,
            supported_groups: self.supported_groups.unwrap_or(defaults.supported_groups),
            signature_algorithms: self
                .signature_algorithms
                .unwrap_or(defaults.signature_algorithms),
        };
        if options.cipher_suites.is_empty() {
            return Err(Error::InvalidConfig("No cipher suites enabled".into()));
        }
        Ok(ClientConfig {
            provider: self
                .provider
                .unwrap_or_else(|| Arc::new(RustCryptoProvider::new())),
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ClientConfig::builder().build().unwrap();
        assert!(!config.options.cipher_suites.is_empty());
        assert!(config.options.server_name.is_none());
    }

    #[test]
    fn builder_rejects_empty_suite_list() {
        assert!(matches!(
            ClientConfig::builder().cipher_suites(Vec::new()).build(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn builder_keeps_server_name() {
        let config = ClientConfig::builder()
            .server_name("example.com")
            .build()
            .unwrap();
        assert_eq!(config.options.server_name.as_deref(), Some("example.com"));
    }
}
