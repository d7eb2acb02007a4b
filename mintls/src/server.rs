//! Server configuration and acceptor.

use crate::stream::TlsStream;
use mintls_core::cipher_suites::{default_cipher_suites, CipherSuite};
use mintls_core::key_manager::KeyManager;
use mintls_core::{Error, Result, ServerHandshaker, ServerOptions};
use mintls_crypto::{CryptoProvider, KeyExchangeAlgorithm};
use mintls_crypto_rustcrypto::RustCryptoProvider;
use std::io::{Read, Write};
use std::sync::Arc;

/// Server-side TLS configuration.
///
/// Requires a [`KeyManager`]; everything else has defaults.
#[derive(Clone)]
pub struct ServerConfig {
    provider: Arc<dyn CryptoProvider>,
    options: ServerOptions,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Start building a server configuration.
    pub fn builder(key_manager: Arc<dyn KeyManager>) -> ServerConfigBuilder {
        ServerConfigBuilder {
            key_manager,
            provider: None,
            cipher_suites: None,
            supported_groups: None,
        }
    }

    /// Handshake over a transport pair and return an established stream.
    pub fn accept<R: Read, W: Write>(&self, read_half: R, write_half: W) -> Result<TlsStream<R, W>> {
        let handshaker = ServerHandshaker::new(
            Arc::clone(&self.provider),
            self.options.clone(),
            read_half,
            write_half,
        )?;
        Ok(TlsStream::new(handshaker.kickstart()?))
    }
}

/// Builder for [`ServerConfig`].
pub struct ServerConfigBuilder {
    key_manager: Arc<dyn KeyManager>,
    provider: Option<Arc<dyn CryptoProvider>>,
    cipher_suites: Option<Vec<CipherSuite>>,
    supported_groups: Option<Vec<KeyExchangeAlgorithm>>,
}

impl std::fmt::Debug for ServerConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfigBuilder")
            .field("cipher_suites", &self.cipher_suites)
            .finish_non_exhaustive()
    }
}

impl ServerConfigBuilder {
    /// Use a specific crypto provider instead of the default RustCrypto one.
    pub fn provider(mut self, provider: Arc<dyn CryptoProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Restrict the accepted cipher suites. The client's preference order
    /// still decides among them.
    pub fn cipher_suites(mut self, suites: Vec<CipherSuite>) -> Self {
        self.cipher_suites = Some(suites);
        self
    }

    /// Restrict the ECDHE groups, in preference order.
    pub fn supported_groups(mut self, groups: Vec<KeyExchangeAlgorithm>) -> Self {
        self.supported_groups = Some(groups);
        self
    }

    /// Finish the configuration.
    pub fn build(self) -> Result<ServerConfig> {
        let mut options = ServerOptions::new(self.key_manager);
        if let Some(suites) = self.cipher_suites {
            options.cipher_suites = suites;
        }
        if let Some(groups) = self.supported_groups {
            options.supported_groups = groups;
        }
        if options.cipher_suites.is_empty() {
            return Err(Error::InvalidConfig("No cipher suites enabled".into()));
        }
        Ok(ServerConfig {
            provider: self
                .provider
                .unwrap_or_else(|| Arc::new(RustCryptoProvider::new())),
            options,
        })
    }
}
