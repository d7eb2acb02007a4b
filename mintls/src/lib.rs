//! # MinTLS
//!
//! A minimal TLS 1.2 (RFC 5246) client and server over blocking
//! `std::io::Read` / `std::io::Write` transports.
//!
//! Supported: ECDHE key exchange (X25519, P-256), ECDSA and RSA server
//! authentication, AES-GCM, ChaCha20-Poly1305 and AES-CBC record
//! protection, and the extended master secret (RFC 7627).
//!
//! Not supported: TLS 1.3, session resumption, renegotiation, client
//! certificates, and certificate chain validation.
//!
//! ## Example
//!
//! ```no_run
//! use mintls::ClientConfig;
//! use std::net::TcpStream;
//! use std::io::{Read, Write};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tcp = TcpStream::connect("example.com:443")?;
//! let config = ClientConfig::builder()
//!     .server_name("example.com")
//!     .build()?;
//! let mut tls = config.connect(tcp.try_clone()?, tcp)?;
//!
//! tls.write_all(b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n")?;
//! let mut response = Vec::new();
//! tls.read_to_end(&mut response)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

mod client;
mod server;
mod stream;

pub use client::{ClientConfig, ClientConfigBuilder};
pub use server::{ServerConfig, ServerConfigBuilder};
pub use stream::TlsStream;

pub use mintls_core::cipher_suites::CipherSuite;
pub use mintls_core::key_manager::{KeyManager, SingleCertKeyManager};
pub use mintls_core::{Error, Result};
pub use mintls_crypto::{KeyExchangeAlgorithm, SignatureAlgorithm};
pub use mintls_crypto_rustcrypto::RustCryptoProvider;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
