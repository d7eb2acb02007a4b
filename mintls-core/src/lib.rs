//! # MinTLS Core Protocol
//!
//! TLS 1.2 (RFC 5246) handshake and record protocol, independent of any
//! particular cryptographic backend or transport.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │        handshake (client / server)            │
//! │  state machines, negotiation, Finished checks │
//! ├───────────────────────────────────────────────┤
//! │  messages / extensions     key_schedule / prf │
//! │  wire codecs               master secret, PRF │
//! ├───────────────────────────────────────────────┤
//! │  record_stream    record_protection           │
//! │  framing + I/O    AEAD / MAC-then-encrypt     │
//! ├───────────────────────────────────────────────┤
//! │            mintls-crypto (provider)           │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Transport is any blocking `std::io::Read` / `std::io::Write` pair; the
//! crate never spawns threads or performs its own timeouts.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

pub mod alert;
pub mod cipher_suites;
pub mod connection;
pub mod error;
pub mod extensions;
pub mod handshake;
pub mod key_manager;
pub mod key_schedule;
pub mod messages;
pub mod prf;
pub mod protocol;
pub mod record;
pub mod record_protection;
pub mod record_stream;
pub mod transcript;
pub mod x509;

pub use alert::{Alert, AlertDescription, AlertLevel};
pub use cipher_suites::{CipherDescription, CipherSuite, CipherType};
pub use connection::Connection;
pub use error::{Error, Result};
pub use handshake::client::{ClientHandshaker, ClientOptions};
pub use handshake::server::{ServerHandshaker, ServerOptions};
pub use key_manager::{KeyManager, SingleCertKeyManager};
pub use protocol::{ContentType, ExtensionType, HandshakeType, ProtocolVersion};
