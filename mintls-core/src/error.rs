//! Error types for the TLS protocol core.
//!
//! Every error surfaced during a handshake or on the record layer is fatal;
//! the connection is torn down and never resumed.

use crate::alert::AlertDescription;
use std::fmt;

/// Result type for TLS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during TLS operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid configuration.
    InvalidConfig(String),

    /// A message violated the wire format.
    InvalidMessage(String),

    /// A well-formed message arrived in the wrong state.
    UnexpectedMessage(String),

    /// Negotiation or verification failure during the handshake.
    HandshakeFailure(String),

    /// Cryptographic operation failed.
    CryptoError(String),

    /// Transport I/O error (including EOF mid-record).
    IoError(String),

    /// Record decryption or authentication failed.
    ///
    /// Deliberately carries no detail: padding and MAC defects are
    /// indistinguishable to the peer.
    DecryptionFailed,

    /// A record exceeded the maximum permitted size.
    RecordOverflow,

    /// The 64-bit record sequence number would wrap.
    SequenceOverflow,

    /// The peer sent a fatal alert.
    AlertReceived(AlertDescription),

    /// Certificate parsing or key extraction failed.
    CertificateError(String),

    /// Feature not supported by this implementation.
    UnsupportedFeature(String),

    /// Internal error (state machine violation).
    InternalError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidMessage(msg) => write!(f, "Invalid message: {}", msg),
            Error::UnexpectedMessage(msg) => write!(f, "Unexpected message: {}", msg),
            Error::HandshakeFailure(msg) => write!(f, "Handshake failure: {}", msg),
            Error::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            Error::IoError(msg) => write!(f, "I/O error: {}", msg),
            Error::DecryptionFailed => write!(f, "Record decryption failed"),
            Error::RecordOverflow => write!(f, "Record overflow"),
            Error::SequenceOverflow => write!(f, "Record sequence number overflow"),
            Error::AlertReceived(desc) => write!(f, "Fatal alert received: {:?}", desc),
            Error::CertificateError(msg) => write!(f, "Certificate error: {}", msg),
            Error::UnsupportedFeature(msg) => write!(f, "Unsupported feature: {}", msg),
            Error::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<mintls_crypto::Error> for Error {
    fn from(err: mintls_crypto::Error) -> Self {
        match err {
            mintls_crypto::Error::AuthenticationFailed
            | mintls_crypto::Error::DecryptionFailed => Error::DecryptionFailed,
            other => Error::CryptoError(other.to_string()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}
