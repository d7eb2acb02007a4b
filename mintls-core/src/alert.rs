//! TLS alert protocol (RFC 5246 section 7.2).

use crate::error::{Error, Result};

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertLevel {
    /// Warning: connection may continue.
    Warning = 1,
    /// Fatal: connection is torn down.
    Fatal = 2,
}

impl AlertLevel {
    /// Convert to wire format.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from wire format.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AlertLevel::Warning),
            2 => Some(AlertLevel::Fatal),
            _ => None,
        }
    }
}

/// Alert description codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertDescription {
    /// close_notify
    CloseNotify = 0,
    /// unexpected_message
    UnexpectedMessage = 10,
    /// bad_record_mac
    BadRecordMac = 20,
    /// record_overflow
    RecordOverflow = 22,
    /// handshake_failure
    HandshakeFailure = 40,
    /// bad_certificate
    BadCertificate = 42,
    /// unsupported_certificate
    UnsupportedCertificate = 43,
    /// illegal_parameter
    IllegalParameter = 47,
    /// decode_error
    DecodeError = 50,
    /// decrypt_error
    DecryptError = 51,
    /// protocol_version
    ProtocolVersion = 70,
    /// insufficient_security
    InsufficientSecurity = 71,
    /// internal_error
    InternalError = 80,
    /// no_renegotiation
    NoRenegotiation = 100,
    /// unsupported_extension
    UnsupportedExtension = 110,
}

impl AlertDescription {
    /// Convert to wire format.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from wire format.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(AlertDescription::CloseNotify),
            10 => Some(AlertDescription::UnexpectedMessage),
            20 => Some(AlertDescription::BadRecordMac),
            22 => Some(AlertDescription::RecordOverflow),
            40 => Some(AlertDescription::HandshakeFailure),
            42 => Some(AlertDescription::BadCertificate),
            43 => Some(AlertDescription::UnsupportedCertificate),
            47 => Some(AlertDescription::IllegalParameter),
            50 => Some(AlertDescription::DecodeError),
            51 => Some(AlertDescription::DecryptError),
            70 => Some(AlertDescription::ProtocolVersion),
            71 => Some(AlertDescription::InsufficientSecurity),
            80 => Some(AlertDescription::InternalError),
            100 => Some(AlertDescription::NoRenegotiation),
            110 => Some(AlertDescription::UnsupportedExtension),
            _ => None,
        }
    }
}

/// A TLS alert message: level followed by description, two bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    /// Severity level.
    pub level: AlertLevel,
    /// What went wrong (or close_notify).
    pub description: AlertDescription,
}

impl Alert {
    /// Construct a fatal alert.
    pub const fn fatal(description: AlertDescription) -> Self {
        Self {
            level: AlertLevel::Fatal,
            description,
        }
    }

    /// Construct the close_notify alert.
    pub const fn close_notify() -> Self {
        Self {
            level: AlertLevel::Warning,
            description: AlertDescription::CloseNotify,
        }
    }

    /// Encode to wire format.
    pub fn encode(&self) -> Vec<u8> {
        vec![self.level.to_u8(), self.description.to_u8()]
    }

    /// Decode from wire format.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != 2 {
            return Err(Error::InvalidMessage("Alert must be 2 bytes".into()));
        }
        let level = AlertLevel::from_u8(data[0])
            .ok_or_else(|| Error::InvalidMessage(format!("Unknown alert level: {}", data[0])))?;
        let description = AlertDescription::from_u8(data[1]).ok_or_else(|| {
            Error::InvalidMessage(format!("Unknown alert description: {}", data[1]))
        })?;
        Ok(Self { level, description })
    }
}
