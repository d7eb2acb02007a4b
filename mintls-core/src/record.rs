//! TLS record framing (RFC 5246 section 6.2).

use crate::error::{Error, Result};
use crate::protocol::{ContentType, ProtocolVersion};

/// Size of the record header: type (1) + version (2) + length (2).
pub const RECORD_HEADER_SIZE: usize = 5;

/// Maximum plaintext fragment size (2^14).
pub const MAX_FRAGMENT_SIZE: usize = 16384;

/// Maximum ciphertext expansion permitted on top of the fragment size.
pub const MAX_CIPHERTEXT_EXPANSION: usize = 2048;

/// A single TLS record: header fields plus payload (plaintext or
/// ciphertext, depending on which side of protection it sits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record content type.
    pub content_type: ContentType,
    /// Record-layer protocol version.
    pub version: ProtocolVersion,
    /// Payload bytes.
    pub payload: Vec<u8>,
}

impl Record {
    /// Create a new record.
    pub fn new(content_type: ContentType, version: ProtocolVersion, payload: Vec<u8>) -> Self {
        Self {
            content_type,
            version,
            payload,
        }
    }

    /// Encode header and payload to wire format.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RECORD_HEADER_SIZE + self.payload.len());
        buf.push(self.content_type.to_u8());
        buf.extend_from_slice(&self.version.to_u16().to_be_bytes());
        buf.extend_from_slice(&(self.payload.len() as u16).to_be_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Parse a 5-byte record header. Returns content type, version, and the
    /// payload length still to be read.
    pub fn parse_header(header: &[u8; RECORD_HEADER_SIZE]) -> Result<(ContentType, ProtocolVersion, usize)> {
        let content_type = ContentType::from_u8(header[0]).ok_or_else(|| {
            Error::InvalidMessage(format!("Unknown record content type: {}", header[0]))
        })?;
        let version_raw = u16::from_be_bytes([header[1], header[2]]);
        let version = ProtocolVersion::from_u16(version_raw).ok_or_else(|| {
            Error::InvalidMessage(format!("Unknown record version: {:#06x}", version_raw))
        })?;
        let length = u16::from_be_bytes([header[3], header[4]]) as usize;

        if length > MAX_FRAGMENT_SIZE + MAX_CIPHERTEXT_EXPANSION {
            return Err(Error::RecordOverflow);
        }
        Ok((content_type, version, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_and_parse_header() {
        let record = Record::new(
            ContentType::Handshake,
            ProtocolVersion::Tls12,
            vec![1, 2, 3],
        );
        let encoded = record.encode();
        assert_eq!(&encoded[..5], &[22, 0x03, 0x03, 0, 3]);

        let header: [u8; 5] = encoded[..5].try_into().unwrap();
        let (ct, version, len) = Record::parse_header(&header).unwrap();
        assert_eq!(ct, ContentType::Handshake);
        assert_eq!(version, ProtocolVersion::Tls12);
        assert_eq!(len, 3);
    }

    #[test]
    fn oversized_length_is_record_overflow() {
        // 0x4801 = 18433 > 16384 + 2048
        let header = [23u8, 0x03, 0x03, 0x48, 0x01];
        assert_eq!(Record::parse_header(&header), Err(Error::RecordOverflow));
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let header = [99u8, 0x03, 0x03, 0, 0];
        assert!(matches!(
            Record::parse_header(&header),
            Err(Error::InvalidMessage(_))
        ));
    }
}
