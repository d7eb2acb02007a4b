//! Certificate message (RFC 5246 section 7.4.2).

use crate::error::{Error, Result};

/// Certificate message body: a list of DER certificates, leaf first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// DER-encoded certificates, leaf first.
    pub chain: Vec<Vec<u8>>,
}

impl Certificate {
    /// Encode the message body (without handshake header).
    pub fn encode_body(&self) -> Vec<u8> {
        let entries_len: usize = self.chain.iter().map(|c| 3 + c.len()).sum();

        let mut buf = Vec::with_capacity(3 + entries_len);
        buf.extend_from_slice(&u24_bytes(entries_len));
        for cert in &self.chain {
            buf.extend_from_slice(&u24_bytes(cert.len()));
            buf.extend_from_slice(cert);
        }
        buf
    }

    /// Decode the message body (without handshake header).
    pub fn decode_body(data: &[u8]) -> Result<Self> {
        if data.len() < 3 {
            return Err(Error::InvalidMessage("Certificate too short".into()));
        }
        let list_len = u24(data[0], data[1], data[2]);
        if data.len() != 3 + list_len {
            return Err(Error::InvalidMessage(
                "Certificate list length mismatch".into(),
            ));
        }

        let mut chain = Vec::new();
        let mut offset = 3;
        while offset < data.len() {
            if data.len() < offset + 3 {
                return Err(Error::InvalidMessage("Certificate entry truncated".into()));
            }
            let cert_len = u24(data[offset], data[offset + 1], data[offset + 2]);
            offset += 3;
            if data.len() < offset + cert_len {
                return Err(Error::InvalidMessage("Certificate entry truncated".into()));
            }
            chain.push(data[offset..offset + cert_len].to_vec());
            offset += cert_len;
        }

        if chain.is_empty() {
            return Err(Error::HandshakeFailure("Empty certificate chain".into()));
        }
        Ok(Self { chain })
    }

    /// Get the leaf (end-entity) certificate.
    pub fn leaf(&self) -> &[u8] {
        &self.chain[0]
    }
}

const fn u24(a: u8, b: u8, c: u8) -> usize {
    ((a as usize) << 16) | ((b as usize) << 8) | (c as usize)
}

fn u24_bytes(value: usize) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}
