//! ClientHello message (RFC 5246 section 7.4.1.2).

use crate::error::{Error, Result};
use crate::extensions::Extensions;

/// ClientHello message body.
///
/// Offered cipher suites are raw codepoints: the server must see the
/// client's full list (including suites this implementation doesn't know)
/// to honor preference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    /// 32 bytes of client randomness.
    pub client_random: [u8; 32],
    /// Legacy session id (0..32 bytes).
    pub session_id: Vec<u8>,
    /// Offered cipher suites in preference order.
    pub cipher_suites: Vec<u16>,
    /// Extensions.
    pub extensions: Extensions,
}

impl ClientHello {
    /// Encode the message body (without handshake header).
    pub fn encode_body(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        // client_version
        buf.extend_from_slice(&0x0303u16.to_be_bytes());
        buf.extend_from_slice(&self.client_random);

        buf.push(self.session_id.len() as u8);
        buf.extend_from_slice(&self.session_id);

        buf.extend_from_slice(&((self.cipher_suites.len() * 2) as u16).to_be_bytes());
        for suite in &self.cipher_suites {
            buf.extend_from_slice(&suite.to_be_bytes());
        }

        // compression_methods: null only
        buf.push(1);
        buf.push(0);

        buf.extend_from_slice(&self.extensions.encode());
        buf
    }

    /// Decode the message body (without handshake header).
    pub fn decode_body(data: &[u8]) -> Result<Self> {
        if data.len() < 35 {
            return Err(Error::InvalidMessage("ClientHello too short".into()));
        }

        let version = u16::from_be_bytes([data[0], data[1]]);
        if version != 0x0303 {
            return Err(Error::InvalidMessage(format!(
                "Unsupported client version: {:#06x}",
                version
            )));
        }

        let mut random = [0u8; 32];
        random.copy_from_slice(&data[2..34]);

        let mut offset = 34;
        let session_id_len = data[offset] as usize;
        offset += 1;
        if session_id_len > 32 || data.len() < offset + session_id_len {
            return Err(Error::InvalidMessage("Malformed session id".into()));
        }
        let session_id = data[offset..offset + session_id_len].to_vec();
        offset += session_id_len;

        if data.len() < offset + 2 {
            return Err(Error::InvalidMessage("ClientHello truncated".into()));
        }
        let suites_len = u16::from_be_bytes([data[offset], data[offset + 1]]) as usize;
        offset += 2;
        if suites_len == 0 || suites_len % 2 != 0 || data.len() < offset + suites_len {
            return Err(Error::InvalidMessage("Malformed cipher suite list".into()));
        }
        let cipher_suites = data[offset..offset + suites_len]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        offset += suites_len;

        if data.len() < offset + 2 {
            return Err(Error::InvalidMessage("ClientHello truncated".into()));
        }
        let compression_len = data[offset] as usize;
        offset += 1;
        if compression_len == 0 || data.len() < offset + compression_len {
            return Err(Error::InvalidMessage("Malformed compression list".into()));
        }
        if !data[offset..offset + compression_len].contains(&0) {
            return Err(Error::HandshakeFailure(
                "Client does not offer null compression".into(),
            ));
        }
        offset += compression_len;

        let extensions = if offset < data.len() {
            let (exts, consumed) = Extensions::decode(&data[offset..])?;
            if offset + consumed != data.len() {
                return Err(Error::InvalidMessage(
                    "Trailing bytes after extensions".into(),
                ));
            }
            exts
        } else {
            Extensions::new()
        };

        Ok(Self {
            client_random: random,
            session_id,
            cipher_suites,
            extensions,
        })
    }
}
