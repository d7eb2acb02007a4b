//! ServerHello message (RFC 5246 section 7.4.1.3).

use crate::error::{Error, Result};
use crate::extensions::Extensions;

/// ServerHello message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    /// 32 bytes of server randomness.
    pub server_random: [u8; 32],
    /// Echoed or freshly generated session id.
    pub session_id: Vec<u8>,
    /// Selected cipher suite codepoint.
    pub cipher_suite: u16,
    /// Extensions.
    pub extensions: Extensions,
}

impl ServerHello {
    /// Encode the message body (without handshake header).
    pub fn encode_body(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(&0x0303u16.to_be_bytes());
        buf.extend_from_slice(&self.server_random);

        buf.push(self.session_id.len() as u8);
        buf.extend_from_slice(&self.session_id);

        buf.extend_from_slice(&self.cipher_suite.to_be_bytes());
        buf.push(0); // compression: null

        buf.extend_from_slice(&self.extensions.encode());
        buf
    }

    /// Decode the message body (without handshake header).
    pub fn decode_body(data: &[u8]) -> Result<Self> {
        if data.len() < 38 {
            return Err(Error::InvalidMessage("ServerHello too short".into()));
        }

        let version = u16::from_be_bytes([data[0], data[1]]);
        if version != 0x0303 {
            return Err(Error::HandshakeFailure(format!(
                "Server selected unsupported version: {:#06x}",
                version
            )));
        }

        let mut random = [0u8; 32];
        random.copy_from_slice(&data[2..34]);

        let mut offset = 34;
        let session_id_len = data[offset] as usize;
        offset += 1;
        if session_id_len > 32 || data.len() < offset + session_id_len + 3 {
            return Err(Error::InvalidMessage("Malformed session id".into()));
        }
        let session_id = data[offset..offset + session_id_len].to_vec();
        offset += session_id_len;

        let cipher_suite = u16::from_be_bytes([data[offset], data[offset + 1]]);
        offset += 2;

        if data[offset] != 0 {
            return Err(Error::HandshakeFailure(
                "Server selected non-null compression".into(),
            ));
        }
        offset += 1;

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
            server_random: random,
            session_id,
            cipher_suite,
            extensions,
        })
    }
}
