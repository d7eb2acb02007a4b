//! ClientKeyExchange message for ECDHE suites (RFC 8422 section 5.7).

use crate::error::{Error, Result};

/// ClientKeyExchange message body: the client's ephemeral public key with a
/// 1-byte length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKeyExchange {
    /// Client's ephemeral public key.
    pub public_key: Vec<u8>,
}

impl ClientKeyExchange {
    /// Encode the message body (without handshake header).
    pub fn encode_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + self.public_key.len());
        buf.push(self.public_key.len() as u8);
        buf.extend_from_slice(&self.public_key);
        buf
    }

    /// Decode the message body (without handshake header).
    pub fn decode_body(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidMessage("ClientKeyExchange too short".into()));
        }
        let key_len = data[0] as usize;
        if key_len == 0 || data.len() != 1 + key_len {
            return Err(Error::InvalidMessage(
                "ClientKeyExchange length mismatch".into(),
            ));
        }
        Ok(Self {
            public_key: data[1..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let cke = ClientKeyExchange {
            public_key: vec![4u8; 65],
        };
        let decoded = ClientKeyExchange::decode_body(&cke.encode_body()).unwrap();
        assert_eq!(decoded, cke);
    }

    #[test]
    fn rejects_empty_key() {
        assert!(ClientKeyExchange::decode_body(&[0]).is_err());
        assert!(ClientKeyExchange::decode_body(&[]).is_err());
    }
}
