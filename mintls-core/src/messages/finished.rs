//! Finished message (RFC 5246 section 7.4.9).

use crate::error::{Error, Result};

/// Length of the verify_data field in TLS 1.2.
pub const VERIFY_DATA_LENGTH: usize = 12;

/// Finished message body: 12 bytes of PRF output over the handshake
/// transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    /// PRF output proving transcript agreement.
    pub verify_data: Vec<u8>,
}

impl Finished {
    /// Encode the message body (without handshake header).
    pub fn encode_body(&self) -> Vec<u8> {
        self.verify_data.clone()
    }

    /// Decode the message body (without handshake header).
    pub fn decode_body(data: &[u8]) -> Result<Self> {
        if data.len() != VERIFY_DATA_LENGTH {
            return Err(Error::InvalidMessage(format!(
                "Finished must carry {} bytes, got {}",
                VERIFY_DATA_LENGTH,
                data.len()
            )));
        }
        Ok(Self {
            verify_data: data.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let finished = Finished {
            verify_data: (0..12).collect(),
        };
        let decoded = Finished::decode_body(&finished.encode_body()).unwrap();
        assert_eq!(decoded, finished);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Finished::decode_body(&[0u8; 11]).is_err());
        assert!(Finished::decode_body(&[0u8; 32]).is_err());
    }
}
