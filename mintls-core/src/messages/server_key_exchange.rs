//! ServerKeyExchange message for ECDHE suites (RFC 8422 section 5.4).

use crate::error::{Error, Result};

/// ECCurveType value for named curves.
const CURVE_TYPE_NAMED: u8 = 3;

/// ServerKeyExchange message body: named-curve ECDHE parameters plus the
/// server's signature over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerKeyExchange {
    /// Named curve codepoint (supported_groups registry).
    pub named_curve: u16,
    /// Server's ephemeral public key.
    pub public_key: Vec<u8>,
    /// SignatureScheme codepoint.
    pub signature_algorithm: u16,
    /// Signature over client_random || server_random || params.
    pub signature: Vec<u8>,
}

impl ServerKeyExchange {
    /// Encode the message body (without handshake header).
    pub fn encode_body(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.encode_params());
        buf.extend_from_slice(&self.signature_algorithm.to_be_bytes());
        buf.extend_from_slice(&(self.signature.len() as u16).to_be_bytes());
        buf.extend_from_slice(&self.signature);
        buf
    }

    /// Encode just the ServerECDHParams portion.
    fn encode_params(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.public_key.len());
        buf.push(CURVE_TYPE_NAMED);
        buf.extend_from_slice(&self.named_curve.to_be_bytes());
        buf.push(self.public_key.len() as u8);
        buf.extend_from_slice(&self.public_key);
        buf
    }

    /// Decode the message body (without handshake header).
    pub fn decode_body(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::InvalidMessage("ServerKeyExchange too short".into()));
        }
        if data[0] != CURVE_TYPE_NAMED {
            return Err(Error::UnsupportedFeature(format!(
                "Unsupported curve type: {}",
                data[0]
            )));
        }

        let named_curve = u16::from_be_bytes([data[1], data[2]]);
        let key_len = data[3] as usize;
        let mut offset = 4;
        if data.len() < offset + key_len + 4 {
            return Err(Error::InvalidMessage("ServerKeyExchange truncated".into()));
        }
        let public_key = data[offset..offset + key_len].to_vec();
        offset += key_len;

        let signature_algorithm = u16::from_be_bytes([data[offset], data[offset + 1]]);
        offset += 2;
        let sig_len = u16::from_be_bytes([data[offset], data[offset + 1]]) as usize;
        offset += 2;
        if data.len() != offset + sig_len {
            return Err(Error::InvalidMessage(
                "ServerKeyExchange signature length mismatch".into(),
            ));
        }
        let signature = data[offset..].to_vec();

        Ok(Self {
            named_curve,
            public_key,
            signature_algorithm,
            signature,
        })
    }

    /// The bytes covered by the signature: both hello randoms followed by
    /// the ServerECDHParams.
    pub fn signed_payload(&self, client_random: &[u8; 32], server_random: &[u8; 32]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + 4 + self.public_key.len());
        buf.extend_from_slice(client_random);
        buf.extend_from_slice(server_random);
        buf.extend_from_slice(&self.encode_params());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServerKeyExchange {
        ServerKeyExchange {
            named_curve: 0x001D,
            public_key: vec![0xAB; 32],
            signature_algorithm: 0x0403,
            signature: vec![0xCD; 70],
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let ske = sample();
        let decoded = ServerKeyExchange::decode_body(&ske.encode_body()).unwrap();
        assert_eq!(decoded, ske);
    }

    #[test]
    fn signed_payload_layout() {
        let ske = sample();
        let payload = ske.signed_payload(&[1u8; 32], &[2u8; 32]);
        assert_eq!(&payload[..32], &[1u8; 32]);
        assert_eq!(&payload[32..64], &[2u8; 32]);
        assert_eq!(payload[64], 3); // named_curve type
        assert_eq!(&payload[65..67], &[0x00, 0x1D]);
        assert_eq!(payload[67], 32); // key length
    }

    #[test]
    fn rejects_explicit_curve_parameters() {
        let mut encoded = sample().encode_body();
        encoded[0] = 1; // explicit_prime
        assert!(matches!(
            ServerKeyExchange::decode_body(&encoded),
            Err(Error::UnsupportedFeature(_))
        ));
    }
}
