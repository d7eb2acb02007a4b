//! TLS 1.2 handshake message wire model.
//!
//! Every message is a 4-byte header (type + 24-bit body length) followed by
//! the body. [`HandshakeMessage`] is the tagged union over all messages this
//! implementation speaks; decode dispatch is keyed by the type byte.

pub mod certificate;
pub mod client_hello;
pub mod client_key_exchange;
pub mod finished;
pub mod server_hello;
pub mod server_key_exchange;

pub use certificate::Certificate;
pub use client_hello::ClientHello;
pub use client_key_exchange::ClientKeyExchange;
pub use finished::Finished;
pub use server_hello::ServerHello;
pub use server_key_exchange::ServerKeyExchange;

use crate::error::{Error, Result};
use crate::protocol::HandshakeType;

/// Size of the handshake message header (1 byte type + 3 bytes length).
pub const HANDSHAKE_HEADER_SIZE: usize = 4;

/// A decoded handshake message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeMessage {
    /// ClientHello
    ClientHello(ClientHello),
    /// ServerHello
    ServerHello(ServerHello),
    /// Certificate
    Certificate(Certificate),
    /// ServerKeyExchange (ECDHE parameters + signature)
    ServerKeyExchange(ServerKeyExchange),
    /// ServerHelloDone (empty body)
    ServerHelloDone,
    /// ClientKeyExchange
    ClientKeyExchange(ClientKeyExchange),
    /// Finished
    Finished(Finished),
}

impl HandshakeMessage {
    /// Get the handshake type of this message.
    pub fn handshake_type(&self) -> HandshakeType {
        match self {
            HandshakeMessage::ClientHello(_) => HandshakeType::ClientHello,
            HandshakeMessage::ServerHello(_) => HandshakeType::ServerHello,
            HandshakeMessage::Certificate(_) => HandshakeType::Certificate,
            HandshakeMessage::ServerKeyExchange(_) => HandshakeType::ServerKeyExchange,
            HandshakeMessage::ServerHelloDone => HandshakeType::ServerHelloDone,
            HandshakeMessage::ClientKeyExchange(_) => HandshakeType::ClientKeyExchange,
            HandshakeMessage::Finished(_) => HandshakeType::Finished,
        }
    }

    /// Encode this message with its 4-byte header.
    pub fn encode(&self) -> Vec<u8> {
        let body = match self {
            HandshakeMessage::ClientHello(m) => m.encode_body(),
            HandshakeMessage::ServerHello(m) => m.encode_body(),
            HandshakeMessage::Certificate(m) => m.encode_body(),
            HandshakeMessage::ServerKeyExchange(m) => m.encode_body(),
            HandshakeMessage::ServerHelloDone => Vec::new(),
            HandshakeMessage::ClientKeyExchange(m) => m.encode_body(),
            HandshakeMessage::Finished(m) => m.encode_body(),
        };
        encode_with_header(self.handshake_type(), &body)
    }

    /// Decode one handshake message (header + body) from the front of
    /// `data`. Returns the message and bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < HANDSHAKE_HEADER_SIZE {
            return Err(Error::InvalidMessage("Handshake header truncated".into()));
        }

        let type_byte = data[0];
        let length = u32::from_be_bytes([0, data[1], data[2], data[3]]) as usize;
        if data.len() < HANDSHAKE_HEADER_SIZE + length {
            return Err(Error::InvalidMessage("Handshake body truncated".into()));
        }

        let handshake_type = HandshakeType::from_u8(type_byte).ok_or_else(|| {
            Error::InvalidMessage(format!("Unknown handshake type: {}", type_byte))
        })?;
        let body = &data[HANDSHAKE_HEADER_SIZE..HANDSHAKE_HEADER_SIZE + length];

        let message = match handshake_type {
            HandshakeType::ClientHello => {
                HandshakeMessage::ClientHello(ClientHello::decode_body(body)?)
            },
            HandshakeType::ServerHello => {
                HandshakeMessage::ServerHello(ServerHello::decode_body(body)?)
            },
            HandshakeType::Certificate => {
                HandshakeMessage::Certificate(Certificate::decode_body(body)?)
            },
            HandshakeType::ServerKeyExchange => {
                HandshakeMessage::ServerKeyExchange(ServerKeyExchange::decode_body(body)?)
            },
            HandshakeType::ServerHelloDone => {
                if !body.is_empty() {
                    return Err(Error::InvalidMessage(
                        "ServerHelloDone must have an empty body".into(),
                    ));
                }
                HandshakeMessage::ServerHelloDone
            },
            HandshakeType::ClientKeyExchange => {
                HandshakeMessage::ClientKeyExchange(ClientKeyExchange::decode_body(body)?)
            },
            HandshakeType::Finished => HandshakeMessage::Finished(Finished::decode_body(body)?),
        };

        Ok((message, HANDSHAKE_HEADER_SIZE + length))
    }
}

/// Prepend the 4-byte handshake header to a message body.
pub fn encode_with_header(handshake_type: HandshakeType, body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HANDSHAKE_HEADER_SIZE + body.len());
    buf.push(handshake_type.to_u8());
    let len = body.len() as u32;
    buf.push((len >> 16) as u8);
    buf.push((len >> 8) as u8);
    buf.push(len as u8);
    buf.extend_from_slice(body);
    buf
}
