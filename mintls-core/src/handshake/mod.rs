//! Handshake state machines for both roles.
//!
//! Each handshaker owns its record streams and drives the handshake to
//! completion synchronously via `kickstart()`. Any failure is fatal: a
//! best-effort alert goes out and the error propagates to the caller.

pub mod client;
pub mod server;

use crate::alert::{Alert, AlertDescription};
use crate::error::{Error, Result};
use crate::messages::HandshakeMessage;
use crate::protocol::ContentType;
use crate::record_stream::{InputRecordStream, OutputRecordStream};
use std::io::{Read, Write};

/// What the peer sent next, at handshake granularity.
///
/// Messages carry their raw bytes (header included) for the transcript.
#[derive(Debug)]
pub(crate) enum HandshakeEvent {
    /// A complete handshake message.
    Message(HandshakeMessage, Vec<u8>),
    /// The peer's ChangeCipherSpec.
    ChangeCipherSpec,
}

/// Reassembles handshake messages from records.
///
/// A server flight may coalesce several messages into one record, or (in
/// principle) split one message across records; this buffers until exactly
/// one message is available.
#[derive(Debug, Default)]
pub(crate) struct MessageReader {
    pending: Vec<u8>,
}

impl MessageReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Read the next handshake event, pulling records as needed.
    pub(crate) fn next_event<R: Read>(
        &mut self,
        input: &mut InputRecordStream<R>,
    ) -> Result<HandshakeEvent> {
        loop {
            if self.pending.len() >= 4 {
                let body_len = u32::from_be_bytes([
                    0,
                    self.pending[1],
                    self.pending[2],
                    self.pending[3],
                ]) as usize;
                if self.pending.len() >= 4 + body_len {
                    let raw: Vec<u8> = self.pending.drain(..4 + body_len).collect();
                    let (message, consumed) = HandshakeMessage::decode(&raw)?;
                    debug_assert_eq!(consumed, raw.len());
                    return Ok(HandshakeEvent::Message(message, raw));
                }
            }

            let record = input.read_record()?;
            match record.content_type {
                ContentType::Handshake => {
                    if record.payload.is_empty() {
                        return Err(Error::InvalidMessage("Empty handshake record".into()));
                    }
                    self.pending.extend_from_slice(&record.payload);
                },
                ContentType::ChangeCipherSpec => {
                    if !self.pending.is_empty() {
                        return Err(Error::UnexpectedMessage(
                            "ChangeCipherSpec inside a handshake message".into(),
                        ));
                    }
                    if record.payload != [1] {
                        return Err(Error::InvalidMessage(
                            "Malformed ChangeCipherSpec".into(),
                        ));
                    }
                    return Ok(HandshakeEvent::ChangeCipherSpec);
                },
                ContentType::Alert => {
                    let alert = Alert::decode(&record.payload)?;
                    // Any alert before the handshake completes kills it,
                    // close_notify included.
                    return Err(Error::AlertReceived(alert.description));
                },
                ContentType::ApplicationData => {
                    return Err(Error::UnexpectedMessage(
                        "Application data during handshake".into(),
                    ));
                },
            }
        }
    }
}

/// Best-effort fatal alert; transport failures at this point are ignored
/// since the connection is already dead.
pub(crate) fn send_fatal_alert<W: Write>(
    output: &mut OutputRecordStream<W>,
    description: AlertDescription,
) {
    let alert = Alert::fatal(description);
    let _ = output.write_record(ContentType::Alert, &alert.encode());
}

/// Map a handshake error to the alert we announce before closing.
pub(crate) fn alert_for_error(err: &Error) -> AlertDescription {
    match err {
        Error::InvalidMessage(_) => AlertDescription::DecodeError,
        Error::UnexpectedMessage(_) => AlertDescription::UnexpectedMessage,
        Error::HandshakeFailure(_) => AlertDescription::HandshakeFailure,
        Error::UnsupportedFeature(_) => AlertDescription::HandshakeFailure,
        Error::DecryptionFailed => AlertDescription::BadRecordMac,
        Error::RecordOverflow => AlertDescription::RecordOverflow,
        Error::CertificateError(_) => AlertDescription::BadCertificate,
        _ => AlertDescription::InternalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Finished;
    use crate::protocol::ProtocolVersion;
    use crate::record::Record;
    use std::io::Cursor;

    fn record_bytes(content_type: ContentType, payload: Vec<u8>) -> Vec<u8> {
        Record::new(content_type, ProtocolVersion::Tls12, payload).encode()
    }

    #[test]
    fn coalesced_messages_in_one_record() {
        let mut payload = HandshakeMessage::ServerHelloDone.encode();
        payload.extend_from_slice(
            &HandshakeMessage::Finished(Finished {
                verify_data: vec![7u8; 12],
            })
            .encode(),
        );
        let wire = record_bytes(ContentType::Handshake, payload);

        let mut input = InputRecordStream::new(Cursor::new(wire));
        let mut reader = MessageReader::new();

        match reader.next_event(&mut input).unwrap() {
            HandshakeEvent::Message(HandshakeMessage::ServerHelloDone, raw) => {
                assert_eq!(raw.len(), 4);
            },
            other => panic!("expected ServerHelloDone, got {:?}", other),
        }
        match reader.next_event(&mut input).unwrap() {
            HandshakeEvent::Message(HandshakeMessage::Finished(_), raw) => {
                assert_eq!(raw.len(), 16);
            },
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn message_split_across_records() {
        let message = HandshakeMessage::Finished(Finished {
            verify_data: vec![9u8; 12],
        })
        .encode();
        let mut wire = record_bytes(ContentType::Handshake, message[..5].to_vec());
        wire.extend_from_slice(&record_bytes(ContentType::Handshake, message[5..].to_vec()));

        let mut input = InputRecordStream::new(Cursor::new(wire));
        let mut reader = MessageReader::new();
        match reader.next_event(&mut input).unwrap() {
            HandshakeEvent::Message(HandshakeMessage::Finished(f), _) => {
                assert_eq!(f.verify_data, vec![9u8; 12]);
            },
            other => panic!("expected Finished, got {:?}", other),
        }
    }

    #[test]
    fn change_cipher_spec_event() {
        let wire = record_bytes(ContentType::ChangeCipherSpec, vec![1]);
        let mut input = InputRecordStream::new(Cursor::new(wire));
        let mut reader = MessageReader::new();
        assert!(matches!(
            reader.next_event(&mut input).unwrap(),
            HandshakeEvent::ChangeCipherSpec
        ));
    }

    #[test]
    fn ccs_inside_partial_message_is_rejected() {
        let message = HandshakeMessage::ServerHelloDone.encode();
        let mut wire = record_bytes(ContentType::Handshake, message[..2].to_vec());
        wire.extend_from_slice(&record_bytes(ContentType::ChangeCipherSpec, vec![1]));

        let mut input = InputRecordStream::new(Cursor::new(wire));
        let mut reader = MessageReader::new();
        assert!(matches!(
            reader.next_event(&mut input),
            Err(Error::UnexpectedMessage(_))
        ));
    }

    #[test]
    fn alert_during_handshake_is_fatal() {
        let wire = record_bytes(ContentType::Alert, vec![2, 40]);
        let mut input = InputRecordStream::new(Cursor::new(wire));
        let mut reader = MessageReader::new();
        assert_eq!(
            reader.next_event(&mut input).unwrap_err(),
            Error::AlertReceived(AlertDescription::HandshakeFailure)
        );
    }

    #[test]
    fn application_data_during_handshake_is_rejected() {
        let wire = record_bytes(ContentType::ApplicationData, vec![0xAA]);
        let mut input = InputRecordStream::new(Cursor::new(wire));
        let mut reader = MessageReader::new();
        assert!(matches!(
            reader.next_event(&mut input),
            Err(Error::UnexpectedMessage(_))
        ));
    }
}
