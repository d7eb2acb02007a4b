//! Record stream I/O over blocking transports.
//!
//! One `read_record()` call yields exactly one record; EOF mid-record is a
//! fatal transport error. Writes frame, optionally encrypt, and flush.

use crate::error::{Error, Result};
use crate::protocol::{ContentType, ProtocolVersion};
use crate::record::{Record, MAX_FRAGMENT_SIZE, RECORD_HEADER_SIZE};
use crate::record_protection::RecordProtection;
use std::io::{Read, Write};

/// Reads records from a blocking transport, decrypting once read
/// protection is active.
///
/// Protection is staged with [`InputRecordStream::set_pending`] when keys
/// are derived, and activated when the peer's ChangeCipherSpec arrives.
#[derive(Debug)]
pub struct InputRecordStream<R: Read> {
    inner: R,
    protection: Option<RecordProtection>,
    pending: Option<RecordProtection>,
}

impl<R: Read> InputRecordStream<R> {
    /// Wrap a transport reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            protection: None,
            pending: None,
        }
    }

    /// Stage read protection for activation on the peer's ChangeCipherSpec.
    pub fn set_pending(&mut self, protection: RecordProtection) {
        self.pending = Some(protection);
    }

    /// Activate the staged read protection.
    pub fn activate_pending(&mut self) -> Result<()> {
        let pending = self.pending.take().ok_or_else(|| {
            Error::UnexpectedMessage("ChangeCipherSpec before key derivation".into())
        })?;
        self.protection = Some(pending);
        Ok(())
    }

    /// Whether read protection is currently active.
    pub fn is_protected(&self) -> bool {
        self.protection.is_some()
    }

    /// Read exactly one record, decrypting if protection is active.
    pub fn read_record(&mut self) -> Result<Record> {
        let mut header = [0u8; RECORD_HEADER_SIZE];
        self.inner.read_exact(&mut header)?;
        let (content_type, version, length) = Record::parse_header(&header)?;

        let mut payload = vec![0u8; length];
        self.inner.read_exact(&mut payload)?;

        if let Some(protection) = &mut self.protection {
            payload = protection.decrypt(content_type, version, &payload)?;
            if payload.len() > MAX_FRAGMENT_SIZE {
                return Err(Error::RecordOverflow);
            }
        }

        Ok(Record::new(content_type, version, payload))
    }
}

/// Writes records to a blocking transport, encrypting once write
/// protection is installed.
#[derive(Debug)]
pub struct OutputRecordStream<W: Write> {
    inner: W,
    protection: Option<RecordProtection>,
}

impl<W: Write> OutputRecordStream<W> {
    /// Wrap a transport writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            protection: None,
        }
    }

    /// Install write protection. Takes effect for the next record.
    pub fn install(&mut self, protection: RecordProtection) {
        self.protection = Some(protection);
    }

    /// Whether write protection is currently active.
    pub fn is_protected(&self) -> bool {
        self.protection.is_some()
    }

    /// Frame (and encrypt, if installed) one fragment, then write and flush.
    pub fn write_record(&mut self, content_type: ContentType, fragment: &[u8]) -> Result<()> {
        if fragment.len() > MAX_FRAGMENT_SIZE {
            return Err(Error::RecordOverflow);
        }
        let version = ProtocolVersion::Tls12;

        let payload = match &mut self.protection {
            Some(protection) => protection.encrypt(content_type, version, fragment)?,
            None => fragment.to_vec(),
        };

        let record = Record::new(content_type, version, payload);
        self.inner.write_all(&record.encode())?;
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher_suites::CipherSuite;
    use crate::key_schedule::split_key_block;
    use crate::record_protection::RecordProtection;
    use mintls_crypto::CryptoProvider;
    use mintls_crypto_rustcrypto::RustCryptoProvider;
    use std::io::Cursor;
    use std::sync::Arc;

    fn protection(suite: CipherSuite) -> RecordProtection {
        let provider: Arc<dyn CryptoProvider> = Arc::new(RustCryptoProvider::new());
        let key_block: Vec<u8> = (0..suite.key_block_length() as u32)
            .map(|i| i as u8)
            .collect();
        let keys = split_key_block(suite, &key_block).unwrap();
        RecordProtection::new(provider, suite, &keys.client).unwrap()
    }

    #[test]
    fn plaintext_write_then_read() {
        let mut wire = Vec::new();
        {
            let mut output = OutputRecordStream::new(&mut wire);
            output
                .write_record(ContentType::Handshake, b"client hello")
                .unwrap();
        }

        let mut input = InputRecordStream::new(Cursor::new(wire));
        let record = input.read_record().unwrap();
        assert_eq!(record.content_type, ContentType::Handshake);
        assert_eq!(record.payload, b"client hello");
    }

    #[test]
    fn protected_write_then_read() {
        let suite = CipherSuite::EcdheEcdsaAes128GcmSha256;
        let mut wire = Vec::new();
        {
            let mut output = OutputRecordStream::new(&mut wire);
            output.install(protection(suite));
            output
                .write_record(ContentType::ApplicationData, b"encrypted bytes")
                .unwrap();
        }

        let mut input = InputRecordStream::new(Cursor::new(wire));
        input.set_pending(protection(suite));
        input.activate_pending().unwrap();

        let record = input.read_record().unwrap();
        assert_eq!(record.payload, b"encrypted bytes");
    }

    #[test]
    fn pending_protection_is_inert_until_activated() {
        let suite = CipherSuite::EcdheEcdsaAes128GcmSha256;
        let mut wire = Vec::new();
        {
            let mut output = OutputRecordStream::new(&mut wire);
            output
                .write_record(ContentType::ChangeCipherSpec, &[1])
                .unwrap();
        }

        let mut input = InputRecordStream::new(Cursor::new(wire));
        input.set_pending(protection(suite));
        assert!(!input.is_protected());

        // CCS itself arrives unprotected
        let record = input.read_record().unwrap();
        assert_eq!(record.content_type, ContentType::ChangeCipherSpec);
        assert_eq!(record.payload, vec![1]);

        input.activate_pending().unwrap();
        assert!(input.is_protected());
    }

    #[test]
    fn activation_without_pending_is_an_error() {
        let mut input = InputRecordStream::new(Cursor::new(Vec::new()));
        assert!(matches!(
            input.activate_pending(),
            Err(Error::UnexpectedMessage(_))
        ));
    }

    #[test]
    fn eof_mid_record_is_fatal() {
        // header promises 10 payload bytes, transport delivers 3
        let mut wire = vec![22u8, 0x03, 0x03, 0, 10, 1, 2, 3];
        let mut input = InputRecordStream::new(Cursor::new(std::mem::take(&mut wire)));
        assert!(matches!(input.read_record(), Err(Error::IoError(_))));
    }

    #[test]
    fn oversized_outbound_fragment_is_rejected() {
        let mut wire = Vec::new();
        let mut output = OutputRecordStream::new(&mut wire);
        let oversized = vec![0u8; MAX_FRAGMENT_SIZE + 1];
        assert_eq!(
            output.write_record(ContentType::ApplicationData, &oversized),
            Err(Error::RecordOverflow)
        );
    }
}
