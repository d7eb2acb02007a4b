//! Established TLS connection: application data, alerts, shutdown.

use crate::alert::{Alert, AlertDescription, AlertLevel};
use crate::cipher_suites::CipherSuite;
use crate::error::{Error, Result};
use crate::protocol::ContentType;
use crate::record::MAX_FRAGMENT_SIZE;
use crate::record_stream::{InputRecordStream, OutputRecordStream};
use std::io::{Read, Write};

/// A TLS 1.2 connection after a completed handshake.
///
/// All records in both directions are protected. Renegotiation is not
/// supported; a handshake record after establishment is a fatal error.
#[derive(Debug)]
pub struct Connection<R: Read, W: Write> {
    input: InputRecordStream<R>,
    output: OutputRecordStream<W>,
    suite: CipherSuite,
    closed: bool,
}

impl<R: Read, W: Write> Connection<R, W> {
    pub(crate) fn new(
        input: InputRecordStream<R>,
        output: OutputRecordStream<W>,
        suite: CipherSuite,
    ) -> Self {
        Self {
            input,
            output,
            suite,
            closed: false,
        }
    }

    /// The cipher suite negotiated for this connection.
    pub fn cipher_suite(&self) -> CipherSuite {
        self.suite
    }

    /// Read one application data fragment.
    ///
    /// Returns an empty vector once the peer sends close_notify. Warning
    /// alerts other than close_notify are ignored.
    pub fn read(&mut self) -> Result<Vec<u8>> {
        if self.closed {
            return Ok(Vec::new());
        }
        loop {
            let record = self.input.read_record()?;
            match record.content_type {
                ContentType::ApplicationData => {
                    // Empty fragments are legal; skip them.
                    if record.payload.is_empty() {
                        continue;
                    }
                    return Ok(record.payload);
                },
                ContentType::Alert => {
                    let alert = Alert::decode(&record.payload)?;
                    if alert.description == AlertDescription::CloseNotify {
                        self.closed = true;
                        return Ok(Vec::new());
                    }
                    if alert.level == AlertLevel::Fatal {
                        self.closed = true;
                        return Err(Error::AlertReceived(alert.description));
                    }
                },
                ContentType::Handshake => {
                    self.send_alert(Alert::fatal(AlertDescription::NoRenegotiation));
                    self.closed = true;
                    return Err(Error::UnexpectedMessage(
                        "Renegotiation is not supported".into(),
                    ));
                },
                ContentType::ChangeCipherSpec => {
                    self.closed = true;
                    return Err(Error::UnexpectedMessage(
                        "ChangeCipherSpec after handshake completion".into(),
                    ));
                },
            }
        }
    }

    /// Write application data, fragmenting as needed.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::IoError("Connection is closed".into()));
        }
        for chunk in data.chunks(MAX_FRAGMENT_SIZE) {
            self.output
                .write_record(ContentType::ApplicationData, chunk)?;
        }
        Ok(())
    }

    /// Send close_notify and mark the connection closed.
    pub fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.output
                .write_record(ContentType::Alert, &Alert::close_notify().encode())?;
        }
        Ok(())
    }

    fn send_alert(&mut self, alert: Alert) {
        let _ = self
            .output
            .write_record(ContentType::Alert, &alert.encode());
    }
}
