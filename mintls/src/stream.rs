//! `std::io` adapter over an established connection.

use mintls_core::cipher_suites::CipherSuite;
use mintls_core::{Connection, Error};
use std::io::{self, Read, Write};

/// A TLS session exposed through `std::io::Read` and `std::io::Write`.
///
/// Reads buffer one decrypted fragment at a time, so short reads never lose
/// data. A clean close_notify from the peer reads as EOF.
#[derive(Debug)]
pub struct TlsStream<R: Read, W: Write> {
    connection: Connection<R, W>,
    read_buffer: Vec<u8>,
    read_position: usize,
}

impl<R: Read, W: Write> TlsStream<R, W> {
    pub(crate) fn new(connection: Connection<R, W>) -> Self {
        Self {
            connection,
            read_buffer: Vec::new(),
            read_position: 0,
        }
    }

    /// The cipher suite negotiated for this session.
    pub fn cipher_suite(&self) -> CipherSuite {
        self.connection.cipher_suite()
    }

    /// Send close_notify. Further writes fail; reads return EOF once the
    /// peer acknowledges.
    pub fn close(&mut self) -> io::Result<()> {
        self.connection.close().map_err(into_io_error)
    }
}

impl<R: Read, W: Write> Read for TlsStream<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.read_position == self.read_buffer.len() {
            let fragment = self.connection.read().map_err(into_io_error)?;
            if fragment.is_empty() {
                return Ok(0);
            }
            self.read_buffer = fragment;
            self.read_position = 0;
        }
        let n = buf.len().min(self.read_buffer.len() - self.read_position);
        buf[..n].copy_from_slice(&self.read_buffer[self.read_position..self.read_position + n]);
        self.read_position += n;
        Ok(n)
    }
}

impl<R: Read, W: Write> Write for TlsStream<R, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.connection.write(buf).map_err(into_io_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // write_record already flushes the transport after every record
        Ok(())
    }
}

fn into_io_error(err: Error) -> io::Error {
    match err {
        Error::IoError(message) => io::Error::new(io::ErrorKind::Other, message),
        other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
    }
}
