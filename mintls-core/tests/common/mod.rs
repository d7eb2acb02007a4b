//! In-memory duplex transport and synthetic credentials for end-to-end
//! handshake tests.

use mintls_core::key_manager::SingleCertKeyManager;
use mintls_crypto::{CryptoProvider, SignatureAlgorithm};
use std::io::{self, Read, Write};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Read half of an in-memory pipe. Blocks until the peer writes;
/// a dropped writer reads as EOF.
#[derive(Debug)]
pub struct PipeReader {
    receiver: Receiver<Vec<u8>>,
    buffer: Vec<u8>,
    position: usize,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position == self.buffer.len() {
            match self.receiver.recv() {
                Ok(chunk) => {
                    self.buffer = chunk;
                    self.position = 0;
                },
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.buffer.len() - self.position);
        buf[..n].copy_from_slice(&self.buffer[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

/// Write half of an in-memory pipe.
#[derive(Debug)]
pub struct PipeWriter {
    sender: Sender<Vec<u8>>,
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sender
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer hung up"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Build a connected pair of duplex endpoints, `(client, server)`, each a
/// `(read half, write half)` tuple.
pub fn duplex() -> ((PipeReader, PipeWriter), (PipeReader, PipeWriter)) {
    let (client_tx, server_rx) = channel();
    let (server_tx, client_rx) = channel();
    let client = (
        PipeReader {
            receiver: client_rx,
            buffer: Vec::new(),
            position: 0,
        },
        PipeWriter { sender: client_tx },
    );
    let server = (
        PipeReader {
            receiver: server_rx,
            buffer: Vec::new(),
            position: 0,
        },
        PipeWriter { sender: server_tx },
    );
    (client, server)
}

fn tlv(tag: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = contents.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xFF {
        out.push(0x81);
        out.push(len as u8);
    } else {
        out.push(0x82);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    }
    out.extend_from_slice(contents);
    out
}

/// Build a structurally valid DER certificate carrying `public_key` as its
/// subjectPublicKey. Chain validation is out of scope, so nothing signs it.
pub fn synthetic_certificate(public_key: &[u8]) -> Vec<u8> {
    const TAG_INTEGER: u8 = 0x02;
    const TAG_BIT_STRING: u8 = 0x03;
    const TAG_SEQUENCE: u8 = 0x30;
    const TAG_CONTEXT_0: u8 = 0xA0;

    let spki = tlv(TAG_SEQUENCE, &{
        let mut body = tlv(TAG_SEQUENCE, &[]);
        let mut bits = vec![0u8];
        bits.extend_from_slice(public_key);
        body.extend_from_slice(&tlv(TAG_BIT_STRING, &bits));
        body
    });

    let mut tbs_body = Vec::new();
    tbs_body.extend_from_slice(&tlv(TAG_CONTEXT_0, &tlv(TAG_INTEGER, &[2])));
    tbs_body.extend_from_slice(&tlv(TAG_INTEGER, &[1]));
    tbs_body.extend_from_slice(&tlv(TAG_SEQUENCE, &[]));
    tbs_body.extend_from_slice(&tlv(TAG_SEQUENCE, &[]));
    tbs_body.extend_from_slice(&tlv(TAG_SEQUENCE, &[]));
    tbs_body.extend_from_slice(&tlv(TAG_SEQUENCE, &[]));
    tbs_body.extend_from_slice(&spki);

    let mut cert_body = tlv(TAG_SEQUENCE, &tbs_body);
    cert_body.extend_from_slice(&tlv(TAG_SEQUENCE, &[]));
    cert_body.extend_from_slice(&tlv(TAG_BIT_STRING, &[0]));
    tlv(TAG_SEQUENCE, &cert_body)
}

/// Generate a fresh credential for `algorithm` and wrap it in a key manager.
pub fn test_key_manager(
    provider: &dyn CryptoProvider,
    algorithm: SignatureAlgorithm,
) -> SingleCertKeyManager {
    let scheme = provider.signature(algorithm).unwrap();
    let (signing_key, verifying_key) = scheme.generate_keypair().unwrap();
    let certificate = synthetic_certificate(verifying_key.as_bytes());
    SingleCertKeyManager::new(
        "server",
        algorithm,
        vec![certificate],
        signing_key.as_bytes().to_vec(),
    )
}
