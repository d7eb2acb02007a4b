//! Public API round trip: configs, handshake, `std::io` stream semantics.

use mintls::{
    CipherSuite, ClientConfig, ServerConfig, SignatureAlgorithm, SingleCertKeyManager,
};
use mintls_crypto::CryptoProvider;
use mintls_crypto_rustcrypto::RustCryptoProvider;
use std::io::{self, Read, Write};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

struct PipeReader {
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

struct PipeWriter {
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

fn duplex() -> ((PipeReader, PipeWriter), (PipeReader, PipeWriter)) {
    let (client_tx, server_rx) = channel();
    let (server_tx, client_rx) = channel();
    (
        (
            PipeReader {
                receiver: client_rx,
                buffer: Vec::new(),
                position: 0,
            },
            PipeWriter { sender: client_tx },
        ),
        (
            PipeReader {
                receiver: server_rx,
                buffer: Vec::new(),
                position: 0,
            },
            PipeWriter { sender: server_tx },
        ),
    )
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

fn synthetic_certificate(public_key: &[u8]) -> Vec<u8> {
    let spki = tlv(0x30, &{
        let mut body = tlv(0x30, &[]);
        let mut bits = vec![0u8];
        bits.extend_from_slice(public_key);
        body.extend_from_slice(&tlv(0x03, &bits));
        body
    });

    let mut tbs_body = Vec::new();
    tbs_body.extend_from_slice(&tlv(0xA0, &tlv(0x02, &[2])));
    tbs_body.extend_from_slice(&tlv(0x02, &[1]));
    tbs_body.extend_from_slice(&tlv(0x30, &[]));
    tbs_body.extend_from_slice(&tlv(0x30, &[]));
    tbs_body.extend_from_slice(&tlv(0x30, &[]));
    tbs_body.extend_from_slice(&tlv(0x30, &[]));
    tbs_body.extend_from_slice(&spki);

    let mut cert_body = tlv(0x30, &tbs_body);
    cert_body.extend_from_slice(&tlv(0x30, &[]));
    cert_body.extend_from_slice(&tlv(0x03, &[0]));
    tlv(0x30, &cert_body)
}

fn test_server_config() -> ServerConfig {
    let provider = RustCryptoProvider::new();
    let scheme = provider
        .signature(SignatureAlgorithm::EcdsaSecp256r1Sha256)
        .unwrap();
    let (signing_key, verifying_key) = scheme.generate_keypair().unwrap();
    let key_manager = Arc::new(SingleCertKeyManager::new(
        "server",
        SignatureAlgorithm::EcdsaSecp256r1Sha256,
        vec![synthetic_certificate(verifying_key.as_bytes())],
        signing_key.as_bytes().to_vec(),
    ));
    ServerConfig::builder(key_manager).build().unwrap()
}

#[test]
fn stream_round_trip() {
    let ((client_read, client_write), (server_read, server_write)) = duplex();
    let server_config = test_server_config();

    let server = thread::spawn(move || {
        let mut tls = server_config.accept(server_read, server_write).unwrap();
        let mut line = vec![0u8; 5];
        tls.read_exact(&mut line).unwrap();
        assert_eq!(&line, b"hello");
        tls.write_all(b"world").unwrap();

        let mut rest = Vec::new();
        tls.read_to_end(&mut rest).unwrap();
        assert!(rest.is_empty());
    });

    let config = ClientConfig::builder()
        .server_name("localhost")
        .build()
        .unwrap();
    let mut tls = config.connect(client_read, client_write).unwrap();

    tls.write_all(b"hello").unwrap();
    let mut reply = vec![0u8; 5];
    tls.read_exact(&mut reply).unwrap();
    assert_eq!(&reply, b"world");

    tls.close().unwrap();
    server.join().unwrap();
}

#[test]
fn short_reads_never_lose_data() {
    let ((client_read, client_write), (server_read, server_write)) = duplex();
    let server_config = test_server_config();

    let server = thread::spawn(move || {
        let mut tls = server_config.accept(server_read, server_write).unwrap();
        tls.write_all(b"0123456789").unwrap();
        tls.close().unwrap();
    });

    let config = ClientConfig::builder().build().unwrap();
    let mut tls = config.connect(client_read, client_write).unwrap();

    // drain one byte at a time across fragment boundaries
    let mut collected = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match tls.read(&mut byte).unwrap() {
            0 => break,
            n => collected.extend_from_slice(&byte[..n]),
        }
    }
    assert_eq!(collected, b"0123456789");

    server.join().unwrap();
}

#[test]
fn configured_suite_is_negotiated() {
    let ((client_read, client_write), (server_read, server_write)) = duplex();
    let server_config = test_server_config();

    let server = thread::spawn(move || {
        let tls = server_config.accept(server_read, server_write).unwrap();
        tls.cipher_suite()
    });

    let config = ClientConfig::builder()
        .cipher_suites(vec![CipherSuite::EcdheEcdsaChaCha20Poly1305])
        .build()
        .unwrap();
    let tls = config.connect(client_read, client_write).unwrap();

    assert_eq!(tls.cipher_suite(), CipherSuite::EcdheEcdsaChaCha20Poly1305);
    assert_eq!(
        server.join().unwrap(),
        CipherSuite::EcdheEcdsaChaCha20Poly1305
    );
}
