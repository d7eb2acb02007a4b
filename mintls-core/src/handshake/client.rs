//! Client-side TLS 1.2 handshake.

use crate::cipher_suites::{default_cipher_suites, CipherSuite};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::extensions::{self, Extensions};
use crate::handshake::{alert_for_error, send_fatal_alert, HandshakeEvent, MessageReader};
use crate::key_schedule::SecretCollection;
use crate::messages::{ClientHello, ClientKeyExchange, Finished, HandshakeMessage};
use crate::prf::Prf;
use crate::protocol::{ContentType, ExtensionType};
use crate::record_protection::RecordProtection;
use crate::record_stream::{InputRecordStream, OutputRecordStream};
use crate::transcript::HandshakeHash;
use crate::x509;
use mintls_crypto::{
    CryptoProvider, KeyExchangeAlgorithm, SignatureAlgorithm, VerifyingKey,
};
use std::io::{Read, Write};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Client handshake configuration.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Cipher suites to offer, in preference order.
    pub cipher_suites: Vec<CipherSuite>,
    /// Hostname for the server_name extension; omitted when `None`.
    pub server_name: Option<String>,
    /// ECDHE groups to offer, in preference order.
    pub supported_groups: Vec<KeyExchangeAlgorithm>,
    /// Signature algorithms accepted for the ServerKeyExchange signature.
    pub signature_algorithms: Vec<SignatureAlgorithm>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cipher_suites: default_cipher_suites(),
            server_name: None,
            supported_groups: extensions::default_supported_groups(),
            signature_algorithms: extensions::default_signature_algorithms(),
        }
    }
}

/// Drives the client side of a TLS 1.2 handshake over a blocking transport.
pub struct ClientHandshaker<R: Read, W: Write> {
    provider: Arc<dyn CryptoProvider>,
    options: ClientOptions,
    input: InputRecordStream<R>,
    output: OutputRecordStream<W>,
    reader: MessageReader,
    transcript: HandshakeHash,
}

impl<R: Read, W: Write> std::fmt::Debug for ClientHandshaker<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandshaker")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: Read, W: Write> ClientHandshaker<R, W> {
    /// Create a client handshaker over a transport pair.
    pub fn new(
        provider: Arc<dyn CryptoProvider>,
        options: ClientOptions,
        read_half: R,
        write_half: W,
    ) -> Result<Self> {
        if options.cipher_suites.is_empty() {
            return Err(Error::InvalidConfig("No cipher suites enabled".into()));
        }
        if options.supported_groups.is_empty() {
            return Err(Error::InvalidConfig("No key exchange groups enabled".into()));
        }
        Ok(Self {
            provider,
            options,
            input: InputRecordStream::new(read_half),
            output: OutputRecordStream::new(write_half),
            reader: MessageReader::new(),
            transcript: HandshakeHash::new(),
        })
    }

    /// Run the handshake to completion and return the established
    /// connection. On failure a fatal alert is sent best-effort before the
    /// error propagates.
    pub fn kickstart(mut self) -> Result<Connection<R, W>> {
        match self.run() {
            Ok(suite) => Ok(Connection::new(self.input, self.output, suite)),
            Err(err) => {
                if !matches!(err, Error::AlertReceived(_)) {
                    send_fatal_alert(&mut self.output, alert_for_error(&err));
                }
                Err(err)
            },
        }
    }

    fn run(&mut self) -> Result<CipherSuite> {
        // --- ClientHello ---
        let mut client_random = [0u8; 32];
        self.provider.random().fill(&mut client_random)?;
        let session_id = self.provider.random().generate(32)?;

        let mut hello_extensions = Extensions::new();
        if let Some(name) = &self.options.server_name {
            hello_extensions.add(extensions::server_name_extension(name));
        }
        hello_extensions.add(extensions::supported_groups_extension(
            &self.options.supported_groups,
        ));
        hello_extensions.add(extensions::ec_point_formats_extension());
        hello_extensions.add(extensions::signature_algorithms_extension(
            &self.options.signature_algorithms,
        ));
        hello_extensions.add(extensions::extended_master_secret_extension());
        hello_extensions.add(extensions::renegotiation_info_extension());

        let offered: Vec<u16> = self
            .options
            .cipher_suites
            .iter()
            .map(|s| s.to_u16())
            .collect();
        let client_hello = HandshakeMessage::ClientHello(ClientHello {
            client_random,
            session_id,
            cipher_suites: offered.clone(),
            extensions: hello_extensions,
        });
        self.send_message(&client_hello)?;

        // --- ServerHello ---
        let server_hello = match self.next_message()? {
            HandshakeMessage::ServerHello(sh) => sh,
            other => return Err(unexpected(&other)),
        };
        if !offered.contains(&server_hello.cipher_suite) {
            return Err(Error::HandshakeFailure(
                "Server selected a cipher suite we did not offer".into(),
            ));
        }
        let suite = CipherSuite::from_u16(server_hello.cipher_suite).ok_or_else(|| {
            Error::HandshakeFailure("Server selected an unknown cipher suite".into())
        })?;
        self.transcript
            .set_algorithm(self.provider.as_ref(), suite.hash_algorithm())?;
        let ems_active = server_hello
            .extensions
            .has(ExtensionType::ExtendedMasterSecret);
        let server_random = server_hello.server_random;

        // --- Certificate ---
        let certificate = match self.next_message()? {
            HandshakeMessage::Certificate(cert) => cert,
            other => return Err(unexpected(&other)),
        };
        let leaf_key = x509::leaf_public_key(certificate.leaf())?;

        // --- ServerKeyExchange ---
        let ske = match self.next_message()? {
            HandshakeMessage::ServerKeyExchange(ske) => ske,
            other => return Err(unexpected(&other)),
        };
        let group = KeyExchangeAlgorithm::from_u16(ske.named_curve)
            .filter(|g| self.options.supported_groups.contains(g))
            .ok_or_else(|| {
                Error::HandshakeFailure("Server chose a curve we did not offer".into())
            })?;
        let signature_algorithm = SignatureAlgorithm::from_u16(ske.signature_algorithm)
            .filter(|a| self.options.signature_algorithms.contains(a))
            .ok_or_else(|| {
                Error::HandshakeFailure(
                    "Server signed with an algorithm we did not offer".into(),
                )
            })?;
        let scheme = self.provider.signature(signature_algorithm)?;
        let signed = ske.signed_payload(&client_random, &server_random);
        scheme
            .verify(&VerifyingKey::from_bytes(leaf_key), &signed, &ske.signature)
            .map_err(|_| {
                Error::HandshakeFailure("ServerKeyExchange signature verification failed".into())
            })?;

        // --- ServerHelloDone ---
        match self.next_message()? {
            HandshakeMessage::ServerHelloDone => {},
            other => return Err(unexpected(&other)),
        }

        // --- ClientKeyExchange ---
        let kex = self.provider.key_exchange(group)?;
        let (private_key, public_key) = kex.generate_keypair()?;
        let cke = HandshakeMessage::ClientKeyExchange(ClientKeyExchange {
            public_key: public_key.into_bytes(),
        });
        self.send_message(&cke)?;
        let pre_master = kex.exchange(&private_key, &ske.public_key)?;

        // --- Key schedule ---
        // The extended master secret binds the transcript through the
        // ClientKeyExchange just sent.
        let session_hash = if ems_active {
            Some(self.transcript.current_hash()?)
        } else {
            None
        };
        let secrets = SecretCollection::derive(
            self.provider.as_ref(),
            suite,
            pre_master.as_bytes(),
            &client_random,
            &server_random,
            session_hash.as_deref(),
        )?;

        // --- ChangeCipherSpec and Finished ---
        self.output.write_record(ContentType::ChangeCipherSpec, &[1])?;
        self.output.install(RecordProtection::new(
            Arc::clone(&self.provider),
            suite,
            &secrets.keys.client,
        )?);
        self.input.set_pending(RecordProtection::new(
            Arc::clone(&self.provider),
            suite,
            &secrets.keys.server,
        )?);

        let verify_data = Prf::new(self.provider.as_ref(), suite.hash_algorithm())
            .compute_verify_data(
                &secrets.master_secret,
                b"client finished",
                &self.transcript.current_hash()?,
            )?;
        self.send_message(&HandshakeMessage::Finished(Finished { verify_data }))?;

        // --- Server ChangeCipherSpec and Finished ---
        match self.reader.next_event(&mut self.input)? {
            HandshakeEvent::ChangeCipherSpec => self.input.activate_pending()?,
            HandshakeEvent::Message(other, _) => return Err(unexpected(&other)),
        }

        let expected = Prf::new(self.provider.as_ref(), suite.hash_algorithm())
            .compute_verify_data(
                &secrets.master_secret,
                b"server finished",
                &self.transcript.current_hash()?,
            )?;
        match self.reader.next_event(&mut self.input)? {
            HandshakeEvent::Message(HandshakeMessage::Finished(finished), raw) => {
                if !bool::from(expected.ct_eq(&finished.verify_data)) {
                    return Err(Error::HandshakeFailure(
                        "Server Finished verification failed".into(),
                    ));
                }
                self.transcript.update(&raw);
            },
            HandshakeEvent::Message(other, _) => return Err(unexpected(&other)),
            HandshakeEvent::ChangeCipherSpec => {
                return Err(Error::UnexpectedMessage("Duplicate ChangeCipherSpec".into()))
            },
        }

        Ok(suite)
    }

    /// Encode, hash into the transcript, and send one handshake message.
    fn send_message(&mut self, message: &HandshakeMessage) -> Result<()> {
        let encoded = message.encode();
        self.transcript.update(&encoded);
        self.output.write_record(ContentType::Handshake, &encoded)
    }

    /// Read the next handshake message and hash it into the transcript.
    fn next_message(&mut self) -> Result<HandshakeMessage> {
        match self.reader.next_event(&mut self.input)? {
            HandshakeEvent::Message(message, raw) => {
                self.transcript.update(&raw);
                Ok(message)
            },
            HandshakeEvent::ChangeCipherSpec => Err(Error::UnexpectedMessage(
                "ChangeCipherSpec before server Finished flight".into(),
            )),
        }
    }
}

fn unexpected(message: &HandshakeMessage) -> Error {
    Error::UnexpectedMessage(format!(
        "Out-of-order handshake message {:?}",
        message.handshake_type()
    ))
}
