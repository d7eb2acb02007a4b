//! Server-side TLS 1.2 handshake.

use crate::cipher_suites::{default_cipher_suites, CipherSuite};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::extensions::{self, Extensions};
use crate::handshake::{alert_for_error, send_fatal_alert, HandshakeEvent, MessageReader};
use crate::key_manager::KeyManager;
use crate::key_schedule::SecretCollection;
use crate::messages::{
    Certificate, Finished, HandshakeMessage, ServerHello, ServerKeyExchange,
};
use crate::prf::Prf;
use crate::protocol::{ContentType, ExtensionType};
use crate::record_protection::RecordProtection;
use crate::record_stream::{InputRecordStream, OutputRecordStream};
use crate::transcript::HandshakeHash;
use mintls_crypto::{CryptoProvider, KeyExchangeAlgorithm};
use std::io::{Read, Write};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Server handshake configuration.
#[derive(Clone)]
pub struct ServerOptions {
    /// Cipher suites the server will accept. The client's preference order
    /// decides among these.
    pub cipher_suites: Vec<CipherSuite>,
    /// ECDHE groups the server will use, in preference order.
    pub supported_groups: Vec<KeyExchangeAlgorithm>,
    /// Source of certificate chains and signing keys.
    pub key_manager: Arc<dyn KeyManager>,
}

impl std::fmt::Debug for ServerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerOptions")
            .field("cipher_suites", &self.cipher_suites)
            .field("supported_groups", &self.supported_groups)
            .finish_non_exhaustive()
    }
}

impl ServerOptions {
    /// Options with the default suite and group lists.
    pub fn new(key_manager: Arc<dyn KeyManager>) -> Self {
        Self {
            cipher_suites: default_cipher_suites(),
            supported_groups: extensions::default_supported_groups(),
            key_manager,
        }
    }
}

/// Drives the server side of a TLS 1.2 handshake over a blocking transport.
pub struct ServerHandshaker<R: Read, W: Write> {
    provider: Arc<dyn CryptoProvider>,
    options: ServerOptions,
    input: InputRecordStream<R>,
    output: OutputRecordStream<W>,
    reader: MessageReader,
    transcript: HandshakeHash,
}

impl<R: Read, W: Write> std::fmt::Debug for ServerHandshaker<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandshaker")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: Read, W: Write> ServerHandshaker<R, W> {
    /// Create a server handshaker over a transport pair.
    pub fn new(
        provider: Arc<dyn CryptoProvider>,
        options: ServerOptions,
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
        let client_hello = match self.next_message()? {
            HandshakeMessage::ClientHello(ch) => ch,
            other => return Err(unexpected(&other)),
        };
        let client_random = client_hello.client_random;
        let ems_offered = client_hello
            .extensions
            .has(ExtensionType::ExtendedMasterSecret);

        // A malformed SNI is a decode error even though we serve a single
        // credential regardless of the requested name.
        if let Some(ext) = client_hello.extensions.get(ExtensionType::ServerName) {
            extensions::parse_server_name(ext)?;
        }

        // Absent supported_groups means the client takes whatever we pick.
        let client_groups = match client_hello.extensions.get(ExtensionType::SupportedGroups) {
            Some(ext) => extensions::parse_supported_groups(ext)?,
            None => self.options.supported_groups.clone(),
        };

        // The client's preference order decides, restricted to suites we
        // enable and can present a credential for.
        let usable: Vec<CipherSuite> = self
            .options
            .cipher_suites
            .iter()
            .copied()
            .filter(|suite| {
                self.options
                    .key_manager
                    .choose_alias(suite.signature_algorithm())
                    .is_some()
            })
            .collect();
        let suite = crate::cipher_suites::negotiate(&client_hello.cipher_suites, &usable)
            .ok_or_else(|| Error::HandshakeFailure("No cipher suite in common".into()))?;
        let alias = self
            .options
            .key_manager
            .choose_alias(suite.signature_algorithm())
            .ok_or_else(|| Error::InternalError("Credential vanished after selection".into()))?;
        self.transcript
            .set_algorithm(self.provider.as_ref(), suite.hash_algorithm())?;

        let group = self
            .options
            .supported_groups
            .iter()
            .copied()
            .find(|g| client_groups.contains(g))
            .ok_or_else(|| Error::HandshakeFailure("No key exchange group in common".into()))?;

        // --- ServerHello ---
        let mut server_random = [0u8; 32];
        self.provider.random().fill(&mut server_random)?;
        let session_id = self.provider.random().generate(32)?;

        let mut hello_extensions = Extensions::new();
        hello_extensions.add(extensions::renegotiation_info_extension());
        hello_extensions.add(extensions::ec_point_formats_extension());
        if ems_offered {
            hello_extensions.add(extensions::extended_master_secret_extension());
        }
        self.send_message(&HandshakeMessage::ServerHello(ServerHello {
            server_random,
            session_id,
            cipher_suite: suite.to_u16(),
            extensions: hello_extensions,
        }))?;

        // --- Certificate ---
        let chain = self
            .options
            .key_manager
            .certificate_chain(&alias)
            .ok_or_else(|| {
                Error::InternalError(format!("Key manager lost chain for alias {:?}", alias))
            })?;
        self.send_message(&HandshakeMessage::Certificate(Certificate { chain }))?;

        // --- ServerKeyExchange ---
        let kex = self.provider.key_exchange(group)?;
        let (private_key, public_key) = kex.generate_keypair()?;
        let signature_algorithm = suite.signature_algorithm();
        let mut ske = ServerKeyExchange {
            named_curve: group.to_u16(),
            public_key: public_key.into_bytes(),
            signature_algorithm: signature_algorithm.to_u16(),
            signature: Vec::new(),
        };
        let signing_key = self
            .options
            .key_manager
            .signing_key(&alias)
            .ok_or_else(|| {
                Error::InternalError(format!("Key manager lost key for alias {:?}", alias))
            })?;
        let scheme = self.provider.signature(signature_algorithm)?;
        ske.signature = scheme.sign(
            &signing_key,
            &ske.signed_payload(&client_random, &server_random),
        )?;
        self.send_message(&HandshakeMessage::ServerKeyExchange(ske))?;

        // --- ServerHelloDone ---
        self.send_message(&HandshakeMessage::ServerHelloDone)?;

        // --- ClientKeyExchange ---
        let cke = match self.next_message()? {
            HandshakeMessage::ClientKeyExchange(cke) => cke,
            other => return Err(unexpected(&other)),
        };
        let pre_master = kex.exchange(&private_key, &cke.public_key)?;

        // --- Key schedule ---
        let ems_active = ems_offered;
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
        self.input.set_pending(RecordProtection::new(
            Arc::clone(&self.provider),
            suite,
            &secrets.keys.client,
        )?);

        // --- Client ChangeCipherSpec and Finished ---
        match self.reader.next_event(&mut self.input)? {
            HandshakeEvent::ChangeCipherSpec => self.input.activate_pending()?,
            HandshakeEvent::Message(other, _) => return Err(unexpected(&other)),
        }

        let prf = Prf::new(self.provider.as_ref(), suite.hash_algorithm());
        let expected = prf.compute_verify_data(
            &secrets.master_secret,
            b"client finished",
            &self.transcript.current_hash()?,
        )?;
        match self.reader.next_event(&mut self.input)? {
            HandshakeEvent::Message(HandshakeMessage::Finished(finished), raw) => {
                if !bool::from(expected.ct_eq(&finished.verify_data)) {
                    return Err(Error::HandshakeFailure(
                        "Client Finished verification failed".into(),
                    ));
                }
                self.transcript.update(&raw);
            },
            HandshakeEvent::Message(other, _) => return Err(unexpected(&other)),
            HandshakeEvent::ChangeCipherSpec => {
                return Err(Error::UnexpectedMessage("Duplicate ChangeCipherSpec".into()))
            },
        }

        // --- ChangeCipherSpec and Finished ---
        self.output.write_record(ContentType::ChangeCipherSpec, &[1])?;
        self.output.install(RecordProtection::new(
            Arc::clone(&self.provider),
            suite,
            &secrets.keys.server,
        )?);

        let verify_data = prf.compute_verify_data(
            &secrets.master_secret,
            b"server finished",
            &self.transcript.current_hash()?,
        )?;
        self.send_message(&HandshakeMessage::Finished(Finished { verify_data }))?;

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
                "ChangeCipherSpec before ClientKeyExchange".into(),
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
