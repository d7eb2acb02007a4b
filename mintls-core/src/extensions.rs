//! TLS extensions: container plus the builders and parsers used by the
//! TLS 1.2 handshake.

use crate::error::{Error, Result};
use crate::protocol::ExtensionType;
use bytes::{Buf, BufMut, BytesMut};
use mintls_crypto::{KeyExchangeAlgorithm, SignatureAlgorithm};

/// TLS extension.
///
/// The type is kept as a raw codepoint so unknown extensions are carried
/// opaquely instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// Extension type codepoint.
    pub extension_type: u16,

    /// Extension data.
    pub data: Vec<u8>,
}

impl Extension {
    /// Create a new extension.
    pub fn new(extension_type: ExtensionType, data: Vec<u8>) -> Self {
        Self {
            extension_type: extension_type.to_u16(),
            data,
        }
    }

    /// Encode the extension to bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.data.len());
        buf.extend_from_slice(&self.extension_type.to_be_bytes());
        buf.extend_from_slice(&(self.data.len() as u16).to_be_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Decode an extension from bytes. Returns the extension and the number
    /// of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 4 {
            return Err(Error::InvalidMessage("Extension too short".into()));
        }

        let extension_type = u16::from_be_bytes([data[0], data[1]]);
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;

        if data.len() < 4 + length {
            return Err(Error::InvalidMessage("Incomplete extension data".into()));
        }

        Ok((
            Self {
                extension_type,
                data: data[4..4 + length].to_vec(),
            },
            4 + length,
        ))
    }
}

/// Extension list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    extensions: Vec<Extension>,
}

impl Extensions {
    /// Create a new empty extension list.
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// Add an extension.
    pub fn add(&mut self, extension: Extension) {
        self.extensions.push(extension);
    }

    /// Get an extension by type.
    pub fn get(&self, ext_type: ExtensionType) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|e| e.extension_type == ext_type.to_u16())
    }

    /// Check if an extension is present.
    pub fn has(&self, ext_type: ExtensionType) -> bool {
        self.get(ext_type).is_some()
    }

    /// Encode all extensions with the leading 2-byte total length.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for ext in &self.extensions {
            buf.extend_from_slice(&ext.encode());
        }

        let mut result = Vec::with_capacity(2 + buf.len());
        result.extend_from_slice(&(buf.len() as u16).to_be_bytes());
        result.extend_from_slice(&buf);
        result
    }

    /// Decode extensions from bytes. Returns the list and bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 2 {
            return Err(Error::InvalidMessage("Extensions too short".into()));
        }

        let total_length = u16::from_be_bytes([data[0], data[1]]) as usize;
        if data.len() < 2 + total_length {
            return Err(Error::InvalidMessage("Incomplete extensions".into()));
        }

        let mut extensions = Vec::new();
        let mut offset = 2;
        while offset < 2 + total_length {
            let (ext, consumed) = Extension::decode(&data[offset..2 + total_length])?;
            extensions.push(ext);
            offset += consumed;
        }

        Ok((Self { extensions }, 2 + total_length))
    }

    /// Get the number of extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check if the extension list is empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Build the supported_groups (elliptic_curves) extension.
pub fn supported_groups_extension(groups: &[KeyExchangeAlgorithm]) -> Extension {
    let mut buf = BytesMut::with_capacity(2 + groups.len() * 2);
    buf.put_u16((groups.len() * 2) as u16);
    for group in groups {
        buf.put_u16(group.to_u16());
    }
    Extension::new(ExtensionType::SupportedGroups, buf.to_vec())
}

/// Parse the supported_groups extension. Unknown codepoints are skipped.
pub fn parse_supported_groups(ext: &Extension) -> Result<Vec<KeyExchangeAlgorithm>> {
    let mut buf = &ext.data[..];
    if buf.remaining() < 2 {
        return Err(Error::InvalidMessage("supported_groups too short".into()));
    }
    let list_len = buf.get_u16() as usize;
    if list_len % 2 != 0 || buf.remaining() < list_len {
        return Err(Error::InvalidMessage("Malformed supported_groups".into()));
    }

    let mut groups = Vec::new();
    for _ in 0..list_len / 2 {
        if let Some(group) = KeyExchangeAlgorithm::from_u16(buf.get_u16()) {
            groups.push(group);
        }
    }
    Ok(groups)
}

/// Build the signature_algorithms extension.
pub fn signature_algorithms_extension(algorithms: &[SignatureAlgorithm]) -> Extension {
    let mut buf = BytesMut::with_capacity(2 + algorithms.len() * 2);
    buf.put_u16((algorithms.len() * 2) as u16);
    for alg in algorithms {
        buf.put_u16(alg.to_u16());
    }
    Extension::new(ExtensionType::SignatureAlgorithms, buf.to_vec())
}

/// Parse the signature_algorithms extension. Unknown codepoints are skipped.
pub fn parse_signature_algorithms(ext: &Extension) -> Result<Vec<SignatureAlgorithm>> {
    let mut buf = &ext.data[..];
    if buf.remaining() < 2 {
        return Err(Error::InvalidMessage(
            "signature_algorithms too short".into(),
        ));
    }
    let list_len = buf.get_u16() as usize;
    if list_len % 2 != 0 || buf.remaining() < list_len {
        return Err(Error::InvalidMessage(
            "Malformed signature_algorithms".into(),
        ));
    }

    let mut algorithms = Vec::new();
    for _ in 0..list_len / 2 {
        if let Some(alg) = SignatureAlgorithm::from_u16(buf.get_u16()) {
            algorithms.push(alg);
        }
    }
    Ok(algorithms)
}

/// Build the ec_point_formats extension (uncompressed only).
pub fn ec_point_formats_extension() -> Extension {
    Extension::new(ExtensionType::EcPointFormats, vec![0x01, 0x00])
}

/// Build the server_name (SNI) extension with a single host_name entry.
pub fn server_name_extension(hostname: &str) -> Extension {
    let name = hostname.as_bytes();
    let mut buf = BytesMut::with_capacity(5 + name.len());
    buf.put_u16((3 + name.len()) as u16); // server_name_list length
    buf.put_u8(0); // name_type: host_name
    buf.put_u16(name.len() as u16);
    buf.put_slice(name);
    Extension::new(ExtensionType::ServerName, buf.to_vec())
}

/// Parse the server_name extension, returning the first host_name entry.
pub fn parse_server_name(ext: &Extension) -> Result<String> {
    let mut buf = &ext.data[..];
    if buf.remaining() < 5 {
        return Err(Error::InvalidMessage("server_name too short".into()));
    }
    let _list_len = buf.get_u16();
    let name_type = buf.get_u8();
    if name_type != 0 {
        return Err(Error::InvalidMessage("Unknown server_name type".into()));
    }
    let name_len = buf.get_u16() as usize;
    if buf.remaining() < name_len {
        return Err(Error::InvalidMessage("Malformed server_name".into()));
    }
    String::from_utf8(buf[..name_len].to_vec())
        .map_err(|_| Error::InvalidMessage("server_name is not UTF-8".into()))
}

/// Build the extended_master_secret extension (RFC 7627, empty body).
pub fn extended_master_secret_extension() -> Extension {
    Extension::new(ExtensionType::ExtendedMasterSecret, Vec::new())
}

/// Build the renegotiation_info extension. Always the initial-handshake
/// form: a zero-length renegotiated_connection field.
pub fn renegotiation_info_extension() -> Extension {
    Extension::new(ExtensionType::RenegotiationInfo, vec![0x00])
}

/// Default supported groups, in preference order.
pub fn default_supported_groups() -> Vec<KeyExchangeAlgorithm> {
    vec![
        KeyExchangeAlgorithm::X25519,
        KeyExchangeAlgorithm::Secp256r1,
    ]
}

/// Default signature algorithms, in preference order.
pub fn default_signature_algorithms() -> Vec<SignatureAlgorithm> {
    vec![
        SignatureAlgorithm::EcdsaSecp256r1Sha256,
        SignatureAlgorithm::RsaPkcs1Sha256,
    ]
}
