//! Protocol constants and wire-level enums.

/// TLS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ProtocolVersion {
    /// TLS 1.0 (legacy record version in some ClientHellos)
    Tls10 = 0x0301,
    /// TLS 1.1
    Tls11 = 0x0302,
    /// TLS 1.2
    Tls12 = 0x0303,
}

impl ProtocolVersion {
    /// Convert to wire format.
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Convert from wire format.
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0301 => Some(ProtocolVersion::Tls10),
            0x0302 => Some(ProtocolVersion::Tls11),
            0x0303 => Some(ProtocolVersion::Tls12),
            _ => None,
        }
    }
}

/// TLS record content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContentType {
    /// ChangeCipherSpec protocol
    ChangeCipherSpec = 20,
    /// Alert protocol
    Alert = 21,
    /// Handshake protocol
    Handshake = 22,
    /// Application data
    ApplicationData = 23,
}

impl ContentType {
    /// Convert to wire format.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from wire format.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            20 => Some(ContentType::ChangeCipherSpec),
            21 => Some(ContentType::Alert),
            22 => Some(ContentType::Handshake),
            23 => Some(ContentType::ApplicationData),
            _ => None,
        }
    }
}

/// TLS handshake message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandshakeType {
    /// ClientHello
    ClientHello = 1,
    /// ServerHello
    ServerHello = 2,
    /// Certificate
    Certificate = 11,
    /// ServerKeyExchange
    ServerKeyExchange = 12,
    /// ServerHelloDone
    ServerHelloDone = 14,
    /// ClientKeyExchange
    ClientKeyExchange = 16,
    /// Finished
    Finished = 20,
}

impl HandshakeType {
    /// Convert to wire format.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from wire format.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(HandshakeType::ClientHello),
            2 => Some(HandshakeType::ServerHello),
            11 => Some(HandshakeType::Certificate),
            12 => Some(HandshakeType::ServerKeyExchange),
            14 => Some(HandshakeType::ServerHelloDone),
            16 => Some(HandshakeType::ClientKeyExchange),
            20 => Some(HandshakeType::Finished),
            _ => None,
        }
    }
}

/// TLS extension type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ExtensionType {
    /// server_name (RFC 6066)
    ServerName = 0,
    /// supported_groups / elliptic_curves (RFC 8422)
    SupportedGroups = 10,
    /// ec_point_formats (RFC 8422)
    EcPointFormats = 11,
    /// signature_algorithms (RFC 5246)
    SignatureAlgorithms = 13,
    /// extended_master_secret (RFC 7627)
    ExtendedMasterSecret = 23,
    /// renegotiation_info (RFC 5746)
    RenegotiationInfo = 0xFF01,
}

impl ExtensionType {
    /// Convert to wire format.
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Convert from wire format.
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(ExtensionType::ServerName),
            10 => Some(ExtensionType::SupportedGroups),
            11 => Some(ExtensionType::EcPointFormats),
            13 => Some(ExtensionType::SignatureAlgorithms),
            23 => Some(ExtensionType::ExtendedMasterSecret),
            0xFF01 => Some(ExtensionType::RenegotiationInfo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_round_trip() {
        for ct in [
            ContentType::ChangeCipherSpec,
            ContentType::Alert,
            ContentType::Handshake,
            ContentType::ApplicationData,
        ] {
            assert_eq!(ContentType::from_u8(ct.to_u8()), Some(ct));
        }
        assert_eq!(ContentType::from_u8(0), None);
    }

    #[test]
    fn handshake_type_round_trip() {
        for ht in [
            HandshakeType::ClientHello,
            HandshakeType::ServerHello,
            HandshakeType::Certificate,
            HandshakeType::ServerKeyExchange,
            HandshakeType::ServerHelloDone,
            HandshakeType::ClientKeyExchange,
            HandshakeType::Finished,
        ] {
            assert_eq!(HandshakeType::from_u8(ht.to_u8()), Some(ht));
        }
        assert_eq!(HandshakeType::from_u8(99), None);
    }

    #[test]
    fn version_codepoints() {
        assert_eq!(ProtocolVersion::Tls12.to_u16(), 0x0303);
        assert_eq!(ProtocolVersion::from_u16(0x0304), None);
    }
}
