//! Minimal X.509 DER walk.
//!
//! Chain trust validation is out of scope; the handshake only needs the
//! leaf certificate's SubjectPublicKeyInfo to verify the ServerKeyExchange
//! signature. This walks the fixed TBSCertificate field order (RFC 5280
//! section 4.1) and returns the subjectPublicKey BIT STRING contents: an
//! uncompressed SEC1 point for ECDSA keys, PKCS#1 DER for RSA keys.

use crate::error::{Error, Result};

/// Extract the subject public key bytes from a DER certificate.
pub fn leaf_public_key(cert_der: &[u8]) -> Result<Vec<u8>> {
    let mut outer = DerReader::new(cert_der);
    // Certificate ::= SEQUENCE { tbsCertificate, signatureAlgorithm, signature }
    let mut cert = DerReader::new(outer.read_expected(TAG_SEQUENCE)?);
    let mut tbs = DerReader::new(cert.read_expected(TAG_SEQUENCE)?);

    // [0] EXPLICIT version is optional
    if tbs.peek_tag()? == TAG_CONTEXT_0 {
        tbs.read_tlv()?;
    }
    tbs.read_expected(TAG_INTEGER)?; // serialNumber
    tbs.read_expected(TAG_SEQUENCE)?; // signature AlgorithmIdentifier
    tbs.read_expected(TAG_SEQUENCE)?; // issuer
    tbs.read_expected(TAG_SEQUENCE)?; // validity
    tbs.read_expected(TAG_SEQUENCE)?; // subject

    // subjectPublicKeyInfo ::= SEQUENCE { algorithm, subjectPublicKey BIT STRING }
    let mut spki = DerReader::new(tbs.read_expected(TAG_SEQUENCE)?);
    spki.read_expected(TAG_SEQUENCE)?; // algorithm
    let bit_string = spki.read_expected(TAG_BIT_STRING)?;

    // Leading byte counts unused bits; always zero for whole-byte keys.
    match bit_string.split_first() {
        Some((0, key)) if !key.is_empty() => Ok(key.to_vec()),
        _ => Err(Error::CertificateError(
            "Malformed subjectPublicKey".into(),
        )),
    }
}

const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_CONTEXT_0: u8 = 0xA0;

/// Sequential reader over DER TLVs.
struct DerReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> DerReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn peek_tag(&self) -> Result<u8> {
        self.data
            .get(self.offset)
            .copied()
            .ok_or_else(|| Error::CertificateError("Truncated DER".into()))
    }

    /// Read one TLV, returning its contents.
    fn read_tlv(&mut self) -> Result<&'a [u8]> {
        let tag = self.peek_tag()?;
        let _ = tag;
        let len_byte = *self
            .data
            .get(self.offset + 1)
            .ok_or_else(|| Error::CertificateError("Truncated DER".into()))?;

        let (length, header_len) = if len_byte < 0x80 {
            (len_byte as usize, 2)
        } else {
            let num_len_bytes = (len_byte & 0x7F) as usize;
            if num_len_bytes == 0 || num_len_bytes > 4 {
                return Err(Error::CertificateError("Unsupported DER length".into()));
            }
            let end = self.offset + 2 + num_len_bytes;
            let bytes = self
                .data
                .get(self.offset + 2..end)
                .ok_or_else(|| Error::CertificateError("Truncated DER".into()))?;
            let mut length = 0usize;
            for &b in bytes {
                length = (length << 8) | b as usize;
            }
            (length, 2 + num_len_bytes)
        };

        let start = self.offset + header_len;
        let end = start + length;
        let contents = self
            .data
            .get(start..end)
            .ok_or_else(|| Error::CertificateError("Truncated DER".into()))?;
        self.offset = end;
        Ok(contents)
    }

    /// Read one TLV, requiring a specific tag.
    fn read_expected(&mut self, expected_tag: u8) -> Result<&'a [u8]> {
        let tag = self.peek_tag()?;
        if tag != expected_tag {
            return Err(Error::CertificateError(format!(
                "Expected DER tag {:#04x}, found {:#04x}",
                expected_tag, tag
            )));
        }
        self.read_tlv()
    }
}
