//! Signature schemes via `p256` (ECDSA) and `rsa` (PKCS#1 v1.5).

use mintls_crypto::{
    Error, Result, Signature, SignatureAlgorithm, SigningKey, VerifyingKey,
};
use p256::ecdsa::signature::{Signer, Verifier};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256};

/// ECDSA over P-256 with SHA-256. Signatures are DER-encoded; keys use the
/// raw scalar (signing) and uncompressed SEC1 point (verifying) encodings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EcdsaP256Sha256;

impl Signature for EcdsaP256Sha256 {
    fn sign(&self, key: &SigningKey, message: &[u8]) -> Result<Vec<u8>> {
        let signing_key = p256::ecdsa::SigningKey::from_slice(key.as_bytes())
            .map_err(|_| Error::InvalidPrivateKey)?;
        let signature: p256::ecdsa::Signature = signing_key.sign(message);
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify(&self, key: &VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()> {
        let verifying_key = p256::ecdsa::VerifyingKey::from_sec1_bytes(key.as_bytes())
            .map_err(|_| Error::InvalidPublicKey)?;
        let signature =
            p256::ecdsa::Signature::from_der(signature).map_err(|_| Error::InvalidSignature)?;
        verifying_key
            .verify(message, &signature)
            .map_err(|_| Error::SignatureVerificationFailed)
    }

    fn generate_keypair(&self) -> Result<(SigningKey, VerifyingKey)> {
        let signing_key = p256::ecdsa::SigningKey::random(&mut OsRng);
        let verifying_key = signing_key.verifying_key().to_encoded_point(false);
        Ok((
            SigningKey::from_bytes(signing_key.to_bytes().to_vec()),
            VerifyingKey::from_bytes(verifying_key.as_bytes().to_vec()),
        ))
    }

    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::EcdsaSecp256r1Sha256
    }
}

/// RSA PKCS#1 v1.5 with SHA-256. Keys are PKCS#1 DER-encoded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RsaPkcs1Sha256Scheme;

impl Signature for RsaPkcs1Sha256Scheme {
    fn sign(&self, key: &SigningKey, message: &[u8]) -> Result<Vec<u8>> {
        let private_key = rsa::RsaPrivateKey::from_pkcs1_der(key.as_bytes())
            .map_err(|_| Error::InvalidPrivateKey)?;
        let digest = Sha256::digest(message);
        private_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|_| Error::Internal("RSA signing failed".to_string()))
    }

    fn verify(&self, key: &VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()> {
        let public_key = rsa::RsaPublicKey::from_pkcs1_der(key.as_bytes())
            .map_err(|_| Error::InvalidPublicKey)?;
        let digest = Sha256::digest(message);
        public_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .map_err(|_| Error::SignatureVerificationFailed)
    }

    fn generate_keypair(&self) -> Result<(SigningKey, VerifyingKey)> {
        let private_key = rsa::RsaPrivateKey::new(&mut OsRng, 2048)
            .map_err(|_| Error::Internal("RSA key generation failed".to_string()))?;
        let public_key = rsa::RsaPublicKey::from(&private_key);

        let private_der = private_key
            .to_pkcs1_der()
            .map_err(|_| Error::Internal("RSA key encoding failed".to_string()))?;
        let public_der = public_key
            .to_pkcs1_der()
            .map_err(|_| Error::Internal("RSA key encoding failed".to_string()))?;
        Ok((
            SigningKey::from_bytes(private_der.as_bytes().to_vec()),
            VerifyingKey::from_bytes(public_der.as_bytes().to_vec()),
        ))
    }

    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::RsaPkcs1Sha256
    }
}
