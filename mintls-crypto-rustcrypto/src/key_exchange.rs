//! ECDHE key exchange via `x25519-dalek` and `p256`.

use mintls_crypto::{
    Error, KeyExchange, KeyExchangeAlgorithm, PrivateKey, PublicKey, Result, SharedSecret,
};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;

/// X25519 ephemeral Diffie-Hellman.
#[derive(Debug, Clone, Copy)]
pub(crate) struct X25519Exchange;

impl KeyExchange for X25519Exchange {
    fn generate_keypair(&self) -> Result<(PrivateKey, PublicKey)> {
        let secret = x25519_dalek::StaticSecret::random_from_rng(OsRng);
        let public = x25519_dalek::PublicKey::from(&secret);
        Ok((
            PrivateKey::from_bytes(secret.to_bytes().to_vec()),
            PublicKey::from_bytes(public.as_bytes().to_vec()),
        ))
    }

    fn exchange(&self, private_key: &PrivateKey, peer_public_key: &[u8]) -> Result<SharedSecret> {
        let secret_bytes: [u8; 32] = private_key
            .as_bytes()
            .try_into()
            .map_err(|_| Error::InvalidPrivateKey)?;
        let peer_bytes: [u8; 32] = peer_public_key
            .try_into()
            .map_err(|_| Error::InvalidPublicKey)?;

        let secret = x25519_dalek::StaticSecret::from(secret_bytes);
        let peer = x25519_dalek::PublicKey::from(peer_bytes);
        let shared = secret.diffie_hellman(&peer);

        // All-zero output means a low-order peer point.
        if shared.as_bytes().iter().all(|&b| b == 0) {
            return Err(Error::KeyExchangeFailed);
        }
        Ok(SharedSecret::from_bytes(shared.as_bytes().to_vec()))
    }

    fn algorithm(&self) -> KeyExchangeAlgorithm {
        KeyExchangeAlgorithm::X25519
    }
}

/// P-256 (secp256r1) ephemeral Diffie-Hellman.
#[derive(Debug, Clone, Copy)]
pub(crate) struct P256Exchange;

impl KeyExchange for P256Exchange {
    fn generate_keypair(&self) -> Result<(PrivateKey, PublicKey)> {
        let secret = p256::SecretKey::random(&mut OsRng);
        let point = secret.public_key().to_encoded_point(false);
        Ok((
            PrivateKey::from_bytes(secret.to_bytes().to_vec()),
            PublicKey::from_bytes(point.as_bytes().to_vec()),
        ))
    }

    fn exchange(&self, private_key: &PrivateKey, peer_public_key: &[u8]) -> Result<SharedSecret> {
        let secret = p256::SecretKey::from_slice(private_key.as_bytes())
            .map_err(|_| Error::InvalidPrivateKey)?;
        let peer = p256::PublicKey::from_sec1_bytes(peer_public_key)
            .map_err(|_| Error::InvalidPublicKey)?;

        let shared = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
        Ok(SharedSecret::from_bytes(
            shared.raw_secret_bytes().to_vec(),
        ))
    }

    fn algorithm(&self) -> KeyExchangeAlgorithm {
        KeyExchangeAlgorithm::Secp256r1
    }
}
