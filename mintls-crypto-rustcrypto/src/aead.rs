//! AEAD ciphers via `aes-gcm` and `chacha20poly1305`.

use aes_gcm::{
    aead::{Aead as _, KeyInit, Payload},
    Aes128Gcm, Aes256Gcm, Nonce,
};
use chacha20poly1305::ChaCha20Poly1305;
use mintls_crypto::{Aead, AeadAlgorithm, Error, Result};

fn check_sizes(algorithm: AeadAlgorithm, key: &[u8], nonce: &[u8]) -> Result<()> {
    if key.len() != algorithm.key_size() {
        return Err(Error::InvalidKeySize {
            expected: algorithm.key_size(),
            actual: key.len(),
        });
    }
    if nonce.len() != algorithm.nonce_size() {
        return Err(Error::InvalidNonceSize {
            expected: algorithm.nonce_size(),
            actual: nonce.len(),
        });
    }
    Ok(())
}

macro_rules! aead_impl {
    ($name:ident, $cipher:ty, $algorithm:expr) => {
        #[derive(Debug, Clone, Copy)]
        pub(crate) struct $name;

        impl Aead for $name {
            fn seal(
                &self,
                key: &[u8],
                nonce: &[u8],
                aad: &[u8],
                plaintext: &[u8],
            ) -> Result<Vec<u8>> {
                check_sizes($algorithm, key, nonce)?;
                let cipher = <$cipher>::new_from_slice(key)
                    .map_err(|_| Error::InvalidKeySize {
                        expected: $algorithm.key_size(),
                        actual: key.len(),
                    })?;
                cipher
                    .encrypt(
                        Nonce::from_slice(nonce),
                        Payload {
                            msg: plaintext,
                            aad,
                        },
                    )
                    .map_err(|_| Error::EncryptionFailed)
            }

            fn open(
                &self,
                key: &[u8],
                nonce: &[u8],
                aad: &[u8],
                ciphertext: &[u8],
            ) -> Result<Vec<u8>> {
                check_sizes($algorithm, key, nonce)?;
                let cipher = <$cipher>::new_from_slice(key)
                    .map_err(|_| Error::InvalidKeySize {
                        expected: $algorithm.key_size(),
                        actual: key.len(),
                    })?;
                cipher
                    .decrypt(
                        Nonce::from_slice(nonce),
                        Payload {
                            msg: ciphertext,
                            aad,
                        },
                    )
                    .map_err(|_| Error::AuthenticationFailed)
            }

            fn algorithm(&self) -> AeadAlgorithm {
                $algorithm
            }
        }
    };
}

aead_impl!(Aes128GcmCipher, Aes128Gcm, AeadAlgorithm::Aes128Gcm);
aead_impl!(Aes256GcmCipher, Aes256Gcm, AeadAlgorithm::Aes256Gcm);
aead_impl!(
    ChaCha20Poly1305Cipher,
    ChaCha20Poly1305,
    AeadAlgorithm::ChaCha20Poly1305
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_round_trip() {
        for cipher in [
            Box::new(Aes128GcmCipher) as Box<dyn Aead>,
            Box::new(Aes256GcmCipher),
            Box::new(ChaCha20Poly1305Cipher),
        ] {
            let key = vec![0x42u8; cipher.key_size()];
            let nonce = vec![0x24u8; cipher.nonce_size()];
            let aad = b"header";
            let sealed = cipher.seal(&key, &nonce, aad, b"payload").unwrap();
            assert_eq!(sealed.len(), 7 + cipher.tag_size());

            let opened = cipher.open(&key, &nonce, aad, &sealed).unwrap();
            assert_eq!(opened, b"payload");
        }
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let cipher = Aes128GcmCipher;
        let key = [0u8; 16];
        let nonce = [0u8; 12];
        let mut sealed = cipher.seal(&key, &nonce, b"aad", b"data").unwrap();
        sealed[0] ^= 0x80;
        assert_eq!(
            cipher.open(&key, &nonce, b"aad", &sealed),
            Err(Error::AuthenticationFailed)
        );
    }

    #[test]
    fn wrong_aad_fails_authentication() {
        let cipher = ChaCha20Poly1305Cipher;
        let key = [7u8; 32];
        let nonce = [9u8; 12];
        let sealed = cipher.seal(&key, &nonce, b"aad", b"data").unwrap();
        assert_eq!(
            cipher.open(&key, &nonce, b"other", &sealed),
            Err(Error::AuthenticationFailed)
        );
    }

    #[test]
    fn rejects_bad_key_size() {
        let cipher = Aes256GcmCipher;
        let err = cipher.seal(&[0u8; 16], &[0u8; 12], b"", b"x").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidKeySize {
                expected: 32,
                actual: 16
            }
        );
    }
}
