//! Raw CBC block ciphers via the `aes` and `cbc` crates.

use aes::{Aes128, Aes256};
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use mintls_crypto::{BlockCipher, BlockCipherAlgorithm, Error, Result};

fn check_sizes(algorithm: BlockCipherAlgorithm, key: &[u8], iv: &[u8], data: &[u8]) -> Result<()> {
    if key.len() != algorithm.key_size() {
        return Err(Error::InvalidKeySize {
            expected: algorithm.key_size(),
            actual: key.len(),
        });
    }
    let block = algorithm.block_size();
    if iv.len() != block || data.is_empty() || data.len() % block != 0 {
        return Err(Error::InvalidLength);
    }
    Ok(())
}

macro_rules! cbc_impl {
    ($name:ident, $aes:ty, $algorithm:expr) => {
        #[derive(Debug, Clone, Copy)]
        pub(crate) struct $name;

        impl BlockCipher for $name {
            fn encrypt(&self, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
                check_sizes($algorithm, key, iv, data)?;
                let enc = cbc::Encryptor::<$aes>::new_from_slices(key, iv)
                    .map_err(|_| Error::InvalidLength)?;
                let mut buf = data.to_vec();
                let len = buf.len();
                enc.encrypt_padded_mut::<NoPadding>(&mut buf, len)
                    .map_err(|_| Error::EncryptionFailed)?;
                Ok(buf)
            }

            fn decrypt(&self, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
                check_sizes($algorithm, key, iv, data)?;
                let dec = cbc::Decryptor::<$aes>::new_from_slices(key, iv)
                    .map_err(|_| Error::InvalidLength)?;
                let mut buf = data.to_vec();
                dec.decrypt_padded_mut::<NoPadding>(&mut buf)
                    .map_err(|_| Error::DecryptionFailed)?;
                Ok(buf)
            }

            fn algorithm(&self) -> BlockCipherAlgorithm {
                $algorithm
            }
        }
    };
}

cbc_impl!(Aes128CbcCipher, Aes128, BlockCipherAlgorithm::Aes128Cbc);
cbc_impl!(Aes256CbcCipher, Aes256, BlockCipherAlgorithm::Aes256Cbc);
