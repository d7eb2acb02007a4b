//! OS-backed CSPRNG via `rand`.

use mintls_crypto::{Error, Random, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Random number generator backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OsRandom;

impl Random for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|_| Error::RandomGenerationFailed)
    }
}
