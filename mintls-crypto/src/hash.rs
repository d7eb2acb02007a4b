//! Hash function interface.

/// Hash algorithms supported by MinTLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256 (32 bytes output)
    Sha256,
    /// SHA-384 (48 bytes output)
    Sha384,
}

impl HashAlgorithm {
    /// Get the output size in bytes for this hash algorithm.
    pub const fn output_size(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
        }
    }

    /// Get the name of this algorithm.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
        }
    }
}

/// Hash function trait.
///
/// The transcript hash takes mid-stream snapshots, so implementations must
/// support cloning the running state via [`Hash::clone_box`].
pub trait Hash: Send {
    /// Update the hash state with more data.
    fn update(&mut self, data: &[u8]);

    /// Finalize the hash and return the digest.
    ///
    /// This consumes the hash state.
    fn finalize(self: Box<Self>) -> Vec<u8>;

    /// Clone the running hash state.
    ///
    /// The clone can be finalized without disturbing the original, which
    /// keeps accumulating.
    fn clone_box(&self) -> Box<dyn Hash>;

    /// Get the output size in bytes for this hash function.
    fn output_size(&self) -> usize;

    /// Get the algorithm this hash implements.
    fn algorithm(&self) -> HashAlgorithm;
}
