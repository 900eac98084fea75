//! Uniformly random nonce candidates

use super::NonceOracle;
use k256::{NonZeroScalar, Scalar};
use rand::{CryptoRng, RngCore};

/// Draws candidate nonces uniformly from [1, n-1]. Ignores history and
/// never abstains.
pub struct UniformNonces<R> {
    rng: R,
}

impl<R> UniformNonces<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: CryptoRng + RngCore + Send> NonceOracle for UniformNonces<R> {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn min_history(&self) -> usize {
        0
    }

    fn propose(&mut self, _history: &[Scalar]) -> Option<Scalar> {
        Some(*NonZeroScalar::random(&mut self.rng))
    }
}
