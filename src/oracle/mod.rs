//! Candidate nonce providers

use k256::Scalar;

pub mod heuristic;
pub mod uniform;

pub use heuristic::{HeuristicNonces, NoncePredictor, MIN_PREDICTOR_HISTORY};
pub use uniform::UniformNonces;

/// A source of candidate nonce values for the search loop.
///
/// `history` is the append-only sequence of previously observed nonces,
/// in insertion order. An oracle returns `None` when it cannot produce a
/// candidate (for the heuristic variant, when history is too short); the
/// caller then falls back to a uniform draw.
pub trait NonceOracle: Send {
    fn name(&self) -> &'static str;
    fn min_history(&self) -> usize;
    fn propose(&mut self, history: &[Scalar]) -> Option<Scalar>;
}
