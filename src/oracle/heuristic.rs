//! Heuristic nonce candidates backed by an external predictive model

use super::NonceOracle;
use k256::Scalar;

/// Minimum number of historical nonces the predictive model needs before
/// it produces candidates.
pub const MIN_PREDICTOR_HISTORY: usize = 10;

/// An external model that predicts a nonce from previously observed ones.
///
/// The model is a black box to this crate: it might fit a distribution,
/// learn a sequence, or consult anything else. It receives the history in
/// insertion order and either returns a candidate scalar or abstains.
pub trait NoncePredictor: Send {
    fn predict(&mut self, history: &[Scalar]) -> Option<Scalar>;
}

impl<F> NoncePredictor for F
where
    F: FnMut(&[Scalar]) -> Option<Scalar> + Send,
{
    fn predict(&mut self, history: &[Scalar]) -> Option<Scalar> {
        self(history)
    }
}

/// Nonce oracle that delegates to a [`NoncePredictor`], abstaining while
/// the history is shorter than [`MIN_PREDICTOR_HISTORY`].
pub struct HeuristicNonces<P> {
    predictor: P,
}

impl<P> HeuristicNonces<P> {
    pub fn new(predictor: P) -> Self {
        Self { predictor }
    }
}

impl<P: NoncePredictor> NonceOracle for HeuristicNonces<P> {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn min_history(&self) -> usize {
        MIN_PREDICTOR_HISTORY
    }

    fn propose(&mut self, history: &[Scalar]) -> Option<Scalar> {
        if history.len() < MIN_PREDICTOR_HISTORY {
            return None;
        }
        self.predictor.predict(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_abstains_on_short_history() {
        let mut oracle = HeuristicNonces::new(|_: &[Scalar]| Some(Scalar::ONE));
        let history = vec![Scalar::ONE; MIN_PREDICTOR_HISTORY - 1];
        assert!(oracle.propose(&history).is_none());
    }

    #[test]
    fn test_heuristic_delegates_with_enough_history() {
        let mut oracle = HeuristicNonces::new(|_: &[Scalar]| Some(Scalar::ONE));
        let history = vec![Scalar::ONE; MIN_PREDICTOR_HISTORY];
        assert_eq!(oracle.propose(&history), Some(Scalar::ONE));
    }

    #[test]
    fn test_heuristic_passes_history_through() {
        let mut oracle = HeuristicNonces::new(|h: &[Scalar]| h.last().copied());
        let mut history = vec![Scalar::ONE; MIN_PREDICTOR_HISTORY];
        let last = Scalar::ONE + Scalar::ONE;
        history.push(last);
        assert_eq!(oracle.propose(&history), Some(last));
    }

    #[test]
    fn test_heuristic_predictor_may_abstain() {
        let mut oracle = HeuristicNonces::new(|_: &[Scalar]| None);
        let history = vec![Scalar::ONE; MIN_PREDICTOR_HISTORY];
        assert!(oracle.propose(&history).is_none());
    }
}
