//! Bounded search for (private key, nonce) pairs satisfying a signature.

use crate::error::Error;
use crate::oracle::NonceOracle;
use crate::recovery::{verify_candidate, Verdict};
use crate::signature::Signature;
use k256::{NonZeroScalar, Scalar};
use rand::rngs::StdRng;
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Attempt budget per signature. Degenerate nonces do not consume it.
    pub max_attempts: u64,
    /// Probability of consulting the heuristic oracle on an iteration,
    /// when one is installed.
    pub heuristic_probability: f64,
    /// Emit a progress observation every this many attempts. Zero
    /// disables reporting.
    pub report_interval: u64,
    /// Worker threads for [`run_parallel`].
    pub workers: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 500_000,
            heuristic_probability: 0.5,
            report_interval: 10_000,
            workers: 1,
        }
    }
}

/// Terminal state of a search run. While running, the loop is implicitly
/// in its searching state; it ends in exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found {
        private_key: Scalar,
        nonce: Scalar,
        attempts: u64,
    },
    Exhausted {
        attempts: u64,
    },
}

/// A single-threaded search over candidate (nonce, key) pairs.
///
/// Candidate nonces come from the heuristic oracle (when installed and
/// the per-iteration coin flip selects it) or a uniform draw; candidate
/// keys are always drawn uniformly from [1, n-1]. The only acceptance
/// criterion is [`verify_candidate`].
pub struct Search<R> {
    config: SearchConfig,
    rng: R,
    heuristic: Option<Box<dyn NonceOracle>>,
    history: Vec<Scalar>,
    stop: Option<Arc<AtomicBool>>,
}

impl<R: CryptoRng + RngCore> Search<R> {
    pub fn new(config: SearchConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            heuristic: None,
            history: Vec::new(),
            stop: None,
        }
    }

    pub fn with_heuristic(mut self, oracle: Box<dyn NonceOracle>) -> Self {
        self.heuristic = Some(oracle);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Appends `count` uniformly drawn scalars to the nonce history.
    pub fn seed_history(&mut self, count: usize) {
        for _ in 0..count {
            let k = *NonZeroScalar::random(&mut self.rng);
            self.history.push(k);
        }
    }

    /// Appends an externally observed nonce to the history.
    pub fn observe_nonce(&mut self, k: Scalar) {
        self.history.push(k);
    }

    pub fn history(&self) -> &[Scalar] {
        &self.history
    }

    /// Runs the bounded search against one signature.
    ///
    /// Fails with `InvalidSignatureComponent` when the signature's r is
    /// zero mod n; the caller should reject the signature and move on.
    /// Exhaustion is a normal outcome, not an error.
    pub fn run(&mut self, sig: &Signature) -> Result<SearchOutcome, Error> {
        if bool::from(sig.r.is_zero()) {
            return Err(Error::InvalidSignatureComponent);
        }

        let mut attempts: u64 = 0;
        while attempts < self.config.max_attempts {
            if let Some(stop) = &self.stop {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
            }

            let k = self.next_nonce();
            let d = *NonZeroScalar::random(&mut self.rng);

            // An arithmetic failure aborts only this candidate.
            let verdict = match verify_candidate(&k, &d, sig) {
                Ok(v) => v,
                Err(_) => continue,
            };

            match verdict {
                // Degenerate nonces are resampled, not counted.
                Verdict::Degenerate => continue,
                Verdict::Match => {
                    return Ok(SearchOutcome::Found {
                        private_key: d,
                        nonce: k,
                        attempts: attempts + 1,
                    });
                }
                Verdict::Mismatch => {
                    attempts += 1;
                    if self.config.report_interval > 0 && attempts % self.config.report_interval == 0
                    {
                        info!(
                            attempts,
                            max_attempts = self.config.max_attempts,
                            "search progress"
                        );
                    }
                }
            }
        }

        Ok(SearchOutcome::Exhausted { attempts })
    }

    fn next_nonce(&mut self) -> Scalar {
        if let Some(oracle) = self.heuristic.as_mut() {
            if self.rng.gen::<f64>() < self.config.heuristic_probability {
                if let Some(k) = oracle.propose(&self.history) {
                    if !bool::from(k.is_zero()) {
                        return k;
                    }
                }
            }
        }
        *NonZeroScalar::random(&mut self.rng)
    }
}

/// Distributes the attempt budget across worker threads.
///
/// Workers share the immutable signature and a termination flag checked
/// between iterations; each keeps its own RNG, history, and oracle (built
/// by `make_oracle`). The first verifying pair wins and cancels the rest;
/// attempts are totalled across workers.
pub fn run_parallel<F>(
    sig: &Signature,
    config: &SearchConfig,
    make_oracle: F,
) -> Result<SearchOutcome, Error>
where
    F: Fn(usize) -> Option<Box<dyn NonceOracle>> + Sync,
{
    if bool::from(sig.r.is_zero()) {
        return Err(Error::InvalidSignatureComponent);
    }

    let workers = config.workers.max(1);
    let stop = Arc::new(AtomicBool::new(false));
    let total_attempts = AtomicU64::new(0);
    let winner: Mutex<Option<(Scalar, Scalar)>> = Mutex::new(None);

    let share = config.max_attempts / workers as u64;
    let remainder = config.max_attempts % workers as u64;

    std::thread::scope(|scope| {
        for worker in 0..workers {
            let budget = share + if worker == 0 { remainder } else { 0 };
            let stop = Arc::clone(&stop);
            let total_attempts = &total_attempts;
            let winner = &winner;
            let make_oracle = &make_oracle;
            let config = config.clone();

            scope.spawn(move || {
                let mut worker_config = config;
                worker_config.max_attempts = budget;

                let mut search = Search::new(worker_config, StdRng::from_entropy())
                    .with_stop_flag(Arc::clone(&stop));
                if let Some(oracle) = make_oracle(worker) {
                    search = search.with_heuristic(oracle);
                }

                match search.run(sig) {
                    Ok(SearchOutcome::Found {
                        private_key,
                        nonce,
                        attempts,
                    }) => {
                        total_attempts.fetch_add(attempts, Ordering::Relaxed);
                        let mut slot = winner.lock().unwrap();
                        if slot.is_none() {
                            *slot = Some((private_key, nonce));
                        }
                        stop.store(true, Ordering::Relaxed);
                    }
                    Ok(SearchOutcome::Exhausted { attempts }) => {
                        total_attempts.fetch_add(attempts, Ordering::Relaxed);
                    }
                    // r was validated above; per-worker errors cannot occur.
                    Err(_) => {}
                }
            });
        }
    });

    let attempts = total_attempts.load(Ordering::Relaxed);
    match winner.into_inner().unwrap() {
        Some((private_key, nonce)) => Ok(SearchOutcome::Found {
            private_key,
            nonce,
            attempts,
        }),
        None => Ok(SearchOutcome::Exhausted { attempts }),
    }
}
