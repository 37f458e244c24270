//! Monte-Carlo logical error rates.
//!
//! Trial i runs on child i of the caller's key, so trials are independent pure functions
//! of their keys and rayon may evaluate them in any order without changing the result.

use crate::codes::QuantumCode;
use crate::decoder::Decoder;
use crate::error::{QecError, Result};
use crate::noise::NoiseModel;
use crate::random::RandomKey;
use crate::simulation::simulate;
use crate::state::StateVector;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorRateEstimate {
    pub trials: usize,
    pub failures: usize,
    pub rate: f64,
    /// Binomial standard error of `rate`.
    pub std_error: f64,
}

impl ErrorRateEstimate {
    fn from_counts(trials: usize, failures: usize) -> Self {
        let rate = failures as f64 / trials as f64;
        ErrorRateEstimate {
            trials,
            failures,
            rate,
            std_error: (rate * (1.0 - rate) / trials as f64).sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub probability: f64,
    pub estimate: ErrorRateEstimate,
}

/// The corrected state decodes to a different logical basis state than the input's
/// dominant one.
pub fn is_logical_error<C>(
    code: &C,
    corrected: &StateVector,
    logical_state: &StateVector,
) -> Result<bool>
where
    C: QuantumCode + ?Sized,
{
    let decoded = code.decode_collapsed(corrected)?;
    Ok(decoded.dominant_index() != logical_state.dominant_index())
}

/// Run `trials` independent cycles and count logical errors. Any failing trial fails the
/// whole estimate.
pub fn estimate<C, N, D>(
    logical_state: &StateVector,
    code: &C,
    noise_model: &N,
    decoder: &D,
    key: &RandomKey,
    trials: usize,
) -> Result<ErrorRateEstimate>
where
    C: QuantumCode + ?Sized,
    N: NoiseModel + ?Sized,
    D: Decoder + ?Sized,
{
    if trials == 0 {
        return Err(QecError::input("error rate estimation needs at least one trial"));
    }

    let keys = key.split_n(trials);
    let failures = keys
        .par_iter()
        .map(|k| {
            let corrected = simulate(logical_state, code, noise_model, decoder, k)?;
            is_logical_error(code, &corrected, logical_state)
        })
        .try_fold(|| 0usize, |acc, failed| failed.map(|f| acc + f as usize))
        .try_reduce(|| 0usize, |a, b| Ok(a + b))?;

    let result = ErrorRateEstimate::from_counts(trials, failures);
    debug!(
        "{} noise p={} over {} trials: {} failures, rate {:.4}",
        noise_model.name(),
        noise_model.probability(),
        trials,
        failures,
        result.rate
    );
    Ok(result)
}

/// Fraction of `trials` cycles ending in a logical error.
pub fn estimate_error_rate<C, N, D>(
    logical_state: &StateVector,
    code: &C,
    noise_model: &N,
    decoder: &D,
    key: &RandomKey,
    trials: usize,
) -> Result<f64>
where
    C: QuantumCode + ?Sized,
    N: NoiseModel + ?Sized,
    D: Decoder + ?Sized,
{
    estimate(logical_state, code, noise_model, decoder, key, trials).map(|e| e.rate)
}

/// One estimate per noise probability, each on its own child key.
#[allow(clippy::too_many_arguments)]
pub fn sweep<C, D, F, P>(
    logical_state: &StateVector,
    code: &C,
    decoder: &D,
    probabilities: &[f64],
    make_noise: F,
    key: &RandomKey,
    trials: usize,
    mut on_point: P,
) -> Result<Vec<SweepPoint>>
where
    C: QuantumCode + ?Sized,
    D: Decoder + ?Sized,
    F: Fn(f64) -> Result<Box<dyn NoiseModel>>,
    P: FnMut(&SweepPoint),
{
    let keys = key.split_n(probabilities.len());
    let mut points = Vec::with_capacity(probabilities.len());
    for (&p, k) in probabilities.iter().zip(&keys) {
        let noise = make_noise(p)?;
        let point = SweepPoint {
            probability: p,
            estimate: estimate(logical_state, code, noise.as_ref(), decoder, k, trials)?,
        };
        on_point(&point);
        points.push(point);
    }
    Ok(points)
}
