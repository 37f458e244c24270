use crate::error::{QecError, Result};
use crate::random::RandomKey;
use crate::state::{qubit_mask, StateVector};
use rand::distributions::{Bernoulli, Distribution};
use rayon::prelude::*;

/// Independent per-qubit error channel.
///
/// `apply` splits its key into one child per qubit (qubit 0 takes child 0) and flips
/// each qubit with probability p. Flips only permute or re-sign amplitudes, so neither
/// the dimension nor the norm of the state changes.
pub trait NoiseModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Per-qubit flip probability p.
    fn probability(&self) -> f64;

    fn bernoulli(&self) -> &Bernoulli;

    /// The channel's flip operator on one qubit, applied unconditionally.
    fn flip_qubit(&self, state: &StateVector, qubit: usize) -> Result<StateVector>;

    /// Flip one qubit with probability p, drawn from `key`.
    fn probability_flip(
        &self,
        state: &StateVector,
        key: &RandomKey,
        qubit: usize,
    ) -> Result<StateVector> {
        if self.bernoulli().sample(&mut key.rng()) {
            self.flip_qubit(state, qubit)
        } else {
            check_qubit(state, qubit)?;
            Ok(state.clone())
        }
    }

    fn apply(&self, state: &StateVector, key: &RandomKey) -> Result<StateVector> {
        key.split_n(state.num_qubits())
            .iter()
            .enumerate()
            .try_fold(state.clone(), |current, (qubit, k)| {
                self.probability_flip(&current, k, qubit)
            })
    }

    /// Noise on each state of a batch; state i uses child key i.
    fn apply_batch(&self, states: &[StateVector], key: &RandomKey) -> Result<Vec<StateVector>> {
        let keys = key.split_n(states.len());
        states
            .par_iter()
            .zip(keys.par_iter())
            .map(|(state, k)| self.apply(state, k))
            .collect()
    }
}

fn check_probability(p: f64) -> Result<Bernoulli> {
    Bernoulli::new(p).map_err(|_| {
        QecError::input(format!("flip probability must be in [0, 1], got {}", p))
    })
}

fn check_qubit(state: &StateVector, qubit: usize) -> Result<()> {
    if qubit >= state.num_qubits() {
        return Err(QecError::input(format!(
            "qubit index {} out of bounds for {}-qubit state",
            qubit,
            state.num_qubits()
        )));
    }
    Ok(())
}

/// Pauli-X errors.
#[derive(Debug, Clone)]
pub struct BitFlip {
    p: f64,
    dist: Bernoulli,
}

impl BitFlip {
    pub fn new(p: f64) -> Result<Self> {
        Ok(BitFlip {
            p,
            dist: check_probability(p)?,
        })
    }
}

impl NoiseModel for BitFlip {
    fn name(&self) -> &'static str {
        "bit_flip"
    }

    fn probability(&self) -> f64 {
        self.p
    }

    fn bernoulli(&self) -> &Bernoulli {
        &self.dist
    }

    // amplitude at label i moves to label i ^ mask
    fn flip_qubit(&self, state: &StateVector, qubit: usize) -> Result<StateVector> {
        check_qubit(state, qubit)?;
        let mask = qubit_mask(state.num_qubits(), qubit);
        let amps = state.amplitudes();
        let flipped = (0..amps.len()).map(|i| amps[i ^ mask]).collect();
        Ok(StateVector::from_amps_unchecked(flipped))
    }
}

/// Pauli-Z errors. Invisible to computational-basis statistics; only interference shows them.
#[derive(Debug, Clone)]
pub struct PhaseFlip {
    p: f64,
    dist: Bernoulli,
}

impl PhaseFlip {
    pub fn new(p: f64) -> Result<Self> {
        Ok(PhaseFlip {
            p,
            dist: check_probability(p)?,
        })
    }
}

impl NoiseModel for PhaseFlip {
    fn name(&self) -> &'static str {
        "phase_flip"
    }

    fn probability(&self) -> f64 {
        self.p
    }

    fn bernoulli(&self) -> &Bernoulli {
        &self.dist
    }

    fn flip_qubit(&self, state: &StateVector, qubit: usize) -> Result<StateVector> {
        check_qubit(state, qubit)?;
        let mask = qubit_mask(state.num_qubits(), qubit);
        let flipped = state
            .amplitudes()
            .iter()
            .enumerate()
            .map(|(i, &a)| if i & mask != 0 { -a } else { a })
            .collect();
        Ok(StateVector::from_amps_unchecked(flipped))
    }
}
