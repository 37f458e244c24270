use crate::error::{QecError, Result};
use crate::random::RandomKey;
use num_complex::Complex64;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

// amplitudes below this are treated as absent when looking at supports
pub const AMPLITUDE_EPSILON: f64 = 1e-12;

// tolerance for the unit-norm check in validate_state
pub const NORM_TOLERANCE: f64 = 1e-9;

// basis labels are MSB-first: qubit q lives at bit (n - 1 - q) of the index
#[inline]
pub fn qubit_mask(num_qubits: usize, qubit: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}

#[inline]
pub fn qubit_bit(index: usize, num_qubits: usize, qubit: usize) -> u8 {
    ((index >> (num_qubits - 1 - qubit)) & 1) as u8
}

/// Bits of a basis label, qubit 0 first.
pub fn index_to_bits(index: usize, num_qubits: usize) -> Vec<u8> {
    (0..num_qubits)
        .map(|q| qubit_bit(index, num_qubits, q))
        .collect()
}

/// Inverse of `index_to_bits`.
pub fn bits_to_index(bits: &[u8]) -> usize {
    bits.iter().fold(0usize, |acc, &b| (acc << 1) | (b & 1) as usize)
}

/// Amplitude vector over the 2^n computational basis states.
///
/// Values are never mutated after construction; every transform returns a new vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    amps: Vec<Complex64>,
}

impl StateVector {
    pub fn new(amps: Vec<Complex64>) -> Result<Self> {
        let len = amps.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QecError::input(format!(
                "state length must be a power of two >= 2, got {}",
                len
            )));
        }
        Ok(StateVector { amps })
    }

    pub fn from_real(values: &[f64]) -> Result<Self> {
        Self::new(values.iter().map(|&v| Complex64::new(v, 0.0)).collect())
    }

    /// One-hot state |index⟩ over `num_qubits` qubits.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self> {
        Self::signed_basis(num_qubits, index, Complex64::new(1.0, 0.0))
    }

    pub(crate) fn signed_basis(num_qubits: usize, index: usize, amp: Complex64) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QecError::input("a state needs at least one qubit"));
        }
        let size = 1usize << num_qubits;
        if index >= size {
            return Err(QecError::input(format!(
                "basis index {} out of range for {} qubits",
                index, num_qubits
            )));
        }
        let mut amps = vec![Complex64::new(0.0, 0.0); size];
        amps[index] = amp;
        Ok(StateVector { amps })
    }

    // internal constructor for vectors already known to have a valid length
    pub(crate) fn from_amps_unchecked(amps: Vec<Complex64>) -> Self {
        debug_assert!(amps.len() >= 2 && amps.len().is_power_of_two());
        StateVector { amps }
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    pub fn get(&self, index: usize) -> Option<&Complex64> {
        self.amps.get(index)
    }

    pub fn len(&self) -> usize {
        self.amps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amps.is_empty()
    }

    pub fn num_qubits(&self) -> usize {
        self.amps.len().trailing_zeros() as usize
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    // probabilities of each basis outcome, without measuring
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Index of the first amplitude with maximal magnitude.
    pub fn dominant_index(&self) -> usize {
        let mut best = 0;
        let mut best_mag = f64::NEG_INFINITY;
        for (i, a) in self.amps.iter().enumerate() {
            let mag = a.norm_sqr();
            if mag > best_mag {
                best = i;
                best_mag = mag;
            }
        }
        best
    }

    /// Basis index of a collapsed state: exactly one entry equal to +1 or -1, all others zero.
    pub fn collapsed_index(&self) -> Option<usize> {
        let mut found = None;
        for (i, a) in self.amps.iter().enumerate() {
            if a.re == 0.0 && a.im == 0.0 {
                continue;
            }
            let unit = a.im == 0.0 && (a.re == 1.0 || a.re == -1.0);
            if !unit || found.is_some() {
                return None;
            }
            found = Some(i);
        }
        found
    }

    /// Like `collapsed_index`, but reports why the state is not a basis state.
    pub fn require_collapsed(&self) -> Result<usize> {
        self.collapsed_index().ok_or_else(|| {
            let nonzero = self
                .amps
                .iter()
                .filter(|a| a.re != 0.0 || a.im != 0.0)
                .count();
            QecError::state(format!(
                "expected a collapsed basis state with one ±1 entry, found {} nonzero amplitudes",
                nonzero
            ))
        })
    }

    // exactly one entry equal to 1.0
    pub fn is_exactly_collapsed(&self) -> bool {
        self.amps
            .iter()
            .filter(|a| a.re == 1.0 && a.im == 0.0)
            .count()
            == 1
    }

    pub fn validate_state(&self) -> Result<()> {
        if self.amps.iter().any(|a| a.re.is_nan() || a.im.is_nan()) {
            return Err(QecError::state("state contains NaN amplitudes"));
        }
        if self.amps.iter().any(|a| a.re.is_infinite() || a.im.is_infinite()) {
            return Err(QecError::state("state contains infinite amplitudes"));
        }
        let norm_sqr = self.norm_sqr();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(QecError::state(format!(
                "state is not normalized, norm squared: {}",
                norm_sqr
            )));
        }
        Ok(())
    }

    pub fn scaled(&self, factor: Complex64) -> StateVector {
        StateVector {
            amps: self.amps.iter().map(|a| a * factor).collect(),
        }
    }

    /// Binary label of the dominant basis state, e.g. `|101⟩`.
    pub fn to_braket(&self) -> String {
        format!(
            "|{:0width$b}⟩",
            self.dominant_index(),
            width = self.num_qubits()
        )
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.num_qubits();
        let mut first = true;
        for (i, a) in self.amps.iter().enumerate() {
            if a.norm_sqr() <= AMPLITUDE_EPSILON {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if a.im == 0.0 {
                write!(f, "{:.4}|{:0width$b}⟩", a.re, i, width = width)?;
            } else {
                write!(f, "({:.4}{:+.4}i)|{:0width$b}⟩", a.re, a.im, i, width = width)?;
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

// --- logical constants ---

pub fn logical_zero() -> StateVector {
    StateVector::from_amps_unchecked(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)])
}

pub fn logical_one() -> StateVector {
    StateVector::from_amps_unchecked(vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)])
}

pub fn plus_state() -> StateVector {
    StateVector::from_amps_unchecked(vec![
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(FRAC_1_SQRT_2, 0.0),
    ])
}

pub fn minus_state() -> StateVector {
    StateVector::from_amps_unchecked(vec![
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(-FRAC_1_SQRT_2, 0.0),
    ])
}

/// Born-rule measurement in the computational basis.
///
/// Outcome i is drawn with probability `|a_i|^2 / Σ|a_j|^2` from the key's sampling stream;
/// the result is the one-hot state at i. Same state and key, same outcome.
pub fn born_sample(state: &StateVector, key: &RandomKey) -> Result<StateVector> {
    let probs = state.probabilities();
    let dist = WeightedIndex::new(&probs).map_err(|e| {
        QecError::state(format!("cannot sample from amplitude distribution: {}", e))
    })?;
    let index = dist.sample(&mut key.rng());
    StateVector::basis(state.num_qubits(), index)
}
