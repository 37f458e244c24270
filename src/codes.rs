use crate::error::{QecError, Result};
use crate::random::RandomKey;
use crate::state::{
    born_sample, index_to_bits, logical_one, logical_zero, qubit_mask, StateVector,
    AMPLITUDE_EPSILON,
};
use crate::symplectic::{diagnosis_summary, valid_stabilizer_set, SymplecticVector};
use log::warn;
use num_complex::Complex64;
use serde::Serialize;

// beyond this the 2^n amplitude vector is not worth allocating
pub const MAX_QUBITS: usize = 24;

/// Syndrome bits, one per parity check, each 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Syndrome(Vec<u8>);

impl Syndrome {
    pub fn new(bits: Vec<u8>) -> Result<Self> {
        if let Some(bad) = bits.iter().find(|&&b| b > 1) {
            return Err(QecError::input(format!("syndrome bits must be 0 or 1, got {}", bad)));
        }
        Ok(Syndrome(bits))
    }

    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // no check fired
    pub fn is_trivial(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

/// A quantum error-correcting code protecting one logical qubit.
pub trait QuantumCode: Send + Sync {
    /// Physical qubit count n.
    fn num_physical(&self) -> usize;

    /// Logical qubit count k.
    fn num_logical(&self) -> usize;

    /// Map a length-2 logical state onto the 2^n physical amplitudes.
    fn encode(&self, logical_state: &StateVector) -> Result<StateVector>;

    /// Collapse a physical state by Born-rule sampling.
    fn measure(&self, state: &StateVector, key: &RandomKey) -> Result<StateVector> {
        self.check_physical(state)?;
        state.validate_state()?;
        born_sample(state, key)
    }

    /// Decode a collapsed basis state to a logical basis state.
    fn decode_collapsed(&self, physical_state: &StateVector) -> Result<StateVector>;

    /// Measure then decode. Rejects input that is already collapsed.
    fn decode_superposition(&self, state: &StateVector, key: &RandomKey) -> Result<StateVector> {
        if state.is_exactly_collapsed() {
            return Err(QecError::state(
                "decode_superposition called on an already collapsed state",
            ));
        }
        let collapsed = self.measure(state, key)?;
        self.decode_collapsed(&collapsed)
    }

    fn measure_syndrome_collapsed(&self, state: &StateVector) -> Result<Syndrome>;

    fn check_physical(&self, state: &StateVector) -> Result<()> {
        if state.num_qubits() != self.num_physical() {
            return Err(QecError::input(format!(
                "state has {} qubits, code expects {}",
                state.num_qubits(),
                self.num_physical()
            )));
        }
        Ok(())
    }
}

fn check_logical(logical_state: &StateVector) -> Result<()> {
    if logical_state.len() != 2 {
        return Err(QecError::input(format!(
            "logical state must have 2 amplitudes, got {}",
            logical_state.len()
        )));
    }
    Ok(())
}

fn check_qubit_count(n: usize) -> Result<()> {
    if n == 0 || n > MAX_QUBITS {
        return Err(QecError::input(format!(
            "physical qubit count must be in 1..={}, got {}",
            MAX_QUBITS, n
        )));
    }
    if n > 16 {
        warn!(
            "simulating {} physical qubits allocates {} amplitudes per state",
            n,
            1usize << n
        );
    }
    Ok(())
}

// --- repetition code ---

/// n-qubit repetition code: |0⟩ -> |0…0⟩, |1⟩ -> |1…1⟩, decoded by majority vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepetitionCode {
    n: usize,
}

impl RepetitionCode {
    pub fn new(n: usize) -> Result<Self> {
        if n % 2 == 0 {
            return Err(QecError::input(format!(
                "repetition code needs an odd number of qubits for majority voting, got {}",
                n
            )));
        }
        check_qubit_count(n)?;
        Ok(RepetitionCode { n })
    }
}

impl QuantumCode for RepetitionCode {
    fn num_physical(&self) -> usize {
        self.n
    }

    fn num_logical(&self) -> usize {
        1
    }

    fn encode(&self, logical_state: &StateVector) -> Result<StateVector> {
        check_logical(logical_state)?;
        let amps = logical_state.amplitudes();
        let size = 1usize << self.n;
        let mut physical = vec![Complex64::new(0.0, 0.0); size];
        physical[0] = amps[0];
        physical[size - 1] += amps[1];
        Ok(StateVector::from_amps_unchecked(physical))
    }

    fn decode_collapsed(&self, physical_state: &StateVector) -> Result<StateVector> {
        self.check_physical(physical_state)?;
        let index = physical_state.require_collapsed()?;
        let ones = index.count_ones() as usize;
        if ones > self.n / 2 {
            Ok(logical_one())
        } else {
            Ok(logical_zero())
        }
    }

    /// Bit i is the parity of physical bits i and i + 1.
    fn measure_syndrome_collapsed(&self, state: &StateVector) -> Result<Syndrome> {
        self.check_physical(state)?;
        let index = state.require_collapsed()?;
        let bits = index_to_bits(index, self.n);
        Ok(Syndrome(bits.windows(2).map(|w| w[0] ^ w[1]).collect()))
    }
}

// --- stabilizer code ---

/// Code defined by a set of symplectic stabilizer generators.
///
/// The logical-zero code word is the normalised projection of |0…0⟩ onto the joint +1
/// eigenspace of the generators. When that projection vanishes (e.g. `XXI, YYI`, whose
/// group holds -ZZI) the next basis state in label order is projected instead.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilizerCode {
    generators: Vec<SymplecticVector>,
    n: usize,
    k: usize,
    codeword: StateVector,
}

impl StabilizerCode {
    pub fn new(generators: Vec<SymplecticVector>) -> Result<Self> {
        let Some(first) = generators.first() else {
            return Err(QecError::construction("a stabilizer code needs at least one generator"));
        };
        let n = first.num_qubits();
        if let Some(g) = generators.iter().find(|g| g.num_qubits() != n) {
            return Err(QecError::construction(format!(
                "generator {} has length {}, expected {}",
                g,
                g.bits().len(),
                2 * n
            )));
        }
        if let Some(g) = generators.iter().find(|g| g.is_identity()) {
            return Err(QecError::construction(format!(
                "identity generator {} is not allowed",
                g
            )));
        }
        if generators.len() > n {
            return Err(QecError::construction(format!(
                "{} generators on {} qubits leaves no logical qubit",
                generators.len(),
                n
            )));
        }
        if !valid_stabilizer_set(&generators)? {
            return Err(QecError::construction(diagnosis_summary(
                &generators,
                n,
                n - generators.len(),
            )));
        }
        check_qubit_count(n).map_err(|e| QecError::construction(e.to_string()))?;

        // first basis state the projector does not annihilate, normally |0…0⟩
        let codeword = (0..1usize << n)
            .find_map(|b| {
                let mut state = StateVector::basis(n, b).ok()?;
                for g in &generators {
                    state = project(g, &state);
                }
                let norm = state.norm();
                (norm > AMPLITUDE_EPSILON).then(|| state.scaled(Complex64::new(1.0 / norm, 0.0)))
            })
            .ok_or_else(|| {
                QecError::construction("the generators share no +1 eigenstate to encode into")
            })?;

        Ok(StabilizerCode {
            k: n - generators.len(),
            generators,
            n,
            codeword,
        })
    }

    pub fn generators(&self) -> &[SymplecticVector] {
        &self.generators
    }

    /// The encoded |0_L⟩.
    pub fn codeword(&self) -> &StateVector {
        &self.codeword
    }
}

impl QuantumCode for StabilizerCode {
    fn num_physical(&self) -> usize {
        self.n
    }

    fn num_logical(&self) -> usize {
        self.k
    }

    /// Only logical states without a |1⟩ component have a code word here.
    fn encode(&self, logical_state: &StateVector) -> Result<StateVector> {
        check_logical(logical_state)?;
        let amps = logical_state.amplitudes();
        if amps[1].norm_sqr() > AMPLITUDE_EPSILON {
            return Err(QecError::input(
                "stabilizer codes encode the logical |0⟩ code word only",
            ));
        }
        Ok(self.codeword.scaled(amps[0]))
    }

    // outcomes inside the support of |0_L⟩ read as logical |0⟩
    fn decode_collapsed(&self, physical_state: &StateVector) -> Result<StateVector> {
        self.check_physical(physical_state)?;
        let index = physical_state.require_collapsed()?;
        let in_support = self
            .codeword
            .get(index)
            .map_or(false, |a| a.norm_sqr() > AMPLITUDE_EPSILON);
        if in_support {
            Ok(logical_zero())
        } else {
            Ok(logical_one())
        }
    }

    /// Bit j is `Σ_i (x_j[i] + z_j[i]) · bit_i mod 2`.
    fn measure_syndrome_collapsed(&self, state: &StateVector) -> Result<Syndrome> {
        self.check_physical(state)?;
        let index = state.require_collapsed()?;
        let bits = index_to_bits(index, self.n);
        let syndrome = self
            .generators
            .iter()
            .map(|g| {
                let total: usize = g
                    .x_part()
                    .iter()
                    .zip(g.z_part())
                    .zip(&bits)
                    .map(|((&x, &z), &b)| (x as usize + z as usize) * b as usize)
                    .sum();
                (total % 2) as u8
            })
            .collect();
        Ok(Syndrome(syndrome))
    }
}

// P|b⟩ = i^{|x∧z|} (-1)^{z·b} |b ⊕ x⟩, with Y = iXZ on each qubit
fn pauli_masks(generator: &SymplecticVector) -> (usize, usize, Complex64) {
    let n = generator.num_qubits();
    let mut x_mask = 0usize;
    let mut z_mask = 0usize;
    for q in 0..n {
        if generator.x_part()[q] == 1 {
            x_mask |= qubit_mask(n, q);
        }
        if generator.z_part()[q] == 1 {
            z_mask |= qubit_mask(n, q);
        }
    }
    let phase = match (x_mask & z_mask).count_ones() % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    };
    (x_mask, z_mask, phase)
}

/// Apply (I + P) / 2 for the Pauli operator P described by `generator`.
fn project(generator: &SymplecticVector, state: &StateVector) -> StateVector {
    let (x_mask, z_mask, phase) = pauli_masks(generator);
    let amps = state.amplitudes();
    let mut out = vec![Complex64::new(0.0, 0.0); amps.len()];
    for (b, &a) in amps.iter().enumerate() {
        if a.norm_sqr() == 0.0 {
            continue;
        }
        let sign = if (z_mask & b).count_ones() % 2 == 1 { -1.0 } else { 1.0 };
        out[b] += a * 0.5;
        out[b ^ x_mask] += a * phase * (0.5 * sign);
    }
    StateVector::from_amps_unchecked(out)
}
