use crate::codes::Syndrome;
use crate::error::{QecError, Result};
use crate::state::{bits_to_index, index_to_bits, qubit_bit, StateVector};

/// Maps a collapsed state and its syndrome to a corrected state.
///
/// Both repetition decoders assume at most one error; syndromes produced by several
/// errors can be mis-corrected.
pub trait Decoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn decode(&self, state: &StateVector, syndrome: &Syndrome) -> Result<StateVector>;
}

/// Bit-flip decoder for adjacent-parity syndromes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepetitionXDecoder;

impl Decoder for RepetitionXDecoder {
    fn name(&self) -> &'static str {
        "repetition_x"
    }

    /// Walks the syndrome left to right: `11` copies bit i onto bit i + 1, `10` copies
    /// bit i + 1 onto bit i. Past the end the last syndrome bit is read again, which is
    /// what repairs a flip on the final qubit.
    fn decode(&self, state: &StateVector, syndrome: &Syndrome) -> Result<StateVector> {
        let n = state.num_qubits();
        if syndrome.len() >= n {
            return Err(QecError::input(format!(
                "{} syndrome bits cannot describe adjacent pairs of {} qubits",
                syndrome.len(),
                n
            )));
        }
        let index = state.require_collapsed()?;
        let mut bits = index_to_bits(index, n);
        let s = syndrome.bits();

        for i in 0..s.len() {
            let next = s[(i + 1).min(s.len() - 1)];
            if s[i] == 1 && next == 1 {
                bits[i + 1] = bits[i];
            } else if s[i] == 1 && next == 0 {
                bits[i] = bits[i + 1];
            }
        }

        StateVector::basis(n, bits_to_index(&bits))
    }
}

/// Phase-flip decoder for the 3-qubit code.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepetitionZDecoder;

impl RepetitionZDecoder {
    // which single qubit a 2-bit syndrome points at
    pub fn implicated_qubit(syndrome: &Syndrome) -> Option<usize> {
        match syndrome.bits() {
            [1, 1] => Some(1),
            [1, 0] => Some(0),
            [0, 1] => Some(2),
            _ => None,
        }
    }
}

impl Decoder for RepetitionZDecoder {
    fn name(&self) -> &'static str {
        "repetition_z"
    }

    fn decode(&self, state: &StateVector, syndrome: &Syndrome) -> Result<StateVector> {
        let n = state.num_qubits();
        if n != 3 || syndrome.len() != 2 {
            return Err(QecError::input(format!(
                "the phase-flip lookup covers 3 qubits and 2 syndrome bits, got {} and {}",
                n,
                syndrome.len()
            )));
        }
        let index = state.require_collapsed()?;
        let amp = state.amplitudes()[index];

        let corrected = match Self::implicated_qubit(syndrome) {
            Some(q) if qubit_bit(index, n, q) == 1 => -amp,
            _ => amp,
        };
        StateVector::signed_basis(n, index, corrected)
    }
}
