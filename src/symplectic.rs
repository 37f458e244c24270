//! GF(2) symplectic algebra over n-qubit Pauli operators.
//!
//! A Pauli operator (up to phase) is a 2n-bit vector `[x | z]`: qubit q carries X when
//! only `x[q]` is set, Z when only `z[q]` is set, and Y when both are. Two operators
//! commute iff their symplectic inner product `x1·z2 + x2·z1` is even.

use crate::error::{QecError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const VALID_SET_MESSAGE: &str = "Valid stabilizer set.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymplecticVector {
    bits: Vec<u8>,
}

impl SymplecticVector {
    /// Build from 2n bits, X-part first. Every entry must be 0 or 1.
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        if bits.is_empty() || bits.len() % 2 != 0 {
            return Err(QecError::input(format!(
                "symplectic vectors need a nonzero even length, got {}",
                bits.len()
            )));
        }
        if let Some(bad) = bits.iter().find(|&&b| b > 1) {
            return Err(QecError::input(format!(
                "symplectic entries must be 0 or 1, got {}",
                bad
            )));
        }
        Ok(SymplecticVector {
            bits: bits.to_vec(),
        })
    }

    pub fn from_parts(x: &[u8], z: &[u8]) -> Result<Self> {
        if x.len() != z.len() {
            return Err(QecError::input(format!(
                "x part has {} bits but z part has {}",
                x.len(),
                z.len()
            )));
        }
        let bits: Vec<u8> = x.iter().chain(z.iter()).copied().collect();
        Self::from_bits(&bits)
    }

    /// Parse a Pauli string such as `"ZZI"` or `"XIY"`; qubit 0 is the leftmost letter.
    pub fn from_pauli(text: &str) -> Result<Self> {
        let letters: Vec<char> = text.trim().chars().collect();
        let n = letters.len();
        let mut bits = vec![0u8; 2 * n];
        for (q, c) in letters.iter().enumerate() {
            let (x, z) = match c.to_ascii_uppercase() {
                'I' => (0, 0),
                'X' => (1, 0),
                'Z' => (0, 1),
                'Y' => (1, 1),
                other => {
                    return Err(QecError::input(format!(
                        "unknown Pauli letter '{}' in \"{}\"",
                        other, text
                    )))
                }
            };
            bits[q] = x;
            bits[n + q] = z;
        }
        Self::from_bits(&bits)
    }

    pub fn num_qubits(&self) -> usize {
        self.bits.len() / 2
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn x_part(&self) -> &[u8] {
        &self.bits[..self.num_qubits()]
    }

    pub fn z_part(&self) -> &[u8] {
        &self.bits[self.num_qubits()..]
    }

    pub fn is_identity(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    pub fn weight(&self) -> usize {
        self.x_part()
            .iter()
            .zip(self.z_part())
            .filter(|&(&x, &z)| x | z == 1)
            .count()
    }

    // bit-packed row for elimination
    fn packed(&self) -> Vec<u64> {
        let mut words = vec![0u64; self.bits.len().div_ceil(64)];
        for (i, &b) in self.bits.iter().enumerate() {
            if b == 1 {
                words[i / 64] |= 1 << (i % 64);
            }
        }
        words
    }
}

impl fmt::Display for SymplecticVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (x, z) in self.x_part().iter().zip(self.z_part()) {
            let c = match (*x, *z) {
                (0, 0) => 'I',
                (1, 0) => 'X',
                (0, 1) => 'Z',
                _ => 'Y',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for SymplecticVector {
    type Err = QecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_pauli(s)
    }
}

/// Symplectic inner product mod 2 is zero.
pub fn commute(v1: &SymplecticVector, v2: &SymplecticVector) -> Result<bool> {
    if v1.bits.len() != v2.bits.len() {
        return Err(QecError::input(format!(
            "cannot compare symplectic vectors of lengths {} and {}",
            v1.bits.len(),
            v2.bits.len()
        )));
    }
    Ok(symplectic_product(v1, v2) == 0)
}

// assumes equal lengths
fn symplectic_product(v1: &SymplecticVector, v2: &SymplecticVector) -> u8 {
    let dot = |a: &[u8], b: &[u8]| {
        a.iter()
            .zip(b)
            .map(|(&p, &q)| p & q)
            .fold(0u8, |acc, v| acc ^ v)
    };
    dot(v1.x_part(), v2.z_part()) ^ dot(v2.x_part(), v1.z_part())
}

pub fn all_commute(generators: &[SymplecticVector]) -> Result<bool> {
    for (a, b) in generators.iter().tuple_combinations() {
        if !commute(a, b)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Rank over GF(2) of the matrix with the generators as rows.
pub fn gf2_rank(generators: &[SymplecticVector]) -> Result<usize> {
    check_uniform_length(generators)?;
    let Some(first) = generators.first() else {
        return Ok(0);
    };
    let width = first.bits.len();
    let mut rows: Vec<Vec<u64>> = generators.iter().map(|g| g.packed()).collect();

    let mut rank = 0;
    for col in 0..width {
        let (word, bit) = (col / 64, 1u64 << (col % 64));
        let Some(pivot) = (rank..rows.len()).find(|&r| rows[r][word] & bit != 0) else {
            continue;
        };
        rows.swap(rank, pivot);
        let pivot_row = rows[rank].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            if r != rank && row[word] & bit != 0 {
                for (w, p) in row.iter_mut().zip(&pivot_row) {
                    *w ^= p;
                }
            }
        }
        rank += 1;
        if rank == rows.len() {
            break;
        }
    }
    Ok(rank)
}

/// Full-rank over GF(2). An empty set is not independent.
pub fn independent(generators: &[SymplecticVector]) -> Result<bool> {
    if generators.is_empty() {
        return Ok(false);
    }
    Ok(gf2_rank(generators)? == generators.len())
}

pub fn valid_stabilizer_set(generators: &[SymplecticVector]) -> Result<bool> {
    Ok(all_commute(generators)? && independent(generators)?)
}

/// Exactly n - k commuting, independent generators acting on n qubits.
pub fn valid_code(generators: &[SymplecticVector], n: usize, k: usize) -> Result<bool> {
    if let Some(g) = generators.iter().find(|g| g.num_qubits() != n) {
        return Err(QecError::input(format!(
            "generator {} acts on {} qubits, expected {}",
            g,
            g.num_qubits(),
            n
        )));
    }
    if n.checked_sub(k) != Some(generators.len()) {
        return Ok(false);
    }
    valid_stabilizer_set(generators)
}

/// Every violated condition, in a fixed order. Empty when the set is a valid [[n, k]] code.
///
/// Never fails: sets whose generators disagree on length get a length reason instead of
/// the commutation and independence checks, which are undefined for them.
pub fn diagnose(generators: &[SymplecticVector], n: usize, k: usize) -> Vec<String> {
    let mut reasons = Vec::new();

    match n.checked_sub(k) {
        Some(expected) if expected == generators.len() => {}
        Some(expected) => reasons.push(format!(
            "Expected {} generators, got {}.",
            expected,
            generators.len()
        )),
        None => reasons.push(format!(
            "Logical qubit count {} exceeds physical qubit count {}.",
            k, n
        )),
    }

    if generators.iter().any(|g| g.num_qubits() != n) {
        reasons.push(format!("Generators must act on {} qubits.", n));
        return reasons;
    }

    if generators.iter().any(|g| g.is_identity()) {
        reasons.push("Identity is not a valid generator.".to_string());
    }

    if !all_commute(generators).unwrap_or(false) {
        reasons.push("Generators do not commute pairwise.".to_string());
    }

    if !independent(generators).unwrap_or(false) {
        reasons.push("Generators are linearly dependent.".to_string());
    }

    reasons
}

pub fn diagnosis_summary(generators: &[SymplecticVector], n: usize, k: usize) -> String {
    let reasons = diagnose(generators, n, k);
    if reasons.is_empty() {
        VALID_SET_MESSAGE.to_string()
    } else {
        reasons.join(" | ")
    }
}

/// All 2^(2n) - 1 nonzero 2n-bit vectors, in lexicographic order of the bit string.
pub fn enumerate_nonidentity_generators(n: usize) -> Vec<SymplecticVector> {
    (0..2 * n)
        .map(|_| 0u8..2)
        .multi_cartesian_product()
        .filter(|bits| bits.iter().any(|&b| b == 1))
        .map(|bits| SymplecticVector { bits })
        .collect()
}

/// The 2^n - 1 nonzero vectors with an empty X part (products of Z), same order.
pub fn enumerate_z_only_generators(n: usize) -> Vec<SymplecticVector> {
    (0..n)
        .map(|_| 0u8..2)
        .multi_cartesian_product()
        .filter(|z| z.iter().any(|&b| b == 1))
        .map(|z| {
            let mut bits = vec![0u8; n];
            bits.extend(z);
            SymplecticVector { bits }
        })
        .collect()
}

fn check_uniform_length(generators: &[SymplecticVector]) -> Result<()> {
    if let Some(first) = generators.first() {
        if let Some(g) = generators.iter().find(|g| g.bits.len() != first.bits.len()) {
            return Err(QecError::input(format!(
                "generator lengths differ: {} vs {}",
                first.bits.len(),
                g.bits.len()
            )));
        }
    }
    Ok(())
}
