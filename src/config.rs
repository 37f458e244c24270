use crate::codes::{QuantumCode, RepetitionCode, StabilizerCode};
use crate::decoder::{Decoder, RepetitionXDecoder, RepetitionZDecoder};
use crate::error::{QecError, Result};
use crate::noise::{BitFlip, NoiseModel, PhaseFlip};
use crate::random::RandomKey;
use crate::state::{logical_one, logical_zero, minus_state, plus_state, StateVector};
use crate::symplectic::SymplecticVector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodeConfig {
    Repetition { n: usize },
    /// Generators as Pauli strings, e.g. `["ZZI", "IZZ"]`.
    Stabilizer { generators: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoiseConfig {
    BitFlip { p: f64 },
    PhaseFlip { p: f64 },
    Ideal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderConfig {
    RepetitionX,
    RepetitionZ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalInput {
    #[default]
    Zero,
    One,
    Plus,
    Minus,
}

impl LogicalInput {
    pub fn state(self) -> StateVector {
        match self {
            LogicalInput::Zero => logical_zero(),
            LogicalInput::One => logical_one(),
            LogicalInput::Plus => plus_state(),
            LogicalInput::Minus => minus_state(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub code: CodeConfig,
    pub noise: NoiseConfig,
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub logical_state: LogicalInput,
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default)]
    pub seed: u64,
}

fn default_trials() -> usize {
    1000
}

/// Constructed pipeline components.
pub struct Pipeline {
    pub logical_state: StateVector,
    pub code: Box<dyn QuantumCode>,
    pub noise: Box<dyn NoiseModel>,
    pub decoder: Box<dyn Decoder>,
    pub key: RandomKey,
    pub trials: usize,
}

impl SimulationConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| QecError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| QecError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn build(&self) -> Result<Pipeline> {
        Ok(Pipeline {
            logical_state: self.logical_state.state(),
            code: self.code.build()?,
            noise: self.noise.build()?,
            decoder: self.decoder.build(),
            key: RandomKey::new(self.seed),
            trials: self.trials,
        })
    }
}

impl CodeConfig {
    pub fn build(&self) -> Result<Box<dyn QuantumCode>> {
        match self {
            CodeConfig::Repetition { n } => Ok(Box::new(RepetitionCode::new(*n)?)),
            CodeConfig::Stabilizer { generators } => {
                let parsed = generators
                    .iter()
                    .map(|g| SymplecticVector::from_pauli(g))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(StabilizerCode::new(parsed)?))
            }
        }
    }
}

impl NoiseConfig {
    pub fn build(&self) -> Result<Box<dyn NoiseModel>> {
        match self {
            NoiseConfig::BitFlip { p } => Ok(Box::new(BitFlip::new(*p)?)),
            NoiseConfig::PhaseFlip { p } => Ok(Box::new(PhaseFlip::new(*p)?)),
            NoiseConfig::Ideal => Ok(Box::new(BitFlip::new(0.0)?)),
        }
    }

    /// Same channel at a different probability; `Ideal` sweeps as bit-flip.
    pub fn with_probability(&self, p: f64) -> NoiseConfig {
        match self {
            NoiseConfig::PhaseFlip { .. } => NoiseConfig::PhaseFlip { p },
            _ => NoiseConfig::BitFlip { p },
        }
    }
}

impl DecoderConfig {
    pub fn build(self) -> Box<dyn Decoder> {
        match self {
            DecoderConfig::RepetitionX => Box::new(RepetitionXDecoder),
            DecoderConfig::RepetitionZ => Box::new(RepetitionZDecoder),
        }
    }
}
