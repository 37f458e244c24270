//! Step-wise environment for searching over stabilizer generator sets.
//!
//! An episode starts empty, appends one generator per `step`, and ends once n - k
//! generators are in place. A complete valid set is scored as `1 - logical error rate`
//! of the resulting stabilizer code under bit-flip noise. The policy driving the
//! actions lives outside this crate; one environment serves one episode at a time.

use crate::benchmark::estimate_error_rate;
use crate::codes::{StabilizerCode, MAX_QUBITS};
use crate::decoder::RepetitionXDecoder;
use crate::error::{QecError, Result};
use crate::noise::BitFlip;
use crate::random::RandomKey;
use crate::state::logical_zero;
use crate::symplectic::{
    diagnosis_summary, enumerate_nonidentity_generators, enumerate_z_only_generators, valid_code,
    SymplecticVector,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.05;
pub const DEFAULT_TRIALS: usize = 1000;

// the full action space holds 4^n - 1 generators
pub const MAX_FULL_ACTION_QUBITS: usize = 8;

/// Zero-padded (n - k) x 2n matrix of the generators chosen so far.
pub type Observation = Vec<Vec<u8>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSpace {
    /// Every non-identity Pauli operator.
    #[default]
    Full,
    /// Only products of Z.
    ZOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub n: usize,
    pub k: usize,
    #[serde(default = "default_noise_probability")]
    pub noise_probability: f64,
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default)]
    pub action_space: ActionSpace,
}

fn default_noise_probability() -> f64 {
    DEFAULT_NOISE_PROBABILITY
}

fn default_trials() -> usize {
    DEFAULT_TRIALS
}

impl DiscoveryConfig {
    pub fn new(n: usize, k: usize) -> Self {
        DiscoveryConfig {
            n,
            k,
            noise_probability: DEFAULT_NOISE_PROBABILITY,
            trials: DEFAULT_TRIALS,
            action_space: ActionSpace::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Empty,
    Accumulating(usize),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepInfo {
    pub valid: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

pub struct DiscoveryEnv {
    config: DiscoveryConfig,
    possible_generators: Vec<SymplecticVector>,
    generators: Vec<SymplecticVector>,
    noise: BitFlip,
}

impl DiscoveryEnv {
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        if config.n < 2 || config.k == 0 || config.k >= config.n {
            return Err(QecError::input(format!(
                "discovery needs n >= 2 and 1 <= k < n, got n={} k={}",
                config.n, config.k
            )));
        }
        if config.trials == 0 {
            return Err(QecError::input("discovery scoring needs at least one trial"));
        }
        let max_n = match config.action_space {
            ActionSpace::Full => MAX_FULL_ACTION_QUBITS,
            ActionSpace::ZOnly => MAX_QUBITS,
        };
        if config.n > max_n {
            return Err(QecError::input(format!(
                "{:?} action space supports at most {} qubits, got {}",
                config.action_space, max_n, config.n
            )));
        }
        let noise = BitFlip::new(config.noise_probability)?;
        let possible_generators = match config.action_space {
            ActionSpace::Full => enumerate_nonidentity_generators(config.n),
            ActionSpace::ZOnly => enumerate_z_only_generators(config.n),
        };
        debug!(
            "discovery env for [[{}, {}]] with {} actions",
            config.n,
            config.k,
            possible_generators.len()
        );
        Ok(DiscoveryEnv {
            config,
            possible_generators,
            generators: Vec::new(),
            noise,
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Action universe; its length is the action-space size.
    pub fn possible_generators(&self) -> &[SymplecticVector] {
        &self.possible_generators
    }

    pub fn generators(&self) -> &[SymplecticVector] {
        &self.generators
    }

    pub fn max_steps(&self) -> usize {
        self.config.n - self.config.k
    }

    pub fn phase(&self) -> EpisodePhase {
        match self.generators.len() {
            0 => EpisodePhase::Empty,
            m if m >= self.max_steps() => EpisodePhase::Complete,
            m => EpisodePhase::Accumulating(m),
        }
    }

    pub fn reset(&mut self) -> Observation {
        self.generators.clear();
        self.observation()
    }

    pub fn observation(&self) -> Observation {
        let mut rows = vec![vec![0u8; 2 * self.config.n]; self.max_steps()];
        for (row, g) in rows.iter_mut().zip(&self.generators) {
            row.copy_from_slice(g.bits());
        }
        rows
    }

    /// Append generator `action`; `key` seeds the scoring run when the set is complete.
    pub fn step(&mut self, action: usize, key: &RandomKey) -> Result<StepOutcome> {
        if self.phase() == EpisodePhase::Complete {
            return Err(QecError::state("episode is complete, reset before stepping"));
        }
        let generator = self.possible_generators.get(action).ok_or_else(|| {
            QecError::input(format!(
                "action {} out of range for {} generators",
                action,
                self.possible_generators.len()
            ))
        })?;
        self.generators.push(generator.clone());
        trace!("step {}: added {}", self.generators.len(), generator);

        let (n, k) = (self.config.n, self.config.k);
        let done = self.phase() == EpisodePhase::Complete;
        let valid = valid_code(&self.generators, n, k)?;

        let mut reward = 0.0;
        if done && valid {
            let code = StabilizerCode::new(self.generators.clone())?;
            let rate = estimate_error_rate(
                &logical_zero(),
                &code,
                &self.noise,
                &RepetitionXDecoder,
                key,
                self.config.trials,
            )?;
            reward = (1.0 - rate).clamp(0.0, 1.0);
            debug!(
                "scored {} -> reward {:.4}",
                self.generators
                    .iter()
                    .map(|g| g.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
                reward
            );
        }

        Ok(StepOutcome {
            observation: self.observation(),
            reward,
            done,
            info: StepInfo {
                valid,
                reason: diagnosis_summary(&self.generators, n, k),
            },
        })
    }
}
