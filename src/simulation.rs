//! One error-correction cycle: encode, noise, measure, syndrome, decode.

use crate::codes::{QuantumCode, Syndrome};
use crate::decoder::Decoder;
use crate::error::Result;
use crate::noise::NoiseModel;
use crate::random::RandomKey;
use crate::state::StateVector;
use log::trace;
use serde::Serialize;

/// Every intermediate value of a cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleTrace {
    pub encoded: StateVector,
    pub noisy: StateVector,
    pub collapsed: StateVector,
    pub syndrome: Syndrome,
    pub corrected: StateVector,
}

/// Runs a cycle and keeps the intermediates. The key is split in two: the first child
/// drives the noise, the second the measurement.
pub fn run_cycle<C, N, D>(
    logical_state: &StateVector,
    code: &C,
    noise_model: &N,
    decoder: &D,
    key: &RandomKey,
) -> Result<CycleTrace>
where
    C: QuantumCode + ?Sized,
    N: NoiseModel + ?Sized,
    D: Decoder + ?Sized,
{
    let (noise_key, measure_key) = key.split();

    let encoded = code.encode(logical_state)?;
    let noisy = noise_model.apply(&encoded, &noise_key)?;
    let collapsed = code.measure(&noisy, &measure_key)?;
    let syndrome = code.measure_syndrome_collapsed(&collapsed)?;
    let corrected = decoder.decode(&collapsed, &syndrome)?;

    trace!(
        "{} cycle: measured {} syndrome {:?} corrected {}",
        noise_model.name(),
        collapsed.to_braket(),
        syndrome.bits(),
        corrected.to_braket()
    );

    Ok(CycleTrace {
        encoded,
        noisy,
        collapsed,
        syndrome,
        corrected,
    })
}

/// The corrected physical state after one cycle.
pub fn simulate<C, N, D>(
    logical_state: &StateVector,
    code: &C,
    noise_model: &N,
    decoder: &D,
    key: &RandomKey,
) -> Result<StateVector>
where
    C: QuantumCode + ?Sized,
    N: NoiseModel + ?Sized,
    D: Decoder + ?Sized,
{
    run_cycle(logical_state, code, noise_model, decoder, key).map(|trace| trace.corrected)
}
