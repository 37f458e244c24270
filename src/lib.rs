pub mod benchmark; // monte-carlo error rates
pub mod codes; // repetition and stabilizer codes
pub mod config; // json configuration
pub mod decoder; // syndrome decoders
pub mod discovery; // code-discovery environment
pub mod error; // error types
pub mod noise; // bit-flip and phase-flip channels
pub mod random; // splittable random keys
pub mod simulation; // single error-correction cycle
pub mod state; // amplitude vectors
pub mod symplectic; // gf(2) stabilizer algebra


pub use benchmark::{estimate, estimate_error_rate, ErrorRateEstimate};
pub use codes::{QuantumCode, RepetitionCode, StabilizerCode, Syndrome};
pub use decoder::{Decoder, RepetitionXDecoder, RepetitionZDecoder};
pub use discovery::{DiscoveryConfig, DiscoveryEnv};
pub use error::{QecError, Result};
pub use noise::{BitFlip, NoiseModel, PhaseFlip};
pub use random::RandomKey;
pub use simulation::simulate;
pub use state::StateVector;
pub use symplectic::SymplecticVector;
