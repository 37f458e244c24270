//! Splittable random keys.
//!
//! Every random draw in the simulator comes from a `RandomKey` handed in by the caller.
//! Keys form a tree: `split_n` derives children from a dedicated ChaCha stream of the
//! parent seed, so a child never advances its parent and the i-th child is the same no
//! matter which thread asks for it or in what order.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

// chacha stream used for sampling; splitting draws from a separate stream
const SAMPLE_STREAM: u64 = 0;
const SPLIT_STREAM: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RandomKey {
    seed: [u8; 32],
}

impl RandomKey {
    /// Derive a key from a user-facing integer seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        RandomKey { seed: bytes }
    }

    /// Split into two independent children.
    pub fn split(&self) -> (RandomKey, RandomKey) {
        let mut rng = self.stream(SPLIT_STREAM);
        (Self::draw(&mut rng), Self::draw(&mut rng))
    }

    /// Split into `count` independent children, child i at index i.
    pub fn split_n(&self, count: usize) -> Vec<RandomKey> {
        let mut rng = self.stream(SPLIT_STREAM);
        (0..count).map(|_| Self::draw(&mut rng)).collect()
    }

    /// A generator positioned at the start of this key's sampling stream.
    pub fn rng(&self) -> ChaCha20Rng {
        self.stream(SAMPLE_STREAM)
    }

    fn stream(&self, stream: u64) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::from_seed(self.seed);
        rng.set_stream(stream);
        rng
    }

    fn draw(rng: &mut ChaCha20Rng) -> RandomKey {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        RandomKey { seed: bytes }
    }
}

impl Default for RandomKey {
    fn default() -> Self {
        RandomKey::new(0)
    }
}
