//! Default randomness provider.

use crate::domain::{KeccakShuffleSource, ShuffleSource};
use crate::ports::RandomnessProvider;
use shared_types::BlockHeight;

/// Keccak-256 hash chains seeded from the host seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeccakRandomness;

impl RandomnessProvider for KeccakRandomness {
    fn source(&self, seed: i64, height: Option<BlockHeight>) -> Box<dyn ShuffleSource> {
        match height {
            Some(height) => Box::new(KeccakShuffleSource::for_rotation(seed, height)),
            None => Box::new(KeccakShuffleSource::from_seed(seed)),
        }
    }
}
