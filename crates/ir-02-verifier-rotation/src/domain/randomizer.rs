//! # Batch Randomizer
//!
//! Deterministic shuffle-and-split of an address list into sub-batches.
//!
//! ## Algorithm
//!
//! 1. Fisher-Yates: for `c = n..1`, draw `j = below(c)` and swap positions
//!    `c - 1` and `j`
//! 2. Split the shuffled list into `batch_count` contiguous chunks of
//!    `floor(n / batch_count)`, the remainder going one each to the
//!    earliest chunks
//!
//! Draws come from a [`ShuffleSource`]. The default source is a Keccak-256
//! hash chain, so the output is a pure function of
//! `(seed, salt, input list, batch count)`.

use super::error::{RotationError, RotationResult};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::{join_addresses, Address, BlockHeight};

/// Domain tag for the direct `randomizeBatch` command.
const DIRECT_DOMAIN: &[u8] = b"verifier-rotation/randomize-batch";
/// Domain tag for rotation scheduling.
const ROTATION_DOMAIN: &[u8] = b"verifier-rotation/rotation";

/// Source of uniform draws for the shuffle.
pub trait ShuffleSource {
    /// Uniform integer in `0..bound`. Never called with `bound == 0`.
    fn below(&mut self, bound: usize) -> usize;
}

impl<S: ShuffleSource + ?Sized> ShuffleSource for Box<S> {
    fn below(&mut self, bound: usize) -> usize {
        (**self).below(bound)
    }
}

// =============================================================================
// KECCAK HASH CHAIN
// =============================================================================

/// Keccak-256 hash chain.
///
/// Each draw advances `state = keccak(state || counter)` and takes the first
/// eight bytes as a little-endian word. Rejection sampling keeps draws
/// unbiased.
#[derive(Clone, Debug)]
pub struct KeccakShuffleSource {
    state: [u8; 32],
    counter: u64,
}

impl KeccakShuffleSource {
    /// Source for the direct randomize command, seeded by the host seed alone.
    ///
    /// Draws are specific to this hash chain: a host that shuffles with its
    /// own PRNG (a JavaScript `Math.random`, say) gets different batches for
    /// the same seed.
    pub fn from_seed(seed: i64) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(DIRECT_DOMAIN);
        hasher.update(seed.to_le_bytes());
        Self::from_state(hasher.finalize().into())
    }

    /// Source for rotation scheduling, salted with the height.
    pub fn for_rotation(seed: i64, height: BlockHeight) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(ROTATION_DOMAIN);
        hasher.update(seed.to_le_bytes());
        hasher.update(height.to_le_bytes());
        Self::from_state(hasher.finalize().into())
    }

    fn from_state(state: [u8; 32]) -> Self {
        Self { state, counter: 0 }
    }

    fn next_u64(&mut self) -> u64 {
        let mut hasher = Keccak256::new();
        hasher.update(self.state);
        hasher.update(self.counter.to_le_bytes());
        self.state = hasher.finalize().into();
        self.counter += 1;

        let mut word = [0u8; 8];
        word.copy_from_slice(&self.state[..8]);
        u64::from_le_bytes(word)
    }
}

impl ShuffleSource for KeccakShuffleSource {
    fn below(&mut self, bound: usize) -> usize {
        let bound = bound as u64;
        // Largest multiple of `bound` that fits; words at or above it are redrawn
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let word = self.next_u64();
            if word < zone {
                return (word % bound) as usize;
            }
        }
    }
}

// =============================================================================
// BATCH PARTITION
// =============================================================================

/// Ordered sub-batches `0..batch_count`.
///
/// Flattened in index order, the partition is the shuffled list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchPartition {
    batches: Vec<Vec<Address>>,
}

impl BatchPartition {
    pub fn new(batches: Vec<Vec<Address>>) -> Self {
        Self { batches }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn batch(&self, index: usize) -> Option<&[Address]> {
        self.batches.get(index).map(Vec::as_slice)
    }

    pub fn batches(&self) -> &[Vec<Address>] {
        &self.batches
    }

    /// Members in shuffled order.
    pub fn members(&self) -> impl Iterator<Item = &Address> {
        self.batches.iter().flatten()
    }

    pub fn member_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    /// True when no sub-batch has a member.
    pub fn is_empty(&self) -> bool {
        self.member_count() == 0
    }

    /// Wire form: `{"0":"a,b","1":"c",...}`, keys in index order.
    pub fn to_json_string(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .batches
            .iter()
            .enumerate()
            .map(|(i, batch)| (i.to_string(), join_addresses(batch).into()))
            .collect();
        serde_json::Value::Object(map).to_string()
    }
}

// =============================================================================
// SHUFFLE AND SPLIT
// =============================================================================

/// Shuffle `items` in place with draws from `source`.
pub fn shuffle<T, S>(items: &mut [T], source: &mut S)
where
    S: ShuffleSource + ?Sized,
{
    let mut remaining = items.len();
    while remaining > 0 {
        let pick = source.below(remaining);
        remaining -= 1;
        items.swap(remaining, pick);
    }
}

/// Split into `batch_count` contiguous chunks; earlier chunks take the remainder.
///
/// `batch_count` must be non-zero.
pub fn split_into_batches<T>(items: Vec<T>, batch_count: usize) -> Vec<Vec<T>> {
    let base = items.len() / batch_count;
    let extra = items.len() % batch_count;

    let mut rest = items.into_iter();
    (0..batch_count)
        .map(|i| {
            let size = base + usize::from(i < extra);
            rest.by_ref().take(size).collect()
        })
        .collect()
}

/// Shuffle `addresses` and split them into `batch_count` sub-batches.
pub fn randomize_batch<S>(
    addresses: &[Address],
    batch_count: usize,
    source: &mut S,
) -> RotationResult<BatchPartition>
where
    S: ShuffleSource + ?Sized,
{
    if batch_count == 0 {
        return Err(RotationError::InvalidBatchCount);
    }

    let mut shuffled = addresses.to_vec();
    shuffle(&mut shuffled, source);
    Ok(BatchPartition::new(split_into_batches(shuffled, batch_count)))
}
