//! # Verifier Rotation Table
//!
//! Two slots: the batch scheduled for the next rotation (pending) and the
//! batch currently rotating (active).
//!
//! ```text
//! set_next ──> pending{computed_at = h}
//!                 │ first query at h' > h
//!                 ▼
//!              active{start_height = h'}
//! ```
//!
//! Within the active batch, duty moves one member per height:
//! the verifier at height `h` is `members[(h - start) mod len]` and it checks
//! sub-batch `(h - start) mod batch_count`.

use super::randomizer::BatchPartition;
use serde::{Deserialize, Serialize};
use shared_types::{Address, BlockHeight};

/// Batch computed by `set_next_verify_targets_batch`, not yet rotating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBatch {
    pub partition: BatchPartition,
    pub computed_at: BlockHeight,
}

/// Batch currently rotating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBatch {
    pub partition: BatchPartition,
    pub start_height: BlockHeight,
}

impl ActiveBatch {
    /// Verifier order for this rotation.
    pub fn members(&self) -> Vec<Address> {
        self.partition.members().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }

    fn offset(&self, height: BlockHeight) -> u64 {
        height.saturating_sub(self.start_height)
    }

    /// Member on duty at `height`; `None` for an empty batch.
    pub fn on_duty(&self, height: BlockHeight) -> Option<&Address> {
        let len = self.partition.member_count() as u64;
        if len == 0 {
            return None;
        }
        let index = (self.offset(height) % len) as usize;
        self.partition.members().nth(index)
    }

    /// Sub-batch due for verification at `height`.
    pub fn targets_at(&self, height: BlockHeight) -> &[Address] {
        let count = self.partition.batch_count() as u64;
        if count == 0 {
            return &[];
        }
        let index = (self.offset(height) % count) as usize;
        self.partition.batch(index).unwrap_or_default()
    }
}

/// Pending and active rotation slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierBatchSet {
    pub pending: Option<PendingBatch>,
    pub active: Option<ActiveBatch>,
}

impl VerifierBatchSet {
    /// Promote pending to active once `height` is past its computation height.
    ///
    /// Returns true if the set changed.
    pub fn promote_if_due(&mut self, height: BlockHeight) -> bool {
        let due = matches!(&self.pending, Some(pending) if height > pending.computed_at);
        if !due {
            return false;
        }
        if let Some(pending) = self.pending.take() {
            self.active = Some(ActiveBatch {
                partition: pending.partition,
                start_height: height,
            });
        }
        true
    }

    /// Replace pending with a fresh partition computed at `height`.
    ///
    /// A pending batch that is already due is promoted first, so a rotation
    /// is never skipped.
    pub fn schedule(&mut self, partition: BatchPartition, height: BlockHeight) {
        self.promote_if_due(height);
        self.pending = Some(PendingBatch {
            partition,
            computed_at: height,
        });
    }

    /// Pending partition if any, else the active one.
    pub fn next_target_batch(&self) -> Option<&BatchPartition> {
        self.pending
            .as_ref()
            .map(|pending| &pending.partition)
            .or_else(|| self.active.as_ref().map(|active| &active.partition))
    }

    /// Active batch with at least one member.
    pub fn active_nonempty(&self) -> Option<&ActiveBatch> {
        self.active.as_ref().filter(|active| !active.is_empty())
    }
}

/// Outcome of a scheduled duty call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DutyReport {
    /// The caller is the verifier on duty at this height
    pub on_duty: bool,
    /// Targets of this height's sub-batch that failed attestation
    pub suspicious: Vec<Address>,
}
