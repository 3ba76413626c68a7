//! Driving ports (API)

use crate::domain::{
    BatchPartition, DutyReport, RegistrationRequest, RotationResult, SetupRequest,
};
use shared_types::{Address, ProcessContext};

/// Verifier rotation API.
///
/// Every call reads its height, seed and caller from the supplied
/// [`ProcessContext`]; nothing else about the environment is observed.
pub trait VerifierRotationApi: Send + Sync {
    /// Bootstrap the admin key and the eligible address list (write-once).
    fn setup(&self, ctx: &ProcessContext, request: SetupRequest) -> RotationResult<()>;

    /// Accept a signed liveness registration from an eligible node.
    fn register(&self, ctx: &ProcessContext, request: RegistrationRequest) -> RotationResult<()>;

    /// Whether `address` is live at the current height with unchanged data.
    fn check(&self, ctx: &ProcessContext, address: &Address) -> RotationResult<bool>;

    /// Shuffle and split an arbitrary list, seeded by the context seed.
    fn randomize_batch(
        &self,
        ctx: &ProcessContext,
        addresses: &[Address],
        batch_count: usize,
    ) -> RotationResult<BatchPartition>;

    /// Partition the currently qualified pool and schedule it as pending.
    fn set_next_verify_targets_batch(&self, ctx: &ProcessContext)
        -> RotationResult<BatchPartition>;

    /// Pending partition, else active partition, else `None`.
    fn get_next_verify_target_batch(
        &self,
        ctx: &ProcessContext,
    ) -> RotationResult<Option<BatchPartition>>;

    /// Active verifier order; empty when nothing is rotating.
    fn get_next_verifier_batch(&self, ctx: &ProcessContext) -> RotationResult<Vec<Address>>;

    /// Sub-batch of the active rotation due at the current height.
    fn current_verify_targets(&self, ctx: &ProcessContext) -> RotationResult<Vec<Address>>;

    /// Whether the caller is the verifier on duty, checking its targets if so.
    fn dapp_schedule(&self, ctx: &ProcessContext) -> RotationResult<DutyReport>;
}
