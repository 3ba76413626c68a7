//! Rotation Service - Core business logic
//!
//! # Architecture
//! - One store lock held for the whole read-modify-write of a call
//! - Writes staged in a [`StateView`] and committed as one atomic batch
//! - Rejections return before commit, so they never change stored state

use crate::adapters::{KeccakRandomness, KeyHashAddressVerifier};
use crate::domain::{
    check_epoch, randomize_batch, AdminConfig, BatchPartition, DutyReport, NodeRecord,
    RegistrationInfo, RegistrationRequest, RotationConfig, RotationError, RotationResult,
    SetupRequest, VerifierBatchSet,
};
use crate::ports::{
    AddressVerifier, KeyValueStore, RandomnessProvider, SignatureVerifier, VerifierRotationApi,
};
use crate::state::StateView;
use parking_lot::{Mutex, MutexGuard};
use shared_types::{Address, BlockHeight, ProcessContext};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rotation Service
pub struct RotationService<K, S>
where
    K: KeyValueStore,
    S: SignatureVerifier,
{
    store: Mutex<K>,
    sig_verifier: Arc<S>,
    config: RotationConfig,
    randomness: Box<dyn RandomnessProvider>,
    addresses: Box<dyn AddressVerifier>,
}

/// Dependencies for RotationService
pub struct RotationDependencies<K, S> {
    pub store: K,
    pub sig_verifier: Arc<S>,
    pub config: RotationConfig,
}

impl<K, S> RotationService<K, S>
where
    K: KeyValueStore,
    S: SignatureVerifier,
{
    /// Create a new RotationService
    pub fn new(deps: RotationDependencies<K, S>) -> Self {
        Self {
            store: Mutex::new(deps.store),
            sig_verifier: deps.sig_verifier,
            config: deps.config,
            randomness: Box::new(KeccakRandomness),
            addresses: Box::new(KeyHashAddressVerifier),
        }
    }

    /// Set custom randomness (for testing)
    pub fn with_randomness(mut self, randomness: Box<dyn RandomnessProvider>) -> Self {
        self.randomness = randomness;
        self
    }

    /// Set custom address ownership rules (for testing)
    pub fn with_address_verifier(mut self, addresses: Box<dyn AddressVerifier>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Lock the underlying store.
    pub fn store(&self) -> MutexGuard<'_, K> {
        self.store.lock()
    }

    /// Give back the store.
    pub fn into_store(self) -> K {
        self.store.into_inner()
    }

    // === HELPERS ===

    fn passes_check<T>(
        &self,
        view: &StateView<'_, T>,
        address: &Address,
        height: BlockHeight,
    ) -> RotationResult<bool>
    where
        T: KeyValueStore + ?Sized,
    {
        Ok(view
            .node(address)?
            .is_some_and(|record| record.passes_check(height, self.config.freshness_window)))
    }

    /// Load rotation slots, promoting a due pending batch.
    ///
    /// The promotion is staged; the caller commits it.
    fn observe_batches<T>(
        &self,
        view: &mut StateView<'_, T>,
        height: BlockHeight,
    ) -> RotationResult<VerifierBatchSet>
    where
        T: KeyValueStore + ?Sized,
    {
        let mut batches = view.batches()?;
        if batches.promote_if_due(height) {
            info!(
                height,
                members = batches.active.as_ref().map_or(0, |a| a.partition.member_count()),
                "verifier batch promoted to active"
            );
            view.put_batches(&batches)?;
        }
        Ok(batches)
    }

    fn with_view<R>(
        &self,
        f: impl FnOnce(&mut StateView<'_, K>) -> RotationResult<R>,
    ) -> RotationResult<R> {
        let mut store = self.store.lock();
        let mut view = StateView::new(&mut *store);
        let result = f(&mut view)?;
        view.commit()?;
        Ok(result)
    }
}

impl<K, S> VerifierRotationApi for RotationService<K, S>
where
    K: KeyValueStore,
    S: SignatureVerifier,
{
    fn setup(&self, _ctx: &ProcessContext, request: SetupRequest) -> RotationResult<()> {
        self.with_view(|view| {
            if view.admin()?.is_some() {
                warn!("setup rejected: already configured");
                return Err(RotationError::AlreadyConfigured);
            }
            if let Err(e) = request.check_addresses() {
                warn!(error = %e, "setup rejected");
                return Err(e);
            }
            if let Some(trusted) = &self.config.trusted_admin_key {
                if *trusted != request.admin_pub_key {
                    warn!(
                        admin_key = %hex::encode(&request.admin_pub_key),
                        "setup rejected: untrusted admin key"
                    );
                    return Err(RotationError::UntrustedAdmin);
                }
            }

            let payload = request.signed_payload();
            if !self
                .sig_verifier
                .verify(payload.as_bytes(), &request.admin_pub_key, &request.signature)
            {
                warn!("setup rejected: bad admin signature");
                return Err(RotationError::SignatureInvalid);
            }

            let admin: AdminConfig = request.into_config();
            view.put_admin(&admin)?;
            info!(
                eligible = admin.eligible_addresses.len(),
                "admin configuration stored"
            );
            Ok(())
        })
    }

    fn register(&self, ctx: &ProcessContext, request: RegistrationRequest) -> RotationResult<()> {
        self.with_view(|view| {
            let admin = view.admin()?.ok_or(RotationError::NotYetConfigured)?;
            if !admin.is_eligible(&request.address) {
                warn!(address = %request.address, "registration rejected: not eligible");
                return Err(RotationError::NotEligible(request.address));
            }

            let info = RegistrationInfo::parse(&request.payload)?;

            if !self.sig_verifier.verify(
                request.payload.as_bytes(),
                &request.public_key,
                &request.signature,
            ) {
                warn!(address = %request.address, "registration rejected: bad signature");
                return Err(RotationError::SignatureInvalid);
            }

            if !self.addresses.owns(&request.address, &request.public_key) {
                warn!(
                    address = %request.address,
                    "registration rejected: address not derived from key"
                );
                return Err(RotationError::IdentityMismatch(request.address));
            }

            let existing = view.node(&request.address)?;
            if let Some(record) = &existing {
                if !record.is_bound_to(&request.public_key) {
                    warn!(address = %request.address, "registration rejected: key mismatch");
                    return Err(RotationError::IdentityMismatch(request.address));
                }
            }

            let last = existing.as_ref().map(|r| r.last_registered_height);
            if let Err(e) = check_epoch(info.height, ctx.current_height, last) {
                warn!(address = %request.address, error = %e, "registration rejected");
                return Err(e);
            }

            let height = info.height;
            let record = match existing {
                Some(mut record) => {
                    record.accept(info);
                    record
                }
                None => NodeRecord::first(request.address, request.public_key, info),
            };
            view.put_node(&record)?;
            debug!(address = %record.address, height, "registration accepted");
            Ok(())
        })
    }

    fn check(&self, ctx: &ProcessContext, address: &Address) -> RotationResult<bool> {
        let mut store = self.store.lock();
        let view = StateView::new(&mut *store);
        self.passes_check(&view, address, ctx.current_height)
    }

    fn randomize_batch(
        &self,
        ctx: &ProcessContext,
        addresses: &[Address],
        batch_count: usize,
    ) -> RotationResult<BatchPartition> {
        let mut source = self.randomness.source(ctx.seed, None);
        randomize_batch(addresses, batch_count, &mut *source)
    }

    fn set_next_verify_targets_batch(
        &self,
        ctx: &ProcessContext,
    ) -> RotationResult<BatchPartition> {
        let height = ctx.current_height;
        self.with_view(|view| {
            let admin = view.admin()?.ok_or(RotationError::NotYetConfigured)?;

            let mut pool = Vec::with_capacity(admin.eligible_addresses.len());
            for address in &admin.eligible_addresses {
                if self.passes_check(view, address, height)? {
                    pool.push(address.clone());
                }
            }

            let mut source = self.randomness.source(ctx.seed, Some(height));
            let partition =
                randomize_batch(&pool, self.config.target_batch_count, &mut *source)?;

            let mut batches = view.batches()?;
            batches.schedule(partition.clone(), height);
            view.put_batches(&batches)?;
            info!(
                height,
                qualified = pool.len(),
                eligible = admin.eligible_addresses.len(),
                "next verify-target batch scheduled"
            );
            Ok(partition)
        })
    }

    fn get_next_verify_target_batch(
        &self,
        ctx: &ProcessContext,
    ) -> RotationResult<Option<BatchPartition>> {
        self.with_view(|view| {
            let batches = self.observe_batches(view, ctx.current_height)?;
            Ok(batches.next_target_batch().cloned())
        })
    }

    fn get_next_verifier_batch(&self, ctx: &ProcessContext) -> RotationResult<Vec<Address>> {
        self.with_view(|view| {
            let batches = self.observe_batches(view, ctx.current_height)?;
            Ok(batches
                .active
                .as_ref()
                .map(|active| active.members())
                .unwrap_or_default())
        })
    }

    fn current_verify_targets(&self, ctx: &ProcessContext) -> RotationResult<Vec<Address>> {
        let height = ctx.current_height;
        self.with_view(|view| {
            let batches = self.observe_batches(view, height)?;
            Ok(batches
                .active
                .as_ref()
                .map(|active| active.targets_at(height).to_vec())
                .unwrap_or_default())
        })
    }

    fn dapp_schedule(&self, ctx: &ProcessContext) -> RotationResult<DutyReport> {
        let caller = ctx
            .caller()
            .cloned()
            .ok_or(RotationError::MissingCallerIdentity)?;
        let height = ctx.current_height;

        let mut store = self.store.lock();
        let mut view = StateView::new(&mut *store);
        let batches = self.observe_batches(&mut view, height)?;
        view.commit()?;

        let active = batches.active_nonempty().ok_or(RotationError::NoActiveBatch)?;
        let on_duty = active.on_duty(height) == Some(&caller);
        if !on_duty {
            return Ok(DutyReport::default());
        }

        let mut suspicious = Vec::new();
        for target in active.targets_at(height) {
            if !self.passes_check(&view, target, height)? {
                warn!(node = %target, verifier = %caller, height, "node might be compromised");
                suspicious.push(target.clone());
            }
        }
        debug!(verifier = %caller, height, suspicious = suspicious.len(), "duty performed");

        Ok(DutyReport {
            on_duty,
            suspicious,
        })
    }
}
