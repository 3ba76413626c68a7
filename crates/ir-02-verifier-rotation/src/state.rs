//! Typed view over the key-value store for one call.
//!
//! Reads go to the store, overlaid with writes staged earlier in the same
//! call. Staged writes reach the store only through [`StateView::commit`],
//! as one atomic batch; a call that returns early without committing leaves
//! the store untouched.

use crate::domain::{AdminConfig, KVStoreError, NodeRecord, VerifierBatchSet};
use crate::ports::{BatchOperation, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::Address;
use std::collections::HashMap;

/// Storage keys.
pub mod keys {
    use shared_types::Address;

    /// Admin configuration record.
    pub const ADMIN: &str = "admin";
    /// Pending and active rotation slots.
    pub const BATCHES: &str = "batches";

    const NODE_PREFIX: &str = "node:";

    /// Per-address registration record.
    pub fn node(address: &Address) -> String {
        format!("{NODE_PREFIX}{address}")
    }
}

pub struct StateView<'a, K: KeyValueStore + ?Sized> {
    store: &'a mut K,
    staged: HashMap<String, String>,
    order: Vec<String>,
}

impl<'a, K: KeyValueStore + ?Sized> StateView<'a, K> {
    pub fn new(store: &'a mut K) -> Self {
        Self {
            store,
            staged: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn admin(&self) -> Result<Option<AdminConfig>, KVStoreError> {
        self.read(keys::ADMIN)
    }

    pub fn put_admin(&mut self, admin: &AdminConfig) -> Result<(), KVStoreError> {
        self.stage(keys::ADMIN.to_string(), admin)
    }

    pub fn node(&self, address: &Address) -> Result<Option<NodeRecord>, KVStoreError> {
        self.read(&keys::node(address))
    }

    pub fn put_node(&mut self, record: &NodeRecord) -> Result<(), KVStoreError> {
        self.stage(keys::node(&record.address), record)
    }

    /// Rotation slots; both empty before the first scheduling.
    pub fn batches(&self) -> Result<VerifierBatchSet, KVStoreError> {
        Ok(self.read(keys::BATCHES)?.unwrap_or_default())
    }

    pub fn put_batches(&mut self, batches: &VerifierBatchSet) -> Result<(), KVStoreError> {
        self.stage(keys::BATCHES.to_string(), batches)
    }

    pub fn has_staged_writes(&self) -> bool {
        !self.order.is_empty()
    }

    /// Write everything staged so far in one atomic batch.
    pub fn commit(&mut self) -> Result<(), KVStoreError> {
        if self.order.is_empty() {
            return Ok(());
        }
        let mut staged = std::mem::take(&mut self.staged);
        let operations = std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|key| {
                let value = staged.remove(&key)?;
                Some(BatchOperation::put(key, value))
            })
            .collect();
        self.store.atomic_batch_write(operations)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KVStoreError> {
        let raw = match self.staged.get(key) {
            Some(value) => Some(value.clone()),
            None => self.store.get(key)?,
        };
        raw.map(|value| {
            serde_json::from_str(&value).map_err(|e| KVStoreError::CorruptionError {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
    }

    fn stage<T: Serialize>(&mut self, key: String, value: &T) -> Result<(), KVStoreError> {
        let encoded = serde_json::to_string(value).map_err(|e| KVStoreError::CorruptionError {
            key: key.clone(),
            message: e.to_string(),
        })?;
        if self.staged.insert(key.clone(), encoded).is_none() {
            self.order.push(key);
        }
        Ok(())
    }
}
