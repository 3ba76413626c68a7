//! # Core Domain Entities
//!
//! Node identity and the per-call context injected by the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Height of the external monotonic counter (e.g. a blockchain height).
pub type BlockHeight = u64;

/// Separator used wherever address lists are serialized as text.
pub const ADDRESS_SEPARATOR: char = ',';

/// Opaque node address derived from a public key.
///
/// Keys all per-node state. Two addresses are equal only if their textual
/// forms are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap a textual address.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty address (no identity).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Join addresses with [`ADDRESS_SEPARATOR`], preserving order.
pub fn join_addresses<'a, I>(addresses: I) -> String
where
    I: IntoIterator<Item = &'a Address>,
{
    let mut joined = String::new();
    for (i, address) in addresses.into_iter().enumerate() {
        if i > 0 {
            joined.push(ADDRESS_SEPARATOR);
        }
        joined.push_str(address.as_str());
    }
    joined
}

/// Inputs injected by the host before each call.
///
/// Must not change while a call is being processed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessContext {
    /// Current height of the external counter.
    pub current_height: BlockHeight,
    /// Pseudo-random seed supplied by the host.
    pub seed: i64,
    /// Address of the node executing the call, if any.
    pub caller: Option<Address>,
}

impl ProcessContext {
    /// Context without a caller identity.
    pub fn new(current_height: BlockHeight, seed: i64) -> Self {
        Self {
            current_height,
            seed,
            caller: None,
        }
    }

    /// Attach the caller address.
    pub fn with_caller(mut self, caller: impl Into<Address>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// Same context at another height.
    pub fn at_height(&self, current_height: BlockHeight) -> Self {
        Self {
            current_height,
            ..self.clone()
        }
    }

    /// Caller identity; an empty address counts as absent.
    pub fn caller(&self) -> Option<&Address> {
        self.caller.as_ref().filter(|caller| !caller.is_empty())
    }
}
