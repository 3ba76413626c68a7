//! # Node Registration Records
//!
//! A node proves liveness by signing a small JSON payload carrying the
//! height it observed:
//!
//! ```text
//! {"Data":"hello world","BlkHeight":"2"}
//! ```
//!
//! The first accepted registration binds the address to the key that signed
//! it. Later registrations must be signed by that same key and carry a
//! strictly greater height equal to the current one.

use super::error::{RotationError, RotationResult};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use shared_types::{Address, BlockHeight};

/// Decoded registration payload.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    /// Opaque node-reported data
    #[serde(rename = "Data", default)]
    pub data: String,
    /// Height the node observed when signing; decimal string on the wire
    #[serde(rename = "BlkHeight")]
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub height: BlockHeight,
}

impl RegistrationInfo {
    pub fn new(data: impl Into<String>, height: BlockHeight) -> Self {
        Self {
            data: data.into(),
            height,
        }
    }

    pub fn parse(payload: &str) -> RotationResult<Self> {
        serde_json::from_str(payload).map_err(|e| RotationError::MalformedPayload(e.to_string()))
    }

    /// Canonical wire form, as nodes sign it.
    pub fn to_payload(&self) -> String {
        format!(
            r#"{{"Data":{},"BlkHeight":"{}"}}"#,
            serde_json::Value::String(self.data.clone()),
            self.height
        )
    }
}

/// Arguments of a `register` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Exact payload bytes the node signed
    pub payload: String,
    pub address: Address,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Per-address registration state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub address: Address,
    /// Key fixed by the first accepted registration
    #[serde(with = "hex")]
    pub bound_pub_key: Vec<u8>,
    pub last_registered_height: BlockHeight,
    /// `Data` of the registration before the last one
    pub previous_data: String,
    /// `Data` of the last accepted registration
    pub current_data: String,
}

impl NodeRecord {
    /// Record created by the first accepted registration.
    pub fn first(address: Address, public_key: Vec<u8>, info: RegistrationInfo) -> Self {
        Self {
            address,
            bound_pub_key: public_key,
            last_registered_height: info.height,
            previous_data: info.data.clone(),
            current_data: info.data,
        }
    }

    /// Apply a later accepted registration.
    pub fn accept(&mut self, info: RegistrationInfo) {
        self.last_registered_height = info.height;
        self.previous_data = std::mem::replace(&mut self.current_data, info.data);
    }

    pub fn is_bound_to(&self, public_key: &[u8]) -> bool {
        self.bound_pub_key == public_key
    }

    /// Registered within `window` heights of `current`.
    pub fn is_fresh(&self, current: BlockHeight, window: u64) -> bool {
        self.last_registered_height.saturating_add(window) >= current
    }

    /// Reported data identical across the last two registrations.
    pub fn data_unchanged(&self) -> bool {
        self.previous_data == self.current_data
    }

    /// Live and unchanged: the node passes attestation.
    pub fn passes_check(&self, current: BlockHeight, window: u64) -> bool {
        self.is_fresh(current, window) && self.data_unchanged()
    }
}

/// Accept a registration only at the current height and only once per height.
///
/// `last` is `None` for an address with no record yet.
pub fn check_epoch(
    submitted: BlockHeight,
    current: BlockHeight,
    last: Option<BlockHeight>,
) -> RotationResult<()> {
    let advances = last.map_or(true, |last| submitted > last);
    if submitted == current && advances {
        Ok(())
    } else {
        Err(RotationError::EpochViolation {
            submitted,
            current,
            last,
        })
    }
}
