//! Admin bootstrap records

use super::error::{RotationError, RotationResult};
use serde::{Deserialize, Serialize};
use shared_types::{join_addresses, Address, ADDRESS_SEPARATOR};
use std::collections::HashSet;

/// Admin key and the ordered set of addresses allowed to register.
///
/// Written once by `setup` and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(with = "hex")]
    pub admin_pub_key: Vec<u8>,
    pub eligible_addresses: Vec<Address>,
}

impl AdminConfig {
    pub fn is_eligible(&self, address: &Address) -> bool {
        self.eligible_addresses.contains(address)
    }
}

/// Arguments of a `setup` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupRequest {
    /// Eligible addresses, in the order later used for pool selection
    pub addresses: Vec<Address>,
    pub admin_pub_key: Vec<u8>,
    /// Admin signature over [`SetupRequest::signed_payload`]
    pub signature: Vec<u8>,
}

impl SetupRequest {
    /// The comma-joined address list the admin signs.
    pub fn signed_payload(&self) -> String {
        join_addresses(&self.addresses)
    }

    /// The list must be non-empty, with distinct addresses that are
    /// non-empty and free of [`ADDRESS_SEPARATOR`], so that the signed
    /// payload names exactly one list.
    pub fn check_addresses(&self) -> RotationResult<()> {
        if self.addresses.is_empty() {
            return Err(RotationError::EmptyAddressList);
        }

        let mut seen = HashSet::with_capacity(self.addresses.len());
        for address in &self.addresses {
            if address.is_empty() {
                return Err(RotationError::MalformedAddressList(
                    "empty address".to_string(),
                ));
            }
            if address.as_str().contains(ADDRESS_SEPARATOR) {
                return Err(RotationError::MalformedAddressList(format!(
                    "address \"{address}\" contains '{ADDRESS_SEPARATOR}'"
                )));
            }
            if !seen.insert(address) {
                return Err(RotationError::MalformedAddressList(format!(
                    "duplicate address {address}"
                )));
            }
        }
        Ok(())
    }

    pub fn into_config(self) -> AdminConfig {
        AdminConfig {
            admin_pub_key: self.admin_pub_key,
            eligible_addresses: self.addresses,
        }
    }
}
