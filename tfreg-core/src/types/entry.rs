//! Registry entries and statistics.

use serde::{Deserialize, Serialize};

use super::Address;

/// Network (chain) identifier, e.g. `137` for Polygon or `43114` for Avalanche.
pub type NetworkId = u64;

/// Where a resource is deployed on a given network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Network the contract lives on
    pub network_id: NetworkId,
    /// Deployed contract address
    pub contract_address: Address,
}

impl Entry {
    /// Creates a new entry.
    pub fn new(network_id: NetworkId, contract_address: Address) -> Self {
        Self {
            network_id,
            contract_address,
        }
    }
}

/// Aggregate counters over the registry state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Distinct resource hashes with at least one entry
    pub resource_count: u64,
    /// Total (resource, network) entries
    pub entry_count: u64,
    /// Successful register calls, overwrites included
    pub registration_count: u64,
    /// Register calls that replaced an existing address
    pub overwrite_count: u64,
    /// Events in the log
    pub event_count: u64,
}
