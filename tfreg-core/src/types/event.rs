//! Events emitted by successful mutations.
//!
//! The event log is the only audit trail: off-chain indexers and deployment
//! tooling consume it to build secondary indexes. A registration that
//! overwrites an existing address emits the same `ContractRegistered` shape
//! as a first registration.

use serde::{Deserialize, Serialize};

use super::{Address, NetworkId, ResourceHash, Role};

/// An event emitted by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum RegistryEvent {
    /// A contract address was registered (or re-registered).
    #[serde(rename_all = "camelCase")]
    ContractRegistered {
        /// Account that performed the registration
        registrar: Address,
        /// keccak256 of the resource URI
        resource_hash: ResourceHash,
        /// Target network
        network_id: NetworkId,
        /// Registered address
        contract_address: Address,
    },
    /// An account gained a role.
    #[serde(rename_all = "camelCase")]
    RoleGranted {
        /// Granted role
        role: Role,
        /// Account receiving the role
        account: Address,
        /// Account that performed the grant
        sender: Address,
    },
    /// An account lost a role.
    #[serde(rename_all = "camelCase")]
    RoleRevoked {
        /// Revoked role
        role: Role,
        /// Account losing the role
        account: Address,
        /// Account that performed the revocation
        sender: Address,
    },
}

impl RegistryEvent {
    /// Event name as it appears on-chain.
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::ContractRegistered { .. } => "ContractRegistered",
            RegistryEvent::RoleGranted { .. } => "RoleGranted",
            RegistryEvent::RoleRevoked { .. } => "RoleRevoked",
        }
    }
}

/// An event together with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Zero-based position in the event log
    pub sequence: u64,
    /// The event itself
    #[serde(flatten)]
    pub event: RegistryEvent,
}
