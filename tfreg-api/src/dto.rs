//! DTOs for API requests and responses.
//!
//! Field names are camelCase on the wire. Addresses leave the API EIP-55
//! checksummed; hashes and role ids as 0x-prefixed lowercase hex.

use serde::{Deserialize, Serialize};
use tfreg_core::types::{Address, Entry, LoggedEvent, NetworkId, RegistryEvent, RegistryStats, Role};
use tfreg_crypto::to_checksum_address;

/// Request to register a contract address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterContractRequest {
    /// Resource URI, hashed verbatim
    pub uri: String,
    /// Target network
    pub network_id: NetworkId,
    /// Contract address (hex, checksum verified if mixed case)
    pub contract_address: String,
}

/// Response for a successful registration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterContractResponse {
    /// keccak256 of the URI
    pub resource_hash: String,
    /// Target network
    pub network_id: NetworkId,
    /// Registered address
    pub contract_address: String,
    /// Account that registered it
    pub registrar: String,
}

/// `?uri=` query parameter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UriQuery {
    /// Resource URI
    pub uri: String,
}

/// A single (network, address) lookup result.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    /// keccak256 of the resource URI
    pub resource_hash: String,
    /// Requested network
    pub network_id: NetworkId,
    /// Registered address, or the zero address when absent
    pub contract_address: String,
}

/// One entry of a resource.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDto {
    /// Network the contract lives on
    pub network_id: NetworkId,
    /// Deployed contract address
    pub contract_address: String,
}

impl From<Entry> for EntryDto {
    fn from(entry: Entry) -> Self {
        Self {
            network_id: entry.network_id,
            contract_address: to_checksum_address(&entry.contract_address),
        }
    }
}

/// All entries of a resource, in first-registration order.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractsResponse {
    /// keccak256 of the resource URI
    pub resource_hash: String,
    /// Entries; empty when the resource is unknown
    pub entries: Vec<EntryDto>,
}

/// Request to grant or revoke a role.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    /// Role name or 32-byte role id
    pub role: String,
    /// Target account
    pub account: String,
}

/// Role membership of an account.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    /// Role name
    pub role: Role,
    /// On-chain role id
    pub role_id: String,
    /// Account in question
    pub account: String,
    /// Whether the account holds the role
    pub has_role: bool,
}

impl RoleResponse {
    /// Builds a response for `role`/`account`.
    pub fn new(role: Role, account: &Address, has_role: bool) -> Self {
        Self {
            role,
            role_id: role.id_hex(),
            account: to_checksum_address(account),
            has_role,
        }
    }
}

/// Paging parameters for the event log.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    /// First sequence number to return
    pub from: Option<u64>,
    /// Maximum number of events
    pub limit: Option<usize>,
}

/// An event as exposed by the API.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EventDto {
    /// A contract address was registered (or re-registered).
    #[serde(rename_all = "camelCase")]
    ContractRegistered {
        /// Account that performed the registration
        registrar: String,
        /// keccak256 of the resource URI
        resource_hash: String,
        /// Target network
        network_id: NetworkId,
        /// Registered address
        contract_address: String,
    },
    /// An account gained a role.
    #[serde(rename_all = "camelCase")]
    RoleGranted {
        /// Granted role
        role: Role,
        /// Account receiving the role
        account: String,
        /// Account that performed the grant
        sender: String,
    },
    /// An account lost a role.
    #[serde(rename_all = "camelCase")]
    RoleRevoked {
        /// Revoked role
        role: Role,
        /// Account losing the role
        account: String,
        /// Account that performed the revocation
        sender: String,
    },
}

impl From<RegistryEvent> for EventDto {
    fn from(event: RegistryEvent) -> Self {
        match event {
            RegistryEvent::ContractRegistered {
                registrar,
                resource_hash,
                network_id,
                contract_address,
            } => EventDto::ContractRegistered {
                registrar: to_checksum_address(&registrar),
                resource_hash: resource_hash.to_hex_string(),
                network_id,
                contract_address: to_checksum_address(&contract_address),
            },
            RegistryEvent::RoleGranted { role, account, sender } => EventDto::RoleGranted {
                role,
                account: to_checksum_address(&account),
                sender: to_checksum_address(&sender),
            },
            RegistryEvent::RoleRevoked { role, account, sender } => EventDto::RoleRevoked {
                role,
                account: to_checksum_address(&account),
                sender: to_checksum_address(&sender),
            },
        }
    }
}

/// An event with its log position.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedEventDto {
    /// Zero-based position in the event log
    pub sequence: u64,
    /// The event itself
    #[serde(flatten)]
    pub event: EventDto,
}

impl From<LoggedEvent> for LoggedEventDto {
    fn from(logged: LoggedEvent) -> Self {
        Self {
            sequence: logged.sequence,
            event: logged.event.into(),
        }
    }
}

/// A page of the event log.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    /// Events in log order
    pub events: Vec<LoggedEventDto>,
    /// Sequence number to request next
    pub next: u64,
}

/// Registry statistics.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStatsResponse {
    /// Distinct resources
    pub resource_count: u64,
    /// Total (resource, network) entries
    pub entry_count: u64,
    /// Successful register calls
    pub registration_count: u64,
    /// Register calls that replaced an address
    pub overwrite_count: u64,
    /// Events in the log
    pub event_count: u64,
}

impl From<RegistryStats> for RegistryStatsResponse {
    fn from(stats: RegistryStats) -> Self {
        Self {
            resource_count: stats.resource_count,
            entry_count: stats.entry_count,
            registration_count: stats.registration_count,
            overwrite_count: stats.overwrite_count,
            event_count: stats.event_count,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Registered resources
    pub resource_count: u64,
    /// Whether writes are persisted to a file
    pub persistent: bool,
}
