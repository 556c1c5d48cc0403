//! Common traits for the registry.
//!
//! These traits define the interfaces that storage backends satisfy, so the
//! API server and CLI can run against either the in-memory or the
//! file-backed registry.
//!
//! Caller identity is an explicit parameter of every mutating call. The
//! hosting environment (HTTP auth layer, CLI flags, a chain's transaction
//! sender) is responsible for authenticating it.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Address, Entry, LoggedEvent, NetworkId, RegistryStats, ResourceHash, Role};

// ═══════════════════════════════════════════════════════════════════════════════
// ACCESS CONTROL TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Role-based access control over registry writes.
#[async_trait]
pub trait RoleManager: Send + Sync {
    /// Grants `role` to `account`.
    ///
    /// The caller must hold the admin role of `role`. Granting a role that
    /// is already held is a successful no-op.
    async fn grant_role(&self, caller: Address, role: Role, account: Address) -> Result<()>;

    /// Revokes `role` from `account`.
    ///
    /// The caller must hold the admin role of `role`. Revoking a role that
    /// is not held is a successful no-op.
    async fn revoke_role(&self, caller: Address, role: Role, account: Address) -> Result<()>;

    /// Drops `role` from the caller's own account.
    ///
    /// `account` must equal `caller`; it exists as a confirmation against
    /// accidental renouncement.
    async fn renounce_role(&self, caller: Address, role: Role, account: Address) -> Result<()>;

    /// Returns true if `account` holds `role`. Never fails.
    async fn has_role(&self, role: Role, account: Address) -> bool;

    /// Returns the role whose holders may grant and revoke `role`.
    fn get_role_admin(&self, _role: Role) -> Role {
        Role::Admin
    }

    /// Returns the current holders of `role`, sorted.
    async fn role_members(&self, role: Role) -> Vec<Address>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// The contract registry: (resource hash, network) → contract address.
///
/// Absence is never an error: point lookups return the zero address and
/// list lookups return an empty vector.
#[async_trait]
pub trait ContractRegistry: RoleManager {
    /// Registers (or overwrites) the address of `uri` on `network_id`.
    ///
    /// Requires the registrar or admin role. Either fully applies and emits
    /// `ContractRegistered`, or fails without any state change.
    async fn register_contract(
        &self,
        caller: Address,
        uri: &str,
        network_id: NetworkId,
        contract_address: Address,
    ) -> Result<()>;

    /// Looks up the address of `uri` on `network_id`.
    async fn get_contract(&self, uri: &str, network_id: NetworkId) -> Address;

    /// Looks up by a precomputed resource hash.
    async fn get_contract_by_hash(&self, hash: ResourceHash, network_id: NetworkId) -> Address;

    /// Returns every entry of `uri` in first-registration order.
    async fn get_contracts(&self, uri: &str) -> Vec<Entry>;

    /// Returns every entry of a resource hash in first-registration order.
    async fn get_contracts_by_hash(&self, hash: ResourceHash) -> Vec<Entry>;

    /// Returns up to `limit` events starting at sequence `from`.
    async fn events(&self, from: u64, limit: usize) -> Vec<LoggedEvent>;

    /// Returns aggregate counters.
    async fn stats(&self) -> RegistryStats;
}
