//! In-memory contract registry.
//!
//! The authoritative state machine. Every mutation takes the single write
//! lock, checks authorization, applies its changes and appends its event
//! before releasing it, so mutations are atomic and totally ordered and
//! readers always observe the state as of the last applied write.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use tfreg_core::constants::{DEFAULT_EVENT_CHANNEL_CAPACITY, MAX_EVENT_PAGE_SIZE};
use tfreg_core::error::{Result, RegistryError};
use tfreg_core::traits::{ContractRegistry, RoleManager};
use tfreg_core::types::{
    Address, Entry, LoggedEvent, NetworkId, RegistryEvent, RegistryStats, ResourceHash, Role,
};
use tfreg_crypto::resource_hash;

use crate::access::AccessControl;

/// Network → address for one resource, in first-registration order.
///
/// A single ordered map serves both point lookups and ordered listing, so
/// there is no second structure to keep consistent.
type NetworkMap = IndexMap<NetworkId, Address>;

#[derive(Debug)]
struct RegistryState {
    access: AccessControl,
    resources: HashMap<ResourceHash, NetworkMap>,
    events: Vec<RegistryEvent>,
    registration_count: u64,
    overwrite_count: u64,
}

impl RegistryState {
    /// Appends to the log and publishes to live subscribers.
    fn emit(&mut self, tx: &broadcast::Sender<LoggedEvent>, event: RegistryEvent) -> u64 {
        let sequence = self.events.len() as u64;
        self.events.push(event.clone());
        // Having no subscribers is fine
        let _ = tx.send(LoggedEvent { sequence, event });
        sequence
    }

    fn lookup(&self, hash: &ResourceHash, network_id: NetworkId) -> Address {
        self.resources
            .get(hash)
            .and_then(|networks| networks.get(&network_id))
            .copied()
            .unwrap_or_else(Address::zero)
    }

    fn entries(&self, hash: &ResourceHash) -> Vec<Entry> {
        self.resources
            .get(hash)
            .map(|networks| {
                networks
                    .iter()
                    .map(|(&network_id, &address)| Entry::new(network_id, address))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// All entries of one resource, as persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// keccak256 of the resource URI
    pub resource_hash: ResourceHash,
    /// Entries in first-registration order
    pub entries: Vec<Entry>,
}

/// Complete registry state, used for persistence and state comparisons.
///
/// Resources are sorted by hash so equal states produce equal snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    /// Holders of the admin role
    pub admins: Vec<Address>,
    /// Holders of the registrar role
    pub registrars: Vec<Address>,
    /// Registered resources
    pub resources: Vec<ResourceRecord>,
    /// Full event log
    pub events: Vec<RegistryEvent>,
    /// Successful register calls
    pub registration_count: u64,
    /// Register calls that replaced an address
    pub overwrite_count: u64,
}

/// In-memory contract registry.
///
/// # Indexing
///
/// Entries are indexed by resource hash, then by network id within an
/// insertion-ordered map. Re-registering an existing (hash, network) pair
/// replaces the address in place and keeps its position.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently; writes are
/// serialized behind one lock.
#[derive(Debug)]
pub struct MemoryRegistry {
    state: RwLock<RegistryState>,
    events_tx: broadcast::Sender<LoggedEvent>,
}

impl MemoryRegistry {
    /// Creates an empty registry with `deployer` holding admin and registrar.
    pub fn new(deployer: Address) -> Self {
        Self::with_event_capacity(deployer, DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    /// Creates a registry whose live event feed buffers `capacity` events.
    pub fn with_event_capacity(deployer: Address, capacity: usize) -> Self {
        let (events_tx, _) = broadcast::channel(capacity.max(1));
        let mut state = RegistryState {
            access: AccessControl::new(deployer),
            resources: HashMap::new(),
            events: Vec::new(),
            registration_count: 0,
            overwrite_count: 0,
        };

        for role in Role::ALL {
            state.emit(
                &events_tx,
                RegistryEvent::RoleGranted {
                    role,
                    account: deployer,
                    sender: deployer,
                },
            );
        }

        info!(%deployer, "Created registry");

        Self {
            state: RwLock::new(state),
            events_tx,
        }
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// Fails if the snapshot lists a resource or a network of a resource
    /// more than once.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        let mut resources = HashMap::with_capacity(snapshot.resources.len());

        for record in snapshot.resources {
            let mut networks = NetworkMap::with_capacity(record.entries.len());
            for entry in record.entries {
                if networks
                    .insert(entry.network_id, entry.contract_address)
                    .is_some()
                {
                    return Err(RegistryError::StorageError(format!(
                        "network {} listed twice for resource {}",
                        entry.network_id, record.resource_hash
                    )));
                }
            }
            if resources.insert(record.resource_hash, networks).is_some() {
                return Err(RegistryError::StorageError(format!(
                    "resource {} listed twice",
                    record.resource_hash
                )));
            }
        }

        let (events_tx, _) = broadcast::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);
        let state = RegistryState {
            access: AccessControl::from_members(snapshot.admins, snapshot.registrars),
            resources,
            events: snapshot.events,
            registration_count: snapshot.registration_count,
            overwrite_count: snapshot.overwrite_count,
        };

        debug!(
            resources = state.resources.len(),
            events = state.events.len(),
            "Restored registry from snapshot"
        );

        Ok(Self {
            state: RwLock::new(state),
            events_tx,
        })
    }

    /// Exports the full state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();

        let mut resources: Vec<ResourceRecord> = state
            .resources
            .keys()
            .map(|hash| ResourceRecord {
                resource_hash: *hash,
                entries: state.entries(hash),
            })
            .collect();
        resources.sort_by(|a, b| a.resource_hash.cmp(&b.resource_hash));

        RegistrySnapshot {
            admins: state.access.members(Role::Admin),
            registrars: state.access.members(Role::Registrar),
            resources,
            events: state.events.clone(),
            registration_count: state.registration_count,
            overwrite_count: state.overwrite_count,
        }
    }

    /// Subscribes to events emitted after this call.
    ///
    /// Slow receivers observe `RecvError::Lagged` and can catch up from the
    /// event log.
    pub fn subscribe(&self) -> broadcast::Receiver<LoggedEvent> {
        self.events_tx.subscribe()
    }

    /// Returns the number of (resource, network) entries.
    pub fn len(&self) -> usize {
        self.state.read().resources.values().map(|n| n.len()).sum()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().resources.is_empty()
    }

    /// Returns the number of events in the log.
    pub fn event_count(&self) -> u64 {
        self.state.read().events.len() as u64
    }
}

#[async_trait]
impl RoleManager for MemoryRegistry {
    #[instrument(skip(self), fields(caller = %caller, account = %account))]
    async fn grant_role(&self, caller: Address, role: Role, account: Address) -> Result<()> {
        let mut state = self.state.write();

        let granted = state.access.grant(&caller, role, account).map_err(|err| {
            warn!(%role, "Rejected role grant");
            err
        })?;

        if granted {
            let sequence = state.emit(
                &self.events_tx,
                RegistryEvent::RoleGranted {
                    role,
                    account,
                    sender: caller,
                },
            );
            info!(%role, sequence, "Role granted");
        } else {
            debug!(%role, "Role already held");
        }

        Ok(())
    }

    #[instrument(skip(self), fields(caller = %caller, account = %account))]
    async fn revoke_role(&self, caller: Address, role: Role, account: Address) -> Result<()> {
        let mut state = self.state.write();

        let revoked = state.access.revoke(&caller, role, &account).map_err(|err| {
            warn!(%role, "Rejected role revocation");
            err
        })?;

        if revoked {
            let sequence = state.emit(
                &self.events_tx,
                RegistryEvent::RoleRevoked {
                    role,
                    account,
                    sender: caller,
                },
            );
            info!(%role, sequence, "Role revoked");
        }

        Ok(())
    }

    #[instrument(skip(self), fields(caller = %caller, account = %account))]
    async fn renounce_role(&self, caller: Address, role: Role, account: Address) -> Result<()> {
        let mut state = self.state.write();

        if state.access.renounce(&caller, role, &account)? {
            let sequence = state.emit(
                &self.events_tx,
                RegistryEvent::RoleRevoked {
                    role,
                    account,
                    sender: caller,
                },
            );
            info!(%role, sequence, "Role renounced");
        }

        Ok(())
    }

    async fn has_role(&self, role: Role, account: Address) -> bool {
        self.state.read().access.has_role(role, &account)
    }

    async fn role_members(&self, role: Role) -> Vec<Address> {
        self.state.read().access.members(role)
    }
}

#[async_trait]
impl ContractRegistry for MemoryRegistry {
    /// Registers or overwrites an entry.
    ///
    /// The authorization check and the mutation happen under the same write
    /// lock, so a rejected call leaves no trace.
    #[instrument(skip(self), fields(caller = %caller, contract = %contract_address))]
    async fn register_contract(
        &self,
        caller: Address,
        uri: &str,
        network_id: NetworkId,
        contract_address: Address,
    ) -> Result<()> {
        let hash = resource_hash(uri);
        let mut state = self.state.write();

        if let Err(err) = state.access.check_registrar(&caller) {
            warn!("Rejected registration from account without registrar role");
            return Err(err);
        }

        let previous = state
            .resources
            .entry(hash)
            .or_default()
            .insert(network_id, contract_address);

        state.registration_count += 1;
        if previous.is_some() {
            state.overwrite_count += 1;
        }

        let sequence = state.emit(
            &self.events_tx,
            RegistryEvent::ContractRegistered {
                registrar: caller,
                resource_hash: hash,
                network_id,
                contract_address,
            },
        );

        debug!(
            resource_hash = %hash,
            overwrite = previous.is_some(),
            sequence,
            "Registered contract"
        );

        Ok(())
    }

    async fn get_contract(&self, uri: &str, network_id: NetworkId) -> Address {
        let hash = resource_hash(uri);
        self.state.read().lookup(&hash, network_id)
    }

    async fn get_contract_by_hash(&self, hash: ResourceHash, network_id: NetworkId) -> Address {
        self.state.read().lookup(&hash, network_id)
    }

    async fn get_contracts(&self, uri: &str) -> Vec<Entry> {
        let hash = resource_hash(uri);
        self.state.read().entries(&hash)
    }

    async fn get_contracts_by_hash(&self, hash: ResourceHash) -> Vec<Entry> {
        self.state.read().entries(&hash)
    }

    async fn events(&self, from: u64, limit: usize) -> Vec<LoggedEvent> {
        let state = self.state.read();
        let skip = usize::try_from(from).unwrap_or(usize::MAX);

        state
            .events
            .iter()
            .enumerate()
            .skip(skip)
            .take(limit.min(MAX_EVENT_PAGE_SIZE))
            .map(|(sequence, event)| LoggedEvent {
                sequence: sequence as u64,
                event: event.clone(),
            })
            .collect()
    }

    async fn stats(&self) -> RegistryStats {
        let state = self.state.read();
        RegistryStats {
            resource_count: state.resources.len() as u64,
            entry_count: state.resources.values().map(|n| n.len() as u64).sum(),
            registration_count: state.registration_count,
            overwrite_count: state.overwrite_count,
            event_count: state.events.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNELIESE_URI: &str = "contract://factory/anneliese";
    const FRANK_URI: &str = "contract://factory/frank";

    fn account(n: u8) -> Address {
        Address::from_array([n; 20])
    }

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn anneliese_addr() -> Address {
        addr("0x36fFe38DEfDcfd48a4016cFE79F3AFcDAfFe123D")
    }

    fn frank_addr() -> Address {
        addr("0xbd3afb0bb76683ecb4225f9dbc91f998713c3b01")
    }

    fn deployer() -> Address {
        account(0xD0)
    }

    #[tokio::test]
    async fn test_factory_scenario() {
        let registry = MemoryRegistry::new(deployer());

        registry
            .register_contract(deployer(), ANNELIESE_URI, 43114, anneliese_addr())
            .await
            .unwrap();
        registry
            .register_contract(deployer(), FRANK_URI, 137, frank_addr())
            .await
            .unwrap();
        registry
            .register_contract(deployer(), FRANK_URI, 43114, anneliese_addr())
            .await
            .unwrap();

        assert_eq!(registry.get_contract(ANNELIESE_URI, 43114).await, anneliese_addr());
        assert_eq!(registry.get_contract(FRANK_URI, 137).await, frank_addr());
        assert_eq!(
            registry
                .get_contract_by_hash(resource_hash(FRANK_URI), 43114)
                .await,
            anneliese_addr()
        );

        assert_eq!(
            registry.get_contracts(ANNELIESE_URI).await,
            vec![Entry::new(43114, anneliese_addr())]
        );
        assert_eq!(
            registry
                .get_contracts_by_hash(resource_hash(ANNELIESE_URI))
                .await,
            vec![Entry::new(43114, anneliese_addr())]
        );
        assert_eq!(
            registry.get_contracts(FRANK_URI).await,
            vec![
                Entry::new(137, frank_addr()),
                Entry::new(43114, anneliese_addr()),
            ]
        );
    }

    #[tokio::test]
    async fn test_registration_emits_event() {
        let registry = MemoryRegistry::new(deployer());
        let mut rx = registry.subscribe();

        registry
            .register_contract(deployer(), ANNELIESE_URI, 43114, anneliese_addr())
            .await
            .unwrap();

        let logged = rx.recv().await.unwrap();
        assert_eq!(
            logged.event,
            RegistryEvent::ContractRegistered {
                registrar: deployer(),
                resource_hash: resource_hash(ANNELIESE_URI),
                network_id: 43114,
                contract_address: anneliese_addr(),
            }
        );
        // Two bootstrap grants precede it
        assert_eq!(logged.sequence, 2);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_single_entry_and_position() {
        let registry = MemoryRegistry::new(deployer());

        registry
            .register_contract(deployer(), FRANK_URI, 1, account(1))
            .await
            .unwrap();
        registry
            .register_contract(deployer(), FRANK_URI, 2, account(2))
            .await
            .unwrap();
        let before = registry.get_contracts(FRANK_URI).await.len();

        registry
            .register_contract(deployer(), FRANK_URI, 1, account(9))
            .await
            .unwrap();

        let entries = registry.get_contracts(FRANK_URI).await;
        assert_eq!(entries.len(), before);
        assert_eq!(
            entries,
            vec![Entry::new(1, account(9)), Entry::new(2, account(2))]
        );
        assert_eq!(registry.get_contract(FRANK_URI, 1).await, account(9));

        let stats = registry.stats().await;
        assert_eq!(stats.registration_count, 3);
        assert_eq!(stats.overwrite_count, 1);
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.resource_count, 1);
    }

    #[tokio::test]
    async fn test_overwrite_emits_same_event_shape() {
        let registry = MemoryRegistry::new(deployer());

        registry
            .register_contract(deployer(), FRANK_URI, 1, account(1))
            .await
            .unwrap();
        registry
            .register_contract(deployer(), FRANK_URI, 1, account(2))
            .await
            .unwrap();

        let events = registry.events(2, 10).await;
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| e.event.name() == "ContractRegistered"));
    }

    #[tokio::test]
    async fn test_missing_entries_return_sentinels() {
        let registry = MemoryRegistry::new(deployer());

        assert!(registry.get_contract("nothing", 1).await.is_zero());
        assert!(registry
            .get_contract_by_hash(ResourceHash::from_array([7; 32]), 1)
            .await
            .is_zero());
        assert!(registry.get_contracts("nothing").await.is_empty());

        registry
            .register_contract(deployer(), FRANK_URI, 137, frank_addr())
            .await
            .unwrap();
        // Known resource, unknown network
        assert!(registry.get_contract(FRANK_URI, 1).await.is_zero());
    }

    #[tokio::test]
    async fn test_zero_address_is_accepted() {
        let registry = MemoryRegistry::new(deployer());

        registry
            .register_contract(deployer(), FRANK_URI, 5, Address::zero())
            .await
            .unwrap();

        assert_eq!(
            registry.get_contracts(FRANK_URI).await,
            vec![Entry::new(5, Address::zero())]
        );
    }

    #[tokio::test]
    async fn test_unauthorized_registration_leaves_state_unchanged() {
        let registry = MemoryRegistry::new(deployer());
        registry
            .register_contract(deployer(), FRANK_URI, 137, frank_addr())
            .await
            .unwrap();
        let before = registry.snapshot();

        let axel = account(0xA1);
        let err = registry
            .register_contract(axel, "key_1", 1, anneliese_addr())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::NotRegistrar(a) if a == axel));
        assert!(err
            .to_string()
            .contains("has no registrar role and no admin role"));
        assert_eq!(registry.snapshot(), before);
    }

    #[tokio::test]
    async fn test_role_bootstrap() {
        let registry = MemoryRegistry::new(deployer());

        assert!(registry.has_role(Role::Registrar, deployer()).await);
        assert!(registry.has_role(Role::Admin, deployer()).await);
        for other in [account(0xA1), account(0xB1), account(0xC1)] {
            assert!(!registry.has_role(Role::Registrar, other).await);
        }

        let events = registry.events(0, 10).await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event.name() == "RoleGranted"));
    }

    #[tokio::test]
    async fn test_granted_registrar_can_register() {
        let registry = MemoryRegistry::new(deployer());
        let axel = account(0xA1);
        let uri = "contracts://factory/anneliese";

        registry
            .grant_role(deployer(), Role::Registrar, axel)
            .await
            .unwrap();

        let mut rx = registry.subscribe();
        registry
            .register_contract(axel, uri, 5, anneliese_addr())
            .await
            .unwrap();

        let logged = rx.recv().await.unwrap();
        assert!(matches!(
            logged.event,
            RegistryEvent::ContractRegistered { registrar, network_id: 5, .. } if registrar == axel
        ));
        assert_eq!(registry.get_contract(uri, 5).await, anneliese_addr());
    }

    #[tokio::test]
    async fn test_revoked_registrar_is_rejected() {
        let registry = MemoryRegistry::new(deployer());
        let axel = account(0xA1);

        registry
            .grant_role(deployer(), Role::Registrar, axel)
            .await
            .unwrap();
        registry
            .revoke_role(deployer(), Role::Registrar, axel)
            .await
            .unwrap();

        assert!(registry
            .register_contract(axel, FRANK_URI, 1, frank_addr())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_role_events_only_on_change() {
        let registry = MemoryRegistry::new(deployer());
        let axel = account(0xA1);

        registry.grant_role(deployer(), Role::Registrar, axel).await.unwrap();
        registry.grant_role(deployer(), Role::Registrar, axel).await.unwrap();
        registry.revoke_role(deployer(), Role::Registrar, axel).await.unwrap();
        registry.revoke_role(deployer(), Role::Registrar, axel).await.unwrap();

        let names: Vec<_> = registry
            .events(2, 10)
            .await
            .into_iter()
            .map(|e| e.event.name())
            .collect();
        assert_eq!(names, vec!["RoleGranted", "RoleRevoked"]);
    }

    #[tokio::test]
    async fn test_unauthorized_grant_leaves_state_unchanged() {
        let registry = MemoryRegistry::new(deployer());
        let before = registry.snapshot();

        let err = registry
            .grant_role(account(0xA1), Role::Registrar, account(0xA1))
            .await
            .unwrap_err();

        assert!(err.is_access_error());
        assert_eq!(registry.snapshot(), before);
    }

    #[tokio::test]
    async fn test_renounce_role() {
        let registry = MemoryRegistry::new(deployer());

        let err = registry
            .renounce_role(account(0xA1), Role::Admin, deployer())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::BadConfirmation { .. }));

        registry
            .renounce_role(deployer(), Role::Registrar, deployer())
            .await
            .unwrap();
        assert!(!registry.has_role(Role::Registrar, deployer()).await);
        assert_eq!(registry.role_members(Role::Admin).await, vec![deployer()]);
        assert_eq!(registry.get_role_admin(Role::Registrar), Role::Admin);
    }

    #[tokio::test]
    async fn test_event_paging() {
        let registry = MemoryRegistry::new(deployer());
        for n in 0..5u64 {
            registry
                .register_contract(deployer(), FRANK_URI, n, account(n as u8))
                .await
                .unwrap();
        }

        assert_eq!(registry.event_count(), 7);
        let page = registry.events(3, 2).await;
        assert_eq!(
            page.iter().map(|e| e.sequence).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert!(registry.events(100, 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_restore() {
        let registry = MemoryRegistry::new(deployer());
        registry
            .register_contract(deployer(), FRANK_URI, 137, frank_addr())
            .await
            .unwrap();
        registry
            .register_contract(deployer(), FRANK_URI, 43114, anneliese_addr())
            .await
            .unwrap();
        registry
            .grant_role(deployer(), Role::Registrar, account(0xA1))
            .await
            .unwrap();

        let snapshot = registry.snapshot();
        let restored = MemoryRegistry::from_snapshot(snapshot.clone()).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(
            restored.get_contracts(FRANK_URI).await,
            registry.get_contracts(FRANK_URI).await
        );
        assert!(restored.has_role(Role::Registrar, account(0xA1)).await);
    }

    #[tokio::test]
    async fn test_restore_rejects_duplicate_network() {
        let mut snapshot = MemoryRegistry::new(deployer()).snapshot();
        snapshot.resources.push(ResourceRecord {
            resource_hash: resource_hash(FRANK_URI),
            entries: vec![Entry::new(1, account(1)), Entry::new(1, account(2))],
        });

        let err = MemoryRegistry::from_snapshot(snapshot).unwrap_err();
        assert!(err.is_storage_error());
    }

    #[tokio::test]
    async fn test_concurrent_registrations() {
        use std::sync::Arc;
        use tokio::task::JoinSet;

        let registry = Arc::new(MemoryRegistry::new(deployer()));
        let mut tasks = JoinSet::new();

        // 100 concurrent writers on 10 networks of one resource
        for i in 0..100u8 {
            let reg = registry.clone();
            tasks.spawn(async move {
                reg.register_contract(deployer(), FRANK_URI, u64::from(i % 10), account(i))
                    .await
                    .unwrap()
            });
        }

        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        let entries = registry.get_contracts(FRANK_URI).await;
        assert_eq!(entries.len(), 10);

        // Whatever the interleaving, each network holds the last applied write
        let events = registry.events(2, 200).await;
        for entry in entries {
            let last = events
                .iter()
                .rev()
                .find_map(|e| match e.event {
                    RegistryEvent::ContractRegistered {
                        network_id,
                        contract_address,
                        ..
                    } if network_id == entry.network_id => Some(contract_address),
                    _ => None,
                })
                .unwrap();
            assert_eq!(entry.contract_address, last);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_uri_and_hash_lookups_agree(
                writes in proptest::collection::vec(("[a-c]{1,3}", 0u64..4, any::<[u8; 20]>()), 0..40),
                probe_uri in "[a-c]{1,3}",
                probe_net in 0u64..4,
            ) {
                let registry = MemoryRegistry::new(deployer());
                tokio_test::block_on(async {
                    for (uri, net, bytes) in &writes {
                        registry
                            .register_contract(deployer(), uri, *net, Address::from_array(*bytes))
                            .await
                            .unwrap();
                    }
                });

                let (by_uri, by_hash, list_uri, list_hash) = tokio_test::block_on(async {
                    (
                        registry.get_contract(&probe_uri, probe_net).await,
                        registry.get_contract_by_hash(resource_hash(&probe_uri), probe_net).await,
                        registry.get_contracts(&probe_uri).await,
                        registry.get_contracts_by_hash(resource_hash(&probe_uri)).await,
                    )
                });
                prop_assert_eq!(by_uri, by_hash);
                prop_assert_eq!(list_uri, list_hash);
            }

            #[test]
            fn prop_entries_follow_first_registration_order(
                writes in proptest::collection::vec((0u64..6, any::<[u8; 20]>()), 1..40),
            ) {
                let registry = MemoryRegistry::new(deployer());
                tokio_test::block_on(async {
                    for (net, bytes) in &writes {
                        registry
                            .register_contract(deployer(), FRANK_URI, *net, Address::from_array(*bytes))
                            .await
                            .unwrap();
                    }
                });

                // Expected: networks in first-seen order, each with its last address
                let mut expected: Vec<Entry> = Vec::new();
                for (net, bytes) in &writes {
                    let address = Address::from_array(*bytes);
                    match expected.iter_mut().find(|e| e.network_id == *net) {
                        Some(existing) => existing.contract_address = address,
                        None => expected.push(Entry::new(*net, address)),
                    }
                }

                let entries = tokio_test::block_on(registry.get_contracts(FRANK_URI));
                prop_assert_eq!(&entries, &expected);
                for entry in &entries {
                    let point = tokio_test::block_on(registry.get_contract(FRANK_URI, entry.network_id));
                    prop_assert_eq!(point, entry.contract_address);
                }
            }
        }
    }
}
