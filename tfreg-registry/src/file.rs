//! File-based contract registry with persistence.
//!
//! Wraps a [`MemoryRegistry`] and rewrites a snapshot file after successful
//! mutations. Suitable for single-node deployments and for the CLI, where
//! each invocation is a separate process.
//!
//! A handle holds an exclusive lock on `<file>.lock` from open until drop,
//! so at most one handle (in any process) writes a given registry file.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use fs2::FileExt;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, instrument, warn};

use tfreg_core::constants::{REGISTRY_FILE_MAGIC, REGISTRY_FILE_VERSION};
use tfreg_core::error::{Result, RegistryError};
use tfreg_core::traits::{ContractRegistry, RoleManager};
use tfreg_core::types::{
    Address, Entry, LoggedEvent, NetworkId, RegistryStats, ResourceHash, Role,
};

use crate::memory::{MemoryRegistry, RegistrySnapshot};

/// Header length: magic (4) + version (1).
const HEADER_LEN: usize = 5;

/// `path` with `suffix` appended to the full file name.
fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Takes the exclusive lock guarding `path`.
///
/// The lock lives on a sidecar file because saves replace the registry file
/// itself by rename.
fn acquire_lock(path: &Path) -> Result<std::fs::File> {
    let lock_path = sidecar_path(path, ".lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;

    if let Err(err) = file.try_lock_exclusive() {
        return Err(RegistryError::StorageError(format!(
            "registry file {} is locked by another handle ({}); stop the other process or remove {} if it is stale",
            path.display(),
            err,
            lock_path.display()
        )));
    }

    debug!(lock = %lock_path.display(), "Acquired registry lock");
    Ok(file)
}

/// A mutation routed through the file registry.
#[derive(Clone, Copy, Debug)]
enum Mutation<'a> {
    Register {
        caller: Address,
        uri: &'a str,
        network_id: NetworkId,
        contract_address: Address,
    },
    Grant {
        caller: Address,
        role: Role,
        account: Address,
    },
    Revoke {
        caller: Address,
        role: Role,
        account: Address,
    },
    Renounce {
        caller: Address,
        role: Role,
        account: Address,
    },
}

impl Mutation<'_> {
    async fn apply_to(self, registry: &MemoryRegistry) -> Result<()> {
        match self {
            Mutation::Register {
                caller,
                uri,
                network_id,
                contract_address,
            } => {
                registry
                    .register_contract(caller, uri, network_id, contract_address)
                    .await
            }
            Mutation::Grant {
                caller,
                role,
                account,
            } => registry.grant_role(caller, role, account).await,
            Mutation::Revoke {
                caller,
                role,
                account,
            } => registry.revoke_role(caller, role, account).await,
            Mutation::Renounce {
                caller,
                role,
                account,
            } => registry.renounce_role(caller, role, account).await,
        }
    }
}

/// File-based contract registry.
///
/// # File Format
///
/// ```text
/// magic (4 bytes): "TFCR"
/// version (1 byte): 1
/// snapshot (variable): JSON-serialized RegistrySnapshot
/// ```
///
/// # Durability
///
/// A mutation that reaches the auto-save threshold is applied to a staged
/// copy first and only becomes visible (state and event) once that copy is
/// on disk. A failed save therefore leaves the registry exactly as it was.
pub struct FileRegistry {
    /// Path to the storage file
    path: PathBuf,
    /// In-memory storage
    memory: MemoryRegistry,
    /// Whether there are unsaved changes
    dirty: AtomicBool,
    /// Auto-save threshold (save after N successful writes)
    auto_save_threshold: u64,
    /// Writes since last save
    writes_since_save: AtomicU64,
    /// Serializes mutations and saves within this handle
    write_lock: Mutex<()>,
    /// Exclusive lock on the sidecar lock file, released on drop
    _file_lock: std::fs::File,
}

impl FileRegistry {
    fn with_memory(path: PathBuf, memory: MemoryRegistry, file_lock: std::fs::File) -> Self {
        Self {
            path,
            memory,
            dirty: AtomicBool::new(false),
            auto_save_threshold: 1,
            writes_since_save: AtomicU64::new(0),
            write_lock: Mutex::new(()),
            _file_lock: file_lock,
        }
    }

    /// Opens an existing registry file.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_lock = acquire_lock(&path)?;
        let memory = Self::load(&path).await?;
        Ok(Self::with_memory(path, memory, file_lock))
    }

    /// Creates a new registry file seeded with `deployer`.
    ///
    /// Fails if the file already exists.
    pub async fn create(path: impl AsRef<Path>, deployer: Address) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_lock = acquire_lock(&path)?;
        if fs::try_exists(&path).await? {
            return Err(RegistryError::StorageError(format!(
                "registry file {} already exists",
                path.display()
            )));
        }

        let registry = Self::with_memory(path, MemoryRegistry::new(deployer), file_lock);
        registry.save().await?;
        Ok(registry)
    }

    /// Opens the file if it exists, otherwise starts a fresh registry
    /// seeded with `deployer`.
    ///
    /// A fresh registry is not written until the first save.
    pub async fn open_or_create(path: impl AsRef<Path>, deployer: Address) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_lock = acquire_lock(&path)?;
        let memory = if fs::try_exists(&path).await? {
            Self::load(&path).await?
        } else {
            MemoryRegistry::new(deployer)
        };
        Ok(Self::with_memory(path, memory, file_lock))
    }

    /// Sets the number of successful writes between automatic saves.
    ///
    /// A threshold of 0 disables auto-save; call [`save`](Self::save) or
    /// [`flush`](Self::flush) explicitly.
    pub fn with_auto_save(mut self, threshold: u64) -> Self {
        self.auto_save_threshold = threshold;
        self
    }

    /// Loads a snapshot from the file.
    #[instrument]
    async fn load(path: &Path) -> Result<MemoryRegistry> {
        let mut file = fs::File::open(path).await.map_err(|e| {
            RegistryError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to open registry file {}: {}", path.display(), e),
            ))
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await?;

        if contents.len() < HEADER_LEN {
            return Err(RegistryError::StorageError("File too short".into()));
        }

        // Verify magic
        if &contents[0..4] != REGISTRY_FILE_MAGIC {
            return Err(RegistryError::StorageError("Invalid magic bytes".into()));
        }

        // Check version
        let version = contents[4];
        if version != REGISTRY_FILE_VERSION {
            return Err(RegistryError::VersionMismatch {
                expected: REGISTRY_FILE_VERSION,
                actual: version,
            });
        }

        let snapshot: RegistrySnapshot = serde_json::from_slice(&contents[HEADER_LEN..])?;
        info!(
            resources = snapshot.resources.len(),
            events = snapshot.events.len(),
            "Loading registry from file"
        );

        let memory = MemoryRegistry::from_snapshot(snapshot)?;
        debug!("Registry loaded successfully");

        Ok(memory)
    }

    /// Writes `snapshot` to the file atomically (temp file, then rename).
    async fn write_snapshot(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        let serialized = serde_json::to_vec(snapshot)?;

        info!(
            resources = snapshot.resources.len(),
            path = ?self.path,
            "Saving registry to file"
        );

        // Build file contents
        let mut contents = Vec::with_capacity(HEADER_LEN + serialized.len());
        contents.extend_from_slice(REGISTRY_FILE_MAGIC);
        contents.push(REGISTRY_FILE_VERSION);
        contents.extend_from_slice(&serialized);

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&contents).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!("Registry saved successfully");
        Ok(())
    }

    fn mark_clean(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.writes_since_save.store(0, Ordering::SeqCst);
    }

    /// Saves the full state to the file.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_snapshot(&self.memory.snapshot()).await?;
        self.mark_clean();
        Ok(())
    }

    /// Checks if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Forces a save if dirty.
    pub async fn flush(&self) -> Result<()> {
        if self.is_dirty() {
            self.save().await?;
        }
        Ok(())
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the temp file used while saving.
    pub fn temp_path(&self) -> PathBuf {
        sidecar_path(&self.path, ".tmp")
    }

    /// Returns the underlying memory registry for read access.
    ///
    /// Writes made directly on it bypass persistence.
    pub fn memory(&self) -> &MemoryRegistry {
        &self.memory
    }

    /// Subscribes to live events.
    pub fn subscribe(&self) -> broadcast::Receiver<LoggedEvent> {
        self.memory.subscribe()
    }

    /// Applies a mutation, saving first when it reaches the threshold.
    async fn commit(&self, mutation: Mutation<'_>) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let writes = self.writes_since_save.load(Ordering::SeqCst) + 1;
        if self.auto_save_threshold == 0 || writes < self.auto_save_threshold {
            mutation.apply_to(&self.memory).await?;
            self.dirty.store(true, Ordering::SeqCst);
            self.writes_since_save.store(writes, Ordering::SeqCst);
            return Ok(());
        }

        let staged = MemoryRegistry::from_snapshot(self.memory.snapshot())?;
        mutation.apply_to(&staged).await?;
        if let Err(err) = self.write_snapshot(&staged.snapshot()).await {
            warn!(error = %err, "Save failed, mutation discarded");
            return Err(err);
        }

        // Same state and inputs as the staged run, under the same lock
        if let Err(err) = mutation.apply_to(&self.memory).await {
            error!(error = %err, "Saved mutation failed to apply in memory");
            return Err(RegistryError::InternalError(err.to_string()));
        }
        self.mark_clean();
        Ok(())
    }
}

impl std::fmt::Debug for FileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRegistry")
            .field("path", &self.path)
            .field("dirty", &self.is_dirty())
            .field("auto_save_threshold", &self.auto_save_threshold)
            .finish()
    }
}

impl Drop for FileRegistry {
    fn drop(&mut self) {
        // Best-effort: no async I/O in Drop
        if self.is_dirty() {
            warn!(path = ?self.path, "FileRegistry dropped with unsaved changes");
        }
    }
}

#[async_trait]
impl RoleManager for FileRegistry {
    async fn grant_role(&self, caller: Address, role: Role, account: Address) -> Result<()> {
        self.commit(Mutation::Grant {
            caller,
            role,
            account,
        })
        .await
    }

    async fn revoke_role(&self, caller: Address, role: Role, account: Address) -> Result<()> {
        self.commit(Mutation::Revoke {
            caller,
            role,
            account,
        })
        .await
    }

    async fn renounce_role(&self, caller: Address, role: Role, account: Address) -> Result<()> {
        self.commit(Mutation::Renounce {
            caller,
            role,
            account,
        })
        .await
    }

    async fn has_role(&self, role: Role, account: Address) -> bool {
        self.memory.has_role(role, account).await
    }

    async fn role_members(&self, role: Role) -> Vec<Address> {
        self.memory.role_members(role).await
    }
}

#[async_trait]
impl ContractRegistry for FileRegistry {
    async fn register_contract(
        &self,
        caller: Address,
        uri: &str,
        network_id: NetworkId,
        contract_address: Address,
    ) -> Result<()> {
        self.commit(Mutation::Register {
            caller,
            uri,
            network_id,
            contract_address,
        })
        .await
    }

    async fn get_contract(&self, uri: &str, network_id: NetworkId) -> Address {
        self.memory.get_contract(uri, network_id).await
    }

    async fn get_contract_by_hash(&self, hash: ResourceHash, network_id: NetworkId) -> Address {
        self.memory.get_contract_by_hash(hash, network_id).await
    }

    async fn get_contracts(&self, uri: &str) -> Vec<Entry> {
        self.memory.get_contracts(uri).await
    }

    async fn get_contracts_by_hash(&self, hash: ResourceHash) -> Vec<Entry> {
        self.memory.get_contracts_by_hash(hash).await
    }

    async fn events(&self, from: u64, limit: usize) -> Vec<LoggedEvent> {
        self.memory.events(from, limit).await
    }

    async fn stats(&self) -> RegistryStats {
        self.memory.stats().await
    }
}
