//! App state: registry backend and config.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tfreg_core::error::{Result, RegistryError};
use tfreg_core::traits::ContractRegistry;
use tfreg_core::types::Address;
use tfreg_registry::{FileRegistry, MemoryRegistry};
use tracing::info;

const DEFAULT_BIND: &str = "0.0.0.0:3001";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Account seeded with admin and registrar in a fresh registry
    pub deployer: Option<Address>,
    /// Snapshot file; in-memory only when unset
    pub registry_file: Option<PathBuf>,
    /// Listen address
    pub bind: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            deployer: None,
            registry_file: None,
            bind: SocketAddr::from(([0, 0, 0, 0], 3001)),
        }
    }
}

impl ApiConfig {
    /// Reads `TFREG_DEPLOYER`, `TFREG_REGISTRY_FILE` and `TFREG_BIND`,
    /// honouring a `.env` file.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let deployer = match std::env::var("TFREG_DEPLOYER") {
            Ok(value) => Some(value.parse::<Address>().map_err(|e| {
                RegistryError::ConfigError(format!("TFREG_DEPLOYER: {}", e))
            })?),
            Err(_) => None,
        };

        let bind = std::env::var("TFREG_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.into())
            .parse()
            .map_err(|e| RegistryError::ConfigError(format!("TFREG_BIND: {}", e)))?;

        Ok(Self {
            deployer,
            registry_file: std::env::var("TFREG_REGISTRY_FILE").ok().map(PathBuf::from),
            bind,
        })
    }
}

/// Shared handler state.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Registry backend
    pub registry: Arc<dyn ContractRegistry>,
}

impl AppState {
    /// Wraps an existing registry.
    pub fn new(config: ApiConfig, registry: Arc<dyn ContractRegistry>) -> Self {
        Self { config, registry }
    }

    /// Opens the registry described by `config`.
    ///
    /// An existing registry file is loaded as-is; otherwise `deployer` is
    /// required to seed a fresh registry.
    pub async fn open(config: ApiConfig) -> Result<Self> {
        let registry: Arc<dyn ContractRegistry> = match &config.registry_file {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Opening registry file");
                Arc::new(FileRegistry::open(path).await?)
            }
            Some(path) => {
                let deployer = Self::require_deployer(&config)?;
                info!(path = %path.display(), %deployer, "Creating registry file");
                Arc::new(FileRegistry::create(path, deployer).await?)
            }
            None => {
                let deployer = Self::require_deployer(&config)?;
                info!(%deployer, "Starting in-memory registry");
                Arc::new(MemoryRegistry::new(deployer))
            }
        };

        Ok(Self::new(config, registry))
    }

    fn require_deployer(config: &ApiConfig) -> Result<Address> {
        config.deployer.ok_or_else(|| {
            RegistryError::ConfigError("TFREG_DEPLOYER is required for a new registry".into())
        })
    }

    /// Whether writes are persisted.
    pub fn is_persistent(&self) -> bool {
        self.config.registry_file.is_some()
    }
}
