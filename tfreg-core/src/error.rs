//! Error types for the contract registry.
//!
//! A single error hierarchy built with `thiserror`. Reads never fail for
//! missing keys: absence is the zero address or an empty list, so there is
//! deliberately no "not found" variant.

use thiserror::Error;

use crate::types::{Address, Role};

/// Result type alias using `RegistryError`.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Main error type for all registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESS CONTROL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Caller lacks the capability required for a mutating call.
    #[error("Unauthorized: account {account} is missing role {role}")]
    Unauthorized { account: Address, role: Role },

    /// Caller lacks both the registrar and the admin role.
    #[error("Unauthorized: caller {0} has no registrar role and no admin role")]
    NotRegistrar(Address),

    /// An account tried to renounce a role on behalf of someone else.
    #[error("Accounts can only renounce roles for themselves (caller {caller}, account {account})")]
    BadConfirmation { caller: Address, account: Address },

    // ═══════════════════════════════════════════════════════════════════════════
    // PARSING / VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Malformed account or contract address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed resource hash.
    #[error("Invalid resource hash: {0}")]
    InvalidResourceHash(String),

    /// Unknown role name or identifier.
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Persisted registry is corrupt or unreadable.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Registry file format version mismatch.
    #[error("Registry file version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION / INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RegistryError {
    /// Returns true if the caller was rejected by the access-control gate.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            RegistryError::Unauthorized { .. }
                | RegistryError::NotRegistrar(_)
                | RegistryError::BadConfirmation { .. }
        )
    }

    /// Returns true if this is an input validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidAddress(_)
                | RegistryError::InvalidResourceHash(_)
                | RegistryError::InvalidRole(_)
                | RegistryError::HexError(_)
                | RegistryError::ValidationError(_)
        )
    }

    /// Returns true if this error came from the persistence layer.
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            RegistryError::IoError(_)
                | RegistryError::JsonError(_)
                | RegistryError::StorageError(_)
                | RegistryError::VersionMismatch { .. }
        )
    }
}
