//! Capabilities checked before mutating operations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ADMIN_ROLE_ID, ADMIN_ROLE_NAME, REGISTRAR_ROLE_ID, REGISTRAR_ROLE_NAME, ROLE_ID_SIZE,
};
use crate::error::{Result, RegistryError};

/// A named permission held by zero or more accounts.
///
/// Only two roles exist. [`Role::Admin`] is the admin role of every role,
/// so admins grant and revoke both capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator (`DEFAULT_ADMIN_ROLE`).
    Admin,
    /// May create and update registry entries (`REGISTRAR_ROLE`).
    Registrar,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 2] = [Role::Admin, Role::Registrar];

    /// On-chain role identifier.
    pub fn id(&self) -> [u8; ROLE_ID_SIZE] {
        match self {
            Role::Admin => ADMIN_ROLE_ID,
            Role::Registrar => REGISTRAR_ROLE_ID,
        }
    }

    /// On-chain role identifier as 0x-prefixed hex.
    pub fn id_hex(&self) -> String {
        format!("0x{}", hex::encode(self.id()))
    }

    /// Solidity-side constant name.
    pub fn contract_name(&self) -> &'static str {
        match self {
            Role::Admin => ADMIN_ROLE_NAME,
            Role::Registrar => REGISTRAR_ROLE_NAME,
        }
    }

    /// Looks a role up by its on-chain identifier.
    pub fn from_id(id: &[u8]) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.id().as_slice() == id)
            .ok_or_else(|| RegistryError::InvalidRole(format!("unknown role id 0x{}", hex::encode(id))))
    }
}

impl FromStr for Role {
    type Err = RegistryError;

    /// Accepts `admin`, `registrar`, the Solidity constant names, or a
    /// 32-byte hex role id.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "admin" | "default_admin_role" => return Ok(Role::Admin),
            "registrar" | "registrar_role" => return Ok(Role::Registrar),
            _ => {}
        }

        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        if hex_part.len() == ROLE_ID_SIZE * 2 {
            let bytes = hex::decode(hex_part)?;
            return Role::from_id(&bytes);
        }

        Err(RegistryError::InvalidRole(s.to_string()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Registrar => write!(f, "registrar"),
        }
    }
}
