//! Resource hashes.
//!
//! A [`ResourceHash`] is the keccak256 digest of a resource URI and is the
//! primary index of the registry. The digest itself is computed by
//! `tfreg_crypto::resource_hash`; this type only carries and formats it.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::RESOURCE_HASH_SIZE;
use crate::error::{Result, RegistryError};

/// 32-byte digest identifying a resource.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHash {
    bytes: [u8; RESOURCE_HASH_SIZE],
}

impl ResourceHash {
    /// Creates a hash from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RESOURCE_HASH_SIZE {
            return Err(RegistryError::InvalidResourceHash(format!(
                "expected {} bytes, got {}",
                RESOURCE_HASH_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; RESOURCE_HASH_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub const fn from_array(bytes: [u8; RESOURCE_HASH_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the hash as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; RESOURCE_HASH_SIZE] {
        &self.bytes
    }

    /// Returns the lowercase hex string with 0x prefix.
    pub fn to_hex_string(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Parses from hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s)
            .map_err(|e| RegistryError::InvalidResourceHash(format!("{}: {}", s, e)))?;
        Self::from_bytes(&bytes)
    }
}

impl FromStr for ResourceHash {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl std::fmt::Debug for ResourceHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First/last 4 bytes are enough to tell hashes apart in logs
        write!(
            f,
            "ResourceHash({}...{})",
            hex::encode(&self.bytes[..4]),
            hex::encode(&self.bytes[RESOURCE_HASH_SIZE - 4..])
        )
    }
}

impl std::fmt::Display for ResourceHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl Serialize for ResourceHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for ResourceHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
