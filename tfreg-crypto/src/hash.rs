//! Keccak256 hashing.
//!
//! Resource hashes and the registrar role id are plain Keccak256 digests of
//! UTF-8 bytes, with no domain separation, so that they match what the
//! Solidity contract and its deployment tooling compute.

use sha3::{Digest, Keccak256};

use tfreg_core::constants::KECCAK256_SIZE;
use tfreg_core::types::{ResourceHash, Role};

/// Computes Keccak256 hash.
///
/// Note: Keccak256 is NOT SHA3-256. They use different padding.
pub fn keccak256(input: &[u8]) -> [u8; KECCAK256_SIZE] {
    let mut hasher = Keccak256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().into()
}

/// Derives the registry index for a resource URI.
///
/// The URI is hashed verbatim: no trimming, case folding or scheme
/// normalization, so `"Contract://x"` and `"contract://x"` are different
/// resources.
pub fn resource_hash(uri: &str) -> ResourceHash {
    ResourceHash::from_array(keccak256(uri.as_bytes()))
}

/// Computes a role identifier the way the contract declares it:
/// `keccak256(name)` for named roles, all zeros for the default admin role.
pub fn role_id(role: Role) -> [u8; KECCAK256_SIZE] {
    match role {
        Role::Admin => [0u8; KECCAK256_SIZE],
        other => keccak256(other.contract_name().as_bytes()),
    }
}
