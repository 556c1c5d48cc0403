//! Registry constants.
//!
//! Sizes and identifiers are chosen to be byte-compatible with the on-chain
//! `TFContractRegistry` contract so that hashes, role ids and events can be
//! correlated with what deployment tooling and indexers observe on-chain.

// ═══════════════════════════════════════════════════════════════════════════════
// SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of an account / contract address in bytes (20 bytes = 160 bits).
pub const ADDRESS_SIZE: usize = 20;

/// Size of keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;

/// Size of a resource hash (keccak256 of the resource URI).
pub const RESOURCE_HASH_SIZE: usize = KECCAK256_SIZE;

/// Size of a role identifier.
pub const ROLE_ID_SIZE: usize = KECCAK256_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// ROLE IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifier of the administrator role (`DEFAULT_ADMIN_ROLE`, all zeros).
pub const ADMIN_ROLE_ID: [u8; ROLE_ID_SIZE] = [0u8; ROLE_ID_SIZE];

/// Identifier of the registrar role: `keccak256("REGISTRAR_ROLE")`.
pub const REGISTRAR_ROLE_ID: [u8; ROLE_ID_SIZE] = [
    0xed, 0xcc, 0x08, 0x4d, 0x3d, 0xcd, 0x65, 0xa1, 0xf7, 0xf2, 0x3c, 0x65, 0xc4, 0x67, 0x22,
    0xfa, 0xca, 0x69, 0x53, 0xd2, 0x8e, 0x43, 0x15, 0x0a, 0x46, 0x7c, 0xf4, 0x3e, 0x5c, 0x30,
    0x92, 0x38,
];

/// Solidity-side name of the administrator role.
pub const ADMIN_ROLE_NAME: &str = "DEFAULT_ADMIN_ROLE";

/// Solidity-side name of the registrar role.
pub const REGISTRAR_ROLE_NAME: &str = "REGISTRAR_ROLE";

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE
// ═══════════════════════════════════════════════════════════════════════════════

/// Magic bytes at the start of a persisted registry file.
pub const REGISTRY_FILE_MAGIC: &[u8; 4] = b"TFCR";

/// Current registry file format version.
/// Increment when making breaking changes to the snapshot format.
pub const REGISTRY_FILE_VERSION: u8 = 1;

/// Default capacity of the live event feed.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Maximum events returned by a single event-log page.
pub const MAX_EVENT_PAGE_SIZE: usize = 1000;
