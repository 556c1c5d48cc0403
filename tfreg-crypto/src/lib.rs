//! # TF Registry Cryptography
//!
//! Hashing primitives the registry is built on.
//!
//! This crate provides:
//!
//! - **Hash**: Keccak256 and the URI → [`ResourceHash`] digest
//! - **Checksum**: EIP-55 mixed-case address formatting and verification
//!
//! Both are byte-compatible with Solidity/ethers, so a hash computed here
//! equals `keccak256(bytes(uri))` on-chain and `ethers.utils.keccak256(
//! ethers.utils.toUtf8Bytes(uri))` in deployment scripts.
//!
//! ## Example
//!
//! ```rust
//! use tfreg_crypto::resource_hash;
//!
//! let hash = resource_hash("contract://factory/frank");
//! assert_eq!(
//!     hash.to_hex_string(),
//!     "0x5ba4c015666448ad07dde7c5d3047e267f17fa6d62c5deeb125b228c9594855a"
//! );
//! ```
//!
//! [`ResourceHash`]: tfreg_core::ResourceHash

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod checksum;
pub mod hash;

// Re-export main functions at crate root
pub use checksum::{parse_checksummed, to_checksum_address};
pub use hash::{keccak256, resource_hash, role_id};
