//! Domain types for the registry.
//!
//! - [`Address`]: 20-byte account / contract identifier
//! - [`ResourceHash`]: keccak256 digest of a resource URI
//! - [`Entry`]: (network, contract address) pair
//! - [`Role`]: capability checked before mutations
//! - [`RegistryEvent`]: audit-trail events

mod address;
mod entry;
mod event;
mod hash;
mod role;

pub use address::*;
pub use entry::*;
pub use event::*;
pub use hash::*;
pub use role::*;
