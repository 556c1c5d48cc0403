//! # TF Registry Core
//!
//! Core types, errors, and traits for the TF contract registry.
//!
//! The registry maps a resource URI plus a network id to a deployed contract
//! address, with writes gated by role-based access control. This crate holds
//! the pieces shared by every other crate in the workspace:
//!
//! - **Types**: addresses, resource hashes, entries, roles, events
//! - **Errors**: a single `thiserror` hierarchy
//! - **Constants**: sizes, on-chain role identifiers, file format markers
//! - **Traits**: the [`ContractRegistry`] interface implemented by backends
//!
//! ## Example
//!
//! ```rust
//! use tfreg_core::{Address, Entry};
//!
//! let addr: Address = "0x36fFe38DEfDcfd48a4016cFE79F3AFcDAfFe123D".parse().unwrap();
//! let entry = Entry::new(43114, addr);
//! let json = serde_json::to_string(&entry).unwrap();
//! assert!(json.contains("networkId"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{RegistryError, Result};
pub use traits::*;
pub use types::*;
