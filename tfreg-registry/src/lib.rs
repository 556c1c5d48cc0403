//! # TF Contract Registry storage
//!
//! Role-gated storage of contract addresses keyed by resource hash and
//! network id.
//!
//! This crate provides two backends:
//!
//! - **Memory**: in-memory storage with a live event feed
//! - **File**: persistent snapshot-file storage for single-node deployments
//!
//! ## Example
//!
//! ```rust
//! use tfreg_registry::{ContractRegistry, MemoryRegistry, RoleManager};
//! use tfreg_core::types::{Address, Role};
//!
//! # tokio_test::block_on(async {
//! let deployer = Address::from_array([0xD0; 20]);
//! let registry = MemoryRegistry::new(deployer);
//!
//! let factory = Address::from_array([0x11; 20]);
//! registry
//!     .register_contract(deployer, "contract://factory/frank", 137, factory)
//!     .await?;
//!
//! assert_eq!(registry.get_contract("contract://factory/frank", 137).await, factory);
//! assert!(registry.has_role(Role::Registrar, deployer).await);
//! # Ok::<(), tfreg_core::RegistryError>(())
//! # }).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod access;
mod file;
mod memory;

pub use access::AccessControl;
pub use file::FileRegistry;
pub use memory::{MemoryRegistry, RegistrySnapshot, ResourceRecord};

// Re-export the traits from core
pub use tfreg_core::traits::{ContractRegistry, RoleManager};
