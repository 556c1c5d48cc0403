//! Role-based access control.
//!
//! Two fixed holder sets, one per [`Role`]. The deployer is seeded into
//! both at construction. Membership changes report whether anything actually
//! changed so the caller only emits an event for effective grants and
//! revocations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tfreg_core::error::{Result, RegistryError};
use tfreg_core::types::{Address, Role};

/// Holder sets for the admin and registrar roles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    admins: BTreeSet<Address>,
    registrars: BTreeSet<Address>,
}

impl AccessControl {
    /// Creates the trust root: `deployer` holds both roles.
    pub fn new(deployer: Address) -> Self {
        let mut access = Self::default();
        access.admins.insert(deployer);
        access.registrars.insert(deployer);
        access
    }

    fn holders(&self, role: Role) -> &BTreeSet<Address> {
        match role {
            Role::Admin => &self.admins,
            Role::Registrar => &self.registrars,
        }
    }

    fn holders_mut(&mut self, role: Role) -> &mut BTreeSet<Address> {
        match role {
            Role::Admin => &mut self.admins,
            Role::Registrar => &mut self.registrars,
        }
    }

    /// Returns true if `account` holds `role`.
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.holders(role).contains(account)
    }

    /// Role whose holders manage `role`. Admin manages everything.
    pub fn role_admin(&self, _role: Role) -> Role {
        Role::Admin
    }

    /// Fails with `Unauthorized` unless `account` holds `role`.
    pub fn check_role(&self, role: Role, account: &Address) -> Result<()> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                account: *account,
                role,
            })
        }
    }

    /// Fails unless `caller` may write registry entries.
    ///
    /// Admins are treated as a superset of registrars.
    pub fn check_registrar(&self, caller: &Address) -> Result<()> {
        if self.has_role(Role::Registrar, caller) || self.has_role(Role::Admin, caller) {
            Ok(())
        } else {
            Err(RegistryError::NotRegistrar(*caller))
        }
    }

    /// Grants `role` to `account` on behalf of `caller`.
    ///
    /// Returns `Ok(true)` if the account did not hold the role before.
    pub fn grant(&mut self, caller: &Address, role: Role, account: Address) -> Result<bool> {
        self.check_role(self.role_admin(role), caller)?;
        Ok(self.holders_mut(role).insert(account))
    }

    /// Revokes `role` from `account` on behalf of `caller`.
    ///
    /// Returns `Ok(true)` if the account held the role before.
    pub fn revoke(&mut self, caller: &Address, role: Role, account: &Address) -> Result<bool> {
        self.check_role(self.role_admin(role), caller)?;
        Ok(self.holders_mut(role).remove(account))
    }

    /// Drops `role` from `caller`. `account` must equal `caller`.
    pub fn renounce(&mut self, caller: &Address, role: Role, account: &Address) -> Result<bool> {
        if caller != account {
            return Err(RegistryError::BadConfirmation {
                caller: *caller,
                account: *account,
            });
        }
        Ok(self.holders_mut(role).remove(account))
    }

    /// Current holders of `role`, sorted.
    pub fn members(&self, role: Role) -> Vec<Address> {
        self.holders(role).iter().copied().collect()
    }

    /// Rebuilds holder sets from member lists.
    pub fn from_members(admins: Vec<Address>, registrars: Vec<Address>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
            registrars: registrars.into_iter().collect(),
        }
    }
}
