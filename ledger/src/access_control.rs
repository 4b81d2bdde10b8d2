//! # Role-Based Access Control
//!
//! Administrative authority over the ledger is expressed as a small, closed
//! set of roles. Each role has exactly one admin role that may grant or
//! revoke it, resolved dynamically through the admin table rather than
//! hardcoded at the call sites, so a role's administration can be rewired
//! (at construction time) without touching the guard logic.
//!
//! [`Role::SuperAdmin`] is the root of trust: it administers every role by
//! default and can never be revoked or renounced, not even by itself. This
//! guarantees the ledger always has at least one account that can recover
//! administrative control.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Address;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during role administration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessControlError {
    /// The caller does not hold the role required for this operation.
    #[error("unauthorized: {account} does not hold the {role} role")]
    Unauthorized {
        /// The role the caller was required to hold.
        role: Role,
        /// The account that attempted the operation.
        account: Address,
    },

    /// The account already holds the role being granted.
    #[error("already granted: {account} already holds the {role} role")]
    AlreadyGranted {
        /// The role that was being granted.
        role: Role,
        /// The account that already holds it.
        account: Address,
    },

    /// The account does not hold the role being revoked or renounced.
    #[error("not held: {account} does not hold the {role} role")]
    NotHeld {
        /// The role that was being removed.
        role: Role,
        /// The account that does not hold it.
        account: Address,
    },

    /// Attempted to revoke or renounce the root role.
    #[error("protected role: {0} can never be revoked or renounced")]
    ProtectedRole(Role),
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The administrative capabilities recognized by the ledger.
///
/// The set is closed: guard checks are table lookups over this enum, never
/// string comparisons, so an unknown role is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The permanent root of trust. Administers every other role by
    /// default and cannot be removed.
    SuperAdmin,
    /// Operational control: pause/unpause and restriction-engine upgrades.
    ContractAdmin,
    /// Compliance control: per-account permission bits and time locks.
    PermissionsAdmin,
    /// Supply control: minting and burning.
    MintAdmin,
}

impl Role {
    /// All roles, in declaration order. Used to build the admin table.
    pub const ALL: [Role; 4] = [
        Role::SuperAdmin,
        Role::ContractAdmin,
        Role::PermissionsAdmin,
        Role::MintAdmin,
    ];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "SuperAdmin"),
            Role::ContractAdmin => write!(f, "ContractAdmin"),
            Role::PermissionsAdmin => write!(f, "PermissionsAdmin"),
            Role::MintAdmin => write!(f, "MintAdmin"),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Role membership and the admin-of relation.
///
/// Internally two maps: `Role -> HashSet<Address>` for membership and
/// `Role -> Role` for administration. Every mutation requires proof of
/// current admin authority; the only unguarded paths are crate-private and
/// used exclusively while the ledger is being constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControlRegistry {
    /// Member sets indexed by role.
    members: HashMap<Role, HashSet<Address>>,
    /// Admin role for each role. Total over [`Role::ALL`].
    admins: HashMap<Role, Role>,
}

impl AccessControlRegistry {
    /// Creates an empty registry with every role administered by
    /// [`Role::SuperAdmin`].
    pub fn new() -> Self {
        let mut admins = HashMap::new();
        for role in Role::ALL {
            admins.insert(role, Role::SuperAdmin);
        }
        Self {
            members: HashMap::new(),
            admins,
        }
    }

    /// Grants `role` to `account`.
    ///
    /// The caller must hold the admin role of `role`, resolved through
    /// [`role_admin`](Self::role_admin) at call time.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::Unauthorized`] if `caller` does not
    /// hold the admin role. Returns [`AccessControlError::AlreadyGranted`]
    /// if `account` already holds `role`.
    pub fn grant_role(
        &mut self,
        caller: &str,
        role: Role,
        account: &str,
    ) -> Result<(), AccessControlError> {
        self.require_role(self.role_admin(role), caller)?;

        if self.has_role(role, account) {
            return Err(AccessControlError::AlreadyGranted {
                role,
                account: account.to_string(),
            });
        }

        self.members
            .entry(role)
            .or_default()
            .insert(account.to_string());
        Ok(())
    }

    /// Revokes `role` from `account`.
    ///
    /// The caller must hold the admin role of `role`. The root role is
    /// exempt: no authority, including SuperAdmin itself, can remove it.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::ProtectedRole`] if `role` is
    /// [`Role::SuperAdmin`]. Returns [`AccessControlError::Unauthorized`]
    /// if `caller` does not hold the admin role. Returns
    /// [`AccessControlError::NotHeld`] if `account` does not hold `role`.
    pub fn revoke_role(
        &mut self,
        caller: &str,
        role: Role,
        account: &str,
    ) -> Result<(), AccessControlError> {
        if role == Role::SuperAdmin {
            return Err(AccessControlError::ProtectedRole(role));
        }

        self.require_role(self.role_admin(role), caller)?;

        if !self.has_role(role, account) {
            return Err(AccessControlError::NotHeld {
                role,
                account: account.to_string(),
            });
        }

        if let Some(set) = self.members.get_mut(&role) {
            set.remove(account);
        }
        Ok(())
    }

    /// Renounces `role` for the caller's own account.
    ///
    /// Self-service removal: no admin authority is required, only current
    /// membership. The root role cannot be renounced.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::ProtectedRole`] if `role` is
    /// [`Role::SuperAdmin`]. Returns [`AccessControlError::NotHeld`] if
    /// the caller does not hold `role`.
    pub fn renounce_role(&mut self, caller: &str, role: Role) -> Result<(), AccessControlError> {
        if role == Role::SuperAdmin {
            return Err(AccessControlError::ProtectedRole(role));
        }

        if !self.has_role(role, caller) {
            return Err(AccessControlError::NotHeld {
                role,
                account: caller.to_string(),
            });
        }

        if let Some(set) = self.members.get_mut(&role) {
            set.remove(caller);
        }
        Ok(())
    }

    /// Returns `true` if `account` currently holds `role`.
    pub fn has_role(&self, role: Role, account: &str) -> bool {
        self.members
            .get(&role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// Returns the role that administers `role`.
    pub fn role_admin(&self, role: Role) -> Role {
        // The table is initialized total over Role::ALL in `new`.
        *self.admins.get(&role).unwrap_or(&Role::SuperAdmin)
    }

    /// Checks that `account` holds `role`, for use as an operation guard.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::Unauthorized`] naming the missing role.
    pub fn require_role(&self, role: Role, account: &str) -> Result<(), AccessControlError> {
        if !self.has_role(role, account) {
            return Err(AccessControlError::Unauthorized {
                role,
                account: account.to_string(),
            });
        }
        Ok(())
    }

    /// All current members of `role`.
    pub fn members(&self, role: Role) -> impl Iterator<Item = &str> {
        self.members
            .get(&role)
            .map(|set| set.iter())
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Number of accounts holding `role`.
    pub fn member_count(&self, role: Role) -> usize {
        self.members.get(&role).map(HashSet::len).unwrap_or(0)
    }

    /// Grants a role without an authority check.
    ///
    /// Construction-time wiring only: the ledger constructor seeds the
    /// initial admin accounts before the registry is observable.
    pub(crate) fn grant_unchecked(&mut self, role: Role, account: &str) {
        self.members
            .entry(role)
            .or_default()
            .insert(account.to_string());
    }

    /// Rewires the admin role of `role`. Construction-time wiring only.
    pub(crate) fn set_role_admin(&mut self, role: Role, admin: Role) {
        self.admins.insert(role, admin);
    }
}

impl Default for AccessControlRegistry {
    fn default() -> Self {
        Self::new()
    }
}
