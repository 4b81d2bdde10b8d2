//! # Per-Account Permission State
//!
//! Compliance state consulted by the restriction engine on every transfer:
//! a permission bitmask and a time lock per account. Entries are created
//! lazily and never deleted; "removing" a lock or a permission means
//! writing the zero value, so unseen and cleared accounts are
//! indistinguishable and both read back as zero.
//!
//! Only the frozen bit ([`FROZEN_FLAG`], value 4) has meaning here. The
//! remaining bits are reserved for restriction policies and are stored and
//! returned verbatim.
//!
//! Role gating for mutations lives at the [`Ledger`](crate::Ledger) facade;
//! the mutators here are crate-private so no ungated path exists outside
//! the crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Address;

/// Permission bit blocking an account from sending or receiving transfers.
pub const FROZEN_FLAG: u64 = 1 << 2;

/// Read access to permission state, injected into restriction engines.
///
/// Engines evaluate against this view rather than owning the state, which
/// keeps them stateless and lets tests substitute fixtures.
pub trait PermissionView {
    /// The permission bitmask for `account`, zero if never set.
    fn permission(&self, account: &str) -> u64;

    /// The time-lock timestamp (Unix seconds) for `account`, zero if
    /// unlocked.
    fn time_lock(&self, account: &str) -> u64;
}

/// Per-account permission bitmasks and time locks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionStore {
    /// Permission bitmask per account.
    permissions: HashMap<Address, u64>,
    /// Time-lock expiry (Unix seconds) per account. Zero means unlocked.
    time_locks: HashMap<Address, u64>,
}

impl PermissionStore {
    /// Creates an empty store. Every account reads as zero until written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the permission bitmask for `account`, zero by default.
    pub fn get_permission(&self, account: &str) -> u64 {
        self.permissions.get(account).copied().unwrap_or(0)
    }

    /// Returns the time-lock timestamp for `account`, zero by default.
    pub fn get_time_lock(&self, account: &str) -> u64 {
        self.time_locks.get(account).copied().unwrap_or(0)
    }

    /// Returns `true` if `account` carries the frozen bit.
    pub fn is_frozen(&self, account: &str) -> bool {
        self.get_permission(account) & FROZEN_FLAG == FROZEN_FLAG
    }

    /// Overwrites the permission bitmask for `account`.
    pub(crate) fn set_permission(&mut self, account: &str, bitmask: u64) {
        self.permissions.insert(account.to_string(), bitmask);
    }

    /// Overwrites the time-lock timestamp for `account`. Writing zero
    /// unlocks the account.
    pub(crate) fn set_time_lock(&mut self, account: &str, timestamp: u64) {
        self.time_locks.insert(account.to_string(), timestamp);
    }
}

impl PermissionView for PermissionStore {
    fn permission(&self, account: &str) -> u64 {
        self.get_permission(account)
    }

    fn time_lock(&self, account: &str) -> u64 {
        self.get_time_lock(account)
    }
}
