//! # Audit Notifications
//!
//! Every observable mutation of the ledger emits exactly one notification
//! into an injected sink. The sink is decoupled from state mutation so
//! external indexers consume a faithful audit stream and tests assert
//! emitted events independently of storage changes.
//!
//! Two sinks are provided: [`TracingSink`] forwards each notification as a
//! structured `tracing` event (the default for embedding hosts), and
//! [`RecordingSink`] appends to a shared in-memory log for assertions.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access_control::Role;
use crate::Address;

/// An observable ledger event.
///
/// `Transfer` follows the usual ledger convention for supply changes: an
/// empty `from` marks a mint and an empty `to` marks a burn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// `role` was granted to `account` by `actor`.
    RoleGranted {
        role: Role,
        account: Address,
        actor: Address,
    },
    /// `role` was revoked from `account` by `actor`.
    RoleRevoked {
        role: Role,
        account: Address,
        actor: Address,
    },
    /// `account` renounced `role` itself.
    RoleRenounced { role: Role, account: Address },
    /// The permission bitmask of `account` was overwritten with `value`.
    PermissionChanged {
        actor: Address,
        account: Address,
        value: u64,
    },
    /// The time lock of `account` was overwritten with `value`
    /// (Unix seconds, zero meaning unlocked).
    TimeLockChanged {
        actor: Address,
        account: Address,
        value: u64,
    },
    /// The restriction engine was replaced.
    EngineUpgraded {
        actor: Address,
        old: String,
        new: String,
    },
    /// Balance movement, including mints (empty `from`) and burns
    /// (empty `to`).
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
    },
    /// `owner` authorized `spender` to spend up to `amount`.
    Approval {
        owner: Address,
        spender: Address,
        amount: u64,
    },
    /// The ledger was paused by `actor`.
    Paused { actor: Address },
    /// The ledger was unpaused by `actor`.
    Unpaused { actor: Address },
}

/// Append-only consumer of ledger notifications.
pub trait NotificationSink {
    /// Receives one notification. Must not fail; the ledger's state change
    /// has already committed when this is called.
    fn emit(&mut self, notification: Notification);
}

/// Forwards notifications as structured `tracing` events under the
/// `charter_ledger::audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the tracing-backed sink.
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingSink {
    fn emit(&mut self, notification: Notification) {
        const TARGET: &str = "charter_ledger::audit";
        match notification {
            Notification::RoleGranted { role, account, actor } => {
                info!(target: TARGET, %role, %account, %actor, "role granted");
            }
            Notification::RoleRevoked { role, account, actor } => {
                info!(target: TARGET, %role, %account, %actor, "role revoked");
            }
            Notification::RoleRenounced { role, account } => {
                info!(target: TARGET, %role, %account, "role renounced");
            }
            Notification::PermissionChanged { actor, account, value } => {
                info!(target: TARGET, %actor, %account, value, "permission changed");
            }
            Notification::TimeLockChanged { actor, account, value } => {
                info!(target: TARGET, %actor, %account, value, "time lock changed");
            }
            Notification::EngineUpgraded { actor, old, new } => {
                info!(target: TARGET, %actor, %old, %new, "restriction engine upgraded");
            }
            Notification::Transfer { from, to, amount } => {
                info!(target: TARGET, %from, %to, amount, "transfer");
            }
            Notification::Approval { owner, spender, amount } => {
                info!(target: TARGET, %owner, %spender, amount, "approval");
            }
            Notification::Paused { actor } => {
                info!(target: TARGET, %actor, "ledger paused");
            }
            Notification::Unpaused { actor } => {
                info!(target: TARGET, %actor, "ledger unpaused");
            }
        }
    }
}

/// Records notifications into a shared in-memory log.
///
/// Clones share the same log, so a test can hand one clone to the ledger
/// and keep another to inspect what was emitted. Single-threaded by
/// design, matching the ledger's execution model.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything emitted so far, in order.
    pub fn recorded(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }

    /// The most recent notification, if any.
    pub fn last(&self) -> Option<Notification> {
        self.log.borrow().last().cloned()
    }

    /// Number of notifications emitted so far.
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// `true` if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn emit(&mut self, notification: Notification) {
        self.log.borrow_mut().push(notification);
    }
}
