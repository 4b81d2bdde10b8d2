// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Charter Ledger
//!
//! A compliance-gated value ledger: a token balance store whose transfers
//! are only permitted when a pluggable restriction policy approves them,
//! and whose administrative operations are gated by a role hierarchy.
//! Built for issuers that must enforce regulatory constraints (freezing,
//! time-based lockups, blocked destinations) on every movement of a
//! fungible asset while keeping the restriction logic swappable without
//! disrupting the ledger itself.
//!
//! The crate is split into modules that mirror the actual concerns:
//!
//! - **access_control** — role membership and the admin-of hierarchy that
//!   gates every administrative mutation.
//! - **permissions** — per-account permission bitmasks and time locks,
//!   the state restriction policies evaluate against.
//! - **restrictions** — restriction codes and the swappable policy engine
//!   consulted before every transfer.
//! - **notify** — the audit notification stream emitted alongside every
//!   observable mutation.
//! - **ledger** — the facade that composes the above: balances, supply,
//!   allowances, pause control, and every public operation.
//!
//! ## Design Principles
//!
//! 1. All monetary operations check for overflow — wrapping arithmetic and
//!    money do not mix.
//! 2. Every operation is validate-then-commit: preconditions are checked
//!    and new values staged before the first field assignment, so failures
//!    leave state untouched.
//! 3. Role guards are explicit table lookups over a closed enum, resolved
//!    at call time.
//! 4. Restriction policy is a strategy object behind a trait reference,
//!    replaceable at runtime by the ContractAdmin.
//! 5. Every public state type is serializable (serde) for wire transport
//!    and persistent storage.

pub mod access_control;
pub mod ledger;
pub mod notify;
pub mod permissions;
pub mod restrictions;

pub use access_control::{AccessControlError, AccessControlRegistry, Role};
pub use ledger::{Ledger, LedgerError, DECIMALS};
pub use notify::{Notification, NotificationSink, RecordingSink, TracingSink};
pub use permissions::{PermissionStore, PermissionView, FROZEN_FLAG};
pub use restrictions::{
    RestrictionCode, RestrictionEngine, RestrictionError, StandardRestrictionEngine,
};

/// Opaque account identity. The empty string is the null account.
pub type Address = String;

/// Returns `true` for the null account.
pub fn is_null_address(account: &str) -> bool {
    account.is_empty()
}
