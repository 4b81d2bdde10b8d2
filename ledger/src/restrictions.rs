//! # Transfer Restriction Policy
//!
//! Every transfer is submitted to a restriction engine before any balance
//! moves. The engine is a strategy object: the ledger holds it behind a
//! trait reference and the ContractAdmin can swap it at runtime, so
//! restriction policy evolves without touching ledger code.
//!
//! Engines are stateless. They read permission and time-lock state through
//! an injected [`PermissionView`] and classify the proposed transfer as a
//! [`RestrictionCode`]. Callers can simulate the outcome of a transfer
//! ahead of time through the ledger's read-only pass-throughs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::permissions::{PermissionView, FROZEN_FLAG};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from restriction-code handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestrictionError {
    /// The numeric code does not map to a known restriction.
    #[error("invalid restriction code: {0}")]
    InvalidCode(u8),
}

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Classification of a proposed transfer.
///
/// The numeric values are part of the public surface: external callers
/// exchange raw codes with [`message_for_code`] and audit tooling stores
/// them. `Success` is the only code that permits a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RestrictionCode {
    /// The transfer is allowed.
    Success = 0,
    /// The recipient is the null account.
    EmptyRecipient = 1,
    /// The recipient is the token contract itself.
    SelfContractRecipient = 2,
    /// The transfer amount is zero.
    ZeroAmount = 3,
    /// The sender's time lock has not expired.
    SenderTimeLocked = 4,
    /// The sender carries the frozen permission bit.
    SenderFrozen = 5,
    /// The recipient carries the frozen permission bit.
    RecipientFrozen = 6,
}

impl RestrictionCode {
    /// The numeric wire value of this code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parses a numeric code.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::InvalidCode`] for any value outside 0-6.
    pub fn from_code(code: u8) -> Result<Self, RestrictionError> {
        match code {
            0 => Ok(RestrictionCode::Success),
            1 => Ok(RestrictionCode::EmptyRecipient),
            2 => Ok(RestrictionCode::SelfContractRecipient),
            3 => Ok(RestrictionCode::ZeroAmount),
            4 => Ok(RestrictionCode::SenderTimeLocked),
            5 => Ok(RestrictionCode::SenderFrozen),
            6 => Ok(RestrictionCode::RecipientFrozen),
            other => Err(RestrictionError::InvalidCode(other)),
        }
    }

    /// `true` only for [`RestrictionCode::Success`].
    pub fn is_success(self) -> bool {
        self == RestrictionCode::Success
    }

    /// The fixed human-readable message for this code.
    pub fn message(self) -> &'static str {
        match self {
            RestrictionCode::Success => "SUCCESS",
            RestrictionCode::EmptyRecipient => "RECIPIENT ADDRESS EMPTY",
            RestrictionCode::SelfContractRecipient => "RECIPIENT IS TOKEN CONTRACT",
            RestrictionCode::ZeroAmount => "TRANSFER AMOUNT ZERO",
            RestrictionCode::SenderTimeLocked => "SENDER TOKENS TIME LOCKED",
            RestrictionCode::SenderFrozen => "SENDER ADDRESS FROZEN",
            RestrictionCode::RecipientFrozen => "RECIPIENT ADDRESS FROZEN",
        }
    }
}

impl std::fmt::Display for RestrictionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The swappable transfer-restriction policy.
///
/// Implementations must be deterministic given current permission state
/// and wall-clock time: the ledger may evaluate the same transfer twice
/// (simulation, then submission) and callers rely on matching answers.
///
/// `message_for_code` and `is_success` have defaults covering the standard
/// code set; engines that introduce policy-specific codes override them.
pub trait RestrictionEngine {
    /// Classifies a proposed transfer of `value` from `from` to `to` on
    /// the token identified by `token`.
    fn evaluate(
        &self,
        token: &str,
        from: &str,
        to: &str,
        value: u64,
        view: &dyn PermissionView,
    ) -> RestrictionCode;

    /// The human-readable message for a numeric code.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::InvalidCode`] if the engine does not
    /// recognize `code`.
    fn message_for_code(&self, code: u8) -> Result<String, RestrictionError> {
        Ok(RestrictionCode::from_code(code)?.message().to_string())
    }

    /// `true` if `code` permits the transfer.
    fn is_success(&self, code: u8) -> bool {
        code == RestrictionCode::Success.code()
    }

    /// Identity of this engine, recorded in upgrade notifications.
    fn name(&self) -> &str;
}

/// The standard policy: frozen accounts and time-locked senders are
/// blocked, alongside structural checks on the recipient and amount.
///
/// Evaluation is priority-ordered with first match winning, so a transfer
/// that violates several rules always reports the highest-priority one.
#[derive(Debug, Clone, Default)]
pub struct StandardRestrictionEngine;

impl StandardRestrictionEngine {
    /// Creates the standard engine.
    pub fn new() -> Self {
        Self
    }
}

impl RestrictionEngine for StandardRestrictionEngine {
    fn evaluate(
        &self,
        token: &str,
        from: &str,
        to: &str,
        value: u64,
        view: &dyn PermissionView,
    ) -> RestrictionCode {
        if to.is_empty() {
            return RestrictionCode::EmptyRecipient;
        }
        if to == token {
            return RestrictionCode::SelfContractRecipient;
        }
        if value == 0 {
            return RestrictionCode::ZeroAmount;
        }

        let now = Utc::now().timestamp() as u64;
        if now < view.time_lock(from) {
            return RestrictionCode::SenderTimeLocked;
        }
        if view.permission(from) & FROZEN_FLAG == FROZEN_FLAG {
            return RestrictionCode::SenderFrozen;
        }
        if view.permission(to) & FROZEN_FLAG == FROZEN_FLAG {
            return RestrictionCode::RecipientFrozen;
        }

        RestrictionCode::Success
    }

    fn name(&self) -> &str {
        "standard-restriction-engine"
    }
}
