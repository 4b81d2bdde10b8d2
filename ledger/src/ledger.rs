//! # The Compliance-Gated Ledger
//!
//! The single entry point for every administrative and transfer request.
//! The ledger owns all shared state: balances, allowances, the role
//! registry, the permission store, the active restriction engine, and the
//! notification sink. Operations check their preconditions first and only
//! then mutate, so any failure leaves state untouched.
//!
//! Transfers run the full gauntlet: pause flag, then the restriction
//! engine (which reads permission and time-lock state), then balance and
//! allowance checks, then a single atomic commit of both sides.
//!
//! Callers are authenticated by the host environment; every mutating
//! operation takes the authenticated caller as its first argument and the
//! ledger enforces authorization against the role registry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::access_control::{AccessControlError, AccessControlRegistry, Role};
use crate::notify::{Notification, NotificationSink};
use crate::permissions::PermissionStore;
use crate::restrictions::{RestrictionEngine, RestrictionError};
use crate::{is_null_address, Address};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A construction precondition was violated. No ledger value exists
    /// when this is returned.
    #[error("invalid construction: {0}")]
    InvalidConstruction(String),

    /// A mutating operation was attempted while the ledger is paused.
    #[error("ledger is paused")]
    Paused,

    /// The null account was supplied where a real account is required.
    #[error("zero address: the null account is not allowed here")]
    ZeroAddress,

    /// The restriction engine denied the transfer.
    #[error("transfer restricted (code {code}): {message}")]
    TransferRestricted {
        /// The engine's restriction code.
        code: u8,
        /// The engine's human-readable rendering of the code.
        message: String,
    },

    /// The debited account does not hold enough funds.
    #[error("insufficient balance: {account} holds {available}, requested {requested}")]
    InsufficientBalance {
        /// The account being debited.
        account: Address,
        /// Its current balance.
        available: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// The spender's remaining allowance does not cover the transfer.
    #[error(
        "insufficient allowance: {spender} may spend {available} of {owner}'s funds, \
         requested {requested}"
    )]
    InsufficientAllowance {
        /// The account whose funds are being spent.
        owner: Address,
        /// The authorized spender.
        spender: Address,
        /// The remaining authorization.
        available: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// A mint or credit would overflow the supply or a balance.
    #[error("supply overflow: adding {amount} would exceed u64::MAX")]
    SupplyOverflow {
        /// The amount that was attempted.
        amount: u64,
    },

    /// A role guard rejected the caller.
    #[error(transparent)]
    AccessControl(#[from] AccessControlError),

    /// A restriction code could not be interpreted.
    #[error(transparent)]
    Restriction(#[from] RestrictionError),
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Number of decimal places of the token, fixed per the usual convention
/// for fungible-asset ledgers.
pub const DECIMALS: u8 = 18;

/// The compliance-gated token ledger.
///
/// All state lives in this one owned struct; there are no globals. The
/// host environment serializes operations, so no locking is needed and
/// every method takes `&self` or `&mut self` directly.
pub struct Ledger {
    /// Identity of this ledger, assigned at construction. The restriction
    /// engine receives it as the token identity and the standard policy
    /// rejects transfers addressed to it.
    token_id: String,
    /// Human-readable token name.
    name: String,
    /// Ticker symbol.
    symbol: String,
    /// Sum of all balances, maintained on every mint and burn.
    total_supply: u64,
    /// While true, mint/burn/transfer are suspended. Administrative and
    /// query operations are not.
    paused: bool,
    /// Balances per account, created lazily, never deleted.
    balances: HashMap<Address, u64>,
    /// Remaining spend authorization: owner -> spender -> amount.
    allowances: HashMap<Address, HashMap<Address, u64>>,
    /// Role membership and administration.
    roles: AccessControlRegistry,
    /// Per-account permission bitmasks and time locks.
    permissions: PermissionStore,
    /// The active restriction policy.
    engine: Box<dyn RestrictionEngine>,
    /// Consumer of audit notifications.
    sink: Box<dyn NotificationSink>,
    /// Timestamp of construction.
    created_at: DateTime<Utc>,
}

impl Ledger {
    /// Constructs the ledger and seeds the initial administrative wiring.
    ///
    /// Grants [`Role::SuperAdmin`] to `deployer`, [`Role::MintAdmin`] to
    /// `mint_admin`, and both [`Role::ContractAdmin`] and
    /// [`Role::PermissionsAdmin`] to `contract_admin`; rewires
    /// PermissionsAdmin to be administered by ContractAdmin; mints
    /// `initial_supply` into `reserve`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidConstruction`] if any of the four
    /// accounts is the null account, or if `mint_admin` and
    /// `contract_admin` are the same account. On error no ledger value
    /// exists at all.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        symbol: String,
        initial_supply: u64,
        deployer: &str,
        mint_admin: &str,
        contract_admin: &str,
        reserve: &str,
        engine: Box<dyn RestrictionEngine>,
        sink: Box<dyn NotificationSink>,
    ) -> Result<Self, LedgerError> {
        for (label, account) in [
            ("deployer", deployer),
            ("mint admin", mint_admin),
            ("contract admin", contract_admin),
            ("reserve", reserve),
        ] {
            if is_null_address(account) {
                return Err(LedgerError::InvalidConstruction(format!(
                    "{label} must not be the null account"
                )));
            }
        }
        if mint_admin == contract_admin {
            return Err(LedgerError::InvalidConstruction(
                "mint admin and contract admin must be distinct accounts".to_string(),
            ));
        }

        let mut roles = AccessControlRegistry::new();
        roles.grant_unchecked(Role::SuperAdmin, deployer);
        roles.grant_unchecked(Role::MintAdmin, mint_admin);
        roles.grant_unchecked(Role::ContractAdmin, contract_admin);
        roles.grant_unchecked(Role::PermissionsAdmin, contract_admin);
        roles.set_role_admin(Role::PermissionsAdmin, Role::ContractAdmin);

        let mut ledger = Self {
            token_id: Uuid::new_v4().to_string(),
            name,
            symbol,
            total_supply: 0,
            paused: false,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            roles,
            permissions: PermissionStore::new(),
            engine,
            sink,
            created_at: Utc::now(),
        };

        for (role, account) in [
            (Role::SuperAdmin, deployer),
            (Role::MintAdmin, mint_admin),
            (Role::ContractAdmin, contract_admin),
            (Role::PermissionsAdmin, contract_admin),
        ] {
            ledger.notify(Notification::RoleGranted {
                role,
                account: account.to_string(),
                actor: deployer.to_string(),
            });
        }

        if initial_supply > 0 {
            ledger.total_supply = initial_supply;
            ledger.balances.insert(reserve.to_string(), initial_supply);
            ledger.notify(Notification::Transfer {
                from: String::new(),
                to: reserve.to_string(),
                amount: initial_supply,
            });
        }

        info!(
            token_id = %ledger.token_id,
            name = %ledger.name,
            symbol = %ledger.symbol,
            initial_supply,
            "ledger constructed"
        );
        Ok(ledger)
    }

    // -----------------------------------------------------------------------
    // Pause control
    // -----------------------------------------------------------------------

    /// Suspends mint, burn, and transfers. ContractAdmin only.
    ///
    /// Pausing an already-paused ledger is a no-op and emits nothing.
    pub fn pause(&mut self, caller: &str) -> Result<(), LedgerError> {
        self.roles.require_role(Role::ContractAdmin, caller)?;
        if self.paused {
            return Ok(());
        }
        self.paused = true;
        info!(actor = %caller, "ledger paused");
        self.notify(Notification::Paused {
            actor: caller.to_string(),
        });
        Ok(())
    }

    /// Resumes mint, burn, and transfers. ContractAdmin only.
    ///
    /// Unpausing an unpaused ledger is a no-op and emits nothing.
    pub fn unpause(&mut self, caller: &str) -> Result<(), LedgerError> {
        self.roles.require_role(Role::ContractAdmin, caller)?;
        if !self.paused {
            return Ok(());
        }
        self.paused = false;
        info!(actor = %caller, "ledger unpaused");
        self.notify(Notification::Unpaused {
            actor: caller.to_string(),
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Supply
    // -----------------------------------------------------------------------

    /// Mints `amount` new tokens into `to`. MintAdmin only, unpaused only.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SupplyOverflow`] if the mint would overflow
    /// the total supply or the recipient balance.
    pub fn mint(&mut self, caller: &str, to: &str, amount: u64) -> Result<(), LedgerError> {
        self.roles.require_role(Role::MintAdmin, caller)?;
        self.ensure_unpaused()?;
        if is_null_address(to) {
            return Err(LedgerError::ZeroAddress);
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { amount })?;
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { amount })?;

        self.total_supply = new_supply;
        self.balances.insert(to.to_string(), new_balance);

        info!(actor = %caller, to = %to, amount, total_supply = self.total_supply, "minted");
        self.notify(Notification::Transfer {
            from: String::new(),
            to: to.to_string(),
            amount,
        });
        Ok(())
    }

    /// Burns `amount` tokens from `from`. MintAdmin only, unpaused only.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `from` holds less
    /// than `amount`.
    pub fn burn(&mut self, caller: &str, from: &str, amount: u64) -> Result<(), LedgerError> {
        self.roles.require_role(Role::MintAdmin, caller)?;
        self.ensure_unpaused()?;

        let balance = self.balance_of(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.to_string(),
                available: balance,
                requested: amount,
            });
        }

        self.balances.insert(from.to_string(), balance - amount);
        self.total_supply = self.total_supply.saturating_sub(amount);

        info!(actor = %caller, from = %from, amount, total_supply = self.total_supply, "burned");
        self.notify(Notification::Transfer {
            from: from.to_string(),
            to: String::new(),
            amount,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transfers
    // -----------------------------------------------------------------------

    /// Moves `amount` from `from` to `to`. `from` is the authenticated
    /// caller.
    ///
    /// The transfer must pass the active restriction engine before any
    /// balance is touched; a denial carries the engine's code and message.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Paused`], [`LedgerError::TransferRestricted`],
    /// or [`LedgerError::InsufficientBalance`]; on any error no balance
    /// changes.
    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<(), LedgerError> {
        self.ensure_unpaused()?;
        self.ensure_unrestricted(from, to, amount)?;

        let (new_from, new_to) = self.staged_move(from, to, amount)?;
        self.balances.insert(from.to_string(), new_from);
        self.balances.insert(to.to_string(), new_to);

        debug!(from = %from, to = %to, amount, "transfer applied");
        self.notify(Notification::Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        });
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`,
    /// consuming `spender`'s allowance from `from`.
    ///
    /// # Errors
    ///
    /// As [`transfer`](Self::transfer), plus
    /// [`LedgerError::InsufficientAllowance`] if the remaining
    /// authorization does not cover `amount`.
    pub fn transfer_from(
        &mut self,
        spender: &str,
        from: &str,
        to: &str,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.ensure_unpaused()?;
        self.ensure_unrestricted(from, to, amount)?;

        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from.to_string(),
                spender: spender.to_string(),
                available: allowed,
                requested: amount,
            });
        }

        let (new_from, new_to) = self.staged_move(from, to, amount)?;
        self.balances.insert(from.to_string(), new_from);
        self.balances.insert(to.to_string(), new_to);
        self.allowances
            .entry(from.to_string())
            .or_default()
            .insert(spender.to_string(), allowed - amount);

        debug!(spender = %spender, from = %from, to = %to, amount, "delegated transfer applied");
        self.notify(Notification::Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        });
        Ok(())
    }

    /// Authorizes `spender` to spend up to `amount` of `owner`'s funds.
    ///
    /// Overwrites any previous authorization. Permitted while paused;
    /// pausing suspends balance movement, not bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAddress`] if `spender` is the null
    /// account.
    pub fn approve(&mut self, owner: &str, spender: &str, amount: u64) -> Result<(), LedgerError> {
        if is_null_address(spender) {
            return Err(LedgerError::ZeroAddress);
        }

        self.allowances
            .entry(owner.to_string())
            .or_default()
            .insert(spender.to_string(), amount);

        self.notify(Notification::Approval {
            owner: owner.to_string(),
            spender: spender.to_string(),
            amount,
        });
        Ok(())
    }

    /// Remaining authorization for `spender` over `owner`'s funds.
    pub fn allowance(&self, owner: &str, spender: &str) -> u64 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Restriction policy
    // -----------------------------------------------------------------------

    /// Replaces the active restriction engine. ContractAdmin only.
    ///
    /// Takes effect immediately: subsequent transfers and simulations are
    /// evaluated by the new engine, including transfers the old engine
    /// would have permitted.
    pub fn upgrade_restriction_engine(
        &mut self,
        caller: &str,
        engine: Box<dyn RestrictionEngine>,
    ) -> Result<(), LedgerError> {
        self.roles.require_role(Role::ContractAdmin, caller)?;

        let old = self.engine.name().to_string();
        let new = engine.name().to_string();
        self.engine = engine;

        info!(actor = %caller, old = %old, new = %new, "restriction engine upgraded");
        self.notify(Notification::EngineUpgraded {
            actor: caller.to_string(),
            old,
            new,
        });
        Ok(())
    }

    /// Simulates the restriction outcome of a transfer without executing
    /// it. Returns the engine's numeric code.
    pub fn detect_transfer_restriction(&self, from: &str, to: &str, value: u64) -> u8 {
        self.engine
            .evaluate(&self.token_id, from, to, value, &self.permissions)
            .code()
    }

    /// Renders a restriction code through the active engine.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::InvalidCode`] (wrapped) if the engine
    /// does not recognize `code`.
    pub fn message_for_transfer_restriction(&self, code: u8) -> Result<String, LedgerError> {
        Ok(self.engine.message_for_code(code)?)
    }

    // -----------------------------------------------------------------------
    // Permission surface
    // -----------------------------------------------------------------------

    /// Overwrites the permission bitmask of `account`. PermissionsAdmin
    /// only; `account` must not be the null account.
    pub fn set_permission(
        &mut self,
        caller: &str,
        account: &str,
        bitmask: u64,
    ) -> Result<(), LedgerError> {
        self.roles.require_role(Role::PermissionsAdmin, caller)?;
        if is_null_address(account) {
            return Err(LedgerError::ZeroAddress);
        }

        self.permissions.set_permission(account, bitmask);
        debug!(actor = %caller, account = %account, bitmask, "permission set");
        self.notify(Notification::PermissionChanged {
            actor: caller.to_string(),
            account: account.to_string(),
            value: bitmask,
        });
        Ok(())
    }

    /// The permission bitmask of `account`, zero if never set.
    pub fn get_permission(&self, account: &str) -> u64 {
        self.permissions.get_permission(account)
    }

    /// Overwrites the time lock of `account` (Unix seconds).
    /// PermissionsAdmin only; `account` must not be the null account.
    pub fn set_time_lock(
        &mut self,
        caller: &str,
        account: &str,
        timestamp: u64,
    ) -> Result<(), LedgerError> {
        self.roles.require_role(Role::PermissionsAdmin, caller)?;
        if is_null_address(account) {
            return Err(LedgerError::ZeroAddress);
        }

        self.permissions.set_time_lock(account, timestamp);
        debug!(actor = %caller, account = %account, timestamp, "time lock set");
        self.notify(Notification::TimeLockChanged {
            actor: caller.to_string(),
            account: account.to_string(),
            value: timestamp,
        });
        Ok(())
    }

    /// Clears the time lock of `account`. Equivalent to
    /// `set_time_lock(caller, account, 0)`.
    pub fn remove_time_lock(&mut self, caller: &str, account: &str) -> Result<(), LedgerError> {
        self.set_time_lock(caller, account, 0)
    }

    /// The time-lock timestamp of `account`, zero if unlocked.
    pub fn get_time_lock(&self, account: &str) -> u64 {
        self.permissions.get_time_lock(account)
    }

    // -----------------------------------------------------------------------
    // Role surface
    // -----------------------------------------------------------------------

    /// Grants `role` to `account`. The caller must hold the role's admin
    /// role.
    pub fn grant_role(
        &mut self,
        caller: &str,
        role: Role,
        account: &str,
    ) -> Result<(), LedgerError> {
        self.roles.grant_role(caller, role, account)?;
        info!(actor = %caller, %role, account = %account, "role granted");
        self.notify(Notification::RoleGranted {
            role,
            account: account.to_string(),
            actor: caller.to_string(),
        });
        Ok(())
    }

    /// Revokes `role` from `account`. The caller must hold the role's
    /// admin role; the root role is never revocable.
    pub fn revoke_role(
        &mut self,
        caller: &str,
        role: Role,
        account: &str,
    ) -> Result<(), LedgerError> {
        self.roles.revoke_role(caller, role, account)?;
        info!(actor = %caller, %role, account = %account, "role revoked");
        self.notify(Notification::RoleRevoked {
            role,
            account: account.to_string(),
            actor: caller.to_string(),
        });
        Ok(())
    }

    /// Renounces the caller's own `role`. The root role is never
    /// renounceable.
    pub fn renounce_role(&mut self, caller: &str, role: Role) -> Result<(), LedgerError> {
        self.roles.renounce_role(caller, role)?;
        info!(account = %caller, %role, "role renounced");
        self.notify(Notification::RoleRenounced {
            role,
            account: caller.to_string(),
        });
        Ok(())
    }

    /// Returns `true` if `account` currently holds `role`.
    pub fn has_role(&self, role: Role, account: &str) -> bool {
        self.roles.has_role(role, account)
    }

    /// The role that administers `role`.
    pub fn role_admin(&self, role: Role) -> Role {
        self.roles.role_admin(role)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The balance of `account`, zero for unseen accounts.
    pub fn balance_of(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// The current total supply.
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// The token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of decimal places.
    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// The ledger's own identity, as seen by restriction engines.
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    /// Returns `true` while mint/burn/transfer are suspended.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Timestamp of construction.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_unpaused(&self) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    /// Runs the active restriction engine over a proposed transfer.
    fn ensure_unrestricted(&self, from: &str, to: &str, amount: u64) -> Result<(), LedgerError> {
        let code = self
            .engine
            .evaluate(&self.token_id, from, to, amount, &self.permissions);
        if !self.engine.is_success(code.code()) {
            let message = self.engine.message_for_code(code.code())?;
            debug!(from = %from, to = %to, amount, code = code.code(), "transfer restricted");
            return Err(LedgerError::TransferRestricted {
                code: code.code(),
                message,
            });
        }
        Ok(())
    }

    /// Computes both post-transfer balances without mutating anything.
    ///
    /// A self-transfer moves nothing but still runs the full validation
    /// chain, so both staged balances equal the current one.
    fn staged_move(&self, from: &str, to: &str, amount: u64) -> Result<(u64, u64), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.to_string(),
                available: from_balance,
                requested: amount,
            });
        }

        if from == to {
            return Ok((from_balance, from_balance));
        }

        let new_to = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { amount })?;
        Ok((from_balance - amount, new_to))
    }

    fn notify(&mut self, notification: Notification) {
        self.sink.emit(notification);
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("token_id", &self.token_id)
            .field("name", &self.name)
            .field("symbol", &self.symbol)
            .field("total_supply", &self.total_supply)
            .field("paused", &self.paused)
            .field("accounts", &self.balances.len())
            .field("engine", &self.engine.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::TracingSink;
    use crate::restrictions::StandardRestrictionEngine;

    const DEPLOYER: &str = "deployer";
    const MINTER: &str = "minter";
    const OPS: &str = "ops";
    const RESERVE: &str = "reserve";

    /// Helper: a freshly constructed ledger with the standard wiring.
    fn ledger(initial_supply: u64) -> Ledger {
        Ledger::new(
            "Charter Token".to_string(),
            "CHT".to_string(),
            initial_supply,
            DEPLOYER,
            MINTER,
            OPS,
            RESERVE,
            Box::new(StandardRestrictionEngine::new()),
            Box::new(TracingSink::new()),
        )
        .unwrap()
    }

    /// Invariant check: total supply equals the sum of all balances.
    fn assert_supply_conserved(ledger: &Ledger) {
        let sum: u64 = ledger.balances.values().sum();
        assert_eq!(ledger.total_supply(), sum);
    }

    #[test]
    fn construction_seeds_roles_and_reserve() {
        let ledger = ledger(1_000);

        assert!(ledger.has_role(Role::SuperAdmin, DEPLOYER));
        assert!(ledger.has_role(Role::MintAdmin, MINTER));
        assert!(ledger.has_role(Role::ContractAdmin, OPS));
        assert!(ledger.has_role(Role::PermissionsAdmin, OPS));
        assert_eq!(ledger.role_admin(Role::PermissionsAdmin), Role::ContractAdmin);

        assert_eq!(ledger.balance_of(RESERVE), 1_000);
        assert_eq!(ledger.total_supply(), 1_000);
        assert_supply_conserved(&ledger);
    }

    #[test]
    fn construction_rejects_null_accounts() {
        for (deployer, minter, ops, reserve) in [
            ("", MINTER, OPS, RESERVE),
            (DEPLOYER, "", OPS, RESERVE),
            (DEPLOYER, MINTER, "", RESERVE),
            (DEPLOYER, MINTER, OPS, ""),
        ] {
            let result = Ledger::new(
                "T".to_string(),
                "T".to_string(),
                0,
                deployer,
                minter,
                ops,
                reserve,
                Box::new(StandardRestrictionEngine::new()),
                Box::new(TracingSink::new()),
            );
            assert!(matches!(result, Err(LedgerError::InvalidConstruction(_))));
        }
    }

    #[test]
    fn construction_rejects_shared_admin_account() {
        let result = Ledger::new(
            "T".to_string(),
            "T".to_string(),
            0,
            DEPLOYER,
            "same",
            "same",
            RESERVE,
            Box::new(StandardRestrictionEngine::new()),
            Box::new(TracingSink::new()),
        );
        assert!(matches!(result, Err(LedgerError::InvalidConstruction(_))));
    }

    #[test]
    fn mint_requires_mint_admin() {
        let mut ledger = ledger(0);
        let result = ledger.mint(OPS, "alice", 100);
        assert!(matches!(result, Err(LedgerError::AccessControl(_))));
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn mint_increases_balance_and_supply() {
        let mut ledger = ledger(0);
        ledger.mint(MINTER, "alice", 500).unwrap();
        assert_eq!(ledger.balance_of("alice"), 500);
        assert_eq!(ledger.total_supply(), 500);
        assert_supply_conserved(&ledger);
    }

    #[test]
    fn mint_overflow_rejected_without_partial_state() {
        let mut ledger = ledger(0);
        ledger.mint(MINTER, "alice", u64::MAX).unwrap();
        let result = ledger.mint(MINTER, "bob", 1);
        assert!(matches!(result, Err(LedgerError::SupplyOverflow { .. })));
        assert_eq!(ledger.balance_of("bob"), 0);
        assert_supply_conserved(&ledger);
    }

    #[test]
    fn burn_decreases_balance_and_supply() {
        let mut ledger = ledger(1_000);
        ledger.burn(MINTER, RESERVE, 400).unwrap();
        assert_eq!(ledger.balance_of(RESERVE), 600);
        assert_eq!(ledger.total_supply(), 600);
        assert_supply_conserved(&ledger);
    }

    #[test]
    fn burn_more_than_balance_rejected() {
        let mut ledger = ledger(100);
        let result = ledger.burn(MINTER, RESERVE, 200);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance {
                available: 100,
                requested: 200,
                ..
            })
        ));
        assert_eq!(ledger.balance_of(RESERVE), 100);
    }

    #[test]
    fn transfer_moves_funds_atomically() {
        let mut ledger = ledger(1_000);
        ledger.transfer(RESERVE, "alice", 250).unwrap();
        assert_eq!(ledger.balance_of(RESERVE), 750);
        assert_eq!(ledger.balance_of("alice"), 250);
        assert_supply_conserved(&ledger);
    }

    #[test]
    fn transfer_without_funds_rejected() {
        let mut ledger = ledger(1_000);
        let result = ledger.transfer("alice", "bob", 1);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn self_transfer_preserves_balance() {
        let mut ledger = ledger(1_000);
        ledger.transfer(RESERVE, RESERVE, 100).unwrap();
        assert_eq!(ledger.balance_of(RESERVE), 1_000);
        assert_supply_conserved(&ledger);
    }

    #[test]
    fn paused_ledger_rejects_supply_and_transfer_operations() {
        let mut ledger = ledger(1_000);
        ledger.pause(OPS).unwrap();

        assert!(matches!(
            ledger.mint(MINTER, "alice", 1),
            Err(LedgerError::Paused)
        ));
        assert!(matches!(
            ledger.burn(MINTER, RESERVE, 1),
            Err(LedgerError::Paused)
        ));
        assert!(matches!(
            ledger.transfer(RESERVE, "alice", 1),
            Err(LedgerError::Paused)
        ));
        assert!(matches!(
            ledger.transfer_from("spender", RESERVE, "alice", 1),
            Err(LedgerError::Paused)
        ));
    }

    #[test]
    fn pause_requires_contract_admin() {
        let mut ledger = ledger(0);
        assert!(matches!(
            ledger.pause(MINTER),
            Err(LedgerError::AccessControl(_))
        ));
        assert!(!ledger.is_paused());
    }

    #[test]
    fn pause_is_idempotent() {
        let mut ledger = ledger(0);
        ledger.pause(OPS).unwrap();
        ledger.pause(OPS).unwrap();
        assert!(ledger.is_paused());
        ledger.unpause(OPS).unwrap();
        ledger.unpause(OPS).unwrap();
        assert!(!ledger.is_paused());
    }

    #[test]
    fn approve_and_transfer_from() {
        let mut ledger = ledger(1_000);
        ledger.approve(RESERVE, "spender", 300).unwrap();
        assert_eq!(ledger.allowance(RESERVE, "spender"), 300);

        ledger.transfer_from("spender", RESERVE, "alice", 200).unwrap();
        assert_eq!(ledger.balance_of("alice"), 200);
        assert_eq!(ledger.allowance(RESERVE, "spender"), 100);
        assert_supply_conserved(&ledger);
    }

    #[test]
    fn transfer_from_beyond_allowance_rejected() {
        let mut ledger = ledger(1_000);
        ledger.approve(RESERVE, "spender", 100).unwrap();
        let result = ledger.transfer_from("spender", RESERVE, "alice", 200);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientAllowance {
                available: 100,
                requested: 200,
                ..
            })
        ));
        assert_eq!(ledger.balance_of("alice"), 0);
        assert_eq!(ledger.allowance(RESERVE, "spender"), 100);
    }

    #[test]
    fn approve_null_spender_rejected() {
        let mut ledger = ledger(0);
        assert!(matches!(
            ledger.approve(RESERVE, "", 100),
            Err(LedgerError::ZeroAddress)
        ));
    }

    #[test]
    fn set_permission_requires_permissions_admin() {
        let mut ledger = ledger(0);
        assert!(matches!(
            ledger.set_permission(MINTER, "alice", 4),
            Err(LedgerError::AccessControl(_))
        ));
        ledger.set_permission(OPS, "alice", 4).unwrap();
        assert_eq!(ledger.get_permission("alice"), 4);
    }

    #[test]
    fn set_permission_null_account_rejected() {
        let mut ledger = ledger(0);
        assert!(matches!(
            ledger.set_permission(OPS, "", 4),
            Err(LedgerError::ZeroAddress)
        ));
    }

    #[test]
    fn debug_output_omits_bulky_state() {
        let ledger = ledger(1_000);
        let rendered = format!("{ledger:?}");
        assert!(rendered.contains("Charter Token"));
        assert!(rendered.contains("standard-restriction-engine"));
    }
}
