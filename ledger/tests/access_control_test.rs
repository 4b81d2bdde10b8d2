//! Integration tests for role administration through the ledger facade.
//!
//! The invariants here must survive arbitrary administrative churn: the
//! root role is permanent, membership transitions are exact, and the
//! admin-of hierarchy resolves dynamically on every guard check.

use anyhow::Result;

use charter_ledger::{
    AccessControlError, Ledger, LedgerError, Notification, RecordingSink, Role,
    StandardRestrictionEngine,
};

const DEPLOYER: &str = "deployer";
const MINTER: &str = "minter";
const OPS: &str = "ops";
const RESERVE: &str = "reserve";

fn ledger_with_audit() -> (Ledger, RecordingSink) {
    let sink = RecordingSink::new();
    let ledger = Ledger::new(
        "Charter Token".to_string(),
        "CHT".to_string(),
        0,
        DEPLOYER,
        MINTER,
        OPS,
        RESERVE,
        Box::new(StandardRestrictionEngine::new()),
        Box::new(sink.clone()),
    )
    .unwrap();
    (ledger, sink)
}

// ---------------------------------------------------------------------------
// Grant / Revoke / Renounce
// ---------------------------------------------------------------------------

#[test]
fn super_admin_administers_mint_and_contract_roles() -> Result<()> {
    let (mut ledger, _) = ledger_with_audit();

    ledger.grant_role(DEPLOYER, Role::MintAdmin, "second-minter")?;
    assert!(ledger.has_role(Role::MintAdmin, "second-minter"));

    ledger.revoke_role(DEPLOYER, Role::MintAdmin, "second-minter")?;
    assert!(!ledger.has_role(Role::MintAdmin, "second-minter"));
    Ok(())
}

#[test]
fn contract_admin_administers_permissions_admin() -> Result<()> {
    let (mut ledger, _) = ledger_with_audit();
    assert_eq!(ledger.role_admin(Role::PermissionsAdmin), Role::ContractAdmin);

    // OPS holds ContractAdmin, so it can delegate compliance duty.
    ledger.grant_role(OPS, Role::PermissionsAdmin, "compliance")?;
    assert!(ledger.has_role(Role::PermissionsAdmin, "compliance"));

    // The deployer holds SuperAdmin but not ContractAdmin, so it cannot.
    let result = ledger.grant_role(DEPLOYER, Role::PermissionsAdmin, "other");
    assert!(matches!(
        result,
        Err(LedgerError::AccessControl(
            AccessControlError::Unauthorized {
                role: Role::ContractAdmin,
                ..
            }
        ))
    ));
    Ok(())
}

#[test]
fn duplicate_grant_and_missing_revoke_are_exact_failures() -> Result<()> {
    let (mut ledger, _) = ledger_with_audit();

    let result = ledger.grant_role(DEPLOYER, Role::MintAdmin, MINTER);
    assert!(matches!(
        result,
        Err(LedgerError::AccessControl(
            AccessControlError::AlreadyGranted { .. }
        ))
    ));

    let result = ledger.revoke_role(DEPLOYER, Role::MintAdmin, "never-held");
    assert!(matches!(
        result,
        Err(LedgerError::AccessControl(AccessControlError::NotHeld { .. }))
    ));

    let result = ledger.renounce_role("never-held", Role::MintAdmin);
    assert!(matches!(
        result,
        Err(LedgerError::AccessControl(AccessControlError::NotHeld { .. }))
    ));
    Ok(())
}

#[test]
fn renounced_role_loses_its_capability() -> Result<()> {
    let (mut ledger, _) = ledger_with_audit();

    ledger.renounce_role(MINTER, Role::MintAdmin)?;
    assert!(!ledger.has_role(Role::MintAdmin, MINTER));

    let result = ledger.mint(MINTER, "alice", 100);
    assert!(matches!(result, Err(LedgerError::AccessControl(_))));
    Ok(())
}

// ---------------------------------------------------------------------------
// Root Protection
// ---------------------------------------------------------------------------

#[test]
fn super_admin_survives_every_removal_path() {
    let (mut ledger, _) = ledger_with_audit();

    let revoke = ledger.revoke_role(DEPLOYER, Role::SuperAdmin, DEPLOYER);
    assert!(matches!(
        revoke,
        Err(LedgerError::AccessControl(
            AccessControlError::ProtectedRole(Role::SuperAdmin)
        ))
    ));

    let renounce = ledger.renounce_role(DEPLOYER, Role::SuperAdmin);
    assert!(matches!(
        renounce,
        Err(LedgerError::AccessControl(
            AccessControlError::ProtectedRole(Role::SuperAdmin)
        ))
    ));

    assert!(ledger.has_role(Role::SuperAdmin, DEPLOYER));
}

#[test]
fn root_protection_holds_under_repeated_churn() -> Result<()> {
    let (mut ledger, _) = ledger_with_audit();

    for round in 0..10 {
        let admin = format!("admin-{round}");
        ledger.grant_role(DEPLOYER, Role::MintAdmin, &admin)?;
        ledger.grant_role(DEPLOYER, Role::SuperAdmin, &admin)?;

        // Each new SuperAdmin can administer, but never remove the root.
        assert!(ledger
            .revoke_role(&admin, Role::SuperAdmin, DEPLOYER)
            .is_err());
        assert!(ledger.renounce_role(&admin, Role::SuperAdmin).is_err());

        ledger.revoke_role(&admin, Role::MintAdmin, &admin)?;
    }

    assert!(ledger.has_role(Role::SuperAdmin, DEPLOYER));
    Ok(())
}

// ---------------------------------------------------------------------------
// Audit Stream
// ---------------------------------------------------------------------------

#[test]
fn role_lifecycle_is_audited() -> Result<()> {
    let (mut ledger, sink) = ledger_with_audit();
    sink.clear();

    ledger.grant_role(DEPLOYER, Role::MintAdmin, "alice")?;
    ledger.revoke_role(DEPLOYER, Role::MintAdmin, "alice")?;
    ledger.grant_role(DEPLOYER, Role::MintAdmin, "alice")?;
    ledger.renounce_role("alice", Role::MintAdmin)?;

    assert_eq!(
        sink.recorded(),
        vec![
            Notification::RoleGranted {
                role: Role::MintAdmin,
                account: "alice".to_string(),
                actor: DEPLOYER.to_string(),
            },
            Notification::RoleRevoked {
                role: Role::MintAdmin,
                account: "alice".to_string(),
                actor: DEPLOYER.to_string(),
            },
            Notification::RoleGranted {
                role: Role::MintAdmin,
                account: "alice".to_string(),
                actor: DEPLOYER.to_string(),
            },
            Notification::RoleRenounced {
                role: Role::MintAdmin,
                account: "alice".to_string(),
            },
        ]
    );
    Ok(())
}

#[test]
fn failed_role_mutations_emit_nothing() {
    let (mut ledger, sink) = ledger_with_audit();
    sink.clear();

    assert!(ledger.grant_role(MINTER, Role::MintAdmin, "alice").is_err());
    assert!(ledger
        .revoke_role(DEPLOYER, Role::SuperAdmin, DEPLOYER)
        .is_err());
    assert!(ledger.renounce_role("stranger", Role::MintAdmin).is_err());

    assert!(sink.is_empty());
}
