mod common;

use common::*;
use rust_decimal_macros::dec;
use streakvault::domain::account::Balance;
use streakvault::domain::commitment::SECONDS_PER_DAY;
use streakvault::domain::ports::Ledger;
use streakvault::error::EscrowError;

#[tokio::test]
async fn test_initial_loss_accounts() {
    let bed = testbed().await;
    assert_eq!(bed.engine.loss_accounts().await.unwrap(), vec![OWNER, LOSS_1, LOSS_2]);
}

#[tokio::test]
async fn test_owner_manages_registry() {
    let bed = testbed().await;
    bed.engine.add_loss_account(OWNER, 12).await.unwrap();
    assert!(bed.engine.loss_accounts().await.unwrap().contains(&12));

    bed.engine.remove_loss_account(OWNER, 12).await.unwrap();
    assert!(!bed.engine.loss_accounts().await.unwrap().contains(&12));
}

#[tokio::test]
async fn test_non_owner_cannot_manage_registry() {
    let bed = testbed().await;
    assert!(matches!(
        bed.engine.add_loss_account(USER_1, 12).await.unwrap_err(),
        EscrowError::Authorization(_)
    ));
    assert!(matches!(
        bed.engine.remove_loss_account(USER_1, LOSS_1).await.unwrap_err(),
        EscrowError::Authorization(_)
    ));
}

#[tokio::test]
async fn test_only_owner_sets_rake() {
    let bed = testbed().await;
    assert!(matches!(
        bed.engine.set_rake_basis_points(USER_1, 100).await.unwrap_err(),
        EscrowError::Authorization(_)
    ));
    bed.engine.set_rake_basis_points(OWNER, 100).await.unwrap();
    assert_eq!(bed.engine.rake_basis_points().await, 100);
}

#[tokio::test]
async fn test_only_owner_sets_treasury() {
    let bed = testbed().await;
    assert!(matches!(
        bed.engine.set_treasury(USER_1, 3).await.unwrap_err(),
        EscrowError::Authorization(_)
    ));
    bed.engine.set_treasury(OWNER, 3).await.unwrap();
    assert_eq!(bed.engine.treasury().await, 3);

    // Future fees route to the new treasury.
    create_week_commitment(&bed).await;
    assert_eq!(bed.ledger.balance(3).await.unwrap(), Balance::new(dec!(0.025)));
    assert_eq!(bed.ledger.balance(TREASURY).await.unwrap(), Balance::ZERO);
}

#[tokio::test]
async fn test_registry_removal_does_not_invalidate_existing_commitments() {
    let bed = testbed().await;
    let id = create_week_commitment(&bed).await;
    bed.engine.remove_loss_account(OWNER, LOSS_1).await.unwrap();

    // The commitment still forfeits to the account it was created with.
    bed.clock.advance(2 * SECONDS_PER_DAY);
    bed.engine.check_in(USER_1, id).await.unwrap();
    assert_eq!(bed.ledger.balance(LOSS_1).await.unwrap(), Balance::new(dec!(0.975)));
}
