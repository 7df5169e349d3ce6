mod common;

use anyhow::Result;
use common::{date, record_date, test_service, StandardShop};
use khata::domain::{self, PaymentMethod, Period};

/// Seed the sample ledger from the statement examples:
/// send 500.00 on Jan 1, receive 200.00 on Jan 5, send 100.00 on Jan 10.
async fn seed_sample_ledger(
    service: &khata::application::AdminService,
    owner: khata::domain::OwnerId,
) -> Result<()> {
    service
        .add_customer(owner, "Akram Traders".into(), None)
        .await?;
    service
        .add_item(owner, "Cement bag".into(), 100, 100_00)
        .await?;

    service
        .send_product(
            owner,
            "Akram Traders",
            "Cement bag",
            5,
            None,
            record_date("2024-01-01"),
        )
        .await?;
    service
        .receive_payment(
            owner,
            "Akram Traders",
            200_00,
            PaymentMethod::Cash,
            record_date("2024-01-05"),
        )
        .await?;
    service
        .send_product(
            owner,
            "Akram Traders",
            "Cement bag",
            1,
            None,
            record_date("2024-01-10"),
        )
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_statement_running_balances_ascending() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    seed_sample_ledger(&service, owner).await?;

    let statement = service
        .customer_statement(owner, "Akram Traders", Period::All, None, None)
        .await?;

    let balances: Vec<i64> = statement
        .lines
        .iter()
        .map(|line| line.balance_after)
        .collect();
    assert_eq!(balances, vec![500_00, 300_00, 400_00]);
    assert_eq!(statement.closing_balance, 400_00);
    assert_eq!(statement.overall_balance, 400_00);

    Ok(())
}

#[tokio::test]
async fn test_statement_closing_matches_current_balance() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    seed_sample_ledger(&service, owner).await?;

    let statement = service
        .customer_statement(owner, "Akram Traders", Period::All, None, None)
        .await?;
    let balance = service.customer_balance(owner, "Akram Traders").await?;

    assert_eq!(statement.closing_balance, balance.balance);

    Ok(())
}

#[tokio::test]
async fn test_statement_empty_ledger() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    service
        .add_customer(owner, "Akram Traders".into(), None)
        .await?;

    let statement = service
        .customer_statement(owner, "Akram Traders", Period::All, None, None)
        .await?;
    assert!(statement.lines.is_empty());
    assert_eq!(statement.closing_balance, 0);

    let balance = service.customer_balance(owner, "Akram Traders").await?;
    assert_eq!(balance.balance, 0);

    Ok(())
}

#[tokio::test]
async fn test_custom_period_filters_inclusive_days() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    seed_sample_ledger(&service, owner).await?;

    let statement = service
        .customer_statement(
            owner,
            "Akram Traders",
            Period::Custom,
            Some(date("2024-01-05")),
            Some(date("2024-01-10")),
        )
        .await?;

    assert_eq!(statement.lines.len(), 2);
    // Within the window the walk starts from zero: -200 then -100
    assert_eq!(statement.closing_balance, -100_00);
    // The overall balance still covers the whole ledger
    assert_eq!(statement.overall_balance, 400_00);

    Ok(())
}

#[tokio::test]
async fn test_custom_period_missing_bound_passes_through() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    seed_sample_ledger(&service, owner).await?;

    let statement = service
        .customer_statement(
            owner,
            "Akram Traders",
            Period::Custom,
            Some(date("2024-01-05")),
            None,
        )
        .await?;

    assert_eq!(statement.lines.len(), 3);
    assert_eq!(statement.closing_balance, 400_00);

    Ok(())
}

#[tokio::test]
async fn test_balance_recomputed_after_each_mutation() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    StandardShop::create(&service, owner).await?;

    let mut expected = 0;
    for day in 1..=5 {
        let result = service
            .send_product(
                owner,
                "Akram Traders",
                "Steel rod",
                2,
                None,
                record_date(&format!("2024-02-0{}", day)),
            )
            .await?;
        expected += 2 * 300_00;
        assert_eq!(result.balance, expected);
    }

    let receive = service
        .receive_payment(
            owner,
            "Akram Traders",
            1000_00,
            PaymentMethod::Bank,
            record_date("2024-02-06"),
        )
        .await?;
    assert_eq!(receive.balance, expected - 1000_00);

    Ok(())
}

#[tokio::test]
async fn test_same_day_records_keep_insertion_order() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    StandardShop::create(&service, owner).await?;

    let when = record_date("2024-03-01");
    service
        .send_product(owner, "Akram Traders", "Cement bag", 1, None, when)
        .await?;
    service
        .receive_payment(owner, "Akram Traders", 1250_00, PaymentMethod::Cash, when)
        .await?;
    service
        .send_product(owner, "Akram Traders", "Cement bag", 2, None, when)
        .await?;

    let statement = service
        .customer_statement(owner, "Akram Traders", Period::All, None, None)
        .await?;
    let balances: Vec<i64> = statement
        .lines
        .iter()
        .map(|line| line.balance_after)
        .collect();
    assert_eq!(balances, vec![1250_00, 0, 2500_00]);

    Ok(())
}

#[tokio::test]
async fn test_domain_fold_matches_service_balance() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    seed_sample_ledger(&service, owner).await?;

    let records = service.list_all_records(owner).await?;
    let folded = domain::current_balance(&records);
    let balance = service.customer_balance(owner, "Akram Traders").await?;

    assert_eq!(folded, balance.balance);

    Ok(())
}
