mod common;

use anyhow::Result;
use common::{date, record_date, test_service, StandardShop};
use khata::domain::{AccountDirection, PaymentMethod, PayrollKind};

#[tokio::test]
async fn test_batched_balances_match_per_customer_folds() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    StandardShop::create(&service, owner).await?;

    service
        .send_product(
            owner,
            "Akram Traders",
            "Cement bag",
            4,
            None,
            record_date("2024-01-01"),
        )
        .await?;
    service
        .receive_payment(
            owner,
            "Akram Traders",
            2000_00,
            PaymentMethod::Cash,
            record_date("2024-01-05"),
        )
        .await?;
    service
        .send_product(
            owner,
            "Bismillah Store",
            "Steel rod",
            10,
            None,
            record_date("2024-01-03"),
        )
        .await?;

    let batched = service.all_balances(owner).await?;
    assert_eq!(batched.len(), 2);

    for entry in &batched {
        let individual = service.customer_balance(owner, &entry.customer.name).await?;
        assert_eq!(
            entry.balance, individual.balance,
            "batched and per-customer folds must agree for {}",
            entry.customer.name
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_all_balances_includes_customers_without_records() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    StandardShop::create(&service, owner).await?;

    let balances = service.all_balances(owner).await?;
    assert_eq!(balances.len(), 2);
    assert!(balances.iter().all(|entry| entry.balance == 0));

    Ok(())
}

#[tokio::test]
async fn test_dashboard_stats() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    StandardShop::create(&service, owner).await?;

    service
        .send_product(
            owner,
            "Akram Traders",
            "Cement bag",
            4,
            None,
            record_date("2024-01-01"),
        )
        .await?;
    service
        .receive_payment(
            owner,
            "Akram Traders",
            2000_00,
            PaymentMethod::Cash,
            record_date("2024-01-05"),
        )
        .await?;
    service
        .add_payroll_entry(
            owner,
            "Bilal".into(),
            30_000_00,
            PayrollKind::Salary,
            None,
            date("2024-01-31"),
        )
        .await?;
    service
        .add_payroll_entry(
            owner,
            "Bilal".into(),
            2_000_00,
            PayrollKind::Deduction,
            None,
            date("2024-01-31"),
        )
        .await?;
    service
        .add_account_entry(
            owner,
            AccountDirection::Receivable,
            "Hamza & Sons".into(),
            1_500_00,
            None,
            None,
        )
        .await?;
    service
        .add_account_entry(
            owner,
            AccountDirection::Payable,
            "City Suppliers".into(),
            900_00,
            None,
            None,
        )
        .await?;
    service.add_review(owner, "Good month".into(), None, 4).await?;

    let stats = service.dashboard_stats(owner).await?;

    assert_eq!(stats.customers_count, 2);
    assert_eq!(stats.inventory_count, 2);
    // Cement: (100 - 4) x 1250.00, Steel: 500 x 300.00
    assert_eq!(stats.inventory_value, 96 * 1250_00 + 500 * 300_00);
    // 4 x 1250.00 - 2000.00
    assert_eq!(stats.customer_balances_total, 3000_00);
    assert_eq!(stats.payroll_net, 28_000_00);
    assert_eq!(stats.receivable_pending, 1_500_00);
    assert_eq!(stats.payable_pending, 900_00);
    assert_eq!(stats.receivable_entries, 1);
    assert_eq!(stats.payable_entries, 1);
    assert_eq!(stats.average_rating, Some(4.0));

    Ok(())
}

#[tokio::test]
async fn test_dashboard_stats_empty_shop() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;

    let stats = service.dashboard_stats(owner).await?;
    assert_eq!(stats.customers_count, 0);
    assert_eq!(stats.inventory_value, 0);
    assert_eq!(stats.customer_balances_total, 0);
    assert_eq!(stats.payroll_net, 0);
    assert_eq!(stats.average_rating, None);

    Ok(())
}
