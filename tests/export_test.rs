mod common;

use anyhow::Result;
use common::{record_date, test_service, StandardShop};
use khata::domain::{PaymentMethod, Period};
use khata::io::Exporter;

#[tokio::test]
async fn test_statement_csv_newest_first_with_ascending_balances() -> Result<()> {
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
            PaymentMethod::JazzCash,
            record_date("2024-01-05"),
        )
        .await?;

    let exporter = Exporter::new(&service);
    let mut buffer = Vec::new();
    let count = exporter
        .export_statement_csv(owner, "Akram Traders", Period::All, None, None, &mut buffer)
        .await?;
    assert_eq!(count, 2);

    let csv = String::from_utf8(buffer)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "date,type,details,payment_method,amount,balance");

    // Newest first: the payment row on top, but its balance is the
    // ascending-walk value (5000.00 - 2000.00 = 3000.00)
    assert!(lines[1].starts_with("05/01/2024,receive,Payment,jazzcash,2000.00,3000.00"));
    assert!(lines[2].starts_with("01/01/2024,send,Cement bag x 4,,5000.00,5000.00"));

    Ok(())
}

#[tokio::test]
async fn test_balances_csv() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    StandardShop::create(&service, owner).await?;

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

    let exporter = Exporter::new(&service);
    let mut buffer = Vec::new();
    let count = exporter.export_balances_csv(owner, &mut buffer).await?;
    assert_eq!(count, 2);

    let csv = String::from_utf8(buffer)?;
    assert!(csv.starts_with("customer,phone,balance"));
    assert!(csv.contains("Akram Traders,0300-1234567,0.00"));
    assert!(csv.contains("Bismillah Store,,3000.00"));

    Ok(())
}

#[tokio::test]
async fn test_full_json_snapshot() -> Result<()> {
    let (service, owner, _temp) = test_service().await?;
    StandardShop::create(&service, owner).await?;

    service
        .send_product(
            owner,
            "Akram Traders",
            "Cement bag",
            1,
            None,
            record_date("2024-01-01"),
        )
        .await?;
    service.add_review(owner, "Good month".into(), None, 4).await?;
    service.delete_item(owner, "Steel rod").await?;

    let exporter = Exporter::new(&service);
    let mut buffer = Vec::new();
    let snapshot = exporter.export_full_json(owner, &mut buffer).await?;

    assert_eq!(snapshot.customers.len(), 2);
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.inventory.len(), 1);
    assert_eq!(snapshot.reviews.len(), 1);
    assert_eq!(snapshot.deletion_history.len(), 1);

    // The written JSON parses back and carries the same shape
    let parsed: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed["customers"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["records"][0]["kind"], "send");

    Ok(())
}
