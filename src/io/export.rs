use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::AdminService;
use crate::domain::{
    format_cents, AccountEntry, AuditEntry, Customer, InventoryItem, OwnerId, PayrollEntry, Period,
    RecordKind, Review, TransactionRecord,
};

/// Full-database snapshot for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub customers: Vec<Customer>,
    pub records: Vec<TransactionRecord>,
    pub inventory: Vec<InventoryItem>,
    pub payroll: Vec<PayrollEntry>,
    pub receivables: Vec<AccountEntry>,
    pub payables: Vec<AccountEntry>,
    pub reviews: Vec<Review>,
    pub deletion_history: Vec<AuditEntry>,
}

/// Exporter for converting shop data to CSV or JSON.
pub struct Exporter<'a> {
    service: &'a AdminService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a AdminService) -> Self {
        Self { service }
    }

    /// Write a customer statement as CSV, newest entry first.
    ///
    /// Running balances come from the ascending walk; the rows are merely
    /// presented in reverse.
    pub async fn export_statement_csv<W: Write>(
        &self,
        owner: OwnerId,
        customer_name: &str,
        period: Period,
        custom_from: Option<NaiveDate>,
        custom_to: Option<NaiveDate>,
        writer: W,
    ) -> Result<usize> {
        let statement = self
            .service
            .customer_statement(owner, customer_name, period, custom_from, custom_to)
            .await?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "date",
            "type",
            "details",
            "payment_method",
            "amount",
            "balance",
        ])?;

        let mut count = 0;
        for line in statement.lines.iter().rev() {
            let record = &line.record;
            let date = record
                .created_at
                .map(|at| at.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".to_string());
            let details = match record.kind {
                RecordKind::Send => format!(
                    "{} x {}",
                    record.product_name.as_deref().unwrap_or("-"),
                    record.quantity.unwrap_or(0)
                ),
                RecordKind::Receive => "Payment".to_string(),
                RecordKind::Other(_) => record.kind.as_str().to_string(),
            };
            let payment_method = record
                .payment_method
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            csv_writer.write_record([
                date,
                record.kind.as_str().to_string(),
                details,
                payment_method,
                record.amount.map(format_cents).unwrap_or_default(),
                format_cents(line.balance_after),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export every customer's owed balance as CSV.
    pub async fn export_balances_csv<W: Write>(
        &self,
        owner: OwnerId,
        writer: W,
    ) -> Result<usize> {
        let balances = self.service.all_balances(owner).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["customer", "phone", "balance"])?;

        let mut count = 0;
        for entry in &balances {
            csv_writer.write_record([
                entry.customer.name.clone(),
                entry.customer.phone.clone().unwrap_or_default(),
                format_cents(entry.balance),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the owner's full data set as a JSON snapshot.
    pub async fn export_full_json<W: Write>(
        &self,
        owner: OwnerId,
        mut writer: W,
    ) -> Result<DatabaseSnapshot> {
        use crate::domain::AccountDirection;

        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            customers: self.service.list_customers(owner).await?,
            records: self.service.list_all_records(owner).await?,
            inventory: self.service.list_items(owner).await?,
            payroll: self.service.list_payroll_entries(owner).await?,
            receivables: self
                .service
                .list_account_entries(owner, AccountDirection::Receivable)
                .await?,
            payables: self
                .service
                .list_account_entries(owner, AccountDirection::Payable)
                .await?,
            reviews: self.service.list_reviews(owner).await?,
            deletion_history: self.service.deletion_history(owner).await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
