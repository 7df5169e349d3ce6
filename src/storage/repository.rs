use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    AccountDirection, AccountEntry, AccountEntryId, AuditAction, AuditEntry, AuditEntryId, Cents,
    Customer, CustomerId, EntryStatus, InventoryItem, ItemId, OwnerId, PayrollEntry, PayrollId,
    PayrollKind, PaymentMethod, RecordKind, Review, ReviewId, TransactionRecord,
};

use super::{MIGRATION_001_CORE, MIGRATION_002_OPERATIONS};

const RECORD_COLUMNS: &str = "id, sequence, customer_id, owner_id, kind, amount, created_at, \
     recorded_at, payment_method, product_id, product_name, quantity, unit_price";

/// Repository for persisting and querying all shop data.
/// Every read and delete is scoped by the explicit owner id; there is no
/// ambient tenant state anywhere below this layer.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_CORE)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(MIGRATION_002_OPERATIONS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Customer operations
    // ========================

    pub async fn save_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, owner_id, name, phone, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer.id.to_string())
        .bind(customer.owner_id.to_string())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save customer")?;
        Ok(())
    }

    pub async fn get_customer(&self, owner_id: OwnerId, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(
            "SELECT id, owner_id, name, phone, created_at FROM customers WHERE owner_id = ? AND id = ?",
        )
        .bind(owner_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch customer")?;

        row.as_ref().map(Self::row_to_customer).transpose()
    }

    pub async fn get_customer_by_name(
        &self,
        owner_id: OwnerId,
        name: &str,
    ) -> Result<Option<Customer>> {
        let row = sqlx::query(
            "SELECT id, owner_id, name, phone, created_at FROM customers WHERE owner_id = ? AND name = ?",
        )
        .bind(owner_id.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch customer by name")?;

        row.as_ref().map(Self::row_to_customer).transpose()
    }

    pub async fn list_customers(&self, owner_id: OwnerId) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, name, phone, created_at FROM customers WHERE owner_id = ? ORDER BY name",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list customers")?;

        rows.iter().map(Self::row_to_customer).collect()
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query("UPDATE customers SET name = ?, phone = ? WHERE owner_id = ? AND id = ?")
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(customer.owner_id.to_string())
            .bind(customer.id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to update customer")?;
        Ok(())
    }

    /// Remove a customer and every ledger record in one transaction.
    /// Returns the number of records that went with the customer.
    /// The audit entry must already have been written by the caller.
    pub async fn delete_customer_with_records(
        &self,
        owner_id: OwnerId,
        customer_id: CustomerId,
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await.context("Failed to begin delete")?;

        let deleted = sqlx::query(
            "DELETE FROM customer_records WHERE owner_id = ? AND customer_id = ?",
        )
        .bind(owner_id.to_string())
        .bind(customer_id.to_string())
        .execute(&mut *tx)
        .await
        .context("Failed to delete customer records")?;

        sqlx::query("DELETE FROM customers WHERE owner_id = ? AND id = ?")
            .bind(owner_id.to_string())
            .bind(customer_id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to delete customer")?;

        tx.commit().await.context("Failed to commit delete")?;
        Ok(deleted.rows_affected())
    }

    fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let created_at_str: String = row.get("created_at");

        Ok(Customer {
            id: Uuid::parse_str(&id_str).context("Invalid customer ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            name: row.get("name"),
            phone: row.get("phone"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Ledger record operations
    // ========================

    /// Append a ledger record, assigning the next sequence number.
    pub async fn save_record(&self, record: &mut TransactionRecord) -> Result<()> {
        let sequence = self.next_sequence().await?;
        record.sequence = sequence;

        sqlx::query(
            r#"
            INSERT INTO customer_records (id, sequence, customer_id, owner_id, kind, amount, created_at, recorded_at, payment_method, product_id, product_name, quantity, unit_price)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.sequence)
        .bind(record.customer_id.to_string())
        .bind(record.owner_id.to_string())
        .bind(record.kind.as_str())
        .bind(record.amount)
        .bind(record.created_at.map(|dt| dt.to_rfc3339()))
        .bind(record.recorded_at.to_rfc3339())
        .bind(record.payment_method.map(|m| m.as_str()))
        .bind(record.product_id.map(|id| id.to_string()))
        .bind(&record.product_name)
        .bind(record.quantity)
        .bind(record.unit_price)
        .execute(&self.pool)
        .await
        .context("Failed to save ledger record")?;

        Ok(())
    }

    /// Get the next sequence number and increment the counter.
    async fn next_sequence(&self) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'record_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to get next sequence number")?;

        Ok(row.get("value"))
    }

    /// All ledger records for one customer, in insertion order.
    pub async fn list_records_for_customer(
        &self,
        owner_id: OwnerId,
        customer_id: CustomerId,
    ) -> Result<Vec<TransactionRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM customer_records WHERE owner_id = ? AND customer_id = ? ORDER BY sequence"
        );
        let rows = sqlx::query(&query)
            .bind(owner_id.to_string())
            .bind(customer_id.to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list records for customer")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// All ledger records across every customer of one owner, in one query.
    /// Callers group by customer in memory; no per-customer fetch loop.
    pub async fn list_records_for_owner(
        &self,
        owner_id: OwnerId,
    ) -> Result<Vec<TransactionRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM customer_records WHERE owner_id = ? ORDER BY sequence"
        );
        let rows = sqlx::query(&query)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list records for owner")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    pub async fn count_records_for_customer(
        &self,
        owner_id: OwnerId,
        customer_id: CustomerId,
    ) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM customer_records WHERE owner_id = ? AND customer_id = ?",
        )
        .bind(owner_id.to_string())
        .bind(customer_id.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to count records")?;

        Ok(row.get("count"))
    }

    /// Rehydrate a ledger record, degrading malformed lenient columns
    /// instead of failing the whole fetch: a non-numeric amount becomes
    /// None (zero contribution), an unparsable created_at becomes None
    /// (never matches a period filter).
    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<TransactionRecord> {
        let id_str: String = row.get("id");
        let customer_str: String = row.get("customer_id");
        let owner_str: String = row.get("owner_id");
        let kind_str: String = row.get("kind");
        let recorded_at_str: String = row.get("recorded_at");
        let product_id_str: Option<String> = row.get("product_id");

        let id = Uuid::parse_str(&id_str).context("Invalid record ID")?;

        let amount: Option<Cents> = match row.try_get("amount") {
            Ok(value) => value,
            Err(_) => {
                warn!("ledger record {id}: non-numeric amount, counting as zero");
                None
            }
        };

        let created_at = match row.try_get::<Option<String>, _>("created_at") {
            Ok(Some(raw)) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(_) => {
                    warn!("ledger record {id}: unparsable created_at {raw:?}, excluded from period filters");
                    None
                }
            },
            Ok(None) => None,
            Err(_) => {
                warn!("ledger record {id}: unreadable created_at, excluded from period filters");
                None
            }
        };

        let payment_method = row
            .try_get::<Option<String>, _>("payment_method")
            .ok()
            .flatten()
            .and_then(|raw| PaymentMethod::from_str(&raw));

        Ok(TransactionRecord {
            id,
            sequence: row.get("sequence"),
            customer_id: Uuid::parse_str(&customer_str).context("Invalid customer ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            kind: RecordKind::parse(&kind_str),
            amount,
            created_at,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at")?
                .with_timezone(&Utc),
            payment_method,
            product_id: product_id_str
                .map(|raw| Uuid::parse_str(&raw))
                .transpose()
                .context("Invalid product ID")?,
            product_name: row.get("product_name"),
            quantity: row.get("quantity"),
            unit_price: row.get("unit_price"),
        })
    }

    // ========================
    // Inventory operations
    // ========================

    pub async fn save_item(&self, item: &InventoryItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO inventory (id, owner_id, product_name, quantity, unit_price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id.to_string())
        .bind(item.owner_id.to_string())
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.created_at.to_rfc3339())
        .bind(item.updated_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await
        .context("Failed to save inventory item")?;
        Ok(())
    }

    pub async fn get_item(&self, owner_id: OwnerId, id: ItemId) -> Result<Option<InventoryItem>> {
        let row = sqlx::query(
            "SELECT id, owner_id, product_name, quantity, unit_price, created_at, updated_at FROM inventory WHERE owner_id = ? AND id = ?",
        )
        .bind(owner_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch inventory item")?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    pub async fn get_item_by_name(
        &self,
        owner_id: OwnerId,
        product_name: &str,
    ) -> Result<Option<InventoryItem>> {
        let row = sqlx::query(
            "SELECT id, owner_id, product_name, quantity, unit_price, created_at, updated_at FROM inventory WHERE owner_id = ? AND product_name = ?",
        )
        .bind(owner_id.to_string())
        .bind(product_name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch inventory item by name")?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    pub async fn list_items(&self, owner_id: OwnerId) -> Result<Vec<InventoryItem>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, product_name, quantity, unit_price, created_at, updated_at FROM inventory WHERE owner_id = ? ORDER BY product_name",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list inventory")?;

        rows.iter().map(Self::row_to_item).collect()
    }

    pub async fn update_item(&self, item: &InventoryItem) -> Result<()> {
        sqlx::query(
            "UPDATE inventory SET product_name = ?, quantity = ?, unit_price = ?, updated_at = ? WHERE owner_id = ? AND id = ?",
        )
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(Utc::now().to_rfc3339())
        .bind(item.owner_id.to_string())
        .bind(item.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update inventory item")?;
        Ok(())
    }

    pub async fn update_item_quantity(
        &self,
        owner_id: OwnerId,
        id: ItemId,
        quantity: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE inventory SET quantity = ?, updated_at = ? WHERE owner_id = ? AND id = ?")
            .bind(quantity)
            .bind(Utc::now().to_rfc3339())
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to update stock quantity")?;
        Ok(())
    }

    pub async fn delete_item(&self, owner_id: OwnerId, id: ItemId) -> Result<()> {
        sqlx::query("DELETE FROM inventory WHERE owner_id = ? AND id = ?")
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete inventory item")?;
        Ok(())
    }

    fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<InventoryItem> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: Option<String> = row.get("updated_at");

        Ok(InventoryItem {
            id: Uuid::parse_str(&id_str).context("Invalid item ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            product_name: row.get("product_name"),
            quantity: row.get("quantity"),
            unit_price: row.get("unit_price"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            updated_at: updated_at_str
                .map(|raw| DateTime::parse_from_rfc3339(&raw))
                .transpose()
                .context("Invalid updated_at timestamp")?
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }

    // ========================
    // Payroll operations
    // ========================

    pub async fn save_payroll_entry(&self, entry: &PayrollEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payroll (id, owner_id, employee_name, amount, kind, description, entry_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.owner_id.to_string())
        .bind(&entry.employee_name)
        .bind(entry.amount)
        .bind(entry.kind.as_str())
        .bind(&entry.description)
        .bind(entry.entry_date.to_string())
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save payroll entry")?;
        Ok(())
    }

    pub async fn get_payroll_entry(
        &self,
        owner_id: OwnerId,
        id: PayrollId,
    ) -> Result<Option<PayrollEntry>> {
        let row = sqlx::query(
            "SELECT id, owner_id, employee_name, amount, kind, description, entry_date, created_at FROM payroll WHERE owner_id = ? AND id = ?",
        )
        .bind(owner_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch payroll entry")?;

        row.as_ref().map(Self::row_to_payroll).transpose()
    }

    /// Payroll entries newest pay-date first.
    pub async fn list_payroll_entries(&self, owner_id: OwnerId) -> Result<Vec<PayrollEntry>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, employee_name, amount, kind, description, entry_date, created_at FROM payroll WHERE owner_id = ? ORDER BY entry_date DESC",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list payroll entries")?;

        rows.iter().map(Self::row_to_payroll).collect()
    }

    pub async fn update_payroll_entry(&self, entry: &PayrollEntry) -> Result<()> {
        sqlx::query(
            "UPDATE payroll SET employee_name = ?, amount = ?, kind = ?, description = ?, entry_date = ? WHERE owner_id = ? AND id = ?",
        )
        .bind(&entry.employee_name)
        .bind(entry.amount)
        .bind(entry.kind.as_str())
        .bind(&entry.description)
        .bind(entry.entry_date.to_string())
        .bind(entry.owner_id.to_string())
        .bind(entry.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update payroll entry")?;
        Ok(())
    }

    pub async fn delete_payroll_entry(&self, owner_id: OwnerId, id: PayrollId) -> Result<()> {
        sqlx::query("DELETE FROM payroll WHERE owner_id = ? AND id = ?")
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete payroll entry")?;
        Ok(())
    }

    fn row_to_payroll(row: &sqlx::sqlite::SqliteRow) -> Result<PayrollEntry> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let kind_str: String = row.get("kind");
        let entry_date_str: String = row.get("entry_date");
        let created_at_str: String = row.get("created_at");

        Ok(PayrollEntry {
            id: Uuid::parse_str(&id_str).context("Invalid payroll ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            employee_name: row.get("employee_name"),
            amount: row.get("amount"),
            kind: PayrollKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid payroll kind: {}", kind_str))?,
            description: row.get("description"),
            entry_date: entry_date_str
                .parse::<NaiveDate>()
                .context("Invalid entry_date")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Receivable / payable operations
    // ========================

    pub async fn save_account_entry(&self, entry: &AccountEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO account_entries (id, owner_id, direction, counterparty, amount, description, due_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.owner_id.to_string())
        .bind(entry.direction.as_str())
        .bind(&entry.counterparty)
        .bind(entry.amount)
        .bind(&entry.description)
        .bind(entry.due_date.map(|d| d.to_string()))
        .bind(entry.status.as_str())
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save account entry")?;
        Ok(())
    }

    pub async fn get_account_entry(
        &self,
        owner_id: OwnerId,
        id: AccountEntryId,
    ) -> Result<Option<AccountEntry>> {
        let row = sqlx::query(
            "SELECT id, owner_id, direction, counterparty, amount, description, due_date, status, created_at FROM account_entries WHERE owner_id = ? AND id = ?",
        )
        .bind(owner_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account entry")?;

        row.as_ref().map(Self::row_to_account_entry).transpose()
    }

    /// Entries for one side of the book, soonest due date first.
    pub async fn list_account_entries(
        &self,
        owner_id: OwnerId,
        direction: AccountDirection,
    ) -> Result<Vec<AccountEntry>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, direction, counterparty, amount, description, due_date, status, created_at FROM account_entries WHERE owner_id = ? AND direction = ? ORDER BY due_date IS NULL, due_date",
        )
        .bind(owner_id.to_string())
        .bind(direction.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list account entries")?;

        rows.iter().map(Self::row_to_account_entry).collect()
    }

    pub async fn update_account_entry(&self, entry: &AccountEntry) -> Result<()> {
        sqlx::query(
            "UPDATE account_entries SET counterparty = ?, amount = ?, description = ?, due_date = ?, status = ? WHERE owner_id = ? AND id = ?",
        )
        .bind(&entry.counterparty)
        .bind(entry.amount)
        .bind(&entry.description)
        .bind(entry.due_date.map(|d| d.to_string()))
        .bind(entry.status.as_str())
        .bind(entry.owner_id.to_string())
        .bind(entry.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update account entry")?;
        Ok(())
    }

    pub async fn delete_account_entry(&self, owner_id: OwnerId, id: AccountEntryId) -> Result<()> {
        sqlx::query("DELETE FROM account_entries WHERE owner_id = ? AND id = ?")
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete account entry")?;
        Ok(())
    }

    fn row_to_account_entry(row: &sqlx::sqlite::SqliteRow) -> Result<AccountEntry> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let direction_str: String = row.get("direction");
        let status_str: String = row.get("status");
        let due_date_str: Option<String> = row.get("due_date");
        let created_at_str: String = row.get("created_at");

        Ok(AccountEntry {
            id: Uuid::parse_str(&id_str).context("Invalid account entry ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            direction: AccountDirection::from_str(&direction_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid direction: {}", direction_str))?,
            counterparty: row.get("counterparty"),
            amount: row.get("amount"),
            description: row.get("description"),
            due_date: due_date_str
                .map(|raw| raw.parse::<NaiveDate>())
                .transpose()
                .context("Invalid due_date")?,
            status: EntryStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid status: {}", status_str))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Review operations
    // ========================

    pub async fn save_review(&self, review: &Review) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, owner_id, subject, content, rating, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(review.id.to_string())
        .bind(review.owner_id.to_string())
        .bind(&review.subject)
        .bind(&review.content)
        .bind(review.rating as i64)
        .bind(review.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save review")?;
        Ok(())
    }

    /// Reviews newest first.
    pub async fn list_reviews(&self, owner_id: OwnerId) -> Result<Vec<Review>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, subject, content, rating, created_at FROM reviews WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list reviews")?;

        rows.iter().map(Self::row_to_review).collect()
    }

    pub async fn delete_review(&self, owner_id: OwnerId, id: ReviewId) -> Result<()> {
        sqlx::query("DELETE FROM reviews WHERE owner_id = ? AND id = ?")
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete review")?;
        Ok(())
    }

    fn row_to_review(row: &sqlx::sqlite::SqliteRow) -> Result<Review> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let created_at_str: String = row.get("created_at");
        let rating: i64 = row.get("rating");

        Ok(Review {
            id: Uuid::parse_str(&id_str).context("Invalid review ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            subject: row.get("subject"),
            content: row.get("content"),
            rating: rating.clamp(1, 5) as u8,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Audit trail operations
    // ========================

    pub async fn save_audit_entry(&self, entry: &AuditEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, owner_id, action, detail, record_count, deleted_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.owner_id.to_string())
        .bind(entry.action.as_str())
        .bind(&entry.detail)
        .bind(entry.record_count)
        .bind(entry.deleted_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save audit entry")?;
        Ok(())
    }

    /// Deletion history, most recent first.
    pub async fn list_audit_entries(&self, owner_id: OwnerId) -> Result<Vec<AuditEntry>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, action, detail, record_count, deleted_at FROM audit_log WHERE owner_id = ? ORDER BY deleted_at DESC",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list audit entries")?;

        rows.iter().map(Self::row_to_audit_entry).collect()
    }

    pub async fn delete_audit_entry(&self, owner_id: OwnerId, id: AuditEntryId) -> Result<()> {
        sqlx::query("DELETE FROM audit_log WHERE owner_id = ? AND id = ?")
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete audit entry")?;
        Ok(())
    }

    fn row_to_audit_entry(row: &sqlx::sqlite::SqliteRow) -> Result<AuditEntry> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let action_str: String = row.get("action");
        let deleted_at_str: String = row.get("deleted_at");

        Ok(AuditEntry {
            id: Uuid::parse_str(&id_str).context("Invalid audit entry ID")?,
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            action: AuditAction::from_str(&action_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid audit action: {}", action_str))?,
            detail: row.get("detail"),
            record_count: row.get("record_count"),
            deleted_at: DateTime::parse_from_rfc3339(&deleted_at_str)
                .context("Invalid deleted_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
