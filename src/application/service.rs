use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;

use crate::domain::{
    self, AccountDirection, AccountEntry, AccountEntryId, AuditEntry, AuditEntryId, Cents,
    Customer, CustomerId, EntryStatus, InventoryItem, LedgerLine, OwnerId, PayrollEntry, PayrollId,
    PayrollKind, PaymentMethod, Period, Review, ReviewId, StockError, TransactionRecord,
};
use crate::storage::Repository;

use super::{AppError, DashboardStats};

/// Application service providing high-level operations over the shop data.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every operation takes the owner id explicitly; nothing below this layer
/// reads ambient tenant state. Balances are always recomputed from the
/// authoritative record set after a mutation, never patched incrementally.
pub struct AdminService {
    repo: Repository,
}

/// Result of deleting a customer together with their ledger.
pub struct CascadeResult {
    pub customer: Customer,
    pub records_removed: u64,
}

/// Result of sending product to a customer.
pub struct SendResult {
    pub record: TransactionRecord,
    pub customer_name: String,
    pub remaining_stock: i64,
    /// Owed balance after the send, freshly refolded.
    pub balance: Cents,
}

/// Result of receiving a payment from a customer.
pub struct ReceiveResult {
    pub record: TransactionRecord,
    pub customer_name: String,
    /// Owed balance after the payment, freshly refolded.
    pub balance: Cents,
}

/// Owed balance for one customer.
pub struct BalanceEntry {
    pub customer: Customer,
    pub balance: Cents,
}

/// A period-filtered ledger statement. Lines are in ascending chronological
/// order; display newest-first by reversing, never by refolding.
pub struct Statement {
    pub customer: Customer,
    pub period: Period,
    pub lines: Vec<LedgerLine>,
    /// Balance at the end of the filtered window.
    pub closing_balance: Cents,
    /// Balance over the whole ledger, ignoring the filter.
    pub overall_balance: Cents,
}

impl AdminService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Customer operations
    // ========================

    pub async fn add_customer(
        &self,
        owner: OwnerId,
        name: String,
        phone: Option<String>,
    ) -> Result<Customer, AppError> {
        if self.repo.get_customer_by_name(owner, &name).await?.is_some() {
            return Err(AppError::CustomerAlreadyExists(name));
        }

        let mut customer = Customer::new(owner, name);
        if let Some(phone) = phone {
            customer = customer.with_phone(phone);
        }

        self.repo.save_customer(&customer).await?;
        Ok(customer)
    }

    pub async fn get_customer(&self, owner: OwnerId, name: &str) -> Result<Customer, AppError> {
        self.repo
            .get_customer_by_name(owner, name)
            .await?
            .ok_or_else(|| AppError::CustomerNotFound(name.to_string()))
    }

    pub async fn list_customers(&self, owner: OwnerId) -> Result<Vec<Customer>, AppError> {
        Ok(self.repo.list_customers(owner).await?)
    }

    pub async fn update_customer(
        &self,
        owner: OwnerId,
        name: &str,
        new_name: Option<String>,
        new_phone: Option<String>,
    ) -> Result<Customer, AppError> {
        let mut customer = self.get_customer(owner, name).await?;

        if let Some(new_name) = new_name {
            if new_name != customer.name
                && self
                    .repo
                    .get_customer_by_name(owner, &new_name)
                    .await?
                    .is_some()
            {
                return Err(AppError::CustomerAlreadyExists(new_name));
            }
            customer.name = new_name;
        }
        if let Some(new_phone) = new_phone {
            customer.phone = Some(new_phone);
        }

        self.repo.update_customer(&customer).await?;
        Ok(customer)
    }

    /// Delete a customer and every ledger record they own.
    /// The audit entry is written first, so the history survives even if the
    /// delete itself fails halfway.
    pub async fn delete_customer(
        &self,
        owner: OwnerId,
        name: &str,
    ) -> Result<CascadeResult, AppError> {
        let customer = self.get_customer(owner, name).await?;
        let record_count = self
            .repo
            .count_records_for_customer(owner, customer.id)
            .await?;

        let audit = AuditEntry::customer_cascade(owner, customer.name.clone(), record_count);
        self.repo.save_audit_entry(&audit).await?;

        let records_removed = self
            .repo
            .delete_customer_with_records(owner, customer.id)
            .await?;

        Ok(CascadeResult {
            customer,
            records_removed,
        })
    }

    // ========================
    // Ledger operations
    // ========================

    /// Ship product to a customer: validates stock, appends a send record
    /// priced at quantity times unit price, and decrements the shelf.
    pub async fn send_product(
        &self,
        owner: OwnerId,
        customer_name: &str,
        product_name: &str,
        quantity: i64,
        unit_price: Option<Cents>,
        date: DateTime<Utc>,
    ) -> Result<SendResult, AppError> {
        let customer = self.get_customer(owner, customer_name).await?;
        let item = self.get_item(owner, product_name).await?;

        let remaining_stock = item.checked_deduct(quantity).map_err(|e| match e {
            StockError::InvalidQuantity { requested } => AppError::InvalidQuantity(requested),
            StockError::InsufficientStock {
                product,
                available,
                requested,
            } => AppError::InsufficientStock {
                product,
                available,
                requested,
            },
        })?;

        let unit_price = unit_price.unwrap_or(item.unit_price);
        if unit_price < 0 {
            return Err(AppError::InvalidAmount(
                "Unit price must not be negative".to_string(),
            ));
        }

        let mut record = TransactionRecord::send(
            customer.id,
            owner,
            item.id,
            item.product_name.clone(),
            quantity,
            unit_price,
            date,
        );
        self.repo.save_record(&mut record).await?;
        self.repo
            .update_item_quantity(owner, item.id, remaining_stock)
            .await?;

        let balance = self.refold_balance(owner, customer.id).await?;

        Ok(SendResult {
            record,
            customer_name: customer.name,
            remaining_stock,
            balance,
        })
    }

    /// Record a payment received from a customer.
    pub async fn receive_payment(
        &self,
        owner: OwnerId,
        customer_name: &str,
        amount: Cents,
        payment_method: PaymentMethod,
        date: DateTime<Utc>,
    ) -> Result<ReceiveResult, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Payment amount must be positive".to_string(),
            ));
        }

        let customer = self.get_customer(owner, customer_name).await?;

        let mut record =
            TransactionRecord::receive(customer.id, owner, amount, payment_method, date);
        self.repo.save_record(&mut record).await?;

        let balance = self.refold_balance(owner, customer.id).await?;

        Ok(ReceiveResult {
            record,
            customer_name: customer.name,
            balance,
        })
    }

    /// Current owed balance for one customer, derived from the full ledger.
    pub async fn customer_balance(
        &self,
        owner: OwnerId,
        name: &str,
    ) -> Result<BalanceEntry, AppError> {
        let customer = self.get_customer(owner, name).await?;
        let balance = self.refold_balance(owner, customer.id).await?;
        Ok(BalanceEntry { customer, balance })
    }

    /// Balances for every customer, from a single batched record fetch.
    pub async fn all_balances(&self, owner: OwnerId) -> Result<Vec<BalanceEntry>, AppError> {
        let customers = self.repo.list_customers(owner).await?;
        let records = self.repo.list_records_for_owner(owner).await?;
        debug!(
            "folding {} records across {} customers",
            records.len(),
            customers.len()
        );

        let mut by_customer: HashMap<CustomerId, Vec<TransactionRecord>> = HashMap::new();
        for record in records {
            by_customer.entry(record.customer_id).or_default().push(record);
        }

        Ok(customers
            .into_iter()
            .map(|customer| {
                let balance = by_customer
                    .get(&customer.id)
                    .map(|records| domain::current_balance(records))
                    .unwrap_or(0);
                BalanceEntry { customer, balance }
            })
            .collect())
    }

    /// Period-filtered statement with running balances, oldest first.
    pub async fn customer_statement(
        &self,
        owner: OwnerId,
        name: &str,
        period: Period,
        custom_from: Option<NaiveDate>,
        custom_to: Option<NaiveDate>,
    ) -> Result<Statement, AppError> {
        let customer = self.get_customer(owner, name).await?;
        let records = self.repo.list_records_for_customer(owner, customer.id).await?;

        let overall_balance = domain::current_balance(&records);
        let filtered =
            domain::filter_by_period(&records, period, custom_from, custom_to, Utc::now());
        let lines = domain::running_balance_series(&filtered);
        let closing_balance = lines.last().map(|line| line.balance_after).unwrap_or(0);

        Ok(Statement {
            customer,
            period,
            lines,
            closing_balance,
            overall_balance,
        })
    }

    /// Every ledger record the owner has, across all customers.
    pub async fn list_all_records(
        &self,
        owner: OwnerId,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        Ok(self.repo.list_records_for_owner(owner).await?)
    }

    /// Fetch the full current record set and fold it. The one and only way
    /// a balance is produced after a mutation.
    async fn refold_balance(
        &self,
        owner: OwnerId,
        customer_id: CustomerId,
    ) -> Result<Cents, AppError> {
        let records = self.repo.list_records_for_customer(owner, customer_id).await?;
        Ok(domain::current_balance(&records))
    }

    // ========================
    // Inventory operations
    // ========================

    pub async fn add_item(
        &self,
        owner: OwnerId,
        product_name: String,
        quantity: i64,
        unit_price: Cents,
    ) -> Result<InventoryItem, AppError> {
        if quantity < 0 {
            return Err(AppError::InvalidQuantity(quantity));
        }
        if unit_price < 0 {
            return Err(AppError::InvalidAmount(
                "Unit price must not be negative".to_string(),
            ));
        }
        if self
            .repo
            .get_item_by_name(owner, &product_name)
            .await?
            .is_some()
        {
            return Err(AppError::ItemAlreadyExists(product_name));
        }

        let item = InventoryItem::new(owner, product_name, quantity, unit_price);
        self.repo.save_item(&item).await?;
        Ok(item)
    }

    pub async fn get_item(
        &self,
        owner: OwnerId,
        product_name: &str,
    ) -> Result<InventoryItem, AppError> {
        self.repo
            .get_item_by_name(owner, product_name)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(product_name.to_string()))
    }

    pub async fn list_items(&self, owner: OwnerId) -> Result<Vec<InventoryItem>, AppError> {
        Ok(self.repo.list_items(owner).await?)
    }

    pub async fn update_item(
        &self,
        owner: OwnerId,
        product_name: &str,
        new_name: Option<String>,
        new_quantity: Option<i64>,
        new_price: Option<Cents>,
    ) -> Result<InventoryItem, AppError> {
        let mut item = self.get_item(owner, product_name).await?;

        if let Some(new_name) = new_name {
            if new_name != item.product_name
                && self.repo.get_item_by_name(owner, &new_name).await?.is_some()
            {
                return Err(AppError::ItemAlreadyExists(new_name));
            }
            item.product_name = new_name;
        }
        if let Some(quantity) = new_quantity {
            if quantity < 0 {
                return Err(AppError::InvalidQuantity(quantity));
            }
            item.quantity = quantity;
        }
        if let Some(price) = new_price {
            if price < 0 {
                return Err(AppError::InvalidAmount(
                    "Unit price must not be negative".to_string(),
                ));
            }
            item.unit_price = price;
        }

        self.repo.update_item(&item).await?;
        Ok(item)
    }

    /// Adjust stock up or down by a delta; the shelf can't go negative.
    pub async fn restock_item(
        &self,
        owner: OwnerId,
        product_name: &str,
        delta: i64,
    ) -> Result<InventoryItem, AppError> {
        let mut item = self.get_item(owner, product_name).await?;
        let quantity = item.quantity + delta;
        if quantity < 0 {
            return Err(AppError::InsufficientStock {
                product: item.product_name,
                available: item.quantity,
                requested: -delta,
            });
        }
        item.quantity = quantity;
        self.repo
            .update_item_quantity(owner, item.id, quantity)
            .await?;
        Ok(item)
    }

    /// Delete a product, leaving a trace in the deletion history.
    pub async fn delete_item(&self, owner: OwnerId, product_name: &str) -> Result<InventoryItem, AppError> {
        let item = self.get_item(owner, product_name).await?;

        let audit = AuditEntry::inventory_item(owner, item.product_name.clone());
        self.repo.save_audit_entry(&audit).await?;
        self.repo.delete_item(owner, item.id).await?;
        Ok(item)
    }

    pub async fn inventory_value(&self, owner: OwnerId) -> Result<Cents, AppError> {
        let items = self.repo.list_items(owner).await?;
        Ok(domain::total_stock_value(&items))
    }

    // ========================
    // Payroll operations
    // ========================

    pub async fn add_payroll_entry(
        &self,
        owner: OwnerId,
        employee_name: String,
        amount: Cents,
        kind: PayrollKind,
        description: Option<String>,
        entry_date: NaiveDate,
    ) -> Result<PayrollEntry, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Payroll amount must be positive".to_string(),
            ));
        }

        let mut entry = PayrollEntry::new(owner, employee_name, amount, kind, entry_date);
        if let Some(description) = description {
            entry = entry.with_description(description);
        }

        self.repo.save_payroll_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn list_payroll_entries(&self, owner: OwnerId) -> Result<Vec<PayrollEntry>, AppError> {
        Ok(self.repo.list_payroll_entries(owner).await?)
    }

    pub async fn delete_payroll_entry(&self, owner: OwnerId, id: PayrollId) -> Result<PayrollEntry, AppError> {
        let entry = self
            .repo
            .get_payroll_entry(owner, id)
            .await?
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))?;
        self.repo.delete_payroll_entry(owner, id).await?;
        Ok(entry)
    }

    /// Net payroll cost across all entries.
    pub async fn payroll_net(&self, owner: OwnerId) -> Result<Cents, AppError> {
        let entries = self.repo.list_payroll_entries(owner).await?;
        Ok(domain::net_total(&entries))
    }

    // ========================
    // Receivable / payable operations
    // ========================

    pub async fn add_account_entry(
        &self,
        owner: OwnerId,
        direction: AccountDirection,
        counterparty: String,
        amount: Cents,
        description: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<AccountEntry, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Account entry amount must be positive".to_string(),
            ));
        }

        let mut entry = AccountEntry::new(owner, direction, counterparty, amount);
        if let Some(description) = description {
            entry = entry.with_description(description);
        }
        if let Some(due_date) = due_date {
            entry = entry.with_due_date(due_date);
        }

        self.repo.save_account_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn list_account_entries(
        &self,
        owner: OwnerId,
        direction: AccountDirection,
    ) -> Result<Vec<AccountEntry>, AppError> {
        Ok(self.repo.list_account_entries(owner, direction).await?)
    }

    /// Mark an entry settled.
    pub async fn mark_account_paid(
        &self,
        owner: OwnerId,
        id: AccountEntryId,
    ) -> Result<AccountEntry, AppError> {
        let mut entry = self
            .repo
            .get_account_entry(owner, id)
            .await?
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))?;

        entry.status = EntryStatus::Paid;
        self.repo.update_account_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn delete_account_entry(
        &self,
        owner: OwnerId,
        id: AccountEntryId,
    ) -> Result<AccountEntry, AppError> {
        let entry = self
            .repo
            .get_account_entry(owner, id)
            .await?
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))?;
        self.repo.delete_account_entry(owner, id).await?;
        Ok(entry)
    }

    /// Sum of still-pending entries on one side of the book.
    pub async fn pending_total(
        &self,
        owner: OwnerId,
        direction: AccountDirection,
    ) -> Result<Cents, AppError> {
        let entries = self.repo.list_account_entries(owner, direction).await?;
        Ok(domain::pending_total(&entries, direction))
    }

    // ========================
    // Review operations
    // ========================

    pub async fn add_review(
        &self,
        owner: OwnerId,
        subject: String,
        content: Option<String>,
        rating: u8,
    ) -> Result<Review, AppError> {
        let mut review = Review::new(owner, subject, rating);
        if let Some(content) = content {
            review = review.with_content(content);
        }
        self.repo.save_review(&review).await?;
        Ok(review)
    }

    pub async fn list_reviews(&self, owner: OwnerId) -> Result<Vec<Review>, AppError> {
        Ok(self.repo.list_reviews(owner).await?)
    }

    pub async fn delete_review(&self, owner: OwnerId, id: ReviewId) -> Result<(), AppError> {
        self.repo.delete_review(owner, id).await?;
        Ok(())
    }

    // ========================
    // Audit trail operations
    // ========================

    /// Deletion history, most recent first.
    pub async fn deletion_history(&self, owner: OwnerId) -> Result<Vec<AuditEntry>, AppError> {
        Ok(self.repo.list_audit_entries(owner).await?)
    }

    pub async fn purge_history_entry(
        &self,
        owner: OwnerId,
        id: AuditEntryId,
    ) -> Result<(), AppError> {
        self.repo.delete_audit_entry(owner, id).await?;
        Ok(())
    }

    // ========================
    // Reporting
    // ========================

    /// Everything the dashboard shows, derived fresh.
    pub async fn dashboard_stats(&self, owner: OwnerId) -> Result<DashboardStats, AppError> {
        let customers = self.repo.list_customers(owner).await?;
        let items = self.repo.list_items(owner).await?;
        let payroll = self.repo.list_payroll_entries(owner).await?;
        let receivables = self
            .repo
            .list_account_entries(owner, AccountDirection::Receivable)
            .await?;
        let payables = self
            .repo
            .list_account_entries(owner, AccountDirection::Payable)
            .await?;
        let reviews = self.repo.list_reviews(owner).await?;

        let balances = self.all_balances(owner).await?;
        let customer_balances_total = balances.iter().map(|entry| entry.balance).sum();

        Ok(DashboardStats {
            customers_count: customers.len(),
            inventory_count: items.len(),
            inventory_value: domain::total_stock_value(&items),
            customer_balances_total,
            payroll_net: domain::net_total(&payroll),
            receivable_pending: domain::pending_total(&receivables, AccountDirection::Receivable),
            payable_pending: domain::pending_total(&payables, AccountDirection::Payable),
            receivable_entries: receivables.len(),
            payable_entries: payables.len(),
            average_rating: domain::average_rating(&reviews),
        })
    }
}
