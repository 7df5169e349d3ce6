use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{AdminService, DashboardStats};
use crate::domain::{
    format_cents, parse_cents, AccountDirection, OwnerId, PayrollKind, PaymentMethod, Period,
    RecordKind,
};
use crate::io::Exporter;

/// Khata - Shop Administration Ledger
#[derive(Parser)]
#[command(name = "khata")]
#[command(about = "A local-first shop administration ledger: customers, stock, payroll, dues")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "khata.db")]
    pub database: String,

    /// Owner id scoping every operation (UUID)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Customer management commands
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Record product sent to a customer
    Send {
        /// Customer name
        customer: String,

        /// Product name (must exist in inventory)
        #[arg(short, long)]
        product: String,

        /// Number of units
        #[arg(short, long)]
        quantity: i64,

        /// Unit price override (e.g., "125.00"; defaults to the inventory price)
        #[arg(long)]
        price: Option<String>,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a payment received from a customer
    Receive {
        /// Customer name
        customer: String,

        /// Payment amount (e.g., "500.00" or "500")
        #[arg(short, long)]
        amount: String,

        /// Payment method: cash, jazzcash, easypaisa, bank
        #[arg(short, long)]
        method: String,

        /// Date of the payment (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the owed balance for one customer or all customers
    Balance {
        /// Customer name (omit for all customers)
        customer: Option<String>,
    },

    /// Show a customer's ledger statement with running balances
    Statement {
        /// Customer name
        customer: String,

        /// Reporting window: all, month, six-months, year, custom
        #[arg(short, long, default_value = "all")]
        period: String,

        /// Custom window start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Custom window end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Inventory management commands
    #[command(subcommand)]
    Inventory(InventoryCommands),

    /// Payroll management commands
    #[command(subcommand)]
    Payroll(PayrollCommands),

    /// Money owed to the shop
    #[command(subcommand)]
    Receivable(AccountCommands),

    /// Money the shop owes
    #[command(subcommand)]
    Payable(AccountCommands),

    /// Review management commands
    #[command(subcommand)]
    Review(ReviewCommands),

    /// Reports and analytics
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data to CSV or JSON
    Export {
        /// What to export: statement, balances, full
        export_type: String,

        /// Customer name (statement export only)
        #[arg(short, long)]
        customer: Option<String>,

        /// Reporting window for statements
        #[arg(short, long, default_value = "all")]
        period: String,

        /// Custom window start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Custom window end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Deletion history commands
    #[command(subcommand)]
    History(HistoryCommands),
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Add a new customer
    Add {
        /// Customer name (unique per owner)
        name: String,

        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,
    },

    /// List all customers
    List,

    /// Update a customer's name or phone
    Update {
        /// Current customer name
        name: String,

        /// New name
        #[arg(long)]
        new_name: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Delete a customer and every ledger record they own
    Delete {
        /// Customer name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Add a product to stock
    Add {
        /// Product name (unique per owner)
        name: String,

        /// Units on hand
        #[arg(short, long)]
        quantity: i64,

        /// Unit price (e.g., "125.00")
        #[arg(short, long)]
        price: String,
    },

    /// List stock with values
    List,

    /// Update a product's name, quantity or price
    Update {
        /// Current product name
        name: String,

        /// New name
        #[arg(long)]
        new_name: Option<String>,

        /// New quantity
        #[arg(short, long)]
        quantity: Option<i64>,

        /// New unit price
        #[arg(short, long)]
        price: Option<String>,
    },

    /// Adjust stock up or down by a delta
    Stock {
        /// Product name
        name: String,

        /// Signed change in units (e.g., 50 or -3)
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },

    /// Remove a product (leaves a trace in the deletion history)
    Delete {
        /// Product name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum PayrollCommands {
    /// Add a payroll entry
    Add {
        /// Employee name
        employee: String,

        /// Amount (e.g., "30000")
        #[arg(short, long)]
        amount: String,

        /// Entry kind: salary, bonus, deduction
        #[arg(short, long, default_value = "salary")]
        kind: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Pay period date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List payroll entries with the net total
    List,

    /// Delete a payroll entry
    Delete {
        /// Entry ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add an entry
    Add {
        /// Counterparty name
        counterparty: String,

        /// Amount (e.g., "1500.00")
        #[arg(short, long)]
        amount: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// List entries with the pending total
    List,

    /// Mark an entry paid
    Paid {
        /// Entry ID
        id: String,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Add a review
    Add {
        /// Subject
        subject: String,

        /// Rating 1-5
        #[arg(short, long, default_value = "5")]
        rating: u8,

        /// Review text
        #[arg(long)]
        content: Option<String>,
    },

    /// List reviews with the average rating
    List,

    /// Delete a review
    Delete {
        /// Review ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Everything the dashboard shows, in one place
    Dashboard {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List the deletion history, most recent first
    List,

    /// Remove a single history entry
    Purge {
        /// History entry ID
        id: String,
    },
}

impl Cli {
    fn owner_id(&self) -> Result<OwnerId> {
        let raw = self
            .owner
            .as_deref()
            .context("Missing --owner <UUID>; every command is scoped to one owner")?;
        Uuid::parse_str(raw).context("Invalid owner ID format (expected UUID)")
    }

    pub async fn run(self) -> Result<()> {
        match &self.command {
            Commands::Init => {
                AdminService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
                return Ok(());
            }
            _ => {}
        }

        let owner = self.owner_id()?;
        let service = AdminService::connect(&self.database).await?;

        match self.command {
            Commands::Init => unreachable!("handled above"),

            Commands::Customer(customer_cmd) => {
                run_customer_command(&service, owner, customer_cmd).await?;
            }

            Commands::Send {
                customer,
                product,
                quantity,
                price,
                date,
            } => {
                let unit_price = price
                    .map(|p| parse_cents(&p))
                    .transpose()
                    .context("Invalid price format. Use '125.00' or '125'")?;
                let timestamp = parse_record_date(date.as_deref())?;

                let result = service
                    .send_product(owner, &customer, &product, quantity, unit_price, timestamp)
                    .await?;

                println!(
                    "Sent {} x {} to {} for {} ({} left in stock)",
                    result.record.quantity.unwrap_or(0),
                    result.record.product_name.as_deref().unwrap_or("-"),
                    result.customer_name,
                    format_cents(result.record.amount.unwrap_or(0)),
                    result.remaining_stock
                );
                println!("Balance now: {}", format_cents(result.balance));
            }

            Commands::Receive {
                customer,
                amount,
                method,
                date,
            } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '500.00' or '500'")?;
                let payment_method = PaymentMethod::from_str(&method).with_context(|| {
                    format!(
                        "Unknown payment method '{}'. Use cash, jazzcash, easypaisa or bank",
                        method
                    )
                })?;
                let timestamp = parse_record_date(date.as_deref())?;

                let result = service
                    .receive_payment(owner, &customer, amount_cents, payment_method, timestamp)
                    .await?;

                println!(
                    "Received {} from {} via {}",
                    format_cents(result.record.amount.unwrap_or(0)),
                    result.customer_name,
                    payment_method
                );
                println!("Balance now: {}", format_cents(result.balance));
            }

            Commands::Balance { customer } => {
                run_balance_command(&service, owner, customer).await?;
            }

            Commands::Statement {
                customer,
                period,
                from,
                to,
            } => {
                let (period, custom_from, custom_to) =
                    parse_period_args(&period, from.as_deref(), to.as_deref())?;
                run_statement_command(&service, owner, &customer, period, custom_from, custom_to)
                    .await?;
            }

            Commands::Inventory(inventory_cmd) => {
                run_inventory_command(&service, owner, inventory_cmd).await?;
            }

            Commands::Payroll(payroll_cmd) => {
                run_payroll_command(&service, owner, payroll_cmd).await?;
            }

            Commands::Receivable(account_cmd) => {
                run_account_command(&service, owner, AccountDirection::Receivable, account_cmd)
                    .await?;
            }

            Commands::Payable(account_cmd) => {
                run_account_command(&service, owner, AccountDirection::Payable, account_cmd)
                    .await?;
            }

            Commands::Review(review_cmd) => {
                run_review_command(&service, owner, review_cmd).await?;
            }

            Commands::Report(report_cmd) => {
                run_report_command(&service, owner, report_cmd).await?;
            }

            Commands::Export {
                export_type,
                customer,
                period,
                from,
                to,
                output,
            } => {
                let (period, custom_from, custom_to) =
                    parse_period_args(&period, from.as_deref(), to.as_deref())?;
                run_export_command(
                    &service,
                    owner,
                    &export_type,
                    customer.as_deref(),
                    period,
                    custom_from,
                    custom_to,
                    output.as_deref(),
                )
                .await?;
            }

            Commands::History(history_cmd) => {
                run_history_command(&service, owner, history_cmd).await?;
            }
        }

        Ok(())
    }
}

/// Parse a YYYY-MM-DD argument.
fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date_str))
}

/// Ledger timestamps land at midday so the calendar day survives timezone
/// conversion in either direction.
fn parse_record_date(date_str: Option<&str>) -> Result<DateTime<Utc>> {
    match date_str {
        Some(raw) => {
            let date = parse_date(raw)?;
            Ok(date.and_hms_opt(12, 0, 0).unwrap().and_utc())
        }
        None => Ok(Utc::now()),
    }
}

fn parse_period_args(
    period: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Period, Option<NaiveDate>, Option<NaiveDate>)> {
    let period = Period::from_str(period).with_context(|| {
        format!(
            "Unknown period '{}'. Use all, month, six-months, year or custom",
            period
        )
    })?;
    let custom_from = from.map(parse_date).transpose()?;
    let custom_to = to.map(parse_date).transpose()?;
    Ok((period, custom_from, custom_to))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).context("Invalid ID format (expected UUID)")
}

async fn run_customer_command(
    service: &AdminService,
    owner: OwnerId,
    command: CustomerCommands,
) -> Result<()> {
    match command {
        CustomerCommands::Add { name, phone } => {
            let customer = service.add_customer(owner, name, phone).await?;
            println!("Added customer: {} ({})", customer.name, customer.id);
        }

        CustomerCommands::List => {
            let customers = service.list_customers(owner).await?;
            if customers.is_empty() {
                println!("No customers yet.");
                return Ok(());
            }
            println!("{:<30} {:<16} {}", "NAME", "PHONE", "ID");
            for customer in customers {
                println!(
                    "{:<30} {:<16} {}",
                    customer.name,
                    customer.phone.as_deref().unwrap_or("-"),
                    customer.id
                );
            }
        }

        CustomerCommands::Update {
            name,
            new_name,
            phone,
        } => {
            let customer = service
                .update_customer(owner, &name, new_name, phone)
                .await?;
            println!("Updated customer: {}", customer.name);
        }

        CustomerCommands::Delete { name } => {
            let result = service.delete_customer(owner, &name).await?;
            println!(
                "Deleted customer {} and {} ledger record(s)",
                result.customer.name, result.records_removed
            );
        }
    }
    Ok(())
}

async fn run_balance_command(
    service: &AdminService,
    owner: OwnerId,
    customer: Option<String>,
) -> Result<()> {
    match customer {
        Some(name) => {
            let entry = service.customer_balance(owner, &name).await?;
            println!(
                "{}: {} {}",
                entry.customer.name,
                format_cents(entry.balance),
                owed_tag(entry.balance)
            );
        }
        None => {
            let balances = service.all_balances(owner).await?;
            if balances.is_empty() {
                println!("No customers yet.");
                return Ok(());
            }
            let mut total = 0;
            println!("{:<30} {:>14}", "CUSTOMER", "BALANCE");
            for entry in &balances {
                println!(
                    "{:<30} {:>14}",
                    entry.customer.name,
                    format_cents(entry.balance)
                );
                total += entry.balance;
            }
            println!("{:<30} {:>14}", "TOTAL", format_cents(total));
        }
    }
    Ok(())
}

/// Positive means the customer owes the shop; the sign convention is fixed.
fn owed_tag(balance: i64) -> &'static str {
    if balance > 0 {
        "(owes you)"
    } else if balance < 0 {
        "(in credit)"
    } else {
        "(settled)"
    }
}

async fn run_statement_command(
    service: &AdminService,
    owner: OwnerId,
    customer: &str,
    period: Period,
    custom_from: Option<NaiveDate>,
    custom_to: Option<NaiveDate>,
) -> Result<()> {
    let statement = service
        .customer_statement(owner, customer, period, custom_from, custom_to)
        .await?;

    println!(
        "Statement for {} ({} record(s), period: {})",
        statement.customer.name,
        statement.lines.len(),
        statement.period
    );

    if statement.lines.is_empty() {
        println!("No records in this period.");
        return Ok(());
    }

    println!(
        "{:<12} {:<10} {:<28} {:<10} {:>12} {:>12}",
        "DATE", "TYPE", "DETAILS", "METHOD", "AMOUNT", "BALANCE"
    );

    // Newest first for reading; balances were computed oldest-first.
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
        let method = record
            .payment_method
            .map(|m| m.as_str())
            .unwrap_or("-");

        println!(
            "{:<12} {:<10} {:<28} {:<10} {:>12} {:>12}",
            date,
            record.kind.as_str(),
            details,
            method,
            record
                .amount
                .map(format_cents)
                .unwrap_or_else(|| "-".to_string()),
            format_cents(line.balance_after)
        );
    }

    println!(
        "Closing balance: {} {}",
        format_cents(statement.closing_balance),
        owed_tag(statement.closing_balance)
    );
    if statement.period != Period::All {
        println!(
            "Overall balance: {} {}",
            format_cents(statement.overall_balance),
            owed_tag(statement.overall_balance)
        );
    }
    Ok(())
}

async fn run_inventory_command(
    service: &AdminService,
    owner: OwnerId,
    command: InventoryCommands,
) -> Result<()> {
    match command {
        InventoryCommands::Add {
            name,
            quantity,
            price,
        } => {
            let unit_price =
                parse_cents(&price).context("Invalid price format. Use '125.00' or '125'")?;
            let item = service.add_item(owner, name, quantity, unit_price).await?;
            println!(
                "Added product: {} ({} units @ {})",
                item.product_name,
                item.quantity,
                format_cents(item.unit_price)
            );
        }

        InventoryCommands::List => {
            let items = service.list_items(owner).await?;
            if items.is_empty() {
                println!("No products in stock.");
                return Ok(());
            }
            println!(
                "{:<28} {:>8} {:>12} {:>14}",
                "PRODUCT", "UNITS", "PRICE", "VALUE"
            );
            let mut total = 0;
            for item in &items {
                println!(
                    "{:<28} {:>8} {:>12} {:>14}",
                    item.product_name,
                    item.quantity,
                    format_cents(item.unit_price),
                    format_cents(item.stock_value())
                );
                total += item.stock_value();
            }
            println!("{:<28} {:>8} {:>12} {:>14}", "TOTAL", "", "", format_cents(total));
        }

        InventoryCommands::Update {
            name,
            new_name,
            quantity,
            price,
        } => {
            let new_price = price
                .map(|p| parse_cents(&p))
                .transpose()
                .context("Invalid price format")?;
            let item = service
                .update_item(owner, &name, new_name, quantity, new_price)
                .await?;
            println!(
                "Updated product: {} ({} units @ {})",
                item.product_name,
                item.quantity,
                format_cents(item.unit_price)
            );
        }

        InventoryCommands::Stock { name, delta } => {
            let item = service.restock_item(owner, &name, delta).await?;
            println!("{}: {} units on hand", item.product_name, item.quantity);
        }

        InventoryCommands::Delete { name } => {
            let item = service.delete_item(owner, &name).await?;
            println!("Deleted product: {}", item.product_name);
        }
    }
    Ok(())
}

async fn run_payroll_command(
    service: &AdminService,
    owner: OwnerId,
    command: PayrollCommands,
) -> Result<()> {
    match command {
        PayrollCommands::Add {
            employee,
            amount,
            kind,
            description,
            date,
        } => {
            let amount_cents = parse_cents(&amount).context("Invalid amount format")?;
            let kind = PayrollKind::from_str(&kind).with_context(|| {
                format!("Unknown kind '{}'. Use salary, bonus or deduction", kind)
            })?;
            let entry_date = match date {
                Some(raw) => parse_date(&raw)?,
                None => Utc::now().date_naive(),
            };

            let entry = service
                .add_payroll_entry(owner, employee, amount_cents, kind, description, entry_date)
                .await?;
            println!(
                "Added {} of {} for {} ({})",
                entry.kind,
                format_cents(entry.amount),
                entry.employee_name,
                entry.entry_date
            );
        }

        PayrollCommands::List => {
            let entries = service.list_payroll_entries(owner).await?;
            if entries.is_empty() {
                println!("No payroll entries.");
                return Ok(());
            }
            println!(
                "{:<20} {:<10} {:>12} {:<12} {}",
                "EMPLOYEE", "KIND", "AMOUNT", "DATE", "ID"
            );
            for entry in &entries {
                println!(
                    "{:<20} {:<10} {:>12} {:<12} {}",
                    entry.employee_name,
                    entry.kind.as_str(),
                    format_cents(entry.amount),
                    entry.entry_date,
                    entry.id
                );
            }
            let net = service.payroll_net(owner).await?;
            println!("Net payroll: {}", format_cents(net));
        }

        PayrollCommands::Delete { id } => {
            let entry = service.delete_payroll_entry(owner, parse_id(&id)?).await?;
            println!(
                "Deleted {} of {} for {}",
                entry.kind,
                format_cents(entry.amount),
                entry.employee_name
            );
        }
    }
    Ok(())
}

async fn run_account_command(
    service: &AdminService,
    owner: OwnerId,
    direction: AccountDirection,
    command: AccountCommands,
) -> Result<()> {
    match command {
        AccountCommands::Add {
            counterparty,
            amount,
            description,
            due,
        } => {
            let amount_cents = parse_cents(&amount).context("Invalid amount format")?;
            let due_date = due.map(|raw| parse_date(&raw)).transpose()?;

            let entry = service
                .add_account_entry(
                    owner,
                    direction,
                    counterparty,
                    amount_cents,
                    description,
                    due_date,
                )
                .await?;
            println!(
                "Added {}: {} {} ({})",
                direction,
                entry.counterparty,
                format_cents(entry.amount),
                entry.id
            );
        }

        AccountCommands::List => {
            let entries = service.list_account_entries(owner, direction).await?;
            if entries.is_empty() {
                println!("No {} entries.", direction);
                return Ok(());
            }
            println!(
                "{:<24} {:>12} {:<12} {:<8} {}",
                "COUNTERPARTY", "AMOUNT", "DUE", "STATUS", "ID"
            );
            for entry in &entries {
                println!(
                    "{:<24} {:>12} {:<12} {:<8} {}",
                    entry.counterparty,
                    format_cents(entry.amount),
                    entry
                        .due_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    entry.status.as_str(),
                    entry.id
                );
            }
            let pending = service.pending_total(owner, direction).await?;
            println!("Pending total: {}", format_cents(pending));
        }

        AccountCommands::Paid { id } => {
            let entry = service.mark_account_paid(owner, parse_id(&id)?).await?;
            println!(
                "Marked paid: {} {}",
                entry.counterparty,
                format_cents(entry.amount)
            );
        }

        AccountCommands::Delete { id } => {
            let entry = service.delete_account_entry(owner, parse_id(&id)?).await?;
            println!(
                "Deleted {}: {} {}",
                direction,
                entry.counterparty,
                format_cents(entry.amount)
            );
        }
    }
    Ok(())
}

async fn run_review_command(
    service: &AdminService,
    owner: OwnerId,
    command: ReviewCommands,
) -> Result<()> {
    match command {
        ReviewCommands::Add {
            subject,
            rating,
            content,
        } => {
            let review = service.add_review(owner, subject, content, rating).await?;
            println!("Added review: {} ({}/5)", review.subject, review.rating);
        }

        ReviewCommands::List => {
            let reviews = service.list_reviews(owner).await?;
            if reviews.is_empty() {
                println!("No reviews.");
                return Ok(());
            }
            for review in &reviews {
                println!(
                    "[{}/5] {} - {} ({})",
                    review.rating,
                    review.subject,
                    review.content.as_deref().unwrap_or("-"),
                    review.id
                );
            }
            if let Some(average) = crate::domain::average_rating(&reviews) {
                println!("Average rating: {:.1}/5", average);
            }
        }

        ReviewCommands::Delete { id } => {
            service.delete_review(owner, parse_id(&id)?).await?;
            println!("Deleted review");
        }
    }
    Ok(())
}

async fn run_report_command(
    service: &AdminService,
    owner: OwnerId,
    command: ReportCommands,
) -> Result<()> {
    match command {
        ReportCommands::Dashboard { format } => {
            let stats = service.dashboard_stats(owner).await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => print_dashboard(&stats),
            }
        }
    }
    Ok(())
}

fn print_dashboard(stats: &DashboardStats) {
    println!("Customers:          {}", stats.customers_count);
    println!(
        "Customer balances:  {}",
        format_cents(stats.customer_balances_total)
    );
    println!("Products:           {}", stats.inventory_count);
    println!("Stock value:        {}", format_cents(stats.inventory_value));
    println!("Net payroll:        {}", format_cents(stats.payroll_net));
    println!(
        "Receivable pending: {} ({} entries)",
        format_cents(stats.receivable_pending),
        stats.receivable_entries
    );
    println!(
        "Payable pending:    {} ({} entries)",
        format_cents(stats.payable_pending),
        stats.payable_entries
    );
    match stats.average_rating {
        Some(average) => println!("Average rating:     {:.1}/5", average),
        None => println!("Average rating:     -"),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_export_command(
    service: &AdminService,
    owner: OwnerId,
    export_type: &str,
    customer: Option<&str>,
    period: Period,
    custom_from: Option<NaiveDate>,
    custom_to: Option<NaiveDate>,
    output: Option<&str>,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let mut writer: Box<dyn std::io::Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    match export_type {
        "statement" => {
            let customer =
                customer.context("statement export needs --customer <NAME>")?;
            let count = exporter
                .export_statement_csv(owner, customer, period, custom_from, custom_to, &mut writer)
                .await?;
            eprintln!("Exported {} statement row(s)", count);
        }
        "balances" => {
            let count = exporter.export_balances_csv(owner, &mut writer).await?;
            eprintln!("Exported {} balance row(s)", count);
        }
        "full" => {
            let snapshot = exporter.export_full_json(owner, &mut writer).await?;
            eprintln!(
                "Exported {} customer(s), {} record(s)",
                snapshot.customers.len(),
                snapshot.records.len()
            );
        }
        other => {
            anyhow::bail!(
                "Unknown export type '{}'. Use statement, balances or full",
                other
            );
        }
    }
    Ok(())
}

async fn run_history_command(
    service: &AdminService,
    owner: OwnerId,
    command: HistoryCommands,
) -> Result<()> {
    match command {
        HistoryCommands::List => {
            let entries = service.deletion_history(owner).await?;
            if entries.is_empty() {
                println!("Deletion history is empty.");
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{} {} \"{}\" ({} record(s)) ({})",
                    entry.deleted_at.format("%Y-%m-%d %H:%M"),
                    entry.action,
                    entry.detail,
                    entry.record_count,
                    entry.id
                );
            }
        }

        HistoryCommands::Purge { id } => {
            service.purge_history_entry(owner, parse_id(&id)?).await?;
            println!("Purged history entry");
        }
    }
    Ok(())
}
