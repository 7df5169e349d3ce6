use serde::Serialize;

use crate::domain::Cents;

/// The numbers the dashboard shows at a glance. Every figure is derived
/// fresh from the current data; nothing here is cached or stored.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub customers_count: usize,
    pub inventory_count: usize,
    /// Value of all stock on hand at current unit prices.
    pub inventory_value: Cents,
    /// Sum of every customer's owed balance, from one batched ledger fetch.
    pub customer_balances_total: Cents,
    /// Salaries and bonuses minus deductions.
    pub payroll_net: Cents,
    pub receivable_pending: Cents,
    pub payable_pending: Cents,
    pub receivable_entries: usize,
    pub payable_entries: usize,
    pub average_rating: Option<f64>,
}
