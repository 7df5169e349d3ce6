use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, OwnerId};

pub type PayrollId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollKind {
    Salary,
    Bonus,
    /// Counts negative in the net total.
    Deduction,
}

impl PayrollKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollKind::Salary => "salary",
            PayrollKind::Bonus => "bonus",
            PayrollKind::Deduction => "deduction",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "salary" => Some(PayrollKind::Salary),
            "bonus" => Some(PayrollKind::Bonus),
            "deduction" => Some(PayrollKind::Deduction),
            _ => None,
        }
    }
}

impl std::fmt::Display for PayrollKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub id: PayrollId,
    pub owner_id: OwnerId,
    pub employee_name: String,
    pub amount: Cents,
    pub kind: PayrollKind,
    pub description: Option<String>,
    /// The pay period day this entry applies to, not the insertion time.
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl PayrollEntry {
    pub fn new(
        owner_id: OwnerId,
        employee_name: impl Into<String>,
        amount: Cents,
        kind: PayrollKind,
        entry_date: NaiveDate,
    ) -> Self {
        assert!(amount > 0, "Payroll amount must be positive");
        Self {
            id: Uuid::new_v4(),
            owner_id,
            employee_name: employee_name.into(),
            amount,
            kind,
            description: None,
            entry_date,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            PayrollKind::Deduction => -self.amount,
            _ => self.amount,
        }
    }
}

/// Net payroll cost: salaries and bonuses minus deductions.
pub fn net_total(entries: &[PayrollEntry]) -> Cents {
    entries.iter().map(PayrollEntry::signed_amount).sum()
}
