use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, OwnerId};

pub type AccountEntryId = Uuid;

/// Which side of the book an entry sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountDirection {
    /// Money owed to the shop.
    Receivable,
    /// Money the shop owes.
    Payable,
}

impl AccountDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountDirection::Receivable => "receivable",
            AccountDirection::Payable => "payable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "receivable" => Some(AccountDirection::Receivable),
            "payable" => Some(AccountDirection::Payable),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Paid,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(EntryStatus::Pending),
            "paid" => Some(EntryStatus::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A receivable or payable tracked outside the customer ledgers - supplier
/// invoices, utility bills, one-off dues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEntry {
    pub id: AccountEntryId,
    pub owner_id: OwnerId,
    pub direction: AccountDirection,
    pub counterparty: String,
    pub amount: Cents,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

impl AccountEntry {
    pub fn new(
        owner_id: OwnerId,
        direction: AccountDirection,
        counterparty: impl Into<String>,
        amount: Cents,
    ) -> Self {
        assert!(amount > 0, "Account entry amount must be positive");
        Self {
            id: Uuid::new_v4(),
            owner_id,
            direction,
            counterparty: counterparty.into(),
            amount,
            description: None,
            due_date: None,
            status: EntryStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }
}

/// Sum of still-pending entries on one side of the book.
pub fn pending_total(entries: &[AccountEntry], direction: AccountDirection) -> Cents {
    entries
        .iter()
        .filter(|entry| entry.direction == direction && entry.is_pending())
        .map(|entry| entry.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [EntryStatus::Pending, EntryStatus::Paid] {
            assert_eq!(EntryStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(EntryStatus::from_str("overdue"), None);
    }

    #[test]
    fn test_direction_roundtrip() {
        for direction in [AccountDirection::Receivable, AccountDirection::Payable] {
            assert_eq!(AccountDirection::from_str(direction.as_str()), Some(direction));
        }
    }

    #[test]
    fn test_pending_total_filters_direction_and_status() {
        let owner = Uuid::new_v4();
        let mut paid =
            AccountEntry::new(owner, AccountDirection::Receivable, "Hamza & Sons", 400_00);
        paid.status = EntryStatus::Paid;
        let entries = vec![
            AccountEntry::new(owner, AccountDirection::Receivable, "Hamza & Sons", 1_500_00),
            AccountEntry::new(owner, AccountDirection::Payable, "City Suppliers", 900_00),
            paid,
        ];
        assert_eq!(pending_total(&entries, AccountDirection::Receivable), 1_500_00);
        assert_eq!(pending_total(&entries, AccountDirection::Payable), 900_00);
    }
}
