use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OwnerId;

pub type AuditEntryId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A customer was removed together with every ledger record.
    CustomerCascade,
    /// An inventory item was removed.
    InventoryItem,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CustomerCascade => "customer_cascade",
            AuditAction::InventoryItem => "inventory_item",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "customer_cascade" => Some(AuditAction::CustomerCascade),
            "inventory_item" => Some(AuditAction::InventoryItem),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deletion history entry. Written BEFORE the destructive operation runs, so
/// the trail survives even a partial failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub owner_id: OwnerId,
    pub action: AuditAction,
    /// What was deleted, named for a human reading the history later.
    pub detail: String,
    /// How many ledger records went with it (0 for single-row deletes).
    pub record_count: i64,
    pub deleted_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn customer_cascade(
        owner_id: OwnerId,
        customer_name: impl Into<String>,
        record_count: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            action: AuditAction::CustomerCascade,
            detail: customer_name.into(),
            record_count,
            deleted_at: Utc::now(),
        }
    }

    pub fn inventory_item(owner_id: OwnerId, product_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            action: AuditAction::InventoryItem,
            detail: product_name.into(),
            record_count: 0,
            deleted_at: Utc::now(),
        }
    }
}
