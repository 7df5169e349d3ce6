use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, OwnerId};

pub type ItemId = Uuid;

/// A product held in stock. Quantity goes down when goods are sent to a
/// customer and is otherwise adjusted explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub owner_id: OwnerId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Cents,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn new(
        owner_id: OwnerId,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Cents,
    ) -> Self {
        assert!(quantity >= 0, "Stock quantity must not be negative");
        assert!(unit_price >= 0, "Unit price must not be negative");
        Self {
            id: Uuid::new_v4(),
            owner_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Value of the stock on hand at the current unit price.
    pub fn stock_value(&self) -> Cents {
        self.quantity * self.unit_price
    }

    /// Quantity left after removing `quantity` units, or an error when the
    /// shelf doesn't hold that many.
    pub fn checked_deduct(&self, quantity: i64) -> Result<i64, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity { requested: quantity });
        }
        if quantity > self.quantity {
            return Err(StockError::InsufficientStock {
                product: self.product_name.clone(),
                available: self.quantity,
                requested: quantity,
            });
        }
        Ok(self.quantity - quantity)
    }
}

/// Combined value of all stock on hand.
pub fn total_stock_value(items: &[InventoryItem]) -> Cents {
    items.iter().map(InventoryItem::stock_value).sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    InvalidQuantity {
        requested: i64,
    },
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },
}

impl std::fmt::Display for StockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockError::InvalidQuantity { requested } => {
                write!(f, "Quantity must be positive, got {}", requested)
            }
            StockError::InsufficientStock {
                product,
                available,
                requested,
            } => write!(
                f,
                "Not enough stock of {}: {} available, {} requested",
                product, available, requested
            ),
        }
    }
}

impl std::error::Error for StockError {}
