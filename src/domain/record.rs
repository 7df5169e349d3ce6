use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type RecordId = Uuid;
pub type CustomerId = Uuid;
pub type OwnerId = Uuid;

/// What a ledger record represents. Historical data may carry kinds this
/// build does not know about; those are kept verbatim and contribute
/// nothing to balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Goods shipped to the customer; increases what they owe.
    Send,
    /// Payment received from the customer; decreases what they owe.
    Receive,
    #[serde(untagged)]
    Other(String),
}

impl RecordKind {
    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::Send => "send",
            RecordKind::Receive => "receive",
            RecordKind::Other(raw) => raw,
        }
    }

    /// Never fails: anything that isn't send/receive is preserved as-is.
    pub fn parse(s: &str) -> Self {
        match s {
            "send" => RecordKind::Send,
            "receive" => RecordKind::Receive,
            other => RecordKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    JazzCash,
    EasyPaisa,
    Bank,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::JazzCash => "jazzcash",
            PaymentMethod::EasyPaisa => "easypaisa",
            PaymentMethod::Bank => "bank",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "jazzcash" => Some(PaymentMethod::JazzCash),
            "easypaisa" => Some(PaymentMethod::EasyPaisa),
            "bank" => Some(PaymentMethod::Bank),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry in a customer's ledger.
/// Records are immutable once written - they are never updated, and removed
/// only as part of deleting the whole customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: RecordId,
    /// Monotonically increasing, assigned by the repository. Stable
    /// tie-break key when two records share a timestamp.
    pub sequence: i64,
    pub customer_id: CustomerId,
    pub owner_id: OwnerId,
    pub kind: RecordKind,
    /// None when the stored value was missing or non-numeric; such records
    /// contribute zero to every balance.
    pub amount: Option<Cents>,
    /// Supplied by the caller and may be back-dated. None when the stored
    /// value was unparsable; such records never match a period filter.
    pub created_at: Option<DateTime<Utc>>,
    /// When this record was written to the ledger.
    pub recorded_at: DateTime<Utc>,
    /// Receive records only.
    pub payment_method: Option<PaymentMethod>,
    /// Send records only.
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Cents>,
}

impl TransactionRecord {
    /// Create a send record for goods shipped. The amount is quantity times
    /// unit price, fixed at creation.
    pub fn send(
        customer_id: CustomerId,
        owner_id: OwnerId,
        product_id: Uuid,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Cents,
        created_at: DateTime<Utc>,
    ) -> Self {
        assert!(quantity > 0, "Send quantity must be positive");
        assert!(unit_price >= 0, "Unit price must not be negative");
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by repository
            customer_id,
            owner_id,
            kind: RecordKind::Send,
            amount: Some(quantity * unit_price),
            created_at: Some(created_at),
            recorded_at: Utc::now(),
            payment_method: None,
            product_id: Some(product_id),
            product_name: Some(product_name.into()),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
        }
    }

    /// Create a receive record for a payment taken in.
    pub fn receive(
        customer_id: CustomerId,
        owner_id: OwnerId,
        amount: Cents,
        payment_method: PaymentMethod,
        created_at: DateTime<Utc>,
    ) -> Self {
        assert!(amount > 0, "Payment amount must be positive");
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by repository
            customer_id,
            owner_id,
            kind: RecordKind::Receive,
            amount: Some(amount),
            created_at: Some(created_at),
            recorded_at: Utc::now(),
            payment_method: Some(payment_method),
            product_id: None,
            product_name: None,
            quantity: None,
            unit_price: None,
        }
    }

    /// Contribution of this record to the customer's owed balance.
    /// Send adds, receive subtracts, anything else counts zero, as does a
    /// missing amount.
    pub fn signed_amount(&self) -> Cents {
        let amount = self.amount.unwrap_or(0);
        match self.kind {
            RecordKind::Send => amount,
            RecordKind::Receive => -amount,
            RecordKind::Other(_) => 0,
        }
    }
}
