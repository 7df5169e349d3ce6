use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Customer already exists: {0}")]
    CustomerAlreadyExists(String),

    #[error("Product not found: {0}")]
    ItemNotFound(String),

    #[error("Product already exists: {0}")]
    ItemAlreadyExists(String),

    #[error("Not enough stock of {product}: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
