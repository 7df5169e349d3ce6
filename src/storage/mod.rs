mod repository;

pub use repository::*;

/// SQL migration for the core ledger schema
pub const MIGRATION_001_CORE: &str = include_str!("migrations/001_core.sql");

/// SQL migration for shop operations (inventory, payroll, accounts, reviews)
pub const MIGRATION_002_OPERATIONS: &str = include_str!("migrations/002_operations.sql");
