// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use khata::application::AdminService;
use khata::domain::OwnerId;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper to create a test service with a temporary database and a fresh
/// owner id.
pub async fn test_service() -> Result<(AdminService, OwnerId, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = AdminService::init(db_path.to_str().unwrap()).await?;
    Ok((service, Uuid::new_v4(), temp_dir))
}

/// Helper to parse a date string into DateTime<Utc> at midday.
pub fn record_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

/// Helper to parse a plain calendar date.
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: a shop with two customers and two stocked products.
pub struct StandardShop;

impl StandardShop {
    pub async fn create(service: &AdminService, owner: OwnerId) -> Result<()> {
        service
            .add_customer(owner, "Akram Traders".into(), Some("0300-1234567".into()))
            .await?;
        service
            .add_customer(owner, "Bismillah Store".into(), None)
            .await?;
        service
            .add_item(owner, "Cement bag".into(), 100, 1250_00)
            .await?;
        service
            .add_item(owner, "Steel rod".into(), 500, 300_00)
            .await?;
        Ok(())
    }
}
