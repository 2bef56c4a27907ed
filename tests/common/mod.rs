// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use duit::application::LedgerService;
use duit::storage::CsvWorkbook;
use tempfile::TempDir;

/// Helper to create a test service over a temporary workbook
pub fn test_service() -> Result<(LedgerService<CsvWorkbook>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let workbook = CsvWorkbook::init(temp_dir.path().join("workbook"))?;
    Ok((LedgerService::new(workbook), temp_dir))
}

/// A second handle onto the same workbook, for writing raw rows that
/// bypass the service's validation (simulating legacy or corrupt data)
pub fn raw_workbook(temp_dir: &TempDir) -> Result<CsvWorkbook> {
    Ok(CsvWorkbook::open(temp_dir.path().join("workbook"))?)
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: one month of activity
pub struct JuneLedger;

impl JuneLedger {
    /// Record the standard June 2025 entries: one expense, one income
    pub async fn seed(service: &LedgerService<CsvWorkbook>) -> Result<()> {
        use duit::domain::Category;

        service
            .record_expense(parse_date("2025-06-01"), "Lunch", Category::Food, 1250)
            .await?;
        service
            .record_income(parse_date("2025-06-02"), "Salary", 300000)
            .await?;
        Ok(())
    }
}
