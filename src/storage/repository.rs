use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::application::AppError;
use crate::domain::{
    Category, Cents, ExpenseTransaction, IncomeTransaction, TransactionKind, format_cents,
    parse_cents,
};

use super::{RawSheet, RowStore, SheetAdapter};

/// Owns all reads and writes of the two transaction sequences. The only
/// component allowed to mutate the backing store.
#[derive(Debug)]
pub struct TransactionRepository<S> {
    adapter: SheetAdapter<S>,
}

impl<S: RowStore> TransactionRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            adapter: SheetAdapter::new(store),
        }
    }

    /// Load both sequences in physical row order. Positions within the
    /// returned vectors are the logical indices delete operates on.
    pub async fn load_all(
        &self,
    ) -> Result<(Vec<ExpenseTransaction>, Vec<IncomeTransaction>), AppError> {
        Ok((self.load_expenses().await?, self.load_incomes().await?))
    }

    pub async fn load_expenses(&self) -> Result<Vec<ExpenseTransaction>, AppError> {
        let kind = TransactionKind::Expense;
        let sheet = self.adapter.read_all(kind).await?;
        let Some(columns) = SheetColumns::resolve(kind, &sheet) else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(sheet.len());
        for row in 0..sheet.len() {
            let raw_category = sheet.cell(row, columns.category.unwrap_or(usize::MAX));
            let category = Category::from_str(raw_category).ok_or_else(|| {
                AppError::DataIntegrity {
                    sheet: kind.sheet_name().to_string(),
                    position: row,
                    reason: format!("unknown category '{raw_category}'"),
                }
            })?;

            entries.push(ExpenseTransaction {
                date: parse_date_lenient(kind, row, sheet.cell(row, columns.date)),
                description: sheet.cell(row, columns.description.unwrap_or(usize::MAX)).to_string(),
                category,
                amount_cents: parse_amount_strict(kind, row, sheet.cell(row, columns.amount))?,
            });
        }
        Ok(entries)
    }

    pub async fn load_incomes(&self) -> Result<Vec<IncomeTransaction>, AppError> {
        let kind = TransactionKind::Income;
        let sheet = self.adapter.read_all(kind).await?;
        let Some(columns) = SheetColumns::resolve(kind, &sheet) else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(sheet.len());
        for row in 0..sheet.len() {
            entries.push(IncomeTransaction {
                date: parse_date_lenient(kind, row, sheet.cell(row, columns.date)),
                source: sheet.cell(row, columns.description.unwrap_or(usize::MAX)).to_string(),
                amount_cents: parse_amount_strict(kind, row, sheet.cell(row, columns.amount))?,
            });
        }
        Ok(entries)
    }

    /// Physical data-row count of a kind's sheet. This counts every stored
    /// row, parsable or not, because positions are physical.
    pub async fn count(&self, kind: TransactionKind) -> Result<usize, AppError> {
        Ok(self.adapter.read_all(kind).await?.len())
    }

    /// Validate and persist a new income entry. No I/O happens when
    /// validation fails.
    pub async fn append_income(&self, entry: &IncomeTransaction) -> Result<(), AppError> {
        entry.validate()?;
        let cells = vec![
            date_cell(entry.date),
            entry.source.clone(),
            format_cents(entry.amount_cents),
        ];
        Ok(self.adapter.append(TransactionKind::Income, &cells).await?)
    }

    /// Validate and persist a new expense entry. No I/O happens when
    /// validation fails.
    pub async fn append_expense(&self, entry: &ExpenseTransaction) -> Result<(), AppError> {
        entry.validate()?;
        let cells = vec![
            date_cell(entry.date),
            entry.description.clone(),
            entry.category.as_str().to_string(),
            format_cents(entry.amount_cents),
        ];
        Ok(self.adapter.append(TransactionKind::Expense, &cells).await?)
    }

    /// Delete the entry at `logical_index`, range-checked against a fresh
    /// count before any store mutation. Every later entry shifts up by one,
    /// so callers must reload before trusting any further index.
    pub async fn delete_at(
        &self,
        kind: TransactionKind,
        logical_index: usize,
    ) -> Result<(), AppError> {
        let count = self.count(kind).await?;
        if logical_index >= count {
            return Err(AppError::IndexOutOfRange {
                index: logical_index,
                count,
            });
        }
        Ok(self.adapter.delete_at(kind, logical_index).await?)
    }
}

/// Resolved column indices for one sheet. `None` as a whole means the sheet
/// has no usable schema (no `Date` column) and reads as empty.
struct SheetColumns {
    date: usize,
    description: Option<usize>,
    category: Option<usize>,
    amount: usize,
}

impl SheetColumns {
    fn resolve(kind: TransactionKind, sheet: &RawSheet) -> Option<Self> {
        let date = sheet.column("Date")?;
        // A missing Amount column resolves to an out-of-range index: every
        // cell then reads as empty and fails the integrity check below.
        let amount = sheet.column("Amount").unwrap_or(usize::MAX);
        let description = match kind {
            TransactionKind::Income => sheet.column("Source"),
            TransactionKind::Expense => sheet.column("Description"),
        };
        let category = sheet.column("Category");
        Some(Self {
            date,
            description,
            category,
            amount,
        })
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Lenient date parsing for stored rows: accepted formats are plain dates,
/// datetime cells, and day-first dates. Anything else is the "no date"
/// sentinel, never an error.
fn parse_date_lenient(kind: TransactionKind, row: usize, raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok();
    if parsed.is_none() {
        warn!(
            sheet = kind.sheet_name(),
            row, raw, "unparsable date, entry excluded from period views"
        );
    }
    parsed
}

/// Strict amount parsing for stored rows: money totals never silently
/// absorb bad data, so non-numeric and negative cells are hard errors.
fn parse_amount_strict(kind: TransactionKind, row: usize, raw: &str) -> Result<Cents, AppError> {
    let integrity_error = |reason: String| AppError::DataIntegrity {
        sheet: kind.sheet_name().to_string(),
        position: row,
        reason,
    };
    match parse_cents(raw.trim()) {
        Ok(cents) if cents >= 0 => Ok(cents),
        Ok(cents) => Err(integrity_error(format!(
            "negative amount {}",
            format_cents(cents)
        ))),
        Err(_) => Err(integrity_error(format!("non-numeric amount '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{MemoryStore, RowStore};

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn seed_income(store: &MemoryStore, rows: &[&[&str]]) {
        store
            .create_sheet("Income", &["Date", "Source", "Amount"])
            .await
            .unwrap();
        for row in rows {
            store.append_row("Income", &cells(row)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_from_empty_store_is_empty() {
        let repo = TransactionRepository::new(MemoryStore::new());
        let (expenses, incomes) = repo.load_all().await.unwrap();
        assert!(expenses.is_empty());
        assert!(incomes.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_load_round_trip() {
        let repo = TransactionRepository::new(MemoryStore::new());
        let entry =
            ExpenseTransaction::new(date("2025-06-01"), "Lunch", Category::Food, 1250).unwrap();
        repo.append_expense(&entry).await.unwrap();

        let (expenses, _) = repo.load_all().await.unwrap();
        assert_eq!(expenses, vec![entry]);
    }

    #[tokio::test]
    async fn test_append_rejects_invalid_before_io() {
        let repo = TransactionRepository::new(MemoryStore::unreachable());
        let entry = IncomeTransaction {
            date: Some(date("2025-06-02")),
            source: "Salary".into(),
            amount_cents: -1,
        };

        // The unreachable store proves validation fires before any I/O.
        let err = repo.append_income(&entry).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_negative_stored_amount_is_data_integrity() {
        let store = MemoryStore::new();
        seed_income(&store, &[&["2025-06-02", "Salary", "-5"]]).await;

        let repo = TransactionRepository::new(store);
        let err = repo.load_incomes().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::DataIntegrity { position: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_non_numeric_stored_amount_is_data_integrity() {
        let store = MemoryStore::new();
        seed_income(&store, &[&["2025-06-02", "Salary", "lots"]]).await;

        let repo = TransactionRepository::new(store);
        assert!(matches!(
            repo.load_incomes().await.unwrap_err(),
            AppError::DataIntegrity { .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_stored_category_is_data_integrity() {
        let store = MemoryStore::new();
        store
            .create_sheet("Expenses", &["Date", "Description", "Category", "Amount"])
            .await
            .unwrap();
        store
            .append_row("Expenses", &cells(&["2025-06-01", "Lunch", "Snacks", "12.50"]))
            .await
            .unwrap();

        let repo = TransactionRepository::new(store);
        assert!(matches!(
            repo.load_expenses().await.unwrap_err(),
            AppError::DataIntegrity { .. }
        ));
    }

    #[tokio::test]
    async fn test_unparsable_date_is_sentinel_not_error() {
        let store = MemoryStore::new();
        seed_income(
            &store,
            &[&["not a date", "Salary", "10.00"], &["2025-06-02", "Bonus", "5.00"]],
        )
        .await;

        let repo = TransactionRepository::new(store);
        let incomes = repo.load_incomes().await.unwrap();
        assert_eq!(incomes.len(), 2);
        assert_eq!(incomes[0].date, None);
        assert_eq!(incomes[1].date, Some(date("2025-06-02")));
    }

    #[tokio::test]
    async fn test_datetime_cells_parse_to_dates() {
        let store = MemoryStore::new();
        seed_income(&store, &[&["2025-06-02 00:00:00", "Salary", "10.00"]]).await;

        let repo = TransactionRepository::new(store);
        let incomes = repo.load_incomes().await.unwrap();
        assert_eq!(incomes[0].date, Some(date("2025-06-02")));
    }

    #[tokio::test]
    async fn test_sheet_without_date_column_reads_empty() {
        let store = MemoryStore::new();
        store.create_sheet("Income", &["Who", "HowMuch"]).await.unwrap();
        store.append_row("Income", &cells(&["Salary", "10.00"])).await.unwrap();

        let repo = TransactionRepository::new(store);
        assert!(repo.load_incomes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_out_of_range_does_no_io() {
        let store = MemoryStore::new();
        seed_income(
            &store,
            &[&["2025-06-01", "a", "1.00"], &["2025-06-02", "b", "2.00"]],
        )
        .await;

        let repo = TransactionRepository::new(store);
        let err = repo.delete_at(TransactionKind::Income, 5).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::IndexOutOfRange { index: 5, count: 2 }
        ));

        // Nothing was deleted
        assert_eq!(repo.count(TransactionKind::Income).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_shifts_positions() {
        let store = MemoryStore::new();
        seed_income(
            &store,
            &[
                &["2025-06-01", "a", "1.00"],
                &["2025-06-02", "b", "2.00"],
                &["2025-06-03", "c", "3.00"],
            ],
        )
        .await;

        let repo = TransactionRepository::new(store);
        repo.delete_at(TransactionKind::Income, 1).await.unwrap();

        let incomes = repo.load_incomes().await.unwrap();
        let sources: Vec<_> = incomes.iter().map(|t| t.source.as_str()).collect();
        assert_eq!(sources, vec!["a", "c"]);
    }
}
