use chrono::NaiveDate;

use crate::domain::{
    Category, Cents, ExpenseTransaction, Granularity, IncomeTransaction, Period, TransactionKind,
    all_dates, derive_periods, filter_by_period, sort_recent_first, summarize,
};
use crate::storage::{RowStore, TransactionRepository};

use super::{AppError, PeriodView};

/// External collaborator that can suggest an amount from a receipt image.
/// The service never depends on one being wired in.
pub trait AmountScanner {
    fn suggest_amount(&self, image: &[u8]) -> Option<Cents>;
}

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, exporters, UI).
///
/// Positions returned or accepted here are only valid against the store
/// state they were read from: every mutation shifts later positions, so
/// callers must re-derive them from a fresh [`transactions`] call.
///
/// [`transactions`]: LedgerService::transactions
pub struct LedgerService<S> {
    repo: TransactionRepository<S>,
    scanner: Option<Box<dyn AmountScanner + Send + Sync>>,
}

impl<S: RowStore> LedgerService<S> {
    /// Create a new ledger service over the given row store.
    pub fn new(store: S) -> Self {
        Self {
            repo: TransactionRepository::new(store),
            scanner: None,
        }
    }

    /// Wire in an optional receipt scanner collaborator.
    pub fn with_scanner(mut self, scanner: Box<dyn AmountScanner + Send + Sync>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    // ========================
    // Mutations
    // ========================

    /// Record an income entry. Returns its logical position, taken from a
    /// fresh count after the append; there is no other identity.
    pub async fn record_income(
        &self,
        date: NaiveDate,
        source: &str,
        amount_cents: Cents,
    ) -> Result<usize, AppError> {
        let entry = IncomeTransaction::new(date, source, amount_cents)?;
        self.repo.append_income(&entry).await?;
        let count = self.repo.count(TransactionKind::Income).await?;
        Ok(count.saturating_sub(1))
    }

    /// Record an expense entry. Returns its logical position.
    pub async fn record_expense(
        &self,
        date: NaiveDate,
        description: &str,
        category: Category,
        amount_cents: Cents,
    ) -> Result<usize, AppError> {
        let entry = ExpenseTransaction::new(date, description, category, amount_cents)?;
        self.repo.append_expense(&entry).await?;
        let count = self.repo.count(TransactionKind::Expense).await?;
        Ok(count.saturating_sub(1))
    }

    /// Delete the entry of `kind` at `position`. All later positions shift
    /// up by one; nothing is cached across calls.
    pub async fn remove_transaction(
        &self,
        kind: TransactionKind,
        position: usize,
    ) -> Result<(), AppError> {
        self.repo.delete_at(kind, position).await
    }

    // ========================
    // Queries
    // ========================

    /// Every transaction of both kinds, in stored (positional) order.
    pub async fn transactions(
        &self,
    ) -> Result<(Vec<ExpenseTransaction>, Vec<IncomeTransaction>), AppError> {
        self.repo.load_all().await
    }

    /// The distinct periods with data at the given granularity, most
    /// recent first. Recomputed from the store on every call.
    pub async fn list_periods(&self, granularity: Granularity) -> Result<Vec<Period>, AppError> {
        let (expenses, incomes) = self.repo.load_all().await?;
        Ok(derive_periods(all_dates(&expenses, &incomes), granularity))
    }

    /// Aggregate view of one period: totals, balance, category breakdown,
    /// and the period's transactions sorted most recent first.
    pub async fn get_view(&self, period: Period) -> Result<PeriodView, AppError> {
        let (expenses, incomes) = self.repo.load_all().await?;
        let mut expenses = filter_by_period(&expenses, period);
        let mut incomes = filter_by_period(&incomes, period);

        let totals = summarize(&expenses, &incomes);
        sort_recent_first(&mut expenses);
        sort_recent_first(&mut incomes);

        Ok(PeriodView::build(period, totals, expenses, incomes))
    }

    /// Ask the wired-in scanner for an amount suggestion. Returns `None`
    /// when no scanner is configured or it has no suggestion.
    pub fn suggest_amount(&self, image: &[u8]) -> Option<Cents> {
        self.scanner.as_ref().and_then(|scanner| scanner.suggest_amount(image))
    }
}
