use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Cents;

/// Fixed, closed set of expense categories. Anything else is rejected at
/// construction time rather than passed through as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Shopping,
    Housing,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Shopping => "Shopping",
            Category::Housing => "Housing",
            Category::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "food" => Some(Category::Food),
            "transport" => Some(Category::Transport),
            "utilities" => Some(Category::Utilities),
            "shopping" => Some(Category::Shopping),
            "housing" => Some(Category::Housing),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// All categories, in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Food,
            Category::Transport,
            Category::Utilities,
            Category::Shopping,
            Category::Housing,
            Category::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two independent transaction sequences. Each kind maps to one sheet
/// in the backing workbook with a fixed header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Name of the backing sheet for this kind.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expenses",
        }
    }

    /// Header row of the backing sheet. Column order is part of the store
    /// contract and must match the order cells are appended in.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => &["Date", "Source", "Amount"],
            TransactionKind::Expense => &["Date", "Description", "Category", "Amount"],
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" | "expenses" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must not be negative (got {0} cents)")]
    NegativeAmount(Cents),

    #[error("a transaction must carry a valid date")]
    MissingDate,

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// A single income entry.
///
/// `date` is `None` only for stored rows whose date cell could not be
/// parsed; such entries keep their position but are excluded from every
/// period-scoped view. Freshly recorded entries always carry a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTransaction {
    pub date: Option<NaiveDate>,
    pub source: String,
    pub amount_cents: Cents,
}

impl IncomeTransaction {
    pub fn new(
        date: NaiveDate,
        source: impl Into<String>,
        amount_cents: Cents,
    ) -> Result<Self, ValidationError> {
        if amount_cents < 0 {
            return Err(ValidationError::NegativeAmount(amount_cents));
        }
        Ok(Self {
            date: Some(date),
            source: source.into(),
            amount_cents,
        })
    }

    /// Check the invariants required before this entry may be persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_cents < 0 {
            return Err(ValidationError::NegativeAmount(self.amount_cents));
        }
        if self.date.is_none() {
            return Err(ValidationError::MissingDate);
        }
        Ok(())
    }
}

/// A single expense entry. See [`IncomeTransaction`] for date semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTransaction {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub category: Category,
    pub amount_cents: Cents,
}

impl ExpenseTransaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: Category,
        amount_cents: Cents,
    ) -> Result<Self, ValidationError> {
        if amount_cents < 0 {
            return Err(ValidationError::NegativeAmount(amount_cents));
        }
        Ok(Self {
            date: Some(date),
            description: description.into(),
            category,
            amount_cents,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_cents < 0 {
            return Err(ValidationError::NegativeAmount(self.amount_cents));
        }
        if self.date.is_none() {
            return Err(ValidationError::MissingDate);
        }
        Ok(())
    }
}

/// Anything carrying an optional calendar date. Lets period filtering and
/// sorting work over both transaction kinds.
pub trait Dated {
    fn date(&self) -> Option<NaiveDate>;
}

impl Dated for IncomeTransaction {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for ExpenseTransaction {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}
