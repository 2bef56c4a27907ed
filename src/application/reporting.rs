use serde::Serialize;

use crate::domain::{
    Category, Cents, ExpenseTransaction, IncomeTransaction, Period, Totals,
};

/// One expense category's share of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total_cents: Cents,
}

/// Everything a client needs to render one period: aggregate metrics plus
/// the period's transactions sorted most recent first.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodView {
    pub period: Period,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
    /// Largest categories first; categories without expenses are absent.
    pub category_breakdown: Vec<CategoryTotal>,
    pub expenses: Vec<ExpenseTransaction>,
    pub incomes: Vec<IncomeTransaction>,
}

impl PeriodView {
    pub(crate) fn build(
        period: Period,
        totals: Totals,
        expenses: Vec<ExpenseTransaction>,
        incomes: Vec<IncomeTransaction>,
    ) -> Self {
        let mut category_breakdown: Vec<CategoryTotal> = totals
            .by_category
            .into_iter()
            .map(|(category, total_cents)| CategoryTotal {
                category,
                total_cents,
            })
            .collect();
        category_breakdown
            .sort_by(|a, b| b.total_cents.cmp(&a.total_cents).then(a.category.cmp(&b.category)));

        Self {
            period,
            total_income: totals.income,
            total_expense: totals.expense,
            balance: totals.balance,
            category_breakdown,
            expenses,
            incomes,
        }
    }
}
