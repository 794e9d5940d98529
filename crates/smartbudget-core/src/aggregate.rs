//! Aggregation over transaction lists
//!
//! Everything here is a pure linear scan. The per-month functions operate on
//! whatever slice the caller is displaying; the multi-month functions feed
//! the reports and trend views.

use serde::Serialize;

use crate::models::{BudgetSummary, MonthData, MonthKey, MonthMap, Transaction, TransactionType};

/// Running total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Income, expense and savings for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTrend {
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
}

/// Sum of amounts for transactions of the given type
pub fn total_by_type(transactions: &[Transaction], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Category → running sum, in first-seen category order
pub fn category_totals<'a, I>(transactions: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for tx in transactions {
        match totals.iter_mut().find(|c| c.category == tx.category) {
            Some(existing) => existing.amount += tx.amount,
            None => totals.push(CategoryTotal {
                category: tx.category.clone(),
                amount: tx.amount,
            }),
        }
    }
    totals
}

/// Category totals over expenses only
pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    category_totals(transactions.iter().filter(|t| t.is_expense()))
}

/// Look up one category in a totals list
pub fn total_for(totals: &[CategoryTotal], category: &str) -> f64 {
    totals
        .iter()
        .find(|c| c.category == category)
        .map(|c| c.amount)
        .unwrap_or(0.0)
}

/// Income, expenses, net savings and savings rate for a transaction list
pub fn summarize(transactions: &[Transaction]) -> BudgetSummary {
    let total_income = total_by_type(transactions, TransactionType::Income);
    let total_expenses = total_by_type(transactions, TransactionType::Expense);
    let net_savings = total_income - total_expenses;
    let savings_rate = if total_income > 0.0 {
        net_savings / total_income * 100.0
    } else {
        0.0
    };

    BudgetSummary {
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
    }
}

fn trend_point(month: MonthKey, data: Option<&MonthData>) -> MonthTrend {
    let (income, expense) = data
        .map(|d| {
            (
                total_by_type(&d.transactions, TransactionType::Income),
                total_by_type(&d.transactions, TransactionType::Expense),
            )
        })
        .unwrap_or((0.0, 0.0));

    MonthTrend {
        month,
        income,
        expense,
        savings: income - expense,
    }
}

/// One trend point per recorded month, oldest first
pub fn monthly_trend(months: &MonthMap) -> Vec<MonthTrend> {
    months
        .iter()
        .map(|(key, data)| trend_point(*key, Some(data)))
        .collect()
}

/// Longest window `trailing_trend` will produce (ten years)
pub const MAX_TREND_MONTHS: usize = 120;

/// The `count` months ending at `end` (inclusive), oldest first.
///
/// Months with no recorded data report zeros. `count` is capped at
/// `MAX_TREND_MONTHS` and never reaches back past January of year 0.
pub fn trailing_trend(months: &MonthMap, end: MonthKey, count: usize) -> Vec<MonthTrend> {
    let available = usize::try_from(end.year()).unwrap_or(0) * 12 + end.month() as usize;
    let count = count.min(MAX_TREND_MONTHS).min(available);

    let mut keys = Vec::with_capacity(count);
    let mut key = end;
    for _ in 0..count {
        keys.push(key);
        key = key.previous();
    }
    keys.reverse();

    keys.into_iter()
        .map(|k| trend_point(k, months.get(&k)))
        .collect()
}

/// All-time expense totals per category, largest first
pub fn category_ranking(months: &MonthMap) -> Vec<CategoryTotal> {
    let mut totals = category_totals(
        months
            .values()
            .flat_map(|m| m.transactions.iter())
            .filter(|t| t.is_expense()),
    );
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals
}
