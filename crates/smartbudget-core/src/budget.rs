//! Category budget thresholds
//!
//! Cumulative category totals are recomputed from the displayed list on every
//! call. A limit of zero, or no limit at all, never flags.

use serde::Serialize;

use crate::aggregate::{expense_breakdown, total_for};
use crate::models::{Settings, Transaction};

/// Over-budget flag for one expense transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetFlag {
    pub transaction_id: String,
    pub category: String,
    /// Cumulative spend in the category over the evaluated list
    pub category_total: f64,
    pub limit: Option<f64>,
    pub over_budget: bool,
}

/// Spend against limit for one configured category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatus {
    pub category: String,
    pub spent: f64,
    pub limit: f64,
    /// Negative when over budget
    pub remaining: f64,
    /// `spent / limit`
    pub usage: f64,
    pub over_budget: bool,
}

/// Strictly greater than a positive limit
pub fn is_over_budget(limit: Option<f64>, spent: f64) -> bool {
    match limit {
        Some(limit) if limit > 0.0 => spent > limit,
        _ => false,
    }
}

/// Flag each expense in `transactions`, in input order
pub fn evaluate(transactions: &[Transaction], settings: &Settings) -> Vec<BudgetFlag> {
    let totals = expense_breakdown(transactions);

    transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| {
            let category_total = total_for(&totals, &t.category);
            let limit = settings.budget_for(&t.category);
            BudgetFlag {
                transaction_id: t.id.clone(),
                category: t.category.clone(),
                category_total,
                limit,
                over_budget: is_over_budget(limit, category_total),
            }
        })
        .collect()
}

/// Categories currently over their limit, in first-seen order
pub fn over_budget_categories(transactions: &[Transaction], settings: &Settings) -> Vec<String> {
    expense_breakdown(transactions)
        .into_iter()
        .filter(|c| is_over_budget(settings.budget_for(&c.category), c.amount))
        .map(|c| c.category)
        .collect()
}

/// Spend against every configured positive limit
pub fn category_status(transactions: &[Transaction], settings: &Settings) -> Vec<CategoryStatus> {
    let totals = expense_breakdown(transactions);

    settings
        .category_budgets
        .iter()
        .filter(|(_, limit)| **limit > 0.0)
        .map(|(category, limit)| {
            let spent = total_for(&totals, category);
            CategoryStatus {
                category: category.clone(),
                spent,
                limit: *limit,
                remaining: limit - spent,
                usage: spent / limit,
                over_budget: is_over_budget(Some(*limit), spent),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    fn expense(id: &str, category: &str, amount: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind: TransactionType::Expense,
            name: id.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            category: category.to_string(),
            notes: None,
            source_id: None,
        }
    }

    fn settings_with(category: &str, limit: f64) -> Settings {
        let mut settings = Settings::default();
        settings
            .category_budgets
            .insert(category.to_string(), limit);
        settings
    }

    #[test]
    fn test_is_over_budget_boundary() {
        assert!(is_over_budget(Some(250.0), 300.0));
        assert!(!is_over_budget(Some(250.0), 250.0));
        assert!(!is_over_budget(Some(0.0), 1_000_000.0));
        assert!(!is_over_budget(None, 1_000_000.0));
    }

    #[test]
    fn test_evaluate_uses_cumulative_total() {
        let txs = vec![
            expense("a", "Food & Groceries", 200.0),
            expense("b", "Food & Groceries", 100.0),
            expense("c", "Housing", 1000.0),
        ];
        let flags = evaluate(&txs, &settings_with("Food & Groceries", 250.0));

        assert_eq!(flags.len(), 3);
        // Both food entries are flagged: the category total is 300
        assert!(flags[0].over_budget);
        assert!(flags[1].over_budget);
        assert_eq!(flags[0].category_total, 300.0);
        assert!(!flags[2].over_budget);
        assert_eq!(flags[2].limit, None);
    }

    #[test]
    fn test_evaluate_at_limit_not_flagged() {
        let txs = vec![expense("a", "Food & Groceries", 250.0)];
        let flags = evaluate(&txs, &settings_with("Food & Groceries", 250.0));
        assert!(!flags[0].over_budget);
    }

    #[test]
    fn test_zero_limit_never_flags() {
        let txs = vec![expense("a", "Shopping", 5000.0)];
        let flags = evaluate(&txs, &settings_with("Shopping", 0.0));
        assert!(!flags[0].over_budget);
        assert!(category_status(&txs, &settings_with("Shopping", 0.0)).is_empty());
    }

    #[test]
    fn test_category_status() {
        let txs = vec![
            expense("a", "Food & Groceries", 300.0),
            expense("b", "Housing", 100.0),
        ];
        let mut settings = settings_with("Food & Groceries", 250.0);
        settings
            .category_budgets
            .insert("Housing".to_string(), 400.0);

        let status = category_status(&txs, &settings);
        assert_eq!(status.len(), 2);
        let food = status
            .iter()
            .find(|s| s.category == "Food & Groceries")
            .unwrap();
        assert!(food.over_budget);
        assert_eq!(food.remaining, -50.0);
        assert_eq!(food.usage, 1.2);
        let housing = status.iter().find(|s| s.category == "Housing").unwrap();
        assert!(!housing.over_budget);
        assert_eq!(housing.usage, 0.25);

        assert_eq!(
            over_budget_categories(&txs, &settings),
            vec!["Food & Groceries".to_string()]
        );
    }
}
