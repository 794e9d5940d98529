//! Prompt text for the advice request

use serde_json::{Map, Value};

use crate::aggregate::expense_breakdown;
use crate::models::{BudgetSummary, Transaction};

/// Build the advisor prompt from a month's summary and its expenses
pub fn build_prompt(summary: &BudgetSummary, transactions: &[Transaction]) -> String {
    let breakdown: Map<String, Value> = expense_breakdown(transactions)
        .into_iter()
        .map(|c| (c.category, Value::from(c.amount)))
        .collect();
    let breakdown_json =
        serde_json::to_string_pretty(&breakdown).unwrap_or_else(|_| "{}".to_string());

    format!(
        "As a professional financial advisor, analyze this monthly budget:\n\
         Total Income: {}\n\
         Total Expenses: {}\n\
         Net Savings: {}\n\
         Savings Rate: {:.2}%\n\
         \n\
         Expense Breakdown by Category:\n\
         {}\n\
         \n\
         Provide 3 concise, actionable pieces of advice to improve this person's financial health.\n\
         Keep the tone encouraging but realistic.\n\
         Format the response as 3 bullet points.\n",
        summary.total_income,
        summary.total_expenses,
        summary.net_savings,
        summary.savings_rate,
        breakdown_json
    )
}
