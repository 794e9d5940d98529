//! Report command implementations

use anyhow::Result;
use smartbudget_core::{aggregate, budget, format, Currency, MonthKey, Store};

use super::truncate;

/// Width of the bar drawn for the largest value in a report
const BAR_WIDTH: usize = 24;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

/// `part` as a percentage of `total`; 0 when there is nothing to divide
pub(crate) fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

pub fn cmd_summary(store: &mut Store, month: MonthKey) -> Result<()> {
    store.touch_month(month)?;

    let transactions = store.transactions(month);
    let summary = store.summary(month);
    let currency = store.settings().currency;
    let money = |v: f64| format::format_currency(v, currency);

    println!();
    println!("📊 Budget Summary: {}", format::month_name(month));
    println!("   ─────────────────────────────");
    println!("   💰 Total income:   {:>16}", money(summary.total_income));
    println!("   💸 Total expenses: {:>16}", money(summary.total_expenses));
    println!("   🏦 Net savings:    {:>16}", money(summary.net_savings));
    println!("   📈 Savings rate:   {:>15.1}%", summary.savings_rate);

    let breakdown = aggregate::expense_breakdown(transactions);
    if !breakdown.is_empty() {
        let max = breakdown.iter().map(|c| c.amount).fold(0.0, f64::max);
        println!();
        println!("   Expenses by category:");
        for c in &breakdown {
            println!(
                "   {:<20} {:>14} {}",
                truncate(&c.category, 20),
                money(c.amount),
                bar(c.amount, max)
            );
        }
    }

    let over = budget::over_budget_categories(transactions, store.settings());
    if !over.is_empty() {
        println!();
        println!("⚠️  Over budget: {}", over.join(", "));
        println!("   Run 'smartbudget budgets' for details.");
    }

    Ok(())
}

pub fn cmd_budgets_status(store: &Store, month: MonthKey) -> Result<()> {
    let status = budget::category_status(store.transactions(month), store.settings());
    let currency = store.settings().currency;

    if status.is_empty() {
        println!("No budget limits set. Add one with:");
        println!("  smartbudget budgets set \"Food & Groceries\" 400");
        return Ok(());
    }

    println!();
    println!("🎯 Budgets for {}", format::month_name(month));
    println!("   ─────────────────────────────────────────────────────────────");

    for s in status {
        let marker = if s.over_budget { "⚠️ " } else { "✓ " };
        println!(
            "   {} {:<20} {:>14} of {:>14} │ {:>5.0}% │ {} {}",
            marker,
            truncate(&s.category, 20),
            format::format_currency(s.spent, currency),
            format::format_currency(s.limit, currency),
            s.usage * 100.0,
            if s.remaining < 0.0 { "over by" } else { "left" },
            format::format_currency(s.remaining.abs(), currency)
        );
    }

    Ok(())
}

pub fn cmd_report_trend(store: &Store, month: MonthKey, months: usize) -> Result<()> {
    let trend = aggregate::trailing_trend(store.months(), month, months.max(1));
    let currency = store.settings().currency;
    let money = |v: f64| format::format_currency(v, currency);

    println!();
    println!(
        "📈 Monthly Trend ({} to {})",
        format::month_name(trend[0].month),
        format::month_name(month)
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<5} {:>16} {:>16} {:>16}",
        "", "Income", "Expense", "Savings"
    );

    for point in &trend {
        println!(
            "   {:<5} {:>16} {:>16} {:>16}",
            format::month_short(point.month),
            money(point.income),
            money(point.expense),
            money(point.savings)
        );
    }

    Ok(())
}

pub fn cmd_report_categories(store: &Store) -> Result<()> {
    let ranking = aggregate::category_ranking(store.months());

    if ranking.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    let currency: Currency = store.settings().currency;
    let total: f64 = ranking.iter().map(|c| c.amount).sum();
    let max = ranking[0].amount;

    println!();
    println!("🏷️  Spending by Category (all months)");
    println!("   ─────────────────────────────────────────────────────────────");

    for (i, c) in ranking.iter().enumerate() {
        println!(
            "   {:>2}. {:<20} {:>14} {:>5.1}% {}",
            i + 1,
            truncate(&c.category, 20),
            format::format_currency(c.amount, currency),
            share(c.amount, total),
            bar(c.amount, max)
        );
    }

    println!("   ─────────────────────────────");
    println!(
        "   Total: {}",
        format::format_currency(total, currency)
    );

    Ok(())
}
