//! Transaction command implementations

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use smartbudget_core::{
    budget, coerce_amount, format, MonthKey, Store, Transaction, TransactionDraft,
    TransactionType,
};

use super::truncate;
use crate::cli::{EditFields, TransactionArgs};

/// Validate a category against the type's fixed list, defaulting to the first
pub fn resolve_category(kind: TransactionType, category: Option<&str>) -> Result<&'static str> {
    let categories = kind.categories();
    match category {
        None => categories
            .first()
            .copied()
            .context("No categories defined"),
        Some(c) => kind.canonical_category(c).with_context(|| {
            format!(
                "Unknown {} category '{}'. Available: {}",
                kind,
                c,
                categories.join(", ")
            )
        }),
    }
}

/// Resolve `--source` to the id of an income in `month`, by id or name.
///
/// An empty value means "no source".
pub fn resolve_source(store: &Store, month: MonthKey, source: &str) -> Result<Option<String>> {
    let source = source.trim();
    if source.is_empty() {
        return Ok(None);
    }

    let sources = store.income_sources(month);
    let found = sources
        .iter()
        .find(|s| s.id == source)
        .or_else(|| sources.iter().find(|s| s.name.eq_ignore_ascii_case(source)));

    match found {
        Some(s) => Ok(Some(s.id.clone())),
        None => bail!(
            "No income '{}' in {}. Run 'smartbudget list --kind income' to see sources.",
            source,
            month
        ),
    }
}

/// Today when it falls inside `month`, else the month's first day
pub fn default_date(month: MonthKey) -> NaiveDate {
    let today = Local::now().date_naive();
    if month.contains(today) {
        today
    } else {
        month.first_day()
    }
}

pub fn cmd_add(
    store: &mut Store,
    month: MonthKey,
    kind: TransactionType,
    args: &TransactionArgs,
    source: Option<&str>,
) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("A description is required");
    }

    let category = resolve_category(kind, args.category.as_deref())?;
    let source_id = match source {
        Some(s) if kind == TransactionType::Expense => resolve_source(store, month, s)?,
        _ => None,
    };

    let draft = TransactionDraft {
        kind,
        name: name.to_string(),
        amount: coerce_amount(&args.amount),
        date: args.date.unwrap_or_else(|| default_date(month)),
        category: category.to_string(),
        notes: args.notes.clone(),
        source_id,
    };

    let tx = store
        .add_transaction(month, draft)
        .context("Failed to save transaction")?;

    let currency = store.settings().currency;
    println!(
        "✅ Added {} '{}' ({}) to {}",
        tx.kind,
        tx.name,
        format::format_currency(tx.amount, currency),
        format::month_name(month)
    );
    println!("   id: {}", tx.id);

    if tx.is_expense()
        && budget::over_budget_categories(store.transactions(month), store.settings())
            .contains(&tx.category)
    {
        println!("   ⚠️  {} is now over budget for this month", tx.category);
    }

    Ok(())
}

/// Overwrite the given fields of a transaction, keeping its id, type and month
pub fn cmd_edit(store: &mut Store, id: &str, fields: &EditFields) -> Result<()> {
    let (month, existing) = store
        .find_transaction(id)
        .map(|(m, t)| (m, t.clone()))
        .with_context(|| format!("Transaction {} not found", id))?;

    let category = match fields.category.as_deref() {
        Some(c) => resolve_category(existing.kind, Some(c))?.to_string(),
        None => existing.category.clone(),
    };

    let name = match fields.name.as_deref().map(str::trim) {
        Some("") => bail!("A description is required"),
        Some(n) => n.to_string(),
        None => existing.name.clone(),
    };

    let source_id = match fields.source.as_deref() {
        Some(s) if existing.is_expense() => resolve_source(store, month, s)?,
        _ => existing.source_id.clone(),
    };

    let draft = TransactionDraft {
        kind: existing.kind,
        name,
        amount: fields
            .amount
            .as_deref()
            .map(coerce_amount)
            .unwrap_or(existing.amount),
        date: fields.date.unwrap_or(existing.date),
        category,
        notes: fields.notes.clone().or(existing.notes),
        source_id,
    };

    let tx = store
        .update_transaction(month, id, draft)
        .context("Failed to save transaction")?;

    println!(
        "✅ Updated {} '{}' ({}) in {}",
        tx.kind,
        tx.name,
        format::format_currency(tx.amount, store.settings().currency),
        format::month_name(month)
    );

    Ok(())
}

pub fn cmd_delete(store: &mut Store, id: &str) -> Result<()> {
    let month = store
        .find_transaction(id)
        .map(|(m, _)| m)
        .with_context(|| format!("Transaction {} not found", id))?;

    if let Some(tx) = store
        .delete_transaction(month, id)
        .context("Failed to save changes")?
    {
        println!(
            "🗑️  Deleted {} '{}' from {}",
            tx.kind,
            tx.name,
            format::month_name(month)
        );
    }

    Ok(())
}

pub fn cmd_list(store: &mut Store, month: MonthKey, kind: Option<TransactionType>) -> Result<()> {
    store.touch_month(month)?;

    let all = store.transactions(month);
    let shown: Vec<&Transaction> = all
        .iter()
        .filter(|t| kind.map_or(true, |k| t.kind == k))
        .collect();

    if shown.is_empty() {
        println!(
            "No transactions in {}. Add one with:",
            format::month_name(month)
        );
        println!("  smartbudget add expense Groceries 45.20 --category \"Food & Groceries\"");
        return Ok(());
    }

    let over: HashSet<String> = budget::evaluate(all, store.settings())
        .into_iter()
        .filter(|f| f.over_budget)
        .map(|f| f.transaction_id)
        .collect();

    let currency = store.settings().currency;

    println!();
    println!("📝 Transactions for {}", format::month_name(month));
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in shown {
        let amount = format::format_currency(tx.amount, currency);
        let amount_str = if tx.is_expense() {
            format!("\x1b[31m-{}\x1b[0m", amount) // Red for expenses
        } else {
            format!("\x1b[32m+{}\x1b[0m", amount) // Green for income
        };

        let mut line = format!(
            "   {} │ {:>14} │ {:<30} │ {}",
            format::format_date(tx.date),
            amount_str,
            truncate(&tx.name, 30),
            tx.category
        );
        if tx.is_expense() {
            line.push_str(&format!(
                " │ from {}",
                store.source_name(month, tx.source_id.as_deref())
            ));
        }
        if over.contains(&tx.id) {
            line.push_str(" ⚠️ over budget");
        }
        println!("{}", line);
        println!("     id: {}", tx.id);
        if let Some(notes) = &tx.notes {
            println!("     📎 {}", truncate(notes, 60));
        }
    }

    Ok(())
}
