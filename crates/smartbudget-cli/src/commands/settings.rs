//! Settings and budget-limit command implementations

use anyhow::{Context, Result};
use smartbudget_core::{coerce_amount, format, Currency, Store, TransactionType};

use super::resolve_category;

/// Show only the last four characters of a key
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

pub fn cmd_settings_show(store: &Store) -> Result<()> {
    let settings = store.settings();

    println!();
    println!("⚙️  Settings");
    println!("   ─────────────────────────────");
    println!(
        "   Currency: {} ({})",
        settings.currency,
        settings.currency.symbol()
    );
    println!("   Language: {}", settings.language);
    match settings.gemini_api_key.as_deref() {
        Some(key) => println!("   API key:  {}", mask_key(key)),
        None => println!("   API key:  not set (GEMINI_API_KEY / API_KEY used if present)"),
    }

    let limits: Vec<_> = settings
        .category_budgets
        .iter()
        .filter(|(_, l)| **l > 0.0)
        .collect();
    if limits.is_empty() {
        println!("   Budgets:  none");
    } else {
        println!("   Budgets:");
        for (category, limit) in limits {
            println!(
                "     {:<20} {}",
                category,
                format::format_currency(*limit, settings.currency)
            );
        }
    }

    Ok(())
}

pub fn cmd_settings_currency(store: &mut Store, currency: Currency) -> Result<()> {
    store
        .set_currency(currency)
        .context("Failed to save settings")?;
    println!(
        "✅ Currency set to {} (e.g. {})",
        currency,
        format::format_currency(1234.5, currency)
    );
    Ok(())
}

pub fn cmd_settings_language(store: &mut Store, language: &str) -> Result<()> {
    if language.trim().is_empty() {
        anyhow::bail!("Language tag cannot be empty");
    }
    store
        .set_language(language)
        .context("Failed to save settings")?;
    println!("✅ Language set to {}", store.settings().language);
    Ok(())
}

pub fn cmd_settings_api_key(store: &mut Store, key: Option<&str>) -> Result<()> {
    store.set_api_key(key).context("Failed to save settings")?;
    match store.settings().gemini_api_key.as_deref() {
        Some(k) => println!("✅ API key saved ({})", mask_key(k)),
        None => println!("✅ API key cleared"),
    }
    Ok(())
}

pub fn cmd_budgets_set(store: &mut Store, category: &str, amount: &str) -> Result<()> {
    let category = resolve_category(TransactionType::Expense, Some(category))?;
    let limit = coerce_amount(amount);

    store
        .set_budget(category, limit)
        .context("Failed to save settings")?;

    if limit > 0.0 {
        println!(
            "✅ {} limit set to {}",
            category,
            format::format_currency(limit, store.settings().currency)
        );
    } else {
        println!("✅ {} has no limit", category);
    }
    Ok(())
}

pub fn cmd_budgets_clear(store: &mut Store, category: &str) -> Result<()> {
    let category = resolve_category(TransactionType::Expense, Some(category))?;
    if store
        .clear_budget(category)
        .context("Failed to save settings")?
    {
        println!("✅ Removed the {} limit", category);
    } else {
        println!("{} has no limit set.", category);
    }
    Ok(())
}
