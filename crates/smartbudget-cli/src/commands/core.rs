//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_store` - Shared utility to load config and open the persisted store
//! - `active_month` - Resolve the `--month` flag
//! - `cmd_months` - List recorded months

use std::path::Path;

use anyhow::{Context, Result};
use smartbudget_core::{aggregate, format, AppConfig, FileStore, MonthKey, Store};
use tracing::debug;

/// Load configuration and open the file-backed store.
///
/// `--data-dir` wins over the environment and config file.
pub fn open_store(data_dir: Option<&Path>) -> Result<(Store, AppConfig)> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }

    let backend = FileStore::open(&config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.data_dir.display()
        )
    })?;
    debug!(dir = %config.data_dir.display(), "Opened store");

    Ok((Store::load(Box::new(backend)), config))
}

/// The month a command operates on
pub fn active_month(month: Option<MonthKey>) -> MonthKey {
    month.unwrap_or_else(MonthKey::current)
}

pub fn cmd_months(store: &Store) -> Result<()> {
    let trend = aggregate::monthly_trend(store.months());

    if trend.is_empty() {
        println!("No months recorded yet. Add a transaction with:");
        println!("  smartbudget add income Salary 5000");
        return Ok(());
    }

    let currency = store.settings().currency;

    println!();
    println!("📅 Recorded Months");
    println!("   ─────────────────────────────────────────────────────────────");

    for point in trend {
        let count = store.transactions(point.month).len();
        println!(
            "   {} │ {:<15} │ {:>3} txns │ in {:>14} │ out {:>14}",
            point.month,
            format::month_name(point.month),
            count,
            format::format_currency(point.income, currency),
            format::format_currency(point.expense, currency)
        );
    }

    Ok(())
}
