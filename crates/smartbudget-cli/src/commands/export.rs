//! Export command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use smartbudget_core::{format, ExportFormat, MonthKey, MonthReport, Store};

/// Write the month's report to `output`, returning the file path
pub fn cmd_export(
    store: &Store,
    month: MonthKey,
    format_name: &str,
    output: &Path,
) -> Result<PathBuf> {
    let export_format: ExportFormat = format_name.parse().map_err(anyhow::Error::msg)?;

    let report = MonthReport::new(
        month,
        store.settings().currency,
        store.transactions(month),
        Utc::now(),
    );

    let path = report
        .write_to(output, export_format)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    println!(
        "✅ Exported {} ({} transactions) to {}",
        format::month_name(month),
        report.transactions.len(),
        path.display()
    );

    Ok(path)
}
