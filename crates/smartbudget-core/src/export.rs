//! Export of the active month as a downloadable report
//!
//! Supports:
//! - JSON report: export timestamp, month, currency, summary and transactions
//! - CSV export of the month's transactions

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::summarize;
use crate::error::{Error, Result};
use crate::models::{BudgetSummary, Currency, MonthKey, Transaction};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown export format: {} (use json or csv)", s)),
        }
    }
}

/// A month's report as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthReport {
    /// RFC 3339 timestamp of the export
    pub export_date: String,
    pub active_month: MonthKey,
    pub currency: Currency,
    pub summary: BudgetSummary,
    pub transactions: Vec<Transaction>,
}

impl MonthReport {
    pub fn new(
        month: MonthKey,
        currency: Currency,
        transactions: &[Transaction],
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            active_month: month,
            currency,
            summary: summarize(transactions),
            transactions: transactions.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Transactions as CSV, one row per transaction in insertion order
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for tx in &self.transactions {
            writer.serialize(CsvRow::from(tx))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::InvalidData(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
    }

    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
        }
    }

    /// `SmartBudget_<month>.<ext>`
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("SmartBudget_{}.{}", self.active_month, format.extension())
    }

    /// Write the report into `dir`, returning the file path
    pub fn write_to(&self, dir: &Path, format: ExportFormat) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(format));
        fs::write(&path, self.render(format)?)?;
        info!(path = %path.display(), transactions = self.transactions.len(), "Exported report");
        Ok(path)
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    amount: f64,
    date: String,
    category: &'a str,
    notes: &'a str,
    source_id: &'a str,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            id: &tx.id,
            kind: tx.kind.as_str(),
            name: &tx.name,
            amount: tx.amount,
            date: tx.date.to_string(),
            category: &tx.category,
            notes: tx.notes.as_deref().unwrap_or(""),
            source_id: tx.source_id.as_deref().unwrap_or(""),
        }
    }
}
