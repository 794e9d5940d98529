//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use smartbudget_core::aggregate::MAX_TREND_MONTHS;
use smartbudget_core::{Currency, MonthKey};

/// SmartBudget - Track monthly income, expenses and budgets
#[derive(Parser)]
#[command(name = "smartbudget")]
#[command(about = "Personal monthly budget tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding persisted state
    ///
    /// Defaults to SMARTBUDGET_DATA_DIR, then the config file, then the
    /// platform data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Month to work on (YYYY-MM, defaults to the current month)
    #[arg(short, long, global = true)]
    pub month: Option<MonthKey>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a transaction in the active month
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },

    /// Edit a transaction (unspecified fields keep their value)
    Edit {
        /// Transaction id
        id: String,

        #[command(flatten)]
        fields: EditFields,
    },

    /// Delete a transaction
    Delete {
        /// Transaction id
        id: String,
    },

    /// List the active month's transactions
    List {
        /// Only show income or expense
        #[arg(short, long)]
        kind: Option<smartbudget_core::TransactionType>,
    },

    /// Show totals and the expense breakdown for the active month
    Summary,

    /// Show or manage per-category spending limits
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Trend and category reports across months
    Report {
        #[command(subcommand)]
        action: Option<ReportAction>,
    },

    /// Export the active month as a report file
    Export {
        /// Format: json or csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Ask for AI advice on the active month
    ///
    /// Uses the API key from settings, else GEMINI_API_KEY or API_KEY.
    Insights,

    /// List months that have recorded data
    Months,
}

#[derive(Subcommand)]
pub enum AddKind {
    /// Record income
    Income(TransactionArgs),

    /// Record an expense
    Expense {
        #[command(flatten)]
        args: TransactionArgs,

        /// Funding income (id or name) in the same month
        #[arg(short, long)]
        source: Option<String>,
    },
}

#[derive(Args)]
pub struct TransactionArgs {
    /// Description
    pub name: String,

    /// Amount (invalid or negative input is recorded as 0)
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Category (defaults to the first category for the type)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Date (YYYY-MM-DD, defaults to today within the active month)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

#[derive(Args, Default)]
pub struct EditFields {
    /// New description
    #[arg(long)]
    pub name: Option<String>,

    /// New amount
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// New category
    #[arg(long)]
    pub category: Option<String>,

    /// New date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// New notes (empty string clears)
    #[arg(long)]
    pub notes: Option<String>,

    /// New funding income for an expense (id or name; empty string clears)
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Set a monthly limit for an expense category (0 means no limit)
    Set {
        /// Expense category
        category: String,

        /// Limit amount
        amount: String,
    },

    /// Remove a category's limit
    Clear {
        /// Expense category
        category: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Set the display currency (USD, INR, EUR, GBP)
    Currency {
        currency: Currency,
    },

    /// Set the language tag (e.g. en-US)
    Language {
        language: String,
    },

    /// Save an insights API key (omit to clear)
    ApiKey {
        key: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Income, expense and savings for the months up to the active month
    Trend {
        /// Number of months to show (1-120)
        #[arg(
            short = 'n',
            long,
            default_value = "6",
            value_parser = clap::value_parser!(u16).range(1..=MAX_TREND_MONTHS as i64)
        )]
        months: u16,
    },

    /// All-time spending per expense category
    Categories,
}
