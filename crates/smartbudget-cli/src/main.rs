//! SmartBudget CLI - Personal monthly budget tracker
//!
//! Usage:
//!   smartbudget add income Salary 5000              Record income
//!   smartbudget add expense Rent 1200 -c Housing    Record an expense
//!   smartbudget summary --month 2024-03             Totals for a month
//!   smartbudget insights                            AI advice for the month

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let (mut store, config) = commands::open_store(cli.data_dir.as_deref())?;
    let month = commands::active_month(cli.month);

    match cli.command {
        Commands::Add { kind } => match kind {
            AddKind::Income(args) => commands::cmd_add(
                &mut store,
                month,
                smartbudget_core::TransactionType::Income,
                &args,
                None,
            ),
            AddKind::Expense { args, source } => commands::cmd_add(
                &mut store,
                month,
                smartbudget_core::TransactionType::Expense,
                &args,
                source.as_deref(),
            ),
        },
        Commands::Edit { id, fields } => commands::cmd_edit(&mut store, &id, &fields),
        Commands::Delete { id } => commands::cmd_delete(&mut store, &id),
        Commands::List { kind } => commands::cmd_list(&mut store, month, kind),
        Commands::Summary => commands::cmd_summary(&mut store, month),
        Commands::Budgets { action } => match action {
            None => commands::cmd_budgets_status(&store, month),
            Some(BudgetsAction::Set { category, amount }) => {
                commands::cmd_budgets_set(&mut store, &category, &amount)
            }
            Some(BudgetsAction::Clear { category }) => {
                commands::cmd_budgets_clear(&mut store, &category)
            }
        },
        Commands::Settings { action } => match action {
            None | Some(SettingsAction::Show) => commands::cmd_settings_show(&store),
            Some(SettingsAction::Currency { currency }) => {
                commands::cmd_settings_currency(&mut store, currency)
            }
            Some(SettingsAction::Language { language }) => {
                commands::cmd_settings_language(&mut store, &language)
            }
            Some(SettingsAction::ApiKey { key }) => {
                commands::cmd_settings_api_key(&mut store, key.as_deref())
            }
        },
        Commands::Report { action } => match action {
            None => commands::cmd_report_trend(&store, month, 6),
            Some(ReportAction::Trend { months }) => {
                commands::cmd_report_trend(&store, month, usize::from(months))
            }
            Some(ReportAction::Categories) => commands::cmd_report_categories(&store),
        },
        Commands::Export { format, output } => {
            commands::cmd_export(&store, month, &format, &output).map(|_| ())
        }
        Commands::Insights => commands::cmd_insights(&store, &config.insights, month).await,
        Commands::Months => commands::cmd_months(&store),
    }
}
