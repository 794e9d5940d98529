//! Insights command implementation

use anyhow::Result;
use smartbudget_core::{
    format, InsightsBackend, InsightsClient, InsightsConfig, InsightsFailure, InsightsRequest,
    InsightsState, MonthKey, Store,
};
use tracing::debug;

pub async fn cmd_insights(store: &Store, config: &InsightsConfig, month: MonthKey) -> Result<()> {
    match InsightsClient::resolve(config, store.settings().gemini_api_key.as_deref()) {
        Ok(client) => run_insights(store, &client, month).await.map(|_| ()),
        Err(e) if e.is_missing_credential() => {
            print_missing_credential_hint();
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Request advice for `month`, print the outcome and return the final request state
pub async fn run_insights(
    store: &Store,
    client: &InsightsClient,
    month: MonthKey,
) -> Result<InsightsState> {
    let transactions = store.transactions(month);
    if transactions.is_empty() {
        println!(
            "No transactions in {}; add some before asking for insights.",
            format::month_name(month)
        );
        return Ok(InsightsState::Idle);
    }

    println!(
        "🤖 Analyzing {} with {}...",
        format::month_name(month),
        client.model()
    );

    let mut request = InsightsRequest::new();
    if let Err(e) = request.run(client, month, transactions).await {
        debug!(error = %e, %month, "Insights request failed");
    }

    match request.state() {
        InsightsState::Ready(advice) => {
            println!();
            println!(
                "💡 Insights for {}",
                format::month_name(request.month().unwrap_or(month))
            );
            println!("   ─────────────────────────────");
            for line in advice.lines().filter(|l| !l.trim().is_empty()) {
                println!("   {}", line.trim());
            }
        }
        InsightsState::Failed(InsightsFailure::MissingCredential) => {
            print_missing_credential_hint();
        }
        InsightsState::Failed(InsightsFailure::Service)
        | InsightsState::Idle
        | InsightsState::Loading => {
            println!("⚠️  {}", smartbudget_core::error::INSIGHTS_UNAVAILABLE);
        }
    }

    Ok(request.state().clone())
}

fn print_missing_credential_hint() {
    println!("🔑 No API key configured for insights.");
    println!("   Save one with:  smartbudget settings api-key <KEY>");
    println!("   or set the GEMINI_API_KEY environment variable.");
}
