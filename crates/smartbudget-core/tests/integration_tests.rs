//! Integration tests for smartbudget-core
//!
//! These tests exercise the record → persist → summarize → export → advise
//! workflow against a file-backed store.

use chrono::{NaiveDate, TimeZone, Utc};
use smartbudget_core::{
    aggregate, budget,
    insights::{InsightsClient, InsightsRequest, InsightsState},
    storage::{DATA_KEY, SETTINGS_KEY},
    Currency, ExportFormat, FileStore, KeyValueStore, MockBackend, MonthKey, MonthReport, Store,
    TransactionDraft, TransactionType,
};

fn march() -> MonthKey {
    "2024-03".parse().unwrap()
}

fn draft(kind: TransactionType, name: &str, category: &str, amount: f64, day: u32) -> TransactionDraft {
    TransactionDraft {
        kind,
        name: name.to_string(),
        amount,
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        category: category.to_string(),
        notes: None,
        source_id: None,
    }
}

fn open(dir: &std::path::Path) -> Store {
    Store::load(Box::new(FileStore::open(dir).expect("Failed to open file store")))
}

/// Salary 5000, Freelance 1000, Housing 1200, Food 300 + 150
fn seeded_store(dir: &std::path::Path) -> Store {
    let mut store = open(dir);
    let salary = store
        .add_transaction(march(), draft(TransactionType::Income, "Salary", "Salary", 5000.0, 1))
        .unwrap();
    store
        .add_transaction(
            march(),
            draft(TransactionType::Income, "Side gig", "Freelance", 1000.0, 4),
        )
        .unwrap();

    let mut rent = draft(TransactionType::Expense, "Rent", "Housing", 1200.0, 2);
    rent.source_id = Some(salary.id.clone());
    store.add_transaction(march(), rent).unwrap();
    store
        .add_transaction(
            march(),
            draft(TransactionType::Expense, "Groceries", "Food & Groceries", 300.0, 6),
        )
        .unwrap();
    store
        .add_transaction(
            march(),
            draft(TransactionType::Expense, "Dinner", "Food & Groceries", 150.0, 9),
        )
        .unwrap();
    store
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_state_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = seeded_store(dir.path());
        store.set_currency(Currency::Eur).unwrap();
        store.set_budget("Food & Groceries", 400.0).unwrap();
    }

    let store = open(dir.path());
    assert_eq!(store.transactions(march()).len(), 5);
    assert_eq!(store.settings().currency, Currency::Eur);
    assert_eq!(store.settings().budget_for("Food & Groceries"), Some(400.0));

    let names: Vec<_> = store
        .transactions(march())
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, ["Salary", "Side gig", "Rent", "Groceries", "Dinner"]);
}

#[test]
fn test_persisted_layout_uses_fixed_keys() {
    let dir = tempfile::tempdir().unwrap();
    seeded_store(dir.path());

    let files = FileStore::open(dir.path()).unwrap();
    let data: serde_json::Value =
        serde_json::from_str(&files.get(DATA_KEY).unwrap().unwrap()).unwrap();
    let month = &data["2024-03"];
    assert_eq!(month["month"], "2024-03");
    assert_eq!(month["transactions"][0]["type"], "income");
    assert!(month["transactions"][2]["sourceId"].is_string());

    // Settings are only written once something changes
    assert!(files.get(SETTINGS_KEY).unwrap().is_none());
}

#[test]
fn test_corrupt_state_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::open(dir.path()).unwrap();
    files.set(DATA_KEY, "{not json").unwrap();
    files.set(SETTINGS_KEY, "42").unwrap();

    let store = open(dir.path());
    assert!(store.months().is_empty());
    assert_eq!(store.settings().currency, Currency::Inr);
    assert_eq!(store.settings().language, "en-US");
}

// =============================================================================
// Summaries and budgets
// =============================================================================

#[test]
fn test_summary_and_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path());

    let summary = store.summary(march());
    assert_eq!(summary.total_income, 6000.0);
    assert_eq!(summary.total_expenses, 1650.0);
    assert_eq!(summary.net_savings, 4350.0);
    assert!((summary.savings_rate - 72.5).abs() < 1e-9);

    let breakdown = aggregate::expense_breakdown(store.transactions(march()));
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].category, "Housing");
    assert_eq!(breakdown[1].amount, 450.0);
}

#[test]
fn test_over_budget_flags_every_expense_in_category() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path());
    store.set_budget("Food & Groceries", 400.0).unwrap();

    let flags = budget::evaluate(store.transactions(march()), store.settings());
    let over: Vec<_> = flags.iter().filter(|f| f.over_budget).collect();
    assert_eq!(over.len(), 2);
    assert!(over.iter().all(|f| f.category == "Food & Groceries"));
    assert_eq!(
        budget::over_budget_categories(store.transactions(march()), store.settings()),
        vec!["Food & Groceries".to_string()]
    );
}

#[test]
fn test_deleting_source_income_falls_back_to_general() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path());
    let salary_id = store.transactions(march())[0].id.clone();
    let rent = store.transactions(march())[2].clone();
    assert_eq!(store.source_name(march(), rent.source_id.as_deref()), "Salary");

    store.delete_transaction(march(), &salary_id).unwrap();

    let rent = open(dir.path()).transactions(march())[1].clone();
    assert_eq!(rent.source_id.as_deref(), Some(salary_id.as_str()));
    assert_eq!(store.source_name(march(), rent.source_id.as_deref()), "General");
}

#[test]
fn test_trend_spans_recorded_months() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path());
    let may: MonthKey = "2024-05".parse().unwrap();
    let mut bonus = draft(TransactionType::Income, "Bonus", "Other", 800.0, 1);
    bonus.date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    store.add_transaction(may, bonus).unwrap();

    let trend = aggregate::trailing_trend(store.months(), may, 3);
    let months: Vec<_> = trend.iter().map(|t| t.month.to_string()).collect();
    assert_eq!(months, ["2024-03", "2024-04", "2024-05"]);
    assert_eq!(trend[1].income, 0.0);
    assert_eq!(trend[2].savings, 800.0);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_month_report() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let store = seeded_store(data.path());

    let report = MonthReport::new(
        march(),
        store.settings().currency,
        store.transactions(march()),
        Utc.with_ymd_and_hms(2024, 4, 1, 8, 30, 0).unwrap(),
    );

    let json_path = report.write_to(out.path(), ExportFormat::Json).unwrap();
    assert!(json_path.ends_with("SmartBudget_2024-03.json"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["activeMonth"], "2024-03");
    assert_eq!(json["currency"], "INR");
    assert_eq!(json["summary"]["totalExpenses"], 1650.0);

    let csv_path = report.write_to(out.path(), ExportFormat::Csv).unwrap();
    let csv = std::fs::read_to_string(csv_path).unwrap();
    assert_eq!(csv.lines().count(), 6);
}

// =============================================================================
// Insights
// =============================================================================

#[tokio::test]
async fn test_insights_for_month() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path());
    let client = InsightsClient::mock();

    let mut request = InsightsRequest::new();
    let advice = request
        .run(&client, march(), store.transactions(march()))
        .await
        .unwrap();

    assert!(advice.contains("savings rate: 72.50%"));
    assert_eq!(request.month(), Some(march()));
    assert!(matches!(request.state(), InsightsState::Ready(_)));
}

#[tokio::test]
async fn test_insights_upstream_failure_is_generic() {
    let client = InsightsClient::Mock(MockBackend::failing());

    let mut request = InsightsRequest::new();
    let err = request.run(&client, march(), &[]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "I'm unable to provide insights at the moment. Please try again later."
    );
    assert!(matches!(request.state(), InsightsState::Failed(_)));
}
