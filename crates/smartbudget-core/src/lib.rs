//! SmartBudget Core Library
//!
//! Shared functionality for the SmartBudget personal budgeting tool:
//! - Month-partitioned transaction store with persisted settings
//! - Key-value persistence (file-backed or in-memory)
//! - Summaries, trends and category rankings
//! - Per-category budget limits and overspend detection
//! - Month report export (JSON, CSV)
//! - AI budget advice through a pluggable backend (Gemini, mock)

pub mod aggregate;
pub mod budget;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod insights;
pub mod models;
pub mod storage;
pub mod store;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{CategoryTotal, MonthTrend};
pub use budget::{BudgetFlag, CategoryStatus};
pub use config::{AppConfig, InsightsConfig};
pub use error::{Error, Result};
pub use export::{ExportFormat, MonthReport};
pub use insights::{
    GeminiBackend, InsightsBackend, InsightsClient, InsightsFailure, InsightsRequest,
    InsightsState, MockBackend,
};
pub use models::{
    coerce_amount, BudgetSummary, Currency, ExpenseCategory, IncomeCategory, MonthData, MonthKey,
    MonthMap, Settings, Transaction, TransactionDraft, TransactionType,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{IncomeSource, Store, DEFAULT_SOURCE_LABEL};
