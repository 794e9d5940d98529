//! AI-generated budget advice
//!
//! # Architecture
//!
//! - `InsightsBackend` trait: one text-generation call
//! - `InsightsClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//! - `InsightsRequest`: loading/result state for a single in-flight request
//!
//! # Configuration
//!
//! Environment variables:
//! - `INSIGHTS_BACKEND`: `gemini` (default) or `mock`
//! - `GEMINI_API_KEY`, then `API_KEY`: credential used when the user has not
//!   saved one in settings
//!
//! Failures come back as one of two errors: `Error::MissingCredential` when no
//! key is available (prompt the user to configure one), or
//! `Error::InsightsService` for anything that went wrong upstream.

mod gemini;
mod mock;
pub mod prompt;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use prompt::build_prompt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::InsightsConfig;
use crate::error::{Error, Result};
use crate::models::{BudgetSummary, MonthKey, Transaction};

/// Environment variables consulted for a default credential, in order
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// A text-generation service
#[async_trait]
pub trait InsightsBackend: Send + Sync {
    /// Send one prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete insights client enum
#[derive(Clone)]
pub enum InsightsClient {
    /// Google Gemini `generateContent` API
    Gemini(GeminiBackend),
    /// Mock backend for testing and offline use
    Mock(MockBackend),
}

impl InsightsClient {
    /// Build a client for the configured backend.
    ///
    /// `user_key` is the credential saved in settings; when absent the
    /// environment defaults are tried. Fails with `MissingCredential` when
    /// the Gemini backend has no key at all.
    pub fn resolve(config: &InsightsConfig, user_key: Option<&str>) -> Result<Self> {
        let backend = std::env::var("INSIGHTS_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "mock" => Ok(InsightsClient::Mock(MockBackend::new())),
            other => {
                if other != "gemini" {
                    warn!(backend = %other, "Unknown INSIGHTS_BACKEND, falling back to gemini");
                }
                let key = resolve_credential(user_key, |var| std::env::var(var).ok())
                    .ok_or(Error::MissingCredential)?;
                Ok(InsightsClient::Gemini(GeminiBackend::from_config(
                    config, &key,
                )))
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        InsightsClient::Mock(MockBackend::new())
    }

    /// Ask for advice on a month's figures.
    ///
    /// Upstream errors are logged and collapsed into `Error::InsightsService`.
    pub async fn budget_insights(
        &self,
        summary: &BudgetSummary,
        transactions: &[Transaction],
    ) -> Result<String> {
        let prompt = build_prompt(summary, transactions);
        debug!(model = self.model(), host = self.host(), "Requesting budget insights");

        match self.generate(&prompt).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, model = self.model(), "Insights request failed");
                Err(Error::InsightsService)
            }
        }
    }
}

#[async_trait]
impl InsightsBackend for InsightsClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            InsightsClient::Gemini(b) => b.generate(prompt).await,
            InsightsClient::Mock(b) => b.generate(prompt).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            InsightsClient::Gemini(b) => b.model(),
            InsightsClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            InsightsClient::Gemini(b) => b.host(),
            InsightsClient::Mock(b) => b.host(),
        }
    }
}

/// Pick the credential: the user's saved key, else the first non-empty
/// environment default
pub fn resolve_credential<F>(user_key: Option<&str>, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    user_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .or_else(|| {
            CREDENTIAL_ENV_VARS
                .iter()
                .filter_map(|var| env(var))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        })
}

/// Why a request ended without advice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightsFailure {
    /// No credential configured; prompt for one
    MissingCredential,
    /// Network or upstream failure
    Service,
}

impl From<&Error> for InsightsFailure {
    fn from(e: &Error) -> Self {
        if e.is_missing_credential() {
            Self::MissingCredential
        } else {
            Self::Service
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsightsState {
    #[default]
    Idle,
    Loading,
    Ready(String),
    Failed(InsightsFailure),
}

/// State of the single insights request a view can have outstanding.
///
/// The month and summary are captured when the request starts; a result
/// arriving later stays bound to them even if the viewed month changed.
#[derive(Debug, Clone, Default)]
pub struct InsightsRequest {
    state: InsightsState,
    captured: Option<(MonthKey, BudgetSummary)>,
}

impl InsightsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InsightsState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == InsightsState::Loading
    }

    /// Month the current (or last) request was issued for
    pub fn month(&self) -> Option<MonthKey> {
        self.captured.map(|(m, _)| m)
    }

    pub fn summary(&self) -> Option<&BudgetSummary> {
        self.captured.as_ref().map(|(_, s)| s)
    }

    /// Enter the loading state. Returns false (and changes nothing) when a
    /// request is already outstanding.
    pub fn begin(&mut self, month: MonthKey, summary: BudgetSummary) -> bool {
        if self.is_loading() {
            return false;
        }
        self.state = InsightsState::Loading;
        self.captured = Some((month, summary));
        true
    }

    /// Record the outcome of the outstanding request; ignored when idle
    pub fn finish(&mut self, result: &Result<String>) {
        if !self.is_loading() {
            return;
        }
        self.state = match result {
            Ok(text) => InsightsState::Ready(text.clone()),
            Err(e) => InsightsState::Failed(InsightsFailure::from(e)),
        };
    }

    /// Drop any shown result, e.g. after the month's data changed
    pub fn reset(&mut self) {
        if !self.is_loading() {
            self.state = InsightsState::Idle;
            self.captured = None;
        }
    }

    /// Run one request end to end: begin, call, finish
    pub async fn run(
        &mut self,
        client: &InsightsClient,
        month: MonthKey,
        transactions: &[Transaction],
    ) -> Result<String> {
        let summary = crate::aggregate::summarize(transactions);
        if !self.begin(month, summary) {
            return Err(Error::InvalidData(
                "An insights request is already in progress".into(),
            ));
        }
        let result = client.budget_insights(&summary, transactions).await;
        self.finish(&result);
        result
    }
}
