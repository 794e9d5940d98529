//! Mock backend for testing
//!
//! Produces canned advice without a network call. Selected with
//! `INSIGHTS_BACKEND=mock` for offline use.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::InsightsBackend;

/// Mock insights backend
///
/// Returns three fixed bullet points, echoing the savings-rate line of the
/// prompt so callers can see which figures were sent.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// When true every request fails
    pub fail: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// A backend whose requests always fail
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl InsightsBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.fail {
            return Err(Error::InvalidData("mock backend failure".into()));
        }

        let rate = prompt
            .lines()
            .find(|l| l.starts_with("Savings Rate:"))
            .unwrap_or("Savings Rate: unknown");

        Ok(format!(
            "* Your {} is a good baseline; aim to raise it a little each month.\n\
             * Review your largest expense category and set a monthly limit for it.\n\
             * Move a fixed amount into savings on payday before spending.",
            rate.to_lowercase()
        ))
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
