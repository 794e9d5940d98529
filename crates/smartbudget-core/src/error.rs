//! Error types for SmartBudget

use thiserror::Error;

/// Message shown for any upstream insights failure
pub const INSIGHTS_UNAVAILABLE: &str =
    "I'm unable to provide insights at the moment. Please try again later.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// No credential was supplied and no environment default is set
    #[error("Missing Gemini API key")]
    MissingCredential,

    /// Network or upstream failure; the cause is logged, not surfaced
    #[error("I'm unable to provide insights at the moment. Please try again later.")]
    InsightsService,
}

impl Error {
    /// Whether the caller should prompt for configuration rather than show
    /// a generic failure
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
