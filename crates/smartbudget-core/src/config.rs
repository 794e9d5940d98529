//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/smartbudget/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables win over both:
//! - `SMARTBUDGET_DATA_DIR`: directory for persisted state
//! - `INSIGHTS_ENDPOINT`: base URL of the generative-AI API

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/smartbudget.toml");

/// Generation settings for the insights request
#[derive(Debug, Clone, PartialEq)]
pub struct InsightsConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub timeout: Duration,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding persisted state
    pub data_dir: PathBuf,
    pub insights: InsightsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: base_dir().join("state"),
            insights: InsightsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the override file if present, else the embedded defaults
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path().as_deref())
    }

    /// Load with a specific override path
    pub fn load_from(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) if path.exists() => fs::read_to_string(path)
                .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?,
            _ => DEFAULT_CONFIG.to_string(),
        };

        let mut config = parse_config(&content)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("SMARTBUDGET_DATA_DIR") {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(endpoint) = std::env::var("INSIGHTS_ENDPOINT") {
            if !endpoint.is_empty() {
                self.insights.endpoint = endpoint;
            }
        }
    }
}

/// Platform data dir for SmartBudget (falls back to the working directory)
pub fn base_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("smartbudget"))
        .unwrap_or_else(|| PathBuf::from(".smartbudget"))
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("smartbudget").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    storage: Option<RawStorage>,
    insights: Option<RawInsights>,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    endpoint: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    top_k: Option<u32>,
    timeout_secs: Option<u64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = AppConfig::default();

    if let Some(storage) = raw.storage {
        if let Some(dir) = storage.data_dir {
            config.data_dir = if dir.is_absolute() {
                dir
            } else {
                base_dir().join(dir)
            };
        }
    }

    if let Some(insights) = raw.insights {
        if let Some(endpoint) = insights.endpoint {
            config.insights.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(model) = insights.model {
            config.insights.model = model;
        }
        if let Some(temperature) = insights.temperature {
            config.insights.temperature = temperature;
        }
        if let Some(top_p) = insights.top_p {
            config.insights.top_p = top_p;
        }
        if let Some(top_k) = insights.top_k {
            config.insights.top_k = top_k;
        }
        if let Some(timeout) = insights.timeout_secs {
            config.insights.timeout = Duration::from_secs(timeout);
        }
    }

    Ok(config)
}
