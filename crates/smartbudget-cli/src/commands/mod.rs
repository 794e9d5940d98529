//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_store, active_month) and the months listing
//! - `export` - Month report export (JSON, CSV)
//! - `insights` - AI budget advice
//! - `reports` - Summary, budget status, trend and category reports
//! - `settings` - Currency, language, API key and budget limits
//! - `transactions` - Transaction commands (add, edit, delete, list)

pub mod core;
pub mod export;
pub mod insights;
pub mod reports;
pub mod settings;
pub mod transactions;

// Re-export command functions for main.rs
pub use core::*;
pub use export::*;
pub use insights::*;
pub use reports::*;
pub use settings::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
