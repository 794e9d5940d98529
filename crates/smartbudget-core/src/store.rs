//! In-memory budget state with write-through persistence
//!
//! `Store` owns the month map and settings. Every mutation is applied to a
//! copy of the affected value, written through the `KeyValueStore`, and only
//! then swapped in. A failed write leaves the store as it was.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::aggregate::summarize;
use crate::error::{Error, Result};
use crate::models::{
    BudgetSummary, Currency, MonthData, MonthKey, MonthMap, Settings, Transaction,
    TransactionDraft,
};
use crate::storage::{self, KeyValueStore};

/// Label shown for expenses with no (or a deleted) funding source
pub const DEFAULT_SOURCE_LABEL: &str = "General";

/// An income transaction offered as a funding source
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeSource {
    pub id: String,
    pub name: String,
}

pub struct Store {
    backend: Box<dyn KeyValueStore>,
    months: MonthMap,
    settings: Settings,
}

impl Store {
    /// Load persisted state, falling back to defaults for anything missing or malformed
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let months = storage::load_months(backend.as_ref());
        let settings = storage::load_settings(backend.as_ref());
        debug!(months = months.len(), "Loaded budget state");
        Self {
            backend,
            months,
            settings,
        }
    }

    pub fn months(&self) -> &MonthMap {
        &self.months
    }

    /// Month keys in ascending order
    pub fn month_keys(&self) -> Vec<MonthKey> {
        self.months.keys().copied().collect()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Transactions for a month, in insertion order (empty if never recorded)
    pub fn transactions(&self, month: MonthKey) -> &[Transaction] {
        self.months
            .get(&month)
            .map(|m| m.transactions.as_slice())
            .unwrap_or(&[])
    }

    /// Month data, or an empty entry if the month was never recorded
    pub fn month(&self, month: MonthKey) -> MonthData {
        self.months
            .get(&month)
            .cloned()
            .unwrap_or_else(|| MonthData::empty(month))
    }

    pub fn summary(&self, month: MonthKey) -> BudgetSummary {
        summarize(self.transactions(month))
    }

    /// Find a transaction by id anywhere in the dataset
    pub fn find_transaction(&self, id: &str) -> Option<(MonthKey, &Transaction)> {
        self.months.iter().find_map(|(key, data)| {
            data.transactions
                .iter()
                .find(|t| t.id == id)
                .map(|t| (*key, t))
        })
    }

    /// Record that a month has been viewed so it appears in reports
    pub fn touch_month(&mut self, month: MonthKey) -> Result<()> {
        if self.months.contains_key(&month) {
            return Ok(());
        }
        let mut months = self.months.clone();
        months.insert(month, MonthData::empty(month));
        self.commit_months(months)
    }

    /// Append a new transaction with a fresh id
    pub fn add_transaction(
        &mut self,
        month: MonthKey,
        draft: TransactionDraft,
    ) -> Result<Transaction> {
        let id = self.generate_id();
        let tx = Transaction::from_draft(id, draft);

        let mut months = self.months.clone();
        months
            .entry(month)
            .or_insert_with(|| MonthData::empty(month))
            .transactions
            .push(tx.clone());

        self.commit_months(months)?;
        debug!(id = %tx.id, %month, kind = %tx.kind, amount = tx.amount, "Added transaction");
        Ok(tx)
    }

    /// Replace a transaction wholesale, keeping its id and position
    pub fn update_transaction(
        &mut self,
        month: MonthKey,
        id: &str,
        draft: TransactionDraft,
    ) -> Result<Transaction> {
        let mut months = self.months.clone();
        let slot = months
            .get_mut(&month)
            .and_then(|m| m.transactions.iter_mut().find(|t| t.id == id))
            .ok_or_else(|| Error::NotFound(format!("Transaction {} in {}", id, month)))?;

        let updated = Transaction::from_draft(id, draft);
        *slot = updated.clone();

        self.commit_months(months)?;
        debug!(id, %month, "Updated transaction");
        Ok(updated)
    }

    /// Remove a transaction, returning it if it existed.
    ///
    /// Expenses that referenced a deleted income keep their `source_id`; it
    /// resolves to `DEFAULT_SOURCE_LABEL` from then on.
    pub fn delete_transaction(&mut self, month: MonthKey, id: &str) -> Result<Option<Transaction>> {
        let mut months = self.months.clone();
        let Some(data) = months.get_mut(&month) else {
            return Ok(None);
        };
        let Some(pos) = data.transactions.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = data.transactions.remove(pos);

        if removed.is_income() {
            let dangling = data
                .transactions
                .iter()
                .filter(|t| t.source_id.as_deref() == Some(id))
                .count();
            if dangling > 0 {
                warn!(id, dangling, "Deleted income is still referenced by expenses");
            }
        }

        self.commit_months(months)?;
        debug!(id, %month, "Deleted transaction");
        Ok(Some(removed))
    }

    /// Income transactions of a month, offered as expense funding sources
    pub fn income_sources(&self, month: MonthKey) -> Vec<IncomeSource> {
        self.transactions(month)
            .iter()
            .filter(|t| t.is_income())
            .map(|t| IncomeSource {
                id: t.id.clone(),
                name: t.name.clone(),
            })
            .collect()
    }

    /// Display name of an expense's funding source
    pub fn source_name(&self, month: MonthKey, source_id: Option<&str>) -> String {
        source_id
            .and_then(|id| {
                self.transactions(month)
                    .iter()
                    .find(|t| t.is_income() && t.id == id)
            })
            .map(|t| t.name.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string())
    }

    pub fn set_currency(&mut self, currency: Currency) -> Result<()> {
        self.update_settings(|s| s.currency = currency)
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        let language = language.trim().to_string();
        self.update_settings(|s| s.language = language)
    }

    /// Set a category limit; 0 stores "no limit"
    pub fn set_budget(&mut self, category: &str, limit: f64) -> Result<()> {
        let limit = if limit.is_finite() && limit > 0.0 {
            limit
        } else {
            0.0
        };
        let category = category.to_string();
        self.update_settings(|s| {
            s.category_budgets.insert(category, limit);
        })
    }

    pub fn clear_budget(&mut self, category: &str) -> Result<bool> {
        let mut removed = false;
        self.update_settings(|s| removed = s.category_budgets.remove(category).is_some())?;
        Ok(removed)
    }

    /// Store or clear the insights credential (blank clears)
    pub fn set_api_key(&mut self, key: Option<&str>) -> Result<()> {
        let key = key.map(str::trim).filter(|k| !k.is_empty()).map(String::from);
        self.update_settings(|s| s.gemini_api_key = key)
    }

    /// Apply a change to settings and persist them
    pub fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut settings = self.settings.clone();
        change(&mut settings);
        storage::save_settings(self.backend.as_ref(), &settings)?;
        self.settings = settings;
        Ok(())
    }

    /// Persist `months`, then make it the current state
    fn commit_months(&mut self, months: MonthMap) -> Result<()> {
        storage::save_months(self.backend.as_ref(), &months)?;
        self.months = months;
        Ok(())
    }

    fn generate_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.find_transaction(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn month() -> MonthKey {
        "2024-03".parse().unwrap()
    }

    fn draft(kind: TransactionType, name: &str, category: &str, amount: f64) -> TransactionDraft {
        TransactionDraft {
            kind,
            name: name.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            category: category.to_string(),
            notes: None,
            source_id: None,
        }
    }

    fn store() -> Store {
        Store::load(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let mut store = store();
        let a = store
            .add_transaction(month(), draft(TransactionType::Income, "Salary", "Salary", 5000.0))
            .unwrap();
        let b = store
            .add_transaction(month(), draft(TransactionType::Expense, "Rent", "Housing", 1200.0))
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.transactions(month()).len(), 2);
    }

    #[test]
    fn test_add_then_delete_restores_summary() {
        let mut store = store();
        store
            .add_transaction(month(), draft(TransactionType::Income, "Salary", "Salary", 5000.0))
            .unwrap();
        let before = store.summary(month());

        let tx = store
            .add_transaction(month(), draft(TransactionType::Expense, "Rent", "Housing", 1200.0))
            .unwrap();
        assert_ne!(store.summary(month()), before);

        let removed = store.delete_transaction(month(), &tx.id).unwrap();
        assert_eq!(removed, Some(tx));
        assert_eq!(store.summary(month()), before);
    }

    #[test]
    fn test_update_preserves_id_and_position() {
        let mut store = store();
        let a = store
            .add_transaction(month(), draft(TransactionType::Expense, "A", "Shopping", 10.0))
            .unwrap();
        let b = store
            .add_transaction(month(), draft(TransactionType::Expense, "B", "Shopping", 20.0))
            .unwrap();
        let c = store
            .add_transaction(month(), draft(TransactionType::Expense, "C", "Shopping", 30.0))
            .unwrap();

        let updated = store
            .update_transaction(month(), &b.id, draft(TransactionType::Expense, "B2", "Other", 25.0))
            .unwrap();
        assert_eq!(updated.id, b.id);

        let ids: Vec<&str> = store
            .transactions(month())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec![a.id.as_str(), b.id.as_str(), c.id.as_str()]);
        assert_eq!(store.transactions(month())[1].name, "B2");
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = store();
        let err = store
            .update_transaction(month(), "nope", draft(TransactionType::Expense, "X", "Other", 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = store();
        assert_eq!(store.delete_transaction(month(), "nope").unwrap(), None);
    }

    #[test]
    fn test_dangling_source_falls_back_to_default_label() {
        let mut store = store();
        let salary = store
            .add_transaction(month(), draft(TransactionType::Income, "Salary", "Salary", 5000.0))
            .unwrap();
        let mut rent = draft(TransactionType::Expense, "Rent", "Housing", 1200.0);
        rent.source_id = Some(salary.id.clone());
        let rent = store.add_transaction(month(), rent).unwrap();

        assert_eq!(store.source_name(month(), rent.source_id.as_deref()), "Salary");
        assert_eq!(store.income_sources(month()).len(), 1);

        store.delete_transaction(month(), &salary.id).unwrap();
        let rent = store.find_transaction(&rent.id).unwrap().1.clone();
        assert_eq!(rent.source_id.as_deref(), Some(salary.id.as_str()));
        assert_eq!(
            store.source_name(month(), rent.source_id.as_deref()),
            DEFAULT_SOURCE_LABEL
        );
        assert_eq!(store.source_name(month(), None), DEFAULT_SOURCE_LABEL);
    }

    #[test]
    fn test_mutations_persist() {
        let backend = std::sync::Arc::new(MemoryStore::new());

        struct Shared(std::sync::Arc<MemoryStore>);
        impl KeyValueStore for Shared {
            fn get(&self, key: &str) -> Result<Option<String>> {
                self.0.get(key)
            }
            fn set(&self, key: &str, value: &str) -> Result<()> {
                self.0.set(key, value)
            }
        }

        let mut store = Store::load(Box::new(Shared(backend.clone())));
        store
            .add_transaction(month(), draft(TransactionType::Income, "Salary", "Salary", 5000.0))
            .unwrap();
        store.set_currency(Currency::Usd).unwrap();
        store.set_budget("Housing", 900.0).unwrap();

        let reloaded = Store::load(Box::new(Shared(backend)));
        assert_eq!(reloaded.months(), store.months());
        assert_eq!(reloaded.settings().currency, Currency::Usd);
        assert_eq!(reloaded.settings().budget_for("Housing"), Some(900.0));
    }

    /// Backend whose writes fail once `broken` is set
    struct FlakyStore {
        inner: MemoryStore,
        broken: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.broken.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(Error::InvalidData("disk full".into()));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let broken = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let mut store = Store::load(Box::new(FlakyStore {
            inner: MemoryStore::new(),
            broken: broken.clone(),
        }));
        let salary = store
            .add_transaction(month(), draft(TransactionType::Income, "Salary", "Salary", 5000.0))
            .unwrap();
        store.set_budget("Housing", 900.0).unwrap();
        let months = store.months().clone();
        let settings = store.settings().clone();

        broken.store(true, std::sync::atomic::Ordering::SeqCst);
        let april: MonthKey = "2024-04".parse().unwrap();

        assert!(store
            .add_transaction(month(), draft(TransactionType::Expense, "Rent", "Housing", 1200.0))
            .is_err());
        let bonus = draft(TransactionType::Income, "Bonus", "Other", 1.0);
        assert!(store.update_transaction(month(), &salary.id, bonus).is_err());
        assert!(store.delete_transaction(month(), &salary.id).is_err());
        assert!(store.touch_month(april).is_err());
        assert!(store.set_currency(Currency::Eur).is_err());
        assert!(store.clear_budget("Housing").is_err());

        assert_eq!(store.months(), &months);
        assert_eq!(store.settings(), &settings);
    }

    #[test]
    fn test_settings_mutators() {
        let mut store = store();
        store.set_budget("Shopping", -5.0).unwrap();
        assert_eq!(store.settings().budget_for("Shopping"), Some(0.0));
        assert!(store.clear_budget("Shopping").unwrap());
        assert!(!store.clear_budget("Shopping").unwrap());

        store.set_api_key(Some("  secret ")).unwrap();
        assert_eq!(store.settings().gemini_api_key.as_deref(), Some("secret"));
        store.set_api_key(Some("")).unwrap();
        assert_eq!(store.settings().gemini_api_key, None);
    }

    #[test]
    fn test_touch_month() {
        let mut store = store();
        store.touch_month(month()).unwrap();
        assert_eq!(store.month_keys(), vec![month()]);
        assert!(store.transactions(month()).is_empty());
    }
}
