//! Domain models for SmartBudget
//!
//! Field names serialize in camelCase so persisted state and exported
//! reports keep the same shape as the in-memory values.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Whether a transaction brings money in or sends it out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Category labels a transaction of this type may carry
    pub fn categories(&self) -> Vec<&'static str> {
        match self {
            Self::Income => IncomeCategory::all().iter().map(|c| c.as_str()).collect(),
            Self::Expense => ExpenseCategory::all().iter().map(|c| c.as_str()).collect(),
        }
    }

    /// Check a category label against this type's fixed set.
    ///
    /// Matching ignores ASCII case; the canonical label is returned.
    pub fn canonical_category(&self, category: &str) -> Option<&'static str> {
        self.categories()
            .into_iter()
            .find(|c| c.eq_ignore_ascii_case(category.trim()))
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed income categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeCategory {
    Salary,
    Freelance,
    SideHustle,
    Investments,
    Other,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::SideHustle => "Side Hustle",
            Self::Investments => "Investments",
            Self::Other => "Other",
        }
    }

    pub fn all() -> &'static [IncomeCategory] {
        &[
            Self::Salary,
            Self::Freelance,
            Self::SideHustle,
            Self::Investments,
            Self::Other,
        ]
    }
}

/// Fixed expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Housing,
    Utilities,
    Food,
    Transportation,
    Entertainment,
    Healthcare,
    Shopping,
    Subscriptions,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Food => "Food & Groceries",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Shopping => "Shopping",
            Self::Subscriptions => "Subscriptions",
            Self::Other => "Other",
        }
    }

    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Housing,
            Self::Utilities,
            Self::Food,
            Self::Transportation,
            Self::Entertainment,
            Self::Healthcare,
            Self::Shopping,
            Self::Subscriptions,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Income transaction this expense is notionally funded by.
    /// Display attribution only; may dangle after the income is deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl Transaction {
    /// Build a transaction from submitted form data and an id
    pub fn from_draft(id: impl Into<String>, draft: TransactionDraft) -> Self {
        let source_id = match draft.kind {
            TransactionType::Expense => draft.source_id.filter(|s| !s.is_empty()),
            TransactionType::Income => None,
        };
        Self {
            id: id.into(),
            kind: draft.kind,
            name: draft.name,
            amount: draft.amount,
            date: draft.date,
            category: draft.category,
            notes: draft.notes.filter(|n| !n.is_empty()),
            source_id,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Transaction fields as submitted by the add/edit form (everything but the id)
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionType,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub notes: Option<String>,
    pub source_id: Option<String>,
}

/// Coerce user-entered amount text to a non-negative number.
///
/// Parse failures, non-finite values and negatives all become 0.
pub fn coerce_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Year-month key identifying one budgeting period (`YYYY-MM`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month of the local clock
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        // Always valid: month is 1..=12 and day 1 exists in every month
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::str::FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || format!("Invalid month key: {} (use YYYY-MM)", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One month's transactions in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthData {
    pub month: MonthKey,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl MonthData {
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            transactions: Vec::new(),
        }
    }

    pub fn income(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_income())
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_expense())
    }
}

/// Month key → month data, ordered by month
pub type MonthMap = BTreeMap<MonthKey, MonthData>;

/// Display currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[default]
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Inr => "INR",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Inr => "₹",
            Self::Eur => "€",
            Self::Gbp => "£",
        }
    }

    pub fn all() -> &'static [Currency] {
        &[Self::Usd, Self::Inr, Self::Eur, Self::Gbp]
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "INR" => Ok(Self::Inr),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            _ => Err(format!("Unknown currency: {} (use USD, INR, EUR or GBP)", s)),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// User settings, merged over defaults on every load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub currency: Currency,
    pub language: String,
    /// Expense category → spending limit; absent means no limit
    #[serde(deserialize_with = "null_as_default")]
    pub category_budgets: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::Inr,
            language: "en-US".to_string(),
            category_budgets: BTreeMap::new(),
            gemini_api_key: None,
        }
    }
}

impl Settings {
    /// Configured limit for a category, if any
    pub fn budget_for(&self, category: &str) -> Option<f64> {
        self.category_budgets.get(category).copied()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Aggregate figures for one month (derived, never persisted)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    pub savings_rate: f64,
}
