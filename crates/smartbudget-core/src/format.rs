//! Display formatting for amounts, months and dates

use chrono::NaiveDate;

use crate::models::{Currency, MonthKey};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Format an amount the way the currency's home locale writes it.
///
/// USD/GBP use `,` grouping and a leading symbol, INR uses Indian lakh
/// grouping, EUR follows de-DE (`.` grouping, `,` decimals, trailing symbol).
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = format!("{:02}", cents % 100);
    let sign = if negative && cents > 0 { "-" } else { "" };

    match currency {
        Currency::Usd | Currency::Gbp => format!(
            "{}{}{}.{}",
            sign,
            currency.symbol(),
            group_thousands(&whole, ','),
            frac
        ),
        Currency::Inr => format!(
            "{}{}{}.{}",
            sign,
            currency.symbol(),
            group_indian(&whole),
            frac
        ),
        Currency::Eur => format!(
            "{}{},{} {}",
            sign,
            group_thousands(&whole, '.'),
            frac,
            currency.symbol()
        ),
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

// 12,34,56,789: last three digits, then groups of two
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::new();
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}

/// `2024-03` → `March 2024`
pub fn month_name(month: MonthKey) -> String {
    format!("{} {}", MONTH_NAMES[month.month() as usize - 1], month.year())
}

/// `2024-03` → `Mar`
pub fn month_short(month: MonthKey) -> &'static str {
    &MONTH_NAMES[month.month() as usize - 1][..3]
}

/// `2024-03-05` → `Mar 5, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
