//! Expense domain types.

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Currency an expense is denominated in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Other(String),
}

impl Currency {
    /// Currencies offered by the interactive menus, in display order.
    pub const SUPPORTED: [Currency; 4] =
        [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Jpy];

    pub fn code(&self) -> &str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Other(code) => code,
        }
    }

    /// Display symbol, falling back to the code for currencies without one.
    pub fn symbol(&self) -> &str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Other(code) => code,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Currency::Other(_))
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        match code.as_str() {
            "" => Err(anyhow!("Currency code cannot be empty")),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            _ => Ok(Currency::Other(code)),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

/// How often an expense recurs. Each frequency has its own summary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    pub fn period(&self) -> Period {
        match self {
            Frequency::Daily => Period::Day,
            Frequency::Weekly => Period::Week,
            Frequency::Monthly => Period::Month,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Frequency::Daily => "daily",
                Frequency::Weekly => "weekly",
                Frequency::Monthly => "monthly",
            }
        )
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(anyhow!("Invalid frequency: {}", s)),
        }
    }
}

/// Time bucket used to group expenses in a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// Bucket key for `date`. Weeks start on Sunday; days before the first
    /// Sunday of the year fall in week 00.
    pub fn bucket_key(&self, date: NaiveDate) -> String {
        match self {
            Period::Day => date.format("%Y-%m-%d").to_string(),
            Period::Week => date.format("%Y-W%U").to_string(),
            Period::Month => date.format("%Y-%m").to_string(),
        }
    }
}

/// Unvalidated shape of a stored expense.
#[derive(Deserialize)]
pub struct ExpenseRecord {
    date: NaiveDate,
    amount: f64,
    currency: Currency,
    category: String,
    frequency: Frequency,
}

/// A single logged expense. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRecord")]
pub struct Expense {
    date: NaiveDate,
    amount: f64,
    currency: Currency,
    category: String,
    frequency: Frequency,
}

impl Expense {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        currency: Currency,
        category: impl Into<String>,
        frequency: Frequency,
    ) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            bail!("Amount must be positive, got {}", amount);
        }
        let category = category.into().trim().to_string();
        if category.is_empty() {
            bail!("Category cannot be empty");
        }
        Ok(Self {
            date,
            amount,
            currency,
            category,
            frequency,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = anyhow::Error;

    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        Expense::new(
            record.date,
            record.amount,
            record.currency,
            record.category,
            record.frequency,
        )
    }
}

/// Known expense categories. Ordered and free of duplicates; new labels can
/// be registered at entry time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryRegistry {
    labels: Vec<String>,
}

pub const DEFAULT_CATEGORIES: [&str; 3] = ["Food", "Transport", "Entertainment"];

impl CategoryRegistry {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for label in labels {
            // Blank labels are skipped
            let _ = registry.register(label.as_ref());
        }
        registry
    }

    /// Adds `label` unless it is already known and returns the stored label.
    pub fn register(&mut self, label: &str) -> Result<String> {
        let label = label.trim();
        if label.is_empty() {
            bail!("Category name cannot be empty");
        }
        if !self.contains(label) {
            self.labels.push(label.to_string());
        }
        Ok(label.to_string())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_currency_parse_and_symbol() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" GBP ".parse::<Currency>().unwrap(), Currency::Gbp);
        assert_eq!(
            "chf".parse::<Currency>().unwrap(),
            Currency::Other("CHF".to_string())
        );
        assert!("  ".parse::<Currency>().is_err());

        assert_eq!(Currency::Usd.symbol(), "$");
        assert_eq!(Currency::Eur.symbol(), "€");
        assert_eq!(Currency::Gbp.symbol(), "£");
        assert_eq!(Currency::Jpy.symbol(), "¥");
        assert_eq!(Currency::Other("CHF".to_string()).symbol(), "CHF");
        assert!(!Currency::Other("CHF".to_string()).is_supported());
    }

    #[test]
    fn test_frequency_maps_to_period() {
        assert_eq!(Frequency::Daily.period(), Period::Day);
        assert_eq!(Frequency::Weekly.period(), Period::Week);
        assert_eq!(Frequency::Monthly.period(), Period::Month);
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!("yearly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_bucket_keys() {
        let d = date(2024, 1, 5);
        assert_eq!(Period::Day.bucket_key(d), "2024-01-05");
        assert_eq!(Period::Month.bucket_key(d), "2024-01");
        // 2024-01-07 is the first Sunday of 2024
        assert_eq!(Period::Week.bucket_key(d), "2024-W00");
        assert_eq!(Period::Week.bucket_key(date(2024, 1, 7)), "2024-W01");
        assert_eq!(Period::Week.bucket_key(date(2024, 1, 13)), "2024-W01");
        assert_eq!(Period::Week.bucket_key(date(2024, 1, 14)), "2024-W02");
    }

    #[test]
    fn test_expense_rejects_non_positive_amount() {
        let d = date(2024, 1, 5);
        assert!(Expense::new(d, 0.0, Currency::Usd, "Food", Frequency::Daily).is_err());
        assert!(Expense::new(d, -3.5, Currency::Usd, "Food", Frequency::Daily).is_err());
        assert!(Expense::new(d, f64::NAN, Currency::Usd, "Food", Frequency::Daily).is_err());
        assert!(Expense::new(d, 1.0, Currency::Usd, "  ", Frequency::Daily).is_err());
        assert!(Expense::new(d, 0.01, Currency::Usd, "Food", Frequency::Daily).is_ok());
    }

    #[test]
    fn test_expense_json_shape() {
        let expense =
            Expense::new(date(2024, 1, 5), 10.5, Currency::Eur, "Food", Frequency::Weekly)
                .unwrap();
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2024-01-05",
                "amount": 10.5,
                "currency": "EUR",
                "category": "Food",
                "frequency": "weekly"
            })
        );
    }

    #[test]
    fn test_expense_deserialization_validates() {
        let bad_amount = r#"{"date":"2024-01-05","amount":-1,"currency":"USD","category":"Food","frequency":"daily"}"#;
        assert!(serde_json::from_str::<Expense>(bad_amount).is_err());

        let bad_frequency = r#"{"date":"2024-01-05","amount":1,"currency":"USD","category":"Food","frequency":"yearly"}"#;
        assert!(serde_json::from_str::<Expense>(bad_frequency).is_err());

        let bad_date = r#"{"date":"05/01/2024","amount":1,"currency":"USD","category":"Food","frequency":"daily"}"#;
        assert!(serde_json::from_str::<Expense>(bad_date).is_err());

        let lowercase_currency = r#"{"date":"2024-01-05","amount":1,"currency":"usd","category":"Food","frequency":"daily"}"#;
        let expense: Expense = serde_json::from_str(lowercase_currency).unwrap();
        assert_eq!(expense.currency(), &Currency::Usd);
    }

    #[test]
    fn test_category_registry() {
        let mut registry = CategoryRegistry::new(DEFAULT_CATEGORIES);
        assert_eq!(registry.len(), 3);

        assert_eq!(registry.register(" Rent ").unwrap(), "Rent");
        assert_eq!(registry.register("Food").unwrap(), "Food");
        assert_eq!(
            registry.labels(),
            &["Food", "Transport", "Entertainment", "Rent"]
        );
        assert!(registry.register("   ").is_err());
        assert!(registry.contains("Rent"));
    }
}
