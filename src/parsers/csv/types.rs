use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date formats tried, in order, when none are configured.
///
/// The first one is what bank exports use (`15 Feb 2025`).
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Format used when writing dates back out.
pub const OUTPUT_DATE_FORMAT: &str = "%d %b %Y";

/// Raw `Date` cell of a statement row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvDate(String);

impl CsvDate {
    /// Tries each format in order and returns the first successful parse.
    pub fn parse_with<S: AsRef<str>>(&self, formats: &[S]) -> Result<NaiveDate, String> {
        let s = self.0.trim();
        if s.is_empty() {
            return Err("Missing date".to_string());
        }

        formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(s, AsRef::<str>::as_ref(format)).ok())
            .ok_or_else(|| format!("Invalid date: {:?}", s))
    }
}

impl From<String> for CsvDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CsvDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<CsvDate> for NaiveDate {
    type Error = String;

    fn try_from(date: CsvDate) -> Result<Self, Self::Error> {
        date.parse_with(DEFAULT_DATE_FORMATS)
    }
}

/// Largest amount a single statement row may carry.
///
/// Keeps sums over any realistic upload well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Raw `Amount` cell. Thousands separators are allowed, signs are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvAmount(String);

impl From<&str> for CsvAmount {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CsvAmount {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl TryFrom<CsvAmount> for Decimal {
    type Error = String;

    fn try_from(amount: CsvAmount) -> Result<Self, Self::Error> {
        let cleaned = amount.0.trim().replace(',', "");
        if cleaned.is_empty() {
            return Err("Missing amount".to_string());
        }

        let value = cleaned
            .parse::<Decimal>()
            .map_err(|_| format!("Invalid amount: {:?}", amount.0.trim()))?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(format!("Negative amount: {}", value));
        }
        if value > MAX_AMOUNT {
            return Err(format!("Amount too large: {}", value));
        }

        Ok(value)
    }
}
