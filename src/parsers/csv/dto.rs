use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{CsvAmount, CsvDate, OUTPUT_DATE_FORMAT};
use crate::errors::{FinPalError, FinPalResult};
use crate::types::{Direction, Transaction};

pub const DATE_COLUMN: &str = "Date";
pub const DETAILS_COLUMN: &str = "Details";
pub const AMOUNT_COLUMN: &str = "Amount";
pub const DIRECTION_COLUMN: &str = "Debit/Credit";
pub const CATEGORY_COLUMN: &str = "Category";

/// Header written by [`CsvTransactionRow`] exports, in column order.
pub const EXPORT_HEADER: [&str; 5] = [
    DATE_COLUMN,
    DETAILS_COLUMN,
    AMOUNT_COLUMN,
    DIRECTION_COLUMN,
    CATEGORY_COLUMN,
];

/// Positions of the required columns in a statement header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumns {
    date: usize,
    details: usize,
    amount: usize,
    direction: usize,
}

impl CsvColumns {
    /// Resolves the required columns, ignoring case and surrounding whitespace.
    pub fn from_headers(headers: &StringRecord) -> FinPalResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
        };

        let (date, details, amount, direction) = (
            find(DATE_COLUMN),
            find(DETAILS_COLUMN),
            find(AMOUNT_COLUMN),
            find(DIRECTION_COLUMN),
        );

        match (date, details, amount, direction) {
            (Some(date), Some(details), Some(amount), Some(direction)) => Ok(Self {
                date,
                details,
                amount,
                direction,
            }),
            _ => {
                let missing: Vec<&str> = [
                    (date, DATE_COLUMN),
                    (details, DETAILS_COLUMN),
                    (amount, AMOUNT_COLUMN),
                    (direction, DIRECTION_COLUMN),
                ]
                .into_iter()
                .filter(|(position, _)| position.is_none())
                .map(|(_, name)| name)
                .collect();

                Err(FinPalError::Schema(format!(
                    "missing column(s): {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn extract(&self, record: &StringRecord) -> Result<CsvTransactionRaw, String> {
        let cell = |index: usize, name: &str| {
            record
                .get(index)
                .map(str::to_string)
                .ok_or_else(|| format!("Missing {} field", name))
        };

        Ok(CsvTransactionRaw {
            date: cell(self.date, DATE_COLUMN)?,
            details: cell(self.details, DETAILS_COLUMN)?,
            amount: cell(self.amount, AMOUNT_COLUMN)?,
            direction: cell(self.direction, DIRECTION_COLUMN)?,
        })
    }
}

/// One statement row exactly as it appeared in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTransactionRaw {
    pub date: String,
    pub details: String,
    pub amount: String,
    pub direction: String,
}

impl CsvTransactionRaw {
    pub fn into_transaction<S: AsRef<str>>(self, date_formats: &[S]) -> Result<Transaction, String> {
        let date = CsvDate::from(self.date).parse_with(date_formats)?;
        let amount: Decimal = CsvAmount::from(self.amount).try_into()?;
        let direction: Direction = self.direction.parse()?;

        Ok(Transaction::new(date, self.details.trim(), amount, direction))
    }
}

/// Row layout used when writing categorized transactions back to CSV.
#[derive(Debug, Serialize)]
pub struct CsvTransactionRow<'a> {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Details")]
    pub details: &'a str,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Debit/Credit")]
    pub direction: &'static str,
    #[serde(rename = "Category")]
    pub category: &'a str,
}

impl<'a> From<&'a Transaction> for CsvTransactionRow<'a> {
    fn from(txn: &'a Transaction) -> Self {
        Self {
            date: format_date(txn.date),
            details: &txn.details,
            amount: txn.amount.to_string(),
            direction: txn.direction.as_str(),
            category: &txn.category,
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(OUTPUT_DATE_FORMAT).to_string()
}
