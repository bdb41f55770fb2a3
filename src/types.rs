use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label given to transactions that no category matched.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Whether money left (`Debit`) or entered (`Credit`) the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "Debit",
            Direction::Credit => "Credit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("debit") {
            Ok(Direction::Debit)
        } else if token.eq_ignore_ascii_case("credit") {
            Ok(Direction::Credit)
        } else {
            Err(format!("Invalid direction: {:?}", token))
        }
    }
}

/// One normalized statement row.
///
/// `amount` is always a non-negative magnitude; `direction` carries the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub details: String,
    pub amount: Decimal,
    pub direction: Direction,
    pub category: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, details: impl Into<String>, amount: Decimal, direction: Direction) -> Self {
        Self {
            date,
            details: details.into(),
            amount,
            direction,
            category: UNCATEGORIZED.to_string(),
        }
    }

    /// Amount with accounting sign: negative for debits, positive for credits.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Debit => -self.amount,
            Direction::Credit => self.amount,
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }
}
