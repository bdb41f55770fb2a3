//! Chart-ready summaries of a categorized transaction list.
//!
//! Every function is pure and treats an empty input as "nothing to report":
//! zero totals and empty series, never an error. Sums saturate at
//! `Decimal::MAX` instead of overflowing.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Direction, Transaction, UNCATEGORIZED};

/// How many merchants the spending bar chart shows.
pub const DEFAULT_TOP_MERCHANTS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionTotals {
    pub debit: Decimal,
    pub credit: Decimal,
}

impl DirectionTotals {
    pub fn get(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::Debit => self.debit,
            Direction::Credit => self.credit,
        }
    }

    /// Credits minus debits.
    pub fn net_cash_flow(&self) -> Decimal {
        self.credit - self.debit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantTotal {
    pub details: String,
    pub amount: Decimal,
}

/// A calendar month, ordered chronologically and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Debit totals for every (month, category) pair, for stacked bar charts.
///
/// `values[m][c]` is the total of `months[m]` and `categories[c]`. Pairs with
/// no transactions hold zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCategoryMatrix {
    pub months: Vec<YearMonth>,
    pub categories: Vec<String>,
    pub values: Vec<Vec<Decimal>>,
}

impl MonthlyCategoryMatrix {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// `None` only when the month or category does not appear in the matrix.
    pub fn get(&self, month: YearMonth, category: &str) -> Option<Decimal> {
        let m = self.months.iter().position(|&candidate| candidate == month)?;
        let c = self.categories.iter().position(|candidate| candidate == category)?;
        Some(self.values[m][c])
    }

    /// One month's amounts, in `categories` order.
    pub fn row(&self, month: YearMonth) -> Option<&[Decimal]> {
        let m = self.months.iter().position(|&candidate| candidate == month)?;
        Some(&self.values[m])
    }
}

fn accumulate(total: &mut Decimal, amount: Decimal) {
    *total = total.saturating_add(amount);
}

/// Sums `amount` per key, returning keys in first-encounter order.
fn sum_in_encounter_order<'a, I>(items: I) -> Vec<(&'a str, Decimal)>
where
    I: Iterator<Item = (&'a str, Decimal)>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, Decimal)> = Vec::new();

    for (key, amount) in items {
        match index.get(key) {
            Some(&i) => accumulate(&mut totals[i].1, amount),
            None => {
                index.insert(key, totals.len());
                totals.push((key, amount));
            }
        }
    }

    totals
}

/// Sorts by amount, largest first. The sort is stable, so equal amounts keep
/// their encounter order.
fn sort_descending(totals: &mut [(&str, Decimal)]) {
    totals.sort_by(|a, b| b.1.cmp(&a.1));
}

pub struct Aggregator<'a> {
    transactions: &'a [Transaction],
}

impl<'a> Aggregator<'a> {
    pub fn new(transactions: &'a [Transaction]) -> Self {
        Self { transactions }
    }

    fn in_direction(&self, direction: Direction) -> impl Iterator<Item = &'a Transaction> {
        self.transactions
            .iter()
            .filter(move |txn| txn.direction == direction)
    }

    pub fn total_by_direction(&self) -> DirectionTotals {
        self.transactions
            .iter()
            .fold(DirectionTotals::default(), |mut totals, txn| {
                match txn.direction {
                    Direction::Debit => accumulate(&mut totals.debit, txn.amount),
                    Direction::Credit => accumulate(&mut totals.credit, txn.amount),
                }
                totals
            })
    }

    /// Per-category sums for one direction, largest first.
    pub fn totals_by_category(&self, direction: Direction) -> Vec<CategoryTotal> {
        let mut totals = sum_in_encounter_order(
            self.in_direction(direction)
                .map(|txn| (txn.category.as_str(), txn.amount)),
        );
        sort_descending(&mut totals);

        totals
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
            })
            .collect()
    }

    /// The `n` largest groups of identical `details`, largest first.
    pub fn top_merchants(&self, n: usize, direction: Direction) -> Vec<MerchantTotal> {
        let mut totals = sum_in_encounter_order(
            self.in_direction(direction)
                .map(|txn| (txn.details.as_str(), txn.amount)),
        );
        sort_descending(&mut totals);

        totals
            .into_iter()
            .take(n)
            .map(|(details, amount)| MerchantTotal {
                details: details.to_string(),
                amount,
            })
            .collect()
    }

    /// Sum per calendar day. Days without transactions have no entry.
    pub fn daily_series(&self, direction: Direction) -> BTreeMap<NaiveDate, Decimal> {
        let mut series = BTreeMap::new();
        for txn in self.in_direction(direction) {
            accumulate(series.entry(txn.date).or_insert(Decimal::ZERO), txn.amount);
        }
        series
    }

    /// Sum per calendar month. Months without transactions have no entry.
    pub fn monthly_series(&self, direction: Direction) -> BTreeMap<YearMonth, Decimal> {
        let mut series = BTreeMap::new();
        for txn in self.in_direction(direction) {
            accumulate(
                series.entry(YearMonth::from(txn.date)).or_insert(Decimal::ZERO),
                txn.amount,
            );
        }
        series
    }

    /// Debit spending by month and category. Categories are sorted by name
    /// with the uncategorized label last.
    pub fn monthly_category_matrix(&self) -> MonthlyCategoryMatrix {
        let mut cells: HashMap<(YearMonth, &str), Decimal> = HashMap::new();
        let mut months: Vec<YearMonth> = Vec::new();
        let mut categories: Vec<&str> = Vec::new();

        for txn in self.in_direction(Direction::Debit) {
            let month = YearMonth::from(txn.date);
            if !months.contains(&month) {
                months.push(month);
            }
            if !categories.contains(&txn.category.as_str()) {
                categories.push(&txn.category);
            }
            accumulate(
                cells
                    .entry((month, txn.category.as_str()))
                    .or_insert(Decimal::ZERO),
                txn.amount,
            );
        }

        months.sort();
        categories.sort_by(|a, b| {
            (*a == UNCATEGORIZED)
                .cmp(&(*b == UNCATEGORIZED))
                .then_with(|| a.cmp(b))
        });

        let values = months
            .iter()
            .map(|&month| {
                categories
                    .iter()
                    .map(|&category| {
                        cells
                            .get(&(month, category))
                            .copied()
                            .unwrap_or(Decimal::ZERO)
                    })
                    .collect()
            })
            .collect();

        MonthlyCategoryMatrix {
            months,
            categories: categories.into_iter().map(str::to_string).collect(),
            values,
        }
    }
}
