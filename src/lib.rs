//! Categorize bank statement transactions by keyword and summarize them for
//! personal finance dashboards.
//!
//! ```rust,ignore
//! use finpal::{Direction, ImportBuilder, Session};
//!
//! let mut session = Session::open("categories.json")?;
//! session.add_category("Groceries")?;
//! session.add_keyword("Groceries", "loblaws")?;
//!
//! let skipped = session.import(ImportBuilder::new().filename("statement.csv"))?;
//! let spending = session.aggregator().totals_by_category(Direction::Debit);
//! ```

mod builder;
mod types;

pub mod aggregator;
pub mod categorizer;
pub mod errors;
pub mod parsers;
pub mod session;
pub mod store;

pub use aggregator::{
    Aggregator, CategoryTotal, DEFAULT_TOP_MERCHANTS, DirectionTotals, MerchantTotal,
    MonthlyCategoryMatrix, YearMonth,
};
pub use builder::{ImportBuilder, ImportReport};
pub use categorizer::categorize;
pub use errors::{FinPalError, FinPalResult, MalformedRowError};
pub use parsers::prelude::*;
pub use session::Session;
pub use store::{Category, CategoryFile, CategoryStore, DEFAULT_CATEGORY_FILE};
pub use types::{Direction, Transaction, UNCATEGORIZED};
