//! One user's working state: the category file, its store and the current
//! upload.
//!
//! Every store edit is written to disk immediately and the current upload is
//! re-categorized, so the transaction list always reflects the latest rules.
//! An edit whose save fails is dropped: the in-memory store only ever holds
//! what is on disk.
//! Two sessions sharing one category file are not coordinated; the last one
//! to save wins.

use std::path::PathBuf;

use crate::aggregator::Aggregator;
use crate::builder::{ImportBuilder, ImportReport};
use crate::categorizer::categorize;
use crate::errors::{FinPalError, FinPalResult, MalformedRowError};
use crate::parsers::csv::write_csv;
use crate::store::{CategoryFile, CategoryStore};
use crate::types::{Direction, Transaction, UNCATEGORIZED};

#[derive(Debug)]
pub struct Session {
    file: CategoryFile,
    store: CategoryStore,
    transactions: Vec<Transaction>,
    row_errors: Vec<MalformedRowError>,
}

impl Session {
    /// Loads the category file at `path`, starting empty if it is missing or
    /// unreadable as JSON.
    pub fn open(path: impl Into<PathBuf>) -> FinPalResult<Self> {
        let file = CategoryFile::new(path);
        let store = file.load()?;

        Ok(Self {
            file,
            store,
            transactions: Vec::new(),
            row_errors: Vec::new(),
        })
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn category_file(&self) -> &CategoryFile {
        &self.file
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Rows skipped by the last import.
    pub fn row_errors(&self) -> &[MalformedRowError] {
        &self.row_errors
    }

    pub fn debits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.direction == Direction::Debit)
    }

    pub fn credits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.direction == Direction::Credit)
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.transactions)
    }

    /// Replaces the current upload with a freshly parsed and categorized one.
    ///
    /// Schema errors abort and leave the previous upload in place. Skipped
    /// rows are returned and also kept in [`Session::row_errors`].
    pub fn import(&mut self, builder: ImportBuilder) -> FinPalResult<&[MalformedRowError]> {
        let report = builder.parse()?;
        if report.has_errors() {
            tracing::warn!(skipped = report.errors.len(), "statement has malformed rows");
        }
        let ImportReport { records, errors } = report;

        tracing::info!(
            transactions = records.len(),
            skipped = errors.len(),
            "imported statement"
        );

        self.transactions = categorize(&records, &self.store);
        self.row_errors = errors;
        Ok(&self.row_errors)
    }

    pub fn recategorize(&mut self) {
        self.transactions = categorize(&self.transactions, &self.store);
    }

    /// Applies `change` to a copy of the store and swaps the copy in only
    /// after it has been saved. Returns whether the store changed.
    fn update<T>(
        &mut self,
        change: impl FnOnce(&mut CategoryStore) -> FinPalResult<T>,
    ) -> FinPalResult<(T, bool)> {
        let mut store = self.store.clone();
        let value = change(&mut store)?;
        if store == self.store {
            return Ok((value, false));
        }

        self.file.save(&store)?;
        self.store = store;
        Ok((value, true))
    }

    fn edit<T>(
        &mut self,
        change: impl FnOnce(&mut CategoryStore) -> FinPalResult<T>,
    ) -> FinPalResult<T> {
        let (value, changed) = self.update(change)?;
        if changed {
            self.recategorize();
        }
        Ok(value)
    }

    pub fn add_category(&mut self, name: &str) -> FinPalResult<()> {
        self.edit(|store| store.add_category(name))
    }

    pub fn rename_category(&mut self, old: &str, new: &str) -> FinPalResult<()> {
        self.edit(|store| store.rename_category(old, new))
    }

    /// Removes the category; its transactions fall back to the uncategorized
    /// label unless another category's keywords now match them.
    pub fn delete_category(&mut self, name: &str) -> FinPalResult<()> {
        self.edit(|store| store.delete_category(name).map(drop))
    }

    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> FinPalResult<bool> {
        self.edit(|store| store.add_keyword(category, keyword))
    }

    pub fn remove_keyword(&mut self, category: &str, keyword: &str) -> FinPalResult<bool> {
        self.edit(|store| store.remove_keyword(category, keyword))
    }

    /// Manually assigns the transaction at `index` to `category` and teaches
    /// the store its details as a keyword of that category, so the next
    /// upload of the same merchant is tagged automatically.
    ///
    /// Other transactions are not re-categorized here. The override holds
    /// until the next import or store edit, at which point the first matching
    /// category decides again.
    pub fn assign_category(&mut self, index: usize, category: &str) -> FinPalResult<()> {
        if index >= self.transactions.len() {
            return Err(FinPalError::UnknownTransaction(index));
        }

        let category = category.trim();
        if category != UNCATEGORIZED {
            let details = self.transactions[index].details.clone();
            self.update(|store| store.add_keyword(category, &details))?;
        }

        tracing::debug!(index, category, "manually assigned category");
        self.transactions[index].category = category.to_string();
        Ok(())
    }

    /// The current upload as CSV, including each row's category.
    pub fn export_csv(&self) -> FinPalResult<String> {
        write_csv(&self.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{CategoryTotal, MerchantTotal};
    use rust_decimal::Decimal;
    use std::fs;
    use std::str::FromStr;
    use tempfile::TempDir;

    const STATEMENT: &str = "Date,Details,Amount,Debit/Credit
15 Feb 2025,Loblaws,112.45,Debit
28 Feb 2025,Card Payment Received,4500.00,Credit
";

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn open_session() -> (TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(dir.path().join("categories.json")).unwrap();
        (dir, session)
    }

    fn groceries_session() -> (TempDir, Session) {
        let (dir, mut session) = open_session();
        session.add_category("Groceries").unwrap();
        session.add_keyword("Groceries", "loblaws").unwrap();
        session.import(ImportBuilder::new().content(STATEMENT)).unwrap();
        (dir, session)
    }

    fn categories(session: &Session) -> Vec<&str> {
        session.transactions().iter().map(|t| t.category.as_str()).collect()
    }

    #[test]
    fn test_statement_example() {
        let (_dir, session) = groceries_session();

        assert_eq!(categories(&session), vec!["Groceries", UNCATEGORIZED]);

        let aggregator = session.aggregator();
        let totals = aggregator.total_by_direction();
        assert_eq!(totals.debit, dec("112.45"));
        assert_eq!(totals.credit, dec("4500.00"));

        assert_eq!(
            aggregator.totals_by_category(Direction::Debit),
            vec![CategoryTotal { category: "Groceries".to_string(), amount: dec("112.45") }]
        );
        assert_eq!(
            aggregator.top_merchants(1, Direction::Debit),
            vec![MerchantTotal { details: "Loblaws".to_string(), amount: dec("112.45") }]
        );
    }

    #[test]
    fn test_delete_category_reassigns_transactions() {
        let (_dir, mut session) = groceries_session();

        session.delete_category("Groceries").unwrap();

        assert_eq!(categories(&session), vec![UNCATEGORIZED, UNCATEGORIZED]);
        assert_eq!(
            session.aggregator().totals_by_category(Direction::Debit),
            vec![CategoryTotal { category: UNCATEGORIZED.to_string(), amount: dec("112.45") }]
        );
    }

    #[test]
    fn test_keyword_edits_reclassify() {
        let (_dir, mut session) = groceries_session();

        session.add_category("Income").unwrap();
        assert!(session.add_keyword("Income", "PAYMENT RECEIVED").unwrap());
        assert_eq!(categories(&session), vec!["Groceries", "Income"]);

        assert!(session.remove_keyword("Groceries", "loblaws").unwrap());
        assert_eq!(categories(&session), vec![UNCATEGORIZED, "Income"]);
    }

    #[test]
    fn test_rename_category_relabels_transactions() {
        let (_dir, mut session) = groceries_session();

        session.rename_category("Groceries", "Food").unwrap();
        assert_eq!(categories(&session), vec!["Food", UNCATEGORIZED]);
    }

    #[test]
    fn test_edits_are_persisted() {
        let (dir, mut session) = groceries_session();
        session.add_category("Auto").unwrap();

        let reopened = Session::open(dir.path().join("categories.json")).unwrap();
        assert_eq!(reopened.store(), session.store());
        assert_eq!(reopened.store().category_names(), vec!["Groceries", "Auto"]);
        assert!(reopened.transactions().is_empty());
    }

    #[test]
    fn test_mutation_errors_are_surfaced() {
        let (_dir, mut session) = groceries_session();

        assert!(matches!(session.add_category("Groceries"), Err(FinPalError::DuplicateCategory(_))));
        assert!(matches!(session.add_keyword("Travel", "air"), Err(FinPalError::UnknownCategory(_))));
        assert!(matches!(session.remove_keyword("Travel", "air"), Err(FinPalError::UnknownCategory(_))));
        assert!(matches!(session.delete_category("Travel"), Err(FinPalError::UnknownCategory(_))));
        assert!(matches!(session.assign_category(0, "Travel"), Err(FinPalError::UnknownCategory(_))));
        assert!(matches!(session.assign_category(9, "Groceries"), Err(FinPalError::UnknownTransaction(9))));
    }

    #[test]
    fn test_assign_category_teaches_keyword() {
        let (dir, mut session) = groceries_session();
        session.add_category("Payments").unwrap();

        session.assign_category(1, "Payments").unwrap();
        assert_eq!(categories(&session), vec!["Groceries", "Payments"]);
        assert_eq!(
            session.store().get("Payments").unwrap().keywords(),
            ["card payment received"]
        );

        let mut next = Session::open(dir.path().join("categories.json")).unwrap();
        next.import(ImportBuilder::new().content(STATEMENT)).unwrap();
        assert_eq!(categories(&next), vec!["Groceries", "Payments"]);
    }

    #[test]
    fn test_assign_category_trims_name() {
        let (_dir, mut session) = groceries_session();
        session.add_category("Payments").unwrap();

        session.assign_category(1, " Payments ").unwrap();
        assert_eq!(categories(&session), vec!["Groceries", "Payments"]);
    }

    #[test]
    fn test_failed_save_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut session = Session::open(missing.join("categories.json")).unwrap();
        session.import(ImportBuilder::new().content(STATEMENT)).unwrap();

        assert!(matches!(session.add_category("Groceries"), Err(FinPalError::Io(_))));
        assert!(session.store().is_empty());
        assert!(matches!(session.add_category("Groceries"), Err(FinPalError::Io(_))));
        assert!(session.store().is_empty());

        fs::create_dir(&missing).unwrap();
        session.add_category("Groceries").unwrap();
        session.add_keyword("Groceries", "loblaws").unwrap();
        assert_eq!(categories(&session), vec!["Groceries", UNCATEGORIZED]);
    }

    #[test]
    fn test_failed_save_keeps_keywords_and_labels() {
        let (dir, mut session) = groceries_session();
        session.add_category("Payments").unwrap();
        let store_before = session.store().clone();
        fs::remove_dir_all(dir.path()).unwrap();

        assert!(matches!(session.assign_category(1, "Payments"), Err(FinPalError::Io(_))));
        assert!(matches!(session.add_keyword("Groceries", "metro"), Err(FinPalError::Io(_))));
        assert!(matches!(session.remove_keyword("Groceries", "loblaws"), Err(FinPalError::Io(_))));
        assert!(matches!(session.rename_category("Groceries", "Food"), Err(FinPalError::Io(_))));
        assert!(matches!(session.delete_category("Groceries"), Err(FinPalError::Io(_))));

        assert_eq!(session.store(), &store_before);
        assert_eq!(categories(&session), vec!["Groceries", UNCATEGORIZED]);
    }

    #[test]
    fn test_assign_uncategorized_only_overrides_row() {
        let (_dir, mut session) = groceries_session();
        let store_before = session.store().clone();

        session.assign_category(0, UNCATEGORIZED).unwrap();

        assert_eq!(categories(&session), vec![UNCATEGORIZED, UNCATEGORIZED]);
        assert_eq!(session.store(), &store_before);
    }

    #[test]
    fn test_import_reports_row_errors() {
        let (_dir, mut session) = open_session();
        let content = "Date,Details,Amount,Debit/Credit
15 Feb 2025,Loblaws,112.45,Debit
bad,Row,1,Debit
";

        let errors = session.import(ImportBuilder::new().content(content)).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 2);
        assert_eq!(session.transactions().len(), 1);
        assert_eq!(session.row_errors().len(), 1);
    }

    #[test]
    fn test_schema_error_keeps_previous_upload() {
        let (_dir, mut session) = groceries_session();

        let result = session.import(ImportBuilder::new().content("Date,Amount\n15 Feb 2025,1\n"));
        assert!(matches!(result, Err(FinPalError::Schema(_))));
        assert_eq!(session.transactions().len(), 2);
    }

    #[test]
    fn test_debits_and_credits() {
        let (_dir, session) = groceries_session();

        assert_eq!(session.debits().count(), 1);
        assert_eq!(session.credits().next().unwrap().details, "Card Payment Received");
    }

    #[test]
    fn test_export_csv_of_empty_upload_keeps_header() {
        let (_dir, mut session) = open_session();
        session
            .import(ImportBuilder::new().content("Date,Details,Amount,Debit/Credit\n"))
            .unwrap();

        let csv = session.export_csv().unwrap();
        assert!(csv.starts_with("Date,Details,Amount,Debit/Credit,Category"));

        session.import(ImportBuilder::new().content(&csv)).unwrap();
        assert!(session.transactions().is_empty());
        assert!(session.row_errors().is_empty());
    }

    #[test]
    fn test_export_csv_includes_categories() {
        let (_dir, session) = groceries_session();

        let csv = session.export_csv().unwrap();
        assert!(csv.contains("15 Feb 2025,Loblaws,112.45,Debit,Groceries"));
        assert!(csv.contains("28 Feb 2025,Card Payment Received,4500.00,Credit,Uncategorized"));
    }
}
