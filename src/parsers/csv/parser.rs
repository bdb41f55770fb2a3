use super::dto::{CsvColumns, CsvTransactionRow, EXPORT_HEADER};
use super::types::DEFAULT_DATE_FORMATS;
use crate::errors::{FinPalError, FinPalResult, MalformedRowError};
use crate::parsers::traits::{ParseReport, Parser};
use crate::types::Transaction;
use csv::{ReaderBuilder, Trim, WriterBuilder};

/// Reads `Date,Details,Amount,Debit/Credit` bank statements.
#[derive(Debug, Clone)]
pub struct CsvParser {
    date_formats: Vec<String>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::with_date_formats(DEFAULT_DATE_FORMATS)
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_formats<S: AsRef<str>>(formats: &[S]) -> Self {
        Self {
            date_formats: formats.iter().map(|f| AsRef::<str>::as_ref(f).to_string()).collect(),
        }
    }

    pub fn date_formats(&self) -> &[String] {
        &self.date_formats
    }
}

impl Parser for CsvParser {
    type Output = Transaction;

    fn parse(&self, content: &str) -> FinPalResult<ParseReport<Self::Output>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(FinPalError::Schema("missing header row".to_string()));
        }
        let columns = CsvColumns::from_headers(&headers)?;

        let mut report = ParseReport::default();

        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let parsed = result
                .map_err(|e| format!("CSV read error: {}", e))
                .and_then(|record| columns.extract(&record))
                .and_then(|raw| raw.into_transaction(self.date_formats.as_slice()));

            match parsed {
                Ok(txn) => report.records.push(txn),
                Err(reason) => {
                    tracing::warn!(row, %reason, "skipping malformed statement row");
                    report.errors.push(MalformedRowError { row, reason });
                }
            }
        }

        tracing::debug!(
            parsed = report.records.len(),
            skipped = report.errors.len(),
            "parsed CSV statement"
        );

        Ok(report)
    }
}

/// Serializes transactions as a statement CSV with an extra `Category` column.
///
/// The header is always written, so an empty list still produces a file
/// that parses back with [`CsvParser`]. Rows parse back to the same date,
/// details, amount and direction.
pub fn write_csv(transactions: &[Transaction]) -> FinPalResult<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for txn in transactions {
        writer.serialize(CsvTransactionRow::from(txn))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FinPalError::Io(e.into_error()))?;

    String::from_utf8(bytes)
        .map_err(|e| FinPalError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
