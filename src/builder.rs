use std::fs;

use crate::{errors::FinPalError, parsers::prelude::*, types::Transaction};

/// Normalized transactions of one upload plus the rows that were skipped.
pub type ImportReport = ParseReport<Transaction>;

#[derive(Debug, Default)]
pub struct ImportBuilder {
    content: Option<String>,
    filepath: Option<String>,
    date_formats: Vec<String>,
}

impl ImportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.filepath = Some(filename.to_string());
        self
    }

    /// Adds a date format to try after the previously added ones.
    ///
    /// When no format is added the parser's defaults apply.
    pub fn date_format(mut self, format: &str) -> Self {
        self.date_formats.push(format.to_string());
        self
    }

    fn parser(&self) -> CsvParser {
        if self.date_formats.is_empty() {
            CsvParser::new()
        } else {
            CsvParser::with_date_formats(self.date_formats.as_slice())
        }
    }

    pub fn parse(self) -> Result<ImportReport, FinPalError> {
        let parser = self.parser();

        let content = self.content
            .map(Ok)
            .unwrap_or_else(|| {
                self.filepath
                    .ok_or(FinPalError::MissingContentAndFilepath)
                    .and_then(|path| fs::read_to_string(path).map_err(Into::into))
            })?;

        parser.parse(&content)
    }
}
