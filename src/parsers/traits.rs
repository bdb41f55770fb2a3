use crate::errors::{FinPalResult, MalformedRowError};

/// Records a parser produced, alongside the rows it had to skip.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport<T> {
    pub records: Vec<T>,
    pub errors: Vec<MalformedRowError>,
}

impl<T> ParseReport<T> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl<T> Default for ParseReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            errors: Vec::new(),
        }
    }
}

pub trait Parser {
    type Output;

    /// Fails only when the document as a whole is unusable; bad rows end up
    /// in [`ParseReport::errors`].
    fn parse(&self, content: &str) -> FinPalResult<ParseReport<Self::Output>>;
}
