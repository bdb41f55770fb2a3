use thiserror::Error;

/// Errors raised while importing statements or editing categories.
#[derive(Error, Debug)]
pub enum FinPalError {
    /// The CSV header is missing required columns, so nothing can be imported
    #[error("Invalid CSV schema: {0}")]
    Schema(String),

    /// A category with this name already exists
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    /// No category with this name exists in the store
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The name is the built-in fallback label and cannot be edited
    #[error("Category name is reserved: {0}")]
    ReservedCategory(String),

    /// Category names must contain at least one non-whitespace character
    #[error("Category name must not be empty")]
    InvalidCategoryName,

    /// No transaction at this position in the current upload
    #[error("Unknown transaction index: {0}")]
    UnknownTransaction(usize),

    /// The builder was called without content or a file path
    #[error("Content or filepath is required")]
    MissingContentAndFilepath,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Category file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single CSV row that could not be turned into a transaction.
///
/// These are collected during import instead of aborting it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed row {row}: {reason}")]
pub struct MalformedRowError {
    /// 1-based data row number, header excluded
    pub row: usize,
    pub reason: String,
}

pub type FinPalResult<T> = Result<T, FinPalError>;
