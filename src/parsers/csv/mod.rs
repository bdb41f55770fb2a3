mod dto;
mod parser;
mod types;

pub use dto::{
    AMOUNT_COLUMN, CATEGORY_COLUMN, DATE_COLUMN, DETAILS_COLUMN, DIRECTION_COLUMN, EXPORT_HEADER,
};
pub use parser::{CsvParser, write_csv};
pub use types::{DEFAULT_DATE_FORMATS, MAX_AMOUNT, OUTPUT_DATE_FORMAT};
