pub mod csv;
pub mod traits;

pub mod prelude {
    pub use super::csv::{CsvParser, write_csv};
    pub use super::traits::{ParseReport, Parser};
}
