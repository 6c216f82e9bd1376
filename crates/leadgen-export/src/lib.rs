//! Export sinks for scored leads: a CSV file and a Google Sheets worksheet.

pub mod csv;
pub mod error;
pub mod sheets;
pub mod sink;

pub use csv::CsvSink;
pub use error::ExportError;
pub use sheets::{ServiceAccountKey, SheetsAuth, SheetsClient, SheetsSink};
pub use sink::LeadSink;
