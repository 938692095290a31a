pub mod xlsx;

use crate::error::ExportError;
use crate::results::ProductRecord;
use std::path::PathBuf;

pub use xlsx::XlsxExporter;

/// Destination for the records of a finished scrape
pub trait Exporter {
    /// Persist `records` in order and return where they were written
    fn export(&self, records: &[ProductRecord]) -> Result<PathBuf, ExportError>;
}
