use async_trait::async_trait;
use leadgen_core::Record;

use crate::error::ExportError;

/// A destination for the final lead list.
///
/// Each sink writes the full list independently; a failure in one sink says
/// nothing about any other.
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Short name used in logs and run summaries, e.g. `"csv"`.
    fn name(&self) -> &'static str;

    /// Write every record, returning a human-readable destination.
    async fn write(&self, records: &[Record]) -> Result<String, ExportError>;
}
