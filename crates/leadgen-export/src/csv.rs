//! Tabular CSV sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use leadgen_core::{Record, COLUMNS};

use crate::error::ExportError;
use crate::sink::LeadSink;

/// Writes the lead list to a CSV file, replacing any previous contents.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LeadSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn write(&self, records: &[Record]) -> Result<String, ExportError> {
        let io_err = |source| ExportError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&self.path, render_csv(records))
            .await
            .map_err(io_err)?;

        tracing::info!(path = %self.path.display(), rows = records.len(), "wrote CSV export");
        Ok(self.path.display().to_string())
    }
}

/// Render header + rows. Line endings are `\n`.
#[must_use]
pub fn render_csv(records: &[Record]) -> String {
    let mut out = String::new();
    push_line(&mut out, COLUMNS.iter().copied());
    for record in records {
        let row = record.to_row();
        push_line(&mut out, row.iter().map(String::as_str));
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells.map(escape_cell).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Quote a cell when it contains a delimiter, quote, or line break; embedded
/// quotes are doubled.
fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_owned()
    }
}
