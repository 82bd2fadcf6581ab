//! Writing a [`DataSet`] to disk.
//!
//! The destination extension selects an [`OutputFormat`]; each format has its own writer module:
//!
//! - [`csv`]: `.csv`, values rendered with [`crate::types::Value`]'s `Display`
//! - [`excel`]: `.xlsx`, one worksheet with a bold header row
//!
//! Every writer renders into a temporary file next to the destination and renames it into
//! place, so a failed write never leaves a partial destination behind.

pub mod csv;
pub mod excel;

use std::fmt;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::WriteResult;
use crate::processing::strip_timezones;
use crate::types::DataSet;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// Excel workbook (`.xlsx`).
    Spreadsheet,
}

impl OutputFormat {
    /// Parse an output format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Infer the output format from a destination path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("CSV"),
            Self::Spreadsheet => f.write_str("Excel"),
        }
    }
}

/// Write `dataset` to `path` in `format`.
///
/// Spreadsheets receive a timezone-naive copy; `dataset` itself is left untouched.
pub fn write_dataset(dataset: &DataSet, path: &Path, format: OutputFormat) -> WriteResult<()> {
    tracing::debug!(path = %path.display(), %format, rows = dataset.row_count(), "writing");
    match format {
        OutputFormat::Csv => csv::write_csv(dataset, path),
        OutputFormat::Spreadsheet => excel::write_xlsx(&strip_timezones(dataset), path),
    }
}

/// Render into a temporary file in `path`'s directory, then rename it over `path`.
pub(crate) fn write_atomically<F>(path: &Path, render: F) -> WriteResult<()>
where
    F: FnOnce(&mut NamedTempFile) -> WriteResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".parquet-convert-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    render(&mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
