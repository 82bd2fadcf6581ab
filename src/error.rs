use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for loading operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for writers.
pub type WriteResult<T> = Result<T, WriteError>;

/// Convenience result type for conversion jobs.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Error type returned while loading a file into a [`crate::types::DataSet`].
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read-back error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet decoding error (corrupt footer, bad page, ...).
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input does not conform to the expected schema (missing columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be converted into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by the output writers.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Destination could not be created, written or renamed into place.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook serialization error.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The dataset does not fit on a single worksheet.
    #[error("{what} count {count} exceeds the worksheet limit of {limit}")]
    SheetLimit {
        what: &'static str,
        count: usize,
        limit: usize,
    },

    /// A timezone-aware value reached the spreadsheet writer without being normalized.
    #[error(
        "column '{column}' holds timezone-aware timestamps; spreadsheets only accept naive values"
    )]
    TimezoneAware { column: String },
}

/// Error type returned by conversion jobs.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source path is neither a file nor a directory.
    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The source directory holds no file with a recognized input extension.
    #[error("no .parquet or .pq files found in {}", dir.display())]
    NoInputFilesFound { dir: PathBuf },

    /// The destination extension does not select a known output format.
    #[error("unsupported output format for {} (use .csv or .xlsx)", path.display())]
    UnsupportedOutputFormat { path: PathBuf },

    /// Combine was requested but no dataset was loaded.
    #[error("no data to combine")]
    NoDataToCombine,

    /// A source file could not be loaded.
    #[error("failed to read {}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: IngestionError,
    },

    /// A destination file could not be written.
    #[error("failed to write {}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

impl ConvertError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<IngestionError>) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<WriteError>) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source: source.into(),
        }
    }
}
