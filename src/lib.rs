//! `parquet-convert` converts Parquet files into CSV files or Excel workbooks.
//!
//! The primary entrypoint is [`convert::convert_path`], which resolves a source path into a
//! [`convert::ConversionPlan`] and runs it:
//!
//! - **single**: the source is a file; one output, its format picked by the destination extension
//! - **per-file**: the source is a directory; one `<stem>.<ext>` output per input file
//! - **combine-all**: the source is a directory and `combine` is set; every input merged into
//!   one output
//!
//! ## Formats
//!
//! **Input** (by extension, case-insensitive): `.parquet`, `.pq`. Directories are scanned
//! without recursion and files are processed in file-name order.
//!
//! **Output** (by destination extension): `.csv` and `.xlsx`. Spreadsheets cannot store UTC
//! offsets, so timezone-aware timestamp columns are written as their wall-clock value; CSV keeps
//! the offset.
//!
//! **Value types:** every file is loaded into a [`types::DataSet`] whose schema is inferred from
//! the Parquet metadata. Cells are [`types::Value`]s of:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::Date`]
//! - [`types::DataType::Timestamp`] / [`types::DataType::TimestampTz`]
//!
//! Parquet nulls map to [`types::Value::Null`], written as empty cells.
//!
//! ## Quick example
//!
//! ```no_run
//! use parquet_convert::convert::{convert_path, ConvertOptions};
//!
//! # fn main() -> Result<(), parquet_convert::ConvertError> {
//! // One CSV per Parquet file in `data/`, written into `out/` (created if missing).
//! let summary = convert_path("data", "out", &ConvertOptions::default())?;
//! println!("{}/{} files converted", summary.succeeded, summary.attempted);
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability (file log + alert threshold)
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use parquet_convert::convert::{convert_path, ConvertOptions};
//! use parquet_convert::observability::{ConversionSeverity, FileObserver};
//!
//! let opts = ConvertOptions {
//!     debug: true,
//!     observer: Some(Arc::new(FileObserver::new("convert.log"))),
//!     alert_at_or_above: ConversionSeverity::Error,
//!     ..Default::default()
//! };
//!
//! // A missing source is Critical and is logged as an ALERT line at this threshold.
//! let _err = convert_path("does_not_exist.parquet", "out.csv", &opts).unwrap_err();
//! ```
//!
//! ## Modules
//!
//! - [`convert`]: planning and running conversions
//! - [`ingestion`]: Parquet loading (and typed CSV read-back)
//! - [`output`]: CSV and spreadsheet writers
//! - [`processing`]: combine, timezone normalization, reductions and debug profiles
//! - [`observability`]: observer trait and built-in observers
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: error types for each layer

pub mod convert;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod output;
pub mod processing;
pub mod types;

pub use error::{
    ConvertError, ConvertResult, IngestionError, IngestionResult, WriteError, WriteResult,
};
