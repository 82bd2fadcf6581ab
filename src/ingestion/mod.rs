//! Loading source files into an in-memory [`crate::types::DataSet`].
//!
//! - [`parquet`]: the converter's input format, with schema inference from file metadata
//! - [`csv`]: typed read-back of CSV outputs

pub mod csv;
pub mod parquet;

use std::path::Path;

use crate::error::IngestionResult;
use crate::types::DataSet;

pub use self::parquet::{infer_parquet_schema, read_parquet};

/// File extensions recognized as Parquet input (compared case-insensitively).
pub const INPUT_EXTENSIONS: [&str; 2] = ["parquet", "pq"];

/// `true` if `path` carries one of the [`INPUT_EXTENSIONS`].
pub fn is_input_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Load one source file wholesale.
///
/// The extension is not checked here: a single source file given explicitly is read as
/// Parquet whatever its name.
pub fn load_dataset(path: &Path) -> IngestionResult<DataSet> {
    tracing::debug!(path = %path.display(), "loading parquet");
    let ds = read_parquet(path)?;
    tracing::debug!(
        path = %path.display(),
        rows = ds.row_count(),
        columns = ds.column_count(),
        "loaded"
    );
    Ok(ds)
}
