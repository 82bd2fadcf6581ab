//! Batch conversion: resolve a source into a [`ConversionPlan`], then run it.
//!
//! - [`plan()`]: decide the mode and the (sources, destination) jobs
//! - [`run()`]: execute a plan sequentially and summarize the outcome
//! - [`convert_path()`]: both steps, the usual entry point
//!
//! ## Example
//!
//! ```no_run
//! use parquet_convert::convert::{convert_path, ConvertOptions};
//!
//! # fn main() -> Result<(), parquet_convert::ConvertError> {
//! let opts = ConvertOptions {
//!     combine: true,
//!     ..Default::default()
//! };
//! let summary = convert_path("data/", "out/all.xlsx", &opts)?;
//! println!("{}/{} converted", summary.succeeded, summary.attempted);
//! # Ok(())
//! # }
//! ```

pub mod plan;
pub mod runner;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::observability::{ConversionObserver, ConversionSeverity};

pub use plan::{ConversionJob, ConversionPlan, plan, scan_directory};
pub use runner::{combine_files, convert_file, convert_path, run};

/// How a source maps onto outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// One source file, one output.
    Single,
    /// Every recognized file in a directory, one output each.
    PerFile,
    /// Every recognized file in a directory merged into one output.
    CombineAll,
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::PerFile => f.write_str("per-file"),
            Self::CombineAll => f.write_str("combine-all"),
        }
    }
}

/// Options controlling a conversion run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Merge all files of a directory source into one output.
    pub combine: bool,
    /// Build a [`crate::processing::DatasetProfile`] for every loaded dataset.
    pub debug: bool,
    /// Extension (without the dot) used when output names are derived from input names.
    pub output_extension: String,
    /// Leading rows included in debug profiles.
    pub sample_rows: usize,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("combine", &self.combine)
            .field("debug", &self.debug)
            .field("output_extension", &self.output_extension)
            .field("sample_rows", &self.sample_rows)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            combine: false,
            debug: false,
            output_extension: "csv".to_string(),
            sample_rows: 5,
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

/// A conversion that failed without aborting the run (per-file mode).
#[derive(Debug)]
pub struct ConversionFailure {
    pub source: PathBuf,
    pub error: ConvertError,
}

/// Outcome of [`run()`].
#[derive(Debug)]
pub struct ConversionSummary {
    pub mode: ConversionMode,
    /// Conversions attempted (input files in per-file mode, otherwise one).
    pub attempted: usize,
    pub succeeded: usize,
    /// Written output files, in processing order.
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<ConversionFailure>,
}

impl ConversionSummary {
    /// `true` when every attempted conversion produced its output.
    pub fn is_success(&self) -> bool {
        self.succeeded == self.attempted
    }
}
