//! Conversion outcome reporting.
//!
//! The converter reports through a [`ConversionObserver`] configured in
//! [`crate::convert::ConvertOptions`]: one `on_success` per written output, one `on_failure` per
//! failed conversion (plus `on_alert` at or above the configured severity), and, in debug
//! mode, one `on_profile` per loaded dataset.

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};

use crate::convert::ConversionMode;
use crate::error::{ConvertError, IngestionError, WriteError};
use crate::output::OutputFormat;
use crate::processing::DatasetProfile;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (conversion failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about one conversion attempt.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    pub mode: ConversionMode,
    /// Input files feeding this output (one, except in combine mode).
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
}

impl ConversionContext {
    /// Human-readable source description for log lines.
    pub fn source_label(&self) -> String {
        match self.sources.as_slice() {
            [one] => one.display().to_string(),
            many => format!("{} files", many.len()),
        }
    }
}

/// Minimal stats reported for a written output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionStats {
    pub rows: usize,
    pub columns: usize,
    pub format: OutputFormat,
}

/// Observer interface for conversion outcomes.
///
/// Implementors can print, record metrics, or trigger alerts.
pub trait ConversionObserver: Send + Sync {
    /// Called when an output file has been written.
    fn on_success(&self, _ctx: &ConversionContext, _stats: ConversionStats) {}

    /// Called when a conversion fails.
    fn on_failure(
        &self,
        _ctx: &ConversionContext,
        _severity: ConversionSeverity,
        _error: &ConvertError,
    ) {
    }

    /// Called when a conversion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(
        &self,
        ctx: &ConversionContext,
        severity: ConversionSeverity,
        error: &ConvertError,
    ) {
        self.on_failure(ctx, severity, error)
    }

    /// Called in debug mode for every loaded (and combined) dataset.
    fn on_profile(&self, _ctx: &ConversionContext, _profile: &DatasetProfile) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ConversionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ConversionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ConversionObserver for CompositeObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(
        &self,
        ctx: &ConversionContext,
        severity: ConversionSeverity,
        error: &ConvertError,
    ) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(
        &self,
        ctx: &ConversionContext,
        severity: ConversionSeverity,
        error: &ConvertError,
    ) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_profile(&self, ctx: &ConversionContext, profile: &DatasetProfile) {
        for o in &self.observers {
            o.on_profile(ctx, profile);
        }
    }
}

/// Appends conversion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ConversionObserver for FileObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        self.append_line(&format!(
            "{} ok mode={} src={} dst={} format={} rows={} columns={}",
            timestamp(),
            ctx.mode,
            ctx.source_label(),
            ctx.destination.display(),
            stats.format,
            stats.rows,
            stats.columns
        ));
    }

    fn on_failure(
        &self,
        ctx: &ConversionContext,
        severity: ConversionSeverity,
        error: &ConvertError,
    ) {
        self.append_line(&format!(
            "{} fail severity={:?} mode={} src={} dst={} err={}",
            timestamp(),
            severity,
            ctx.mode,
            ctx.source_label(),
            ctx.destination.display(),
            error_chain(error).join(": ")
        ));
    }

    fn on_alert(
        &self,
        ctx: &ConversionContext,
        severity: ConversionSeverity,
        error: &ConvertError,
    ) {
        self.append_line(&format!(
            "{} ALERT severity={:?} mode={} src={} dst={} err={}",
            timestamp(),
            severity,
            ctx.mode,
            ctx.source_label(),
            ctx.destination.display(),
            error_chain(error).join(": ")
        ));
    }

    fn on_profile(&self, ctx: &ConversionContext, profile: &DatasetProfile) {
        self.append_line(&format!(
            "{} profile src={} dataset={} rows={} columns={}",
            timestamp(),
            ctx.source_label(),
            profile.label,
            profile.rows,
            profile.columns
        ));
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Classify a conversion error for observer callbacks.
pub fn severity_for_error(e: &ConvertError) -> ConversionSeverity {
    match e {
        ConvertError::SourceNotFound { .. } => ConversionSeverity::Critical,
        ConvertError::NoInputFilesFound { .. } | ConvertError::NoDataToCombine => {
            ConversionSeverity::Warning
        }
        ConvertError::UnsupportedOutputFormat { .. } => ConversionSeverity::Error,
        ConvertError::ReadFailure { source, .. } => match source {
            IngestionError::Io(_) => ConversionSeverity::Critical,
            IngestionError::Parquet(err) => {
                // Parquet errors often wrap IO, but not always in a structured way.
                if error_chain_contains_io(err) {
                    ConversionSeverity::Critical
                } else {
                    ConversionSeverity::Error
                }
            }
            IngestionError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => ConversionSeverity::Critical,
                _ => ConversionSeverity::Error,
            },
            IngestionError::SchemaMismatch { .. } | IngestionError::ParseError { .. } => {
                ConversionSeverity::Error
            }
        },
        ConvertError::WriteFailure { source, .. } => match source {
            WriteError::Io(_) => ConversionSeverity::Critical,
            WriteError::Xlsx(err) if error_chain_contains_io(err) => ConversionSeverity::Critical,
            _ => ConversionSeverity::Error,
        },
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Every message in `e`'s source chain, outermost first.
pub fn error_chain(e: &(dyn StdError + 'static)) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        out.push(err.to_string());
        cur = err.source();
    }
    out
}
