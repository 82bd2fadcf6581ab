//! Sequential execution of a [`ConversionPlan`].
//!
//! When an observer is configured, every job reports:
//!
//! - `on_success` once its output is written, with row/column stats
//! - `on_failure` on failure, with a computed severity
//! - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
//! - `on_profile` for every loaded dataset when `options.debug` is set

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};
use crate::ingestion::load_dataset;
use crate::observability::{ConversionContext, ConversionStats, severity_for_error};
use crate::output::{OutputFormat, write_dataset};
use crate::processing::{concat, profile};
use crate::types::DataSet;

use super::plan::{ConversionJob, ConversionPlan, plan, resolve_format};
use super::{ConversionFailure, ConversionMode, ConversionSummary, ConvertOptions};

/// Plan and run a conversion of `source` into `destination`.
///
/// Planning failures (missing source, empty directory) are reported to the observer and
/// returned. See [`run`] for the execution rules.
pub fn convert_path(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ConvertOptions,
) -> ConvertResult<ConversionSummary> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    match plan(source, destination, options) {
        Ok(plan) => run(&plan, options),
        Err(e) => {
            let ctx = ConversionContext {
                mode: requested_mode(source, options),
                sources: vec![source.to_path_buf()],
                destination: destination.to_path_buf(),
            };
            Err(report_failure(&ctx, e, options))
        }
    }
}

/// Execute `plan` job by job, in order.
///
/// In [`ConversionMode::PerFile`] the destination directory is created first and a failing
/// file is recorded in the summary while the remaining files are still converted. In the
/// other modes the first failure is returned.
pub fn run(plan: &ConversionPlan, options: &ConvertOptions) -> ConvertResult<ConversionSummary> {
    tracing::info!(mode = %plan.mode, jobs = plan.jobs.len(), "starting conversion");

    let mut summary = ConversionSummary {
        mode: plan.mode,
        attempted: plan.jobs.len(),
        succeeded: 0,
        outputs: Vec::new(),
        failures: Vec::new(),
    };

    if plan.mode == ConversionMode::PerFile {
        create_output_dir(plan, options)?;
    }

    for job in &plan.jobs {
        let ctx = context(plan.mode, job);
        let result = match job.sources.as_slice() {
            [source] if plan.mode != ConversionMode::CombineAll => {
                observed(&ctx, options, || convert_one(&ctx, source, options))
            }
            _ => observed(&ctx, options, || combine_all(&ctx, options)),
        };

        match result {
            Ok(_) => {
                summary.succeeded += 1;
                summary.outputs.push(job.destination.clone());
            }
            Err(error) if plan.mode == ConversionMode::PerFile => {
                summary.failures.push(ConversionFailure {
                    source: job.sources.first().cloned().unwrap_or_default(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }

    tracing::info!(
        mode = %summary.mode,
        succeeded = summary.succeeded,
        attempted = summary.attempted,
        "conversion finished"
    );
    Ok(summary)
}

/// Convert one source file into `destination` (format chosen by its extension).
pub fn convert_file(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ConvertOptions,
) -> ConvertResult<ConversionStats> {
    let source = source.as_ref();
    let ctx = ConversionContext {
        mode: ConversionMode::Single,
        sources: vec![source.to_path_buf()],
        destination: destination.as_ref().to_path_buf(),
    };
    observed(&ctx, options, || convert_one(&ctx, source, options))
}

/// Load every source in order, concatenate them and write one output.
///
/// A source that fails to load aborts the whole combine; an empty `sources` fails with
/// [`ConvertError::NoDataToCombine`].
pub fn combine_files(
    sources: &[PathBuf],
    destination: impl AsRef<Path>,
    options: &ConvertOptions,
) -> ConvertResult<ConversionStats> {
    let ctx = ConversionContext {
        mode: ConversionMode::CombineAll,
        sources: sources.to_vec(),
        destination: destination.as_ref().to_path_buf(),
    };
    observed(&ctx, options, || combine_all(&ctx, options))
}

fn convert_one(
    ctx: &ConversionContext,
    source: &Path,
    options: &ConvertOptions,
) -> ConvertResult<ConversionStats> {
    // Resolve the format before loading so an unsupported target costs no read.
    let format = resolve_format(&ctx.destination)?;
    let dataset = load(source)?;
    deliver_profile(ctx, &dataset, source.display().to_string(), options);
    write(ctx, &dataset, format)
}

fn combine_all(
    ctx: &ConversionContext,
    options: &ConvertOptions,
) -> ConvertResult<ConversionStats> {
    let format = resolve_format(&ctx.destination)?;

    let mut datasets = Vec::with_capacity(ctx.sources.len());
    for source in &ctx.sources {
        let dataset = load(source)?;
        deliver_profile(ctx, &dataset, source.display().to_string(), options);
        datasets.push(dataset);
    }

    let count = datasets.len();
    let combined = concat(datasets).ok_or(ConvertError::NoDataToCombine)?;
    tracing::debug!(files = count, rows = combined.row_count(), "combined datasets");
    deliver_profile(ctx, &combined, format!("combined ({count} files)"), options);
    write(ctx, &combined, format)
}

fn load(source: &Path) -> ConvertResult<DataSet> {
    load_dataset(source).map_err(|e| ConvertError::read(source, e))
}

fn write(
    ctx: &ConversionContext,
    dataset: &DataSet,
    format: OutputFormat,
) -> ConvertResult<ConversionStats> {
    write_dataset(dataset, &ctx.destination, format)
        .map_err(|e| ConvertError::write(&ctx.destination, e))?;
    Ok(ConversionStats {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        format,
    })
}

fn deliver_profile(
    ctx: &ConversionContext,
    dataset: &DataSet,
    label: String,
    options: &ConvertOptions,
) {
    if !options.debug {
        return;
    }
    let p = profile(dataset, label, options.sample_rows);
    tracing::debug!(dataset = %p.label, rows = p.rows, columns = p.columns, "profiled dataset");
    if let Some(obs) = options.observer.as_ref() {
        obs.on_profile(ctx, &p);
    }
}

fn create_output_dir(plan: &ConversionPlan, options: &ConvertOptions) -> ConvertResult<()> {
    let Some(dir) = plan
        .jobs
        .first()
        .and_then(|job| job.destination.parent())
        .filter(|dir| !dir.as_os_str().is_empty())
    else {
        return Ok(());
    };

    fs::create_dir_all(dir).map_err(|e| {
        let ctx = ConversionContext {
            mode: plan.mode,
            sources: plan.jobs.iter().flat_map(|job| job.sources.iter().cloned()).collect(),
            destination: dir.to_path_buf(),
        };
        report_failure(&ctx, ConvertError::write(dir, e), options)
    })
}

fn observed<F>(
    ctx: &ConversionContext,
    options: &ConvertOptions,
    step: F,
) -> ConvertResult<ConversionStats>
where
    F: FnOnce() -> ConvertResult<ConversionStats>,
{
    match step() {
        Ok(stats) => {
            tracing::debug!(
                dst = %ctx.destination.display(),
                rows = stats.rows,
                columns = stats.columns,
                "wrote output"
            );
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(ctx, stats);
            }
            Ok(stats)
        }
        Err(e) => Err(report_failure(ctx, e, options)),
    }
}

fn report_failure(
    ctx: &ConversionContext,
    error: ConvertError,
    options: &ConvertOptions,
) -> ConvertError {
    let sev = severity_for_error(&error);
    tracing::debug!(
        src = %ctx.source_label(),
        severity = ?sev,
        error = %error,
        "conversion failed"
    );
    if let Some(obs) = options.observer.as_ref() {
        obs.on_failure(ctx, sev, &error);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, &error);
        }
    }
    error
}

fn context(mode: ConversionMode, job: &ConversionJob) -> ConversionContext {
    ConversionContext {
        mode,
        sources: job.sources.clone(),
        destination: job.destination.clone(),
    }
}

fn requested_mode(source: &Path, options: &ConvertOptions) -> ConversionMode {
    match (source.is_dir(), options.combine) {
        (false, _) => ConversionMode::Single,
        (true, false) => ConversionMode::PerFile,
        (true, true) => ConversionMode::CombineAll,
    }
}
