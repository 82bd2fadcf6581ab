//! # parquet-convert
//!
//! Converts one Parquet file, every Parquet file of a directory, or a whole directory merged
//! into one table, into CSV or `.xlsx`.
//!
//! ```text
//! main.rs
//!   ├── cli.rs      (argument definitions)
//!   ├── console.rs  (colored status lines, profile tables)
//!   └── parquet_convert (library: planning, loading, writing)
//! ```

mod cli;
mod console;

use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use parquet_convert::convert::{ConvertOptions, convert_path};
use parquet_convert::observability::{CompositeObserver, ConversionObserver, FileObserver};

use cli::Cli;
use console::ConsoleObserver;

fn main() -> ExitCode {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            console::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `--debug` selects debug-level events.
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether every attempted conversion succeeded.
fn run(cli: Cli) -> Result<bool> {
    let mut observers: Vec<Arc<dyn ConversionObserver>> =
        vec![Arc::new(ConsoleObserver::new(cli.debug))];
    if let Some(path) = cli.log_file.as_ref() {
        // FileObserver writes best-effort; fail early if the log cannot be opened at all.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        observers.push(Arc::new(FileObserver::new(path)));
    }

    let options = ConvertOptions {
        combine: cli.combine,
        debug: cli.debug,
        output_extension: cli.format,
        sample_rows: cli.sample_rows,
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };
    tracing::debug!(
        ?options,
        input = %cli.input.display(),
        output = %cli.output.display(),
        "parsed arguments"
    );

    match convert_path(&cli.input, &cli.output, &options) {
        Ok(summary) => {
            console::print_summary(&summary);
            Ok(summary.is_success())
        }
        // Already reported through the console observer.
        Err(_) => Ok(false),
    }
}
