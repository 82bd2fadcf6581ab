//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// parquet-convert - batch Parquet to CSV / Excel conversion
#[derive(Parser, Debug)]
#[command(name = "parquet-convert")]
#[command(version)]
#[command(about = "Convert Parquet files into CSV files or Excel workbooks", long_about = None)]
pub struct Cli {
    /// Parquet file, or directory of .parquet/.pq files
    pub input: PathBuf,

    /// Output file (.csv or .xlsx), or output directory
    pub output: PathBuf,

    /// Print dataset profiles, full error chains and debug logs
    #[arg(long, env = "PARQUET_CONVERT_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Merge every input file of a directory into one output
    #[arg(long, default_value_t = false)]
    pub combine: bool,

    /// Output extension used when output names are derived from input names
    #[arg(long, value_name = "EXT", env = "PARQUET_CONVERT_FORMAT", default_value = "csv")]
    pub format: String,

    /// Rows shown per dataset in debug profiles
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub sample_rows: usize,

    /// Append one line per conversion event to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
