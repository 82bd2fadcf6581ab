//! Terminal output: colored status lines and debug profile tables.

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use parquet_convert::ConvertError;
use parquet_convert::convert::{ConversionMode, ConversionSummary};
use parquet_convert::observability::{
    ConversionContext, ConversionObserver, ConversionSeverity, ConversionStats, error_chain,
};
use parquet_convert::processing::DatasetProfile;
use parquet_convert::types::Value;

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

pub fn print_conversion(from: &str, to: &str, detail: &str) {
    println!(
        "{} {} {} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        "->".cyan(),
        to,
        detail.dimmed()
    );
}

pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// Print an error with its causes.
///
/// Verbose output lists every cause on its own line; otherwise only the outermost message and
/// the root cause are shown.
pub fn print_error_chain(prefix: &str, error: &ConvertError, verbose: bool) {
    let chain = error_chain(error);
    if verbose {
        let top = chain.first().map(String::as_str).unwrap_or_default();
        print_error(&format!("{prefix}{top}"));
        for cause in chain.iter().skip(1) {
            eprintln!("      {} {}", "caused by:".dimmed(), cause);
        }
        return;
    }
    match chain.as_slice() {
        [] => print_error(prefix),
        [only] => print_error(&format!("{prefix}{only}")),
        [top, .., root] => print_error(&format!("{prefix}{top}: {root}")),
    }
}

/// Final status line for a finished run.
pub fn print_summary(summary: &ConversionSummary) {
    let what = match summary.mode {
        ConversionMode::PerFile => "files converted",
        ConversionMode::Single | ConversionMode::CombineAll => "outputs written",
    };
    let msg = format!("{}/{} {what}", summary.succeeded, summary.attempted);
    if summary.is_success() {
        print_done(&msg);
    } else {
        print_warning(&msg);
        for failure in &summary.failures {
            println!("       {}", failure.source.display().to_string().dimmed());
        }
    }
}

/// Reports conversion events on the terminal.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ConversionObserver for ConsoleObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        print_conversion(
            &ctx.source_label(),
            &ctx.destination.display().to_string(),
            &format!("({} rows x {} columns, {})", stats.rows, stats.columns, stats.format),
        );
    }

    fn on_failure(
        &self,
        ctx: &ConversionContext,
        _severity: ConversionSeverity,
        error: &ConvertError,
    ) {
        print_error_chain(&format!("{}: ", ctx.source_label()), error, self.verbose);
    }

    fn on_alert(
        &self,
        _ctx: &ConversionContext,
        severity: ConversionSeverity,
        _error: &ConvertError,
    ) {
        eprintln!("{} {severity:?} failure", "[ALERT]".magenta().bold());
    }

    fn on_profile(&self, _ctx: &ConversionContext, profile: &DatasetProfile) {
        print_profile(profile);
    }
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "Column")]
    name: String,
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Non-null")]
    non_null: usize,
    #[tabled(rename = "Nulls")]
    nulls: usize,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Mean")]
    mean: String,
}

fn print_profile(profile: &DatasetProfile) {
    print_header(&format!("Dataset: {}", profile.label));
    print_info(&format!("{} rows x {} columns", profile.rows, profile.columns));

    let rows: Vec<ColumnRow> = profile
        .summaries
        .iter()
        .map(|s| ColumnRow {
            name: s.name.clone(),
            data_type: s.data_type.to_string(),
            non_null: s.non_null,
            nulls: s.nulls,
            min: s.min.as_ref().map(Value::to_string).unwrap_or_default(),
            max: s.max.as_ref().map(Value::to_string).unwrap_or_default(),
            mean: s.mean.map(|m| format!("{m:.4}")).unwrap_or_default(),
        })
        .collect();
    let mut columns = Table::new(&rows);
    columns.with(Style::rounded());
    println!("{columns}");

    if profile.sample.is_empty() {
        print_info("no rows");
        return;
    }

    print_info(&format!("first {} rows", profile.sample.len()));
    let mut builder = Builder::default();
    builder.push_record(profile.column_names.iter().cloned());
    for row in &profile.sample {
        builder.push_record(row.iter().map(render_cell));
    }
    let mut sample = builder.build();
    sample.with(Style::rounded());
    println!("{sample}");
}

fn render_cell(value: &Value) -> String {
    if value.is_null() {
        "null".to_string()
    } else {
        value.to_string()
    }
}
