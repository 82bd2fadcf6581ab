//! Source resolution: which files go where, in which mode.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ConvertError, ConvertResult};
use crate::ingestion::is_input_path;
use crate::output::OutputFormat;

use super::{ConversionMode, ConvertOptions};

/// File stem used for the output of a combine run written into a directory.
pub const COMBINED_STEM: &str = "combined";

/// One or more source files feeding one destination file.
///
/// A job with several sources is always merged into its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
}

impl ConversionJob {
    /// The output format selected by the destination's extension.
    pub fn output_format(&self) -> ConvertResult<OutputFormat> {
        resolve_format(&self.destination)
    }
}

pub(crate) fn resolve_format(destination: &Path) -> ConvertResult<OutputFormat> {
    OutputFormat::from_path(destination).ok_or_else(|| ConvertError::UnsupportedOutputFormat {
        path: destination.to_path_buf(),
    })
}

/// The jobs of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    pub mode: ConversionMode,
    pub jobs: Vec<ConversionJob>,
}

/// Resolve `source` and `destination` into a [`ConversionPlan`].
///
/// Nothing is created or written here; an empty source directory fails with
/// [`ConvertError::NoInputFilesFound`] before any output directory exists.
///
/// In per-file mode a destination that is not an existing directory but carries an extension
/// names the output format: outputs land beside it, and an unrecognized extension fails with
/// [`ConvertError::UnsupportedOutputFormat`]. Inputs whose stems collide keep their own
/// extension in the output name (`a.parquet` and `a.pq` give `a.parquet.csv` and `a.pq.csv`).
pub fn plan(
    source: &Path,
    destination: &Path,
    options: &ConvertOptions,
) -> ConvertResult<ConversionPlan> {
    if source.is_file() {
        let destination = if destination.is_dir() {
            destination.join(derived_name(stem_of(source), &options.output_extension))
        } else {
            destination.to_path_buf()
        };
        return Ok(ConversionPlan {
            mode: ConversionMode::Single,
            jobs: vec![ConversionJob {
                sources: vec![source.to_path_buf()],
                destination,
            }],
        });
    }

    if !source.is_dir() {
        return Err(ConvertError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    let files = scan_directory(source)?;
    if files.is_empty() {
        return Err(ConvertError::NoInputFilesFound {
            dir: source.to_path_buf(),
        });
    }

    if options.combine {
        let destination = if destination.is_dir() {
            destination.join(derived_name(COMBINED_STEM.into(), &options.output_extension))
        } else {
            destination.to_path_buf()
        };
        return Ok(ConversionPlan {
            mode: ConversionMode::CombineAll,
            jobs: vec![ConversionJob {
                sources: files,
                destination,
            }],
        });
    }

    let (out_dir, extension) = per_file_target(destination, &options.output_extension)?;
    let names = output_names(&files, &extension);
    let jobs = files
        .into_iter()
        .zip(names)
        .map(|(file, name)| ConversionJob {
            sources: vec![file],
            destination: out_dir.join(name),
        })
        .collect();

    Ok(ConversionPlan {
        mode: ConversionMode::PerFile,
        jobs,
    })
}

/// List the recognized input files directly inside `dir`, sorted by file name.
pub fn scan_directory(dir: &Path) -> ConvertResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ConvertError::read(dir, std::io::Error::from(e)))?;
        if entry.file_type().is_file() && is_input_path(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!(dir = %dir.display(), count = files.len(), "scanned source directory");
    Ok(files)
}

/// Output directory and extension for per-file mode.
fn per_file_target(destination: &Path, extension: &str) -> ConvertResult<(PathBuf, String)> {
    let Some(ext) = destination.extension() else {
        return Ok((destination.to_path_buf(), extension.to_string()));
    };
    if destination.is_dir() {
        return Ok((destination.to_path_buf(), extension.to_string()));
    }

    resolve_format(destination)?;
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, ext.to_string_lossy().into_owned()))
}

/// One distinct output file name per input, compared case-insensitively.
fn output_names(files: &[PathBuf], extension: &str) -> Vec<OsString> {
    let key = |name: &OsString| name.to_string_lossy().to_lowercase();

    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for file in files {
        *stem_counts.entry(key(&stem_of(file))).or_default() += 1;
    }

    let mut used = HashSet::new();
    files
        .iter()
        .map(|file| {
            let stem = stem_of(file);
            let base = if stem_counts[&key(&stem)] > 1 {
                file.file_name().map(OsString::from).unwrap_or(stem)
            } else {
                stem
            };

            let mut name = derived_name(base.clone(), extension);
            let mut n = 2;
            while !used.insert(key(&name)) {
                let mut numbered = base.clone();
                numbered.push(format!("-{n}"));
                name = derived_name(numbered, extension);
                n += 1;
            }
            name
        })
        .collect()
}

fn stem_of(path: &Path) -> OsString {
    path.file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"))
}

fn derived_name(stem: OsString, extension: &str) -> OsString {
    let mut name = stem;
    name.push(".");
    name.push(extension.trim_start_matches('.'));
    name
}
