// exprmatrix - app/pipeline.rs
//
// One synchronous run: discover samples, parse every file, merge into the
// expression table, then write the matrix once at the end.
//
// Error handling:
//   - Invalid input directory or no sample folders: fatal, returned as Err.
//   - Unreadable file, missing header or column: warning, file skipped.
//   - Malformed rows: dropped by the parser and only counted.
//   - The output file is created only after all input has been merged.

use crate::core::discovery::{self, FileFilter};
use crate::core::export;
use crate::core::matrix::ExpressionTable;
use crate::core::model::{RunSummary, SampleFolder};
use crate::core::parser::{self, ParseConfig};
use crate::platform;
use crate::util::error::{ExportError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Everything one run needs, already merged from CLI and config.toml.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub parse: ParseConfig,
    /// Extension filter ("" = all files).
    pub extension: String,
    pub missing_token: String,
    /// Optional JSON run summary destination.
    pub report_file: Option<PathBuf>,
}

/// Run the full pipeline and write the outputs.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::new(
        config.input_dir.clone(),
        config.output_file.clone(),
        config.parse.expression_column.clone(),
    );

    let (folders, discovery_warnings) = discovery::discover_sample_folders(&config.input_dir)?;
    for warning in discovery_warnings {
        warn(&mut summary, warning);
    }
    summary.sample_folders = folders.len();

    tracing::info!(count = folders.len(), "Found sample folders");
    for folder in &folders {
        tracing::info!(folder = %folder.path.display(), "Sample folder");
    }

    let table = collect(&folders, config, &mut summary);

    tracing::info!("Creating combined matrix");
    let matrix = table.to_matrix();
    summary.genes = matrix.genes.len();
    summary.sample_columns = matrix.samples.clone();

    tracing::info!(path = %config.output_file.display(), "Saving results");
    write_with(&config.output_file, |w| {
        export::export_tsv(&matrix, w, &config.output_file, &config.missing_token).map(|_| ())
    })?;

    if let Some(report) = &config.report_file {
        write_with(report, |w| export::export_report_json(&summary, w, report))?;
        tracing::info!(path = %report.display(), "Run report written");
    }

    Ok(summary)
}

/// Parse every file of every sample into one table.
pub fn collect(
    folders: &[SampleFolder],
    config: &RunConfig,
    summary: &mut RunSummary,
) -> ExpressionTable {
    let filter = FileFilter::new(&config.extension);
    let mut table = ExpressionTable::new();

    for folder in folders {
        tracing::info!(sample = %folder.name, "Processing sample folder");

        let (files, warnings) = discovery::discover_sample_files(&folder.path, &filter);
        for warning in warnings {
            warn(summary, warning);
        }

        if files.is_empty() {
            tracing::info!(folder = %folder.path.display(), "No files found");
            summary.samples_without_files.push(folder.name.clone());
            continue;
        }
        tracing::info!(sample = %folder.name, files = files.len(), "Found files");

        for file in &files {
            process_file(file, &folder.name, &config.parse, &mut table, summary);
        }
    }

    table
}

/// Read, parse, and merge one file. Failures become warnings.
fn process_file(
    path: &Path,
    sample: &str,
    parse_config: &ParseConfig,
    table: &mut ExpressionTable,
    summary: &mut RunSummary,
) {
    tracing::info!(
        sample,
        file = %path.file_name().unwrap_or_default().to_string_lossy(),
        "Processing file"
    );

    let parsed = platform::fs::read_text(path)
        .and_then(|content| parser::parse_content(&content, path, parse_config));

    match parsed {
        Ok(parsed) => {
            let merged = table.merge_file(sample, parsed);
            tracing::debug!(sample, file = %path.display(), records = merged, "File merged");
            summary.files_processed += 1;
        }
        Err(e) => {
            summary.files_skipped += 1;
            warn(summary, e.to_string());
        }
    }
}

fn warn(summary: &mut RunSummary, message: String) {
    tracing::warn!("{}", message);
    summary.push_warning(message);
}

/// Create `path`, hand a buffered writer to `write`, and flush it.
fn write_with<F>(path: &Path, write: F) -> std::result::Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::result::Result<(), ExportError>,
{
    let io_err = |e: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush().map_err(io_err)
}
