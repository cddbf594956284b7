// exprmatrix - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Samples and directory listings
// =============================================================================

/// One sample: an immediate subdirectory of the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFolder {
    /// Folder name, used as the matrix column header.
    pub name: String,

    /// Full path to the folder.
    pub path: PathBuf,
}

/// One entry of a directory listing, printed when no sample folders exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListingEntry {
    pub name: String,
    pub is_dir: bool,
}

// =============================================================================
// Parsed content
// =============================================================================

/// A single valid (gene, value) row extracted from a quantification file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionRecord {
    pub gene: String,
    pub value: f64,
}

/// Result of parsing one quantification file.
#[derive(Debug, Default)]
pub struct ParsedFile {
    /// Valid rows in file order. A gene repeated within the file keeps
    /// every occurrence; the aggregator applies last-write-wins.
    pub records: Vec<ExpressionRecord>,

    /// Lines examined after the header row.
    pub lines_processed: u64,

    /// Lines after the header that were dropped (short, summary, empty
    /// gene name, non-numeric value).
    pub rows_skipped: u64,
}

// =============================================================================
// Run summary
// =============================================================================

/// Outcome of one pipeline run. Serialised to JSON by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub expression_column: String,

    /// Number of sample folders discovered.
    pub sample_folders: usize,

    /// Sample folders in which no (matching) files were found.
    pub samples_without_files: Vec<String>,

    pub files_processed: usize,
    pub files_skipped: usize,

    /// Rows in the written matrix.
    pub genes: usize,

    /// Columns in the written matrix, in output order.
    pub sample_columns: Vec<String>,

    /// Non-fatal warnings, capped at `MAX_WARNINGS`.
    pub warnings: Vec<String>,

    /// Warnings beyond the cap that were logged but not stored.
    pub warnings_suppressed: usize,
}

impl RunSummary {
    pub fn new(input_dir: PathBuf, output_file: PathBuf, expression_column: String) -> Self {
        Self {
            generated_at: Utc::now(),
            input_dir,
            output_file,
            expression_column,
            sample_folders: 0,
            samples_without_files: Vec::new(),
            files_processed: 0,
            files_skipped: 0,
            genes: 0,
            sample_columns: Vec::new(),
            warnings: Vec::new(),
            warnings_suppressed: 0,
        }
    }

    /// Record a non-fatal warning, respecting the storage cap.
    pub fn push_warning(&mut self, message: String) {
        if self.warnings.len() < crate::util::constants::MAX_WARNINGS {
            self.warnings.push(message);
        } else {
            self.warnings_suppressed += 1;
        }
    }

    /// Total warnings raised, stored or not.
    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.warnings_suppressed
    }
}
