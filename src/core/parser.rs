// exprmatrix - core/parser.rs
//
// Line-oriented parsing of quantification files.
// Core layer: accepts file content as a string, never touches the filesystem.
//
// File layout: an arbitrary metadata preamble, then a tab-separated header row
// (the first line containing the gene-name token), then data rows. Summary
// rows such as `N_unmapped` share the table but are not genes.

use crate::core::model::{ExpressionRecord, ParsedFile};
use crate::util::constants;
use crate::util::error::ParseError;
use std::path::Path;

/// Configuration for parsing operations.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Column holding the gene identifier; also the header detection token.
    pub gene_column: String,

    /// Column holding the numeric expression value.
    pub expression_column: String,

    /// Gene names starting with this prefix are summary rows and are dropped.
    pub reserved_prefix: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            gene_column: constants::GENE_NAME_COLUMN.to_string(),
            expression_column: constants::DEFAULT_EXPRESSION_COLUMN.to_string(),
            reserved_prefix: constants::RESERVED_GENE_PREFIX.to_string(),
        }
    }
}

impl ParseConfig {
    pub fn with_expression_column(expression_column: impl Into<String>) -> Self {
        Self {
            expression_column: expression_column.into(),
            ..Default::default()
        }
    }
}

/// Parse the content of one quantification file.
///
/// Returns `Err` when the file has no header row or the header lacks the
/// gene or expression column; the caller skips the whole file. Malformed data
/// rows never fail the file, they are counted in `rows_skipped`.
pub fn parse_content(
    content: &str,
    file_path: &Path,
    config: &ParseConfig,
) -> Result<ParsedFile, ParseError> {
    let mut lines = content.lines();

    // Header: first line containing the gene-name token anywhere.
    let header = lines
        .by_ref()
        .find(|line| line.contains(config.gene_column.as_str()))
        .ok_or_else(|| ParseError::MissingHeader {
            file: file_path.to_path_buf(),
            token: config.gene_column.clone(),
        })?;

    let columns: Vec<&str> = split_fields(header).map(str::trim).collect();
    let missing = |column: &str| ParseError::MissingColumn {
        file: file_path.to_path_buf(),
        column: column.to_string(),
        available: columns
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect(),
    };

    let gene_idx =
        column_index(&columns, &config.gene_column).ok_or_else(|| missing(&config.gene_column))?;
    let expr_idx = column_index(&columns, &config.expression_column)
        .ok_or_else(|| missing(&config.expression_column))?;
    let min_fields = gene_idx.max(expr_idx) + 1;

    tracing::debug!(
        file = %file_path.display(),
        gene_idx,
        expr_idx,
        "Header located"
    );

    let mut parsed = ParsedFile::default();

    for line in lines {
        parsed.lines_processed += 1;

        let fields: Vec<&str> = split_fields(line).collect();
        match parse_row(&fields, gene_idx, expr_idx, min_fields, config) {
            Some(record) => parsed.records.push(record),
            None => {
                parsed.rows_skipped += 1;
                tracing::trace!(
                    file = %file_path.display(),
                    line = preview(line),
                    "Row skipped"
                );
            }
        }
    }

    tracing::debug!(
        file = %file_path.display(),
        records = parsed.records.len(),
        skipped = parsed.rows_skipped,
        "Parsing complete"
    );

    Ok(parsed)
}

/// Extract a record from one data row, or `None` if the row is dropped.
fn parse_row(
    fields: &[&str],
    gene_idx: usize,
    expr_idx: usize,
    min_fields: usize,
    config: &ParseConfig,
) -> Option<ExpressionRecord> {
    if fields.len() < min_fields {
        return None;
    }

    let gene = fields[gene_idx].trim();
    if gene.is_empty() || gene.starts_with(config.reserved_prefix.as_str()) {
        return None;
    }

    let value: f64 = fields[expr_idx].trim().parse().ok()?;

    Some(ExpressionRecord {
        gene: gene.to_string(),
        value,
    })
}

fn split_fields(line: &str) -> std::str::Split<'_, char> {
    line.split(constants::FIELD_DELIMITER)
}

/// Index of the first header field equal to `name`.
fn column_index(columns: &[&str], name: &str) -> Option<usize> {
    columns.iter().position(|c| *c == name)
}

/// Truncate a line for trace output.
fn preview(line: &str) -> &str {
    const MAX: usize = 120;
    match line.char_indices().nth(MAX) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

// =============================================================================
// Tests
// =============================================================================
