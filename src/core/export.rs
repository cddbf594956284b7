// exprmatrix - core/export.rs
//
// TSV export of the expression matrix and JSON export of the run summary.
// Core layer: writes to any Write trait object.

use crate::core::matrix::ExpressionMatrix;
use crate::core::model::RunSummary;
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export the matrix as tab-separated text.
///
/// Writes a `gene_name` header followed by one column per sample, then one
/// row per gene. Unobserved cells (and NaN values) are written as
/// `missing_token`. Returns the number of gene rows written.
pub fn export_tsv<W: Write>(
    matrix: &ExpressionMatrix,
    writer: W,
    export_path: &Path,
    missing_token: &str,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut tsv_writer = csv::WriterBuilder::new()
        .delimiter(constants::FIELD_DELIMITER as u8)
        .from_writer(writer);

    let header = std::iter::once(constants::GENE_NAME_COLUMN)
        .chain(matrix.samples.iter().map(String::as_str));
    tsv_writer.write_record(header).map_err(csv_err)?;

    let mut count = 0;
    for (gene, row) in matrix.genes.iter().zip(&matrix.rows) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(gene.clone());
        record.extend(row.iter().map(|cell| format_cell(*cell, missing_token)));
        tsv_writer.write_record(&record).map_err(csv_err)?;
        count += 1;
    }

    tsv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export the run summary as pretty-printed JSON.
pub fn export_report_json<W: Write>(
    summary: &RunSummary,
    writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, summary).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })
}

/// Render one cell.
///
/// Whole numbers keep a single decimal (`7.0`) so integer counts and
/// fractional values read the same way in one column.
pub fn format_cell(cell: Option<f64>, missing_token: &str) -> String {
    match cell {
        None => missing_token.to_string(),
        Some(v) if v.is_nan() => missing_token.to_string(),
        Some(v) if v.is_infinite() => {
            if v > 0.0 {
                "inf".to_string()
            } else {
                "-inf".to_string()
            }
        }
        Some(v) if v.fract() == 0.0 && v.abs() < constants::FIXED_POINT_LIMIT => {
            format!("{v:.1}")
        }
        Some(v) => v.to_string(),
    }
}
