// exprmatrix - core/matrix.rs
//
// In-memory gene x sample aggregation and conversion to a dense matrix.
//
// `ExpressionTable` is the sparse accumulator written by the pipeline while
// files are parsed. `ExpressionMatrix` is the dense, ordered view handed to
// the writer. Rows are sorted by gene name, columns by sample name.

use crate::core::model::ParsedFile;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// Aggregator
// =============================================================================

/// Sparse gene -> (sample -> value) table.
#[derive(Debug, Clone, Default)]
pub struct ExpressionTable {
    genes: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ExpressionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for (gene, sample), replacing any earlier value.
    pub fn insert(&mut self, gene: &str, sample: &str, value: f64) {
        self.genes
            .entry(gene.to_string())
            .or_default()
            .insert(sample.to_string(), value);
    }

    /// Insert every record of one parsed file under `sample`, in file order.
    /// Returns the number of records merged.
    pub fn merge_file(&mut self, sample: &str, parsed: ParsedFile) -> usize {
        let count = parsed.records.len();
        for record in parsed.records {
            self.insert(&record.gene, sample, record.value);
        }
        count
    }

    pub fn get(&self, gene: &str, sample: &str) -> Option<f64> {
        self.genes.get(gene)?.get(sample).copied()
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Union of sample names across all genes, sorted.
    ///
    /// A sample that contributed no valid rows does not appear here.
    pub fn sample_names(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.genes.values().flat_map(|s| s.keys()).collect();
        set.into_iter().cloned().collect()
    }

    /// Build the dense matrix view.
    pub fn to_matrix(&self) -> ExpressionMatrix {
        let samples = self.sample_names();
        let mut genes = Vec::with_capacity(self.genes.len());
        let mut rows = Vec::with_capacity(self.genes.len());

        for (gene, values) in &self.genes {
            genes.push(gene.clone());
            rows.push(samples.iter().map(|s| values.get(s).copied()).collect());
        }

        ExpressionMatrix {
            genes,
            samples,
            rows,
        }
    }
}

// =============================================================================
// Dense matrix
// =============================================================================

/// Dense gene x sample matrix. `None` marks an unobserved cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpressionMatrix {
    pub genes: Vec<String>,
    pub samples: Vec<String>,
    /// One row per gene, one cell per sample, aligned with `genes`/`samples`.
    pub rows: Vec<Vec<Option<f64>>>,
}

impl ExpressionMatrix {
    pub fn cell(&self, gene: &str, sample: &str) -> Option<f64> {
        let r = self.genes.iter().position(|g| g == gene)?;
        let c = self.samples.iter().position(|s| s == sample)?;
        self.rows[r][c]
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}
