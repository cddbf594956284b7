// exprmatrix - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "exprmatrix";

/// Application identifier used for config directories.
pub const APP_ID: &str = "exprmatrix";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input format
// =============================================================================

/// Column that identifies the gene in every quantification file. The first
/// line containing this token is treated as the header row.
pub const GENE_NAME_COLUMN: &str = "gene_name";

/// Expression column used when neither the CLI nor config.toml names one.
pub const DEFAULT_EXPRESSION_COLUMN: &str = "stranded_second";

/// Gene-name prefix of quantifier summary rows (N_unmapped, N_multimapping, ...).
pub const RESERVED_GENE_PREFIX: &str = "N_";

/// Field separator for both input files and the output matrix.
pub const FIELD_DELIMITER: char = '\t';

// =============================================================================
// Output format
// =============================================================================

/// Token written for (gene, sample) cells with no observed value.
pub const MISSING_VALUE_TOKEN: &str = "NA";

/// Whole numbers below this magnitude are written with a trailing `.0`.
/// Larger values switch to the default float formatting.
pub const FIXED_POINT_LIMIT: f64 = 1e16;

// =============================================================================
// Run limits
// =============================================================================

/// Maximum number of non-fatal warnings stored in a run summary. Further
/// warnings are still logged and counted.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
