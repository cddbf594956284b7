// exprmatrix - tests/e2e_pipeline.rs
//
// End-to-end tests for the discovery -> parse -> merge -> export pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, and the
// real TSV writer against on-disk fixtures and temporary trees. The CLI
// tests run the compiled binary to check exit codes.

use exprmatrix::app::pipeline::{self, RunConfig};
use exprmatrix::core::parser::ParseConfig;
use exprmatrix::util::error::{DiscoveryError, MatrixError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture tree.
fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("star_counts")
}

fn run_config(input: &Path, output: &Path) -> RunConfig {
    RunConfig {
        input_dir: input.to_path_buf(),
        output_file: output.to_path_buf(),
        parse: ParseConfig::default(),
        extension: String::new(),
        missing_token: "NA".to_string(),
        report_file: None,
    }
}

/// Parse the written matrix into (header, rows) for order-independent checks.
fn read_matrix(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let content = fs::read_to_string(path).expect("read output");
    let mut lines = content.lines();
    let header = lines
        .next()
        .expect("header line")
        .split('\t')
        .map(String::from)
        .collect();
    let rows = lines
        .map(|l| l.split('\t').map(String::from).collect())
        .collect();
    (header, rows)
}

fn row<'a>(rows: &'a [Vec<String>], gene: &str) -> Option<&'a Vec<String>> {
    rows.iter().find(|r| r[0] == gene)
}

fn write_sample(root: &Path, sample: &str, file: &str, content: &str) {
    let dir = root.join(sample);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

// =============================================================================
// Pipeline E2E
// =============================================================================

/// The fixture tree produces the expected matrix exactly.
#[test]
fn e2e_fixture_tree_builds_expected_matrix() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("matrix.tsv");

    let summary = pipeline::run(&run_config(&fixtures(), &output)).expect("run");

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "gene_name\tS1\tS2\n\
         BRCA1\tNA\t3.0\n\
         GAPDH\t455.0\tNA\n\
         TP53\t12.5\t7.0\n"
    );

    assert_eq!(summary.sample_folders, 3);
    assert_eq!(summary.genes, 3);
    assert_eq!(summary.sample_columns, vec!["S1", "S2"]);
    // S2/notes.txt has no header; S3 lacks the expression column.
    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.files_skipped, 2);
}

/// A file without the expression column is skipped with a warning and its
/// genes do not appear in the output.
#[test]
fn e2e_file_missing_expression_column_is_skipped() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("matrix.tsv");

    let summary = pipeline::run(&run_config(&fixtures(), &output)).unwrap();

    let (header, rows) = read_matrix(&output);
    assert!(!header.contains(&"S3".to_string()), "S3 column: {header:?}");
    assert!(row(&rows, "MYC").is_none(), "MYC must not appear");
    assert!(
        summary
            .warnings
            .iter()
            .any(|w| w.contains("stranded_second") && w.contains("S3")),
        "expected a missing-column warning, got {:?}",
        summary.warnings
    );
}

/// Summary rows (N_ prefix) never reach the output.
#[test]
fn e2e_reserved_prefix_rows_excluded() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("matrix.tsv");

    pipeline::run(&run_config(&fixtures(), &output)).unwrap();

    let (_, rows) = read_matrix(&output);
    assert!(rows.iter().all(|r| !r[0].starts_with("N_")), "rows: {rows:?}");
}

/// The extension filter limits which files are read.
#[test]
fn e2e_extension_filter_ignores_other_files() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("matrix.tsv");
    let config = RunConfig {
        extension: "tsv".to_string(),
        ..run_config(&fixtures(), &output)
    };

    let summary = pipeline::run(&config).unwrap();
    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.files_skipped, 1, "only S3 should be skipped");
    assert!(summary.warnings.iter().all(|w| !w.contains("notes.txt")));
}

/// Selecting another column changes the values, not the shape.
#[test]
fn e2e_alternative_expression_column() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("matrix.tsv");
    let config = RunConfig {
        parse: ParseConfig::with_expression_column("unstranded"),
        ..run_config(&fixtures(), &output)
    };

    let summary = pipeline::run(&config).unwrap();

    let (header, rows) = read_matrix(&output);
    // S3 has `unstranded`, so MYC now contributes a column.
    assert_eq!(header, vec!["gene_name", "S1", "S2", "S3"]);
    assert_eq!(row(&rows, "MYC").unwrap(), &vec!["MYC", "NA", "NA", "77.0"]);
    assert_eq!(row(&rows, "EGFR").unwrap(), &vec!["EGFR", "NA", "5.0", "NA"]);
    assert_eq!(summary.files_skipped, 1);
}

/// A sample folder with no files contributes no column and does not abort.
#[test]
fn e2e_empty_sample_folder_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    write_sample(&input, "A", "x.tsv", "gene_name\tstranded_second\nTP53\t12.5\n");
    fs::create_dir_all(input.join("EMPTY")).unwrap();
    let output = dir.path().join("matrix.tsv");

    let summary = pipeline::run(&run_config(&input, &output)).unwrap();

    let (header, _) = read_matrix(&output);
    assert_eq!(header, vec!["gene_name", "A"]);
    assert_eq!(summary.samples_without_files, vec!["EMPTY"]);
    assert_eq!(summary.sample_folders, 2);
}

/// Two files in one sample listing the same gene: the later file wins.
#[test]
fn e2e_duplicate_pair_last_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    write_sample(&input, "A", "1_first.tsv", "gene_name\tstranded_second\nTP53\t1\n");
    write_sample(&input, "A", "2_second.tsv", "gene_name\tstranded_second\nTP53\t2\n");
    let output = dir.path().join("matrix.tsv");

    pipeline::run(&run_config(&input, &output)).unwrap();

    let (_, rows) = read_matrix(&output);
    assert_eq!(row(&rows, "TP53").unwrap(), &vec!["TP53", "2.0"]);
}

/// Samples whose files are all skipped still produce a header-only matrix.
#[test]
fn e2e_no_valid_rows_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    write_sample(&input, "A", "x.tsv", "no header here\n");
    let output = dir.path().join("matrix.tsv");

    let summary = pipeline::run(&run_config(&input, &output)).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "gene_name\n");
    assert_eq!(summary.genes, 0);
    assert_eq!(summary.files_skipped, 1);
}

/// Discovery on a directory with no subdirectories is fatal.
#[test]
fn e2e_no_sample_folders_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stray.tsv"), "gene_name\n").unwrap();
    let output = dir.path().join("matrix.tsv");

    let result = pipeline::run(&run_config(dir.path(), &output));
    assert!(
        matches!(
            result,
            Err(MatrixError::Discovery(DiscoveryError::NoSampleFolders { .. }))
        ),
        "got {result:?}"
    );
    assert!(!output.exists(), "no output on fatal error");
}

/// The JSON report mirrors the returned summary.
#[test]
fn e2e_report_written() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("matrix.tsv");
    let report = out_dir.path().join("report.json");
    let config = RunConfig {
        report_file: Some(report.clone()),
        ..run_config(&fixtures(), &output)
    };

    pipeline::run(&config).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["genes"], 3);
    assert_eq!(value["files_skipped"], 2);
    assert_eq!(value["sample_columns"], serde_json::json!(["S1", "S2"]));
}

// =============================================================================
// CLI E2E
// =============================================================================

fn cli(config_dir: &Path) -> Command {
    // An empty config file keeps the run independent of the user's config.
    let config = config_dir.join("config.toml");
    fs::write(&config, "").unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_exprmatrix"));
    cmd.arg("--config").arg(config).env_remove("RUST_LOG");
    cmd
}

#[test]
fn e2e_cli_success_exit_code_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("matrix.tsv");

    let status = cli(dir.path())
        .arg("-i")
        .arg(fixtures())
        .arg("-o")
        .arg(&output)
        .arg("-e")
        .arg("tsv")
        .output()
        .expect("run binary");

    assert!(status.status.success(), "stderr: {}", String::from_utf8_lossy(&status.stderr));
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("3 genes across 3 samples"), "stdout: {stdout}");
    assert!(output.exists());
}

#[test]
fn e2e_cli_invalid_input_exit_code_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("matrix.tsv");

    let status = cli(dir.path())
        .arg("-i")
        .arg(dir.path().join("missing"))
        .arg("-o")
        .arg(&output)
        .status()
        .expect("run binary");

    assert_eq!(status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn e2e_cli_no_samples_lists_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("stray.tsv"), "x").unwrap();

    let out = cli(dir.path())
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("matrix.tsv"))
        .output()
        .expect("run binary");

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("stray.tsv (file)"), "stderr: {stderr}");
}

#[test]
fn e2e_cli_config_sets_column_and_flag_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[matrix]\nexpression_column = \"unstranded\"\nmissing_token = \"-\"\n")
        .unwrap();
    let output = dir.path().join("matrix.tsv");

    let status = Command::new(env!("CARGO_BIN_EXE_exprmatrix"))
        .arg("--config")
        .arg(&config)
        .arg("-i")
        .arg(fixtures())
        .arg("-o")
        .arg(&output)
        .arg("--missing-token")
        .arg("0")
        .status()
        .expect("run binary");
    assert!(status.success());

    let (header, rows) = read_matrix(&output);
    assert_eq!(header, vec!["gene_name", "S1", "S2", "S3"]);
    assert_eq!(row(&rows, "MYC").unwrap(), &vec!["MYC", "0", "0", "77.0"]);
}
