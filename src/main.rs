// exprmatrix - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (CLI flags override it)
// 3. Logging initialisation (debug mode support)
// 4. Running the pipeline and mapping failures to exit codes

use clap::Parser;
use exprmatrix::app::pipeline::{self, RunConfig};
use exprmatrix::core::parser::ParseConfig;
use exprmatrix::platform;
use exprmatrix::util;
use exprmatrix::util::error::{DiscoveryError, MatrixError};
use std::path::{Path, PathBuf};

/// exprmatrix - merge per-sample expression files into one matrix.
///
/// Each immediate subdirectory of the input directory is a sample. Every
/// file inside it is scanned for a header row containing `gene_name`, and
/// the chosen expression column is collected into a gene x sample table
/// written as TSV with missing cells marked NA.
#[derive(Parser, Debug)]
#[command(name = "exprmatrix", version, about)]
struct Cli {
    /// Input directory containing sample folders.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output file name.
    #[arg(short = 'o', long = "output-file", alias = "output_file")]
    output_file: PathBuf,

    /// Column name for expression values [default: stranded_second].
    #[arg(short = 'c', long = "expression-column", alias = "expression_column")]
    expression_column: Option<String>,

    /// File extension to filter by [default: process all files].
    #[arg(short = 'e', long = "extension")]
    extension: Option<String>,

    /// Token written for missing cells [default: NA].
    #[arg(long = "missing-token")]
    missing_token: Option<String>,

    /// Also write a JSON summary of the run to this path.
    #[arg(long = "report")]
    report: Option<PathBuf>,

    /// Config file to use instead of the platform default location.
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config comes first because it may set the log level.
    let (config_path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (platform::config::PlatformPaths::resolve().config_file(), false),
    };
    let loaded = platform::config::load_config(&config_path, required);

    let (app_config, config_warnings) = match loaded {
        Ok(c) => c,
        Err(e) => {
            util::logging::init(cli.debug, None);
            fail(&MatrixError::from(e));
        }
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::debug!(
        version = util::constants::APP_VERSION,
        config = %config_path.display(),
        "exprmatrix starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let run_config = RunConfig {
        input_dir: cli.input.clone(),
        output_file: cli.output_file.clone(),
        parse: ParseConfig {
            expression_column: cli
                .expression_column
                .clone()
                .unwrap_or(app_config.expression_column),
            reserved_prefix: app_config.reserved_prefix,
            ..Default::default()
        },
        extension: cli.extension.clone().unwrap_or(app_config.extension),
        missing_token: cli.missing_token.clone().unwrap_or(app_config.missing_token),
        report_file: cli.report.clone(),
    };

    match pipeline::run(&run_config) {
        Ok(summary) => {
            if summary.warning_count() > 0 {
                tracing::warn!(
                    warnings = summary.warning_count(),
                    skipped_files = summary.files_skipped,
                    "Completed with warnings"
                );
            }
            println!(
                "Done! Processed data for {} genes across {} samples.",
                summary.genes, summary.sample_folders
            );
        }
        Err(MatrixError::Discovery(DiscoveryError::NoSampleFolders { path })) => {
            tracing::error!(input = %path.display(), "No sample folders found");
            eprintln!("No sample folders found in {}", path.display());
            print_directory_contents(&path);
            std::process::exit(1);
        }
        Err(e) => fail(&e),
    }
}

/// Report a fatal error and exit with status 1.
fn fail(error: &MatrixError) -> ! {
    tracing::error!(error = %error, "Run failed");
    eprintln!("Error: {error}");
    std::process::exit(1);
}

/// Print the contents of `dir` to help diagnose a wrong input path.
fn print_directory_contents(dir: &Path) {
    eprintln!("Directory contents of {}:", dir.display());
    match platform::fs::list_directory(dir) {
        Ok(entries) if entries.is_empty() => eprintln!("  (empty directory)"),
        Ok(entries) => {
            for entry in entries {
                if entry.is_dir {
                    eprintln!("  {}/ (directory)", entry.name);
                } else {
                    eprintln!("  {} (file)", entry.name);
                }
            }
        }
        Err(e) => eprintln!("  Error listing directory: {e}"),
    }
}
