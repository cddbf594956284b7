// exprmatrix - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for exprmatrix configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/exprmatrix/ or %APPDATA%\exprmatrix\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[matrix]` section.
    pub matrix: MatrixSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[matrix]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MatrixSection {
    /// Expression column read from each file.
    pub expression_column: Option<String>,
    /// File extension filter ("" = all files).
    pub extension: Option<String>,
    /// Token written for missing cells.
    pub missing_token: Option<String>,
    /// Gene-name prefix of summary rows.
    pub reserved_prefix: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub expression_column: String,
    /// Empty string means no extension filter.
    pub extension: String,
    pub missing_token: String,
    pub reserved_prefix: String,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            expression_column: constants::DEFAULT_EXPRESSION_COLUMN.to_string(),
            extension: String::new(),
            missing_token: constants::MISSING_VALUE_TOKEN.to_string(),
            reserved_prefix: constants::RESERVED_GENE_PREFIX.to_string(),
            log_level: None,
        }
    }
}

/// Load and validate a config.toml.
///
/// `required` is true when the path came from `--config`: a missing or
/// unreadable file is then an error. Otherwise a missing file yields
/// defaults with no warnings (first run). An unparseable file always yields
/// defaults plus a warning.
///
/// This runs before logging is initialised (the config may set the level),
/// so problems are returned as warnings for the caller to log.
pub fn load_config(
    config_path: &Path,
    required: bool,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        if required {
            return Err(ConfigError::NotFound {
                path: config_path.to_path_buf(),
            });
        }
        return Ok((AppConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) if required => {
            return Err(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
        }
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    Ok(validate(raw, warnings))
}

/// Validate each field, accumulating all problems.
fn validate(raw: RawConfig, mut warnings: Vec<String>) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();

    // -- Matrix: expression_column --
    if let Some(column) = raw.matrix.expression_column {
        if is_valid_name(&column) {
            config.expression_column = column;
        } else {
            warnings.push(format!(
                "[matrix] expression_column = \"{column}\" must be non-empty and contain no tabs. \
                 Using default ({}).",
                constants::DEFAULT_EXPRESSION_COLUMN
            ));
        }
    }

    // -- Matrix: extension --
    if let Some(ext) = raw.matrix.extension {
        if ext.contains(['/', '\\']) {
            warnings.push(format!(
                "[matrix] extension = \"{ext}\" must not contain path separators. \
                 Using default (all files)."
            ));
        } else {
            config.extension = ext;
        }
    }

    // -- Matrix: missing_token --
    if let Some(token) = raw.matrix.missing_token {
        if token.contains(['\t', '\n', '\r']) {
            warnings.push(format!(
                "[matrix] missing_token = {token:?} must not contain tabs or newlines. \
                 Using default ({}).",
                constants::MISSING_VALUE_TOKEN
            ));
        } else {
            config.missing_token = token;
        }
    }

    // -- Matrix: reserved_prefix --
    if let Some(prefix) = raw.matrix.reserved_prefix {
        if is_valid_name(&prefix) {
            config.reserved_prefix = prefix;
        } else {
            warnings.push(format!(
                "[matrix] reserved_prefix = \"{prefix}\" must be non-empty and contain no tabs. \
                 Using default ({}).",
                constants::RESERVED_GENE_PREFIX
            ));
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    (config, warnings)
}

/// Column names and prefixes must be usable inside a tab-separated header.
fn is_valid_name(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains(['\t', '\n', '\r'])
}
