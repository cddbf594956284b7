// exprmatrix - core/discovery.rs
//
// Sample folder and quantification file discovery.
//
// Architecture note: this module uses `walkdir` for directory listing as an
// OS abstraction. It reads only directory entries and file types, never file
// *contents*; that boundary is owned by the app layer (app::pipeline).
//
// Both levels are non-recursive: samples are the immediate subdirectories of
// the input directory, files are the immediate files of each sample folder.
// Per-entry I/O errors are non-fatal and collected as warnings.

use crate::core::model::SampleFolder;
use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

// =============================================================================
// File filter
// =============================================================================

/// Extension filter applied to the files of each sample folder.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    /// Compiled `*.<ext>` pattern. `None` means every file is accepted.
    pattern: Option<glob::Pattern>,

    /// Literal `.<ext>` suffix, used when the pattern fails to compile.
    suffix: Option<String>,
}

impl FileFilter {
    /// Build a filter from a user-supplied extension.
    ///
    /// `"tsv"` and `".tsv"` are equivalent. An empty (or all-dot) extension
    /// disables filtering.
    pub fn new(extension: &str) -> Self {
        let ext = extension.trim().trim_start_matches('.');
        if ext.is_empty() {
            return Self::default();
        }

        let raw = format!("*.{}", glob::Pattern::escape(ext));
        let pattern = match glob::Pattern::new(&raw) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(
                    pattern = %raw,
                    error = %e,
                    "Invalid extension pattern, falling back to suffix match"
                );
                None
            }
        };

        Self {
            pattern,
            suffix: Some(format!(".{ext}")),
        }
    }

    /// True when no extension was configured.
    pub fn is_unfiltered(&self) -> bool {
        self.suffix.is_none()
    }

    /// Returns true if `file_name` passes the filter.
    ///
    /// The wildcard never matches a leading dot, so hidden files are only
    /// picked up when no extension filter is set.
    pub fn matches(&self, file_name: &str) -> bool {
        let Some(suffix) = &self.suffix else {
            return true;
        };
        if file_name.starts_with('.') {
            return false;
        }
        match &self.pattern {
            Some(p) => p.matches_with(
                file_name,
                glob::MatchOptions {
                    case_sensitive: true,
                    require_literal_separator: true,
                    require_literal_leading_dot: true,
                },
            ),
            None => file_name.ends_with(suffix.as_str()),
        }
    }
}

// =============================================================================
// Folder discovery
// =============================================================================

/// Discover sample folders directly under `root`, sorted by name.
///
/// # Non-fatal errors
/// Entries that cannot be accessed are recorded as human-readable strings in
/// the returned warnings vector.
///
/// # Fatal errors
/// Returns `Err` if the root path is invalid (`RootNotFound`,
/// `NotADirectory`, `PermissionDenied`) or has no subdirectories
/// (`NoSampleFolders`).
pub fn discover_sample_folders(
    root: &Path,
) -> Result<(Vec<SampleFolder>, Vec<String>), DiscoveryError> {
    check_root(root)?;

    tracing::debug!(root = %root.display(), "Sample folder discovery starting");

    let mut folders = Vec::new();
    let mut warnings = Vec::new();

    for entry in immediate_entries(root, &mut warnings) {
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        folders.push(SampleFolder {
            name,
            path: entry.path().to_path_buf(),
        });
    }

    if folders.is_empty() {
        return Err(DiscoveryError::NoSampleFolders {
            path: root.to_path_buf(),
        });
    }

    tracing::debug!(
        folders = folders.len(),
        warnings = warnings.len(),
        "Sample folder discovery complete"
    );

    Ok((folders, warnings))
}

/// Discover the files directly inside `folder` that pass `filter`, sorted
/// by name. Subdirectories are ignored.
pub fn discover_sample_files(folder: &Path, filter: &FileFilter) -> (Vec<PathBuf>, Vec<String>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    for entry in immediate_entries(folder, &mut warnings) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy();
        if !filter.matches(&file_name) {
            tracing::trace!(file = %path.display(), "Not matched by extension filter");
            continue;
        }
        files.push(path.to_path_buf());
    }

    (files, warnings)
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate that `root` exists and is a directory.
///
/// Uses `fs::metadata()` rather than `Path::is_dir()` because the latter maps
/// every error, including PermissionDenied, to `false`.
fn check_root(root: &Path) -> Result<(), DiscoveryError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DiscoveryError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            })
        }
        Err(_) => Err(DiscoveryError::RootNotFound {
            path: root.to_path_buf(),
        }),
    }
}

/// Depth-1 entries of `dir` in file-name order, following symlinks so a
/// linked sample folder or file is classified by its target. Inaccessible
/// entries are pushed onto `warnings`.
fn immediate_entries(dir: &Path, warnings: &mut Vec<String>) -> Vec<walkdir::DirEntry> {
    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for entry_result in walker {
        match entry_result {
            Ok(e) => entries.push(e),
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
            }
        }
    }
    entries
}

// =============================================================================
// Tests
// =============================================================================
