// exprmatrix - platform/fs.rs
//
// Filesystem helpers used by the app layer: whole-file text reads and the
// diagnostic listing printed when the input directory holds no samples.

use crate::core::model::DirListingEntry;
use crate::util::error::ParseError;
use std::io;
use std::path::Path;

/// Read a quantification file as UTF-8 text.
///
/// The handle is dropped before this returns, so no file stays open while
/// the content is parsed.
pub fn read_text(path: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::Io {
        file: path.to_path_buf(),
        source: e,
    })?;
    String::from_utf8(bytes).map_err(|e| ParseError::InvalidEncoding {
        file: path.to_path_buf(),
        source: e,
    })
}

/// List the immediate entries of `dir`, sorted by name.
///
/// Symlinks are classified by their target, matching how sample folders
/// are discovered.
pub fn list_directory(dir: &Path) -> io::Result<Vec<DirListingEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let is_dir = entry.path().is_dir();
        entries.push(DirListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
