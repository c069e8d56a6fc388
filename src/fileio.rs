//! Text-based I/O for the marker injector.
//!
//! The document is treated as one opaque UTF-8 string between load and
//! store: it is read once, transformed in memory, and written back in a
//! single shot. Both functions assume UTF-8 encoding for input and
//! output.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{Error, Result};

/// Reads a text file (assumed to be in UTF-8) and returns its entire
/// contents as a single string.
///
/// This function:
/// - Opens the file at the specified path.
/// - Reads the entire contents into a string.
/// - Removes a leading UTF-8 byte order mark (BOM) if present.
///
/// # Arguments
///
/// * `path` - A path-like value that specifies the file to read.
///
/// # Returns
///
/// * `Ok(String)` containing the document text if successful.
/// * `Err(Error::FileAccess)` if the file is missing or unreadable.
///
/// # Examples
///
/// ```no_run
/// use i18n_marker::fileio::read_document;
///
/// # fn main() -> i18n_marker::error::Result<()> {
/// let html = read_document("index.html")?;
/// println!("{} bytes", html.len());
/// # Ok(())
/// # }
/// ```
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    // Remove the UTF-8 BOM if it exists.
    if let Some(stripped) = content.strip_prefix('\u{FEFF}') {
        return Ok(stripped.to_string());
    }

    Ok(content)
}

/// Writes the given document text to a file in UTF-8 encoding,
/// replacing any previous contents.
///
/// # Arguments
///
/// * `path` - A path-like value specifying the file to write to.
/// * `document` - The full document text; written as-is, no trailing
///   newline is added.
///
/// # Returns
///
/// * `Ok(())` if the write operation succeeds.
/// * `Err(Error::FileAccess)` if the file cannot be created or written.
pub fn write_document<P: AsRef<Path>>(path: P, document: &str) -> Result<()> {
    let path = path.as_ref();
    let write = |path: &Path| -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(document.as_bytes())
    };
    write(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Copies the file at `path` to a timestamped sibling
/// (`<name>.<YYYYMMDDHHMMSS>.bak`) and returns the backup path.
///
/// The timestamp keeps repeated runs from clobbering an earlier backup.
pub fn backup_document<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let backup = path.with_file_name(format!("{name}.{stamp}.bak"));
    fs::copy(path, &backup).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_file_is_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_document(dir.path().join("nope.html"));
        match result {
            Err(Error::FileAccess { path, .. }) => {
                assert!(path.ends_with("nope.html"));
            }
            other => panic!("expected FileAccess, got {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.html");
        write_document(&path, "<p>Помощ</p>\n").unwrap();
        assert_eq!(read_document(&path).unwrap(), "<p>Помощ</p>\n");
    }

    #[test]
    fn test_read_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.html");
        fs::write(&path, "\u{FEFF}<html></html>").unwrap();
        assert_eq!(read_document(&path).unwrap(), "<html></html>");
    }

    #[test]
    fn test_backup_copies_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.html");
        fs::write(&path, "original").unwrap();

        let backup = backup_document(&path).unwrap();
        assert_ne!(backup, path);
        assert!(backup.extension().is_some_and(|e| e == "bak"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original");
        // The original is untouched.
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }
}
