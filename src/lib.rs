//! Batch injection of `data-i18n` localization markers into a static
//! HTML document.
//!
//! The tool locates hard-coded Bulgarian text fragments in markup and
//! wraps them with `data-i18n="some.key"` attributes, so that a
//! runtime internationalization layer can later swap translations in.
//! The core is an ordered table of (pattern, key, template) rules plus
//! one in-memory substitution pass:
//!
//! 1. **[`rules`]**: the [`rules::Rule`] / [`rules::RuleSet`] types,
//!    the built-in rule table, and TOML rule-file loading. Duplicate
//!    keys are rejected before any file is touched.
//! 2. **[`injector`]**: the pure transform: document text in,
//!    transformed text plus a per-rule report out.
//! 3. **[`fileio`]**: the thin I/O boundary: UTF-8 read, timestamped
//!    backup, single-shot write-back.
//!
//! # Usage
//!
//! ```ignore
//! use i18n_marker::{mark_file, MarkOptions};
//! use i18n_marker::rules::builtin_rules;
//!
//! fn example() -> i18n_marker::error::Result<()> {
//!     let outcome = mark_file(
//!         "index.html",
//!         builtin_rules(),
//!         &MarkOptions::default(),
//!     )?;
//!     println!("changed: {}", outcome.changed);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use tracing::info;

pub mod error;
pub mod fileio;
pub mod injector;
pub mod rules;

use error::Result;
use injector::RuleReport;
use rules::RuleSet;

/// Knobs for [`mark_file`].
#[derive(Debug, Clone)]
pub struct MarkOptions {
    /// Transform and report, but write nothing back.
    pub dry_run: bool,
    /// Copy the original aside before overwriting it.
    pub backup: bool,
}

impl Default for MarkOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
        }
    }
}

/// Result of one [`mark_file`] run.
#[derive(Debug)]
pub struct MarkOutcome {
    /// Whether the transform changed the document at all.
    pub changed: bool,
    /// Path of the backup copy, if one was written.
    pub backup: Option<PathBuf>,
    /// Per-rule outcomes, in rule order.
    pub reports: Vec<RuleReport>,
}

/// Reads the document at `path`, applies `rules`, and writes the
/// result back in place.
///
/// The file is only rewritten when the transform changed something and
/// `options.dry_run` is off; in that case a timestamped backup of the
/// original is made first unless `options.backup` is disabled. On a
/// read failure nothing is ever written.
pub fn mark_file<P: AsRef<Path>>(
    path: P,
    rules: &RuleSet,
    options: &MarkOptions,
) -> Result<MarkOutcome> {
    let path = path.as_ref();
    let original = fileio::read_document(path)?;
    let (transformed, reports) = injector::transform(&original, rules)?;
    let changed = transformed != original;

    let mut backup = None;
    if changed && !options.dry_run {
        if options.backup {
            let backup_path = fileio::backup_document(path)?;
            info!(backup = %backup_path.display(), "backed up original");
            backup = Some(backup_path);
        }
        fileio::write_document(path, &transformed)?;
    }

    Ok(MarkOutcome {
        changed,
        backup,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::RuleOutcome;
    use crate::rules::builtin_rules;
    use std::fs;

    #[test]
    fn test_mark_file_rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<h4>Кариери</h4>\n").unwrap();

        let outcome = mark_file(&path, builtin_rules(), &MarkOptions::default()).unwrap();
        assert!(outcome.changed);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<h4 data-i18n=\"footer.careers\">Кариери</h4>\n"
        );

        // The backup holds the pre-transform document.
        let backup = outcome.backup.expect("backup should be written");
        assert_eq!(fs::read_to_string(backup).unwrap(), "<h4>Кариери</h4>\n");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<h4>Кариери</h4>\n").unwrap();

        let options = MarkOptions {
            dry_run: true,
            ..MarkOptions::default()
        };
        let outcome = mark_file(&path, builtin_rules(), &options).unwrap();
        assert!(outcome.changed);
        assert!(outcome.backup.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), "<h4>Кариери</h4>\n");
        // No backup file appeared either.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_no_backup_option() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<h4>Помощ</h4>\n").unwrap();

        let options = MarkOptions {
            backup: false,
            ..MarkOptions::default()
        };
        let outcome = mark_file(&path, builtin_rules(), &options).unwrap();
        assert!(outcome.changed);
        assert!(outcome.backup.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unchanged_document_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<p>nothing here</p>\n").unwrap();

        let outcome = mark_file(&path, builtin_rules(), &MarkOptions::default()).unwrap();
        assert!(!outcome.changed);
        assert!(outcome.backup.is_none());
        assert!(outcome
            .reports
            .iter()
            .all(|r| r.outcome == RuleOutcome::NoMatch));
    }

    #[test]
    fn test_missing_input_reports_file_access() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.html");

        let result = mark_file(&path, builtin_rules(), &MarkOptions::default());
        assert!(matches!(result, Err(error::Error::FileAccess { .. })));
        // No output file was created.
        assert!(!path.exists());
    }
}
