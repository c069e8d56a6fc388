//! Error types for the marker injector.
//!
//! I/O failures are fatal and abort the run before anything is written
//! back; rule-table problems (duplicate keys, empty patterns, a broken
//! external rule file) are caught eagerly, before the target document
//! is touched. A rule whose pattern simply does not match is *not* an
//! error; see [`crate::injector::RuleOutcome`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input file could not be read, or the output (or its backup)
    /// could not be written. Fatal; no partial write is ever produced.
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two rules share the same localization key. Raised when the rule
    /// set is built, before any file mutation.
    #[error("duplicate localization key in rule table: {0:?}")]
    DuplicateKey(String),

    /// A rule is structurally unusable (empty key or empty pattern).
    #[error("invalid rule {key:?}: {message}")]
    InvalidRule { key: String, message: String },

    /// An external rule file was present but could not be parsed.
    #[error("invalid rule file {}: {message}", .path.display())]
    RuleFile { path: PathBuf, message: String },

    /// A rule's pattern failed to compile (e.g. it exceeds the regex
    /// size limit). Cannot happen for the built-in table.
    #[error("rule {key:?}: pattern failed to compile: {source}")]
    Pattern {
        key: String,
        #[source]
        source: regex::Error,
    },
}
